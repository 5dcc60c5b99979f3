use clap::Parser;

/// Mirror-Hoymiles — embedded solar inverter dashboards for a mirror display.
#[derive(Parser, Debug)]
#[command(name = "mirror-hoymiles", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Exit after this many renders (runs until Ctrl-C when unset).
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub show_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
