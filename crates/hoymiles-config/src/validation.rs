//! Configuration validation.
//!
//! Collects every problem into a single `ValidationError` so the user sees
//! them all at once. A frame with neither `src` nor `html` is deliberately
//! NOT rejected here: the widget reports it per refresh cycle instead.

use crate::schema::WidgetConfig;
use hoymiles_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WidgetConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if !config.ident.is_empty() && !is_valid_ident(&config.ident) {
        errors.push(format!(
            "ident '{}' may only contain alphanumerics, '-' and '_'",
            config.ident
        ));
    }

    validate_non_empty(&mut errors, "width", &config.width);
    validate_non_empty(&mut errors, "height", &config.height);
    validate_non_empty(&mut errors, "background_color", &config.background_color);
    validate_non_empty(&mut errors, "color", &config.color);

    for (i, frame) in config.frames.iter().enumerate() {
        if matches!(frame.src.as_deref(), Some("")) {
            errors.push(format!("frames[{i}].src is empty"));
        }
        if matches!(frame.html.as_deref(), Some("")) {
            errors.push(format!("frames[{i}].html is empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_non_empty(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{field} must not be empty"));
    }
}

/// The ident ends up inside element ids and served paths, so keep it to
/// characters that are safe in both.
fn is_valid_ident(ident: &str) -> bool {
    ident
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
