pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, WidgetError};
pub use id::new_ident;
pub use types::{FrameId, WidgetState};

pub type Result<T> = std::result::Result<T, WidgetError>;
