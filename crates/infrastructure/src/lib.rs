pub mod config;
pub mod logging;

pub use config::{ConfigLoader, ConfigSource, ConfigValidator};
pub use logging::init_logging;
