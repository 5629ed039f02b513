pub mod loader;
pub mod validator;

pub use loader::{ConfigLoader, ConfigSource};
pub use validator::ConfigValidator;
