mod environment_config;
pub use self::environment_config::*;
mod client_config;
pub use self::client_config::*;
