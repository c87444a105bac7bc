mod command;
mod config;
mod environment;
mod error;
mod session;

pub use command::CommandResult;
pub use config::{default_config_path, Config, CONFIG_ENV_VAR};
pub use environment::EnvironmentInfo;
pub use error::FlowError;
pub use session::{Session, SessionSnapshot};
