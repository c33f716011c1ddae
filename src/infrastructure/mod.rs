pub mod logging;
pub mod error_logging;
pub mod output;

pub use logging::{Logger, LoggerTrait};
pub use error_logging::{ErrorLogger, ErrorType};
pub use output::write_json;
