pub mod config;
pub mod error;
pub mod scanner;

pub use config::Config;
pub use error::ScanError;
pub use scanner::{ScanReport, ScanState, Scanner, SearchConfig};
