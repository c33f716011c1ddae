// 分层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{matches, FileFilter, LineMatcher, MatchRecord, ResultSet, WalkOptions};
pub use application::{Config, ScanError, ScanReport, ScanState, Scanner, SearchConfig};
pub use infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
pub use presentation::{completion_message, SearchSummary};
