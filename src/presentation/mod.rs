pub mod display;

pub use display::{completion_message, format_duration, format_file_size, SearchSummary};
