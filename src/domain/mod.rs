pub mod matcher;
pub mod search;
pub mod file_walker;

pub use matcher::{matches, LineMatcher};
pub use search::{search_in_file, MatchRecord, ResultSet};
pub use file_walker::{FileFilter, WalkOptions, WalkStats};
