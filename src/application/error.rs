use std::path::PathBuf;

use thiserror::Error;

/// 扫描过程中的致命错误
///
/// 只有结果文件写不出去才会中断扫描；单个文件的读取失败在扫描循环中被丢弃。
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("无法创建结果文件 {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无法写入结果文件 {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无法序列化搜索结果 {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
