use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use chrono::Local;

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorType {
    /// 文件无法打开或读取，已跳过
    FileRead,
    /// 目录遍历错误
    Walk,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::FileRead => "文件读取",
            ErrorType::Walk => "目录遍历",
        }
    }
}

/// 错误日志记录器
///
/// 默认关闭。扫描中被跳过的文件不会中断流程，开启后在这里留下记录和计数。
pub struct ErrorLogger {
    error_file: Mutex<Option<File>>,
    error_path: PathBuf,
    enabled: bool,
    error_counts: Mutex<BTreeMap<ErrorType, usize>>,
}

impl ErrorLogger {
    /// 创建新的错误日志记录器，日志写到当前目录下带时间戳的文件
    pub fn new(enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self::disabled());
        }

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        Self::with_path(PathBuf::from(format!("error_{}.log", timestamp)))
    }

    pub fn disabled() -> Self {
        Self {
            error_file: Mutex::new(None),
            error_path: PathBuf::new(),
            enabled: false,
            error_counts: Mutex::new(BTreeMap::new()),
        }
    }

    /// 在指定路径创建错误日志文件
    pub fn with_path(error_path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)?;

        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?; // UTF-8 BOM

        writeln!(file_clone, "# file-searcher 错误日志")?;
        writeln!(file_clone, "# 开始时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# ============================================")?;
        writeln!(file_clone)?;

        Ok(Self {
            error_file: Mutex::new(Some(file)),
            error_path,
            enabled: true,
            error_counts: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn error_path(&self) -> &Path {
        &self.error_path
    }

    /// 记录错误
    pub fn log_error(
        &self,
        error_type: ErrorType,
        file_path: Option<&str>,
        message: &str,
        details: Option<&str>,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Ok(mut counts) = self.error_counts.lock() {
            *counts.entry(error_type).or_insert(0) += 1;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), message)?;

                if let Some(path) = file_path {
                    writeln!(file, "  文件路径: {}", path)?;
                }

                if let Some(detail) = details {
                    writeln!(file, "  详细信息: {}", detail)?;
                }

                writeln!(file)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    /// 获取错误统计信息
    pub fn get_error_summary(&self) -> BTreeMap<ErrorType, usize> {
        self.error_counts
            .lock()
            .map(|counts| counts.clone())
            .unwrap_or_default()
    }

    /// 获取总错误数
    pub fn get_total_errors(&self) -> usize {
        self.get_error_summary().values().sum()
    }

    pub fn has_errors(&self) -> bool {
        self.get_total_errors() > 0
    }

    /// 完成错误日志记录
    pub fn finalize(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let summary = self.get_error_summary();

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# ============================================")?;
                writeln!(file, "# 结束时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;

                if summary.is_empty() {
                    writeln!(file, "# 无错误记录")?;
                } else {
                    writeln!(file, "# 错误统计:")?;
                    for (error_type, count) in &summary {
                        writeln!(file, "#   {}: {} 次", error_type.as_str(), count)?;
                    }
                    writeln!(file, "#   总计: {} 个错误", summary.values().sum::<usize>())?;
                }

                file.flush()?;
            }
        }

        Ok(())
    }

    /// 打印错误摘要到控制台
    pub fn print_error_summary(&self) {
        if !self.has_errors() {
            return;
        }

        println!("\n⚠️  搜索过程中跳过了部分文件:");
        println!("----------------------------");

        for (error_type, count) in &self.get_error_summary() {
            println!("  {}: {} 次", error_type.as_str(), count);
        }

        println!("  总计: {} 个错误", self.get_total_errors());
        println!("  详细错误信息请查看: {}", self.error_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_disabled_logger_counts_nothing() {
        let logger = ErrorLogger::new(false).unwrap();
        logger.log_error(ErrorType::FileRead, Some("/x"), "ignored", None).unwrap();

        assert_eq!(logger.get_total_errors(), 0);
        assert!(!logger.has_errors());
    }

    #[test]
    fn test_error_logging() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("error.log");
        let logger = ErrorLogger::with_path(path.clone()).unwrap();

        logger
            .log_error(ErrorType::FileRead, Some("/test/path"), "无法读取文件", Some("permission denied"))
            .unwrap();
        logger.log_error(ErrorType::Walk, None, "遍历错误", None).unwrap();
        logger.log_error(ErrorType::FileRead, Some("/test/other"), "无法读取文件", None).unwrap();
        logger.finalize().unwrap();

        assert_eq!(logger.get_total_errors(), 3);
        let summary = logger.get_error_summary();
        assert_eq!(summary.get(&ErrorType::FileRead), Some(&2));
        assert_eq!(summary.get(&ErrorType::Walk), Some(&1));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("文件路径: /test/path"));
        assert!(content.contains("详细信息: permission denied"));
        assert!(content.contains("总计: 3 个错误"));
    }

    #[test]
    fn test_error_types() {
        assert_eq!(ErrorType::FileRead.as_str(), "文件读取");
        assert_eq!(ErrorType::Walk.as_str(), "目录遍历");
    }
}
