use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::file_walker::{self, FileFilter, WalkOptions};
use crate::domain::{search_in_file, LineMatcher, ResultSet};
use crate::infrastructure::{write_json, ErrorLogger, ErrorType, Logger, LoggerTrait};

use super::ScanError;

/// 一次扫描的全部参数，交给 [`Scanner`] 后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    directory: PathBuf,
    term: String,
    ignore_case: bool,
    extensions: Vec<String>,
    output_path: PathBuf,
    walk: WalkOptions,
}

impl SearchConfig {
    /// 以根目录和搜索词创建配置；默认区分大小写、不过滤扩展名、输出到 `results.json`
    pub fn new(directory: impl Into<PathBuf>, term: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            term: term.into(),
            ignore_case: false,
            extensions: Vec::new(),
            output_path: PathBuf::from("results.json"),
            walk: WalkOptions::default(),
        }
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_walk_options(mut self, walk: WalkOptions) -> Self {
        self.walk = walk;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn walk_options(&self) -> WalkOptions {
        self.walk
    }
}

/// 扫描器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Created,
    Running,
    Completed,
    /// 结果文件写入失败
    FailedFatal,
}

/// 扫描统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub output_path: PathBuf,
    /// 遍历到的普通文件
    pub files_visited: u64,
    /// 被扩展名过滤掉的文件
    pub files_filtered: u64,
    /// 尝试搜索的文件
    pub files_searched: u64,
    /// 无法读取而跳过的文件
    pub files_unreadable: u64,
    pub matched_files: u64,
    pub total_matches: u64,
    /// 结果文件字节数
    pub output_size: u64,
    pub duration: Duration,
}

/// 递归搜索目录并把匹配结果写成 JSON
pub struct Scanner {
    config: SearchConfig,
    state: ScanState,
    logger: Arc<dyn LoggerTrait>,
    error_logger: Arc<ErrorLogger>,
}

impl Scanner {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            state: ScanState::Created,
            logger: Arc::new(Logger::disabled()),
            error_logger: Arc::new(ErrorLogger::disabled()),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn LoggerTrait>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_error_logger(mut self, error_logger: Arc<ErrorLogger>) -> Self {
        self.error_logger = error_logger;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// 执行扫描，返回结果文件路径
    pub fn run(&mut self) -> Result<PathBuf, ScanError> {
        self.run_report().map(|report| report.output_path)
    }

    /// 执行扫描，返回结果文件路径和统计信息
    ///
    /// 只有结果文件写入失败才会返回错误。
    pub fn run_report(&mut self) -> Result<ScanReport, ScanError> {
        self.state = ScanState::Running;
        let start_time = Instant::now();

        let config = &self.config;
        let logger = self.logger.as_ref();
        let error_logger = self.error_logger.as_ref();

        if logger.is_enabled() {
            let _ = logger.log_message(&format!("搜索词: {}", config.term));
            let _ = logger.log_message(&format!("忽略大小写: {}", config.ignore_case));
            let _ = logger.log_message(&format!("扩展名: {:?}", config.extensions));
            let _ = logger.log_message(&format!("结果文件: {}", config.output_path.display()));
        }

        let matcher = LineMatcher::new(&config.term, config.ignore_case);
        let filter = FileFilter::new(config.extensions.clone());

        let mut results = ResultSet::new();
        let mut files_searched = 0u64;
        let mut files_unreadable = 0u64;
        let mut matched_files = 0u64;

        let walk_stats = file_walker::scan_directory(
            &config.directory,
            &filter,
            config.walk,
            logger,
            error_logger,
            |path| {
                files_searched += 1;
                match search_in_file(path, &matcher) {
                    Ok(records) => {
                        if !records.is_empty() {
                            matched_files += 1;
                        }
                        results.extend(records);
                    }
                    // 读不了的文件直接跳过，不影响整体扫描
                    Err(err) => {
                        files_unreadable += 1;
                        let _ = error_logger.log_error(
                            ErrorType::FileRead,
                            Some(&*path.to_string_lossy()),
                            "无法读取文件，已跳过",
                            Some(format!("{:#}", err).as_str()),
                        );
                    }
                }
            },
        );

        let output_size = match write_json(&config.output_path, &results) {
            Ok(size) => size,
            Err(err) => {
                if logger.is_enabled() {
                    let _ = logger.log_message(&format!("写入结果失败: {}", err));
                }
                self.state = ScanState::FailedFatal;
                return Err(err);
            }
        };

        let duration = start_time.elapsed();
        let total_matches = results.len() as u64;

        let _ = logger.finalize(files_searched, matched_files, total_matches, duration);
        let _ = error_logger.finalize();

        let report = ScanReport {
            output_path: config.output_path.clone(),
            files_visited: walk_stats.visited,
            files_filtered: walk_stats.filtered,
            files_searched,
            files_unreadable,
            matched_files,
            total_matches,
            output_size,
            duration,
        };

        self.state = ScanState::Completed;
        Ok(report)
    }
}
