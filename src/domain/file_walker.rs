use std::path::Path;

use ignore::{DirEntry, WalkBuilder};
use indicatif::{ProgressBar, ProgressStyle};

use crate::infrastructure::{ErrorLogger, ErrorType, LoggerTrait};

/// 文件筛选条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilter {
    /// 允许的文件名后缀，为空表示不过滤
    pub extensions: Vec<String>,
}

impl FileFilter {
    /// 创建新的文件过滤器，重复的后缀只保留第一次出现的位置
    pub fn new(extensions: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(extensions.len());
        for ext in extensions {
            if !unique.contains(&ext) {
                unique.push(ext);
            }
        }
        Self { extensions: unique }
    }

    /// 检查文件名是否以任一后缀结尾（区分大小写）
    pub fn matches_name(&self, file_name: &str) -> bool {
        self.extensions.is_empty() || self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    /// 检查文件是否应该被处理
    pub fn should_process(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.matches_name(&name.to_string_lossy()),
            None => false,
        }
    }
}

/// 遍历选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    pub respect_gitignore: bool,
    pub show_progress: bool,
}

/// 遍历统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// 遍历到的普通文件数
    pub visited: u64,
    /// 被扩展名过滤掉的文件数
    pub filtered: u64,
}

/// 普通文件，或指向普通文件的符号链接
fn is_regular_file(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => entry.path().is_file(),
        _ => false,
    }
}

fn new_progress(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        progress.set_style(style);
    }
    progress.set_message("已处理 0 文件");
    progress
}

/// 按文件名字典序递归遍历目录，对每个通过过滤的文件执行回调
///
/// 遍历错误（根目录不存在、无权限的子目录等）只记录日志，不中断遍历。
/// 不进入符号链接指向的目录。
pub fn scan_directory<F>(
    dir: &Path,
    filter: &FileFilter,
    options: WalkOptions,
    logger: &dyn LoggerTrait,
    error_logger: &ErrorLogger,
    mut callback: F,
) -> WalkStats
where
    F: FnMut(&Path),
{
    let mut stats = WalkStats::default();
    let progress = new_progress(options.show_progress);

    if logger.is_enabled() {
        let _ = logger.log_message(&format!("开始扫描目录: {}", dir.display()));
    }

    // 创建文件遍历器，默认关闭所有忽略规则
    let mut walker = WalkBuilder::new(dir);
    walker
        .standard_filters(false)
        .follow_links(false)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .sort_by_file_name(|a, b| a.cmp(b));

    for result in walker.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                if logger.is_enabled() {
                    let _ = logger.log_message(&format!("遍历错误: {}", err));
                }
                let _ = error_logger.log_error(ErrorType::Walk, None, "遍历错误", Some(err.to_string().as_str()));
                continue;
            }
        };

        // 只处理文件
        if !is_regular_file(&entry) {
            continue;
        }

        stats.visited += 1;
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        if !filter.should_process(entry.path()) {
            stats.filtered += 1;
            if logger.is_enabled() {
                let _ = logger.log_file(entry.path(), size, "已跳过(扩展名过滤)");
            }
            continue;
        }

        if logger.is_enabled() {
            let _ = logger.log_file(entry.path(), size, "正在处理");
        }

        callback(entry.path());

        progress.set_message(format!("已处理 {} 文件", stats.visited - stats.filtered));
        progress.tick();
    }

    progress.finish_with_message(format!("完成! 已处理 {} 文件", stats.visited - stats.filtered));

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::Logger;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn collect(dir: &Path, filter: &FileFilter) -> (Vec<PathBuf>, WalkStats) {
        let logger = Logger::new(false).unwrap();
        let error_logger = ErrorLogger::new(false).unwrap();
        let mut seen = Vec::new();
        let stats = scan_directory(dir, filter, WalkOptions::default(), &logger, &error_logger, |path| {
            seen.push(path.to_path_buf())
        });
        (seen, stats)
    }

    #[test]
    fn test_file_filter_creation() {
        let filter = FileFilter::new(vec![".py".to_string(), ".md".to_string(), ".py".to_string()]);
        assert_eq!(filter.extensions, vec![".py".to_string(), ".md".to_string()]);
    }

    #[test]
    fn test_extension_filtering() {
        let filter = FileFilter::new(vec![".py".to_string(), ".md".to_string()]);

        assert!(filter.matches_name("main.py"));
        assert!(filter.matches_name("README.md"));
        assert!(!filter.matches_name("README.MD"));
        assert!(!filter.matches_name("lib.rs"));
        assert!(!filter.matches_name("py"));
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = FileFilter::default();

        assert!(filter.matches_name("anything.bin"));
        assert!(filter.matches_name("Makefile"));
    }

    #[test]
    fn test_walk_is_sorted_and_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b_dir/nested")).unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("b_dir/z.txt"), "").unwrap();
        fs::write(dir.path().join("b_dir/nested/y.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden.txt"), "").unwrap();

        let (seen, stats) = collect(dir.path(), &FileFilter::default());

        let relative: Vec<String> = seen
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            relative,
            vec![".hidden.txt", "a.txt", "b_dir/nested/y.txt", "b_dir/z.txt", "c.txt"]
        );
        assert_eq!(stats.visited, 5);
        assert_eq!(stats.filtered, 0);
    }

    #[test]
    fn test_walk_applies_filter() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "").unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::write(dir.path().join("c.rs"), "").unwrap();

        let (seen, stats) = collect(dir.path(), &FileFilter::new(vec![".md".to_string()]));

        assert_eq!(seen, vec![dir.path().join("b.md")]);
        assert_eq!(stats.visited, 3);
        assert_eq!(stats.filtered, 2);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = tempdir().unwrap();
        let (seen, stats) = collect(&dir.path().join("does-not-exist"), &FileFilter::default());

        assert!(seen.is_empty());
        assert_eq!(stats, WalkStats::default());
    }
}
