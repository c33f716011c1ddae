use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use humansize::{format_size, BINARY};

use crate::application::ScanReport;

/// 格式化文件大小
pub fn format_file_size(size: u64) -> String {
    format_size(size, BINARY)
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 搜索完成提示
pub fn completion_message(output_path: &Path) -> String {
    format!("✅ 搜索完成！结果已写入 {}", output_path.display())
}

/// 搜索摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    pub duration: Duration,
    pub total_files: u64,
    pub filtered_files: u64,
    pub unreadable_files: u64,
    pub matched_files: u64,
    pub total_matches: u64,
    pub output_size: u64,
}

impl From<&ScanReport> for SearchSummary {
    fn from(report: &ScanReport) -> Self {
        Self {
            duration: report.duration,
            total_files: report.files_searched,
            filtered_files: report.files_filtered,
            unreadable_files: report.files_unreadable,
            matched_files: report.matched_files,
            total_matches: report.total_matches,
            output_size: report.output_size,
        }
    }
}

impl SearchSummary {
    /// 摘要的各行文本
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("总用时: {}", format_duration(self.duration)),
            format!("扫描文件: {}", self.total_files),
            format!("扩展名过滤: {}", self.filtered_files),
        ];
        if self.unreadable_files > 0 {
            lines.push(format!("无法读取: {}", self.unreadable_files));
        }
        lines.push(format!("匹配文件: {}", self.matched_files));
        lines.push(format!("匹配项数: {}", self.total_matches));
        lines.push(format!("结果大小: {}", format_file_size(self.output_size)));
        lines
    }

    pub fn print(&self) -> Result<()> {
        let mut stdout = io::stdout().lock();

        writeln!(stdout, "\n搜索摘要:")?;
        writeln!(stdout, "----------------------------")?;
        for line in self.lines() {
            writeln!(stdout, "{}", line)?;
        }

        Ok(())
    }
}
