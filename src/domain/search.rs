use std::path::Path;

use anyhow::{Context, Result};
use grep_searcher::{BinaryDetection, Searcher, SearcherBuilder, Sink, SinkMatch};
use serde::{Deserialize, Serialize};

use super::matcher::{decode_line, LineMatcher};

/// 单条匹配记录
///
/// 字段顺序即 JSON 输出中的字段顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// 遍历时得到的路径，未做规范化
    pub file_path: String,
    /// 从 1 开始的物理行号
    pub line_number: u64,
    /// 去掉行尾换行符后的行内容
    pub line: String,
}

/// 一次扫描的全部匹配记录，按发现顺序排列，不去重
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<MatchRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, records: Vec<MatchRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 搜索结果接收器
struct RecordCollector {
    records: Vec<MatchRecord>,
    current_path: String,
}

impl Sink for RecordCollector {
    type Error = std::io::Error;

    fn matched(&mut self, _searcher: &Searcher, mat: &SinkMatch<'_>) -> Result<bool, Self::Error> {
        // 开启了行号，这里一定有值
        let line_number = mat.line_number().unwrap_or(0);

        self.records.push(MatchRecord {
            file_path: self.current_path.clone(),
            line_number,
            line: decode_line(mat.bytes()),
        });

        Ok(true)
    }
}

/// 在单个文件中搜索
///
/// 文件句柄只在本次调用内存活。打不开或读取失败时返回错误，由调用方决定如何处理。
pub fn search_in_file(path: &Path, matcher: &LineMatcher) -> Result<Vec<MatchRecord>> {
    let mut collector = RecordCollector {
        records: Vec::new(),
        current_path: path.to_string_lossy().into_owned(),
    };

    // 不做二进制检测，无法解码的字节在 decode_line 中替换
    let mut searcher = SearcherBuilder::new()
        .binary_detection(BinaryDetection::none())
        .line_number(true)
        .build();

    searcher
        .search_path(matcher, path, &mut collector)
        .with_context(|| format!("搜索文件失败: {}", path.display()))?;

    Ok(collector.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_line_numbers_count_every_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "first\nsecond\nTODO third\nfourth\nlast TODO").unwrap();

        let records = search_in_file(&path, &LineMatcher::new("TODO", false)).unwrap();

        let numbers: Vec<u64> = records.iter().map(|r| r.line_number).collect();
        assert_eq!(numbers, vec![3, 5]);
        assert_eq!(records[0].line, "TODO third");
        assert_eq!(records[1].line, "last TODO");
        assert_eq!(records[0].file_path, path.to_string_lossy());
    }

    #[test]
    fn test_crlf_lines_are_trimmed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("win.md");
        fs::write(&path, "a\r\n  TODO with spaces  \r\nb\r\n").unwrap();

        let records = search_in_file(&path, &LineMatcher::new("todo", true)).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_number, 2);
        assert_eq!(records[0].line, "  TODO with spaces  ");
    }

    #[test]
    fn test_invalid_utf8_does_not_abort() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        fs::write(&path, b"ok line\n\xff\xfe TODO broken\nTODO after\n").unwrap();

        let records = search_in_file(&path, &LineMatcher::new("TODO", false)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line_number, 2);
        assert!(records[0].line.ends_with("TODO broken"));
        assert_eq!(records[1].line, "TODO after");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.txt");

        assert!(search_in_file(&path, &LineMatcher::new("x", false)).is_err());
    }

    #[test]
    fn test_empty_term_matches_all_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("all.txt");
        fs::write(&path, "one\n\nthree\n").unwrap();

        let records = search_in_file(&path, &LineMatcher::new("", false)).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].line, "");
    }
}
