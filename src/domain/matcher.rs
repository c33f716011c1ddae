use bstr::ByteSlice;
use grep_matcher::{Match, Matcher, NoCaptures, NoError};

/// 判断一行文本是否包含搜索词
///
/// 忽略大小写时两边都经 `str::to_lowercase` 折叠后再比较。
/// 该转换与区域设置无关，非 ASCII 字符的折叠结果以标准库的 Unicode 小写映射为准。
/// 空搜索词匹配任意行。
pub fn matches(line: &str, term: &str, ignore_case: bool) -> bool {
    LineMatcher::new(term, ignore_case).is_match(line)
}

/// 将一行原始字节解码为文本
///
/// 去掉行尾的换行符和回车符，无效的 UTF-8 字节替换为 U+FFFD，不会报错。
pub fn decode_line(bytes: &[u8]) -> String {
    bytes
        .trim_end_with(|c| c == '\n' || c == '\r')
        .to_str_lossy()
        .into_owned()
}

/// 字面量子串匹配器
///
/// 折叠后的搜索词只计算一次，整个扫描过程复用。
#[derive(Debug, Clone)]
pub struct LineMatcher {
    term: String,
    ignore_case: bool,
}

impl LineMatcher {
    pub fn new(term: &str, ignore_case: bool) -> Self {
        let term = if ignore_case {
            term.to_lowercase()
        } else {
            term.to_string()
        };
        Self { term, ignore_case }
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn is_match(&self, line: &str) -> bool {
        if self.ignore_case {
            line.to_lowercase().contains(&self.term)
        } else {
            line.contains(&self.term)
        }
    }
}

// 供 grep-searcher 逐行调用；匹配时返回整行范围
impl Matcher for LineMatcher {
    type Captures = NoCaptures;
    type Error = NoError;

    fn find_at(&self, haystack: &[u8], at: usize) -> Result<Option<Match>, NoError> {
        let rest = haystack.get(at..).unwrap_or(&[]);
        if self.is_match(&decode_line(rest)) {
            Ok(Some(Match::new(at.min(haystack.len()), haystack.len())))
        } else {
            Ok(None)
        }
    }

    fn new_captures(&self) -> Result<NoCaptures, NoError> {
        Ok(NoCaptures::new())
    }
}
