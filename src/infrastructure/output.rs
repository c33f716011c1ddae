use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::application::ScanError;
use crate::domain::ResultSet;

/// 将结果集写成 JSON 数组，返回写入的字节数
///
/// 两空格缩进，字段顺序固定，非 ASCII 字符原样输出。空结果集写出 `[]`。
pub fn write_json(path: &Path, results: &ResultSet) -> Result<u64, ScanError> {
    let bytes = serde_json::to_vec_pretty(results).map_err(|source| ScanError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let file = File::create(path).map_err(|source| ScanError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .and_then(|_| writer.flush())
        .map_err(|source| ScanError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(bytes.len() as u64)
}
