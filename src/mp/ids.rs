//! # material id 列表读取
//!
//! 列表文件格式：每行一个 id，空行和 `#` 开头的行被忽略，
//! 每行只取第一个空白分隔的字段。
//!
//! ```text
//! # oxides
//! mp-19770   Fe2O3
//! mp-149
//! ```

use crate::error::{MpBulkError, Result};

use regex::Regex;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(mp|mvc)-\d+$").unwrap());

/// Materials Project 编号
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaterialId(String);

impl MaterialId {
    /// 校验并创建 id，格式不符时返回 `None`
    pub fn parse(s: &str) -> Option<Self> {
        ID_PATTERN.is_match(s).then(|| MaterialId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 读取 material id 列表文件
pub fn read_material_ids(path: &Path) -> Result<Vec<MaterialId>> {
    if !path.exists() {
        return Err(MpBulkError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path).map_err(|e| MpBulkError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut ids = Vec::new();

    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| MpBulkError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let token = match line.split_whitespace().next() {
            Some(t) if !t.starts_with('#') => t,
            _ => continue,
        };

        let id = MaterialId::parse(token).ok_or_else(|| MpBulkError::InvalidIdentifier {
            id: token.to_string(),
            path: path.display().to_string(),
            line: lineno + 1,
        })?;
        ids.push(id);
    }

    if ids.is_empty() {
        return Err(MpBulkError::EmptyIdentifierList {
            path: path.display().to_string(),
        });
    }

    Ok(ids)
}
