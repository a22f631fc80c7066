//! # 结构清单
//!
//! 每次生成输入后在工作流目录写出 `structures.csv`，
//! 记录 material id 与结构目录的对应关系。

use crate::error::{MpBulkError, Result};

use serde::Serialize;
use std::path::Path;

/// 清单文件名
pub const MANIFEST_FILE: &str = "structures.csv";

/// 清单中的一行
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub index: usize,
    pub material_id: String,
    pub formula: String,
    pub num_atoms: usize,
    /// 超胞倍数，如 `2x2x1`
    pub supercell: String,
    pub directory: String,
}

/// 写出（覆盖）清单
pub fn write_manifest(dir: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    let mut wtr = csv::Writer::from_path(&path)?;

    for entry in entries {
        wtr.serialize(entry)?;
    }

    wtr.flush().map_err(|e| MpBulkError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_manifest_has_header_and_rows() {
        let dir = tempdir().unwrap();
        let entries = vec![ManifestEntry {
            index: 0,
            material_id: "mp-149".to_string(),
            formula: "Si16".to_string(),
            num_atoms: 16,
            supercell: "2x2x2".to_string(),
            directory: "Si16_0".to_string(),
        }];

        write_manifest(dir.path(), &entries).unwrap();

        let text = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(
            text,
            "index,material_id,formula,num_atoms,supercell,directory\n0,mp-149,Si16,16,2x2x2,Si16_0\n"
        );
    }
}
