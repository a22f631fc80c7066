//! # VASP OUTCAR 解析器
//!
//! 从 OUTCAR 中提取结构弛豫的完成状态与最终能量，供收敛判据使用。
//!
//! ## 依赖关系
//! - 被 `workflow/convergence.rs` 使用

use crate::error::{MpBulkError, Result};
use std::fs;
use std::path::Path;

const FINISHED_MARKER: &str = "General timing and accounting informations for this job";
const ACCURACY_MARKER: &str = "reached required accuracy";

/// OUTCAR 摘要
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcarSummary {
    /// 计算是否正常结束
    pub is_finished: bool,

    /// 离子弛豫是否达到收敛判据
    pub reached_accuracy: bool,

    /// 最后一步的 energy(sigma->0) (eV)
    pub final_energy: Option<f64>,

    /// 离子步数
    pub ionic_steps: usize,
}

/// 解析 VASP OUTCAR 文件
pub fn parse_outcar(path: &Path) -> Result<OutcarSummary> {
    let content = fs::read_to_string(path).map_err(|e| MpBulkError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(parse_outcar_content(&content))
}

/// 从字符串内容解析 OUTCAR
pub fn parse_outcar_content(content: &str) -> OutcarSummary {
    let mut summary = OutcarSummary::default();

    for line in content.lines() {
        if line.contains(FINISHED_MARKER) {
            summary.is_finished = true;
        }

        if line.contains(ACCURACY_MARKER) {
            summary.reached_accuracy = true;
        }

        // "  energy  without entropy=     -123.456789  energy(sigma->0) =     -123.456789"
        if line.contains("energy  without entropy") {
            if let Some(pos) = line.find("energy(sigma->0)") {
                if let Some(val) = extract_number_after(&line[pos..], "=") {
                    summary.final_energy = Some(val);
                    summary.ionic_steps += 1;
                }
            }
        }
    }

    summary
}

/// 从字符串中提取指定标记之后的数字
fn extract_number_after(s: &str, marker: &str) -> Option<f64> {
    let pos = s.find(marker)?;
    s[pos + marker.len()..].split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELAXED: &str = "\
  energy  without entropy=      -10.80000000  energy(sigma->0) =      -10.81000000
  energy  without entropy=      -10.84000000  energy(sigma->0) =      -10.84567890
 reached required accuracy - stopping structural energy minimisation
 General timing and accounting informations for this job:
";

    #[test]
    fn test_relaxed_outcar() {
        let summary = parse_outcar_content(RELAXED);

        assert!(summary.is_finished && summary.reached_accuracy);
        assert_eq!(summary.ionic_steps, 2);
        assert!((summary.final_energy.unwrap() + 10.8456789).abs() < 1e-9);
    }

    #[test]
    fn test_finished_without_accuracy_is_not_relaxed() {
        let summary = parse_outcar_content(
            "  energy  without entropy=  -1.0  energy(sigma->0) =  -1.1\n General timing and accounting informations for this job:\n",
        );

        assert!(summary.is_finished);
        assert!(!summary.reached_accuracy);
    }

    #[test]
    fn test_empty_outcar() {
        assert_eq!(parse_outcar_content(""), OutcarSummary::default());
    }
}
