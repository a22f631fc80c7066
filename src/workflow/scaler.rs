//! # 结构缩放
//!
//! 把原胞扩展为对角超胞，使每个晶格向量长度不小于 `min_length`，
//! 以便与同尺寸的缺陷（如氧空位）超胞计算直接比较。
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{MpBulkError, Result};
use crate::models::{Crystal, Lattice};

/// 超胞原子数上限
pub const MAX_SUPERCELL_ATOMS: usize = 100_000;

/// 超胞缩放器
#[derive(Debug, Clone, Copy)]
pub struct StructureScaler {
    min_length: f64,
}

impl StructureScaler {
    pub fn new(min_length: f64) -> Result<Self> {
        if !min_length.is_finite() || min_length <= 0.0 {
            return Err(MpBulkError::InvalidArgument(format!(
                "minimum supercell length must be positive, got {}",
                min_length
            )));
        }
        Ok(StructureScaler { min_length })
    }

    /// 每个晶格向量的倍数
    pub fn scaling_matrix(&self, lattice: &Lattice) -> Result<[usize; 3]> {
        if lattice.is_degenerate() {
            return Err(MpBulkError::InvalidStructure(format!(
                "cannot scale degenerate lattice {:?}",
                lattice.matrix
            )));
        }

        let mut matrix = [1; 3];
        for (n, l) in matrix.iter_mut().zip(lattice.lengths()) {
            let ratio = (self.min_length / l).ceil();
            // 单个方向的倍数已超过原子数上限时不必再算
            if ratio > MAX_SUPERCELL_ATOMS as f64 {
                return Err(MpBulkError::InvalidArgument(format!(
                    "minimum length {} Å needs a {}x multiple of a {:.3} Å lattice vector",
                    self.min_length, ratio, l
                )));
            }
            *n = (ratio as usize).max(1);
        }
        Ok(matrix)
    }

    /// 扩展为超胞，同时返回所用倍数
    pub fn scale(&self, crystal: &Crystal) -> Result<(Crystal, [usize; 3])> {
        let matrix = self.scaling_matrix(&crystal.lattice)?;

        let natoms = matrix
            .iter()
            .try_fold(crystal.num_atoms(), |acc, &n| acc.checked_mul(n));
        match natoms {
            Some(n) if n <= MAX_SUPERCELL_ATOMS => {}
            _ => {
                return Err(MpBulkError::InvalidArgument(format!(
                    "{}x{}x{} supercell of {} exceeds {} atoms",
                    matrix[0],
                    matrix[1],
                    matrix[2],
                    crystal.formula(),
                    MAX_SUPERCELL_ATOMS
                )))
            }
        }

        Ok((crystal.make_supercell(matrix), matrix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Atom;

    fn silicon() -> Crystal {
        Crystal::new(
            "Si",
            Lattice::from_vectors([[5.43, 0.0, 0.0], [0.0, 5.43, 0.0], [0.0, 0.0, 5.43]]),
            vec![Atom::new("Si", [0.0, 0.0, 0.0]), Atom::new("Si", [0.25, 0.25, 0.25])],
        )
    }

    #[test]
    fn test_scaling_matrix() {
        let scaler = StructureScaler::new(10.0).unwrap();
        let lattice = Lattice::from_vectors([[3.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 12.0]]);

        assert_eq!(scaler.scaling_matrix(&lattice).unwrap(), [4, 2, 1]);
    }

    #[test]
    fn test_exact_multiple_is_not_rounded_up() {
        let scaler = StructureScaler::new(10.0).unwrap();
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 2.5]]);

        assert_eq!(scaler.scaling_matrix(&lattice).unwrap(), [2, 1, 4]);
    }

    #[test]
    fn test_scale_multiplies_atoms() {
        let scaler = StructureScaler::new(8.0).unwrap();

        let (scaled, matrix) = scaler.scale(&silicon()).unwrap();
        assert_eq!(matrix, [2, 2, 2]);
        assert_eq!(scaled.num_atoms(), 16);
        assert!(scaled.lattice.lengths().iter().all(|&l| l >= 8.0));
    }

    #[test]
    fn test_rejects_non_positive_length() {
        assert!(StructureScaler::new(0.0).is_err());
        assert!(StructureScaler::new(f64::NAN).is_err());
    }

    #[test]
    fn test_huge_min_length_is_an_error() {
        let scaler = StructureScaler::new(1.0e7).unwrap();

        assert!(matches!(
            scaler.scale(&silicon()),
            Err(MpBulkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_atom_count_cap() {
        // 每个方向 40 倍：2 * 40^3 = 128000 个原子
        let scaler = StructureScaler::new(5.43 * 39.5).unwrap();

        assert_eq!(scaler.scaling_matrix(&silicon().lattice).unwrap(), [40, 40, 40]);
        assert!(matches!(
            scaler.scale(&silicon()),
            Err(MpBulkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_length_vector_is_rejected() {
        let scaler = StructureScaler::new(10.0).unwrap();
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 0.0]]);

        assert!(matches!(
            scaler.scaling_matrix(&lattice),
            Err(MpBulkError::InvalidStructure(_))
        ));
    }
}
