//! # VASP KPOINTS 写出
//!
//! 按倒空间体积密度生成自动 k 点网格。
//!
//! ```text
//! Automatic kpoint scheme (grid density = 1200 / number of atoms)
//! 0
//! Gamma
//! 6 6 6
//! ```
//!
//! ## 依赖关系
//! - 被 `inputs/relax_set.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::Crystal;
use std::f64::consts::PI;
use std::fmt;

/// k 点网格类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpointStyle {
    Gamma,
    Monkhorst,
}

impl fmt::Display for KpointStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpointStyle::Gamma => write!(f, "Gamma"),
            KpointStyle::Monkhorst => write!(f, "Monkhorst"),
        }
    }
}

/// 自动 k 点网格
#[derive(Debug, Clone, PartialEq)]
pub struct Kpoints {
    pub style: KpointStyle,
    pub divisions: [usize; 3],
    /// 每原子 k 点数（写入注释行）
    pub kppa: f64,
}

impl Kpoints {
    /// 按每单位倒空间体积 `kppvol` 个 k 点生成网格
    pub fn automatic_density_by_volume(crystal: &Crystal, kppvol: f64) -> Self {
        let recip_volume = (2.0 * PI).powi(3) / crystal.lattice.volume().abs();
        let kppa = kppvol * recip_volume * crystal.num_atoms() as f64;
        Self::automatic_density(crystal, kppa)
    }

    /// 按每原子 k 点数 `kppa` 生成网格
    pub fn automatic_density(crystal: &Crystal, kppa: f64) -> Self {
        let mut kppa = kppa;
        // 恰为立方数时略微增大，避免舍入落在边界上
        if ((kppa.cbrt() + 0.5).floor().powi(3) - kppa).abs() < 1.0 {
            kppa += kppa * 0.01;
        }

        let lengths = crystal.lattice.lengths();
        let ngrid = kppa / crystal.num_atoms().max(1) as f64;
        let mult = (ngrid * lengths[0] * lengths[1] * lengths[2]).cbrt();

        let divisions = lengths.map(|l| (mult / l).max(1.0).floor() as usize);

        let has_odd = divisions.iter().any(|d| d % 2 == 1);
        let style = if has_odd || crystal.lattice.is_hexagonal() {
            KpointStyle::Gamma
        } else {
            KpointStyle::Monkhorst
        };

        Kpoints {
            style,
            divisions,
            kppa,
        }
    }
}

impl fmt::Display for Kpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Automatic kpoint scheme (grid density = {:.0} / number of atoms)",
            self.kppa
        )?;
        writeln!(f, "0")?;
        writeln!(f, "{}", self.style)?;
        writeln!(
            f,
            "{} {} {}",
            self.divisions[0], self.divisions[1], self.divisions[2]
        )
    }
}
