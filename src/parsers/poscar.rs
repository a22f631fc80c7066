//! # VASP POSCAR 写出
//!
//! 写出 VASP 5 格式的 POSCAR（带元素行、分数坐标）。
//!
//! ## POSCAR 格式说明
//! ```text
//! Fe4O6                  # comment line (formula)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Fe O                   # element symbols
//! 4 6                    # number of atoms per element
//! Direct                 # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `inputs/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::Crystal;

/// 将 Crystal 转换为 POSCAR 格式字符串
///
/// 原子按元素分组写出，元素顺序为首次出现顺序。
pub fn to_poscar_string(crystal: &Crystal) -> String {
    let grouped = crystal.grouped_by_element();
    let species = grouped.species();

    let mut result = String::new();
    result.push_str(&format!("{}\n", crystal.name));
    result.push_str("1.0\n");

    for row in &grouped.lattice.matrix {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    let elements: Vec<&str> = species.iter().map(|(el, _)| el.as_str()).collect();
    let counts: Vec<String> = species.iter().map(|(_, n)| n.to_string()).collect();
    result.push_str(&format!("   {}\n", elements.join("   ")));
    result.push_str(&format!("   {}\n", counts.join("   ")));
    result.push_str("Direct\n");

    for atom in &grouped.atoms {
        let p = atom.position;
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10} {}\n",
            p[0], p[1], p[2], atom.element
        ));
    }

    result
}
