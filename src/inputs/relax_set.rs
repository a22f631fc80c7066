//! # 体相结构弛豫参数集
//!
//! 为单个结构生成 INCAR / KPOINTS / POSCAR / POTCAR 符号。
//! 参数与 Materials Project 的弛豫计算设置一致：
//! PBE、520 eV 截断、ISIF = 3 全弛豫、自旋极化，
//! 含 O 或 F 的过渡金属化合物使用 GGA+U。
//!
//! ## 依赖关系
//! - 被 `inputs/mod.rs` 使用
//! - 使用 `parsers/incar.rs`, `parsers/kpoints.rs`, `parsers/poscar.rs`, `inputs/potcar.rs`

use super::potcar::potcar_symbol;
use crate::models::Crystal;
use crate::parsers::incar::Incar;
use crate::parsers::kpoints::Kpoints;
use crate::parsers::poscar::to_poscar_string;

/// 每单位倒空间体积的 k 点数
const RECIPROCAL_DENSITY: f64 = 64.0;

/// 每原子 EDIFF (eV)
const EDIFF_PER_ATOM: f64 = 5e-5;

/// 未列出元素的默认初始磁矩
const DEFAULT_MAGMOM: f64 = 0.6;

fn default_magmom(element: &str) -> f64 {
    match element {
        "Ce" | "Cr" | "Fe" | "Mn" | "Mo" | "Ni" | "V" | "W" => 5.0,
        "Eu" => 10.0,
        _ => DEFAULT_MAGMOM,
    }
}

/// 氧化物/氟化物中的 Hubbard U (eV)
fn hubbard_u(element: &str) -> Option<f64> {
    match element {
        "Co" => Some(3.32),
        "Cr" => Some(3.7),
        "Fe" => Some(5.3),
        "Mn" => Some(3.9),
        "Mo" => Some(4.38),
        "Ni" => Some(6.2),
        "V" => Some(3.25),
        "W" => Some(6.2),
        _ => None,
    }
}

/// 单个结构的弛豫输入集
#[derive(Debug, Clone)]
pub struct RelaxSet {
    /// 已按元素分组的结构
    crystal: Crystal,
}

impl RelaxSet {
    pub fn new(crystal: &Crystal) -> Self {
        RelaxSet {
            crystal: crystal.grouped_by_element(),
        }
    }

    /// 元素顺序（与 POSCAR 一致）
    fn elements(&self) -> Vec<String> {
        self.crystal
            .species()
            .into_iter()
            .map(|(el, _)| el)
            .collect()
    }

    /// 是否需要 GGA+U
    fn uses_hubbard_u(&self) -> bool {
        let elements = self.elements();
        let anion = elements.iter().any(|el| el == "O" || el == "F");
        anion && elements.iter().any(|el| hubbard_u(el).is_some())
    }

    pub fn incar(&self) -> Incar {
        let natoms = self.crystal.num_atoms();
        let mut incar = Incar::new();

        incar.set("ALGO", "Fast");
        // 四舍五入去掉浮点尾差，保证 EDIFF 写成 0.00015 这样的形式
        let ediff = (EDIFF_PER_ATOM * natoms as f64 * 1e10).round() / 1e10;
        incar.set("EDIFF", ediff);
        incar.set("ENCUT", 520_i64);
        incar.set("IBRION", 2_i64);
        incar.set("ICHARG", 1_i64);
        incar.set("ISIF", 3_i64);
        incar.set("ISMEAR", -5_i64);
        incar.set("ISPIN", 2_i64);
        incar.set("LASPH", true);
        incar.set("LORBIT", 11_i64);
        incar.set("LREAL", "Auto");
        incar.set("LWAVE", false);
        incar.set("NELM", 100_i64);
        incar.set("NSW", 99_i64);
        incar.set("PREC", "Accurate");
        incar.set("SIGMA", 0.05);

        let magmom: Vec<f64> = self
            .crystal
            .atoms
            .iter()
            .map(|a| a.magmom.unwrap_or_else(|| default_magmom(&a.element)))
            .collect();
        incar.set("MAGMOM", magmom);

        if self.uses_hubbard_u() {
            let elements = self.elements();
            let u: Vec<f64> = elements
                .iter()
                .map(|el| hubbard_u(el).unwrap_or(0.0))
                .collect();
            let l: Vec<i64> = elements
                .iter()
                .map(|el| if hubbard_u(el).is_some() { 2 } else { 0 })
                .collect();

            incar.set("LDAU", true);
            incar.set("LDAUTYPE", 2_i64);
            incar.set("LDAUPRINT", 1_i64);
            incar.set("LDAUU", u);
            incar.set("LDAUJ", vec![0.0; elements.len()]);
            incar.set("LDAUL", l);
            incar.set("LMAXMIX", 4_i64);
        }

        incar
    }

    pub fn kpoints(&self) -> Kpoints {
        Kpoints::automatic_density_by_volume(&self.crystal, RECIPROCAL_DENSITY)
    }

    pub fn poscar(&self) -> String {
        to_poscar_string(&self.crystal)
    }

    pub fn potcar_symbols(&self) -> Vec<String> {
        self.elements().iter().map(|el| potcar_symbol(el)).collect()
    }
}
