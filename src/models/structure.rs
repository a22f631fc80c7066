//! # 晶体结构数据模型
//!
//! 定义统一的晶体结构表示：从 Materials Project 获取，经过可选的超胞缩放，
//! 最终写成 VASP 输入文件。
//!
//! ## 依赖关系
//! - 被 `mp/`, `workflow/`, `inputs/`, `parsers/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    #[cfg(test)]
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let cos_gamma = gamma.to_radians().cos();
        let sin_gamma = gamma.to_radians().sin();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();

        Lattice {
            matrix: [a_vec, b_vec, [c1, c2, c3]],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 三个晶格向量的长度 (a, b, c)
    pub fn lengths(&self) -> [f64; 3] {
        let norm = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        [
            norm(self.matrix[0]),
            norm(self.matrix[1]),
            norm(self.matrix[2]),
        ]
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;
        let [a, b, c] = self.lengths();

        let dot = |x: [f64; 3], y: [f64; 3]| x[0] * y[0] + x[1] * y[1] + x[2] * y[2];

        let alpha = (dot(b_vec, c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(a_vec, c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(a_vec, b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（有符号，取决于向量手性）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 晶格向量长度或体积接近零（或非有限值）
    pub fn is_degenerate(&self) -> bool {
        const EPS: f64 = 1e-8;
        let volume = self.volume().abs();
        !volume.is_finite()
            || volume < EPS
            || self.lengths().iter().any(|&l| !l.is_finite() || l < EPS)
    }

    /// 是否为六方晶格：两个直角、一个 60°/120° 角，且直角对应的两边等长
    pub fn is_hexagonal(&self) -> bool {
        const ANGLE_TOL: f64 = 5.0;
        const LENGTH_TOL: f64 = 0.01;

        let (a, b, c, alpha, beta, gamma) = self.parameters();
        let lengths = [a, b, c];
        let angles = [alpha, beta, gamma];

        let right: Vec<usize> = (0..3)
            .filter(|&i| (angles[i] - 90.0).abs() < ANGLE_TOL)
            .collect();
        let hex = (0..3)
            .filter(|&i| {
                (angles[i] - 60.0).abs() < ANGLE_TOL || (angles[i] - 120.0).abs() < ANGLE_TOL
            })
            .count();

        right.len() == 2 && hex == 1 && (lengths[right[0]] - lengths[right[1]]).abs() < LENGTH_TOL
    }
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],

    /// 可选：初始磁矩（来自数据库的 site properties）
    pub magmom: Option<f64>,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
            magmom: None,
        }
    }

    pub fn with_magmom(mut self, magmom: f64) -> Self {
        self.magmom = Some(magmom);
        self
    }
}

/// 晶体结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// Materials Project 编号（如 mp-149）
    pub material_id: Option<String>,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            material_id: None,
            lattice,
            atoms,
        }
    }

    pub fn with_material_id(mut self, id: impl Into<String>) -> Self {
        self.material_id = Some(id.into());
        self
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// 按首次出现顺序统计元素及其数目
    pub fn species(&self) -> Vec<(String, usize)> {
        let mut species: Vec<(String, usize)> = Vec::new();
        for atom in &self.atoms {
            match species.iter_mut().find(|(el, _)| *el == atom.element) {
                Some((_, count)) => *count += 1,
                None => species.push((atom.element.clone(), 1)),
            }
        }
        species
    }

    /// 计算化学式（显式计数，无空格，如 `Fe4O6`）
    pub fn formula(&self) -> String {
        self.species()
            .into_iter()
            .map(|(el, count)| format!("{}{}", el, count))
            .collect()
    }

    /// 将同种元素的原子排列在一起（元素顺序为首次出现顺序）
    ///
    /// POSCAR、POTCAR、MAGMOM 与 LDAU 数组都依赖这一顺序。
    pub fn grouped_by_element(&self) -> Crystal {
        let mut atoms = Vec::with_capacity(self.atoms.len());
        for (element, _) in self.species() {
            atoms.extend(self.atoms.iter().filter(|a| a.element == element).cloned());
        }
        Crystal {
            atoms,
            ..self.clone()
        }
    }

    /// 构造对角超胞，`scaling[i]` 为第 i 个晶格向量的倍数
    pub fn make_supercell(&self, scaling: [usize; 3]) -> Crystal {
        let n = scaling.map(|s| s.max(1));

        let mut matrix = self.lattice.matrix;
        for (row, &factor) in matrix.iter_mut().zip(n.iter()) {
            for x in row.iter_mut() {
                *x *= factor as f64;
            }
        }

        let mut atoms = Vec::with_capacity(self.atoms.len() * n[0] * n[1] * n[2]);
        for atom in &self.atoms {
            for i in 0..n[0] {
                for j in 0..n[1] {
                    for k in 0..n[2] {
                        let p = atom.position;
                        atoms.push(Atom {
                            element: atom.element.clone(),
                            position: [
                                (p[0] + i as f64) / n[0] as f64,
                                (p[1] + j as f64) / n[1] as f64,
                                (p[2] + k as f64) / n[2] as f64,
                            ],
                            magmom: atom.magmom,
                        });
                    }
                }
            }
        }

        Crystal {
            name: self.name.clone(),
            material_id: self.material_id.clone(),
            lattice: Lattice::from_vectors(matrix),
            atoms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rocksalt() -> Crystal {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let atoms = vec![
            Atom::new("Na", [0.0, 0.0, 0.0]),
            Atom::new("Cl", [0.5, 0.0, 0.0]),
            Atom::new("Na", [0.5, 0.5, 0.0]),
            Atom::new("Cl", [0.0, 0.5, 0.0]),
        ];
        Crystal::new("NaCl", lattice, atoms)
    }

    #[test]
    fn test_lattice_from_parameters_cubic() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 5.0).abs() < 1e-6);
        assert!((b - 5.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_volume_cubic() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);

        // 5^3 = 125
        assert!((lattice.volume().abs() - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_hexagonal_detection() {
        let hex = Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 120.0);
        let cubic = Lattice::from_parameters(3.0, 3.0, 3.0, 90.0, 90.0, 90.0);

        assert!(hex.is_hexagonal());
        assert!(!cubic.is_hexagonal());
    }

    #[test]
    fn test_lattice_degenerate_detection() {
        let flat = Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 0.0]]);
        let coplanar = Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [2.0, 2.0, 0.0]]);
        let nan = Lattice::from_vectors([[f64::NAN, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]);

        assert!(flat.is_degenerate());
        assert!(coplanar.is_degenerate());
        assert!(nan.is_degenerate());
        assert!(!Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0).is_degenerate());
    }

    #[test]
    fn test_formula_keeps_first_appearance_order() {
        assert_eq!(rocksalt().formula(), "Na2Cl2");
    }

    #[test]
    fn test_grouped_by_element() {
        let grouped = rocksalt().grouped_by_element();
        let elements: Vec<&str> = grouped.atoms.iter().map(|a| a.element.as_str()).collect();

        assert_eq!(elements, vec!["Na", "Na", "Cl", "Cl"]);
        assert_eq!(grouped.atoms[1].position, [0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_make_supercell() {
        let crystal = rocksalt();
        let supercell = crystal.make_supercell([2, 1, 1]);

        assert_eq!(supercell.num_atoms(), 8);
        assert!((supercell.lattice.lengths()[0] - 10.0).abs() < 1e-9);
        assert!(
            (supercell.lattice.volume().abs() - 2.0 * crystal.lattice.volume().abs()).abs() < 1e-6
        );

        // 所有分数坐标仍落在 [0, 1)
        assert!(supercell
            .atoms
            .iter()
            .all(|a| a.position.iter().all(|&x| (0.0..1.0).contains(&x))));
        assert_eq!(supercell.atoms[1].position, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_supercell_keeps_magmom() {
        let lattice = Lattice::from_parameters(2.87, 2.87, 2.87, 90.0, 90.0, 90.0);
        let crystal = Crystal::new(
            "Fe",
            lattice,
            vec![Atom::new("Fe", [0.0, 0.0, 0.0]).with_magmom(2.2)],
        );

        let supercell = crystal.make_supercell([2, 2, 2]);
        assert!(supercell.atoms.iter().all(|a| a.magmom == Some(2.2)));
    }
}
