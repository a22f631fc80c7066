//! # VASP 输入集写出模块
//!
//! 为每个结构创建 `<formula>_<index>` 目录并写出 INCAR、KPOINTS、POSCAR
//! 以及 POTCAR（或 POTCAR.spec）。
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 使用
//! - 使用 `models/`, `parsers/`, `utils/progress.rs`
//! - 子模块: relax_set, potcar

pub mod potcar;
pub mod relax_set;

pub use relax_set::RelaxSet;

use crate::error::{MpBulkError, Result};
use crate::models::Crystal;
use crate::utils::progress;

use std::fs;
use std::path::{Path, PathBuf};

/// 已写出的输入目录
#[derive(Debug, Clone)]
pub struct WrittenInput {
    /// 在结构列表中的位置
    pub index: usize,
    /// 输入目录
    pub dir: PathBuf,
}

/// 结构目录名：化学式去空格后接序号
pub fn input_dir_name(crystal: &Crystal, index: usize) -> String {
    format!("{}_{}", crystal.formula(), index)
}

/// 将单个结构的弛豫输入集写入 `dir`
pub fn write_input_set(crystal: &Crystal, dir: &Path, potcar_dir: Option<&Path>) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| MpBulkError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })?;

    let set = RelaxSet::new(crystal);

    write_text(&dir.join("INCAR"), &set.incar().to_string())?;
    write_text(&dir.join("KPOINTS"), &set.kpoints().to_string())?;
    write_text(&dir.join("POSCAR"), &set.poscar())?;

    let symbols = set.potcar_symbols();
    match potcar_dir {
        Some(lib) => potcar::write_potcar(lib, &symbols, &dir.join("POTCAR"))?,
        None => potcar::write_potcar_spec(&symbols, &dir.join("POTCAR.spec"))?,
    }

    Ok(())
}

/// 批量写出输入集，目录不存在时自动创建
pub fn batch_write_input(
    crystals: &[Crystal],
    output_dir: &Path,
    potcar_dir: Option<&Path>,
) -> Result<Vec<WrittenInput>> {
    fs::create_dir_all(output_dir).map_err(|e| MpBulkError::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    let pb = progress::create_progress_bar(crystals.len() as u64, "Writing inputs");
    let mut written = Vec::with_capacity(crystals.len());

    for (index, crystal) in crystals.iter().enumerate() {
        let dir = output_dir.join(input_dir_name(crystal, index));
        write_input_set(crystal, &dir, potcar_dir)?;
        written.push(WrittenInput { index, dir });
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(written)
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| MpBulkError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};
    use tempfile::tempdir;

    fn nacl() -> Crystal {
        let lattice = Lattice::from_parameters(5.64, 5.64, 5.64, 90.0, 90.0, 90.0);
        Crystal::new(
            "NaCl",
            lattice,
            vec![Atom::new("Na", [0.0, 0.0, 0.0]), Atom::new("Cl", [0.5, 0.5, 0.5])],
        )
    }

    #[test]
    fn test_batch_write_creates_one_dir_per_structure() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("bulk");

        let written = batch_write_input(&[nacl(), nacl()], &out, None).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(written[0].dir, out.join("Na1Cl1_0"));
        assert_eq!(written[1].dir, out.join("Na1Cl1_1"));

        for w in &written {
            for name in ["INCAR", "KPOINTS", "POSCAR", "POTCAR.spec"] {
                assert!(w.dir.join(name).is_file(), "missing {}", name);
            }
            assert!(!w.dir.join("POTCAR").exists());
        }

        let spec = fs::read_to_string(out.join("Na1Cl1_0/POTCAR.spec")).unwrap();
        assert_eq!(spec, "Na_pv\nCl\n");

        let poscar = fs::read_to_string(out.join("Na1Cl1_0/POSCAR")).unwrap();
        assert_eq!(poscar.lines().nth(6).unwrap().split_whitespace().collect::<Vec<_>>(), vec!["1", "1"]);
    }

    #[test]
    fn test_rewrite_overwrites_existing_inputs() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("Na1Cl1_0");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("INCAR"), "STALE = 1\n").unwrap();

        write_input_set(&nacl(), &target, None).unwrap();

        let incar = fs::read_to_string(target.join("INCAR")).unwrap();
        assert!(!incar.contains("STALE"));
        assert!(incar.contains("ISIF = 3"));
    }

    #[test]
    fn test_potcar_from_library() {
        let lib = tempdir().unwrap();
        for symbol in ["Na_pv", "Cl"] {
            fs::create_dir_all(lib.path().join(symbol)).unwrap();
            fs::write(lib.path().join(symbol).join("POTCAR"), format!("{}\n", symbol)).unwrap();
        }

        let out = tempdir().unwrap();
        let target = out.path().join("job");
        write_input_set(&nacl(), &target, Some(lib.path())).unwrap();

        assert_eq!(
            fs::read_to_string(target.join("POTCAR")).unwrap(),
            "Na_pv\nCl\n"
        );
        assert!(!target.join("POTCAR.spec").exists());
    }
}
