//! # POTCAR 处理
//!
//! 弛豫参数集为每个元素指定的赝势符号，以及从赝势库拼接 POTCAR。
//! 未提供赝势库时写出 `POTCAR.spec`（每行一个符号），由用户自行准备。
//!
//! ## 依赖关系
//! - 被 `inputs/mod.rs` 使用

use crate::error::{MpBulkError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// 元素对应的赝势符号
pub fn potcar_symbol(element: &str) -> String {
    let symbol = match element {
        "Ba" => "Ba_sv",
        "Be" => "Be_sv",
        "Ca" => "Ca_sv",
        "Cr" => "Cr_pv",
        "Cs" => "Cs_sv",
        "Cu" => "Cu_pv",
        "Dy" => "Dy_3",
        "Er" => "Er_3",
        "Fe" => "Fe_pv",
        "Ga" => "Ga_d",
        "Ge" => "Ge_d",
        "Hf" => "Hf_pv",
        "Ho" => "Ho_3",
        "In" => "In_d",
        "K" => "K_sv",
        "Li" => "Li_sv",
        "Lu" => "Lu_3",
        "Mg" => "Mg_pv",
        "Mn" => "Mn_pv",
        "Mo" => "Mo_pv",
        "Na" => "Na_pv",
        "Nb" => "Nb_pv",
        "Nd" => "Nd_3",
        "Ni" => "Ni_pv",
        "Os" => "Os_pv",
        "Pb" => "Pb_d",
        "Pm" => "Pm_3",
        "Pr" => "Pr_3",
        "Rb" => "Rb_sv",
        "Re" => "Re_pv",
        "Rh" => "Rh_pv",
        "Ru" => "Ru_pv",
        "Sc" => "Sc_sv",
        "Sm" => "Sm_3",
        "Sn" => "Sn_d",
        "Sr" => "Sr_sv",
        "Ta" => "Ta_pv",
        "Tb" => "Tb_3",
        "Tc" => "Tc_pv",
        "Ti" => "Ti_pv",
        "Tl" => "Tl_d",
        "Tm" => "Tm_3",
        "V" => "V_pv",
        "W" => "W_pv",
        "Y" => "Y_sv",
        "Yb" => "Yb_2",
        "Zr" => "Zr_sv",
        other => other,
    };
    symbol.to_string()
}

/// 从赝势库 `<dir>/<symbol>/POTCAR` 拼接写出 POTCAR
pub fn write_potcar(potcar_dir: &Path, symbols: &[String], dest: &Path) -> Result<()> {
    let mut out = File::create(dest).map_err(|e| MpBulkError::FileWriteError {
        path: dest.display().to_string(),
        source: e,
    })?;

    for symbol in symbols {
        let src = potcar_dir.join(symbol).join("POTCAR");
        if !src.exists() {
            return Err(MpBulkError::FileNotFound {
                path: src.display().to_string(),
            });
        }

        let content = fs::read(&src).map_err(|e| MpBulkError::FileReadError {
            path: src.display().to_string(),
            source: e,
        })?;

        out.write_all(&content)
            .map_err(|e| MpBulkError::FileWriteError {
                path: dest.display().to_string(),
                source: e,
            })?;
    }

    Ok(())
}

/// 写出 POTCAR.spec
pub fn write_potcar_spec(symbols: &[String], dest: &Path) -> Result<()> {
    let mut content = symbols.join("\n");
    content.push('\n');

    fs::write(dest, content).map_err(|e| MpBulkError::FileWriteError {
        path: dest.display().to_string(),
        source: e,
    })
}
