//! # VASP 文件格式模块
//!
//! VASP 输入文件的写出与输出文件的解析。
//!
//! ## 依赖关系
//! - 被 `inputs/` 和 `workflow/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, incar, kpoints, outcar

pub mod incar;
pub mod kpoints;
pub mod outcar;
pub mod poscar;
