//! # 工作流模块
//!
//! 生成输入前后的簿记：结构缩放、收敛记录与收敛判据、结构清单。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`, `parsers/outcar.rs`
//! - 子模块: convergence, manifest, scaler

pub mod convergence;
pub mod manifest;
pub mod scaler;

pub use convergence::{ConvergencePredicate, TaskConvergence};
pub use scaler::StructureScaler;
