//! # 数据模型模块
//!
//! 定义晶体结构与工作流配置/结果数据模型。
//!
//! ## 依赖关系
//! - 被 `mp/`, `inputs/`, `workflow/` 和 `commands/` 使用
//! - 子模块: structure, workflow

pub mod structure;
pub mod workflow;

pub use structure::{Atom, Crystal, Lattice};
pub use workflow::{ActionOutcome, WorkflowAction, WorkflowConfig};
