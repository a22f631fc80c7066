//! # Materials Project 模块
//!
//! 读取 material id 列表并从 Materials Project 获取晶体结构。
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 使用
//! - 使用 `models/structure.rs`
//! - 子模块: ids, client

pub mod client;
pub mod ids;

pub use client::MaterialsProject;
pub use ids::{read_material_ids, MaterialId};

use crate::error::Result;
use crate::models::Crystal;

/// 结构来源：按 id 顺序返回对应结构
pub trait StructureSource {
    fn fetch_structures(&self, ids: &[MaterialId]) -> Result<Vec<Crystal>>;
}
