//! # Materials Project REST 客户端
//!
//! 通过 summary 接口批量获取结构：
//!
//! ```text
//! GET {endpoint}/materials/summary/?material_ids=mp-149,mp-13&_fields=material_id,structure
//! X-API-KEY: <key>
//! ```
//!
//! 返回的 `structure` 字段是 pymatgen `Structure.as_dict()` 格式的 JSON，
//! 这里只读取晶格矩阵、每个位点的元素/占据/分数坐标和磁矩。
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 构造，经由 `StructureSource` trait 被 `commands/generate.rs` 使用
//! - 使用 `reqwest` (blocking) 和 `serde_json`

use super::{MaterialId, StructureSource};
use crate::error::{MpBulkError, Result};
use crate::models::{Atom, Crystal, Lattice};

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// 默认 API 地址
pub const DEFAULT_ENDPOINT: &str = "https://api.materialsproject.org";

/// 单次请求的最大 id 数
const CHUNK_SIZE: usize = 50;

// ─────────────────────────────────────────────────────────────
// 响应结构
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    data: Vec<SummaryDoc>,
}

#[derive(Debug, Deserialize)]
struct SummaryDoc {
    material_id: String,
    structure: StructureDoc,
}

/// pymatgen Structure 字典（只取用到的字段）
#[derive(Debug, Deserialize)]
pub struct StructureDoc {
    lattice: LatticeDoc,
    sites: Vec<SiteDoc>,
}

#[derive(Debug, Deserialize)]
struct LatticeDoc {
    matrix: [[f64; 3]; 3],
}

#[derive(Debug, Deserialize)]
struct SiteDoc {
    species: Vec<SpeciesDoc>,
    abc: [f64; 3],
    #[serde(default)]
    properties: SiteProperties,
}

#[derive(Debug, Deserialize)]
struct SpeciesDoc {
    element: String,
    #[serde(default = "full_occupancy")]
    occu: f64,
}

#[derive(Debug, Default, Deserialize)]
struct SiteProperties {
    #[serde(default)]
    magmom: Option<f64>,
}

fn full_occupancy() -> f64 {
    1.0
}

impl StructureDoc {
    /// 转换为 `Crystal`；部分占据位点取占据最大的元素
    pub fn into_crystal(self, material_id: &str) -> Result<Crystal> {
        let lattice = Lattice::from_vectors(self.lattice.matrix);
        if lattice.is_degenerate() {
            return Err(MpBulkError::InvalidStructure(format!(
                "{}: degenerate lattice {:?}",
                material_id, lattice.matrix
            )));
        }

        let mut atoms = Vec::with_capacity(self.sites.len());

        for (i, site) in self.sites.into_iter().enumerate() {
            let species = site
                .species
                .into_iter()
                .max_by(|a, b| a.occu.partial_cmp(&b.occu).unwrap_or(std::cmp::Ordering::Equal))
                .ok_or_else(|| {
                    MpBulkError::InvalidStructure(format!(
                        "{}: site {} has no species",
                        material_id, i
                    ))
                })?;

            let atom = Atom::new(species.element, site.abc);
            atoms.push(match site.properties.magmom {
                Some(m) => atom.with_magmom(m),
                None => atom,
            });
        }

        if atoms.is_empty() {
            return Err(MpBulkError::InvalidStructure(format!(
                "{}: structure has no sites",
                material_id
            )));
        }

        let mut crystal = Crystal::new(material_id, lattice, atoms).with_material_id(material_id);
        crystal.name = crystal.formula();

        Ok(crystal)
    }
}

/// 按请求顺序整理返回的文档，缺失的 id 报错
fn order_by_request(
    ids: &[MaterialId],
    docs: Vec<SummaryDoc>,
) -> Result<Vec<Crystal>> {
    let mut by_id: HashMap<String, StructureDoc> = docs
        .into_iter()
        .map(|doc| (doc.material_id, doc.structure))
        .collect();

    let mut crystals: Vec<Crystal> = Vec::with_capacity(ids.len());
    let mut converted: HashMap<&str, usize> = HashMap::new();

    for id in ids {
        // 重复 id 复用已转换的结构
        if let Some(&idx) = converted.get(id.as_str()) {
            let copy = crystals[idx].clone();
            crystals.push(copy);
            continue;
        }

        let doc = by_id
            .remove(id.as_str())
            .ok_or_else(|| MpBulkError::UnknownIdentifier(id.to_string()))?;
        converted.insert(id.as_str(), crystals.len());
        crystals.push(doc.into_crystal(id.as_str())?);
    }

    Ok(crystals)
}

/// Materials Project 客户端
pub struct MaterialsProject {
    endpoint: String,
    api_key: String,
    http: reqwest::blocking::Client,
}

impl MaterialsProject {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("mpbulk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(MaterialsProject {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    fn fetch_chunk(&self, ids: &[MaterialId]) -> Result<Vec<SummaryDoc>> {
        let url = format!("{}/materials/summary/", self.endpoint);
        let joined = ids
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let limit = ids.len().to_string();

        let response = self
            .http
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .query(&[
                ("material_ids", joined.as_str()),
                ("_fields", "material_id,structure"),
                ("_limit", limit.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(MpBulkError::ApiError {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let body: SummaryResponse = serde_json::from_str(&response.text()?)?;
        Ok(body.data)
    }
}

impl StructureSource for MaterialsProject {
    fn fetch_structures(&self, ids: &[MaterialId]) -> Result<Vec<Crystal>> {
        let mut unique: Vec<MaterialId> = Vec::new();
        for id in ids {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }

        let mut docs = Vec::with_capacity(unique.len());
        for chunk in unique.chunks(CHUNK_SIZE) {
            docs.extend(self.fetch_chunk(chunk)?);
        }

        order_by_request(ids, docs)
    }
}
