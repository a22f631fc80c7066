//! # 生成输入
//!
//! `-i/--gen_inputs` 的实现：
//! 1. 读取 MPIDS 并获取结构
//! 2. 按需扩展为超胞
//! 3. 在工作流目录下为每个结构写出弛豫输入集
//! 4. 给本次写出的 INCAR 追加 `NPAR = 2`, `ISYM = 0` 并记录 CONVERGENCE
//! 5. 写出结构清单，工作流状态置为未收敛
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `mp/`, `inputs/`, `workflow/`, `utils/`

use crate::error::{MpBulkError, Result};
use crate::inputs::{self, WrittenInput};
use crate::models::{ActionOutcome, Crystal, WorkflowConfig};
use crate::mp::{read_material_ids, StructureSource};
use crate::utils::{output, progress};
use crate::workflow::convergence::{
    append_convergence_record, append_incar_tags, write_workflow_status,
};
use crate::workflow::manifest::{write_manifest, ManifestEntry};
use crate::workflow::StructureScaler;

use std::fs;
use tabled::Tabled;

/// 追加到每个 INCAR 末尾的参数
pub const INCAR_TAGS: [&str; 2] = ["NPAR = 2", "ISYM = 0"];

/// CONVERGENCE 记录块标签
pub const RECORD_LABEL: &str = "MP_Bulk_Converge";

/// 输出表格行
#[derive(Debug, Clone, Tabled)]
struct GeneratedRow {
    #[tabled(rename = "Material")]
    material_id: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Atoms")]
    num_atoms: usize,
    #[tabled(rename = "Supercell")]
    supercell: String,
    #[tabled(rename = "Directory")]
    directory: String,
}

/// 执行输入生成
pub fn execute<S: StructureSource>(config: &WorkflowConfig, source: &S) -> Result<ActionOutcome> {
    output::print_header("Generating Bulk Relaxation Inputs");

    let workflow_dir = config.workflow_path();
    fs::create_dir_all(&workflow_dir).map_err(|e| MpBulkError::FileWriteError {
        path: workflow_dir.display().to_string(),
        source: e,
    })?;

    let ids = read_material_ids(&config.mpids_path())?;
    output::print_info(&format!(
        "Read {} material ids from {}",
        ids.len(),
        config.mpids_path().display()
    ));

    if config.api_key.is_empty() {
        output::print_warning("No Materials Project API key set (use --api-key or MP_API_KEY)");
    }

    let spinner = progress::create_spinner("Fetching structures from Materials Project...");
    let fetched = source.fetch_structures(&ids);
    spinner.finish_and_clear();
    let crystals = fetched?;

    // 超胞
    let (crystals, supercells): (Vec<Crystal>, Vec<[usize; 3]>) = if config.scale {
        let scaler = StructureScaler::new(config.min_length)?;
        output::print_info(&format!(
            "Scaling to supercells with lattice vectors >= {:.1} Å",
            config.min_length
        ));
        crystals
            .iter()
            .map(|c| scaler.scale(c))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip()
    } else {
        let n = crystals.len();
        (crystals, vec![[1, 1, 1]; n])
    };

    let written = inputs::batch_write_input(&crystals, &workflow_dir, config.potcar_dir.as_deref())?;

    for input in &written {
        let prior = append_incar_tags(&input.dir.join("INCAR"), &INCAR_TAGS)?;
        append_convergence_record(&input.dir, 0, RECORD_LABEL, &prior, &INCAR_TAGS)?;
    }

    let entries = manifest_entries(&crystals, &supercells, &written);
    write_manifest(&workflow_dir, &entries)?;
    write_workflow_status(&workflow_dir, false)?;

    let rows: Vec<GeneratedRow> = entries
        .into_iter()
        .map(|e| GeneratedRow {
            material_id: e.material_id,
            formula: e.formula,
            num_atoms: e.num_atoms,
            supercell: e.supercell,
            directory: e.directory,
        })
        .collect();
    println!();
    output::print_table(&rows);
    println!();

    if config.potcar_dir.is_none() {
        output::print_warning(
            "No POTCAR library given (--potcar-dir or VASP_PSP_DIR); wrote POTCAR.spec instead",
        );
    }

    output::print_done(&format!(
        "Wrote {} input sets to {}",
        written.len(),
        workflow_dir.display()
    ));

    Ok(ActionOutcome::Generated {
        structures: written.len(),
    })
}

fn manifest_entries(
    crystals: &[Crystal],
    supercells: &[[usize; 3]],
    written: &[WrittenInput],
) -> Vec<ManifestEntry> {
    written
        .iter()
        .map(|w| {
            let crystal = &crystals[w.index];
            let [a, b, c] = supercells[w.index];
            ManifestEntry {
                index: w.index,
                material_id: crystal.material_id.clone().unwrap_or_default(),
                formula: crystal.formula(),
                num_atoms: crystal.num_atoms(),
                supercell: format!("{}x{}x{}", a, b, c),
                directory: w
                    .dir
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            }
        })
        .collect()
}
