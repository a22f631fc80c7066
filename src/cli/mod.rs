//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 命令结构
//! 三个动作标志按顺序检查，第一个出现的生效：
//! - `-i/--gen_inputs`: 生成 VASP 输入
//! - `-c/--converged`: 检查工作流收敛
//! - `-r/--rerun`: 重跑（VASP 工作流不适用）
//! - 无标志时等同于 `--rerun`
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 构造 `models/workflow.rs` 中的 `WorkflowConfig`

use crate::error::{MpBulkError, Result};
use crate::models::workflow::{
    WorkflowAction, WorkflowConfig, DEFAULT_MIN_LENGTH, DEFAULT_MPIDS_FILE, DEFAULT_WORKFLOW_NAME,
};
use crate::mp::client::DEFAULT_ENDPOINT;

use clap::Parser;
use std::path::PathBuf;

/// mpbulk - Materials Project 体相弛豫工作流
#[derive(Parser, Debug)]
#[command(name = "mpbulk")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Prepare VASP bulk relaxation inputs from Materials Project structures", long_about = None)]
pub struct Cli {
    /// Generates inputs for workflow.
    #[arg(short = 'i', long = "gen_inputs", default_value_t = false)]
    pub gen_inputs: bool,

    /// Checks for convergence of workflow.
    #[arg(short = 'c', long = "converged", default_value_t = false)]
    pub converged: bool,

    /// Reruns workflow. This does nothing for a VASP workflow.
    #[arg(short = 'r', long = "rerun", default_value_t = false)]
    pub rerun: bool,

    // ─────────────────────────────────────────────────────────────
    // Input generation options
    // ─────────────────────────────────────────────────────────────
    /// File containing Materials Project ids, one per line
    #[arg(long, default_value = DEFAULT_MPIDS_FILE)]
    pub mpids: PathBuf,

    /// Materials Project API key
    #[arg(long, env = "MP_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Materials Project API endpoint
    #[arg(long, env = "MP_API_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Name of the workflow directory
    #[arg(long, default_value = DEFAULT_WORKFLOW_NAME)]
    pub workflow_name: String,

    /// Keep primitive cells instead of expanding to supercells
    #[arg(long, default_value_t = false)]
    pub no_scale: bool,

    /// Minimum supercell lattice vector length in Å
    #[arg(long, default_value_t = DEFAULT_MIN_LENGTH)]
    pub min_length: f64,

    /// POTCAR library directory (<dir>/<symbol>/POTCAR)
    #[arg(long, env = "VASP_PSP_DIR")]
    pub potcar_dir: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────
    // Location
    // ─────────────────────────────────────────────────────────────
    /// Working directory (defaults to the current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl Cli {
    /// 选中的动作：按 -i, -c, -r 顺序，第一个生效
    pub fn action(&self) -> WorkflowAction {
        match (self.gen_inputs, self.converged, self.rerun) {
            (true, _, _) => WorkflowAction::GenerateInputs,
            (false, true, _) => WorkflowAction::CheckConvergence,
            (false, false, true) => WorkflowAction::Rerun,
            // 无标志
            (false, false, false) => WorkflowAction::Rerun,
        }
    }

    /// 构造本次调用的配置
    pub fn config(&self) -> Result<WorkflowConfig> {
        let root = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| MpBulkError::FileReadError {
                path: ".".to_string(),
                source: e,
            })?,
        };

        let mut config = WorkflowConfig::new(root);
        config.workflow_name = self.workflow_name.clone();
        config.mpids_file = self.mpids.clone();
        config.api_key = self.api_key.clone();
        config.endpoint = self.endpoint.clone();
        config.scale = !self.no_scale;
        config.min_length = self.min_length;
        config.potcar_dir = self.potcar_dir.clone();
        Ok(config)
    }
}
