//! # 工作流配置与动作模型
//!
//! 一次调用的全部参数收拢在 `WorkflowConfig` 中，随调用传入各命令；
//! 三种动作（生成输入、检查收敛、重跑）用 `WorkflowAction` 显式表示。
//!
//! ## 依赖关系
//! - 由 `cli/` 构造
//! - 被 `commands/` 使用

use crate::mp::client::DEFAULT_ENDPOINT;
use std::path::{Path, PathBuf};

/// 默认工作流目录名
pub const DEFAULT_WORKFLOW_NAME: &str = "bulk";

/// 默认 material id 列表文件名
pub const DEFAULT_MPIDS_FILE: &str = "MPIDS";

/// 默认超胞最短晶格向量长度 (Å)
pub const DEFAULT_MIN_LENGTH: f64 = 10.0;

/// 单次调用的工作流配置
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// 工作根目录（默认当前目录）
    pub root: PathBuf,

    /// 工作流目录名，位于 `root` 下
    pub workflow_name: String,

    /// material id 列表文件（相对路径按 `root` 解析）
    pub mpids_file: PathBuf,

    /// Materials Project API key
    pub api_key: String,

    /// Materials Project API 地址
    pub endpoint: String,

    /// 是否扩展为超胞
    pub scale: bool,

    /// 超胞最短晶格向量长度 (Å)
    pub min_length: f64,

    /// POTCAR 库目录（`<dir>/<symbol>/POTCAR`）
    pub potcar_dir: Option<PathBuf>,
}

impl WorkflowConfig {
    /// 以默认参数创建配置
    pub fn new(root: impl Into<PathBuf>) -> Self {
        WorkflowConfig {
            root: root.into(),
            workflow_name: DEFAULT_WORKFLOW_NAME.to_string(),
            mpids_file: PathBuf::from(DEFAULT_MPIDS_FILE),
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            scale: true,
            min_length: DEFAULT_MIN_LENGTH,
            potcar_dir: None,
        }
    }

    /// 工作流目录 `<root>/<workflow_name>`
    pub fn workflow_path(&self) -> PathBuf {
        self.root.join(&self.workflow_name)
    }

    /// material id 列表文件的实际路径
    pub fn mpids_path(&self) -> PathBuf {
        resolve(&self.root, &self.mpids_file)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// 工作流动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    /// 生成 VASP 输入
    GenerateInputs,
    /// 检查工作流是否收敛
    CheckConvergence,
    /// 重跑；VASP 工作流不适用
    Rerun,
}

/// 动作执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// 已为若干结构生成输入
    Generated { structures: usize },
    /// 收敛检查结果
    Converged(bool),
    /// 该动作对当前工作流类型不适用
    NotApplicable,
}
