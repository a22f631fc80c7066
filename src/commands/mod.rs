//! # 命令执行模块
//!
//! 按 `WorkflowAction` 分派到各动作的实现。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `mp/`, `workflow/`, `models/`, `utils/`
//! - 子模块: generate, converged, rerun

pub mod converged;
pub mod generate;
pub mod rerun;

use crate::error::Result;
use crate::models::{ActionOutcome, WorkflowAction, WorkflowConfig};
use crate::mp::MaterialsProject;
use crate::workflow::TaskConvergence;

/// 执行动作
pub fn run(action: WorkflowAction, config: &WorkflowConfig) -> Result<ActionOutcome> {
    match action {
        WorkflowAction::GenerateInputs => {
            let source = MaterialsProject::new(&config.endpoint, &config.api_key)?;
            generate::execute(config, &source)
        }
        WorkflowAction::CheckConvergence => {
            converged::execute(&config.root, &TaskConvergence).map(ActionOutcome::Converged)
        }
        WorkflowAction::Rerun => Ok(rerun::execute()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_rerun_touches_nothing() {
        let dir = tempdir().unwrap();
        let config = WorkflowConfig::new(dir.path());

        let outcome = run(WorkflowAction::Rerun, &config).unwrap();

        assert_eq!(outcome, ActionOutcome::NotApplicable);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_check_convergence_on_empty_dir() {
        let dir = tempdir().unwrap();
        let config = WorkflowConfig::new(dir.path());

        let outcome = run(WorkflowAction::CheckConvergence, &config).unwrap();

        assert_eq!(outcome, ActionOutcome::Converged(false));
        assert!(dir.path().join("WORKFLOW_CONVERGENCE").is_file());
    }
}
