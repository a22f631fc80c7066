//! # 收敛检查
//!
//! `-c/--converged` 的实现：用收敛判据评估工作目录，
//! 打印判据所依据的各任务状态，并将结果写入 `WORKFLOW_CONVERGENCE`。
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `workflow/convergence.rs`, `utils/output.rs`

use crate::error::Result;
use crate::utils::output;
use crate::workflow::convergence::{read_workflow_status, write_workflow_status, TaskStatus};
use crate::workflow::ConvergencePredicate;

use std::path::Path;
use tabled::Tabled;

/// 任务状态表格行
#[derive(Debug, Clone, Tabled)]
struct TaskRow {
    #[tabled(rename = "Task")]
    task: String,
    #[tabled(rename = "Flag")]
    flag: String,
    #[tabled(rename = "OUTCAR")]
    outcar: String,
    #[tabled(rename = "Steps")]
    steps: usize,
    #[tabled(rename = "Energy (eV)")]
    energy: String,
    #[tabled(rename = "Converged")]
    converged: String,
}

impl TaskRow {
    fn new(root: &Path, task: &TaskStatus) -> Self {
        let name = task
            .dir
            .strip_prefix(root)
            .unwrap_or(&task.dir)
            .display()
            .to_string();

        let outcar = if task.finished && task.reached_accuracy {
            "relaxed"
        } else if task.finished {
            "finished"
        } else {
            "-"
        };

        TaskRow {
            task: if name.is_empty() { ".".to_string() } else { name },
            flag: task.flag.map(|f| f.to_string()).unwrap_or_else(|| "-".to_string()),
            outcar: outcar.to_string(),
            steps: task.ionic_steps,
            energy: task
                .final_energy
                .map(|e| format!("{:.6}", e))
                .unwrap_or_else(|| "-".to_string()),
            converged: if task.is_converged() { "yes" } else { "no" }.to_string(),
        }
    }
}

/// 执行收敛检查
pub fn execute<P: ConvergencePredicate>(dir: &Path, predicate: &P) -> Result<bool> {
    output::print_header("Checking Workflow Convergence");

    let report = predicate.evaluate(dir)?;

    if report.tasks.is_empty() {
        output::print_warning(&format!("No tasks found under {}", dir.display()));
    } else {
        output::print_info(&format!("Found {} tasks", report.tasks.len()));
        let rows: Vec<TaskRow> = report.tasks.iter().map(|t| TaskRow::new(dir, t)).collect();
        println!();
        output::print_table(&rows);
        println!();
    }

    // 旧状态文件损坏时直接覆盖
    if let Ok(Some(previous)) = read_workflow_status(dir) {
        let text = if previous { "True" } else { "False" };
        output::print_info(&format!("Previous status: {}", text));
    }

    write_workflow_status(dir, report.converged)?;
    output::print_convergence(report.converged);

    Ok(report.converged)
}
