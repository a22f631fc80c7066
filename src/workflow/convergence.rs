//! # 收敛记录与收敛判据
//!
//! - `CONVERGENCE`：每个结构目录下的追加式记录，每次生成输入追加一个块：
//!   ```text
//!   0 MP_Bulk_Converge
//!
//!   <INCAR 原内容>
//!   NPAR = 2
//!   ISYM = 0
//!   ```
//!   块头为 `<状态> <标签>`，状态非零表示该任务已收敛。
//! - `WORKFLOW_CONVERGENCE`：整个工作流的收敛状态，单行 `True` / `False`。
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs`, `commands/converged.rs` 使用
//! - 使用 `parsers/outcar.rs`
//! - 使用 `walkdir` 搜索任务目录

use crate::error::{MpBulkError, Result};
use crate::parsers::outcar;

use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// 每个结构目录下的收敛记录文件
pub const CONVERGENCE_FILE: &str = "CONVERGENCE";

/// 工作流级收敛状态文件
pub const WORKFLOW_STATUS_FILE: &str = "WORKFLOW_CONVERGENCE";

static RECORD_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+([^\s=]+)\s*$").unwrap());

// ─────────────────────────────────────────────────────────────
// 追加写入
// ─────────────────────────────────────────────────────────────

/// 在 INCAR 末尾追加参数行，返回追加前的内容（保证以换行结尾）
pub fn append_incar_tags(incar: &Path, tags: &[&str]) -> Result<String> {
    let mut content = fs::read_to_string(incar).map_err(|e| MpBulkError::FileReadError {
        path: incar.display().to_string(),
        source: e,
    })?;

    let mut addition = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        addition.push('\n');
        content.push('\n');
    }
    for tag in tags {
        addition.push_str(tag);
        addition.push('\n');
    }

    append_text(incar, &addition)?;
    Ok(content)
}

/// 向 `dir/CONVERGENCE` 追加一个记录块
pub fn append_convergence_record(
    dir: &Path,
    status: u32,
    label: &str,
    content: &str,
    tags: &[&str],
) -> Result<()> {
    let mut block = format!("{} {}\n\n", status, label);
    block.push_str(content);
    for tag in tags {
        block.push_str(tag);
        block.push('\n');
    }

    append_text(&dir.join(CONVERGENCE_FILE), &block)
}

fn append_text(path: &Path, text: &str) -> Result<()> {
    let to_err = |e: std::io::Error| MpBulkError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_err)?;
    file.write_all(text.as_bytes()).map_err(to_err)
}

/// 读取 CONVERGENCE 中最后一个记录块的状态
pub fn latest_status(path: &Path) -> Result<Option<u32>> {
    let content = fs::read_to_string(path).map_err(|e| MpBulkError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(content
        .lines()
        .filter_map(|line| RECORD_HEADER.captures(line.trim()))
        .filter_map(|caps| caps[1].parse().ok())
        .last())
}

// ─────────────────────────────────────────────────────────────
// 工作流状态文件
// ─────────────────────────────────────────────────────────────

/// 写出（覆盖）工作流收敛状态
pub fn write_workflow_status(dir: &Path, converged: bool) -> Result<()> {
    let path = dir.join(WORKFLOW_STATUS_FILE);
    let text = if converged { "True\n" } else { "False\n" };

    fs::write(&path, text).map_err(|e| MpBulkError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 读取工作流收敛状态，文件不存在时返回 `None`
pub fn read_workflow_status(dir: &Path) -> Result<Option<bool>> {
    let path = dir.join(WORKFLOW_STATUS_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let text = fs::read_to_string(&path).map_err(|e| MpBulkError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    match text.trim() {
        "True" => Ok(Some(true)),
        "False" => Ok(Some(false)),
        other => Err(MpBulkError::ParseError {
            format: "workflow status".to_string(),
            path: path.display().to_string(),
            reason: format!("expected True or False, found '{}'", other),
        }),
    }
}

// ─────────────────────────────────────────────────────────────
// 收敛判据
// ─────────────────────────────────────────────────────────────

/// 一次收敛评估的结果
#[derive(Debug, Clone, Default)]
pub struct ConvergenceReport {
    /// 参与判定的任务
    pub tasks: Vec<TaskStatus>,
    pub converged: bool,
}

/// 工作流收敛判据
pub trait ConvergencePredicate {
    fn evaluate(&self, dir: &Path) -> Result<ConvergenceReport>;
}

/// 单个任务目录的状态
#[derive(Debug, Clone)]
pub struct TaskStatus {
    pub dir: PathBuf,
    /// CONVERGENCE 最后一个块的状态
    pub flag: Option<u32>,
    pub finished: bool,
    pub reached_accuracy: bool,
    pub final_energy: Option<f64>,
    pub ionic_steps: usize,
}

impl TaskStatus {
    pub fn is_converged(&self) -> bool {
        self.flag.is_some_and(|f| f > 0) || (self.finished && self.reached_accuracy)
    }
}

/// 递归查找含 CONVERGENCE 的任务目录并读取其状态
pub fn scan_tasks(dir: &Path) -> Result<Vec<TaskStatus>> {
    if !dir.is_dir() {
        return Err(MpBulkError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut tasks = Vec::new();

    // 读不到的子目录直接报错，否则会漏掉任务
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| MpBulkError::FileReadError {
            path: e.path().unwrap_or(dir).display().to_string(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || entry.file_name() != CONVERGENCE_FILE {
            continue;
        }

        let task_dir = match entry.path().parent() {
            Some(p) => p.to_path_buf(),
            None => continue,
        };

        let mut status = TaskStatus {
            flag: latest_status(entry.path())?,
            dir: task_dir,
            finished: false,
            reached_accuracy: false,
            final_energy: None,
            ionic_steps: 0,
        };

        let outcar_path = status.dir.join("OUTCAR");
        if outcar_path.is_file() {
            let summary = outcar::parse_outcar(&outcar_path)?;
            status.finished = summary.is_finished;
            status.reached_accuracy = summary.reached_accuracy;
            status.final_energy = summary.final_energy;
            status.ionic_steps = summary.ionic_steps;
        }

        tasks.push(status);
    }

    Ok(tasks)
}

/// 默认判据：至少一个任务，且所有任务均已收敛
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskConvergence;

impl ConvergencePredicate for TaskConvergence {
    fn evaluate(&self, dir: &Path) -> Result<ConvergenceReport> {
        let tasks = scan_tasks(dir)?;
        let converged = !tasks.is_empty() && tasks.iter().all(TaskStatus::is_converged);
        Ok(ConvergenceReport { tasks, converged })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TAGS: [&str; 2] = ["NPAR = 2", "ISYM = 0"];

    #[test]
    fn test_append_incar_tags_returns_prior_content() {
        let dir = tempdir().unwrap();
        let incar = dir.path().join("INCAR");
        fs::write(&incar, "ENCUT = 520").unwrap();

        let prior = append_incar_tags(&incar, &TAGS).unwrap();

        assert_eq!(prior, "ENCUT = 520\n");
        assert_eq!(
            fs::read_to_string(&incar).unwrap(),
            "ENCUT = 520\nNPAR = 2\nISYM = 0\n"
        );
    }

    #[test]
    fn test_records_accumulate() {
        let dir = tempdir().unwrap();

        append_convergence_record(dir.path(), 0, "MP_Bulk_Converge", "ENCUT = 520\n", &TAGS)
            .unwrap();
        append_convergence_record(dir.path(), 1, "MP_Bulk_Converge", "ENCUT = 520\n", &TAGS)
            .unwrap();

        let path = dir.path().join(CONVERGENCE_FILE);
        let text = fs::read_to_string(&path).unwrap();
        let block = "MP_Bulk_Converge\n\nENCUT = 520\nNPAR = 2\nISYM = 0\n";

        assert_eq!(text, format!("0 {}1 {}", block, block));
        assert_eq!(latest_status(&path).unwrap(), Some(1));
    }

    #[test]
    fn test_incar_lines_are_not_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONVERGENCE_FILE);
        fs::write(&path, "0 MP_Bulk_Converge\n\nNSW = 99\nISYM = 0\n").unwrap();

        assert_eq!(latest_status(&path).unwrap(), Some(0));
    }

    #[test]
    fn test_workflow_status_round_trip() {
        let dir = tempdir().unwrap();
        assert_eq!(read_workflow_status(dir.path()).unwrap(), None);

        write_workflow_status(dir.path(), false).unwrap();
        assert_eq!(read_workflow_status(dir.path()).unwrap(), Some(false));

        write_workflow_status(dir.path(), true).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(WORKFLOW_STATUS_FILE)).unwrap(),
            "True\n"
        );
    }

    #[test]
    fn test_task_convergence() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("bulk/Si2_0");
        let b = dir.path().join("bulk/Fe2_1");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();

        // 空目录：没有任务，不算收敛
        let report = TaskConvergence.evaluate(&dir.path().join("bulk")).unwrap();
        assert!(report.tasks.is_empty());
        assert!(!report.converged);

        append_convergence_record(&a, 0, "MP_Bulk_Converge", "", &TAGS).unwrap();
        append_convergence_record(&b, 1, "MP_Bulk_Converge", "", &TAGS).unwrap();
        assert!(!TaskConvergence.evaluate(dir.path()).unwrap().converged);

        fs::write(
            a.join("OUTCAR"),
            " reached required accuracy - stopping structural energy minimisation\n General timing and accounting informations for this job:\n",
        )
        .unwrap();
        let report = TaskConvergence.evaluate(dir.path()).unwrap();
        assert!(report.converged);
        assert_eq!(report.tasks.len(), 2);
        assert_eq!(report.tasks[0].dir, b);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_fails_the_scan() {
        let dir = tempdir().unwrap();
        let task = dir.path().join("bulk/Si2_0");
        fs::create_dir_all(&task).unwrap();
        append_convergence_record(&task, 1, "MP_Bulk_Converge", "", &TAGS).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("bulk/Fe2_1"))
            .unwrap();

        // 剩下的任务都已收敛，也不能据此判定为收敛
        assert!(matches!(
            TaskConvergence.evaluate(dir.path()),
            Err(MpBulkError::FileReadError { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_task_directory_is_followed() {
        let dir = tempdir().unwrap();
        let scratch = dir.path().join("scratch/Si2_0");
        fs::create_dir_all(&scratch).unwrap();
        fs::create_dir_all(dir.path().join("bulk")).unwrap();
        append_convergence_record(&scratch, 1, "MP_Bulk_Converge", "", &TAGS).unwrap();
        std::os::unix::fs::symlink(&scratch, dir.path().join("bulk/Si2_0")).unwrap();

        let tasks = scan_tasks(&dir.path().join("bulk")).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].dir, dir.path().join("bulk/Si2_0"));
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            scan_tasks(&dir.path().join("nope")),
            Err(MpBulkError::DirectoryNotFound { .. })
        ));
    }
}
