//! # 美化输出工具
//!
//! 提供统一的终端输出样式。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored`, `tabled` crate

use colored::Colorize;
use tabled::{Table, Tabled};

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印工作流收敛状态
pub fn print_convergence(converged: bool) {
    if converged {
        println!("{} {}", "[CONVERGED]".green().bold(), "workflow has converged");
    } else {
        println!("{} {}", "[PENDING]".yellow().bold(), "workflow has not converged");
    }
}

/// 打印表格（空列表不输出）
pub fn print_table<T: Tabled>(rows: &[T]) {
    if rows.is_empty() {
        return;
    }
    println!("{}", Table::new(rows));
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}
