//! # mpbulk - Materials Project 体相弛豫工作流
//!
//! 从 Materials Project 获取晶体结构，扩展为超胞后批量写出
//! VASP 体相弛豫输入，并跟踪工作流收敛状态。
//!
//! ## 动作
//! - `-i/--gen_inputs` - 生成输入
//! - `-c/--converged`  - 检查收敛
//! - `-r/--rerun`      - 重跑（不适用，无操作）
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (动作执行逻辑)
//!   │     ├── mp/        (Materials Project 客户端)
//!   │     ├── inputs/    (VASP 输入集)
//!   │     ├── workflow/  (缩放、收敛记录)
//!   │     ├── parsers/   (INCAR/KPOINTS/POSCAR/OUTCAR)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod inputs;
mod models;
mod mp;
mod parsers;
mod utils;
mod workflow;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let result = cli
        .config()
        .and_then(|config| commands::run(cli.action(), &config));

    if let Err(e) = result {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
