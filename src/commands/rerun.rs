//! # 重跑
//!
//! VASP 体相工作流没有重跑步骤，只打印提示。

use crate::models::ActionOutcome;
use crate::utils::output;

pub fn execute() -> ActionOutcome {
    output::print_skip("Rerun does nothing for a VASP workflow");
    ActionOutcome::NotApplicable
}
