//! # VASP INCAR 写出
//!
//! `Incar` 保存 `TAG = value` 参数表，按标签字母序写出。
//! 数组型参数（MAGMOM、LDAUU 等）写成 `n*value` 的压缩形式。
//!
//! ## 依赖关系
//! - 被 `inputs/relax_set.rs` 使用

use std::collections::BTreeMap;
use std::fmt;

/// INCAR 参数值
#[derive(Debug, Clone, PartialEq)]
pub enum IncarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Floats(Vec<f64>),
    Ints(Vec<i64>),
}

impl fmt::Display for IncarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncarValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            IncarValue::Int(i) => write!(f, "{}", i),
            IncarValue::Float(x) => write!(f, "{}", format_float(*x)),
            IncarValue::Str(s) => write!(f, "{}", s),
            IncarValue::Floats(v) => {
                let items: Vec<String> = v.iter().map(|x| format_float(*x)).collect();
                write!(f, "{}", compress(&items))
            }
            IncarValue::Ints(v) => {
                let items: Vec<String> = v.iter().map(|i| i.to_string()).collect();
                write!(f, "{}", compress(&items))
            }
        }
    }
}

impl From<bool> for IncarValue {
    fn from(b: bool) -> Self {
        IncarValue::Bool(b)
    }
}

impl From<i64> for IncarValue {
    fn from(i: i64) -> Self {
        IncarValue::Int(i)
    }
}

impl From<f64> for IncarValue {
    fn from(x: f64) -> Self {
        IncarValue::Float(x)
    }
}

impl From<&str> for IncarValue {
    fn from(s: &str) -> Self {
        IncarValue::Str(s.to_string())
    }
}

impl From<Vec<f64>> for IncarValue {
    fn from(v: Vec<f64>) -> Self {
        IncarValue::Floats(v)
    }
}

impl From<Vec<i64>> for IncarValue {
    fn from(v: Vec<i64>) -> Self {
        IncarValue::Ints(v)
    }
}

/// INCAR 参数表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Incar {
    params: BTreeMap<String, IncarValue>,
}

impl Incar {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置参数，标签统一为大写
    pub fn set(&mut self, tag: &str, value: impl Into<IncarValue>) {
        self.params.insert(tag.to_uppercase(), value.into());
    }

    #[cfg(test)]
    pub fn get(&self, tag: &str) -> Option<&IncarValue> {
        self.params.get(&tag.to_uppercase())
    }
}

impl fmt::Display for Incar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (tag, value) in &self.params {
            writeln!(f, "{} = {}", tag, value)?;
        }
        Ok(())
    }
}

/// 浮点数格式：整数值保留一位小数，其余取最短表示
pub fn format_float(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

/// 连续相同的值压缩为 `n*value`
fn compress(items: &[String]) -> String {
    let mut groups: Vec<(usize, &str)> = Vec::new();
    for item in items {
        match groups.last_mut() {
            Some((count, last)) if *last == item.as_str() => *count += 1,
            _ => groups.push((1, item.as_str())),
        }
    }

    groups
        .iter()
        .map(|(count, value)| format!("{}*{}", count, value))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incar_sorted_output() {
        let mut incar = Incar::new();
        incar.set("prec", "Accurate");
        incar.set("ENCUT", 520_i64);
        incar.set("LWAVE", false);
        incar.set("EDIFF", 0.0001);

        assert_eq!(
            incar.to_string(),
            "EDIFF = 0.0001\nENCUT = 520\nLWAVE = False\nPREC = Accurate\n"
        );
        assert_eq!(incar.get("Prec"), Some(&IncarValue::Str("Accurate".into())));
    }

    #[test]
    fn test_array_values_are_compressed() {
        let magmom = IncarValue::Floats(vec![5.0, 5.0, 0.6, 0.6, 0.6, 5.0]);
        assert_eq!(magmom.to_string(), "2*5.0 3*0.6 1*5.0");

        let ldaul = IncarValue::Ints(vec![2, 0]);
        assert_eq!(ldaul.to_string(), "1*2 1*0");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(5.0), "5.0");
        assert_eq!(format_float(-5.0), "-5.0");
        assert_eq!(format_float(0.05), "0.05");
        assert_eq!(format_float(3.32), "3.32");
    }
}
