// crates/sg_io/src/formats/mod.rs

//! 网格文件方言
//!
//! 方言由内容判定，从不看文件名：
//!
//! | 方言   | 判定条件                                        |
//! |--------|-------------------------------------------------|
//! | ICON   | 全局属性 `title == "ICON grid description"`     |
//! | SCRIP  | 维度 `grid_size`、`grid_corners`、`grid_rank` 齐全 |
//! | Exodus | 其余情况                                        |

pub mod exodus;
pub mod icon;
pub mod scrip;

use crate::dataset::{AttrValue, Dataset, Variable};
use crate::error::{IoError, IoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 网格方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridFormat {
    /// ICON 三角网格
    Icon,
    /// SCRIP 经纬度角点
    Scrip,
    /// Exodus 多块
    Exodus,
}

impl GridFormat {
    /// 由数据集内容判定方言
    #[must_use]
    pub fn detect(ds: &Dataset) -> Self {
        if ds.attr("title").and_then(AttrValue::as_str) == Some(icon::ICON_TITLE) {
            Self::Icon
        } else if ["grid_size", "grid_corners", "grid_rank"]
            .iter()
            .all(|d| ds.has_dimension(d))
        {
            Self::Scrip
        } else {
            Self::Exodus
        }
    }

    /// 方言名
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Icon => "ICON",
            Self::Scrip => "SCRIP",
            Self::Exodus => "Exodus",
        }
    }
}

impl fmt::Display for GridFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// 读取上下文
// ============================================================================

/// 带文件名与方言名的数据集访问，所有错误都指明缺失或非法的对象
pub(crate) struct Source<'a> {
    pub ds: &'a Dataset,
    pub file: &'a str,
    pub dialect: &'static str,
}

impl<'a> Source<'a> {
    pub fn new(ds: &'a Dataset, file: &'a str, format: GridFormat) -> Self {
        Self {
            ds,
            file,
            dialect: format.name(),
        }
    }

    /// 必需维度的长度
    pub fn dim(&self, name: &str) -> IoResult<usize> {
        self.ds.dimension_len(name).ok_or_else(|| IoError::MissingDimension {
            file: self.file.to_string(),
            dialect: self.dialect,
            name: name.to_string(),
        })
    }

    /// 必需变量
    pub fn var(&self, name: &str) -> IoResult<&'a Variable> {
        self.ds.variable(name).ok_or_else(|| IoError::MissingVariable {
            file: self.file.to_string(),
            dialect: self.dialect,
            name: name.to_string(),
        })
    }

    /// 可选变量
    pub fn opt_var(&self, name: &str) -> Option<&'a Variable> {
        self.ds.variable(name)
    }

    /// 变量形状
    pub fn shape(&self, var: &Variable) -> Vec<usize> {
        self.ds.shape(var)
    }

    /// 检查变量的维度名，顺序须一致
    pub fn expect_dims(&self, name: &str, var: &Variable, expected: &[&str]) -> IoResult<()> {
        if !var.dims.iter().map(String::as_str).eq(expected.iter().copied()) {
            return Err(self.bad_shape(name, format!("维度必须为 {expected:?}, 实际为 {:?}", var.dims)));
        }
        Ok(())
    }

    /// 检查变量的形状（各维长度）
    pub fn expect_shape(&self, name: &str, var: &Variable, expected: &[usize]) -> IoResult<()> {
        let shape = self.shape(var);
        if shape != expected {
            return Err(self.bad_shape(name, format!("形状必须为 {expected:?}, 实际为 {shape:?}")));
        }
        Ok(())
    }

    /// 浮点数据，元素数须恰为 `len`
    pub fn values(&self, name: &str, var: &Variable, len: usize) -> IoResult<Vec<f64>> {
        let values = var
            .data
            .to_f64()
            .ok_or_else(|| self.bad_shape(name, format!("期望数值类型, 实际为 {}", var.data.type_name())))?;
        self.check_len(name, values.len(), len)?;
        Ok(values)
    }

    /// 整数数据，元素数须恰为 `len`
    pub fn integers(&self, name: &str, var: &Variable, len: usize) -> IoResult<Vec<i64>> {
        let values = var.data.to_i64().map_err(|pos| IoError::InvalidData {
            file: self.file.to_string(),
            dialect: self.dialect,
            details: format!("变量 \"{name}\" 第 {pos} 个元素不是整数"),
        })?;
        self.check_len(name, values.len(), len)?;
        Ok(values)
    }

    fn check_len(&self, name: &str, actual: usize, required: usize) -> IoResult<()> {
        if actual != required {
            return Err(self.bad_shape(name, format!("需要 {required} 个元素, 实际 {actual} 个")));
        }
        Ok(())
    }

    pub fn bad_shape(&self, variable: &str, details: impl Into<String>) -> IoError {
        IoError::BadShape {
            file: self.file.to_string(),
            dialect: self.dialect,
            variable: variable.to_string(),
            details: details.into(),
        }
    }

    pub fn out_of_range(&self, variable: &str, details: impl Into<String>) -> IoError {
        IoError::IndexOutOfRange {
            file: self.file.to_string(),
            dialect: self.dialect,
            variable: variable.to_string(),
            details: details.into(),
        }
    }

    pub fn invalid(&self, details: impl Into<String>) -> IoError {
        IoError::InvalidData {
            file: self.file.to_string(),
            dialect: self.dialect,
            details: details.into(),
        }
    }
}

/// 写出方言共有的全局属性
pub(crate) fn put_common_attributes(ds: &mut Dataset) {
    ds.set_attr("api_version", 5.0f32);
    ds.set_attr("version", 5.0f32);
    ds.set_attr("floating_point_word_size", 8i32);
    ds.set_attr("file_size", 0i32);
}
