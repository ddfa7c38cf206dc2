// crates/sg_io/src/dataset.rs

//! 结构化数组数据集
//!
//! 网格文件方言（Exodus、SCRIP、ICON）都建立在同一种模型上：
//! 具名维度、带维度名与属性的类型化变量、全局属性。
//! 方言读写器只与 [`Dataset`] 打交道，具体容器（NetCDF、JSON）由驱动负责。

use crate::error::{IoError, IoResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// 属性
// ============================================================================

/// 属性值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    /// 字符串
    Str(String),
    /// 单精度浮点
    Float(f32),
    /// 双精度浮点
    Double(f64),
    /// 32 位整数
    Int(i32),
}

impl AttrValue {
    /// 字符串值
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// 数值（转换为 f64）
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Str(_) => None,
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            Self::Int(v) => Some(f64::from(*v)),
        }
    }

    /// 单精度浮点值，仅对 `Float` 有效
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// 类型名
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "str",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Int(_) => "int",
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

// ============================================================================
// 变量数据
// ============================================================================

/// 变量数据（行主序展平）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum VarData {
    /// 双精度浮点
    Double(Vec<f64>),
    /// 32 位整数
    Int(Vec<i32>),
    /// 字符（字节）
    Char(Vec<u8>),
}

impl VarData {
    /// 元素个数
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Double(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Char(v) => v.len(),
        }
    }

    /// 是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 类型名
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Double(_) => "double",
            Self::Int(_) => "int",
            Self::Char(_) => "char",
        }
    }

    /// 数值数据转 f64；字符数据返回 `None`
    #[must_use]
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            Self::Double(v) => Some(v.clone()),
            Self::Int(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            Self::Char(_) => None,
        }
    }

    /// 数值数据转整数
    ///
    /// 浮点值必须是整数，否则返回出错元素的位置。
    pub fn to_i64(&self) -> Result<Vec<i64>, usize> {
        match self {
            Self::Int(v) => Ok(v.iter().map(|&x| i64::from(x)).collect()),
            Self::Double(v) => v
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    if x.fract() == 0.0 && x.abs() < 9.0e15 {
                        Ok(x as i64)
                    } else {
                        Err(i)
                    }
                })
                .collect(),
            Self::Char(_) => Err(0),
        }
    }
}

/// 把字符串写入定长字节槽，超长截断，不足补 0
#[must_use]
pub fn pack_strings(strings: &[&str], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; strings.len() * width];
    for (slot, s) in out.chunks_mut(width).zip(strings.iter()) {
        let bytes = s.as_bytes();
        let n = bytes.len().min(width);
        slot[..n].copy_from_slice(&bytes[..n]);
    }
    out
}

// ============================================================================
// 维度与变量
// ============================================================================

/// 维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// 长度（无限维为当前长度）
    pub len: usize,
    /// 是否无限维
    #[serde(default)]
    pub unlimited: bool,
}

/// 变量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// 维度名
    pub dims: Vec<String>,
    /// 数据
    pub data: VarData,
    /// 变量属性
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Variable {
    /// 维数
    #[inline]
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// 属性
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// 设置属性
    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) -> &mut Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// 结构化数组数据集
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// 维度
    pub dimensions: BTreeMap<String, Dimension>,
    /// 变量
    pub variables: BTreeMap<String, Variable>,
    /// 全局属性
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Dataset {
    /// 空数据集
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加定长维度
    pub fn add_dimension(&mut self, name: &str, len: usize) -> IoResult<()> {
        self.insert_dimension(name, Dimension { len, unlimited: false })
    }

    /// 添加无限维度
    pub fn add_unlimited_dimension(&mut self, name: &str, len: usize) -> IoResult<()> {
        self.insert_dimension(name, Dimension { len, unlimited: true })
    }

    fn insert_dimension(&mut self, name: &str, dim: Dimension) -> IoResult<()> {
        if self.dimensions.contains_key(name) {
            return Err(IoError::dataset(format!("维度 \"{name}\" 已存在")));
        }
        self.dimensions.insert(name.to_string(), dim);
        Ok(())
    }

    /// 维度
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.get(name)
    }

    /// 维度长度
    #[must_use]
    pub fn dimension_len(&self, name: &str) -> Option<usize> {
        self.dimensions.get(name).map(|d| d.len)
    }

    /// 是否有该维度
    #[must_use]
    pub fn has_dimension(&self, name: &str) -> bool {
        self.dimensions.contains_key(name)
    }

    /// 添加变量，检查维度存在且数据长度与形状一致
    pub fn add_variable(&mut self, name: &str, dims: &[&str], data: VarData) -> IoResult<&mut Variable> {
        if self.variables.contains_key(name) {
            return Err(IoError::dataset(format!("变量 \"{name}\" 已存在")));
        }
        let mut expected = 1usize;
        for d in dims {
            let len = self
                .dimension_len(d)
                .ok_or_else(|| IoError::dataset(format!("变量 \"{name}\" 引用了不存在的维度 \"{d}\"")))?;
            expected *= len;
        }
        if expected != data.len() {
            return Err(IoError::dataset(format!(
                "变量 \"{name}\" 数据长度 {} 与形状 {:?} 不一致",
                data.len(),
                dims
            )));
        }

        let var = Variable {
            dims: dims.iter().map(|d| d.to_string()).collect(),
            data,
            attributes: BTreeMap::new(),
        };
        Ok(self.variables.entry(name.to_string()).or_insert(var))
    }

    /// 变量
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// 变量形状
    #[must_use]
    pub fn shape(&self, var: &Variable) -> Vec<usize> {
        var.dims
            .iter()
            .map(|d| self.dimension_len(d).unwrap_or(0))
            .collect()
    }

    /// 全局属性
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// 设置全局属性
    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(name.to_string(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_variable_checks_shape() {
        let mut ds = Dataset::new();
        ds.add_dimension("a", 2).unwrap();
        ds.add_dimension("b", 3).unwrap();
        assert!(ds.add_dimension("a", 5).is_err());

        assert!(ds.add_variable("v", &["a", "b"], VarData::Double(vec![0.0; 6])).is_ok());
        assert!(ds.add_variable("w", &["a", "b"], VarData::Double(vec![0.0; 5])).is_err());
        assert!(ds.add_variable("x", &["c"], VarData::Int(vec![])).is_err());
        assert!(ds.add_variable("v", &["a"], VarData::Int(vec![1, 2])).is_err());

        let v = ds.variable("v").unwrap();
        assert_eq!(ds.shape(v), vec![2, 3]);
    }

    #[test]
    fn test_to_i64() {
        assert_eq!(VarData::Double(vec![1.0, -2.0]).to_i64(), Ok(vec![1, -2]));
        assert_eq!(VarData::Double(vec![1.0, 2.5]).to_i64(), Err(1));
        assert_eq!(VarData::Int(vec![7]).to_i64(), Ok(vec![7]));
        assert!(VarData::Char(vec![b'x']).to_i64().is_err());
    }

    #[test]
    fn test_pack_strings() {
        let packed = pack_strings(&["x", "yz"], 3);
        assert_eq!(packed, vec![b'x', 0, 0, b'y', b'z', 0]);
    }

    #[test]
    fn test_attr_values() {
        let mut ds = Dataset::new();
        ds.set_attr("version", 4.98f32);
        ds.set_attr("title", "grid");
        assert_eq!(ds.attr("version").and_then(AttrValue::as_f32), Some(4.98f32));
        assert_eq!(ds.attr("title").and_then(AttrValue::as_str), Some("grid"));
        assert_eq!(AttrValue::Int(8).as_f64(), Some(8.0));
    }

    #[test]
    fn test_json_shape() {
        let mut ds = Dataset::new();
        ds.add_dimension("n", 1).unwrap();
        ds.add_variable("v", &["n"], VarData::Int(vec![3]))
            .unwrap()
            .set_attr("units", "m");
        let json = serde_json::to_string(&ds).unwrap();
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ds);
    }
}
