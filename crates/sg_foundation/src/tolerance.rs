// crates/sg_foundation/src/tolerance.rs

//! 数值容差配置
//!
//! 球面网格上的距离、模长都是无量纲量（单位球），
//! 因此所有容差都是绝对值。

use serde::{Deserialize, Serialize};

/// 参考容差：节点重合判定与单位模长检查
pub const REFERENCE_TOLERANCE: f64 = 1.0e-12;

/// 小单元面积阈值（低于此值给出警告）
pub const SMALL_AREA_THRESHOLD: f64 = 1.0e-13;

/// 网格处理容差
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// 重合节点合并距离
    pub coincident: f64,
    /// 节点模长与 1 的最大偏差
    pub unit_magnitude: f64,
    /// 小单元面积阈值
    pub small_area: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincident: REFERENCE_TOLERANCE,
            unit_magnitude: REFERENCE_TOLERANCE,
            small_area: SMALL_AREA_THRESHOLD,
        }
    }
}

impl Tolerance {
    /// 判断两点位移是否足够小以视为同一节点
    #[inline]
    pub fn is_coincident(&self, displacement: f64) -> bool {
        displacement < self.coincident
    }

    /// 判断模长是否为单位长度
    #[inline]
    pub fn is_unit(&self, magnitude: f64) -> bool {
        (magnitude - 1.0).abs() <= self.unit_magnitude
    }

    /// 判断面积是否过小
    #[inline]
    pub fn is_small_area(&self, area: f64) -> bool {
        area < self.small_area
    }
}
