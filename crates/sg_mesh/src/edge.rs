// crates/sg_mesh/src/edge.rs

//! 网格边
//!
//! 边由两个节点索引和边类型组成，保留方向；
//! 无向身份由 [`EdgeKey`] 表示，用作边映射的键。

use crate::error::{MeshError, MeshResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// 边类型
// ============================================================================

/// 边类型
///
/// 整数编码即文件中 `edge_type` 变量的取值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeType {
    /// 大圆弧
    #[default]
    GreatCircleArc,
    /// 等纬线
    ConstantLatitude,
}

impl EdgeType {
    /// 文件编码
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::GreatCircleArc => 0,
            Self::ConstantLatitude => 1,
        }
    }

    /// 由文件编码解析
    pub fn from_code(code: i64) -> MeshResult<Self> {
        match code {
            0 => Ok(Self::GreatCircleArc),
            1 => Ok(Self::ConstantLatitude),
            _ => Err(MeshError::UnknownEdgeType { code }),
        }
    }
}

// ============================================================================
// Edge
// ============================================================================

/// 有向边
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// 起点索引
    pub begin: usize,
    /// 终点索引
    pub end: usize,
    /// 边类型
    pub edge_type: EdgeType,
}

impl Edge {
    /// 创建大圆弧边
    #[inline]
    #[must_use]
    pub const fn new(begin: usize, end: usize) -> Self {
        Self {
            begin,
            end,
            edge_type: EdgeType::GreatCircleArc,
        }
    }

    /// 创建指定类型的边
    #[inline]
    #[must_use]
    pub const fn with_type(begin: usize, end: usize, edge_type: EdgeType) -> Self {
        Self {
            begin,
            end,
            edge_type,
        }
    }

    /// 是否为退化边（起终点相同）
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.begin == self.end
    }

    /// 反向边
    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::with_type(self.end, self.begin, self.edge_type)
    }

    /// 无向键
    #[inline]
    #[must_use]
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.begin, self.end)
    }
}

/// 无向边键，`lo <= hi`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    /// 较小的节点索引
    pub lo: usize,
    /// 较大的节点索引
    pub hi: usize,
}

impl EdgeKey {
    /// 由任意顺序的两个端点创建
    #[inline]
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }
}

impl From<&Edge> for EdgeKey {
    fn from(edge: &Edge) -> Self {
        edge.key()
    }
}
