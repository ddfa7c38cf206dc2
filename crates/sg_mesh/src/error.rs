// crates/sg_mesh/src/error.rs
//! 网格处理错误类型
//!
//! 包含拓扑、几何不变量与索引错误定义。
//! 几何不变量错误携带完整的数值上下文，足以复现问题。
//! 所有错误可转换为 `sg_foundation::SgError` 向上传播。

use sg_foundation::SgError;
use sg_geo::sphere::xyz_to_lonlat_deg;
use sg_geo::Node;
use std::fmt::Write as _;
use thiserror::Error;

/// 网格模块结果类型
pub type MeshResult<T> = Result<T, MeshError>;

/// 网格错误枚举
#[derive(Error, Debug)]
pub enum MeshError {
    /// 拓扑错误
    #[error("拓扑错误: {operation} 失败, {details}")]
    InvalidTopology {
        operation: &'static str,
        details: String,
    },

    /// 节点不在单位球面上
    #[error("节点 {index} 不在单位球面上: ({x:.15e}, {y:.15e}, {z:.15e}), 模长 {magnitude:.15e}")]
    NonUnitNode {
        index: usize,
        x: f64,
        y: f64,
        z: f64,
        magnitude: f64,
    },

    /// 单元非逆时针或存在凹角
    #[error("单元 {face} 非逆时针或存在凹角\n{}", ccw_diagnostic(.nodes, .coords, .cross, .dot))]
    NotCounterClockwise {
        face: usize,
        nodes: [usize; 3],
        coords: [Node; 3],
        cross: Node,
        dot: f64,
    },

    /// 单元没有任何非退化边
    #[error("单元 {face} 全部由退化边组成")]
    DegenerateFace { face: usize },

    /// 单元边不闭合
    #[error("单元 {face} 的边 {edge} 终点 {end} 与下一条边起点 {next_begin} 不一致")]
    NonCyclicFace {
        face: usize,
        edge: usize,
        end: usize,
        next_begin: usize,
    },

    /// 一条边关联了两个以上单元
    #[error("边 ({lo}, {hi}) 已关联单元 {existing:?}, 无法再关联单元 {face}")]
    EdgeOverflow {
        lo: usize,
        hi: usize,
        existing: [usize; 2],
        face: usize,
    },

    /// 边邻接关系缺失
    #[error("单元 {face} 的边 ({lo}, {hi}) 在边映射中缺少邻接记录")]
    MissingEdgeAdjacency { face: usize, lo: usize, hi: usize },

    /// 零长度的等纬线
    #[error("等纬线长度为零: ({:.15e}, {:.15e}, {:.15e})", .begin.x, .begin.y, .begin.z)]
    ZeroLengthLatitude { begin: Node, end: Node },

    /// 弧跨越多个坐标半平面，方向无法确定
    #[error(
        "弧长过大, 无法确定方向: ({:.6}, {:.6}, {:.6}) -> ({:.6}, {:.6}, {:.6})",
        .begin.x, .begin.y, .begin.z, .end.x, .end.y, .end.z
    )]
    ArcTooLarge { begin: Node, end: Node },

    /// 未知的边类型编码
    #[error("未知的边类型编码: {code}")]
    UnknownEdgeType { code: i64 },

    /// 缺少父单元索引
    #[error("{operation} 需要 {array} 父单元索引")]
    MissingParents {
        operation: &'static str,
        array: &'static str,
    },

    /// 数组与单元数不匹配
    #[error("元素不匹配: {name} 需要 {required} 项, 提供 {provided}")]
    ElementCountMismatch {
        name: &'static str,
        required: usize,
        provided: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        index_type: &'static str,
        index: usize,
        len: usize,
    },

    /// 基础层错误（空间索引构建、求积阶数等）
    #[error(transparent)]
    Foundation(#[from] SgError),
}

/// 逆时针检查失败时的诊断信息
fn ccw_diagnostic(nodes: &[usize; 3], coords: &[Node; 3], cross: &Node, dot: &f64) -> String {
    let mut out = String::new();
    for (ix, n) in nodes.iter().zip(coords.iter()) {
        let (lon, lat) = xyz_to_lonlat_deg(n);
        let _ = writeln!(
            out,
            "  节点 {ix}: ({:.15e}, {:.15e}, {:.15e}) 经度 {lon:.12} 纬度 {lat:.12}",
            n.x, n.y, n.z
        );
    }
    let _ = write!(
        out,
        "  叉积 ({:.15e}, {:.15e}, {:.15e}), 点积 {dot:.15e}",
        cross.x, cross.y, cross.z
    );
    out
}

/// 转换到 Foundation 层错误
impl From<MeshError> for SgError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::Foundation(inner) => inner,
            MeshError::ElementCountMismatch {
                name,
                required,
                provided,
            } => SgError::size_mismatch(name, required, provided),
            MeshError::IndexOutOfBounds {
                index_type,
                index,
                len,
            } => SgError::index_out_of_bounds(index_type, index, len),
            other => SgError::invalid_mesh(other.to_string()),
        }
    }
}

/// 便捷构造函数
impl MeshError {
    pub fn invalid_topology(operation: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidTopology {
            operation,
            details: details.into(),
        }
    }

    pub fn element_count_mismatch(name: &'static str, required: usize, provided: usize) -> Self {
        Self::ElementCountMismatch {
            name,
            required,
            provided,
        }
    }

    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    pub fn missing_parents(operation: &'static str, array: &'static str) -> Self {
        Self::MissingParents { operation, array }
    }
}
