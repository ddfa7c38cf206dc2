// crates/sg_mesh/src/direction.rs

//! 边的局部切向
//!
//! 大圆弧：弦方向减去沿参考点径向的分量；
//! 等纬线：赤道面内垂直于径向，正负由 [`is_positively_oriented_edge`] 决定。

use crate::edge::EdgeType;
use crate::error::{MeshError, MeshResult};
use sg_foundation::REFERENCE_TOLERANCE;
use sg_geo::Node;

/// 等纬线是否沿经度增加方向（逆时针绕 z 轴）
///
/// 两端点须同处 `y >= 0`、`y <= 0`、`x >= 0` 或 `x <= 0` 之一的半平面，
/// 依次检查。
///
/// # Errors
///
/// - 端点重合（零长度等纬线）
/// - 弧跨越多个半平面，仅凭端点无法判断方向
///
/// # 示例
///
/// ```
/// use sg_geo::Node;
/// use sg_mesh::direction::is_positively_oriented_edge;
///
/// let a = Node::new(1.0, 0.1, 0.0);
/// let b = Node::new(0.1, 1.0, 0.0);
/// assert!(is_positively_oriented_edge(&a, &b).unwrap());
/// assert!(!is_positively_oriented_edge(&b, &a).unwrap());
/// ```
pub fn is_positively_oriented_edge(begin: &Node, end: &Node) -> MeshResult<bool> {
    if (begin.x - end.x).abs() < REFERENCE_TOLERANCE
        && (begin.y - end.y).abs() < REFERENCE_TOLERANCE
        && (begin.z - end.z).abs() < REFERENCE_TOLERANCE
    {
        return Err(MeshError::ZeroLengthLatitude {
            begin: *begin,
            end: *end,
        });
    }

    if begin.y >= 0.0 && end.y >= 0.0 {
        return Ok(end.x < begin.x);
    }
    if begin.y <= 0.0 && end.y <= 0.0 {
        return Ok(end.x > begin.x);
    }
    if begin.x >= 0.0 && end.x >= 0.0 {
        return Ok(end.y > begin.y);
    }
    if begin.x <= 0.0 && end.x <= 0.0 {
        return Ok(end.y < begin.y);
    }

    Err(MeshError::ArcTooLarge {
        begin: *begin,
        end: *end,
    })
}

/// 边在参考点处的局部切向（未归一化）
///
/// # Errors
///
/// 等纬线方向无法确定时返回错误，见 [`is_positively_oriented_edge`]。
pub fn local_direction(
    begin: &Node,
    end: &Node,
    reference: &Node,
    edge_type: EdgeType,
) -> MeshResult<Node> {
    match edge_type {
        EdgeType::GreatCircleArc => {
            let dir = *end - *begin;
            let scale = dir.dot(reference) / reference.dot(reference);
            Ok(dir - *reference * scale)
        }
        EdgeType::ConstantLatitude => {
            if is_positively_oriented_edge(begin, end)? {
                Ok(Node::new(-reference.y, reference.x, 0.0))
            } else {
                Ok(Node::new(reference.y, -reference.x, 0.0))
            }
        }
    }
}

/// 边在起点处的局部切向
///
/// # Errors
///
/// 同 [`local_direction`]。
#[inline]
pub fn local_direction_at_begin(begin: &Node, end: &Node, edge_type: EdgeType) -> MeshResult<Node> {
    local_direction(begin, end, begin, edge_type)
}
