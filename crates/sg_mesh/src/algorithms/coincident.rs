// crates/sg_mesh/src/algorithms/coincident.rs

//! 重合节点合并
//!
//! 按数组顺序处理节点：与已登记的最近节点位移小于容差时并入该节点，
//! 否则成为新的唯一节点。每个簇保留最先出现的成员。

use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use sg_foundation::Tolerance;
use sg_geo::{Node, NodeTree};
use tracing::{debug, warn};

/// 合并重合节点并重映射单元的边端点
///
/// 返回删除的节点数；没有重合节点时不修改任何数据。
///
/// # Errors
///
/// - 容差无效，空间索引无法建立
/// - 单元引用了不存在的节点
pub fn remove_coincident_nodes(
    nodes: &mut Vec<Node>,
    faces: &mut [Face],
    tolerance: &Tolerance,
) -> MeshResult<usize> {
    let n_nodes = nodes.len();

    // 先检查索引，失败时不留下半修改的数据
    for face in faces.iter() {
        for edge in &face.edges {
            for ix in [edge.begin, edge.end] {
                if ix >= n_nodes {
                    return Err(MeshError::index_out_of_bounds("Node", ix, n_nodes));
                }
            }
        }
    }

    let Some(first) = nodes.first() else {
        return Ok(0);
    };

    let mut tree = NodeTree::new(tolerance.coincident)?;
    let mut remap = vec![0usize; n_nodes];
    let mut representatives: Vec<usize> = Vec::with_capacity(n_nodes);

    tree.insert(first, 0);
    representatives.push(0);

    for (i, node) in nodes.iter().enumerate().skip(1) {
        match tree.nearest(node) {
            Some((found, unique_ix)) if tolerance.is_coincident((*node - found).magnitude()) => {
                remap[i] = unique_ix;
            }
            _ => {
                let unique_ix = representatives.len();
                tree.insert(node, unique_ix);
                representatives.push(i);
                remap[i] = unique_ix;
            }
        }
    }

    let removed = n_nodes - representatives.len();
    if removed == 0 {
        debug!("未发现重合节点 ({} 个节点)", n_nodes);
        return Ok(0);
    }

    warn!("合并了 {} 个重合节点 ({} -> {})", removed, n_nodes, representatives.len());

    let compacted: Vec<Node> = representatives.iter().map(|&i| nodes[i]).collect();
    *nodes = compacted;

    for face in faces.iter_mut() {
        for edge in &mut face.edges {
            edge.begin = remap[edge.begin];
            edge.end = remap[edge.end];
        }
    }

    Ok(removed)
}
