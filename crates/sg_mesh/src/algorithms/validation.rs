// crates/sg_mesh/src/algorithms/validation.rs

//! 网格验证
//!
//! 三类检查，任何一项失败都立即返回带完整上下文的错误：
//!
//! - 节点模长为 1
//! - 单元局部逆时针（相邻非退化边对的叉积与中间节点径向点积不为正）
//! - 每条非退化边在边映射中有引用该单元的记录

use crate::edge_map::EdgeMap;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use sg_foundation::Tolerance;
use sg_geo::Node;

/// 检查所有节点位于单位球面上
pub fn validate_node_magnitudes(nodes: &[Node], tolerance: &Tolerance) -> MeshResult<()> {
    for (index, node) in nodes.iter().enumerate() {
        let magnitude = node.magnitude();
        // NaN 也视为失败
        if !tolerance.is_unit(magnitude) {
            return Err(MeshError::NonUnitNode {
                index,
                x: node.x,
                y: node.y,
                z: node.z,
                magnitude,
            });
        }
    }
    Ok(())
}

/// 检查所有单元逆时针且凸
pub fn validate_face_orientation(nodes: &[Node], faces: &[Face]) -> MeshResult<()> {
    for (face_ix, face) in faces.iter().enumerate() {
        validate_single_face(nodes, face_ix, face)?;
    }
    Ok(())
}

fn validate_single_face(nodes: &[Node], face_ix: usize, face: &Face) -> MeshResult<()> {
    let n_edges = face.degree();
    let n_nodes = nodes.len();

    for edge in &face.edges {
        for ix in [edge.begin, edge.end] {
            if ix >= n_nodes {
                return Err(MeshError::index_out_of_bounds("Node", ix, n_nodes));
            }
        }
    }

    let live: Vec<usize> = (0..n_edges).filter(|&j| !face.edges[j].is_zero()).collect();
    if live.len() < 2 {
        return Err(MeshError::DegenerateFace { face: face_ix });
    }

    for (k, &j) in live.iter().enumerate() {
        let j_next = live[(k + 1) % live.len()];
        let edge0 = face.edges[j];
        let edge1 = face.edges[j_next];

        if edge0.end != edge1.begin {
            return Err(MeshError::NonCyclicFace {
                face: face_ix,
                edge: j,
                end: edge0.end,
                next_begin: edge1.begin,
            });
        }

        let node0 = nodes[edge0.begin];
        let node1 = nodes[edge0.end];
        let node2 = nodes[edge1.end];

        let cross = (node0 - node1).cross(&(node2 - node1));
        let dot = node1.dot(&cross);

        if dot > 0.0 {
            return Err(MeshError::NotCounterClockwise {
                face: face_ix,
                nodes: [edge0.begin, edge0.end, edge1.end],
                coords: [node0, node1, node2],
                cross,
                dot,
            });
        }
    }

    Ok(())
}

/// 检查每条非退化边都登记在边映射中并引用了所属单元
pub fn validate_edge_adjacency(faces: &[Face], edge_map: &EdgeMap) -> MeshResult<()> {
    for (face_ix, face) in faces.iter().enumerate() {
        for edge in face.edges.iter().filter(|e| !e.is_zero()) {
            let key = edge.key();
            let ok = edge_map
                .get(&key)
                .map(|pair| pair.contains(face_ix))
                .unwrap_or(false);
            if !ok {
                return Err(MeshError::MissingEdgeAdjacency {
                    face: face_ix,
                    lo: key.lo,
                    hi: key.hi,
                });
            }
        }
    }
    Ok(())
}
