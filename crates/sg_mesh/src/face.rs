// crates/sg_mesh/src/face.rs

//! 球面多边形单元
//!
//! 单元是首尾相接的有向边序列：`edges[i].end == edges[i + 1].begin`。

use crate::edge::{Edge, EdgeType};
use serde::{Deserialize, Serialize};
use sg_geo::Node;

/// 球面多边形单元
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// 有向边（逆时针）
    pub edges: Vec<Edge>,
}

impl Face {
    /// 创建 `degree` 条边的空单元，节点稍后通过 [`Face::set_node`] 填充
    #[must_use]
    pub fn with_degree(degree: usize) -> Self {
        Self {
            edges: vec![Edge::default(); degree],
        }
    }

    /// 由节点环创建，全部为大圆弧
    ///
    /// # 示例
    ///
    /// ```
    /// use sg_mesh::Face;
    ///
    /// let face = Face::from_nodes(&[0, 1, 2]);
    /// assert_eq!(face.degree(), 3);
    /// assert_eq!(face.edges[2].end, 0);
    /// ```
    #[must_use]
    pub fn from_nodes(nodes: &[usize]) -> Self {
        let n = nodes.len();
        let edges = (0..n)
            .map(|i| Edge::new(nodes[i], nodes[(i + 1) % n]))
            .collect();
        Self { edges }
    }

    /// 由节点环与逐边类型创建；类型不足的边取大圆弧
    #[must_use]
    pub fn from_nodes_with_types(nodes: &[usize], types: &[EdgeType]) -> Self {
        let mut face = Self::from_nodes(nodes);
        for (edge, t) in face.edges.iter_mut().zip(types.iter()) {
            edge.edge_type = *t;
        }
        face
    }

    /// 边数
    #[inline]
    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// 第 `k` 个节点（第 `k` 条边的起点）
    #[inline]
    #[must_use]
    pub fn node(&self, k: usize) -> usize {
        self.edges[k].begin
    }

    /// 节点环
    pub fn node_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().map(|e| e.begin)
    }

    /// 设置第 `k` 个节点，同时更新前一条边的终点
    pub fn set_node(&mut self, k: usize, ix: usize) {
        let n = self.edges.len();
        self.edges[k].begin = ix;
        self.edges[(k + n - 1) % n].end = ix;
    }

    /// 查找与给定边无向相等的边位置
    #[must_use]
    pub fn edge_index(&self, edge: &Edge) -> Option<usize> {
        let key = edge.key();
        self.edges.iter().position(|e| e.key() == key)
    }

    /// 删除退化边，保持其余边的环序
    pub fn remove_zero_edges(&mut self) {
        self.edges.retain(|e| !e.is_zero());
    }

    /// 点是否位于单元内
    ///
    /// 以过查询点的 z 平面做射线穿越判定：跳过完全位于平面一侧或
    /// 与平面平行的边；对穿越边从 z 较小的端点插值交点，只统计
    /// 有符号角位移非负的交点，z 递增的边计 +1，递减的边计 -1，
    /// 总和为正即在内部。
    ///
    /// 边界上的点：z 递增边上的点计入（位移为 0 仍接受），
    /// 查询点所在 z 平面内的边被跳过。
    ///
    /// `nodes` 必须覆盖单元引用的全部节点索引。
    #[must_use]
    pub fn contains(&self, point: &Node, nodes: &[Node]) -> bool {
        let n = self.edges.len();
        let mut parity = 0i32;

        for i1 in 0..n {
            let n1 = nodes[self.node(i1)];
            let n2 = nodes[self.node((i1 + 1) % n)];

            if n1.z > point.z && n2.z > point.z {
                continue;
            }
            if n1.z < point.z && n2.z < point.z {
                continue;
            }
            if n1.z == n2.z {
                continue;
            }

            let (lower, upper) = if n1.z < n2.z { (n1, n2) } else { (n2, n1) };
            let t = (point.z - lower.z) / (upper.z - lower.z);
            let nx = Node::new(
                (1.0 - t) * lower.x + t * upper.x,
                (1.0 - t) * lower.y + t * upper.y,
                point.z,
            );

            let dc = point.x * nx.y - point.y * nx.x;
            let dd = point.dot(&nx);
            let da = dc / dd;
            if da < 0.0 {
                continue;
            }

            if n1.z < n2.z {
                parity += 1;
            } else {
                parity -= 1;
            }
        }

        parity > 0
    }
}
