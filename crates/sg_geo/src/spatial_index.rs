// crates/sg_geo/src/spatial_index.rs

//! 节点空间索引
//!
//! 用于重合节点检测：在容差 ε 内查找已登记的节点。
//! 具体的点索引实现隐藏在 [`PointIndex`] 之后，默认使用 rstar 的 R*-tree。
//!
//! # 示例
//!
//! ```
//! use sg_geo::{Node, NodeTree};
//!
//! let mut tree = NodeTree::new(1e-6).unwrap();
//! tree.insert(&Node::new(1.0, 0.0, 0.0), 7);
//! tree.insert(&Node::new(1.0, 0.0, 1e-7), 3);
//!
//! // 返回容差内最小的索引，而不是最近的那个
//! assert_eq!(tree.find(&Node::new(1.0, 0.0, 0.0)), Some(3));
//! assert_eq!(tree.find(&Node::new(0.0, 1.0, 0.0)), None);
//! ```

use crate::node::Node;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use sg_foundation::{SgError, SgResult};

// ============================================================================
// 点索引抽象
// ============================================================================

/// 三维点索引
///
/// 每个点携带一个 `usize` 负载。
pub trait PointIndex {
    /// 插入点
    fn insert(&mut self, point: [f64; 3], payload: usize);

    /// 最近点及其负载
    fn nearest(&self, point: [f64; 3]) -> Option<([f64; 3], usize)>;

    /// 欧氏距离不超过 `radius` 的所有负载（无序）
    fn within_radius(&self, point: [f64; 3], radius: f64) -> Vec<usize>;

    /// 已登记点数
    fn len(&self) -> usize;

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// R-tree 实现
// ============================================================================

/// R-tree 条目
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    point: [f64; 3],
    payload: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// 基于 rstar R*-tree 的点索引
#[derive(Debug, Default)]
pub struct RTreeIndex {
    tree: RTree<IndexedPoint>,
}

impl RTreeIndex {
    /// 创建空索引
    #[must_use]
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }
}

impl PointIndex for RTreeIndex {
    fn insert(&mut self, point: [f64; 3], payload: usize) {
        self.tree.insert(IndexedPoint { point, payload });
    }

    fn nearest(&self, point: [f64; 3]) -> Option<([f64; 3], usize)> {
        self.tree
            .nearest_neighbor(&point)
            .map(|e| (e.point, e.payload))
    }

    fn within_radius(&self, point: [f64; 3], radius: f64) -> Vec<usize> {
        self.tree
            .locate_within_distance(point, radius * radius)
            .map(|e| e.payload)
            .collect()
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}

// ============================================================================
// NodeTree
// ============================================================================

/// 带容差的节点索引
pub struct NodeTree<I: PointIndex = RTreeIndex> {
    epsilon: f64,
    index: I,
}

impl NodeTree<RTreeIndex> {
    /// 以默认 R-tree 后端创建
    ///
    /// # Errors
    ///
    /// 容差为负或非有限时无法建立索引。
    pub fn new(epsilon: f64) -> SgResult<Self> {
        Self::with_index(epsilon, RTreeIndex::new())
    }
}

impl<I: PointIndex> NodeTree<I> {
    /// 使用指定后端创建
    ///
    /// # Errors
    ///
    /// 容差为负或非有限时返回 [`SgError::Internal`]。
    pub fn with_index(epsilon: f64, index: I) -> SgResult<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(SgError::internal(format!(
                "无法建立节点空间索引: 容差 {epsilon} 无效"
            )));
        }
        Ok(Self { epsilon, index })
    }

    /// 容差
    #[inline]
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// 已登记节点数
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// 是否为空
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 登记节点
    pub fn insert(&mut self, node: &Node, index: usize) {
        self.index.insert(node.to_array(), index);
    }

    /// 查找距离 ≤ ε 的节点中最小的负载索引
    #[must_use]
    pub fn find(&self, node: &Node) -> Option<usize> {
        self.index
            .within_radius(node.to_array(), self.epsilon)
            .into_iter()
            .min()
    }

    /// 查找匹配节点，没有则以 `index` 登记并返回 `index`
    pub fn find_or_insert(&mut self, node: &Node, index: usize) -> usize {
        match self.find(node) {
            Some(existing) => existing,
            None => {
                self.insert(node, index);
                index
            }
        }
    }

    /// 最近节点及其负载
    #[must_use]
    pub fn nearest(&self, node: &Node) -> Option<(Node, usize)> {
        self.index
            .nearest(node.to_array())
            .map(|(p, ix)| (Node::from(p), ix))
    }
}
