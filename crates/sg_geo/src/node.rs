// crates/sg_geo/src/node.rs

//! 三维节点
//!
//! 网格顶点统一使用笛卡尔坐标表示，球面网格的节点应位于单位球上。

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{Add, Mul, Neg, Sub};

// ============================================================================
// Node
// ============================================================================

/// 三维笛卡尔节点
///
/// 相等与排序按 `(x, y, z)` 字典序并使用 [`f64::total_cmp`]，
/// 因此 `Node` 可以直接作为有序容器的键。
///
/// # 示例
///
/// ```
/// use sg_geo::Node;
///
/// let a = Node::new(1.0, 0.0, 0.0);
/// let b = Node::new(0.0, 1.0, 0.0);
/// let c = a.cross(&b);
/// assert_eq!(c, Node::new(0.0, 0.0, 1.0));
/// assert!(b < a);
/// ```
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Node {
    /// X坐标
    pub x: f64,
    /// Y坐标
    pub y: f64,
    /// Z坐标
    pub z: f64,
}

impl Node {
    /// 原点
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// 创建新节点
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 点积
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// 叉积
    #[inline]
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// 模长
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// 到另一节点的欧氏距离
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// 投影到单位球面；零向量保持不变
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            *self * (1.0 / mag)
        } else {
            *self
        }
    }

    /// 转为数组
    #[inline]
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// 坐标是否全部有限
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Node {
    #[inline]
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl From<Node> for [f64; 3] {
    #[inline]
    fn from(n: Node) -> Self {
        n.to_array()
    }
}

// ============================================================================
// 运算符
// ============================================================================

impl Add for Node {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Node {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Node {
    type Output = Self;

    #[inline]
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Node {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ============================================================================
// 全序
// ============================================================================

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.z.total_cmp(&other.z))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_vector_algebra() {
        let a = Node::new(1.0, 2.0, 3.0);
        let b = Node::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Node::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Node::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Node::new(2.0, 4.0, 6.0));
        assert!((a.dot(&b) - 32.0).abs() < 1e-14);
        assert_eq!(a.cross(&b), Node::new(-3.0, 6.0, -3.0));
    }

    #[test]
    fn test_normalized() {
        let n = Node::new(3.0, 0.0, 4.0).normalized();
        assert!((n.magnitude() - 1.0).abs() < 1e-15);
        assert_eq!(Node::ORIGIN.normalized(), Node::ORIGIN);
    }

    #[test]
    fn test_lexicographic_order() {
        let a = Node::new(0.0, 1.0, 5.0);
        let b = Node::new(0.0, 2.0, -5.0);
        let c = Node::new(1.0, -9.0, -9.0);
        assert!(a < b);
        assert!(b < c);

        let set: BTreeSet<Node> = [c, a, b, a].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().next(), Some(&a));
    }

    #[test]
    fn test_serde_roundtrip() {
        let n = Node::new(0.25, -0.5, 0.75);
        let s = serde_json::to_string(&n).unwrap();
        let back: Node = serde_json::from_str(&s).unwrap();
        assert_eq!(n, back);
    }
}
