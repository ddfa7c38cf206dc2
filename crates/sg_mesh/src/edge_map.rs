// crates/sg_mesh/src/edge_map.rs

//! 边映射：无向边 → 相邻单元（至多两个）

use crate::edge::EdgeKey;
use crate::error::{MeshError, MeshResult};
use std::collections::BTreeMap;

/// 边的相邻单元对
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacePair {
    faces: [Option<usize>; 2],
}

impl FacePair {
    /// 只含一个单元
    #[inline]
    #[must_use]
    pub const fn single(face: usize) -> Self {
        Self {
            faces: [Some(face), None],
        }
    }

    /// 追加单元
    ///
    /// 返回 `false` 表示已满（非流形边）。
    pub fn add(&mut self, face: usize) -> bool {
        match self.faces {
            [None, _] => {
                self.faces[0] = Some(face);
                true
            }
            [Some(_), None] => {
                self.faces[1] = Some(face);
                true
            }
            [Some(_), Some(_)] => false,
        }
    }

    /// 第一个单元
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.faces[0]
    }

    /// 第二个单元
    #[inline]
    #[must_use]
    pub fn second(&self) -> Option<usize> {
        self.faces[1]
    }

    /// 关联单元数（0..=2）
    #[must_use]
    pub fn count(&self) -> usize {
        self.faces.iter().flatten().count()
    }

    /// 是否为边界边
    #[inline]
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.count() == 1
    }

    /// 是否包含给定单元
    #[must_use]
    pub fn contains(&self, face: usize) -> bool {
        self.faces.contains(&Some(face))
    }

    /// 给定单元在此边另一侧的单元
    #[must_use]
    pub fn other(&self, face: usize) -> Option<usize> {
        match self.faces {
            [Some(a), b] if a == face => b,
            [a, Some(b)] if b == face => a,
            _ => None,
        }
    }

    /// 遍历单元
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.faces.iter().flatten().copied()
    }
}

/// 边映射
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    map: BTreeMap<EdgeKey, FacePair>,
}

impl EdgeMap {
    /// 空映射
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记单元的一条边
    ///
    /// # Errors
    ///
    /// 边已关联两个单元时返回 [`MeshError::EdgeOverflow`]。
    pub fn add(&mut self, key: EdgeKey, face: usize) -> MeshResult<()> {
        let pair = self.map.entry(key).or_default();
        if pair.add(face) {
            Ok(())
        } else {
            Err(MeshError::EdgeOverflow {
                lo: key.lo,
                hi: key.hi,
                existing: [pair.first().unwrap_or(face), pair.second().unwrap_or(face)],
                face,
            })
        }
    }

    /// 查找边
    #[must_use]
    pub fn get(&self, key: &EdgeKey) -> Option<&FacePair> {
        self.map.get(key)
    }

    /// 不同边的数量
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 是否为空
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// 清空
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// 按键序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, &FacePair)> {
        self.map.iter()
    }

    /// 边界边数量
    #[must_use]
    pub fn n_boundary_edges(&self) -> usize {
        self.map.values().filter(|p| p.is_boundary()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_pair() {
        let mut pair = FacePair::single(3);
        assert!(pair.is_boundary());
        assert!(pair.add(8));
        assert_eq!(pair.count(), 2);
        assert_eq!(pair.other(3), Some(8));
        assert_eq!(pair.other(8), Some(3));
        assert_eq!(pair.other(1), None);
        assert!(!pair.add(9));
    }

    #[test]
    fn test_overflow() {
        let mut map = EdgeMap::new();
        let key = EdgeKey::new(1, 2);
        map.add(key, 0).unwrap();
        map.add(key, 1).unwrap();
        let err = map.add(key, 2).unwrap_err();
        assert!(matches!(
            err,
            MeshError::EdgeOverflow {
                existing: [0, 1],
                face: 2,
                ..
            }
        ));
        assert_eq!(map.len(), 1);
        assert_eq!(map.n_boundary_edges(), 0);
    }
}
