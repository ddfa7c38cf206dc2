// crates/sg_geo/src/lib.rs

//! SphereGrid 几何模块
//!
//! 单位球面上的几何基础设施。
//!
//! # 模块
//!
//! - `node`: 三维笛卡尔节点 [`Node`] 及向量运算
//! - `sphere`: 笛卡尔坐标与经纬度的相互转换
//! - `quadrature`: 区间 [a, b] 上的高斯-勒让德求积点与权重
//! - `spatial_index`: 基于 R*-tree 的节点去重索引 [`NodeTree`]
//!
//! # 示例
//!
//! ```
//! use sg_geo::prelude::*;
//!
//! let n = lonlat_deg_to_xyz(90.0, 0.0);
//! assert!((n.y - 1.0).abs() < 1e-12);
//!
//! let mut tree = NodeTree::new(1e-12).unwrap();
//! assert_eq!(tree.find_or_insert(&n, 0), 0);
//! assert_eq!(tree.find_or_insert(&n, 1), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod node;
pub mod quadrature;
pub mod spatial_index;
pub mod sphere;

/// 预导入模块
pub mod prelude {
    pub use crate::node::Node;
    pub use crate::quadrature::gauss_legendre;
    pub use crate::spatial_index::{NodeTree, PointIndex, RTreeIndex};
    pub use crate::sphere::{lonlat_deg_to_xyz, lonlat_rad_to_xyz, xyz_to_lonlat_deg};
}

// 重导出常用类型
pub use node::Node;
pub use spatial_index::{NodeTree, PointIndex, RTreeIndex};
