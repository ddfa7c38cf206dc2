// crates/sg_mesh/src/lib.rs

//! SphereGrid 网格模块
//!
//! 单位球面上的多边形非结构网格：数据结构、修复、验证与面积计算。
//!
//! # 核心类型
//!
//! - [`Mesh`]: 节点表 + 单元表，以及派生的边映射、节点反向表、单元面积
//! - [`Face`]: 由有向边首尾相接组成的球面多边形
//! - [`Edge`] / [`EdgeKey`]: 有向边与无向边键
//! - [`EdgeMap`] / [`FacePair`]: 无向边到至多两个相邻单元的映射
//!
//! # 模块结构
//!
//! - [`algorithms`]: 重合节点合并、面积求积、验证
//! - [`direction`]: 边的局部切向
//!
//! # 示例
//!
//! ```rust
//! use sg_geo::Node;
//! use sg_mesh::{Face, Mesh};
//!
//! let mut mesh = Mesh::new();
//! let a = mesh.add_node(Node::new(1.0, 0.0, 0.0));
//! let b = mesh.add_node(Node::new(0.0, 1.0, 0.0));
//! let c = mesh.add_node(Node::new(0.0, 0.0, 1.0));
//! mesh.add_face(Face::from_nodes(&[a, b, c]));
//!
//! mesh.validate().unwrap();
//! assert_eq!(mesh.construct_edge_map().unwrap(), 3);
//! assert!(mesh.calculate_face_areas() > 1.5);
//! ```

pub mod algorithms;
pub mod direction;
pub mod edge;
pub mod edge_map;
pub mod error;
pub mod face;
pub mod mesh;

// 重新导出核心类型
pub use edge::{Edge, EdgeKey, EdgeType};
pub use edge_map::{EdgeMap, FacePair};
pub use error::{MeshError, MeshResult};
pub use face::Face;
pub use mesh::{Mesh, ParentIndices};
