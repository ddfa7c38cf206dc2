// crates/sg_mesh/src/algorithms/mod.rs

//! 网格算法模块
//!
//! 重合节点合并、单元面积求积、几何与拓扑验证。
//! 这里的函数直接作用于节点表与单元表，[`crate::Mesh`] 上的同名方法负责
//! 维护派生结构。

pub mod area;
pub mod coincident;
pub mod validation;

// 重导出常用函数
pub use area::{
    block_sum, calculate_face_area, calculate_face_area_with_order, calculate_face_area_with_rule,
    AREA_BLOCK_SIZE, DEFAULT_QUADRATURE_ORDER,
};
pub use coincident::remove_coincident_nodes;
pub use validation::{validate_edge_adjacency, validate_face_orientation, validate_node_magnitudes};
