// crates/sg_mesh/src/mesh.rs

//! 网格聚合
//!
//! [`Mesh`] 拥有节点表与单元表，单元通过数组下标引用节点。
//! 边映射、节点反向表与单元面积为派生结构，任何对节点或单元的可变访问
//! 都会使其失效，需要时重新构造。

use crate::algorithms::{area, coincident, validation};
use crate::edge_map::EdgeMap;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use sg_foundation::Tolerance;
use sg_geo::quadrature::QuadratureRule;
use sg_geo::Node;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// 父单元索引数组，`None` 表示无对应父单元
pub type ParentIndices = Vec<Option<usize>>;

/// 球面非结构网格
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    nodes: Vec<Node>,
    faces: Vec<Face>,

    // 派生结构
    edge_map: EdgeMap,
    reverse_node_array: Vec<BTreeSet<usize>>,
    face_areas: Vec<f64>,

    // 叠加网格的来源
    source_face_ix: Option<ParentIndices>,
    target_face_ix: Option<ParentIndices>,

    mask: Option<Vec<i32>>,
}

impl Mesh {
    // =========================================================================
    // 构造
    // =========================================================================

    /// 空网格
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 由节点表与单元表直接构造
    #[must_use]
    pub fn from_parts(nodes: Vec<Node>, faces: Vec<Face>) -> Self {
        Self {
            nodes,
            faces,
            ..Self::default()
        }
    }

    /// 添加节点，返回其索引
    pub fn add_node(&mut self, node: Node) -> usize {
        self.invalidate();
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// 添加单元，返回其索引
    ///
    /// 已设置的父单元数组与掩码随之延长（`None` 与 1），保持与单元表等长。
    pub fn add_face(&mut self, face: Face) -> usize {
        self.invalidate();
        self.faces.push(face);
        if let Some(ix) = self.source_face_ix.as_mut() {
            ix.push(None);
        }
        if let Some(ix) = self.target_face_ix.as_mut() {
            ix.push(None);
        }
        if let Some(mask) = self.mask.as_mut() {
            mask.push(1);
        }
        self.faces.len() - 1
    }

    /// 清空全部数据
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn invalidate(&mut self) {
        self.edge_map.clear();
        self.reverse_node_array.clear();
        self.face_areas.clear();
    }

    // =========================================================================
    // 访问
    // =========================================================================

    /// 节点表
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// 可变节点表（派生结构失效）
    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        self.invalidate();
        &mut self.nodes
    }

    /// 单元表
    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// 可变单元表（派生结构失效）
    ///
    /// 只允许原位修改，单元数的变化须经 [`Mesh::add_face`]。
    pub fn faces_mut(&mut self) -> &mut [Face] {
        self.invalidate();
        &mut self.faces
    }

    /// 节点数
    #[inline]
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// 单元数
    #[inline]
    #[must_use]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// 是否为空
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.faces.is_empty()
    }

    /// 边映射（需先调用 [`Mesh::construct_edge_map`]）
    #[inline]
    #[must_use]
    pub fn edge_map(&self) -> &EdgeMap {
        &self.edge_map
    }

    /// 节点反向表（需先调用 [`Mesh::construct_reverse_node_array`]）
    #[inline]
    #[must_use]
    pub fn reverse_node_array(&self) -> &[BTreeSet<usize>] {
        &self.reverse_node_array
    }

    /// 单元面积（需先调用面积计算）
    #[inline]
    #[must_use]
    pub fn face_areas(&self) -> &[f64] {
        &self.face_areas
    }

    /// 最大单元边数
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.faces.iter().map(Face::degree).max().unwrap_or(0)
    }

    // =========================================================================
    // 父单元与掩码
    // =========================================================================

    /// 源网格父单元索引
    #[inline]
    #[must_use]
    pub fn source_face_ix(&self) -> Option<&[Option<usize>]> {
        self.source_face_ix.as_deref()
    }

    /// 目标网格父单元索引
    #[inline]
    #[must_use]
    pub fn target_face_ix(&self) -> Option<&[Option<usize>]> {
        self.target_face_ix.as_deref()
    }

    /// 设置源网格父单元索引，长度须等于单元数
    pub fn set_source_face_ix(&mut self, ix: Option<ParentIndices>) -> MeshResult<()> {
        self.check_face_parallel("source_face_ix", ix.as_ref().map(Vec::len))?;
        self.source_face_ix = ix;
        Ok(())
    }

    /// 设置目标网格父单元索引，长度须等于单元数
    pub fn set_target_face_ix(&mut self, ix: Option<ParentIndices>) -> MeshResult<()> {
        self.check_face_parallel("target_face_ix", ix.as_ref().map(Vec::len))?;
        self.target_face_ix = ix;
        Ok(())
    }

    /// 单元掩码
    #[inline]
    #[must_use]
    pub fn mask(&self) -> Option<&[i32]> {
        self.mask.as_deref()
    }

    /// 设置单元掩码，长度须等于单元数
    pub fn set_mask(&mut self, mask: Option<Vec<i32>>) -> MeshResult<()> {
        self.check_face_parallel("mask", mask.as_ref().map(Vec::len))?;
        self.mask = mask;
        Ok(())
    }

    fn check_face_parallel(&self, name: &'static str, len: Option<usize>) -> MeshResult<()> {
        match len {
            Some(len) if len != self.faces.len() => {
                Err(MeshError::element_count_mismatch(name, self.faces.len(), len))
            }
            _ => Ok(()),
        }
    }

    // =========================================================================
    // 派生结构
    // =========================================================================

    /// 构造边映射，返回不同边的数量
    ///
    /// 退化边被跳过。
    ///
    /// # Errors
    ///
    /// 一条边被两个以上单元引用时返回 [`MeshError::EdgeOverflow`]。
    pub fn construct_edge_map(&mut self) -> MeshResult<usize> {
        let mut map = EdgeMap::new();
        for (face_ix, face) in self.faces.iter().enumerate() {
            for edge in face.edges.iter().filter(|e| !e.is_zero()) {
                map.add(edge.key(), face_ix)?;
            }
        }
        info!("边映射: {} 条边", map.len());
        self.edge_map = map;
        Ok(self.edge_map.len())
    }

    /// 构造节点反向表：每个节点关联的单元集合
    pub fn construct_reverse_node_array(&mut self) -> MeshResult<()> {
        let n_nodes = self.nodes.len();
        let mut reverse = vec![BTreeSet::new(); n_nodes];
        for (face_ix, face) in self.faces.iter().enumerate() {
            for edge in &face.edges {
                let set = reverse
                    .get_mut(edge.begin)
                    .ok_or_else(|| MeshError::index_out_of_bounds("Node", edge.begin, n_nodes))?;
                set.insert(face_ix);
            }
        }
        self.reverse_node_array = reverse;
        Ok(())
    }

    // =========================================================================
    // 算法
    // =========================================================================

    /// 合并重合节点，返回删除的节点数
    pub fn remove_coincident_nodes(&mut self, tolerance: &Tolerance) -> MeshResult<usize> {
        let removed = coincident::remove_coincident_nodes(&mut self.nodes, &mut self.faces, tolerance)?;
        if removed > 0 {
            self.invalidate();
        }
        Ok(removed)
    }

    /// 计算全部单元面积（6 点高斯规则），返回分块求和的总面积
    pub fn calculate_face_areas(&mut self) -> f64 {
        let rule = area::default_rule();
        self.store_face_areas(&rule, &Tolerance::default())
    }

    /// 以指定求积阶数与小面积阈值计算单元面积
    ///
    /// # Errors
    ///
    /// 求积阶数为 0。
    pub fn calculate_face_areas_with(&mut self, order: usize, tolerance: &Tolerance) -> MeshResult<f64> {
        let rule = area::rule_for_order(order)?;
        Ok(self.store_face_areas(&rule, tolerance))
    }

    fn store_face_areas(&mut self, rule: &QuadratureRule, tolerance: &Tolerance) -> f64 {
        self.face_areas = area::calculate_face_areas(&self.faces, &self.nodes, rule);

        let n_small = self.face_areas.iter().filter(|&&a| tolerance.is_small_area(a)).count();
        if n_small > 0 {
            warn!("{} 个单元面积小于 {:e}", n_small, tolerance.small_area);
        }

        area::block_sum(&self.face_areas, area::AREA_BLOCK_SIZE)
    }

    /// 由叠加网格累加本网格的单元面积
    ///
    /// 叠加单元的面积加到其源父单元上，返回总面积。
    ///
    /// # Errors
    ///
    /// - 叠加网格尚未计算面积或缺少源父单元索引
    /// - 面积数组或源父单元数组与叠加单元数不等
    /// - 父单元索引越界
    pub fn calculate_face_areas_from_overlap(&mut self, overlap: &Mesh) -> MeshResult<f64> {
        const OP: &str = "calculate_face_areas_from_overlap";
        let n_overlap = overlap.faces.len();
        if overlap.face_areas.is_empty() && n_overlap > 0 {
            return Err(MeshError::invalid_topology(OP, "叠加网格尚未计算单元面积"));
        }
        if overlap.face_areas.len() != n_overlap {
            return Err(MeshError::element_count_mismatch("face areas", n_overlap, overlap.face_areas.len()));
        }
        let parents = overlap
            .source_face_ix
            .as_ref()
            .ok_or_else(|| MeshError::missing_parents(OP, "source"))?;
        if parents.len() != n_overlap {
            return Err(MeshError::element_count_mismatch("source_face_ix", n_overlap, parents.len()));
        }

        let n_faces = self.faces.len();
        let mut areas = vec![0.0; n_faces];
        let mut total = 0.0;

        for (i, (&area, parent)) in overlap.face_areas.iter().zip(parents.iter()).enumerate() {
            let ix = parent.ok_or_else(|| MeshError::invalid_topology(OP, format!("叠加单元 {i} 没有源父单元")))?;
            let slot = areas
                .get_mut(ix)
                .ok_or_else(|| MeshError::index_out_of_bounds("Face", ix, n_faces))?;
            *slot += area;
            total += area;
        }

        self.face_areas = areas;
        Ok(total)
    }

    /// 交换源网格与目标网格的角色
    ///
    /// 单元按目标父单元索引稳定排序（`None` 在前），随后两个父单元数组互换。
    pub fn exchange_first_and_second_mesh(&mut self) -> MeshResult<()> {
        const OP: &str = "exchange_first_and_second_mesh";
        let n_faces = self.faces.len();

        let source = self
            .source_face_ix
            .take()
            .ok_or_else(|| MeshError::missing_parents(OP, "source"))?;
        let target = match self.target_face_ix.take() {
            Some(t) => t,
            None => {
                self.source_face_ix = Some(source);
                return Err(MeshError::missing_parents(OP, "target"));
            }
        };
        if source.len() != n_faces || target.len() != n_faces {
            let bad = if source.len() != n_faces { source.len() } else { target.len() };
            self.source_face_ix = Some(source);
            self.target_face_ix = Some(target);
            return Err(MeshError::element_count_mismatch("parent indices", n_faces, bad));
        }

        let mut order: Vec<usize> = (0..n_faces).collect();
        order.sort_by_key(|&i| target[i]);

        let faces = std::mem::take(&mut self.faces);
        let mut slots: Vec<Option<Face>> = faces.into_iter().map(Some).collect();

        let mut new_faces = Vec::with_capacity(n_faces);
        let mut new_source = Vec::with_capacity(n_faces);
        let mut new_target = Vec::with_capacity(n_faces);
        for &i in &order {
            if let Some(face) = slots[i].take() {
                new_faces.push(face);
            }
            new_source.push(target[i]);
            new_target.push(source[i]);
        }

        self.faces = new_faces;
        self.source_face_ix = Some(new_source);
        self.target_face_ix = Some(new_target);
        if let Some(mask) = self.mask.take() {
            self.mask = Some(order.iter().filter_map(|&i| mask.get(i).copied()).collect());
        }
        self.invalidate();
        Ok(())
    }

    // =========================================================================
    // 验证
    // =========================================================================

    /// 验证节点模长与单元方向（默认容差）
    pub fn validate(&self) -> MeshResult<()> {
        self.validate_with(&Tolerance::default())
    }

    /// 验证节点模长与单元方向
    pub fn validate_with(&self, tolerance: &Tolerance) -> MeshResult<()> {
        validation::validate_node_magnitudes(&self.nodes, tolerance)?;
        validation::validate_face_orientation(&self.nodes, &self.faces)
    }

    /// 验证边映射覆盖每个单元的每条非退化边
    ///
    /// 边映射为空而网格有单元时先构造边映射。
    pub fn validate_edge_adjacency(&mut self) -> MeshResult<()> {
        if self.edge_map.is_empty() && !self.faces.is_empty() {
            self.construct_edge_map()?;
        }
        validation::validate_edge_adjacency(&self.faces, &self.edge_map)
    }
}
