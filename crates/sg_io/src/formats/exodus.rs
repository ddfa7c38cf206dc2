// crates/sg_io/src/formats/exodus.rs

//! Exodus 多块网格读写
//!
//! 单元按每单元节点数分块，块号从 1 开始。全局属性 `version` 决定布局，
//! 在读取开始时一次性解析为 [`ExodusVersion`]，之后的读取路径只查询它。

use super::{put_common_attributes, GridFormat, Source};
use crate::dataset::{pack_strings, AttrValue, Dataset, VarData};
use crate::error::{IoError, IoResult};
use crate::reader::ReadOptions;
use sg_foundation::SgError;
use sg_mesh::{EdgeType, Face, Mesh, MeshError, ParentIndices};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// 字符串槽长度
pub const LEN_STRING: usize = 33;
/// 行长度
pub const LEN_LINE: usize = 81;
/// 写出文件的版本号
pub const WRITE_VERSION: f32 = 5.0;

const PROGRAM: &str = env!("CARGO_PKG_NAME");
const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// 版本
// ============================================================================

/// Exodus 布局版本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExodusVersion {
    /// 当前布局
    Current,
    /// 4.98 旧布局：无 `global_id`，变量名不带块号，父单元索引少 1
    Legacy,
}

impl ExodusVersion {
    /// 旧布局的版本号
    pub const LEGACY_VERSION: f32 = 4.98;

    /// 由 `version` 属性解析
    #[must_use]
    pub fn from_version(version: f32) -> Self {
        if version == Self::LEGACY_VERSION {
            Self::Legacy
        } else {
            Self::Current
        }
    }

    fn edge_type_var(self, block: usize) -> String {
        match self {
            Self::Current => format!("edge_type{block}"),
            Self::Legacy => "edge_type".to_string(),
        }
    }

    fn parent_a_var(self, block: usize) -> String {
        match self {
            Self::Current => format!("el_parent_a{block}"),
            Self::Legacy => "face_source_1".to_string(),
        }
    }

    fn parent_b_var(self, block: usize) -> String {
        match self {
            Self::Current => format!("el_parent_b{block}"),
            Self::Legacy => "face_source_2".to_string(),
        }
    }

    /// 存储值到 0 基父单元索引的修正量
    fn parent_offset(self) -> i64 {
        match self {
            Self::Current => -1,
            Self::Legacy => 0,
        }
    }
}

// ============================================================================
// 读取
// ============================================================================

/// 父单元数组的逐块累积，变量必须在所有块中都存在或都不存在
struct ParentColumn {
    label: &'static str,
    values: Option<ParentIndices>,
}

impl ParentColumn {
    fn new(label: &'static str) -> Self {
        Self { label, values: None }
    }

    /// 读取第 `block` 块的父单元变量
    fn load(
        &mut self,
        src: &Source<'_>,
        name: &str,
        block: usize,
        count: usize,
        n_faces: usize,
    ) -> IoResult<Option<Vec<i64>>> {
        match (src.opt_var(name), block) {
            (Some(var), 1) => {
                self.values = Some(vec![None; n_faces]);
                src.expect_shape(name, var, &[count])?;
                Ok(Some(src.integers(name, var, count)?))
            }
            (Some(var), _) if self.values.is_some() => {
                src.expect_shape(name, var, &[count])?;
                Ok(Some(src.integers(name, var, count)?))
            }
            (Some(_), _) => Err(src.invalid(format!(
                "{} 变量 \"{name}\" 出现在块 {block}, 但之前的块中缺失",
                self.label
            ))),
            (None, _) if self.values.is_some() => Err(IoError::MissingVariable {
                file: src.file.to_string(),
                dialect: src.dialect,
                name: name.to_string(),
            }),
            (None, _) => Ok(None),
        }
    }

    fn set(&mut self, slot: usize, stored: i64, version: ExodusVersion) {
        if let Some(values) = self.values.as_mut() {
            let ix = stored + version.parent_offset();
            values[slot] = usize::try_from(ix).ok();
        }
    }
}

/// 读取 Exodus 网格，结束时总是合并重合节点
pub fn read(ds: &Dataset, file: &str, opts: &ReadOptions) -> IoResult<Mesh> {
    let src = Source::new(ds, file, GridFormat::Exodus);

    let version = ds
        .attr("version")
        .and_then(AttrValue::as_f32)
        .map(ExodusVersion::from_version)
        .ok_or_else(|| IoError::MissingAttribute {
            file: file.to_string(),
            dialect: src.dialect,
            name: "version".to_string(),
            expected: "float",
        })?;

    let n_nodes = src.dim("num_nodes")?;
    let n_blocks = src.dim("num_el_blk")?;
    let n_faces = src.dim("num_elem")?;
    info!("Exodus 网格: 节点 {} 个, 单元 {} 个, {} 块 ({:?})", n_nodes, n_faces, n_blocks, version);

    let mut slots: Vec<Option<Face>> = vec![None; n_faces];
    let mut parent_a = ParentColumn::new("源父单元");
    let mut parent_b = ParentColumn::new("目标父单元");

    for block in 1..=n_blocks {
        let dim_npe = format!("num_nod_per_el{block}");
        let dim_count = format!("num_el_in_blk{block}");
        let npe = src.dim(&dim_npe)?;
        let count = src.dim(&dim_count)?;
        debug!("块 {}: {} 个单元, 每单元 {} 个节点", block, count, npe);

        let connect_name = format!("connect{block}");
        let connect_var = src.var(&connect_name)?;
        src.expect_dims(&connect_name, connect_var, &[dim_count.as_str(), dim_npe.as_str()])?;
        let connect = src.integers(&connect_name, connect_var, count * npe)?;

        let global_id: Vec<i64> = match version {
            ExodusVersion::Legacy => (1..=count as i64).collect(),
            ExodusVersion::Current => {
                let name = format!("global_id{block}");
                let var = src.var(&name)?;
                src.expect_dims(&name, var, &[dim_count.as_str()])?;
                src.integers(&name, var, count)?
            }
        };

        let edge_type_name = version.edge_type_var(block);
        let edge_types = match src.opt_var(&edge_type_name) {
            Some(var) => {
                src.expect_shape(&edge_type_name, var, &[count, npe])?;
                Some(src.integers(&edge_type_name, var, count * npe)?)
            }
            None => None,
        };

        let a = parent_a.load(&src, &version.parent_a_var(block), block, count, n_faces)?;
        let b = parent_b.load(&src, &version.parent_b_var(block), block, count, n_faces)?;

        for i in 0..count {
            let id = global_id[i];
            if id < 1 || id as usize > n_faces {
                return Err(src.out_of_range(
                    &format!("global_id{block}"),
                    format!("global_id {id} 不在 [1, {n_faces}] 内"),
                ));
            }
            let slot = id as usize - 1;
            if slots[slot].is_some() {
                return Err(IoError::DuplicateId {
                    file: file.to_string(),
                    block,
                    id,
                });
            }

            let mut face = Face::with_degree(npe);
            for k in 0..npe {
                let c = connect[i * npe + k];
                if c < 1 || c as usize > n_nodes {
                    return Err(src.out_of_range(
                        &connect_name,
                        format!("单元 {i} 第 {k} 个节点 {c} 不在 [1, {n_nodes}] 内"),
                    ));
                }
                face.set_node(k, c as usize - 1);
                if let Some(types) = &edge_types {
                    face.edges[k].edge_type = EdgeType::from_code(types[i * npe + k])?;
                }
            }
            slots[slot] = Some(face);

            if let Some(a) = &a {
                parent_a.set(slot, a[i], version);
            }
            if let Some(b) = &b {
                parent_b.set(slot, b[i], version);
            }
        }
    }

    let mut faces = Vec::with_capacity(n_faces);
    for (index, slot) in slots.into_iter().enumerate() {
        faces.push(slot.ok_or_else(|| IoError::MissingElement {
            file: file.to_string(),
            index,
        })?);
    }

    let coord_var = src.var("coord")?;
    src.expect_dims("coord", coord_var, &["num_dim", "num_nodes"])?;
    src.expect_shape("coord", coord_var, &[3, n_nodes])?;
    let coord = src.values("coord", coord_var, 3 * n_nodes)?;
    let nodes = (0..n_nodes)
        .map(|i| sg_geo::Node::new(coord[i], coord[n_nodes + i], coord[2 * n_nodes + i]))
        .collect();

    let mut mesh = Mesh::from_parts(nodes, faces);
    mesh.set_source_face_ix(parent_a.values)?;
    mesh.set_target_face_ix(parent_b.values)?;
    mesh.remove_coincident_nodes(&opts.tolerance)?;
    Ok(mesh)
}

// ============================================================================
// 写出
// ============================================================================

fn to_i32(value: usize, what: &str) -> IoResult<i32> {
    i32::try_from(value)
        .map_err(|_| SgError::invalid_input(format!("{what} {value} 超出 32 位整数范围")).into())
}

fn parent_codes(name: &'static str, ix: &[Option<usize>], faces: &[usize], n_faces: usize) -> IoResult<Vec<i32>> {
    if ix.len() != n_faces {
        return Err(MeshError::element_count_mismatch(name, n_faces, ix.len()).into());
    }
    faces
        .iter()
        .map(|&f| match ix.get(f) {
            Some(Some(p)) => to_i32(p + 1, "父单元索引"),
            Some(None) => Ok(0),
            None => Err(SgError::index_out_of_bounds("Face", f, ix.len()).into()),
        })
        .collect()
}

/// 把网格转换为 Exodus 数据集
///
/// 单元按边数升序分块；`title` 记录文件名与当前本地时间。
pub fn to_dataset(mesh: &Mesh, file: &str) -> IoResult<Dataset> {
    let nodes = mesh.nodes();
    let faces = mesh.faces();
    for face in faces {
        for ix in face.node_indices() {
            SgError::check_index("Node", ix, nodes.len())?;
        }
    }

    let mut blocks: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, face) in faces.iter().enumerate() {
        blocks.entry(face.degree()).or_default().push(i);
    }
    for (n, (degree, members)) in blocks.iter().enumerate() {
        info!("块 {}: 每单元 {} 个节点, {} 个单元", n + 1, degree, members.len());
    }

    let mut ds = Dataset::new();
    ds.add_dimension("len_string", LEN_STRING)?;
    ds.add_dimension("len_line", LEN_LINE)?;
    ds.add_dimension("four", 4)?;
    ds.add_unlimited_dimension("time_step", 0)?;
    ds.add_dimension("num_dim", 3)?;
    ds.add_dimension("num_nodes", nodes.len())?;
    ds.add_dimension("num_elem", faces.len())?;
    ds.add_dimension("num_qa_rec", 1)?;
    ds.add_dimension("num_el_blk", blocks.len())?;

    put_common_attributes(&mut ds);
    let now = chrono::Local::now();
    let date = now.format("%m/%d/%Y").to_string();
    let time = now.format("%X").to_string();
    ds.set_attr("title", format!("{PROGRAM}({file}) {date}: {time}"));

    ds.add_variable("time_whole", &["time_step"], VarData::Double(Vec::new()))?;
    ds.add_variable(
        "qa_records",
        &["num_qa_rec", "four", "len_string"],
        VarData::Char(pack_strings(&[PROGRAM, PROGRAM_VERSION, date.as_str(), time.as_str()], LEN_STRING)),
    )?;
    ds.add_variable(
        "coor_names",
        &["num_dim", "len_string"],
        VarData::Char(pack_strings(&["x", "y", "z"], LEN_STRING)),
    )?;

    let n_blocks = blocks.len();
    ds.add_variable("eb_names", &["num_el_blk", "len_string"], VarData::Char(vec![0; n_blocks * LEN_STRING]))?;
    ds.add_variable("eb_status", &["num_el_blk"], VarData::Int(vec![1; n_blocks]))?;
    let ids = (1..=n_blocks).map(|n| to_i32(n, "块号")).collect::<IoResult<Vec<_>>>()?;
    ds.add_variable("eb_prop1", &["num_el_blk"], VarData::Int(ids))?
        .set_attr("name", "ID");

    for (n, (&degree, members)) in blocks.iter().enumerate() {
        let block = n + 1;
        let dim_count = format!("num_el_in_blk{block}");
        let dim_npe = format!("num_nod_per_el{block}");
        let dim_att = format!("num_att_in_blk{block}");
        ds.add_dimension(&dim_count, members.len())?;
        ds.add_dimension(&dim_npe, degree)?;
        ds.add_dimension(&dim_att, 1)?;

        ds.add_variable(
            &format!("attrib{block}"),
            &[dim_count.as_str(), dim_att.as_str()],
            VarData::Double(vec![1.0; members.len()]),
        )?;

        let mut connect = Vec::with_capacity(members.len() * degree);
        let mut edge_type = Vec::with_capacity(members.len() * degree);
        for &f in members {
            for edge in &faces[f].edges {
                connect.push(to_i32(edge.begin + 1, "节点索引")?);
                edge_type.push(edge.edge_type.code());
            }
        }
        ds.add_variable(&format!("connect{block}"), &[dim_count.as_str(), dim_npe.as_str()], VarData::Int(connect))?
            .set_attr("elem_type", format!("SHELL{degree}"));

        let global_id = members
            .iter()
            .map(|&f| to_i32(f + 1, "单元编号"))
            .collect::<IoResult<Vec<_>>>()?;
        ds.add_variable(&format!("global_id{block}"), &[dim_count.as_str()], VarData::Int(global_id))?;
        ds.add_variable(&format!("edge_type{block}"), &[dim_count.as_str(), dim_npe.as_str()], VarData::Int(edge_type))?;

        if let Some(ix) = mesh.source_face_ix() {
            let codes = parent_codes("source_face_ix", ix, members, faces.len())?;
            ds.add_variable(&format!("el_parent_a{block}"), &[dim_count.as_str()], VarData::Int(codes))?;
        }
        if let Some(ix) = mesh.target_face_ix() {
            let codes = parent_codes("target_face_ix", ix, members, faces.len())?;
            ds.add_variable(&format!("el_parent_b{block}"), &[dim_count.as_str()], VarData::Int(codes))?;
        }
    }

    let coord: Vec<f64> = nodes
        .iter()
        .map(|n| n.x)
        .chain(nodes.iter().map(|n| n.y))
        .chain(nodes.iter().map(|n| n.z))
        .collect();
    ds.add_variable("coord", &["num_dim", "num_nodes"], VarData::Double(coord))?;

    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_geo::Node;

    fn octahedron() -> Mesh {
        let nodes = vec![
            Node::new(1.0, 0.0, 0.0),
            Node::new(0.0, 1.0, 0.0),
            Node::new(-1.0, 0.0, 0.0),
            Node::new(0.0, -1.0, 0.0),
            Node::new(0.0, 0.0, 1.0),
            Node::new(0.0, 0.0, -1.0),
        ];
        let faces = vec![
            Face::from_nodes(&[0, 1, 4]),
            Face::from_nodes(&[1, 2, 4]),
            Face::from_nodes(&[2, 3, 4]),
            Face::from_nodes(&[3, 0, 4]),
            Face::from_nodes(&[1, 0, 5]),
            Face::from_nodes(&[2, 1, 5]),
            Face::from_nodes(&[3, 2, 5]),
            Face::from_nodes(&[0, 3, 5]),
        ];
        Mesh::from_parts(nodes, faces)
    }

    #[test]
    fn test_version_resolution() {
        assert_eq!(ExodusVersion::from_version(4.98), ExodusVersion::Legacy);
        assert_eq!(ExodusVersion::from_version(5.0), ExodusVersion::Current);
        assert_eq!(ExodusVersion::Legacy.parent_a_var(3), "face_source_1");
        assert_eq!(ExodusVersion::Current.parent_b_var(3), "el_parent_b3");
        assert_eq!(ExodusVersion::Legacy.edge_type_var(2), "edge_type");
    }

    #[test]
    fn test_writer_layout() {
        let ds = to_dataset(&octahedron(), "octa.g").unwrap();
        assert_eq!(ds.dimension_len("len_string"), Some(33));
        assert_eq!(ds.dimension_len("len_line"), Some(81));
        assert_eq!(ds.dimension_len("four"), Some(4));
        assert!(ds.dimension("time_step").unwrap().unlimited);
        assert_eq!(ds.dimension_len("num_el_blk"), Some(1));
        assert_eq!(ds.dimension_len("num_nod_per_el1"), Some(3));
        assert_eq!(ds.dimension_len("num_att_in_blk1"), Some(1));

        let title = ds.attr("title").and_then(AttrValue::as_str).unwrap();
        assert!(title.starts_with("sg_io(octa.g) "));

        let connect = ds.variable("connect1").unwrap();
        assert_eq!(connect.attr("elem_type").and_then(AttrValue::as_str), Some("SHELL3"));
        assert_eq!(&connect.data.to_i64().unwrap()[..3], &[1, 2, 5]);

        let prop = ds.variable("eb_prop1").unwrap();
        assert_eq!(prop.attr("name").and_then(AttrValue::as_str), Some("ID"));

        let names = ds.variable("coor_names").unwrap();
        assert_eq!(names.data, VarData::Char(pack_strings(&["x", "y", "z"], LEN_STRING)));
        assert!(ds.variable("el_parent_a1").is_none());
    }

    #[test]
    fn test_blocks_sorted_by_degree() {
        let nodes = vec![
            Node::new(1.0, 0.0, 0.0),
            Node::new(0.0, 1.0, 0.0),
            Node::new(0.0, 0.0, 1.0),
            Node::new(0.0, -1.0, 0.0),
        ];
        let faces = vec![Face::from_nodes(&[3, 0, 1, 2]), Face::from_nodes(&[0, 1, 2])];
        let ds = to_dataset(&Mesh::from_parts(nodes, faces), "mixed.g").unwrap();
        assert_eq!(ds.dimension_len("num_nod_per_el1"), Some(3));
        assert_eq!(ds.dimension_len("num_nod_per_el2"), Some(4));
        assert_eq!(ds.variable("global_id1").unwrap().data, VarData::Int(vec![2]));
        assert_eq!(ds.variable("global_id2").unwrap().data, VarData::Int(vec![1]));
    }

    #[test]
    fn test_roundtrip_with_parents() {
        let mut mesh = octahedron();
        mesh.set_source_face_ix(Some(vec![Some(0), None, Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)]))
            .unwrap();
        let ds = to_dataset(&mesh, "octa.g").unwrap();
        assert_eq!(
            ds.variable("el_parent_a1").unwrap().data,
            VarData::Int(vec![1, 0, 3, 4, 5, 6, 7, 8])
        );

        let back = read(&ds, "octa.g", &ReadOptions::default()).unwrap();
        assert_eq!(back.nodes(), mesh.nodes());
        assert_eq!(back.faces(), mesh.faces());
        assert_eq!(back.source_face_ix(), mesh.source_face_ix());
        assert!(back.target_face_ix().is_none());
    }

    #[test]
    fn test_parents_follow_added_faces() {
        let mut mesh = octahedron();
        mesh.set_source_face_ix(Some((0..8).map(Some).collect())).unwrap();
        mesh.add_face(Face::from_nodes(&[0, 1, 4]));
        assert_eq!(mesh.n_faces(), 9);

        let ds = to_dataset(&mesh, "octa.g").unwrap();
        assert_eq!(
            ds.variable("el_parent_a1").unwrap().data,
            VarData::Int(vec![1, 2, 3, 4, 5, 6, 7, 8, 0])
        );
        assert!(ds.variable("el_parent_b1").is_none());
    }

    #[test]
    fn test_connect_must_match_block_dimensions() {
        // 列数与 num_nod_per_el1 不符
        let mut ds = to_dataset(&octahedron(), "octa.g").unwrap();
        ds.add_dimension("num_nod_per_el_wrong", 4).unwrap();
        ds.add_dimension("num_el_half", 6).unwrap();
        if let Some(v) = ds.variables.get_mut("connect1") {
            v.dims = vec!["num_el_half".into(), "num_nod_per_el_wrong".into()];
        }
        let err = read(&ds, "octa.g", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "connect1"));

        // coord 首维不是 num_dim
        let mut ds = to_dataset(&octahedron(), "octa.g").unwrap();
        if let Some(v) = ds.variables.get_mut("coord") {
            v.dims = vec!["num_nodes".into(), "num_dim".into()];
        }
        let err = read(&ds, "octa.g", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "coord"));
    }

    #[test]
    fn test_version_must_be_float() {
        let mut ds = to_dataset(&octahedron(), "octa.g").unwrap();
        ds.set_attr("version", 5.0f64);
        let err = read(&ds, "octa.g", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::MissingAttribute { ref name, .. } if name == "version"));
    }

    #[test]
    fn test_duplicate_and_unfilled_ids() {
        let mut ds = to_dataset(&octahedron(), "octa.g").unwrap();
        if let Some(v) = ds.variables.get_mut("global_id1") {
            v.data = VarData::Int(vec![1, 2, 3, 4, 5, 6, 7, 7]);
        }
        let err = read(&ds, "octa.g", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::DuplicateId { block: 1, id: 7, .. }));

        let mut ds = to_dataset(&octahedron(), "octa.g").unwrap();
        if let Some(v) = ds.variables.get_mut("global_id1") {
            v.data = VarData::Int(vec![1, 2, 3, 4, 5, 6, 7, 9]);
        }
        let err = read(&ds, "octa.g", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_parent_variable_in_some_blocks_only() {
        let nodes = vec![
            Node::new(1.0, 0.0, 0.0),
            Node::new(0.0, 1.0, 0.0),
            Node::new(0.0, 0.0, 1.0),
            Node::new(0.0, -1.0, 0.0),
        ];
        let faces = vec![Face::from_nodes(&[3, 0, 1, 2]), Face::from_nodes(&[0, 1, 2])];
        let mut mesh = Mesh::from_parts(nodes, faces);
        mesh.set_target_face_ix(Some(vec![Some(0), Some(1)])).unwrap();
        let mut ds = to_dataset(&mesh, "mixed.g").unwrap();
        ds.variables.remove("el_parent_b2");

        let err = read(&ds, "mixed.g", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::MissingVariable { ref name, .. } if name == "el_parent_b2"));
    }
}
