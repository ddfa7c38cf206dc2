// crates/sg_io/src/formats/icon.rs

//! ICON 网格读取
//!
//! 节点直接给出笛卡尔坐标，`vertex_of_cell` 为 `(nv, cell)` 形状的
//! 1 基节点索引。坐标本身已是规范形式，不做重合节点合并。

use super::{GridFormat, Source};
use crate::dataset::Dataset;
use crate::error::IoResult;
use sg_geo::Node;
use sg_mesh::{Face, Mesh};
use tracing::info;

/// ICON 文件的 `title` 全局属性
pub const ICON_TITLE: &str = "ICON grid description";

const COORD_VARS: [&str; 3] = [
    "cartesian_x_vertices",
    "cartesian_y_vertices",
    "cartesian_z_vertices",
];

/// 读取 ICON 网格
pub fn read(ds: &Dataset, file: &str) -> IoResult<Mesh> {
    let src = Source::new(ds, file, GridFormat::Icon);

    let n_nodes = src.dim("vertex")?;
    let n_cells = src.dim("cell")?;

    let mut coords = Vec::with_capacity(3);
    for name in COORD_VARS {
        let var = src.var(name)?;
        src.expect_dims(name, var, &["vertex"])?;
        coords.push(src.values(name, var, n_nodes)?);
    }
    let nodes: Vec<Node> = (0..n_nodes)
        .map(|i| Node::new(coords[0][i], coords[1][i], coords[2][i]))
        .collect();

    let name = "vertex_of_cell";
    let var = src.var(name)?;
    if var.rank() != 2 {
        return Err(src.bad_shape(name, format!("必须为 2 维, 实际 {} 维", var.rank())));
    }
    if var.dims[1] != "cell" {
        return Err(src.bad_shape(name, format!("第 1 维必须为 \"cell\", 实际为 \"{}\"", var.dims[1])));
    }
    let nv = src.shape(var)[0];
    let vertex_of_cell = src.integers(name, var, nv * n_cells)?;

    let mut faces = vec![Face::with_degree(nv); n_cells];
    for (j, row) in vertex_of_cell.chunks(n_cells.max(1)).take(nv).enumerate() {
        for (i, &v) in row.iter().enumerate() {
            if v < 1 || v as usize > n_nodes {
                return Err(src.out_of_range(
                    name,
                    format!("单元 {i} 第 {j} 个顶点 {v} 不在 [1, {n_nodes}] 内"),
                ));
            }
            faces[i].set_node(j, v as usize - 1);
        }
    }

    info!("ICON 网格: 节点 {} 个, 单元 {} 个", n_nodes, n_cells);
    Ok(Mesh::from_parts(nodes, faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::VarData;
    use crate::error::IoError;

    fn octahedron_cap() -> Dataset {
        // 北半球四个三角形：节点 +x, +y, -x, -y, +z
        let mut ds = Dataset::new();
        ds.set_attr("title", ICON_TITLE);
        ds.add_dimension("vertex", 5).unwrap();
        ds.add_dimension("cell", 4).unwrap();
        ds.add_dimension("nv", 3).unwrap();
        ds.add_variable("cartesian_x_vertices", &["vertex"], VarData::Double(vec![1.0, 0.0, -1.0, 0.0, 0.0]))
            .unwrap();
        ds.add_variable("cartesian_y_vertices", &["vertex"], VarData::Double(vec![0.0, 1.0, 0.0, -1.0, 0.0]))
            .unwrap();
        ds.add_variable("cartesian_z_vertices", &["vertex"], VarData::Double(vec![0.0, 0.0, 0.0, 0.0, 1.0]))
            .unwrap();
        // 行为顶点序号，列为单元
        ds.add_variable(
            "vertex_of_cell",
            &["nv", "cell"],
            VarData::Int(vec![
                1, 2, 3, 4, //
                2, 3, 4, 1, //
                5, 5, 5, 5,
            ]),
        )
        .unwrap();
        ds
    }

    #[test]
    fn test_read_icon() {
        let mesh = read(&octahedron_cap(), "cap.nc").unwrap();
        assert_eq!(mesh.n_nodes(), 5);
        assert_eq!(mesh.n_faces(), 4);
        assert_eq!(mesh.faces()[1].node_indices().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(mesh.faces()[3].node_indices().collect::<Vec<_>>(), vec![3, 0, 4]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_vertex_out_of_range() {
        let mut ds = octahedron_cap();
        if let Some(v) = ds.variables.get_mut("vertex_of_cell") {
            v.data = VarData::Int(vec![1, 2, 3, 4, 2, 3, 4, 1, 5, 5, 6, 5]);
        }
        let err = read(&ds, "cap.nc").unwrap_err();
        assert!(matches!(err, IoError::IndexOutOfRange { .. }));
        assert!(err.to_string().contains("单元 2"));
    }

    #[test]
    fn test_coordinate_dimension_name() {
        let mut ds = octahedron_cap();
        if let Some(v) = ds.variables.get_mut("cartesian_y_vertices") {
            v.dims = vec!["cell".into()];
        }
        let err = read(&ds, "cap.nc").unwrap_err();
        assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "cartesian_y_vertices"));
    }

    #[test]
    fn test_missing_cell_dimension() {
        let mut ds = octahedron_cap();
        ds.dimensions.remove("cell");
        let err = read(&ds, "cap.nc").unwrap_err();
        assert!(matches!(err, IoError::MissingDimension { ref name, .. } if name == "cell"));
    }
}
