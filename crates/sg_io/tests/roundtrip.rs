// crates/sg_io/tests/roundtrip.rs

//! 网格文件读写集成测试（JSON 容器）

use sg_geo::Node;
use sg_io::dataset::{Dataset, VarData};
use sg_io::{
    load_dataset, read_mesh, read_mesh_with, save_dataset, write_exodus, write_scrip, GridFormat, IoError,
    ReadOptions,
};
use sg_mesh::{EdgeType, Face, Mesh};
use std::f64::consts::PI;
use tempfile::tempdir;

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
fn test_exodus_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("octa.json");

    let mut mesh = octahedron();
    mesh.faces_mut()[0].edges[1].edge_type = EdgeType::ConstantLatitude;
    mesh.set_source_face_ix(Some((0..8).map(Some).collect())).unwrap();
    mesh.set_target_face_ix(Some(vec![None; 8])).unwrap();
    write_exodus(&mesh, &path).unwrap();

    let ds = load_dataset(&path).unwrap();
    assert_eq!(GridFormat::detect(&ds), GridFormat::Exodus);

    let back = read_mesh(&path).unwrap();
    assert_eq!(back.nodes(), mesh.nodes());
    assert_eq!(back.faces(), mesh.faces());
    assert_eq!(back.source_face_ix(), mesh.source_face_ix());
    assert_eq!(back.target_face_ix(), mesh.target_face_ix());
}

#[test]
fn test_scrip_roundtrip_preserves_geometry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("octa_scrip.json");

    let mut mesh = octahedron();
    let expected = mesh.calculate_face_areas();
    write_scrip(&mesh, &path).unwrap();

    let ds = load_dataset(&path).unwrap();
    assert_eq!(GridFormat::detect(&ds), GridFormat::Scrip);

    let mut back = read_mesh(&path).unwrap();
    assert_eq!(back.n_faces(), 8);
    assert_eq!(back.n_nodes(), 6);
    assert!(back.validate().is_ok());

    let total = back.calculate_face_areas();
    assert!((total - expected).abs() < 1e-10);
    assert!(((total - 4.0 * PI) / (4.0 * PI)).abs() < 2e-4);

    back.construct_edge_map().unwrap();
    assert_eq!(back.edge_map().len(), 12);
    assert_eq!(back.edge_map().n_boundary_edges(), 0);
}

#[test]
fn test_scrip_without_merge_keeps_corners() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("octa_scrip.json");
    write_scrip(&octahedron(), &path).unwrap();

    let opts = ReadOptions {
        remove_coincident_nodes: false,
        ..ReadOptions::default()
    };
    let mesh = read_mesh_with(&path, &opts).unwrap();
    assert_eq!(mesh.n_nodes(), 24);
}

#[test]
fn test_legacy_exodus() {
    // 4.98 布局：无 global_id，父单元变量名不带块号且按 0 基存储
    let mut ds = Dataset::new();
    ds.set_attr("version", 4.98f32);
    ds.add_dimension("num_nodes", 4).unwrap();
    ds.add_dimension("num_elem", 2).unwrap();
    ds.add_dimension("num_el_blk", 1).unwrap();
    ds.add_dimension("num_dim", 3).unwrap();
    ds.add_dimension("num_el_in_blk1", 2).unwrap();
    ds.add_dimension("num_nod_per_el1", 3).unwrap();
    ds.add_variable(
        "connect1",
        &["num_el_in_blk1", "num_nod_per_el1"],
        VarData::Int(vec![1, 2, 3, 4, 1, 3]),
    )
    .unwrap();
    ds.add_variable("edge_type", &["num_el_in_blk1", "num_nod_per_el1"], VarData::Int(vec![0; 6]))
        .unwrap();
    ds.add_variable("face_source_1", &["num_el_in_blk1"], VarData::Int(vec![5, -1]))
        .unwrap();
    ds.add_variable(
        "coord",
        &["num_dim", "num_nodes"],
        VarData::Double(vec![
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, -1.0, //
            0.0, 0.0, 1.0, 0.0,
        ]),
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    save_dataset(&path, &ds).unwrap();

    let mesh = read_mesh(&path).unwrap();
    assert_eq!(mesh.n_faces(), 2);
    assert_eq!(mesh.faces()[1].node_indices().collect::<Vec<_>>(), vec![3, 0, 2]);
    assert_eq!(mesh.source_face_ix(), Some(&[Some(5), None][..]));
    assert!(mesh.target_face_ix().is_none());
    assert!(mesh.validate().is_ok());
}

#[test]
fn test_icon_file() {
    let mut ds = Dataset::new();
    ds.set_attr("title", "ICON grid description");
    ds.add_dimension("vertex", 6).unwrap();
    ds.add_dimension("cell", 8).unwrap();
    ds.add_dimension("nv", 3).unwrap();

    let mesh = octahedron();
    let nodes = mesh.nodes();
    for (name, values) in [
        ("cartesian_x_vertices", nodes.iter().map(|n| n.x).collect::<Vec<_>>()),
        ("cartesian_y_vertices", nodes.iter().map(|n| n.y).collect()),
        ("cartesian_z_vertices", nodes.iter().map(|n| n.z).collect()),
    ] {
        ds.add_variable(name, &["vertex"], VarData::Double(values)).unwrap();
    }
    let mut vertex_of_cell = Vec::new();
    for j in 0..3 {
        for face in mesh.faces() {
            vertex_of_cell.push(face.node(j) as f64 + 1.0);
        }
    }
    ds.add_variable("vertex_of_cell", &["nv", "cell"], VarData::Double(vertex_of_cell))
        .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("icon.json");
    save_dataset(&path, &ds).unwrap();

    let back = read_mesh(&path).unwrap();
    assert_eq!(back.nodes(), mesh.nodes());
    assert_eq!(back.faces(), mesh.faces());
}

#[test]
fn test_missing_coord_names_file_and_variable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("octa.json");
    write_exodus(&octahedron(), &path).unwrap();

    let mut ds = load_dataset(&path).unwrap();
    ds.variables.remove("coord");
    save_dataset(&path, &ds).unwrap();

    let err = read_mesh(&path).unwrap_err();
    assert!(matches!(err, IoError::MissingVariable { ref name, .. } if name == "coord"));
    assert!(err.to_string().contains("octa.json"));
}

/// 写出后改动一个变量的维度，再读回
fn rewrite_dims(path: &std::path::Path, variable: &str, dims: &[&str]) {
    let mut ds = load_dataset(path).unwrap();
    for dim in dims {
        if !ds.has_dimension(dim) {
            ds.add_dimension(dim, 1).unwrap();
        }
    }
    if let Some(v) = ds.variables.get_mut(variable) {
        v.dims = dims.iter().map(|d| d.to_string()).collect();
    }
    save_dataset(path, &ds).unwrap();
}

#[test]
fn test_scrip_transposed_corners_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("octa_scrip.json");
    write_scrip(&octahedron(), &path).unwrap();
    rewrite_dims(&path, "grid_corner_lat", &["grid_corners", "grid_size"]);

    let err = read_mesh(&path).unwrap_err();
    assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "grid_corner_lat"));
    assert!(err.to_string().contains("octa_scrip.json"));
}

#[test]
fn test_exodus_connect_column_count_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("octa.json");
    write_exodus(&octahedron(), &path).unwrap();

    // 8 x 3 个节点按 6 x 4 声明
    let mut ds = load_dataset(&path).unwrap();
    ds.add_dimension("six", 6).unwrap();
    ds.add_dimension("four_nodes", 4).unwrap();
    if let Some(v) = ds.variables.get_mut("connect1") {
        v.dims = vec!["six".into(), "four_nodes".into()];
    }
    save_dataset(&path, &ds).unwrap();

    let err = read_mesh(&path).unwrap_err();
    assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "connect1"));
}

#[test]
fn test_exodus_coord_leading_dimension_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("octa.json");
    write_exodus(&octahedron(), &path).unwrap();
    rewrite_dims(&path, "coord", &["num_nodes", "num_dim"]);

    let err = read_mesh(&path).unwrap_err();
    assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "coord"));
}

#[test]
fn test_icon_vertex_of_cell_on_wrong_dimension_rejected() {
    let mut ds = Dataset::new();
    ds.set_attr("title", "ICON grid description");
    ds.add_dimension("vertex", 3).unwrap();
    ds.add_dimension("cell", 1).unwrap();
    ds.add_dimension("nv", 3).unwrap();
    for name in ["cartesian_x_vertices", "cartesian_y_vertices", "cartesian_z_vertices"] {
        ds.add_variable(name, &["vertex"], VarData::Double(vec![0.0; 3])).unwrap();
    }
    ds.add_variable("vertex_of_cell", &["nv", "vertex"], VarData::Int(vec![1; 9]))
        .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("icon.json");
    save_dataset(&path, &ds).unwrap();

    let err = read_mesh(&path).unwrap_err();
    assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "vertex_of_cell"));
}

#[test]
fn test_unknown_container() {
    let dir = tempdir().unwrap();
    let err = write_exodus(&octahedron(), dir.path().join("octa.txt")).unwrap_err();
    assert!(matches!(err, IoError::UnknownContainer { .. }));
}

#[cfg(not(feature = "netcdf"))]
#[test]
fn test_netcdf_requires_feature() {
    let dir = tempdir().unwrap();
    let err = write_exodus(&octahedron(), dir.path().join("octa.g")).unwrap_err();
    assert!(matches!(err, IoError::NetCdf(sg_io::NetCdfError::NotAvailable)));
}
