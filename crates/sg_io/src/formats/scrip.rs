// crates/sg_io/src/formats/scrip.rs

//! SCRIP 网格读写
//!
//! SCRIP 文件按单元列出角点经纬度，没有共享节点表：
//! 读取时每个角点生成一个新节点，再按需合并重合节点。

use super::{put_common_attributes, GridFormat, Source};
use crate::dataset::{Dataset, VarData};
use crate::error::IoResult;
use crate::reader::ReadOptions;
use sg_geo::sphere::{lonlat_rad_to_xyz, xyz_to_lonlat_deg};
use sg_geo::Node;
use sg_mesh::algorithms::area;
use sg_mesh::{Face, Mesh};
use std::f64::consts::FRAC_PI_2;
use tracing::info;

/// 坐标与掩码变量的 `_FillValue`
pub const FILL_VALUE: f64 = 9.969_209_968_386_87e36;

// ============================================================================
// 读取
// ============================================================================

/// 读取 SCRIP 网格
pub fn read(ds: &Dataset, file: &str, opts: &ReadOptions) -> IoResult<Mesh> {
    let src = Source::new(ds, file, GridFormat::Scrip);

    let grid_size = src.dim("grid_size")?;
    let grid_corners = src.dim("grid_corners")?;
    let n_values = grid_size * grid_corners;

    let lat_var = src.var("grid_corner_lat")?;
    let lon_var = src.var("grid_corner_lon")?;
    src.expect_dims("grid_corner_lat", lat_var, &["grid_size", "grid_corners"])?;
    src.expect_dims("grid_corner_lon", lon_var, &["grid_size", "grid_corners"])?;
    let mut lat = src.values("grid_corner_lat", lat_var, n_values)?;
    let mut lon = src.values("grid_corner_lon", lon_var, n_values)?;

    // 单位为 degrees（不区分大小写）时转换为弧度，经纬度分别判断
    for (values, var) in [(&mut lon, lon_var), (&mut lat, lat_var)] {
        let in_degrees = var
            .attr("units")
            .and_then(|a| a.as_str())
            .is_some_and(|u| u.eq_ignore_ascii_case("degrees"));
        if in_degrees {
            values.iter_mut().for_each(|v| *v = v.to_radians());
        }
    }

    let mask = match src.opt_var("grid_imask") {
        Some(var) => {
            src.expect_dims("grid_imask", var, &["grid_size"])?;
            let values = src
                .integers("grid_imask", var, grid_size)?
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    i32::try_from(v)
                        .map_err(|_| src.out_of_range("grid_imask", format!("单元 {i} 的掩码 {v} 超出 32 位整数范围")))
                })
                .collect::<IoResult<Vec<_>>>()?;
            Some(values)
        }
        None => None,
    };

    let nodes: Vec<Node> = lon
        .iter()
        .zip(lat.iter())
        .map(|(&lon, &lat)| lonlat_rad_to_xyz(lon, lat.clamp(-FRAC_PI_2, FRAC_PI_2)))
        .collect();

    let faces: Vec<Face> = (0..grid_size)
        .map(|i| {
            let first = i * grid_corners;
            let ring: Vec<usize> = (first..first + grid_corners).collect();
            Face::from_nodes(&ring)
        })
        .collect();

    let mut mesh = Mesh::from_parts(nodes, faces);
    mesh.set_mask(mask)?;

    if opts.remove_coincident_nodes {
        mesh.remove_coincident_nodes(&opts.tolerance)?;
    }

    info!("SCRIP 网格: 节点 {} 个, 单元 {} 个", mesh.n_nodes(), mesh.n_faces());
    Ok(mesh)
}

// ============================================================================
// 写出
// ============================================================================

/// 单元中心与角点经纬度（度）
///
/// 中心为角点均值投影回单位球面。极点角点取中心经度，
/// 其余角点经度展开到中心经度 ±180° 以内。
fn face_lonlat(face: &Face, nodes: &[Node]) -> ((f64, f64), Vec<(f64, f64)>) {
    let mut corners = Vec::with_capacity(face.degree());
    let mut center = Node::ORIGIN;
    for ix in face.node_indices() {
        let node = nodes[ix];
        corners.push(xyz_to_lonlat_deg(&node));
        center = center + node;
    }
    if !corners.is_empty() {
        center = center * (1.0 / corners.len() as f64);
    }
    let (center_lon, center_lat) = xyz_to_lonlat_deg(&center.normalized());

    for (lon, lat) in corners.iter_mut() {
        if *lat == 90.0 || *lat == -90.0 {
            *lon = center_lon;
        }
        let diff = center_lon - *lon;
        if diff > 180.0 {
            *lon += 360.0;
        }
        if diff < -180.0 {
            *lon -= 360.0;
        }
    }

    ((center_lon, center_lat), corners)
}

/// 把网格转换为 SCRIP 数据集
///
/// 边数少于 `grid_corners` 的单元重复最后一个角点补齐。
pub fn to_dataset(mesh: &Mesh) -> IoResult<Dataset> {
    let nodes = mesh.nodes();
    let n_faces = mesh.n_faces();
    let n_corners = mesh.max_degree();

    for face in mesh.faces() {
        for ix in face.node_indices() {
            sg_foundation::SgError::check_index("Node", ix, nodes.len())?;
        }
    }

    let mut ds = Dataset::new();
    ds.add_dimension("grid_size", n_faces)?;
    ds.add_dimension("grid_corners", n_corners)?;
    ds.add_dimension("grid_rank", 1)?;
    put_common_attributes(&mut ds);

    let areas = area::calculate_face_areas(mesh.faces(), nodes, &area::default_rule());
    ds.add_variable("grid_area", &["grid_size"], VarData::Double(areas))?
        .set_attr("units", "radians^2");

    let mut center_lat = Vec::with_capacity(n_faces);
    let mut center_lon = Vec::with_capacity(n_faces);
    let mut corner_lat = Vec::with_capacity(n_faces * n_corners);
    let mut corner_lon = Vec::with_capacity(n_faces * n_corners);

    for face in mesh.faces() {
        let ((lon, lat), corners) = face_lonlat(face, nodes);
        center_lon.push(lon);
        center_lat.push(lat);

        let pad = corners.last().copied().unwrap_or((lon, lat));
        for k in 0..n_corners {
            let (lon, lat) = corners.get(k).copied().unwrap_or(pad);
            corner_lon.push(lon);
            corner_lat.push(lat);
        }
    }

    for (name, dims, values) in [
        ("grid_center_lat", &["grid_size"][..], center_lat),
        ("grid_center_lon", &["grid_size"][..], center_lon),
        ("grid_corner_lat", &["grid_size", "grid_corners"][..], corner_lat),
        ("grid_corner_lon", &["grid_size", "grid_corners"][..], corner_lon),
    ] {
        ds.add_variable(name, dims, VarData::Double(values))?
            .set_attr("units", "degrees")
            .set_attr("_FillValue", FILL_VALUE);
    }

    ds.add_variable("grid_imask", &["grid_size"], VarData::Double(vec![1.0; n_faces]))?
        .set_attr("_FillValue", FILL_VALUE);
    ds.add_variable("grid_dims", &["grid_rank"], VarData::Int(vec![1]))?;

    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AttrValue;
    use crate::error::IoError;

    fn two_cells(units: &str) -> Dataset {
        // 两个相邻的经纬度矩形：经度 [0, 30]、[30, 60]，纬度 [0, 30]
        let mut ds = Dataset::new();
        ds.add_dimension("grid_size", 2).unwrap();
        ds.add_dimension("grid_corners", 4).unwrap();
        ds.add_dimension("grid_rank", 1).unwrap();
        let scale = if units == "degrees" || units == "Degrees" { 1.0 } else { 1.0f64.to_radians() };
        let lon: Vec<f64> = [0.0, 30.0, 30.0, 0.0, 30.0, 60.0, 60.0, 30.0].iter().map(|v| v * scale).collect();
        let lat: Vec<f64> = [0.0, 0.0, 30.0, 30.0, 0.0, 0.0, 30.0, 30.0].iter().map(|v| v * scale).collect();
        ds.add_variable("grid_corner_lon", &["grid_size", "grid_corners"], VarData::Double(lon))
            .unwrap()
            .set_attr("units", units);
        ds.add_variable("grid_corner_lat", &["grid_size", "grid_corners"], VarData::Double(lat))
            .unwrap()
            .set_attr("units", units);
        ds
    }

    #[test]
    fn test_read_degrees_and_merge() {
        let mesh = read(&two_cells("Degrees"), "cells.nc", &ReadOptions::default()).unwrap();
        assert_eq!(mesh.n_faces(), 2);
        // 8 个角点中两个共享角点重复
        assert_eq!(mesh.n_nodes(), 6);
        let n = mesh.nodes()[mesh.faces()[0].node(1)];
        assert!((n.x - 0.75f64.sqrt()).abs() < 1e-14);
        assert!((n.y - 0.5).abs() < 1e-14);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_read_radians_without_merge() {
        let opts = ReadOptions {
            remove_coincident_nodes: false,
            ..ReadOptions::default()
        };
        let mesh = read(&two_cells("radians"), "cells.nc", &opts).unwrap();
        assert_eq!(mesh.n_nodes(), 8);
        assert_eq!(mesh.faces()[1].node_indices().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_mask_shape_checked() {
        let mut ds = two_cells("degrees");
        ds.add_dimension("other", 3).unwrap();
        ds.add_variable("grid_imask", &["other"], VarData::Int(vec![1, 0, 1])).unwrap();
        let err = read(&ds, "cells.nc", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "grid_imask"));

        let mut ds = two_cells("degrees");
        ds.add_variable("grid_imask", &["grid_size"], VarData::Int(vec![1, 0])).unwrap();
        let mesh = read(&ds, "cells.nc", &ReadOptions::default()).unwrap();
        assert_eq!(mesh.mask(), Some(&[1, 0][..]));
    }

    #[test]
    fn test_mask_value_out_of_i32_range() {
        let mut ds = two_cells("degrees");
        ds.add_variable("grid_imask", &["grid_size"], VarData::Double(vec![1.0, 4.0e9])).unwrap();
        let err = read(&ds, "cells.nc", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::IndexOutOfRange { ref variable, .. } if variable == "grid_imask"));
    }

    #[test]
    fn test_corner_arrays_must_use_grid_dimensions() {
        // 元素数相同但维度错误
        let mut ds = two_cells("degrees");
        ds.add_dimension("extra", 2).unwrap();
        if let Some(v) = ds.variables.get_mut("grid_corner_lat") {
            v.dims = vec!["grid_corners".into(), "extra".into()];
        }
        let err = read(&ds, "cells.nc", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "grid_corner_lat"));

        // 转置
        let mut ds = two_cells("degrees");
        if let Some(v) = ds.variables.get_mut("grid_corner_lon") {
            v.dims = vec!["grid_corners".into(), "grid_size".into()];
        }
        let err = read(&ds, "cells.nc", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::BadShape { ref variable, .. } if variable == "grid_corner_lon"));
    }

    #[test]
    fn test_polar_corner_takes_center_longitude() {
        let nodes = vec![
            Node::new(1.0, 0.0, 0.0),
            Node::new(0.0, 1.0, 0.0),
            Node::new(0.0, 0.0, 1.0),
        ];
        let face = Face::from_nodes(&[0, 1, 2]);
        let ((center_lon, center_lat), corners) = face_lonlat(&face, &nodes);
        assert!((center_lon - 45.0).abs() < 1e-12);
        assert!(center_lat > 0.0);
        assert_eq!(corners[2], (center_lon, 90.0));
    }

    #[test]
    fn test_longitudes_unwrap_around_prime_meridian() {
        // 跨 0° 经线的三角形：经度 350, 10, 0
        let nodes = vec![
            sg_geo::sphere::lonlat_deg_to_xyz(350.0, 0.0),
            sg_geo::sphere::lonlat_deg_to_xyz(10.0, 0.0),
            sg_geo::sphere::lonlat_deg_to_xyz(0.0, 20.0),
        ];
        let face = Face::from_nodes(&[0, 1, 2]);
        let ((center_lon, _), corners) = face_lonlat(&face, &nodes);
        for (lon, _) in &corners {
            assert!((center_lon - lon).abs() <= 180.0);
        }
    }

    #[test]
    fn test_to_dataset_layout() {
        let nodes = vec![
            Node::new(1.0, 0.0, 0.0),
            Node::new(0.0, 1.0, 0.0),
            Node::new(0.0, 0.0, 1.0),
            Node::new(0.0, -1.0, 0.0),
            Node::new(0.0, 0.0, -1.0),
        ];
        let faces = vec![Face::from_nodes(&[0, 1, 2]), Face::from_nodes(&[3, 4, 0, 2])];
        let mesh = Mesh::from_parts(nodes, faces);
        let ds = to_dataset(&mesh).unwrap();

        assert_eq!(ds.dimension_len("grid_size"), Some(2));
        assert_eq!(ds.dimension_len("grid_corners"), Some(4));
        assert_eq!(ds.dimension_len("grid_rank"), Some(1));
        assert_eq!(ds.attr("version"), Some(&AttrValue::Float(5.0)));
        assert_eq!(ds.attr("floating_point_word_size"), Some(&AttrValue::Int(8)));

        let area = ds.variable("grid_area").unwrap();
        assert_eq!(area.attr("units").and_then(AttrValue::as_str), Some("radians^2"));
        let areas = area.data.to_f64().unwrap();
        assert!(((areas[0] - std::f64::consts::FRAC_PI_2) / std::f64::consts::FRAC_PI_2).abs() < 1e-3);

        // 三角形补齐：第 4 个角点重复第 3 个
        let lat = ds.variable("grid_corner_lat").unwrap().data.to_f64().unwrap();
        assert_eq!(lat[3], lat[2]);
        assert_eq!(lat[2], 90.0);

        let dims = &ds.variable("grid_dims").unwrap().data;
        assert_eq!(dims, &VarData::Int(vec![1]));
        let mask = ds.variable("grid_imask").unwrap();
        assert_eq!(mask.attr("_FillValue"), Some(&AttrValue::Double(FILL_VALUE)));
    }
}
