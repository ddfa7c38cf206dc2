// crates/sg_geo/src/sphere.rs

//! 球面坐标转换
//!
//! 经度范围 `[0, 360)`，纬度范围 `[-90, 90]`（度）。

use crate::node::Node;
use sg_foundation::REFERENCE_TOLERANCE;

/// 笛卡尔坐标转经纬度（度）
///
/// 先投影到单位球面。极点附近（`|z| >= 1 - 1e-12`）经度取 0。
///
/// # 示例
///
/// ```
/// use sg_geo::{Node, sphere::xyz_to_lonlat_deg};
///
/// let (lon, lat) = xyz_to_lonlat_deg(&Node::new(0.0, -2.0, 0.0));
/// assert!((lon - 270.0).abs() < 1e-12);
/// assert!(lat.abs() < 1e-12);
/// ```
#[must_use]
pub fn xyz_to_lonlat_deg(node: &Node) -> (f64, f64) {
    let n = node.normalized();
    if n.z.abs() < 1.0 - REFERENCE_TOLERANCE {
        let mut lon = n.y.atan2(n.x).to_degrees();
        if lon < 0.0 {
            lon += 360.0;
        }
        (lon, n.z.asin().to_degrees())
    } else if n.z > 0.0 {
        (0.0, 90.0)
    } else {
        (0.0, -90.0)
    }
}

/// 经纬度（弧度）转单位球面笛卡尔坐标
#[inline]
#[must_use]
pub fn lonlat_rad_to_xyz(lon: f64, lat: f64) -> Node {
    Node::new(lon.cos() * lat.cos(), lon.sin() * lat.cos(), lat.sin())
}

/// 经纬度（度）转单位球面笛卡尔坐标
#[inline]
#[must_use]
pub fn lonlat_deg_to_xyz(lon: f64, lat: f64) -> Node {
    lonlat_rad_to_xyz(lon.to_radians(), lat.to_radians())
}
