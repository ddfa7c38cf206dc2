// crates/sg_mesh/src/algorithms/area.rs

//! 单元面积
//!
//! N 边形从第 0 个顶点扇形剖分为 N-2 个三角形。每个三角形用双线性参数化
//!
//! ```text
//! F(a, b) = (1 - b)((1 - a) n1 + a n2) + b n3,   (a, b) ∈ [0, 1]²
//! ```
//!
//! 并径向投影到球面 `G = F / |F|`。面积元为 `|∂G/∂a × ∂G/∂b|`，
//! 其中投影偏导数
//!
//! ```text
//! ∂G_x = [∂F_x (F_y² + F_z²) - F_x (∂F_y F_y + ∂F_z F_z)] / |F|³
//! ```
//!
//! y、z 分量同理。在 `[0, 1]²` 上用张量积高斯规则积分。

use crate::error::MeshResult;
use crate::face::Face;
use sg_geo::quadrature::{gauss_legendre, QuadratureRule};
use sg_geo::Node;

/// 默认求积阶数
pub const DEFAULT_QUADRATURE_ORDER: usize = 6;

/// 分块求和的块大小
pub const AREA_BLOCK_SIZE: usize = 10;

/// `[0, 1]` 上 6 点高斯-勒让德求积点
const GAUSS6_POINTS: [f64; 6] = [
    0.033_765_242_898_423_99,
    0.169_395_306_766_867_74,
    0.380_690_406_958_401_55,
    0.619_309_593_041_598_5,
    0.830_604_693_233_132_3,
    0.966_234_757_101_576,
];

/// `[0, 1]` 上 6 点高斯-勒让德权重
const GAUSS6_WEIGHTS: [f64; 6] = [
    0.085_662_246_189_585_17,
    0.180_380_786_524_069_3,
    0.233_956_967_286_345_5,
    0.233_956_967_286_345_5,
    0.180_380_786_524_069_3,
    0.085_662_246_189_585_17,
];

/// 默认求积规则（6 点，`[0, 1]`）
#[must_use]
pub fn default_rule() -> QuadratureRule {
    QuadratureRule {
        points: GAUSS6_POINTS.to_vec(),
        weights: GAUSS6_WEIGHTS.to_vec(),
    }
}

/// 指定阶数的 `[0, 1]` 求积规则
pub fn rule_for_order(order: usize) -> MeshResult<QuadratureRule> {
    if order == DEFAULT_QUADRATURE_ORDER {
        return Ok(default_rule());
    }
    Ok(gauss_legendre(order, 0.0, 1.0)?)
}

/// 单元面积（6 点高斯规则）
///
/// # 示例
///
/// ```
/// use sg_geo::Node;
/// use sg_mesh::{algorithms::calculate_face_area, Face};
///
/// let nodes = [
///     Node::new(1.0, 0.0, 0.0),
///     Node::new(0.0, 1.0, 0.0),
///     Node::new(0.0, 0.0, 1.0),
/// ];
/// let area = calculate_face_area(&Face::from_nodes(&[0, 1, 2]), &nodes);
/// assert!((area - std::f64::consts::FRAC_PI_2).abs() < 1e-3);
/// ```
#[must_use]
pub fn calculate_face_area(face: &Face, nodes: &[Node]) -> f64 {
    calculate_face_area_with_rule(face, nodes, &default_rule())
}

/// 单元面积（指定求积阶数）
///
/// # Errors
///
/// 阶数为 0 时返回错误。
pub fn calculate_face_area_with_order(face: &Face, nodes: &[Node], order: usize) -> MeshResult<f64> {
    let rule = rule_for_order(order)?;
    Ok(calculate_face_area_with_rule(face, nodes, &rule))
}

/// 单元面积（指定 `[0, 1]` 上的求积规则）
///
/// 少于三个顶点的单元面积为 0。
#[must_use]
pub fn calculate_face_area_with_rule(face: &Face, nodes: &[Node], rule: &QuadratureRule) -> f64 {
    let degree = face.degree();
    if degree < 3 {
        return 0.0;
    }

    let n1 = nodes[face.node(0)];
    let mut area = 0.0;

    for j in 0..degree - 2 {
        let n2 = nodes[face.node(j + 1)];
        let n3 = nodes[face.node(j + 2)];

        for (a, wa) in rule.iter() {
            for (b, wb) in rule.iter() {
                area += wa * wb * area_element(&n1, &n2, &n3, a, b);
            }
        }
    }

    area
}

/// 参数点 `(a, b)` 处投影后的面积元
#[inline]
fn area_element(n1: &Node, n2: &Node, n3: &Node, a: f64, b: f64) -> f64 {
    let f = (*n1 * (1.0 - a) + *n2 * a) * (1.0 - b) + *n3 * b;
    let da_f = (*n2 - *n1) * (1.0 - b);
    let db_f = *n3 - *n1 * (1.0 - a) - *n2 * a;

    let r = f.magnitude();
    let inv_r3 = 1.0 / (r * r * r);

    let da_g = project(&f, &da_f) * inv_r3;
    let db_g = project(&f, &db_f) * inv_r3;

    da_g.cross(&db_g).magnitude()
}

/// `|F|³ ∂(F/|F|)`：去掉 `d` 在 `F` 方向上的分量并乘以 `|F|²`
#[inline]
fn project(f: &Node, d: &Node) -> Node {
    Node::new(
        d.x * (f.y * f.y + f.z * f.z) - f.x * (d.y * f.y + d.z * f.z),
        d.y * (f.x * f.x + f.z * f.z) - f.y * (d.x * f.x + d.z * f.z),
        d.z * (f.x * f.x + f.y * f.y) - f.z * (d.x * f.x + d.y * f.y),
    )
}

/// 计算全部单元面积
///
/// 启用 `parallel` 特性时按单元并行。
#[must_use]
pub fn calculate_face_areas(faces: &[Face], nodes: &[Node], rule: &QuadratureRule) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        faces
            .par_iter()
            .map(|face| calculate_face_area_with_rule(face, nodes, rule))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        faces
            .iter()
            .map(|face| calculate_face_area_with_rule(face, nodes, rule))
            .collect()
    }
}

/// 分块求和
///
/// 每 `block` 个值求和得到新序列，重复直到只剩一个值，
/// 降低大量单元累加时的舍入误差。
///
/// ```
/// use sg_mesh::algorithms::block_sum;
///
/// let values = vec![0.1; 1000];
/// assert!((block_sum(&values, 10) - 100.0).abs() < 1e-12);
/// assert_eq!(block_sum(&[], 10), 0.0);
/// ```
#[must_use]
pub fn block_sum(values: &[f64], block: usize) -> f64 {
    let block = block.max(2);
    let mut current: Vec<f64> = values.chunks(block).map(|c| c.iter().sum()).collect();
    while current.len() > 1 {
        current = current.chunks(block).map(|c| c.iter().sum()).collect();
    }
    current.first().copied().unwrap_or(0.0)
}
