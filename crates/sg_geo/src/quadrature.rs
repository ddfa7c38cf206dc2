// crates/sg_geo/src/quadrature.rs

//! 高斯-勒让德求积
//!
//! 以牛顿迭代求勒让德多项式的根，再线性映射到区间 `[a, b]`。

use sg_foundation::{SgError, SgResult};
use std::f64::consts::PI;

const NEWTON_MAX_ITER: usize = 100;
const NEWTON_TOL: f64 = 1.0e-15;

/// 求积点与权重
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    /// 求积点（升序）
    pub points: Vec<f64>,
    /// 对应权重
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// 求积阶数
    #[inline]
    #[must_use]
    pub fn order(&self) -> usize {
        self.points.len()
    }

    /// 遍历 `(点, 权重)`
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied().zip(self.weights.iter().copied())
    }
}

/// 生成 `order` 点高斯-勒让德求积规则，区间 `[a, b]`
///
/// # 示例
///
/// ```
/// use sg_geo::quadrature::gauss_legendre;
///
/// let rule = gauss_legendre(6, 0.0, 1.0).unwrap();
/// let sum: f64 = rule.weights.iter().sum();
/// assert!((sum - 1.0).abs() < 1e-14);
/// ```
///
/// # Errors
///
/// `order == 0` 或区间端点非有限时返回错误。
pub fn gauss_legendre(order: usize, a: f64, b: f64) -> SgResult<QuadratureRule> {
    if order == 0 {
        return Err(SgError::invalid_input("quadrature order must be positive"));
    }
    if !a.is_finite() || !b.is_finite() {
        return Err(SgError::invalid_input(format!(
            "quadrature interval [{a}, {b}] is not finite"
        )));
    }

    let n = order;
    let half = 0.5 * (b - a);
    let mid = 0.5 * (b + a);
    let mut points = vec![0.0; n];
    let mut weights = vec![0.0; n];

    // 根关于 0 对称，只求一半
    for i in 0..(n + 1) / 2 {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut dp = 0.0;
        for _ in 0..NEWTON_MAX_ITER {
            let (p, d) = legendre(n, x);
            dp = d;
            let dx = p / d;
            x -= dx;
            if dx.abs() < NEWTON_TOL {
                break;
            }
        }
        let (_, d) = legendre(n, x);
        if d != 0.0 {
            dp = d;
        }
        let w = 2.0 / ((1.0 - x * x) * dp * dp);

        // x 从大到小，映射后按升序存放
        points[i] = mid - half * x;
        points[n - 1 - i] = mid + half * x;
        weights[i] = half * w;
        weights[n - 1 - i] = half * w;
    }

    Ok(QuadratureRule { points, weights })
}

/// 三项递推求 `P_n(x)` 与 `P_n'(x)`
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;
    if n == 0 {
        return (1.0, 0.0);
    }
    for k in 2..=n {
        let kf = k as f64;
        let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    let dp = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}
