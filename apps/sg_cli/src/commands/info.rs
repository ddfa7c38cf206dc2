// apps/sg_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示网格规模、方言、边数与总面积。

use super::{load_config, read_options};
use anyhow::{Context, Result};
use clap::Args;
use sg_mesh::algorithms::area::block_sum;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 网格文件路径
    pub mesh: PathBuf,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== SphereGrid 网格信息 ===");

    let config = load_config(args.config.as_deref())?;
    let ds = sg_io::load_dataset(&args.mesh)
        .with_context(|| format!("无法读取 {}", args.mesh.display()))?;
    let file = args.mesh.display().to_string();
    let (format, mut mesh) = sg_io::mesh_from_dataset(&ds, &file, &read_options(&config))?;

    println!("文件: {}", file);
    println!("方言: {}", format);
    println!("节点数: {}", mesh.n_nodes());
    println!("单元数: {}", mesh.n_faces());

    let mut degrees: BTreeMap<usize, usize> = BTreeMap::new();
    for face in mesh.faces() {
        *degrees.entry(face.degree()).or_default() += 1;
    }
    for (degree, count) in &degrees {
        println!("  {} 边形: {}", degree, count);
    }

    let n_edges = mesh.construct_edge_map()?;
    println!("边数: {} (边界边 {})", n_edges, mesh.edge_map().n_boundary_edges());

    let total = mesh.calculate_face_areas_with(config.area.quadrature_order, &config.tolerance)?;
    println!("总面积: {:.15e} sr", total);
    println!("与 4π 的相对偏差: {:.3e}", (total - 4.0 * PI) / (4.0 * PI));
    if let Some(min) = mesh.face_areas().iter().copied().reduce(f64::min) {
        println!("最小单元面积: {:.6e}", min);
    }
    let mean = block_sum(mesh.face_areas(), sg_mesh::algorithms::area::AREA_BLOCK_SIZE)
        / mesh.n_faces().max(1) as f64;
    println!("平均单元面积: {:.6e}", mean);

    if mesh.mask().is_some() {
        println!("包含单元掩码 (grid_imask)");
    }
    if mesh.source_face_ix().is_some() || mesh.target_face_ix().is_some() {
        println!("包含父单元索引 (叠加网格)");
    }

    Ok(())
}
