// apps/sg_cli/src/commands/validate.rs

//! 网格验证命令
//!
//! 检查节点模长、单元方向、边邻接关系与单元面积。

use super::{load_config, read_options};
use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 网格文件路径
    pub mesh: PathBuf,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 严格模式（小面积单元与边界边也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== SphereGrid 网格验证 ===");

    let config = load_config(args.config.as_deref())?;
    let mut mesh = sg_io::read_mesh_with(&args.mesh, &read_options(&config))
        .with_context(|| format!("无法读取网格 {}", args.mesh.display()))?;

    println!("\n检查网格文件: {}", args.mesh.display());
    let mut result = ValidationResult::default();

    match mesh.validate_with(&config.tolerance) {
        Ok(()) => println!("  ✓ 节点与单元方向有效"),
        Err(e) => result.add_error(e.to_string()),
    }

    match mesh.validate_edge_adjacency() {
        Ok(()) => {
            println!("  ✓ 边邻接关系有效 ({} 条边)", mesh.edge_map().len());
            let n_boundary = mesh.edge_map().n_boundary_edges();
            if n_boundary > 0 {
                result.add_warning(format!("网格不闭合: {} 条边界边", n_boundary));
            }
        }
        Err(e) => result.add_error(e.to_string()),
    }

    match mesh.calculate_face_areas_with(config.area.quadrature_order, &config.tolerance) {
        Ok(total) => {
            println!("  ✓ 总面积 {:.15e}", total);
            let n_small = mesh
                .face_areas()
                .iter()
                .filter(|&&a| config.tolerance.is_small_area(a))
                .count();
            if n_small > 0 {
                result.add_warning(format!("{} 个单元面积小于 {:e}", n_small, config.tolerance.small_area));
            }
        }
        Err(e) => result.add_error(e.to_string()),
    }

    print_validation_result(&result, args.strict)
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
