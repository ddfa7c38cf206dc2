// apps/sg_cli/src/commands/mod.rs

//! CLI 子命令

pub mod convert;
pub mod info;
pub mod validate;

use anyhow::{Context, Result};
use sg_config::GridConfig;
use sg_io::ReadOptions;
use std::path::Path;

/// 加载配置文件，未指定时使用默认配置
pub fn load_config(path: Option<&Path>) -> Result<GridConfig> {
    match path {
        Some(path) => GridConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display())),
        None => Ok(GridConfig::default()),
    }
}

/// 由配置得到读取选项
pub fn read_options(config: &GridConfig) -> ReadOptions {
    ReadOptions {
        remove_coincident_nodes: config.read.remove_coincident_nodes,
        tolerance: config.tolerance,
    }
}
