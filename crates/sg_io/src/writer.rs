// crates/sg_io/src/writer.rs

//! 网格写出入口
//!
//! 容器由输出文件扩展名决定，方言由调用方选择。

use crate::dataset::Dataset;
use crate::drivers;
use crate::error::IoResult;
use crate::formats::{exodus, scrip};
use serde::{Deserialize, Serialize};
use sg_mesh::Mesh;
use std::path::Path;
use tracing::info;

/// 输出方言
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Exodus 多块
    #[default]
    Exodus,
    /// SCRIP
    Scrip,
}

impl OutputFormat {
    /// 转换为数据集
    pub fn to_dataset(self, mesh: &Mesh, file: &str) -> IoResult<Dataset> {
        match self {
            Self::Exodus => exodus::to_dataset(mesh, file),
            Self::Scrip => scrip::to_dataset(mesh),
        }
    }
}

/// 写出网格
pub fn write_mesh(mesh: &Mesh, path: impl AsRef<Path>, format: OutputFormat) -> IoResult<()> {
    let path = path.as_ref();
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ds = format.to_dataset(mesh, &file)?;
    drivers::save_dataset(path, &ds)?;
    info!("写出 {:?} 网格: {}", format, path.display());
    Ok(())
}

/// 写出 Exodus 网格
pub fn write_exodus(mesh: &Mesh, path: impl AsRef<Path>) -> IoResult<()> {
    write_mesh(mesh, path, OutputFormat::Exodus)
}

/// 写出 SCRIP 网格
pub fn write_scrip(mesh: &Mesh, path: impl AsRef<Path>) -> IoResult<()> {
    write_mesh(mesh, path, OutputFormat::Scrip)
}
