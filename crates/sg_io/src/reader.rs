// crates/sg_io/src/reader.rs

//! 网格读取入口
//!
//! 先由容器驱动载入 [`Dataset`]，再按内容判定方言并解析为 [`Mesh`]。
//! 任一步失败都返回错误，不会返回部分填充的网格。

use crate::dataset::Dataset;
use crate::drivers;
use crate::error::IoResult;
use crate::formats::{exodus, icon, scrip, GridFormat};
use sg_foundation::Tolerance;
use sg_mesh::Mesh;
use std::path::Path;
use tracing::info;

/// 读取选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadOptions {
    /// SCRIP 读取后是否合并重合节点（Exodus 总是合并，ICON 从不合并）
    pub remove_coincident_nodes: bool,
    /// 容差
    pub tolerance: Tolerance,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            remove_coincident_nodes: true,
            tolerance: Tolerance::default(),
        }
    }
}

/// 以默认选项读取网格文件
pub fn read_mesh(path: impl AsRef<Path>) -> IoResult<Mesh> {
    read_mesh_with(path, &ReadOptions::default())
}

/// 读取网格文件
pub fn read_mesh_with(path: impl AsRef<Path>, opts: &ReadOptions) -> IoResult<Mesh> {
    let path = path.as_ref();
    let ds = drivers::load_dataset(path)?;
    let (format, mesh) = mesh_from_dataset(&ds, &path.display().to_string(), opts)?;
    info!(
        "读取 {} ({}): 节点 {} 个, 单元 {} 个",
        path.display(),
        format,
        mesh.n_nodes(),
        mesh.n_faces()
    );
    Ok(mesh)
}

/// 从已载入的数据集解析网格，同时返回判定出的方言
pub fn mesh_from_dataset(ds: &Dataset, file: &str, opts: &ReadOptions) -> IoResult<(GridFormat, Mesh)> {
    let format = GridFormat::detect(ds);
    let mesh = match format {
        GridFormat::Icon => icon::read(ds, file)?,
        GridFormat::Scrip => scrip::read(ds, file, opts)?,
        GridFormat::Exodus => exodus::read(ds, file, opts)?,
    };
    Ok((format, mesh))
}
