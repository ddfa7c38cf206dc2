// crates/sg_io/src/drivers/mod.rs

//! 容器驱动
//!
//! 按扩展名选择容器：`.nc` / `.g` / `.exo` 走 NetCDF，`.json` 走 serde_json。

pub mod json;
pub mod netcdf;

pub use self::netcdf::{NetCdfDriver, NetCdfError};

use crate::dataset::Dataset;
use crate::error::{IoError, IoResult};
use std::path::Path;

/// 容器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// NetCDF 文件
    NetCdf,
    /// JSON 序列化的数据集
    Json,
}

impl Container {
    /// 根据扩展名推断容器类型
    pub fn from_path(path: &Path) -> IoResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "nc" | "g" | "exo" | "nc4" => Ok(Self::NetCdf),
            "json" => Ok(Self::Json),
            _ => Err(IoError::UnknownContainer {
                path: path.display().to_string(),
            }),
        }
    }
}

/// 读取数据集
pub fn load_dataset(path: impl AsRef<Path>) -> IoResult<Dataset> {
    let path = path.as_ref();
    match Container::from_path(path)? {
        Container::NetCdf => Ok(NetCdfDriver::read(path)?),
        Container::Json => json::read(path),
    }
}

/// 写出数据集
pub fn save_dataset(path: impl AsRef<Path>, ds: &Dataset) -> IoResult<()> {
    let path = path.as_ref();
    match Container::from_path(path)? {
        Container::NetCdf => Ok(NetCdfDriver::write(path, ds)?),
        Container::Json => json::write(path, ds),
    }
}
