// crates/sg_io/src/drivers/netcdf/error.rs

//! NetCDF 驱动错误

use std::fmt;

/// NetCDF 驱动错误，均带出错的文件或对象名
#[derive(Debug)]
pub enum NetCdfError {
    /// 构建时未启用 `netcdf` 特性
    NotAvailable,
    /// 文件无法打开或创建
    Open {
        /// 文件路径
        path: String,
        /// 原因
        message: String,
    },
    /// 属性或变量无法读出
    Read {
        /// 属性或变量名
        name: String,
        /// 原因
        message: String,
    },
    /// 变量数据无法写入
    Write {
        /// 变量名
        name: String,
        /// 原因
        message: String,
    },
    /// 定义维度、变量或属性时库返回的错误
    Library(String),
}

impl fmt::Display for NetCdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "未启用 NetCDF 支持 (需以 `netcdf` 特性构建)"),
            Self::Open { path, message } => write!(f, "无法打开 NetCDF 文件 {path}: {message}"),
            Self::Read { name, message } => write!(f, "读取 \"{name}\" 失败: {message}"),
            Self::Write { name, message } => write!(f, "写入变量 \"{name}\" 失败: {message}"),
            Self::Library(msg) => write!(f, "NetCDF: {msg}"),
        }
    }
}

impl std::error::Error for NetCdfError {}

#[cfg(feature = "netcdf")]
impl From<netcdf::error::Error> for NetCdfError {
    fn from(e: netcdf::error::Error) -> Self {
        Self::Library(e.to_string())
    }
}
