// crates/sg_io/src/error.rs
//! IO 错误类型定义
//!
//! 提供 IO 模块的统一错误枚举，底层错误（NetCDF、JSON、文件系统、网格）
//! 通过 thiserror 自动转换。方言读取错误总是带上文件名与方言名，
//! 并指明缺失或非法的维度、变量、属性。
//! 所有错误最终可转换为 `SgError` 以实现跨层错误传递。

use crate::drivers::netcdf::NetCdfError;
use sg_foundation::SgError;
use sg_mesh::MeshError;
use thiserror::Error;

/// IO 模块结果类型别名
pub type IoResult<T> = Result<T, IoError>;

/// IO 错误枚举
#[derive(Error, Debug)]
pub enum IoError {
    /// 无法识别容器类型（扩展名）
    #[error("无法识别容器类型: {path} (支持 .nc / .g / .exo / .json)")]
    UnknownContainer { path: String },

    /// 缺少维度
    #[error("{dialect} 文件 {file} 缺少维度 \"{name}\"")]
    MissingDimension {
        file: String,
        dialect: &'static str,
        name: String,
    },

    /// 缺少变量
    #[error("{dialect} 文件 {file} 缺少变量 \"{name}\"")]
    MissingVariable {
        file: String,
        dialect: &'static str,
        name: String,
    },

    /// 缺少属性或属性类型错误
    #[error("{dialect} 文件 {file} 缺少属性 \"{name}\" (或类型不是 {expected})")]
    MissingAttribute {
        file: String,
        dialect: &'static str,
        name: String,
        expected: &'static str,
    },

    /// 变量形状不符合方言约定
    #[error("{dialect} 文件 {file} 变量 \"{variable}\" 形状错误: {details}")]
    BadShape {
        file: String,
        dialect: &'static str,
        variable: String,
        details: String,
    },

    /// 索引值越界
    #[error("{dialect} 文件 {file} 变量 \"{variable}\" 索引越界: {details}")]
    IndexOutOfRange {
        file: String,
        dialect: &'static str,
        variable: String,
        details: String,
    },

    /// 单元全局编号重复
    #[error("Exodus 文件 {file} 块 {block} 中单元编号 {id} 重复")]
    DuplicateId { file: String, block: usize, id: i64 },

    /// 单元槽位未被任何块填充
    #[error("Exodus 文件 {file} 中单元 {index} 未在任何块中出现")]
    MissingElement { file: String, index: usize },

    /// 其他非法数据
    #[error("{dialect} 文件 {file} 数据非法: {details}")]
    InvalidData {
        file: String,
        dialect: &'static str,
        details: String,
    },

    /// 数据集构造错误
    #[error("数据集错误: {0}")]
    Dataset(String),

    /// NetCDF 驱动错误
    #[error("NetCDF 错误: {0}")]
    NetCdf(#[from] NetCdfError),

    /// JSON 序列化错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 文件系统错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 网格层错误
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// 基础层错误转换
    #[error("基础层错误: {0}")]
    Foundation(#[from] SgError),
}

impl IoError {
    /// 数据集构造错误
    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset(message.into())
    }
}

impl From<IoError> for SgError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::UnknownContainer { path } => SgError::unsupported_format(
                path,
                vec![".nc".into(), ".g".into(), ".exo".into(), ".json".into()],
            ),
            IoError::Io(e) => SgError::io_with_source("网格文件读写失败", e),
            IoError::Json(e) => SgError::serialization(e.to_string()),
            IoError::Mesh(e) => e.into(),
            IoError::Foundation(e) => e,
            IoError::Dataset(msg) => SgError::internal(msg),
            other => SgError::format(other.to_string()),
        }
    }
}
