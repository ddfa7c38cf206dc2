// crates/sg_foundation/src/error.rs

//! 工作区顶层错误
//!
//! 各层先用自己的错误枚举描述失败（`MeshError`、`IoError`、`ConfigError`），
//! 跨层传播时统一折叠为 [`SgError`]。这里只保留折叠后仍有区分意义的类别。
//!
//! # 示例
//!
//! ```
//! use sg_foundation::error::{SgError, SgResult};
//!
//! fn node_at(len: usize, ix: usize) -> SgResult<usize> {
//!     SgError::check_index("Node", ix, len)?;
//!     Ok(ix)
//! }
//! assert!(node_at(3, 3).is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type SgResult<T> = Result<T, SgError>;

/// SphereGrid 错误类型
#[derive(Error, Debug)]
pub enum SgError {
    // ========================================================================
    // 文件
    // ========================================================================
    /// 文件系统读写失败
    #[error("文件读写失败: {message}")]
    Io {
        /// 失败的操作
        message: String,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 无法识别的容器或方言
    #[error("无法识别的网格文件: {format} (可用: {supported:?})")]
    UnsupportedFormat {
        /// 文件或方言描述
        format: String,
        /// 可用的容器与方言
        supported: Vec<String>,
    },

    /// 网格文件内容与方言约定不符
    #[error("网格文件内容错误: {message}")]
    Format {
        /// 缺失或非法的对象
        message: String,
    },

    /// JSON 编解码失败
    #[error("JSON 编解码失败: {message}")]
    Serialization {
        /// 解析器给出的原因
        message: String,
    },

    // ========================================================================
    // 网格数据
    // ========================================================================
    /// 参数非法（容差、求积阶数、边类型编码等）
    #[error("参数非法: {message}")]
    InvalidInput {
        /// 非法原因
        message: String,
    },

    /// 按单元并行的数组长度与单元数不等
    #[error("数组长度不一致: {name} 需要 {expected}, 实际 {actual}")]
    SizeMismatch {
        /// 数组名
        name: &'static str,
        /// 单元数
        expected: usize,
        /// 数组长度
        actual: usize,
    },

    /// 节点或单元索引越界
    #[error("{index_type} 索引 {index} 越界 (共 {len} 个)")]
    IndexOutOfBounds {
        /// `Node` 或 `Face`
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 数组长度
        len: usize,
    },

    /// 网格几何或拓扑不满足约束
    #[error("网格无效: {message}")]
    InvalidMesh {
        /// 违反的约束
        message: String,
    },

    // ========================================================================
    // 其他
    // ========================================================================
    /// 配置文件非法
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 环境不满足（例如空间索引无法建立）
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

impl SgError {
    /// 文件系统错误
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// 无法识别的文件
    pub fn unsupported_format(format: impl Into<String>, supported: Vec<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            supported,
        }
    }

    /// 文件内容错误
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// JSON 错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 参数非法
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数组长度不一致
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 网格无效
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 索引须小于 `len`
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> SgResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::index_out_of_bounds(index_type, index, len))
        }
    }
}
