// crates/sg_config/src/lib.rs

//! SphereGrid Config Layer
//!
//! 网格读取、验证与面积计算的可调参数，以 JSON 文件加载。
//!
//! # 模块概览
//!
//! - [`grid_config`]: GridConfig 及其分组
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! sg_cli        ─> 读取 GridConfig 并传给各层
//! sg_config     ─> GridConfig (本层)
//! sg_foundation ─> Tolerance
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod grid_config;

// 重导出核心类型
pub use error::ConfigError;
pub use grid_config::{AreaConfig, GridConfig, ReadConfig};
