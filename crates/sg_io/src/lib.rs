// crates/sg_io/src/lib.rs

//! SphereGrid IO 模块
//!
//! 在磁盘网格文件与 [`sg_mesh::Mesh`] 之间转换。
//!
//! # 模块
//!
//! - [`dataset`]: 结构化数组模型（维度、变量、属性）
//! - [`drivers`]: 容器驱动 (NetCDF, JSON)
//! - [`formats`]: 网格方言 (ICON, SCRIP, Exodus)
//! - [`reader`] / [`writer`]: 读写入口
//!
//! # 可选依赖
//!
//! - `netcdf`: 启用 NetCDF 容器
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use sg_io::{read_mesh, write_scrip};
//!
//! let mut mesh = read_mesh("ne30.g")?;
//! let total = mesh.calculate_face_areas();
//! write_scrip(&mesh, "ne30_scrip.nc")?;
//! ```

pub mod dataset;
pub mod drivers;
pub mod error;
pub mod formats;
pub mod reader;
pub mod writer;

// 重导出常用类型
pub use dataset::{AttrValue, Dataset, VarData, Variable};
pub use drivers::{load_dataset, save_dataset, Container, NetCdfDriver, NetCdfError};
pub use error::{IoError, IoResult};
pub use formats::exodus::ExodusVersion;
pub use formats::GridFormat;
pub use reader::{mesh_from_dataset, read_mesh, read_mesh_with, ReadOptions};
pub use writer::{write_exodus, write_mesh, write_scrip, OutputFormat};
