// crates/sg_io/src/drivers/netcdf/mod.rs

//! NetCDF 驱动模块
//!
//! 在 NetCDF 文件与 [`Dataset`](crate::dataset::Dataset) 之间双向转换。
//!
//! # 依赖
//!
//! 需要启用 `netcdf` feature 并安装 NetCDF 库。
//! 未启用时 [`NetCdfDriver`] 的所有操作返回 [`NetCdfError::NotAvailable`]。

mod driver;
mod error;

pub use driver::*;
pub use error::*;
