// crates/sg_foundation/src/lib.rs

//! SphereGrid Foundation Layer
//!
//! 整个工作区共享的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 [`SgError`] 与 [`SgResult`]
//! - [`tolerance`]: 网格处理中使用的数值容差
//!
//! # 示例
//!
//! ```
//! use sg_foundation::{SgError, SgResult, Tolerance};
//!
//! fn check(tol: &Tolerance) -> SgResult<()> {
//!     if tol.coincident <= 0.0 {
//!         return Err(SgError::invalid_input("coincident tolerance must be positive"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(&Tolerance::default()).is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod tolerance;

// 重导出常用类型
pub use error::{SgError, SgResult};
pub use tolerance::{Tolerance, REFERENCE_TOLERANCE, SMALL_AREA_THRESHOLD};
