// crates/sg_io/src/drivers/json.rs

//! JSON 容器驱动
//!
//! 以 serde_json 存储 [`Dataset`]，不依赖系统 NetCDF 库，
//! 测试和小网格交换都用它。

use crate::dataset::Dataset;
use crate::error::IoResult;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// 从 JSON 文件读取数据集
pub fn read(path: impl AsRef<Path>) -> IoResult<Dataset> {
    let file = File::open(path.as_ref())?;
    let ds = serde_json::from_reader(BufReader::new(file))?;
    Ok(ds)
}

/// 把数据集写成 JSON 文件
pub fn write(path: impl AsRef<Path>, ds: &Dataset) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer(&mut writer, ds)?;
    writer.flush()?;
    Ok(())
}
