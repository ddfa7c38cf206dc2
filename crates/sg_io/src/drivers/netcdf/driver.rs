// crates/sg_io/src/drivers/netcdf/driver.rs

//! NetCDF 驱动实现
//!
//! 读取时数值变量统一按 f64 读入；字符变量网格方言不需要，直接跳过。
//! 写出时字符变量以 NC_BYTE 存储。

use super::error::NetCdfError;
use crate::dataset::Dataset;
use std::path::Path;

/// NetCDF 驱动
pub struct NetCdfDriver;

#[cfg(feature = "netcdf")]
impl NetCdfDriver {
    /// 读取整个 NetCDF 文件
    pub fn read(path: impl AsRef<Path>) -> Result<Dataset, NetCdfError> {
        use crate::dataset::{Dimension, VarData, Variable};
        use std::collections::BTreeMap;

        let path = path.as_ref();
        if !path.exists() {
            return Err(NetCdfError::Open {
                path: path.display().to_string(),
                message: "文件不存在".to_string(),
            });
        }
        let file = netcdf::open(path).map_err(|e| NetCdfError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut ds = Dataset::new();
        for d in file.dimensions() {
            ds.dimensions.insert(
                d.name().to_string(),
                Dimension {
                    len: d.len(),
                    unlimited: d.is_unlimited(),
                },
            );
        }

        for attr in file.attributes() {
            if let Some(value) = read_attr(&attr, attr.name())? {
                ds.attributes.insert(attr.name().to_string(), value);
            }
        }

        for var in file.variables() {
            let name = var.name().to_string();
            let values = match var.get_values::<f64, _>(..) {
                Ok(v) => v,
                Err(e) => {
                    tracing::debug!("跳过非数值变量 {}: {}", name, e);
                    continue;
                }
            };

            let mut attributes = BTreeMap::new();
            for attr in var.attributes() {
                if let Some(value) = read_attr(&attr, &format!("{name}:{}", attr.name()))? {
                    attributes.insert(attr.name().to_string(), value);
                }
            }

            ds.variables.insert(
                name,
                Variable {
                    dims: var.dimensions().iter().map(|d| d.name().to_string()).collect(),
                    data: VarData::Double(values),
                    attributes,
                },
            );
        }

        Ok(ds)
    }

    /// 把数据集写成 NetCDF 文件（覆盖已有文件）
    pub fn write(path: impl AsRef<Path>, ds: &Dataset) -> Result<(), NetCdfError> {
        use crate::dataset::VarData;

        let path = path.as_ref();
        let mut file = netcdf::create(path).map_err(|e| NetCdfError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        for (name, dim) in &ds.dimensions {
            if dim.unlimited {
                file.add_unlimited_dimension(name)?;
            } else {
                file.add_dimension(name, dim.len)?;
            }
        }

        for (name, value) in &ds.attributes {
            write_global_attr(&mut file, name, value)?;
        }

        for (name, var) in &ds.variables {
            let dims: Vec<&str> = var.dims.iter().map(String::as_str).collect();
            let extents: Vec<std::ops::Range<usize>> =
                ds.shape(var).into_iter().map(|n| 0..n).collect();

            let mut nc_var = match &var.data {
                VarData::Double(_) => file.add_variable::<f64>(name, &dims)?,
                VarData::Int(_) => file.add_variable::<i32>(name, &dims)?,
                VarData::Char(_) => file.add_variable::<i8>(name, &dims)?,
            };

            for (attr_name, value) in &var.attributes {
                write_var_attr(&mut nc_var, attr_name, value)?;
            }

            if var.data.is_empty() {
                continue;
            }
            let written = match &var.data {
                VarData::Double(v) => nc_var.put_values(v, extents.as_slice()),
                VarData::Int(v) => nc_var.put_values(v, extents.as_slice()),
                VarData::Char(v) => {
                    let bytes: Vec<i8> = v.iter().map(|&b| b as i8).collect();
                    nc_var.put_values(&bytes, extents.as_slice())
                }
            };
            written.map_err(|e| NetCdfError::Write {
                name: name.clone(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// 读出属性值；库无法解码时报错，类型不在 [`AttrValue`](crate::dataset::AttrValue) 内时跳过
#[cfg(feature = "netcdf")]
fn read_attr(attr: &netcdf::Attribute<'_>, name: &str) -> Result<Option<crate::dataset::AttrValue>, NetCdfError> {
    let value = attr.value().map_err(|e| NetCdfError::Read {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    Ok(convert_attr(value))
}

#[cfg(feature = "netcdf")]
fn convert_attr(value: netcdf::AttributeValue) -> Option<crate::dataset::AttrValue> {
    use crate::dataset::AttrValue;
    match value {
        netcdf::AttributeValue::Str(s) => Some(AttrValue::Str(s)),
        netcdf::AttributeValue::Float(v) => Some(AttrValue::Float(v)),
        netcdf::AttributeValue::Double(v) => Some(AttrValue::Double(v)),
        netcdf::AttributeValue::Int(v) => Some(AttrValue::Int(v)),
        _ => None,
    }
}

#[cfg(feature = "netcdf")]
fn write_global_attr(
    file: &mut netcdf::FileMut,
    name: &str,
    value: &crate::dataset::AttrValue,
) -> Result<(), NetCdfError> {
    use crate::dataset::AttrValue;
    match value {
        AttrValue::Str(s) => file.add_attribute(name, s.as_str())?,
        AttrValue::Float(v) => file.add_attribute(name, *v)?,
        AttrValue::Double(v) => file.add_attribute(name, *v)?,
        AttrValue::Int(v) => file.add_attribute(name, *v)?,
    };
    Ok(())
}

#[cfg(feature = "netcdf")]
fn write_var_attr(
    var: &mut netcdf::VariableMut<'_>,
    name: &str,
    value: &crate::dataset::AttrValue,
) -> Result<(), NetCdfError> {
    use crate::dataset::AttrValue;
    match value {
        AttrValue::Str(s) => var.put_attribute(name, s.as_str())?,
        AttrValue::Float(v) => var.put_attribute(name, *v)?,
        AttrValue::Double(v) => var.put_attribute(name, *v)?,
        AttrValue::Int(v) => var.put_attribute(name, *v)?,
    };
    Ok(())
}

/// 无 NetCDF 支持时的占位实现
#[cfg(not(feature = "netcdf"))]
impl NetCdfDriver {
    /// 读取 NetCDF 文件 (无 NetCDF 支持)
    pub fn read(_path: impl AsRef<Path>) -> Result<Dataset, NetCdfError> {
        Err(NetCdfError::NotAvailable)
    }

    /// 写出 NetCDF 文件 (无 NetCDF 支持)
    pub fn write(_path: impl AsRef<Path>, _ds: &Dataset) -> Result<(), NetCdfError> {
        Err(NetCdfError::NotAvailable)
    }
}

#[cfg(all(test, not(feature = "netcdf")))]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_reports_not_available() {
        let err = NetCdfDriver::read("grid.nc").err();
        assert!(matches!(err, Some(NetCdfError::NotAvailable)));
        let err = NetCdfDriver::write("grid.nc", &Dataset::new()).err();
        assert!(matches!(err, Some(NetCdfError::NotAvailable)));
    }
}
