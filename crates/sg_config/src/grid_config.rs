// crates/sg_config/src/grid_config.rs

//! GridConfig - 网格处理配置
//!
//! 所有字段都有默认值，配置文件只需写出要改动的项。
//!
//! ```json
//! {
//!   "tolerance": { "coincident": 1e-10 },
//!   "read": { "remove_coincident_nodes": false },
//!   "area": { "quadrature_order": 8 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use sg_foundation::Tolerance;
use std::path::Path;

use crate::error::ConfigError;

/// 网格处理配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// 数值容差
    #[serde(default)]
    pub tolerance: Tolerance,

    /// 读取选项
    #[serde(default)]
    pub read: ReadConfig,

    /// 面积计算
    #[serde(default)]
    pub area: AreaConfig,
}

/// 读取选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadConfig {
    /// SCRIP 读取后是否合并重合节点
    #[serde(default = "default_true")]
    pub remove_coincident_nodes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            remove_coincident_nodes: default_true(),
        }
    }
}

/// 面积计算配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaConfig {
    /// 高斯求积阶数
    #[serde(default = "default_quadrature_order")]
    pub quadrature_order: usize,
}

fn default_quadrature_order() -> usize {
    6
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            quadrature_order: default_quadrature_order(),
        }
    }
}

impl GridConfig {
    /// 从 JSON 文件加载并验证
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: GridConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("tolerance.coincident", self.tolerance.coincident),
            ("tolerance.unit_magnitude", self.tolerance.unit_magnitude),
            ("tolerance.small_area", self.tolerance.small_area),
        ];
        for (key, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid_value(key, value, "容差必须为有限正数"));
            }
        }

        if self.area.quadrature_order == 0 {
            return Err(ConfigError::invalid_value(
                "area.quadrature_order",
                0,
                "求积阶数必须大于 0",
            ));
        }

        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.read.remove_coincident_nodes);
        assert_eq!(config.area.quadrature_order, 6);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{ "tolerance": { "coincident": 1e-10 }, "area": { "quadrature_order": 8 } }"#;
        let config: GridConfig = serde_json::from_str(json).unwrap();
        assert!((config.tolerance.coincident - 1e-10).abs() < 1e-22);
        assert!((config.tolerance.unit_magnitude - 1e-12).abs() < 1e-24);
        assert!(config.read.remove_coincident_nodes);
        assert_eq!(config.area.quadrature_order, 8);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = GridConfig::default();
        config.tolerance.small_area = -1.0;
        assert!(config.validate().is_err());

        let mut config = GridConfig::default();
        config.area.quadrature_order = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");

        let mut config = GridConfig::default();
        config.read.remove_coincident_nodes = false;
        config.save_to_file(&path).unwrap();

        let loaded = GridConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            GridConfig::from_file("/nonexistent/grid.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
