// ==========================================
// 生产订单核对系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 文件（key-value），缺省项使用内置默认值
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::types::{ImportPolicy, OrderIdPolicy};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    FormatError { path: String, message: String },

    #[error("配置快照序列化失败: {0}")]
    SnapshotError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建仅含默认值的配置管理器
    pub fn new() -> Self {
        Self::default()
    }

    /// 默认配置文件路径: {config_dir}/production-order-reconcile/config.json
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("production-order-reconcile").join("config.json"))
    }

    /// 加载默认路径的配置文件（不存在时使用默认值）
    pub fn load_default() -> ConfigResult<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => {
                debug!("未找到配置文件，使用默认配置");
                Ok(Self::new())
            }
        }
    }

    /// 从 JSON 文件加载配置
    ///
    /// # 格式
    /// 顶层为对象；字符串原样保存，数值/布尔转为字符串，数组按 ';' 拼接
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        let mut manager = Self::from_json_str(&content).map_err(|message| ConfigError::FormatError {
            path: path_str.clone(),
            message,
        })?;
        manager.source = Some(path.to_path_buf());

        info!(path = %path_str, keys = manager.values.len(), "配置文件加载完成");
        Ok(manager)
    }

    fn from_json_str(content: &str) -> Result<Self, String> {
        let root: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
        let object = root
            .as_object()
            .ok_or_else(|| "顶层必须为 JSON 对象".to_string())?;

        let mut values = BTreeMap::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(";"),
                Value::Null => continue,
                other => other.to_string(),
            };
            values.insert(key.clone(), text);
        }

        Ok(Self {
            values,
            source: None,
        })
    }

    /// 配置来源文件（默认配置时为 None）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 覆写配置值
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| v.trim().to_string())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_global_config_value(key)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    // ==========================================
    // 类型化读取（非法值回落默认值）
    // ==========================================

    pub fn import_policy(&self) -> ImportPolicy {
        let value = self.get_config_or_default(config_keys::IMPORT_POLICY, "ALL_OR_NOTHING");
        value.parse().unwrap_or_else(|e| {
            warn!(key = config_keys::IMPORT_POLICY, error = %e, "配置值非法，使用默认值");
            ImportPolicy::default()
        })
    }

    pub fn order_id_policy(&self) -> OrderIdPolicy {
        let value = self.get_config_or_default(config_keys::ORDER_ID_POLICY, "BATCH_LOCAL");
        value.parse().unwrap_or_else(|e| {
            warn!(key = config_keys::ORDER_ID_POLICY, error = %e, "配置值非法，使用默认值");
            OrderIdPolicy::default()
        })
    }

    pub fn header_rows(&self) -> usize {
        let value = self.get_config_or_default(config_keys::HEADER_ROWS, "1");
        value.parse::<usize>().unwrap_or(1)
    }

    /// 额外日期格式（chrono 格式串，优先于内置格式尝试）
    pub fn extra_date_formats(&self) -> Vec<String> {
        self.get_config_or_default(config_keys::DATE_FORMATS, "")
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    pub fn locale(&self) -> String {
        self.get_config_or_default(config_keys::LOCALE, "en")
    }

    /// 获取生效配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let mut snapshot = Map::new();
        snapshot.insert(
            config_keys::IMPORT_POLICY.to_string(),
            serde_json::to_value(self.import_policy())?,
        );
        snapshot.insert(
            config_keys::ORDER_ID_POLICY.to_string(),
            serde_json::to_value(self.order_id_policy())?,
        );
        snapshot.insert(config_keys::HEADER_ROWS.to_string(), json!(self.header_rows()));
        snapshot.insert(config_keys::DATE_FORMATS.to_string(), json!(self.extra_date_formats()));
        snapshot.insert(config_keys::LOCALE.to_string(), json!(self.locale()));

        Ok(serde_json::to_string(&Value::Object(snapshot))?)
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_import_policy(&self) -> ConfigResult<ImportPolicy> {
        Ok(self.import_policy())
    }

    async fn get_header_rows(&self) -> ConfigResult<usize> {
        Ok(self.header_rows())
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 导入
    pub const IMPORT_POLICY: &str = "import.policy";
    pub const ORDER_ID_POLICY: &str = "import.order_id_policy";
    pub const HEADER_ROWS: &str = "import.header_rows";
    pub const DATE_FORMATS: &str = "import.date_formats";

    // 界面
    pub const LOCALE: &str = "app.locale";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ConfigManager::new();
        assert_eq!(config.import_policy(), ImportPolicy::AllOrNothing);
        assert_eq!(config.order_id_policy(), OrderIdPolicy::BatchLocal);
        assert_eq!(config.header_rows(), 1);
        assert!(config.extra_date_formats().is_empty());
        assert_eq!(config.locale(), "en");
        assert!(config.source().is_none());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "import.policy": "best_effort_partial",
                "import.order_id_policy": "MONOTONIC",
                "import.header_rows": 2,
                "import.date_formats": ["%m-%d-%Y", "%Y.%m.%d"],
                "app.locale": null
            }}"#
        )
        .unwrap();

        let config = ConfigManager::from_file(file.path()).unwrap();
        assert_eq!(config.import_policy(), ImportPolicy::BestEffortPartial);
        assert_eq!(config.order_id_policy(), OrderIdPolicy::Monotonic);
        assert_eq!(config.header_rows(), 2);
        assert_eq!(config.extra_date_formats(), vec!["%m-%d-%Y", "%Y.%m.%d"]);
        assert_eq!(config.locale(), "en");
        assert_eq!(config.source(), Some(file.path()));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let mut config = ConfigManager::new();
        config.set(config_keys::IMPORT_POLICY, "SOMETIMES");
        config.set(config_keys::HEADER_ROWS, "-3");

        assert_eq!(config.import_policy(), ImportPolicy::AllOrNothing);
        assert_eq!(config.header_rows(), 1);
    }

    #[test]
    fn test_from_file_rejects_non_object() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[1, 2, 3]").unwrap();

        let result = ConfigManager::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::FormatError { .. })));
    }

    #[test]
    fn test_snapshot_contains_effective_values() {
        let mut config = ConfigManager::new();
        config.set(config_keys::ORDER_ID_POLICY, "MONOTONIC");

        let snapshot: Value = serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot[config_keys::ORDER_ID_POLICY], "MONOTONIC");
        assert_eq!(snapshot[config_keys::IMPORT_POLICY], "ALL_OR_NOTHING");
        assert_eq!(snapshot[config_keys::HEADER_ROWS], 1);
    }
}
