//! 查詢快取配置

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::duration::{parse_duration, DurationError};

/// 預設重疊窗口
pub const DEFAULT_OVERLAP_WINDOW: &str = "10m";

/// 查詢快取配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCacheConfig {
    /// 部分查詢時重新抓取的尾端重疊時長（如 "10m"）
    ///
    /// 用來吸收上次邊界附近遲到或亂序的資料點；無效字串退回預設 10 分鐘
    #[serde(default = "default_overlap_window")]
    pub overlap_window: String,
}

fn default_overlap_window() -> String {
    DEFAULT_OVERLAP_WINDOW.to_string()
}

impl QueryCacheConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            overlap_window: default_overlap_window(),
        }
    }

    /// 建構器模式：設置重疊窗口
    pub fn with_overlap_window(mut self, overlap_window: impl Into<String>) -> Self {
        self.overlap_window = overlap_window.into();
        self
    }

    /// 解析重疊窗口
    pub fn parse_overlap_window(&self) -> Result<Duration, DurationError> {
        parse_duration(&self.overlap_window)
    }

    /// 預設重疊窗口時長
    pub fn default_overlap() -> Duration {
        Duration::minutes(10)
    }
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueryCacheConfig::default();

        assert_eq!(config.overlap_window, "10m");
        assert_eq!(config.parse_overlap_window(), Ok(QueryCacheConfig::default_overlap()));
    }

    #[test]
    fn test_config_builder() {
        let config = QueryCacheConfig::new().with_overlap_window("1m");
        assert_eq!(
            config.parse_overlap_window().unwrap().num_milliseconds(),
            60_000
        );

        let invalid = QueryCacheConfig::new().with_overlap_window("soon");
        assert!(invalid.parse_overlap_window().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: QueryCacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.overlap_window, DEFAULT_OVERLAP_WINDOW);

        let config: QueryCacheConfig = serde_json::from_str(r#"{"overlapWindow":"5m"}"#).unwrap();
        assert_eq!(config.overlap_window, "5m");
    }
}
