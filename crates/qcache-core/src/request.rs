//! 查詢請求模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{TargetIdent, TimestampMs};

/// 代表「現在」的相對時間標記
pub const RAW_NOW: &str = "now";

/// 查詢目標（面板中的單一查詢）
pub trait QueryTarget {
    /// 目標的參考 ID（如 "A"、"B"）
    fn ref_id(&self) -> &str;
}

/// 組合目標身分
pub fn target_ident(dashboard_uid: &str, panel_id: u64, ref_id: &str) -> TargetIdent {
    format!("{}|{}|{}", dashboard_uid, panel_id, ref_id)
}

/// 絕對時間範圍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// 起點
    pub from: DateTime<Utc>,
    /// 終點
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// 創建新的時間範圍
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// 由毫秒時間戳創建（超出 chrono 可表示範圍時返回 `None`）
    pub fn from_millis(from_ms: TimestampMs, to_ms: TimestampMs) -> Option<Self> {
        Some(Self {
            from: DateTime::from_timestamp_millis(from_ms)?,
            to: DateTime::from_timestamp_millis(to_ms)?,
        })
    }

    /// 起點（毫秒）
    pub fn from_ms(&self) -> TimestampMs {
        self.from.timestamp_millis()
    }

    /// 終點（毫秒）
    pub fn to_ms(&self) -> TimestampMs {
        self.to.timestamp_millis()
    }
}

/// 使用者輸入的原始時間範圍（如 `now-6h` 到 `now`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTimeRange {
    pub from: String,
    pub to: String,
}

impl RawTimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// 終點是否為「現在」
    pub fn is_now_relative(&self) -> bool {
        self.to == RAW_NOW
    }
}

/// 查詢請求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<Q> {
    /// 絕對時間範圍
    pub range: TimeRange,

    /// 原始時間範圍
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_raw: Option<RawTimeRange>,

    /// 查詢目標
    pub targets: Vec<Q>,

    /// Dashboard UID
    pub dashboard_uid: String,

    /// 面板 ID
    pub panel_id: u64,

    /// 最大資料點數
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_data_points: Option<u32>,

    /// 查詢間隔（如 "15s"）
    #[serde(default)]
    pub interval: String,

    /// 查詢間隔（毫秒）
    #[serde(default)]
    pub interval_ms: i64,

    /// 模板變數的實際值
    #[serde(default)]
    pub scoped_vars: BTreeMap<String, String>,
}

impl<Q> QueryRequest<Q> {
    /// 創建新的查詢請求
    pub fn new(
        dashboard_uid: impl Into<String>,
        panel_id: u64,
        range: TimeRange,
        targets: Vec<Q>,
    ) -> Self {
        Self {
            range,
            range_raw: None,
            targets,
            dashboard_uid: dashboard_uid.into(),
            panel_id,
            max_data_points: None,
            interval: String::new(),
            interval_ms: 0,
            scoped_vars: BTreeMap::new(),
        }
    }

    /// 建構器模式：設置原始時間範圍
    pub fn with_raw_range(mut self, raw: RawTimeRange) -> Self {
        self.range_raw = Some(raw);
        self
    }

    /// 建構器模式：設置最大資料點數
    pub fn with_max_data_points(mut self, max_data_points: u32) -> Self {
        self.max_data_points = Some(max_data_points);
        self
    }

    /// 建構器模式：設置查詢間隔
    pub fn with_interval(mut self, interval: impl Into<String>, interval_ms: i64) -> Self {
        self.interval = interval.into();
        self.interval_ms = interval_ms;
        self
    }

    /// 建構器模式：設置模板變數
    pub fn with_scoped_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.scoped_vars.insert(name.into(), value.into());
        self
    }

    /// 終點是否為「現在」（只有這類請求才會被快取）
    pub fn is_now_relative(&self) -> bool {
        self.range_raw
            .as_ref()
            .map(RawTimeRange::is_now_relative)
            .unwrap_or(false)
    }

    /// 指定 refId 的目標身分
    pub fn ident_for(&self, ref_id: &str) -> TargetIdent {
        target_ident(&self.dashboard_uid, self.panel_id, ref_id)
    }
}
