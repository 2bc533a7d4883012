//! # Query Cache Core
//!
//! 核心資料模型與類型定義

pub mod config;
pub mod duration;
pub mod frame;
pub mod request;
pub mod value;

// Re-export 主要類型
pub use config::{QueryCacheConfig, DEFAULT_OVERLAP_WINDOW};
pub use duration::{is_valid_duration, parse_duration, DurationError};
pub use frame::{DataFrame, Field, FieldConfig, FieldType, Labels};
pub use request::{target_ident, QueryRequest, QueryTarget, RawTimeRange, TimeRange, RAW_NOW};
pub use value::Value;

/// 目標身分（dashboard UID + panel ID + refId），不隨查詢內容改變
pub type TargetIdent = String;

/// 目標簽名（查詢 + 模板變數 + 間隔 + 原始時間範圍），改變時清除快取
pub type TargetSig = String;

/// 毫秒時間戳
pub type TimestampMs = i64;
