//! # Query Cache Engine
//!
//! 增量查詢快取：只請求新經過的時間片段，並將新資料接合到已快取的資料上

pub mod amendment;
pub mod cache;
pub mod stats;
pub mod targets;
pub mod tracker;

// Re-export 主要類型
pub use cache::{CacheRequestInfo, QueryCache, SignatureFn, TargetCache};
pub use stats::CacheStats;
pub use targets::{influx_target_signature, interpolate, prom_target_signature, InfluxQuery, PromQuery};

/// 快取錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("欄位數量不一致: 序列 {series} 快取 {cached} 欄, 回應 {fresh} 欄")]
    FieldCountMismatch {
        series: String,
        cached: usize,
        fresh: usize,
    },

    #[error("表格錯誤: {0}")]
    Table(#[from] qcache_table::TableError),
}

pub type Result<T> = std::result::Result<T, CacheError>;
