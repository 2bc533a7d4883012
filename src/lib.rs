//! # QCache
//!
//! 儀表板面板的增量查詢結果快取
//!
//! - [`QueryCache::request_info`]：送出前判斷可否縮小為部分查詢
//! - [`QueryCache::proc_frames`]：收到回應後接合快取並返回完整結果

pub use qcache_core::{
    is_valid_duration, parse_duration, target_ident, DataFrame, DurationError, Field, FieldConfig,
    FieldType, Labels, QueryCacheConfig, QueryRequest, QueryTarget, RawTimeRange, TargetIdent,
    TargetSig, TimeRange, TimestampMs, Value, DEFAULT_OVERLAP_WINDOW, RAW_NOW,
};
pub use qcache_engine::{
    influx_target_signature, interpolate, prom_target_signature, CacheError, CacheRequestInfo,
    CacheStats, InfluxQuery, PromQuery, QueryCache, SignatureFn, TargetCache,
};
pub use qcache_table::{amend, trim, Table, TableError};

/// 以 Prometheus 內建簽名建立快取
pub fn prometheus_cache(config: &QueryCacheConfig) -> QueryCache<PromQuery> {
    tracing::debug!("建立 Prometheus 查詢快取");
    QueryCache::new(prom_target_signature, config)
}

/// 以 InfluxDB 內建簽名建立快取
pub fn influx_cache(config: &QueryCacheConfig) -> QueryCache<InfluxQuery> {
    tracing::debug!("建立 InfluxDB 查詢快取");
    QueryCache::new(influx_target_signature, config)
}
