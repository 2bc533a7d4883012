//! 查詢快取主體

use chrono::Duration;
use qcache_core::{DataFrame, QueryCacheConfig, QueryRequest, TargetIdent, TargetSig, TimestampMs};
use std::collections::HashMap;
use std::fmt;

use crate::stats::{CacheStats, Counters};

/// 目標簽名函數：由各資料來源注入，決定哪些屬性變化會使快取失效
pub type SignatureFn<Q> = Box<dyn Fn(&QueryRequest<Q>, &Q) -> TargetSig + Send + Sync>;

/// 單一目標的快取狀態
#[derive(Debug, Clone, PartialEq)]
pub struct TargetCache {
    /// 上次請求的簽名
    pub sig: TargetSig,

    /// 上次請求的起點（毫秒）
    pub prev_from: TimestampMs,

    /// 上次請求的終點（毫秒）
    pub prev_to: TimestampMs,

    /// 已裁切至 `[prev_from, prev_to]` 的資料框
    pub frames: Vec<DataFrame>,
}

/// 請求轉換結果
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRequestInfo<Q> {
    /// 實際要送出的請求（可能已縮小時間範圍）
    pub request: QueryRequest<Q>,

    /// 本次請求各目標的簽名
    pub targ_sigs: HashMap<TargetIdent, TargetSig>,

    /// 結果是否可被快取
    pub should_cache: bool,
}

impl<Q> CacheRequestInfo<Q> {
    /// 送出的請求是否為部分查詢
    pub fn is_partial(&self, original: &QueryRequest<Q>) -> bool {
        self.request.range != original.range
    }
}

/// 查詢快取
///
/// 每個資料來源實例一份；`request_info` 在送出請求前呼叫，`proc_frames` 在收到回應後呼叫。
/// 同一目標的兩次呼叫之間不可有另一個進行中的請求，過期回應由呼叫端自行丟棄。
pub struct QueryCache<Q> {
    /// 重疊窗口（毫秒）
    pub(crate) overlap_window_ms: i64,

    /// 目標簽名函數
    pub(crate) signature: SignatureFn<Q>,

    /// 目標身分 → 快取狀態
    pub(crate) cache: HashMap<TargetIdent, TargetCache>,

    pub(crate) counters: Counters,
}

impl<Q> QueryCache<Q> {
    /// 創建新的查詢快取
    ///
    /// 重疊窗口無法解析時退回預設 10 分鐘
    pub fn new<F>(signature: F, config: &QueryCacheConfig) -> Self
    where
        F: Fn(&QueryRequest<Q>, &Q) -> TargetSig + Send + Sync + 'static,
    {
        let overlap = config.parse_overlap_window().unwrap_or_else(|e| {
            tracing::warn!(
                "重疊窗口 {:?} 無效 ({})，改用預設值",
                config.overlap_window,
                e
            );
            QueryCacheConfig::default_overlap()
        });

        tracing::debug!("查詢快取重疊窗口: {} ms", overlap.num_milliseconds());

        Self {
            overlap_window_ms: overlap.num_milliseconds(),
            signature: Box::new(signature),
            cache: HashMap::new(),
            counters: Counters::default(),
        }
    }

    /// 重疊窗口
    pub fn overlap_window(&self) -> Duration {
        Duration::milliseconds(self.overlap_window_ms)
    }

    /// 指定目標的快取狀態
    pub fn get(&self, ident: &str) -> Option<&TargetCache> {
        self.cache.get(ident)
    }

    /// 指定目標目前快取的資料框
    pub fn cached_frames(&self, ident: &str) -> &[DataFrame] {
        self.cache
            .get(ident)
            .map(|c| c.frames.as_slice())
            .unwrap_or(&[])
    }

    /// 清除指定目標的快取
    pub fn invalidate(&mut self, ident: &str) -> bool {
        let removed = self.cache.remove(ident).is_some();
        if removed {
            self.counters.invalidated_entries += 1;
        }
        removed
    }

    /// 清除所有快取
    pub fn clear(&mut self) {
        self.counters.invalidated_entries += self.cache.len() as u64;
        self.cache.clear();
    }

    /// 快取中的目標數量
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// 統計快照
    pub fn stats(&self) -> CacheStats {
        let cached_series = self.cache.values().map(|c| c.frames.len()).sum();
        let cached_rows = self
            .cache
            .values()
            .flat_map(|c| c.frames.iter())
            .map(DataFrame::len)
            .sum();

        CacheStats::from_counters(&self.counters, self.cache.len(), cached_series, cached_rows)
    }
}

impl<Q> fmt::Debug for QueryCache<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("overlap_window_ms", &self.overlap_window_ms)
            .field("targets", &self.cache.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PromQuery;

    fn new_cache(overlap: &str) -> QueryCache<PromQuery> {
        QueryCache::new(
            |_req: &QueryRequest<PromQuery>, t: &PromQuery| t.expr.clone(),
            &QueryCacheConfig::new().with_overlap_window(overlap),
        )
    }

    #[test]
    fn test_overlap_window_parsed() {
        assert_eq!(new_cache("1m").overlap_window(), Duration::minutes(1));
        assert_eq!(new_cache("1h 5m").overlap_window(), Duration::minutes(65));
    }

    #[test]
    fn test_overlap_window_fallback() {
        assert_eq!(new_cache("").overlap_window(), Duration::minutes(10));
        assert_eq!(new_cache("ten minutes").overlap_window(), Duration::minutes(10));
        assert_eq!(new_cache("10ms").overlap_window(), Duration::minutes(10));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = new_cache("10m");
        for ident in ["d|1|A", "d|1|B"] {
            cache.cache.insert(
                ident.to_string(),
                TargetCache {
                    sig: "sig".to_string(),
                    prev_from: 0,
                    prev_to: 10,
                    frames: Vec::new(),
                },
            );
        }

        assert_eq!(cache.len(), 2);
        assert!(cache.invalidate("d|1|A"));
        assert!(!cache.invalidate("d|1|A"));
        assert!(cache.get("d|1|A").is_none());
        assert!(cache.cached_frames("d|1|A").is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidated_entries, 2);
    }

    #[test]
    fn test_debug_output() {
        let cache = new_cache("10m");
        let debug = format!("{:?}", cache);
        assert!(debug.contains("overlap_window_ms: 600000"));
    }
}
