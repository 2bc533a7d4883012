//! 快取統計

use serde::{Deserialize, Serialize};

/// 累計計數器（隨快取實例存活）
#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    pub requests: u64,
    pub partial_queries: u64,
    pub full_queries: u64,
    pub invalidated_entries: u64,
    pub evicted_series: u64,
}

/// 快取統計快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// 處理過的請求數
    pub requests: u64,

    /// 縮小為部分查詢的請求數
    pub partial_queries: u64,

    /// 完整查詢的請求數
    pub full_queries: u64,

    /// 因簽名變化或主動清除而刪除的目標快取數
    pub invalidated_entries: u64,

    /// 裁切後為空而被移除的序列數
    pub evicted_series: u64,

    /// 目前快取的目標數
    pub cached_targets: usize,

    /// 目前快取的序列（資料框）數
    pub cached_series: usize,

    /// 目前快取的總列數
    pub cached_rows: usize,
}

impl CacheStats {
    pub(crate) fn from_counters(
        counters: &Counters,
        cached_targets: usize,
        cached_series: usize,
        cached_rows: usize,
    ) -> Self {
        Self {
            requests: counters.requests,
            partial_queries: counters.partial_queries,
            full_queries: counters.full_queries,
            invalidated_entries: counters.invalidated_entries,
            evicted_series: counters.evicted_series,
            cached_targets,
            cached_series,
            cached_rows,
        }
    }

    /// 部分查詢比例
    pub fn partial_ratio(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.partial_queries as f64 / self.requests as f64
        }
    }
}
