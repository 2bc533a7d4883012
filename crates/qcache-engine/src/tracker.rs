//! 目標簽名追蹤：決定請求可否縮小為部分查詢

use qcache_core::{QueryRequest, QueryTarget, TargetIdent, TargetSig, TimeRange, TimestampMs};
use std::collections::HashMap;

use crate::cache::{CacheRequestInfo, QueryCache};

impl<Q: QueryTarget + Clone> QueryCache<Q> {
    /// 轉換即將送出的請求
    ///
    /// 所有目標在同一次往返中查詢，因此任一目標簽名變化或時間不連續都會使整批退回完整查詢，
    /// 並清除本請求所有目標的快取。
    pub fn request_info(&mut self, request: &QueryRequest<Q>) -> CacheRequestInfo<Q> {
        let new_from = request.range.from_ms();
        let new_to = request.range.to_ms();

        // 只快取以 now 為終點的相對範圍
        let should_cache = request.is_now_relative();

        let targ_sigs: HashMap<TargetIdent, TargetSig> = request
            .targets
            .iter()
            .map(|target| {
                (
                    request.ident_for(target.ref_id()),
                    (self.signature)(request, target),
                )
            })
            .collect();

        self.counters.requests += 1;

        let partial_range = if should_cache {
            self.previous_window(&targ_sigs, new_from, new_to)
                .and_then(|(prev_from, prev_to)| {
                    let from = self.partial_from(prev_from, prev_to);
                    TimeRange::from_millis(from, new_to)
                })
        } else {
            None
        };

        let emitted = match partial_range {
            Some(range) => {
                tracing::debug!(
                    "部分查詢: [{}, {}] → [{}, {}]",
                    new_from,
                    new_to,
                    range.from_ms(),
                    range.to_ms()
                );
                self.counters.partial_queries += 1;

                let mut partial = request.clone();
                partial.range = range;
                partial
            }
            None => {
                let removed = targ_sigs
                    .keys()
                    .filter(|ident| self.cache.remove(*ident).is_some())
                    .count();
                self.counters.invalidated_entries += removed as u64;
                self.counters.full_queries += 1;

                tracing::debug!(
                    "完整查詢: [{}, {}]，清除 {} 個目標快取",
                    new_from,
                    new_to,
                    removed
                );
                request.clone()
            }
        };

        CacheRequestInfo {
            request: emitted,
            targ_sigs,
            should_cache,
        }
    }

    /// 所有目標的上次覆蓋範圍
    ///
    /// 任一目標沒有快取、簽名不同或新範圍與上次不連續時返回 `None`。
    /// 各目標範圍不同時取最早的起點與終點，確保沒有目標漏資料。
    fn previous_window(
        &self,
        targ_sigs: &HashMap<TargetIdent, TargetSig>,
        new_from: TimestampMs,
        new_to: TimestampMs,
    ) -> Option<(TimestampMs, TimestampMs)> {
        let mut window: Option<(TimestampMs, TimestampMs)> = None;

        for (ident, sig) in targ_sigs {
            let Some(cached) = self.cache.get(ident) else {
                tracing::debug!("目標 {} 無快取", ident);
                return None;
            };

            if &cached.sig != sig {
                tracing::debug!("目標 {} 簽名變化", ident);
                return None;
            }

            // 新範圍必須往後延伸，且與上次範圍之間沒有空隙
            if new_to <= cached.prev_to || new_from > cached.prev_to {
                tracing::debug!(
                    "目標 {} 時間不連續: 上次 [{}, {}], 本次 [{}, {}]",
                    ident,
                    cached.prev_from,
                    cached.prev_to,
                    new_from,
                    new_to
                );
                return None;
            }

            window = Some(match window {
                Some((from, to)) => (from.min(cached.prev_from), to.min(cached.prev_to)),
                None => (cached.prev_from, cached.prev_to),
            });
        }

        window
    }

    /// 部分查詢的起點：上次終點往前一個重疊窗口，但不早於上次起點，也不小於 0
    fn partial_from(&self, prev_from: TimestampMs, prev_to: TimestampMs) -> TimestampMs {
        prev_to
            .saturating_sub(self.overlap_window_ms)
            .max(prev_from)
            .max(0)
    }
}
