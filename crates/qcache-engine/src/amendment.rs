//! 資料框接合：將回應片段合併進快取並返回完整結果

use qcache_core::{DataFrame, QueryRequest, TargetIdent, TargetSig, TimestampMs};
use qcache_table::{amend, row_count, trim, Table};
use std::collections::HashMap;

use crate::cache::{CacheRequestInfo, QueryCache, TargetCache};
use crate::{CacheError, Result};

impl<Q> QueryCache<Q> {
    /// 處理回應資料框
    ///
    /// `request` 必須是呼叫 `request_info` 時的原始請求（未縮小的可見範圍），
    /// 快取會被裁切到這個範圍。不可快取的請求原樣返回回應。
    ///
    /// 返回的資料框都是獨立副本，呼叫端可任意修改而不影響快取。
    /// 出錯時該目標的快取已被移除，下次請求會退回完整查詢。
    pub fn proc_frames(
        &mut self,
        request: &QueryRequest<Q>,
        request_info: &CacheRequestInfo<Q>,
        resp_frames: Vec<DataFrame>,
    ) -> Result<Vec<DataFrame>> {
        if !request_info.should_cache {
            return Ok(resp_frames);
        }

        let new_from = request.range.from_ms();
        let new_to = request.range.to_ms();

        let mut out_frames = Vec::new();

        for (ident, frames) in group_by_target(request, resp_frames) {
            let Some(sig) = request_info.targ_sigs.get(&ident) else {
                // 請求中沒有這個目標，不快取
                tracing::debug!("目標 {} 不在請求中，回應原樣返回", ident);
                out_frames.extend(frames);
                continue;
            };

            out_frames.extend(self.amend_target(&ident, sig, frames, new_from, new_to)?);
        }

        tracing::debug!(
            "回應處理完成: 輸出 {} 個資料框, 快取 {} 個目標",
            out_frames.len(),
            self.cache.len()
        );

        Ok(out_frames)
    }

    /// 合併單一目標的回應資料框並更新快取，返回更新後快取資料框的副本
    fn amend_target(
        &mut self,
        ident: &TargetIdent,
        sig: &TargetSig,
        resp_frames: Vec<DataFrame>,
        new_from: TimestampMs,
        new_to: TimestampMs,
    ) -> Result<Vec<DataFrame>> {
        let mut cached_frames = self
            .cache
            .remove(ident)
            .map(|c| c.frames)
            .unwrap_or_default();

        for resp_frame in resp_frames {
            // 跳過空資料框
            if resp_frame.is_empty() {
                continue;
            }

            let series = resp_frame.series_ident();
            let matched = cached_frames
                .iter()
                .position(|cached| cached.series_ident() == series);

            match matched {
                None => {
                    tracing::debug!("目標 {} 新序列: {:?}", ident, series);
                    cached_frames.push(resp_frame);
                }
                Some(idx) => {
                    let cached = &mut cached_frames[idx];

                    if cached.fields.len() != resp_frame.fields.len() {
                        return Err(CacheError::FieldCountMismatch {
                            series: series.unwrap_or_default(),
                            cached: cached.fields.len(),
                            fresh: resp_frame.fields.len(),
                        });
                    }

                    let prev = take_table(cached);
                    let next: Table = resp_frame.fields.into_iter().map(|f| f.values).collect();
                    let amended = amend(&prev, &next)?;

                    put_table(cached, amended);
                }
            }
        }

        // 裁切至可見範圍，移除變空的序列
        let before = cached_frames.len();
        let mut non_empty = Vec::with_capacity(before);

        for mut frame in cached_frames {
            let trimmed = trim(&take_table(&mut frame), new_from, new_to)?;

            if row_count(&trimmed) > 0 {
                put_table(&mut frame, trimmed);
                non_empty.push(frame);
            }
        }

        let evicted = before - non_empty.len();
        if evicted > 0 {
            tracing::debug!("目標 {} 移除 {} 個空序列", ident, evicted);
            self.counters.evicted_series += evicted as u64;
        }

        // 輸出副本，快取內部緩衝區不外流
        let output = non_empty.clone();

        self.cache.insert(
            ident.clone(),
            TargetCache {
                sig: sig.clone(),
                prev_from: new_from,
                prev_to: new_to,
                frames: non_empty,
            },
        );

        Ok(output)
    }
}

/// 依目標身分分組，保持首次出現順序
fn group_by_target<Q>(
    request: &QueryRequest<Q>,
    frames: Vec<DataFrame>,
) -> Vec<(TargetIdent, Vec<DataFrame>)> {
    let mut groups: Vec<(TargetIdent, Vec<DataFrame>)> = Vec::new();
    let mut index: HashMap<TargetIdent, usize> = HashMap::new();

    for frame in frames {
        let ident = request.ident_for(frame.ref_id.as_deref().unwrap_or_default());

        match index.get(&ident) {
            Some(&i) => groups[i].1.push(frame),
            None => {
                index.insert(ident.clone(), groups.len());
                groups.push((ident, vec![frame]));
            }
        }
    }

    groups
}

/// 取出資料框的所有欄位值（留下空欄位）
fn take_table(frame: &mut DataFrame) -> Table {
    frame
        .fields
        .iter_mut()
        .map(|f| std::mem::take(&mut f.values))
        .collect()
}

/// 寫回欄位值
fn put_table(frame: &mut DataFrame, table: Table) {
    for (field, values) in frame.fields.iter_mut().zip(table) {
        field.values = values;
    }
}
