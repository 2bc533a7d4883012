//! 表格合併

use crate::{row_count, timestamps, Result, Table, TableError};

/// 合併後每一列的來源
#[derive(Debug, Clone, Copy)]
enum RowSource {
    Prev(usize),
    Next(usize),
}

/// 合併兩個列式表格
///
/// 輸出為兩表按時間戳取聯集、遞增排序；同一時間戳兩表都有時取後表的列。
/// 兩表欄數必須一致，否則視為資料來源或快取損壞，返回錯誤。
pub fn amend(prev: &Table, next: &Table) -> Result<Table> {
    if prev.len() != next.len() {
        return Err(TableError::ColumnCountMismatch {
            prev: prev.len(),
            next: next.len(),
        });
    }

    let prev_times = timestamps(prev)?;
    let next_times = timestamps(next)?;

    // 快速路徑：任一側為空
    if next_times.is_empty() {
        return Ok(prev.clone());
    }
    if prev_times.is_empty() {
        return Ok(next.clone());
    }

    let order = merge_order(&prev_times, &next_times);

    tracing::trace!(
        "合併表格: 前表 {} 列, 後表 {} 列, 合併後 {} 列",
        row_count(prev),
        row_count(next),
        order.len()
    );

    let amended = (0..prev.len())
        .map(|column| {
            order
                .iter()
                .map(|source| match *source {
                    RowSource::Prev(row) => prev[column][row].clone(),
                    RowSource::Next(row) => next[column][row].clone(),
                })
                .collect()
        })
        .collect();

    Ok(amended)
}

/// 雙指標合併兩個遞增時間序列，決定每一列的來源
fn merge_order(prev_times: &[i64], next_times: &[i64]) -> Vec<RowSource> {
    let mut order = Vec::with_capacity(prev_times.len() + next_times.len());
    let (mut i, mut j) = (0, 0);

    while i < prev_times.len() && j < next_times.len() {
        let (p, n) = (prev_times[i], next_times[j]);

        if p < n {
            order.push(RowSource::Prev(i));
            i += 1;
        } else if p > n {
            order.push(RowSource::Next(j));
            j += 1;
        } else {
            // 同一時間戳：後表覆蓋
            order.push(RowSource::Next(j));
            i += 1;
            j += 1;
        }
    }

    order.extend((i..prev_times.len()).map(RowSource::Prev));
    order.extend((j..next_times.len()).map(RowSource::Next));

    order
}
