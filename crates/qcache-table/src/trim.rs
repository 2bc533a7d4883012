//! 表格裁切

use crate::{empty_table, timestamps, Result, Table};

/// 裁切表格至時間窗口 `[from_ms, to_ms]`（含兩端）
///
/// 時間戳需遞增；無列符合時返回同欄數、零列的表格。
pub fn trim(table: &Table, from_ms: i64, to_ms: i64) -> Result<Table> {
    let times = timestamps(table)?;

    let start = times.partition_point(|&t| t < from_ms);
    let end = times.partition_point(|&t| t <= to_ms);

    if start >= end {
        return Ok(empty_table(table.len()));
    }

    if start == 0 && end == times.len() {
        return Ok(table.clone());
    }

    Ok(table
        .iter()
        .map(|column| column[start..end].to_vec())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{rows, table};
    use crate::{row_count, TableError};
    use qcache_core::Value;
    use rstest::rstest;

    fn sample() -> Table {
        table(&[(0, 0.0), (10, 1.0), (20, 2.0), (30, 3.0), (40, 4.0)])
    }

    #[rstest]
    #[case(10, 30, vec![10, 20, 30])]
    #[case(5, 35, vec![10, 20, 30])]
    #[case(-100, 100, vec![0, 10, 20, 30, 40])]
    #[case(40, 40, vec![40])]
    #[case(0, 0, vec![0])]
    fn test_trim_window(#[case] from: i64, #[case] to: i64, #[case] expected: Vec<i64>) {
        let trimmed = trim(&sample(), from, to).unwrap();
        let times: Vec<i64> = rows(&trimmed).into_iter().map(|(t, _)| t).collect();

        assert_eq!(times, expected);
    }

    #[rstest]
    #[case(41, 100)]
    #[case(-100, -1)]
    #[case(11, 19)]
    #[case(30, 10)]
    fn test_trim_no_rows(#[case] from: i64, #[case] to: i64) {
        let trimmed = trim(&sample(), from, to).unwrap();

        assert_eq!(trimmed.len(), 2);
        assert_eq!(row_count(&trimmed), 0);
    }

    #[test]
    fn test_trim_keeps_values_aligned() {
        let trimmed = trim(&sample(), 20, 30).unwrap();
        assert_eq!(rows(&trimmed), vec![(20, 2.0), (30, 3.0)]);
    }

    #[test]
    fn test_trim_zero_columns() {
        let trimmed = trim(&Table::new(), 0, 10).unwrap();
        assert!(trimmed.is_empty());
    }

    #[test]
    fn test_trim_invalid_timestamp() {
        let t: Table = vec![vec![Value::Int(0), Value::Bool(true)]];
        assert_eq!(trim(&t, 0, 10), Err(TableError::InvalidTimestamp { row: 1 }));
    }
}
