//! # Query Cache Table
//!
//! 列式表格的合併（amend）與裁切（trim）
//!
//! 表格為欄優先（column-major）：每個欄位是一個等長的值序列，第 0 欄為遞增的毫秒時間戳。

pub mod amend;
pub mod trim;


use qcache_core::Value;

// Re-export 主要類型
pub use amend::amend;
pub use trim::trim;

/// 列式表格
pub type Table = Vec<Vec<Value>>;

/// 表格錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("欄位數量不一致: 前表 {prev} 欄, 後表 {next} 欄")]
    ColumnCountMismatch { prev: usize, next: usize },

    #[error("欄位長度不一致: 第 {column} 欄有 {actual} 列, 預期 {expected} 列")]
    RaggedColumns {
        column: usize,
        expected: usize,
        actual: usize,
    },

    #[error("第 {row} 列的時間戳無效")]
    InvalidTimestamp { row: usize },
}

pub type Result<T> = std::result::Result<T, TableError>;

/// 列數
pub fn row_count(table: &Table) -> usize {
    table.first().map(Vec::len).unwrap_or(0)
}

/// 創建指定欄數、零列的空表格
pub fn empty_table(columns: usize) -> Table {
    vec![Vec::new(); columns]
}

/// 檢查所有欄位等長，並取出第 0 欄的時間戳
pub(crate) fn timestamps(table: &Table) -> Result<Vec<i64>> {
    let expected = row_count(table);

    for (column, values) in table.iter().enumerate() {
        if values.len() != expected {
            return Err(TableError::RaggedColumns {
                column,
                expected,
                actual: values.len(),
            });
        }
    }

    match table.first() {
        Some(times) => times
            .iter()
            .enumerate()
            .map(|(row, v)| v.as_timestamp().ok_or(TableError::InvalidTimestamp { row }))
            .collect(),
        None => Ok(Vec::new()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::table;

    #[test]
    fn test_timestamps() {
        let t = table(&[(1, 1.0), (2, 2.0)]);
        assert_eq!(timestamps(&t).unwrap(), vec![1, 2]);
        assert_eq!(row_count(&t), 2);
    }

    #[test]
    fn test_timestamps_ragged() {
        let mut t = table(&[(1, 1.0), (2, 2.0)]);
        t[1].pop();

        assert_eq!(
            timestamps(&t),
            Err(TableError::RaggedColumns {
                column: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_timestamps_invalid() {
        let t: Table = vec![vec![Value::Int(1), Value::Null]];
        assert_eq!(timestamps(&t), Err(TableError::InvalidTimestamp { row: 1 }));
    }

    #[test]
    fn test_empty_table() {
        let t = empty_table(3);
        assert_eq!(t.len(), 3);
        assert_eq!(row_count(&t), 0);
        assert_eq!(timestamps(&Table::new()).unwrap(), Vec::<i64>::new());
    }
}
