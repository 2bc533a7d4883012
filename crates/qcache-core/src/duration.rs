//! 時長字串解析（如 `10m`、`1h 30m`）

use chrono::Duration;
use regex::Regex;
use std::sync::OnceLock;

/// 時長解析錯誤
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("空的時長字串")]
    Empty,

    #[error("無法解析的時長片段: {0}")]
    InvalidPart(String),

    #[error("未知的時長單位: {0}")]
    UnknownUnit(String),

    #[error("時長溢出: {0}")]
    Overflow(String),
}

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

fn part_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)(\D.*)$").expect("靜態正則表達式"))
}

/// 單位 → 毫秒
///
/// 月固定 30 天，年固定 365 天
fn unit_millis(unit: &str) -> Option<i64> {
    match unit {
        "y" | "Y" | "years" => Some(365 * DAY_MS),
        "M" | "months" => Some(30 * DAY_MS),
        "w" | "W" | "weeks" => Some(7 * DAY_MS),
        "d" | "D" | "days" => Some(DAY_MS),
        "h" | "H" | "hours" => Some(HOUR_MS),
        "m" | "minutes" => Some(MINUTE_MS),
        "s" | "S" | "seconds" => Some(SECOND_MS),
        _ => None,
    }
}

/// 解析時長字串
///
/// 格式為空白分隔的 `<整數><單位>` 片段，各片段相加
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let mut total_ms: i64 = 0;
    let mut parts = 0;

    for part in input.split_whitespace() {
        parts += 1;

        let caps = part_pattern()
            .captures(part)
            .ok_or_else(|| DurationError::InvalidPart(part.to_string()))?;

        let unit = &caps[2];
        let per_unit = unit_millis(unit).ok_or_else(|| DurationError::UnknownUnit(unit.to_string()))?;

        let part_ms = caps[1]
            .parse::<i64>()
            .ok()
            .and_then(|n| n.checked_mul(per_unit))
            .ok_or_else(|| DurationError::Overflow(part.to_string()))?;

        total_ms = total_ms
            .checked_add(part_ms)
            .ok_or_else(|| DurationError::Overflow(input.to_string()))?;
    }

    if parts == 0 {
        return Err(DurationError::Empty);
    }

    Duration::try_milliseconds(total_ms).ok_or_else(|| DurationError::Overflow(input.to_string()))
}

/// 檢查時長字串是否有效
pub fn is_valid_duration(input: &str) -> bool {
    parse_duration(input).is_ok()
}
