//! 时间工具函数 (业务时区转换)
//!
//! 日期→时间戳转换统一在这里完成，
//! points / repository 层只接收 `i64` Unix millis。

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析 IANA 时区名 (e.g. "Asia/Taipei")
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| AppError::validation(format!("Invalid timezone '{}': {}", name, e)))
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地零点不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期最后一毫秒 (23:59:59.999) → Unix millis (业务时区)
///
/// 点数批次的 `ended_at` 是含边界的，所以取次日零点 - 1ms。
pub fn end_of_date_millis(date: NaiveDate, tz: Tz) -> i64 {
    match date.succ_opt() {
        Some(next_day) => day_start_millis(next_day, tz) - 1,
        None => i64::MAX,
    }
}

/// 某时刻所在业务日的最后一毫秒
pub fn end_of_day_millis(at_millis: i64, tz: Tz) -> i64 {
    let date = tz
        .timestamp_millis_opt(at_millis)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| {
            chrono::DateTime::from_timestamp_millis(at_millis)
                .map(|dt| dt.date_naive())
                .unwrap_or(NaiveDate::MIN)
        });
    end_of_date_millis(date, tz)
}
