//! 日期来源
//!
//! 提醒计算只依赖“今天”的日期，测试和 `--today` 参数使用固定时钟。

use chrono::NaiveDate;

pub trait Clock: Send + Sync {
    /// 当前本地日期（零点）
    fn today(&self) -> NaiveDate;
}

/// 系统时钟
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// 固定日期
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// 解析 `YYYY-MM-DD`
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 13).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn test_system_clock_is_local_date() {
        let before = chrono::Local::now().date_naive();
        let today = SystemClock.today();
        let after = chrono::Local::now().date_naive();
        assert!(today >= before && today <= after);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2023-12-15"), NaiveDate::from_ymd_opt(2023, 12, 15));
        assert_eq!(parse_date("2023/12/15"), None);
    }
}
