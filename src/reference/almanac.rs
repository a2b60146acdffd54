//! Calendar data for the header: lunar date, festivals and solar terms.
//!
//! Lunar conversion is an external concern; plug a full implementation in
//! behind `Almanac`. The bundled `GregorianAlmanac` knows fixed-date
//! festivals and computes the 24 solar terms for 2001–2100.

use chrono::{Datelike, NaiveDate, Weekday};

pub trait Almanac: Send + Sync {
    /// Full lunar date text (e.g. "乙巳年九月廿八"), if known.
    fn lunar_date(&self, date: NaiveDate) -> Option<String>;

    /// Festival falling on this date, if any.
    fn festival(&self, date: NaiveDate) -> Option<String>;

    /// Solar term starting on this date, if any.
    fn solar_term(&self, date: NaiveDate) -> Option<String>;
}

/// Chinese weekday name.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

const FIXED_FESTIVALS: &[(u32, u32, &str)] = &[
    (1, 1, "元旦"),
    (2, 14, "情人节"),
    (3, 8, "妇女节"),
    (3, 12, "植树节"),
    (5, 1, "劳动节"),
    (5, 4, "青年节"),
    (6, 1, "儿童节"),
    (8, 1, "建军节"),
    (9, 10, "教师节"),
    (10, 1, "国庆节"),
    (12, 25, "圣诞节"),
];

/// (month, name, 21st-century constant C). Two terms per month, in order.
const SOLAR_TERMS: &[(u32, &str, f64)] = &[
    (1, "小寒", 5.4055),
    (1, "大寒", 20.12),
    (2, "立春", 3.87),
    (2, "雨水", 18.73),
    (3, "惊蛰", 5.63),
    (3, "春分", 20.646),
    (4, "清明", 4.81),
    (4, "谷雨", 20.1),
    (5, "立夏", 5.52),
    (5, "小满", 21.04),
    (6, "芒种", 5.678),
    (6, "夏至", 21.37),
    (7, "小暑", 7.108),
    (7, "大暑", 22.83),
    (8, "立秋", 7.5),
    (8, "处暑", 23.13),
    (9, "白露", 7.646),
    (9, "秋分", 23.042),
    (10, "寒露", 8.318),
    (10, "霜降", 23.438),
    (11, "立冬", 7.438),
    (11, "小雪", 22.36),
    (12, "大雪", 7.18),
    (12, "冬至", 21.94),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct GregorianAlmanac;

impl GregorianAlmanac {
    /// Day of month of a solar term: floor(Y·0.2422 + C) − L, where Y is the
    /// two-digit year and L counts leap days so far (January/February terms
    /// use the previous year's count).
    fn term_day(year: i32, month: u32, c: f64) -> Option<u32> {
        if !(2001..=2100).contains(&year) {
            return None;
        }
        let y = (year % 100) as f64;
        let y = if year == 2100 { 100.0 } else { y };
        let leaps = if month <= 2 {
            ((y - 1.0) / 4.0).floor()
        } else {
            (y / 4.0).floor()
        };
        let day = (y * 0.2422 + c).floor() - leaps;
        (day >= 1.0).then_some(day as u32)
    }
}

impl Almanac for GregorianAlmanac {
    fn lunar_date(&self, _date: NaiveDate) -> Option<String> {
        None
    }

    fn festival(&self, date: NaiveDate) -> Option<String> {
        FIXED_FESTIVALS
            .iter()
            .find(|(m, d, _)| *m == date.month() && *d == date.day())
            .map(|(_, _, name)| name.to_string())
    }

    fn solar_term(&self, date: NaiveDate) -> Option<String> {
        SOLAR_TERMS
            .iter()
            .filter(|(m, _, _)| *m == date.month())
            .find(|(m, _, c)| Self::term_day(date.year(), *m, *c) == Some(date.day()))
            .map(|(_, name, _)| name.to_string())
    }
}
