//! WMO weather-code and UV-index lookup tables.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Icon and description for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherInfo {
    pub icon: &'static str,
    pub desc: &'static str,
}

const UNKNOWN: WeatherInfo = WeatherInfo { icon: "❓", desc: "未知" };

/// Map a WMO code to an icon and a Chinese description. `None` and
/// unlisted codes map to the unknown entry.
pub fn weather_info(code: Option<i32>) -> WeatherInfo {
    let Some(code) = code else {
        return UNKNOWN;
    };
    let (icon, desc) = match code {
        0 => ("☀️", "晴"),
        1 => ("🌤️", "晴间多云"),
        2 => ("⛅", "多云"),
        3 => ("☁️", "阴"),
        45 => ("🌫️", "雾"),
        48 => ("🌫️", "冻雾"),
        51 => ("🌦️", "小毛毛雨"),
        53 => ("🌦️", "毛毛雨"),
        55 => ("🌧️", "大毛毛雨"),
        56 | 57 => ("🌧️", "冻毛毛雨"),
        61 => ("🌦️", "小雨"),
        63 => ("🌧️", "中雨"),
        65 => ("🌧️", "大雨"),
        66 | 67 => ("🌧️", "冻雨"),
        71 => ("🌨️", "小雪"),
        73 => ("🌨️", "中雪"),
        75 => ("❄️", "大雪"),
        77 => ("🌨️", "雪粒"),
        80 => ("🌦️", "阵雨"),
        81 => ("🌧️", "强阵雨"),
        82 => ("⛈️", "暴雨"),
        85 => ("🌨️", "阵雪"),
        86 => ("❄️", "强阵雪"),
        95 => ("⛈️", "雷暴"),
        96 | 99 => ("⛈️", "雷暴伴冰雹"),
        _ => return UNKNOWN,
    };
    WeatherInfo { icon, desc }
}

/// Drizzle, rain, showers and thunderstorms.
pub fn is_rain(code: i32) -> bool {
    matches!(code, 51..=67 | 80..=82 | 95..=99)
}

pub fn is_snow(code: i32) -> bool {
    matches!(code, 71..=77 | 85 | 86)
}

pub fn is_fog(code: i32) -> bool {
    matches!(code, 45 | 48)
}

/// WHO UV index category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    pub fn from_index(uv: f64) -> Self {
        match uv {
            u if u < 3.0 => Self::Low,
            u if u < 6.0 => Self::Moderate,
            u if u < 8.0 => Self::High,
            u if u < 11.0 => Self::VeryHigh,
            _ => Self::Extreme,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "低",
            Self::Moderate => "中等",
            Self::High => "高",
            Self::VeryHigh => "很高",
            Self::Extreme => "极高",
        }
    }
}
