//! Advisory generator.
//!
//! Short clothing/activity tips from weather parameters. Pure functions:
//! same inputs, same text. Bands follow the usual comfort categories
//! (feels-like temperature, WHO UV index, Beaufort 6 for wind).

use crate::reference::codes::{is_fog, is_rain, is_snow, UvLevel};
use crate::types::{CurrentConditions, DayForecast};

const COMFORTABLE: &str = "天气舒适，适合出行";
const SEPARATOR: &str = "；";

/// Beaufort 6, "strong breeze".
const STRONG_WIND_KMH: f64 = 39.0;
const RAIN_LIKELY_PCT: f64 = 50.0;
const HUMID_PCT: f64 = 85.0;
const OVERCAST_PCT: f64 = 90.0;
const WIDE_RANGE_C: f64 = 10.0;

fn clothing(temp: f64) -> &'static str {
    match temp {
        t if t < 0.0 => "天寒地冻，穿羽绒服并注意保暖",
        t if t < 10.0 => "天气寒冷，建议穿厚外套",
        t if t < 18.0 => "早晚偏凉，建议穿薄外套或长袖",
        t if t < 26.0 => "温度适宜，短袖或薄长袖即可",
        t if t < 32.0 => "天气较热，穿轻薄透气衣物",
        _ => "天气炎热，注意防暑降温",
    }
}

fn precipitation(code: Option<i32>, probability: Option<f64>) -> Option<&'static str> {
    match code {
        Some(c) if is_snow(c) => Some("有降雪，路面湿滑注意出行安全"),
        Some(c) if is_rain(c) => Some("有降水，出门记得带伞"),
        _ if probability.is_some_and(|p| p >= RAIN_LIKELY_PCT) => Some("降水概率较高，建议带伞"),
        _ => None,
    }
}

fn sun(uv: Option<f64>) -> Option<&'static str> {
    match UvLevel::from_index(uv?) {
        UvLevel::High => Some("紫外线较强，注意防晒"),
        UvLevel::VeryHigh | UvLevel::Extreme => Some("紫外线很强，避免长时间暴晒"),
        _ => None,
    }
}

fn wind(speed: Option<f64>) -> Option<&'static str> {
    speed
        .filter(|w| *w >= STRONG_WIND_KMH)
        .map(|_| "风力较大，注意防风")
}

fn visibility(code: Option<i32>) -> Option<&'static str> {
    code.filter(|c| is_fog(*c)).map(|_| "有雾，驾车注意安全")
}

fn join(tips: Vec<&'static str>) -> String {
    if tips.is_empty() {
        COMFORTABLE.to_string()
    } else {
        tips.join(SEPARATOR)
    }
}

/// Tip for the current conditions. `precipitation_probability` is today's
/// maximum from the daily forecast.
pub fn today(current: &CurrentConditions, precipitation_probability: Option<f64>) -> String {
    let mut tips = Vec::new();

    if let Some(t) = current.apparent_temperature.or(current.temperature) {
        tips.push(clothing(t));
    }

    let wet = precipitation(current.weather_code, precipitation_probability);
    tips.extend(wet);
    tips.extend(sun(current.uv_index));
    tips.extend(wind(current.wind_speed));
    tips.extend(visibility(current.weather_code));

    if wet.is_none() {
        if current.humidity.is_some_and(|h| h >= HUMID_PCT) {
            tips.push("空气潮湿，体感闷热");
        } else if current.cloud_cover.is_some_and(|c| c >= OVERCAST_PCT) {
            tips.push("云量较多，天色阴沉");
        }
    }

    join(tips)
}

/// Tip for one forecast day.
pub fn daily(day: &DayForecast) -> String {
    let mut tips = Vec::new();

    let mid = match (day.temp_max, day.temp_min) {
        (Some(hi), Some(lo)) => Some((hi + lo) / 2.0),
        (hi, lo) => hi.or(lo),
    };
    if let Some(t) = mid {
        tips.push(clothing(t));
    }
    if let (Some(hi), Some(lo)) = (day.temp_max, day.temp_min) {
        if hi - lo >= WIDE_RANGE_C {
            tips.push("昼夜温差大，注意增减衣物");
        }
    }

    tips.extend(precipitation(day.weather_code, day.precipitation_probability));
    tips.extend(sun(day.uv_max));
    tips.extend(wind(day.wind_max));
    tips.extend(visibility(day.weather_code));

    join(tips)
}
