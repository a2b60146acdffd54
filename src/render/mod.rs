//! Renderer.
//!
//! Pure mapping from fetched data and view state to display fields. The
//! renderer never reads session state on its own; callers pass exactly
//! what should be painted. Output goes to a `DisplaySink`, addressed by
//! the fixed field ids in [`fields`].

pub mod format;
pub mod terminal;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

use crate::advice;
use crate::engine::view::ViewState;
use crate::error::ProviderError;
use crate::reference::{weather_info, weekday_name, Almanac, CityTable, UvLevel};
use crate::types::{DailyForecast, DayForecast, SearchCandidate, WeatherSnapshot};
use format::{clock, integer, kilometres, one_decimal, PLACEHOLDER};

pub use terminal::{MemorySink, TerminalSink};

/// Field ids written by the renderer.
pub mod fields {
    pub const CITY_NAME: &str = "city-name";
    pub const CURRENT_TEMP: &str = "current-temp";
    pub const TEMP_UNIT: &str = "temp-unit";
    pub const HIGH_TEMP: &str = "high-temp";
    pub const LOW_TEMP: &str = "low-temp";
    pub const WEATHER_ICON: &str = "weather-icon";
    pub const WEATHER_DESC: &str = "weather-desc";
    pub const HUMIDITY: &str = "humidity-val";
    pub const WIND: &str = "wind-val";
    pub const FEELS_LIKE: &str = "feelslike-val";
    pub const UV_VALUE: &str = "uv-val";
    pub const UV_LEVEL: &str = "uv-desc";
    pub const PRECIP: &str = "precip-prob";
    pub const CLOUD: &str = "cloud-val";
    pub const PRESSURE: &str = "pressure-val";
    pub const VISIBILITY: &str = "visibility-val";
    pub const DEWPOINT: &str = "dewpoint-val";
    pub const ADVICE: &str = "today-advice-text";
    pub const SOLAR_DATE: &str = "solar-date";
    pub const LUNAR_DATE: &str = "lunar-date";
    pub const FESTIVAL: &str = "festival-today";
    pub const STATUS: &str = "update-timestamp";
    pub const CLOCK: &str = "time-text";
    pub const SEARCH_INPUT: &str = "search-input";
    pub const PROVINCES: &str = "province-select";
    pub const CITIES: &str = "city-select";
    pub const SUGGESTIONS: &str = "search-suggestions";
}

/// Everything the renderer can write to.
pub trait DisplaySink {
    fn set_text(&mut self, field: &str, value: &str);

    fn set_list(&mut self, field: &str, items: &[String]);

    fn set_visible(&mut self, field: &str, visible: bool);

    fn set_cards(&mut self, cards: &[ForecastCard]);

    /// End of one batch of updates.
    fn present(&mut self) {}
}

/// One of the upcoming-days cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    /// Day offset from today; clicking selects `Forecast(index)`.
    pub index: usize,
    pub weekday: String,
    /// "M/D"
    pub date: String,
    pub icon: String,
    pub high: String,
    pub low: String,
    pub precipitation: String,
    pub advice: String,
    pub active: bool,
}

/// Cards cover tomorrow through five days out.
pub const CARD_DAYS: std::ops::RangeInclusive<usize> = 1..=5;

const UNIT: &str = "°C";
const UNIT_MAX: &str = "°C (最高)";

fn uv_fields(uv: Option<f64>) -> (String, String) {
    match uv {
        Some(v) => (format!("{v:.1}"), UvLevel::from_index(v).label().to_string()),
        None => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
    }
}

/// Paint current readings. High/low and precipitation come from today's
/// daily entry.
pub fn realtime<S: DisplaySink + ?Sized>(sink: &mut S, snapshot: &WeatherSnapshot) {
    let cur = &snapshot.current;
    let today = snapshot.daily.today();
    let info = weather_info(cur.weather_code);
    let (uv_val, uv_level) = uv_fields(cur.uv_index);
    let precip = today.and_then(|d| d.precipitation_probability);

    sink.set_text(fields::CURRENT_TEMP, &one_decimal(cur.temperature));
    sink.set_text(fields::TEMP_UNIT, UNIT);
    sink.set_text(fields::HIGH_TEMP, &integer(today.and_then(|d| d.temp_max)));
    sink.set_text(fields::LOW_TEMP, &integer(today.and_then(|d| d.temp_min)));
    sink.set_text(fields::WEATHER_ICON, info.icon);
    sink.set_text(fields::WEATHER_DESC, info.desc);
    sink.set_text(fields::HUMIDITY, &integer(cur.humidity));
    sink.set_text(fields::WIND, &integer(cur.wind_speed));
    sink.set_text(fields::FEELS_LIKE, &one_decimal(cur.apparent_temperature));
    sink.set_text(fields::UV_VALUE, &uv_val);
    sink.set_text(fields::UV_LEVEL, &uv_level);
    sink.set_text(fields::PRECIP, &integer(precip));
    sink.set_text(fields::CLOUD, &integer(cur.cloud_cover));
    sink.set_text(fields::PRESSURE, &integer(cur.pressure));
    sink.set_text(fields::VISIBILITY, &kilometres(cur.visibility));
    sink.set_text(fields::DEWPOINT, &one_decimal(cur.dewpoint));
    sink.set_text(fields::ADVICE, &advice::today(cur, precip));
}

/// Paint one forecast day. Fields a daily summary cannot supply show the
/// placeholder instead of stale realtime values.
pub fn forecast_day<S: DisplaySink + ?Sized>(sink: &mut S, day: &DayForecast) {
    let info = weather_info(day.weather_code);
    let (uv_val, uv_level) = uv_fields(day.uv_max);
    let max = integer(day.temp_max);

    sink.set_text(fields::CURRENT_TEMP, &max);
    sink.set_text(fields::TEMP_UNIT, UNIT_MAX);
    sink.set_text(fields::HIGH_TEMP, &max);
    sink.set_text(fields::LOW_TEMP, &integer(day.temp_min));
    sink.set_text(fields::WEATHER_ICON, info.icon);
    sink.set_text(fields::WEATHER_DESC, info.desc);
    sink.set_text(fields::WIND, &integer(day.wind_max));
    sink.set_text(fields::UV_VALUE, &uv_val);
    sink.set_text(fields::UV_LEVEL, &uv_level);
    sink.set_text(fields::PRECIP, &integer(day.precipitation_probability));
    for field in [
        fields::HUMIDITY,
        fields::FEELS_LIKE,
        fields::CLOUD,
        fields::PRESSURE,
        fields::VISIBILITY,
        fields::DEWPOINT,
    ] {
        sink.set_text(field, PLACEHOLDER);
    }
    sink.set_text(fields::ADVICE, &format!("📆 {}", advice::daily(day)));
}

/// Solar date, lunar date and festival line.
pub fn header<S: DisplaySink + ?Sized>(sink: &mut S, almanac: &dyn Almanac, date: NaiveDate) {
    let solar = format!(
        "{}年{}月{}日 {}",
        date.year(),
        date.month(),
        date.day(),
        weekday_name(date.weekday())
    );
    let festival = match (almanac.festival(date), almanac.solar_term(date)) {
        (Some(f), Some(t)) => format!("{f} · {t}"),
        (Some(f), None) => f,
        (None, Some(t)) => t,
        (None, None) => String::new(),
    };

    sink.set_text(fields::SOLAR_DATE, &solar);
    sink.set_text(fields::LUNAR_DATE, &almanac.lunar_date(date).unwrap_or_default());
    sink.set_text(fields::FESTIVAL, &festival);
}

pub fn build_cards(daily: &DailyForecast, view: ViewState) -> Vec<ForecastCard> {
    CARD_DAYS
        .filter_map(|i| daily.day(i).map(|day| (i, day)))
        .map(|(i, day)| {
            let precipitation = match day.precipitation_probability {
                Some(p) => format!("{}%", p.round() as i64),
                None => format!("{PLACEHOLDER}%"),
            };
            ForecastCard {
                index: i,
                weekday: weekday_name(day.date.weekday()).to_string(),
                date: format!("{}/{}", day.date.month(), day.date.day()),
                icon: weather_info(day.weather_code).icon.to_string(),
                high: format!("{}°", integer(day.temp_max)),
                low: format!("{}°", integer(day.temp_min)),
                precipitation,
                advice: advice::daily(day),
                active: view == ViewState::Forecast(i),
            }
        })
        .collect()
}

pub fn cards<S: DisplaySink + ?Sized>(sink: &mut S, daily: &DailyForecast, view: ViewState) {
    sink.set_cards(&build_cards(daily, view));
}

pub fn status_updated<S, Tz>(sink: &mut S, at: &DateTime<Tz>)
where
    S: DisplaySink + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    sink.set_text(fields::STATUS, &format!("✅ 更新于 {}", clock(at)));
}

pub fn status_forecast<S, Tz>(sink: &mut S, at: &DateTime<Tz>)
where
    S: DisplaySink + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    sink.set_text(fields::STATUS, &format!("📌 预报 · 更新于 {}", clock(at)));
}

pub fn status_failed<S: DisplaySink + ?Sized>(sink: &mut S, error: &ProviderError) {
    sink.set_text(fields::STATUS, &format!("⚠️ 更新失败，{error}"));
}

pub fn time_text<S, Tz>(sink: &mut S, at: &DateTime<Tz>)
where
    S: DisplaySink + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    sink.set_text(fields::CLOCK, &clock(at));
}

/// Suggestion list; hidden when empty.
pub fn suggestions<S: DisplaySink + ?Sized>(sink: &mut S, results: &[SearchCandidate]) {
    if results.is_empty() {
        hide_suggestions(sink);
        return;
    }
    let names: Vec<String> = results.iter().map(|r| r.short_name.clone()).collect();
    sink.set_list(fields::SUGGESTIONS, &names);
    sink.set_visible(fields::SUGGESTIONS, true);
}

pub fn hide_suggestions<S: DisplaySink + ?Sized>(sink: &mut S) {
    sink.set_visible(fields::SUGGESTIONS, false);
}

/// Province list plus the city list of `province`.
pub fn picker<S: DisplaySink + ?Sized>(sink: &mut S, table: &CityTable, province: &str) {
    sink.set_list(fields::PROVINCES, &table.province_names());
    sink.set_list(fields::CITIES, &table.city_names(province).unwrap_or_default());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::GregorianAlmanac;

    #[test]
    fn test_realtime_fields() {
        let mut sink = MemorySink::default();
        realtime(&mut sink, &WeatherSnapshot::sample(6));

        assert_eq!(sink.text(fields::CURRENT_TEMP), Some("18.3"));
        assert_eq!(sink.text(fields::TEMP_UNIT), Some("°C"));
        assert_eq!(sink.text(fields::HIGH_TEMP), Some("20"));
        assert_eq!(sink.text(fields::LOW_TEMP), Some("10"));
        assert_eq!(sink.text(fields::WEATHER_DESC), Some("多云"));
        assert_eq!(sink.text(fields::HUMIDITY), Some("55"));
        assert_eq!(sink.text(fields::WIND), Some("10"));
        assert_eq!(sink.text(fields::FEELS_LIKE), Some("17.0"));
        assert_eq!(sink.text(fields::UV_LEVEL), Some("中等"));
        assert_eq!(sink.text(fields::PRECIP), Some("0"));
        assert_eq!(sink.text(fields::PRESSURE), Some("1013"));
        assert_eq!(sink.text(fields::VISIBILITY), Some("24.1"));
        assert_eq!(sink.text(fields::CLOUD), Some("40"));
    }

    #[test]
    fn test_realtime_missing_values_use_placeholder() {
        let mut snap = WeatherSnapshot::sample(0);
        snap.current = Default::default();
        let mut sink = MemorySink::default();
        realtime(&mut sink, &snap);

        assert_eq!(sink.text(fields::CURRENT_TEMP), Some("--"));
        assert_eq!(sink.text(fields::HIGH_TEMP), Some("--"));
        assert_eq!(sink.text(fields::UV_LEVEL), Some("--"));
        assert_eq!(sink.text(fields::WEATHER_DESC), Some("未知"));
    }

    #[test]
    fn test_forecast_day_blanks_unavailable_fields() {
        let snap = WeatherSnapshot::sample(6);
        let mut sink = MemorySink::default();
        realtime(&mut sink, &snap);
        forecast_day(&mut sink, snap.daily.day(3).unwrap());

        assert_eq!(sink.text(fields::CURRENT_TEMP), Some("23"));
        assert_eq!(sink.text(fields::HIGH_TEMP), Some("23"));
        assert_eq!(sink.text(fields::LOW_TEMP), Some("13"));
        assert_eq!(sink.text(fields::TEMP_UNIT), Some("°C (最高)"));
        assert_eq!(sink.text(fields::PRECIP), Some("30"));
        for field in [
            fields::HUMIDITY,
            fields::FEELS_LIKE,
            fields::CLOUD,
            fields::PRESSURE,
            fields::VISIBILITY,
            fields::DEWPOINT,
        ] {
            assert_eq!(sink.text(field), Some(PLACEHOLDER), "{field}");
        }
        assert!(sink.text(fields::ADVICE).unwrap().starts_with("📆 "));
    }

    #[test]
    fn test_header_solar_term_and_festival() {
        let mut sink = MemorySink::default();
        let date = NaiveDate::from_ymd_opt(2026, 10, 23).unwrap();
        header(&mut sink, &GregorianAlmanac, date);
        assert_eq!(sink.text(fields::SOLAR_DATE), Some("2026年10月23日 星期五"));
        assert_eq!(sink.text(fields::FESTIVAL), Some("霜降"));
        assert_eq!(sink.text(fields::LUNAR_DATE), Some(""));
    }

    #[test]
    fn test_cards_cover_days_one_to_five() {
        let snap = WeatherSnapshot::sample(7);
        let cards = build_cards(&snap.daily, ViewState::Forecast(2));
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0].index, 1);
        assert_eq!(cards[0].date, "10/20");
        assert_eq!(cards[0].weekday, "星期二");
        assert_eq!(cards[0].high, "21°");
        assert_eq!(cards[0].precipitation, "10%");
        assert!(cards[1].active);
        assert_eq!(cards.iter().filter(|c| c.active).count(), 1);
    }

    #[test]
    fn test_cards_short_forecast() {
        let snap = WeatherSnapshot::sample(3);
        let cards = build_cards(&snap.daily, ViewState::Realtime);
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| !c.active));
    }

    #[test]
    fn test_suggestions_hide_when_empty() {
        let mut sink = MemorySink::default();
        suggestions(&mut sink, &[]);
        assert_eq!(sink.is_visible(fields::SUGGESTIONS), Some(false));
    }

    #[test]
    fn test_status_failed_message() {
        let mut sink = MemorySink::default();
        let err = ProviderError::Status { provider: "open-meteo".into(), status: 502 };
        status_failed(&mut sink, &err);
        assert_eq!(
            sink.text(fields::STATUS),
            Some("⚠️ 更新失败，open-meteo returned HTTP 502")
        );
    }
}
