//! Static reference data: city table, weather codes, calendar.

pub mod almanac;
pub mod cities;
pub mod codes;

pub use almanac::{weekday_name, Almanac, GregorianAlmanac};
pub use cities::{City, CityTable, Province};
pub use codes::{weather_info, UvLevel, WeatherInfo};
