//! End-to-end dashboard scenarios over the real adapters and a scripted
//! network.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use weatherdash::engine::{Dashboard, Event, Services, Settings, ViewState};
use weatherdash::location::{IpGeolocator, LocationResolver, NoDevice};
use weatherdash::providers::{CitySearcher, Nominatim, OpenMeteo};
use weatherdash::reference::{CityTable, GregorianAlmanac};
use weatherdash::render::{fields, MemorySink};
use weatherdash::types::Location;

use crate::mock_source::{ipapi_shanghai, nominatim_paris, open_meteo_payload, ScriptedSource};

struct Harness {
    dash: Dashboard<MemorySink>,
    rx: UnboundedReceiver<Event>,
    net: ScriptedSource,
}

impl Harness {
    fn new(net: ScriptedSource) -> Self {
        let source = Arc::new(net.clone());
        let services = Services {
            weather: Arc::new(OpenMeteo::new(source.clone(), "https://api.open-meteo.test/v1/forecast")),
            searcher: Arc::new(CitySearcher::new(
                Box::new(Nominatim::new("https://nominatim.test/search", 8)),
                source,
            )),
            table: CityTable::builtin(),
            almanac: Box::new(GregorianAlmanac),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let dash = Dashboard::new(
            MemorySink::default(),
            services,
            Settings::default(),
            Location::new("济南市", 36.6512, 117.1201, "山东"),
            tx,
        );
        Self { dash, rx, net }
    }

    fn resolver(&self) -> Arc<LocationResolver> {
        Arc::new(LocationResolver::new(
            Box::new(NoDevice),
            IpGeolocator::from_names(
                &["ipapi".to_string(), "ipinfo".to_string()],
                Arc::new(self.net.clone()),
            ),
            CityTable::builtin(),
        ))
    }

    async fn pump(&mut self) {
        let event = self.rx.recv().await.expect("event channel closed");
        self.dash.handle(event);
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.dash.sink().text(field)
    }
}

#[tokio::test]
async fn test_default_city_when_every_source_fails() {
    let net = ScriptedSource::new();
    net.fail("ipapi", 429).fail("ipinfo", 500);
    net.respond("open-meteo", open_meteo_payload(7));
    let mut h = Harness::new(net);

    let resolver = h.resolver();
    h.dash.start(Some(resolver));
    h.pump().await; // location
    h.pump().await; // weather

    assert_eq!(h.text(fields::CITY_NAME), Some("济南市"));
    let urls = h.net.urls("open-meteo");
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("latitude=36.6512&longitude=117.1201"));
    assert!(urls[0].contains("timezone=auto&forecast_days=7"));
    assert_eq!(h.net.calls("ipapi"), 1);
    assert_eq!(h.net.calls("ipinfo"), 1);
}

#[tokio::test]
async fn test_ip_location_snaps_to_table() {
    let net = ScriptedSource::new();
    net.respond("ipapi", ipapi_shanghai());
    net.respond("open-meteo", open_meteo_payload(7));
    let mut h = Harness::new(net);

    let resolver = h.resolver();
    h.dash.start(Some(resolver));
    h.pump().await;
    h.pump().await;

    assert_eq!(h.text(fields::CITY_NAME), Some("上海市"));
    assert_eq!(h.dash.session().location.province, "上海");
    assert!(h.net.urls("open-meteo")[0].contains("latitude=31.2304&longitude=121.4737"));
    assert_eq!(h.net.calls("ipinfo"), 0);
}

#[tokio::test]
async fn test_realtime_then_forecast_rendering() {
    let net = ScriptedSource::new();
    net.respond("open-meteo", open_meteo_payload(7));
    let mut h = Harness::new(net);

    h.dash.start(None);
    h.pump().await;

    assert_eq!(h.text(fields::CURRENT_TEMP), Some("16.4"));
    assert_eq!(h.text(fields::HIGH_TEMP), Some("19"));
    assert_eq!(h.text(fields::WEATHER_DESC), Some("阴"));
    assert_eq!(h.text(fields::VISIBILITY), Some("18.0"));
    assert!(h.text(fields::ADVICE).unwrap().contains("云量较多"));
    assert_eq!(h.dash.sink().cards().len(), 5);

    h.dash.handle(Event::CardClicked(5));
    assert_eq!(h.dash.session().view, ViewState::Forecast(5));
    assert_eq!(h.text(fields::CURRENT_TEMP), Some("24"));
    assert_eq!(h.text(fields::LOW_TEMP), Some("14"));
    assert_eq!(h.text(fields::HUMIDITY), Some("--"));
    assert_eq!(h.text(fields::SOLAR_DATE), Some("2026年10月24日 星期六"));
    assert!(h.text(fields::ADVICE).unwrap().starts_with("📆 "));
    // Cached: no extra request.
    assert_eq!(h.net.calls("open-meteo"), 1);

    // A shorter refresh drops the selected day.
    h.net.respond("open-meteo", open_meteo_payload(3));
    h.dash.handle(Event::Refresh);
    h.pump().await;
    assert_eq!(h.dash.session().view, ViewState::Realtime);
    assert_eq!(h.text(fields::TEMP_UNIT), Some("°C"));
    assert_eq!(h.dash.sink().cards().len(), 2);
}

#[tokio::test]
async fn test_weather_outage_reported_in_status() {
    let net = ScriptedSource::new();
    net.fail("open-meteo", 502);
    let mut h = Harness::new(net);

    h.dash.start(None);
    h.pump().await;

    assert_eq!(
        h.text(fields::STATUS),
        Some("⚠️ 更新失败，open-meteo returned HTTP 502")
    );
}

#[tokio::test(start_paused = true)]
async fn test_search_and_pick() {
    let net = ScriptedSource::new();
    net.respond("nominatim", nominatim_paris());
    net.respond("open-meteo", open_meteo_payload(7));
    let mut h = Harness::new(net);

    for text in ["P", "Pa", "Par", "Pari", "Paris"] {
        h.dash.handle(Event::SearchInput(text.to_string()));
    }
    h.pump().await; // debounce fired
    h.pump().await; // results

    assert_eq!(h.net.calls("nominatim"), 1);
    assert!(h.net.urls("nominatim")[0].contains("q=Paris&format=json&limit=8&addressdetails=1&featureType=city"));
    assert_eq!(
        h.dash.sink().list(fields::SUGGESTIONS).unwrap(),
        ["Paris, FR".to_string(), "Paris, US".to_string()]
    );

    h.dash.handle(Event::PickSuggestion(0));
    h.pump().await;

    assert_eq!(h.text(fields::CITY_NAME), Some("Paris, FR"));
    assert_eq!(h.text(fields::SEARCH_INPUT), Some("Paris, FR"));
    assert_eq!(h.dash.sink().is_visible(fields::SUGGESTIONS), Some(false));
    assert!(h.net.urls("open-meteo")[0].contains("latitude=48.8588897"));
}

#[tokio::test]
async fn test_submit_without_cache_queries_and_applies_top() {
    let net = ScriptedSource::new();
    net.respond("nominatim", nominatim_paris());
    net.respond("open-meteo", open_meteo_payload(7));
    let mut h = Harness::new(net);

    h.dash.handle(Event::SubmitSearch("  Paris ".to_string()));
    h.pump().await; // results
    h.pump().await; // weather

    assert_eq!(h.net.calls("nominatim"), 1);
    assert_eq!(h.dash.session().location.name, "Paris, FR");
    assert!(h.text(fields::STATUS).unwrap().starts_with("✅ 更新于 "));
}
