//! Dashboard controller.
//!
//! Owns the session and reacts to events: console commands, timer ticks
//! and provider completions. All state mutation happens in `handle`, on
//! the event loop; network work runs in spawned tasks that report back
//! through the event channel. Every batch of sink updates ends with one
//! `present`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::flight::{FlightToken, SingleFlight};
use super::search::{cached_answer, searchable, Debouncer};
use super::view::{CardAction, ViewState};
use crate::config::UiConfig;
use crate::error::ProviderError;
use crate::location::LocationResolver;
use crate::providers::{CitySearcher, WeatherGateway};
use crate::reference::{Almanac, CityTable};
use crate::render::{self, fields, DisplaySink};
use crate::types::{Location, SearchCandidate, WeatherSnapshot};

/// Why a search was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchIntent {
    /// Debounced typing: list suggestions.
    Suggest,
    /// Enter/confirm: apply the top result.
    Submit,
}

#[derive(Debug)]
pub enum Event {
    /// Periodic timer.
    Tick,
    SelectProvince(String),
    SelectCity { province: String, city: String },
    /// Forecast card by day offset.
    CardClicked(usize),
    /// Search box text changed.
    SearchInput(String),
    /// Quiet period after typing elapsed for this text.
    SearchDue(String),
    SubmitSearch(String),
    /// Suggestion by position, 0-based.
    PickSuggestion(usize),
    Refresh,
    LocationResolved {
        token: FlightToken,
        location: Option<Location>,
    },
    WeatherFetched {
        token: FlightToken,
        result: Result<WeatherSnapshot, ProviderError>,
    },
    SearchFetched {
        token: FlightToken,
        intent: SearchIntent,
        result: Result<Vec<SearchCandidate>, ProviderError>,
    },
}

/// Everything the dashboard knows about the current screen.
#[derive(Debug, Clone)]
pub struct Session {
    pub location: Location,
    pub view: ViewState,
    /// Last successful fetch.
    pub snapshot: Option<WeatherSnapshot>,
    pub search_input: String,
    pub search_results: Vec<SearchCandidate>,
}

impl Session {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            view: ViewState::Realtime,
            snapshot: None,
            search_input: String::new(),
            search_results: Vec::new(),
        }
    }
}

/// External collaborators.
pub struct Services {
    pub weather: Arc<dyn WeatherGateway>,
    pub searcher: Arc<CitySearcher>,
    pub table: CityTable,
    pub almanac: Box<dyn Almanac>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub debounce: Duration,
    pub min_query_chars: usize,
}

impl From<&UiConfig> for Settings {
    fn from(ui: &UiConfig) -> Self {
        Self {
            debounce: Duration::from_millis(ui.debounce_ms),
            min_query_chars: ui.min_query_chars,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

pub struct Dashboard<S: DisplaySink> {
    session: Session,
    sink: S,
    services: Services,
    settings: Settings,
    events: UnboundedSender<Event>,
    debouncer: Debouncer,
    location_flight: SingleFlight,
    weather_flight: SingleFlight,
    search_flight: SingleFlight,
}

impl<S: DisplaySink> Dashboard<S> {
    pub fn new(
        sink: S,
        services: Services,
        settings: Settings,
        default_location: Location,
        events: UnboundedSender<Event>,
    ) -> Self {
        Self {
            session: Session::new(default_location),
            sink,
            services,
            debouncer: Debouncer::new(settings.debounce),
            settings,
            events,
            location_flight: SingleFlight::new("location"),
            weather_flight: SingleFlight::new("weather"),
            search_flight: SingleFlight::new("search"),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Paint the default city and kick off startup. With a resolver the
    /// first fetch waits for resolution; without one it starts now.
    pub fn start(&mut self, resolver: Option<Arc<LocationResolver>>) {
        let now = Local::now();
        self.sink.set_text(fields::CITY_NAME, &self.session.location.name);
        self.sink.set_text(fields::SEARCH_INPUT, "");
        render::picker(&mut self.sink, &self.services.table, &self.session.location.province);
        render::hide_suggestions(&mut self.sink);
        render::header(&mut self.sink, self.services.almanac.as_ref(), now.date_naive());
        render::time_text(&mut self.sink, &now);

        match resolver {
            Some(resolver) => {
                let tx = self.events.clone();
                self.location_flight.launch(move |token| async move {
                    let location = resolver.resolve().await;
                    let _ = tx.send(Event::LocationResolved { token, location });
                });
            }
            None => self.fetch_weather(),
        }
        self.sink.present();
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Tick => self.on_tick(),
            Event::SelectProvince(province) => self.on_province(&province),
            Event::SelectCity { province, city } => self.on_city(&province, &city),
            Event::CardClicked(index) => self.on_card(index),
            Event::SearchInput(text) => self.on_search_input(text),
            Event::SearchDue(query) => self.on_search_due(query),
            Event::SubmitSearch(text) => self.on_submit(text),
            Event::PickSuggestion(index) => self.on_pick(index),
            Event::Refresh => self.fetch_weather(),
            Event::LocationResolved { token, location } => self.on_location_resolved(token, location),
            Event::WeatherFetched { token, result } => self.on_weather(token, result),
            Event::SearchFetched { token, intent, result } => self.on_search_results(token, intent, result),
        }
        self.sink.present();
    }

    // -- Location --------------------------------------------------------

    fn set_location(&mut self, location: Location) {
        // A manual choice beats a late startup resolution.
        self.location_flight.invalidate();
        info!(location = %location, "Location changed");

        self.sink.set_text(fields::CITY_NAME, &location.name);
        if !location.province.is_empty() {
            render::picker(&mut self.sink, &self.services.table, &location.province);
        }
        self.session.location = location;
        self.session.view.on_location_changed();
        self.fetch_weather();
    }

    fn on_province(&mut self, province: &str) {
        match self.services.table.first_city(province) {
            Some(location) => self.set_location(location),
            None => debug!(province, "Unknown province ignored"),
        }
    }

    fn on_city(&mut self, province: &str, city: &str) {
        match self.services.table.lookup(province, city) {
            Some(location) => self.set_location(location),
            None => debug!(province, city, "Unknown city ignored"),
        }
    }

    fn on_location_resolved(&mut self, token: FlightToken, location: Option<Location>) {
        if !self.location_flight.complete(token) {
            return;
        }
        match location {
            Some(location) => self.set_location(location),
            None => self.fetch_weather(),
        }
    }

    // -- Weather ---------------------------------------------------------

    fn fetch_weather(&mut self) {
        let Location { lat, lon, .. } = self.session.location;
        let gateway = self.services.weather.clone();
        let tx = self.events.clone();
        let token = self.weather_flight.launch(move |token| async move {
            let result = gateway.fetch(lat, lon).await;
            let _ = tx.send(Event::WeatherFetched { token, result });
        });
        debug!(?token, lat, lon, "Weather fetch launched");
    }

    fn on_tick(&mut self) {
        let now: DateTime<Local> = Local::now();
        render::time_text(&mut self.sink, &now);
        if self.session.view.refreshes_on_tick() {
            render::header(&mut self.sink, self.services.almanac.as_ref(), now.date_naive());
            self.fetch_weather();
        }
    }

    fn on_card(&mut self, index: usize) {
        if !render::CARD_DAYS.contains(&index) {
            debug!(index, "No such forecast card");
            return;
        }
        let cached = self.session.snapshot.as_ref().map(|s| &s.daily);
        match self.session.view.on_card_clicked(index, cached) {
            CardAction::Refresh | CardAction::Fetch => self.fetch_weather(),
            CardAction::ShowCached => {
                self.paint_view();
                render::status_forecast(&mut self.sink, &Local::now());
            }
        }
    }

    fn on_weather(&mut self, token: FlightToken, result: Result<WeatherSnapshot, ProviderError>) {
        if !self.weather_flight.complete(token) {
            return;
        }
        let now = Local::now();
        match result {
            Ok(snapshot) => {
                if self.session.view.reconcile(&snapshot.daily) {
                    info!(days = snapshot.daily.len(), "Selected day gone, back to realtime");
                }
                self.session.snapshot = Some(snapshot);
                self.paint_view();
                render::status_updated(&mut self.sink, &now);
            }
            Err(e) => {
                warn!(error = %e, location = %self.session.location, "Weather fetch failed");
                let cached = self.session.snapshot.as_ref().map(|s| &s.daily);
                if self.session.view.on_fetch_failed(cached) {
                    info!("Selected day not cached, back to realtime");
                    self.paint_view();
                }
                render::status_failed(&mut self.sink, &e);
            }
        }
        render::time_text(&mut self.sink, &now);
    }

    /// Repaint readings, header and cards for the current view.
    fn paint_view(&mut self) {
        let Some(snapshot) = self.session.snapshot.as_ref() else {
            return;
        };
        let view = self.session.view;
        let almanac = self.services.almanac.as_ref();

        match view {
            ViewState::Forecast(i) => match snapshot.daily.day(i) {
                Some(day) => {
                    render::forecast_day(&mut self.sink, day);
                    render::header(&mut self.sink, almanac, day.date);
                }
                None => {
                    self.session.view = ViewState::Realtime;
                    render::realtime(&mut self.sink, snapshot);
                    render::header(&mut self.sink, almanac, Local::now().date_naive());
                }
            },
            ViewState::Realtime => {
                render::realtime(&mut self.sink, snapshot);
                render::header(&mut self.sink, almanac, Local::now().date_naive());
            }
        }
        render::cards(&mut self.sink, &snapshot.daily, self.session.view);
    }

    // -- Search ----------------------------------------------------------

    fn on_search_input(&mut self, text: String) {
        let query = searchable(&text, self.settings.min_query_chars).map(str::to_string);
        self.session.search_input = text;

        let Some(query) = query else {
            self.debouncer.cancel();
            self.search_flight.invalidate();
            render::hide_suggestions(&mut self.sink);
            return;
        };

        let tx = self.events.clone();
        self.debouncer.arm(async move {
            let _ = tx.send(Event::SearchDue(query));
        });
    }

    fn on_search_due(&mut self, query: String) {
        let current = searchable(&self.session.search_input, self.settings.min_query_chars);
        if current != Some(query.as_str()) {
            debug!(query, "Input moved on, dropping search");
            return;
        }
        self.launch_search(query, SearchIntent::Suggest);
    }

    fn on_submit(&mut self, text: String) {
        self.debouncer.cancel();
        self.session.search_input = text;

        let Some(query) = searchable(&self.session.search_input, self.settings.min_query_chars) else {
            render::hide_suggestions(&mut self.sink);
            return;
        };

        if let Some(hit) = cached_answer(&self.session.search_results, query).cloned() {
            debug!(query, "Submit answered from cached results");
            self.apply_candidate(hit);
            return;
        }
        let query = query.to_string();
        self.launch_search(query, SearchIntent::Submit);
    }

    fn on_pick(&mut self, index: usize) {
        match self.session.search_results.get(index).cloned() {
            Some(candidate) => self.apply_candidate(candidate),
            None => debug!(index, "No such suggestion"),
        }
    }

    fn launch_search(&mut self, query: String, intent: SearchIntent) {
        let searcher = self.services.searcher.clone();
        let tx = self.events.clone();
        self.search_flight.launch(move |token| async move {
            let result = searcher.search(&query).await;
            let _ = tx.send(Event::SearchFetched { token, intent, result });
        });
    }

    fn on_search_results(
        &mut self,
        token: FlightToken,
        intent: SearchIntent,
        result: Result<Vec<SearchCandidate>, ProviderError>,
    ) {
        if !self.search_flight.complete(token) {
            return;
        }
        let results = match result {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "City search failed");
                render::hide_suggestions(&mut self.sink);
                return;
            }
        };

        self.session.search_results = results;
        match intent {
            SearchIntent::Suggest => render::suggestions(&mut self.sink, &self.session.search_results),
            SearchIntent::Submit => match self.session.search_results.first().cloned() {
                Some(best) => self.apply_candidate(best),
                None => render::hide_suggestions(&mut self.sink),
            },
        }
    }

    fn apply_candidate(&mut self, candidate: SearchCandidate) {
        // A suggestion search still in flight must not reopen the panel.
        self.search_flight.invalidate();
        self.session.search_input = candidate.short_name.clone();
        self.sink.set_text(fields::SEARCH_INPUT, &candidate.short_name);
        render::hide_suggestions(&mut self.sink);
        self.set_location(candidate.to_location());
    }
}
