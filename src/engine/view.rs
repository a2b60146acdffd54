//! View state machine: realtime readings or one forecast day.

use std::fmt;

use crate::types::DailyForecast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Realtime,
    /// Index into the cached daily forecast, 0 = today.
    Forecast(usize),
}

/// What a forecast-card click asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Card already selected: stay, but fetch fresh data.
    Refresh,
    /// Newly selected and the cache has that day: paint it now.
    ShowCached,
    /// Newly selected, nothing usable cached: fetch first.
    Fetch,
}

impl ViewState {
    pub fn is_realtime(&self) -> bool {
        matches!(self, Self::Realtime)
    }

    /// Day index being shown; 0 in realtime.
    pub fn day_index(&self) -> usize {
        match self {
            Self::Realtime => 0,
            Self::Forecast(i) => *i,
        }
    }

    /// New location: always back to realtime.
    pub fn on_location_changed(&mut self) {
        *self = Self::Realtime;
    }

    /// Forecast card `index` was clicked.
    pub fn on_card_clicked(&mut self, index: usize, cached: Option<&DailyForecast>) -> CardAction {
        if *self == Self::Forecast(index) {
            return CardAction::Refresh;
        }
        *self = Self::Forecast(index);
        match cached {
            Some(daily) if daily.has_day(index) => CardAction::ShowCached,
            _ => CardAction::Fetch,
        }
    }

    /// A fresh forecast arrived. Returns true when the selected day no
    /// longer exists and the state fell back to realtime.
    pub fn reconcile(&mut self, daily: &DailyForecast) -> bool {
        match *self {
            Self::Forecast(i) if !daily.has_day(i) => {
                *self = Self::Realtime;
                true
            }
            _ => false,
        }
    }

    /// A fetch failed. The selection survives only if the cached forecast
    /// still has that day; returns true on fallback to realtime.
    pub fn on_fetch_failed(&mut self, cached: Option<&DailyForecast>) -> bool {
        match cached {
            Some(daily) => self.reconcile(daily),
            None if !self.is_realtime() => {
                *self = Self::Realtime;
                true
            }
            None => false,
        }
    }

    /// The periodic timer only refreshes realtime readings.
    pub fn refreshes_on_tick(&self) -> bool {
        self.is_realtime()
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Realtime => write!(f, "realtime"),
            Self::Forecast(i) => write!(f, "forecast[{i}]"),
        }
    }
}
