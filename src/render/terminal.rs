//! Concrete display sinks.
//!
//! `MemorySink` keeps the latest value of every field and is what the
//! tests inspect. `TerminalSink` wraps one and prints a text frame on
//! every `present`.

use std::collections::HashMap;
use std::io::Write;

use tracing::warn;

use super::{fields, DisplaySink, ForecastCard};

#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    texts: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
    visible: HashMap<String, bool>,
    cards: Vec<ForecastCard>,
    frames: usize,
}

impl MemorySink {
    pub fn text(&self, field: &str) -> Option<&str> {
        self.texts.get(field).map(String::as_str)
    }

    pub fn list(&self, field: &str) -> Option<&[String]> {
        self.lists.get(field).map(Vec::as_slice)
    }

    pub fn is_visible(&self, field: &str) -> Option<bool> {
        self.visible.get(field).copied()
    }

    pub fn cards(&self) -> &[ForecastCard] {
        &self.cards
    }

    /// Number of completed update batches.
    pub fn frames(&self) -> usize {
        self.frames
    }

    fn value(&self, field: &str) -> &str {
        self.text(field).unwrap_or("")
    }

    /// The current state as printable lines.
    pub fn frame_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        out.push(format!(
            "{}  {}  {}",
            self.value(fields::SOLAR_DATE),
            self.value(fields::LUNAR_DATE),
            self.value(fields::FESTIVAL)
        ));
        out.push(format!(
            "📍 {}   🕒 {}   {}",
            self.value(fields::CITY_NAME),
            self.value(fields::CLOCK),
            self.value(fields::STATUS)
        ));
        out.push(format!(
            "{} {}  {}{}  ↑{}° ↓{}°",
            self.value(fields::WEATHER_ICON),
            self.value(fields::WEATHER_DESC),
            self.value(fields::CURRENT_TEMP),
            self.value(fields::TEMP_UNIT),
            self.value(fields::HIGH_TEMP),
            self.value(fields::LOW_TEMP)
        ));
        out.push(format!(
            "湿度 {}%  风速 {} km/h  体感 {}°  紫外线 {} ({})",
            self.value(fields::HUMIDITY),
            self.value(fields::WIND),
            self.value(fields::FEELS_LIKE),
            self.value(fields::UV_VALUE),
            self.value(fields::UV_LEVEL)
        ));
        out.push(format!(
            "降水 {}%  云量 {}%  气压 {} hPa  能见度 {} km  露点 {}°",
            self.value(fields::PRECIP),
            self.value(fields::CLOUD),
            self.value(fields::PRESSURE),
            self.value(fields::VISIBILITY),
            self.value(fields::DEWPOINT)
        ));
        out.push(format!("💡 {}", self.value(fields::ADVICE)));

        for card in &self.cards {
            let marker = if card.active { '>' } else { ' ' };
            out.push(format!(
                "{marker}[{}] {} {} {} {}/{} {}",
                card.index, card.weekday, card.date, card.icon, card.high, card.low,
                card.precipitation
            ));
        }

        if self.is_visible(fields::SUGGESTIONS) == Some(true) {
            if let Some(items) = self.list(fields::SUGGESTIONS) {
                for (i, item) in items.iter().enumerate() {
                    out.push(format!("  {}. {item}", i + 1));
                }
            }
        }
        out
    }
}

impl DisplaySink for MemorySink {
    fn set_text(&mut self, field: &str, value: &str) {
        self.texts.insert(field.to_string(), value.to_string());
    }

    fn set_list(&mut self, field: &str, items: &[String]) {
        self.lists.insert(field.to_string(), items.to_vec());
    }

    fn set_visible(&mut self, field: &str, visible: bool) {
        self.visible.insert(field.to_string(), visible);
    }

    fn set_cards(&mut self, cards: &[ForecastCard]) {
        self.cards = cards.to_vec();
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

/// Prints a frame to `W` after each batch.
pub struct TerminalSink<W: Write> {
    state: MemorySink,
    out: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            state: MemorySink::default(),
            out,
        }
    }

    pub fn state(&self) -> &MemorySink {
        &self.state
    }

    fn draw(&mut self) -> std::io::Result<()> {
        writeln!(self.out)?;
        for line in self.state.frame_lines() {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn set_text(&mut self, field: &str, value: &str) {
        self.state.set_text(field, value);
    }

    fn set_list(&mut self, field: &str, items: &[String]) {
        self.state.set_list(field, items);
    }

    fn set_visible(&mut self, field: &str, visible: bool) {
        self.state.set_visible(field, visible);
    }

    fn set_cards(&mut self, cards: &[ForecastCard]) {
        self.state.set_cards(cards);
    }

    fn present(&mut self) {
        self.state.present();
        if let Err(e) = self.draw() {
            warn!(error = %e, "Failed to draw frame");
        }
    }
}
