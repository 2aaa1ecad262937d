//! Completion-time history
//!
//! Persisted to LocalStorage as a JSON array of `{date, time}` records,
//! newest last, keeping only the most recent few runs.

use serde::{Deserialize, Deserializer, Serialize};

use crate::persistence::{KeyValueStore, StoreError};

/// Shown in place of the list when no run has been completed yet
pub const EMPTY_MESSAGE: &str = "No record yet";

/// A single completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Human-readable completion timestamp
    pub date: String,
    /// Total run time in seconds (0.1s resolution)
    #[serde(deserialize_with = "seconds_from_number_or_text")]
    pub time: f64,
}

/// Older saves stored the time as text ("12.3")
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeconds {
    Number(f64),
    Text(String),
}

fn seconds_from_number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawSeconds::deserialize(deserializer)? {
        RawSeconds::Number(n) => Ok(n),
        RawSeconds::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Completion history, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    pub entries: Vec<HistoryRecord>,
}

impl History {
    /// Storage key, shared with earlier builds
    pub const STORAGE_KEY: &'static str = "gameHistory";

    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted value; anything unreadable is an empty history
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<History>(json) {
            Ok(history) => history,
            Err(e) => {
                log::warn!("Discarding unreadable history: {}", e);
                Self::new()
            }
        }
    }

    /// Load from the store, defaulting to empty
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => {
                let history = Self::from_json(&json);
                log::info!("Loaded {} history records", history.entries.len());
                history
            }
            None => {
                log::info!("No history found, starting fresh");
                Self::new()
            }
        }
    }

    /// Persist to the store
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("History saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Append a run and drop the oldest entries beyond `limit`
    pub fn record(&mut self, date: String, seconds: f64, limit: usize) {
        self.entries.push(HistoryRecord {
            date,
            time: seconds,
        });
        if self.entries.len() > limit {
            let excess = self.entries.len() - limit;
            self.entries.drain(..excess);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Display lines: "1. <date> – 12.3s", or the empty message
    pub fn lines(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![EMPTY_MESSAGE.to_string()];
        }
        self.entries
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {} – {:.1}s", i + 1, r.date, r.time))
            .collect()
    }
}

/// Format a Unix timestamp (ms) in the browser's locale
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
    date.to_locale_string("default", &wasm_bindgen::JsValue::UNDEFINED)
        .into()
}

/// Format a Unix timestamp (ms) as a UTC date and time
#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(timestamp: f64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp as i64)
        .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
