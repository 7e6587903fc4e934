use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregate economy of the settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub money: f64,
    pub food: f64,
    pub wood: f64,
    pub population: u64,
    pub employed: u64,
    pub income_tax_rate: f64,
    /// Ticks elapsed since the settlement was founded.
    pub time: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            money: 500.0,
            food: 50.0,
            wood: 100.0,
            population: 10,
            employed: 8,
            income_tax_rate: 0.1,
            time: 0,
        }
    }
}

impl GameState {
    pub fn unemployment_rate(&self) -> f64 {
        if self.population == 0 {
            return 0.0;
        }
        let employed = self.employed.min(self.population) as f64;
        1.0 - employed / self.population as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub tick: u64,
    pub severity: Severity,
    pub text: String,
}

pub const MESSAGE_CAPACITY: usize = 10;

/// Most recent events, newest last.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: VecDeque<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tick: u64, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        match severity {
            Severity::Info | Severity::Success => tracing::info!(tick, %severity, "{text}"),
            Severity::Warning => tracing::warn!(tick, "{text}"),
            Severity::Error => tracing::error!(tick, "{text}"),
        }
        if self.entries.len() == MESSAGE_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(Message {
            tick,
            severity,
            text,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Message> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|m| m.severity == severity)
            .count()
    }
}
