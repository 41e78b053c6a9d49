//! Anti-repetition ledger.
//!
//! Three bounded FIFO windows of recently fired tags, event IDs and
//! polarities. The scorer consults them to penalize near-term repeats;
//! nothing is ever hard-excluded here.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::types::Polarity;

/// Sliding-window history of fired events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLedger {
    #[serde(default)]
    recent_tags: VecDeque<String>,
    #[serde(default)]
    recent_ids: VecDeque<String>,
    #[serde(default)]
    recent_polarities: VecDeque<Polarity>,
    #[serde(skip, default = "default_tag_window")]
    tag_window: usize,
    #[serde(skip, default = "default_id_window")]
    id_window: usize,
    #[serde(skip, default = "default_polarity_window")]
    polarity_window: usize,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::with_windows(
            default_tag_window(),
            default_id_window(),
            default_polarity_window(),
        )
    }
}

impl HistoryLedger {
    /// Empty ledger with explicit window sizes.
    #[must_use]
    pub fn with_windows(tag_window: usize, id_window: usize, polarity_window: usize) -> Self {
        Self {
            recent_tags: VecDeque::with_capacity(tag_window),
            recent_ids: VecDeque::with_capacity(id_window),
            recent_polarities: VecDeque::with_capacity(polarity_window),
            tag_window,
            id_window,
            polarity_window,
        }
    }

    /// Empty ledger sized from configuration.
    #[must_use]
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::with_windows(config.tag_window, config.id_window, config.polarity_window)
    }

    /// Re-apply window sizes, evicting the oldest entries if a loaded ledger
    /// is longer than allowed.
    pub fn resize(&mut self, config: &ScoringConfig) {
        self.tag_window = config.tag_window;
        self.id_window = config.id_window;
        self.polarity_window = config.polarity_window;
        trim(&mut self.recent_tags, self.tag_window);
        trim(&mut self.recent_ids, self.id_window);
        trim(&mut self.recent_polarities, self.polarity_window);
    }

    /// Push one fired event into all three windows.
    pub fn record(&mut self, tag: &str, id: &str, polarity: Polarity) {
        push_bounded(&mut self.recent_tags, tag.to_string(), self.tag_window);
        push_bounded(&mut self.recent_ids, id.to_string(), self.id_window);
        push_bounded(&mut self.recent_polarities, polarity, self.polarity_window);
    }

    /// Occurrences of `tag` in the tag window.
    #[must_use]
    pub fn tag_count(&self, tag: &str) -> usize {
        self.recent_tags.iter().filter(|t| *t == tag).count()
    }

    /// Whether `id` is anywhere in the ID window.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.recent_ids.iter().any(|i| i == id)
    }

    /// Occurrences of `polarity` in the polarity window.
    #[must_use]
    pub fn polarity_count(&self, polarity: Polarity) -> usize {
        self.recent_polarities.iter().filter(|p| **p == polarity).count()
    }

    /// Recent tags, oldest first.
    pub fn recent_tags(&self) -> impl Iterator<Item = &str> {
        self.recent_tags.iter().map(String::as_str)
    }

    /// Recent IDs, oldest first.
    pub fn recent_ids(&self) -> impl Iterator<Item = &str> {
        self.recent_ids.iter().map(String::as_str)
    }

    /// Recent polarities, oldest first.
    pub fn recent_polarities(&self) -> impl Iterator<Item = Polarity> + '_ {
        self.recent_polarities.iter().copied()
    }

    /// Number of IDs currently remembered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recent_ids.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recent_ids.is_empty() && self.recent_tags.is_empty()
    }
}

fn push_bounded<T>(window: &mut VecDeque<T>, value: T, cap: usize) {
    window.push_back(value);
    trim(window, cap);
}

fn trim<T>(window: &mut VecDeque<T>, cap: usize) {
    while window.len() > cap {
        window.pop_front();
    }
}

fn default_tag_window() -> usize { 5 }
fn default_id_window() -> usize { 15 }
fn default_polarity_window() -> usize { 5 }
