//! Synthetic sample records shown before any real upload has been made.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;
use shared::domain::DiagnosisLabel;

use crate::outcome::ClassificationOutcome;

pub const DEFAULT_HISTORY_SIZE: usize = 6;
pub const CONFIDENCE_PERCENT_RANGE: RangeInclusive<u8> = 85..=99;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub label: DiagnosisLabel,
    /// Whole percent in `CONFIDENCE_PERCENT_RANGE`.
    pub confidence: u8,
}

impl HistoryEntry {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let label = if rng.random_bool(0.5) {
            DiagnosisLabel::Parasitized
        } else {
            DiagnosisLabel::Uninfected
        };
        let confidence = rng.random_range(CONFIDENCE_PERCENT_RANGE);
        Self {
            id: format!("SMP-{:08X}", rng.random::<u32>()),
            label,
            confidence,
        }
    }
}

impl From<&HistoryEntry> for ClassificationOutcome {
    fn from(entry: &HistoryEntry) -> Self {
        ClassificationOutcome::Success {
            label: entry.label.as_str().to_string(),
            confidence: f64::from(entry.confidence) / 100.0,
        }
    }
}

/// Fixed set of demo records, generated once and never refreshed.
#[derive(Debug, Clone)]
pub struct DemoHistory {
    entries: Vec<HistoryEntry>,
}

impl DemoHistory {
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let entries = (0..count).map(|_| HistoryEntry::random(rng)).collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}
