//! Session history of saved projections
//!
//! Entries live only as long as the process. Ids increase monotonically and
//! are never handed out twice, even after removals or a clear.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::projection::Projection;
use crate::stats::ExpectedStats;

/// A saved projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub label: String,
    pub character: String,
    pub final_class: String,
    pub final_level: u32,
    /// Capped expected stats
    pub stats: ExpectedStats,
    pub saved_at: DateTime<Local>,
}

impl HistoryEntry {
    /// One-line summary for lists
    pub fn summary(&self) -> String {
        format!(
            "#{} {} ({} Lv{}) {}",
            self.id,
            self.label,
            self.final_class,
            self.final_level,
            self.saved_at.format("%H:%M:%S")
        )
    }
}

/// In-memory list of saved projections, oldest first
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: VecDeque<HistoryEntry>,
    next_id: u64,
    limit: usize,
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::with_limit(crate::consts::DEFAULT_HISTORY_LIMIT)
    }
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `limit` entries; 0 means unbounded
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 1,
            limit,
        }
    }

    /// Save a projection and return its id.
    ///
    /// An empty label falls back to the character name. When the history is
    /// full the oldest entry is dropped.
    pub fn save(&mut self, projection: &Projection, label: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let label = match label.trim() {
            "" => projection.character.clone(),
            label => label.to_string(),
        };
        self.entries.push_back(HistoryEntry {
            id,
            label,
            character: projection.character.clone(),
            final_class: projection.final_class.clone(),
            final_level: projection.final_level,
            stats: projection.capped.rounded(),
            saved_at: Local::now(),
        });

        if self.limit > 0 {
            while self.entries.len() > self.limit {
                if let Some(dropped) = self.entries.pop_front() {
                    tracing::debug!(id = dropped.id, "history full, dropped oldest entry");
                }
            }
        }
        tracing::info!(id, character = %projection.character, "saved projection");
        id
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: u64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Remove an entry; returns whether it existed
    pub fn remove(&mut self, id: u64) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
