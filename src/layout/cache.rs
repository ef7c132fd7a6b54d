use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::ir::{Day, Meeting};

use super::partition::{GroupsByDay, group_by_day};
use super::placement::GridParams;
use super::{TimetableLayout, layout_from_groups};

fn fingerprint(meetings: &[Meeting], days: &[Day]) -> u64 {
    let mut hasher = DefaultHasher::new();
    meetings.hash(&mut hasher);
    days.hash(&mut hasher);
    hasher.finish()
}

struct GroupingEntry {
    fingerprint: u64,
    meetings: Vec<Meeting>,
    days: Vec<Day>,
    groups: Arc<GroupsByDay>,
}

/// Single-entry memo for the clustering stage.
///
/// Keyed on the content of the meeting set plus the display days, so a call
/// that only changes the time window or resolution reuses the previous
/// partition. Placement and row emission always re-run.
#[derive(Default)]
pub struct LayoutCache {
    entry: Option<GroupingEntry>,
    hits: u64,
    misses: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&mut self, meetings: &[Meeting], days: &[Day]) -> Arc<GroupsByDay> {
        let key = fingerprint(meetings, days);
        if let Some(entry) = &self.entry {
            if entry.fingerprint == key && entry.meetings == meetings && entry.days == days {
                self.hits += 1;
                tracing::trace!(hits = self.hits, "grouping cache hit");
                return Arc::clone(&entry.groups);
            }
        }

        self.misses += 1;
        let groups = Arc::new(group_by_day(meetings, days));
        self.entry = Some(GroupingEntry {
            fingerprint: key,
            meetings: meetings.to_vec(),
            days: days.to_vec(),
            groups: Arc::clone(&groups),
        });
        groups
    }

    pub fn layout(&mut self, meetings: &[Meeting], grid: &GridParams) -> TimetableLayout {
        let groups = self.groups(meetings, grid.days());
        layout_from_groups(&groups, grid)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
