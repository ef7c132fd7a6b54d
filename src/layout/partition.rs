use std::cmp::Ordering;

use crate::ir::{Day, Meeting};

/// A maximal cluster of same-day meetings that overlap directly or through a
/// chain of other members. Built only by [`partition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingGroup {
    day: Day,
    meetings: Vec<Meeting>,
    min_start_time: u16,
    max_end_time: u16,
}

impl MeetingGroup {
    fn start(first: Meeting) -> Self {
        Self {
            day: first.day(),
            min_start_time: first.start_time(),
            max_end_time: first.end_time(),
            meetings: vec![first],
        }
    }

    fn push(&mut self, meeting: Meeting) {
        self.max_end_time = self.max_end_time.max(meeting.end_time());
        self.meetings.push(meeting);
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    pub fn min_start_time(&self) -> u16 {
        self.min_start_time
    }

    pub fn max_end_time(&self) -> u16 {
        self.max_end_time
    }

    pub fn span(&self) -> u16 {
        self.max_end_time - self.min_start_time
    }

    /// More than one member: the cell is split into slots.
    pub fn is_conflict(&self) -> bool {
        self.meetings.len() > 1
    }
}

/// Ordering used before the sweep. Equal start times fall back to end time,
/// then identifier, then course key; full duplicates keep input order.
fn sweep_order(a: &Meeting, b: &Meeting) -> Ordering {
    a.start_time()
        .cmp(&b.start_time())
        .then_with(|| a.end_time().cmp(&b.end_time()))
        .then_with(|| a.identifier().cmp(b.identifier()))
        .then_with(|| a.course_key().cmp(&b.course_key()))
}

/// Partitions one day's meetings into maximal overlapping groups.
///
/// Meetings are sorted (stably) by [`sweep_order`] and swept once while
/// tracking the running maximum end time of the open group. A meeting joins
/// the open group when it starts strictly before that maximum, so intervals
/// that merely touch start a new group.
pub fn partition(meetings: &[Meeting]) -> Vec<MeetingGroup> {
    let mut sorted: Vec<Meeting> = meetings.to_vec();
    sorted.sort_by(sweep_order);

    let mut groups: Vec<MeetingGroup> = Vec::new();
    for meeting in sorted {
        match groups.last_mut() {
            Some(open) if meeting.start_time() < open.max_end_time => open.push(meeting),
            _ => groups.push(MeetingGroup::start(meeting)),
        }
    }
    groups
}

/// Immutable day -> groups mapping in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupsByDay {
    days: Vec<(Day, Vec<MeetingGroup>)>,
    dropped: usize,
}

impl GroupsByDay {
    pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
        self.days.iter().map(|(day, _)| *day)
    }

    pub fn groups(&self, day: Day) -> &[MeetingGroup] {
        self.days
            .iter()
            .find(|(d, _)| *d == day)
            .map(|(_, groups)| groups.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Day, &[MeetingGroup])> + '_ {
        self.days.iter().map(|(day, groups)| (*day, groups.as_slice()))
    }

    /// Meetings left out because their day is not displayed.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Buckets meetings by day and partitions each displayed day.
///
/// Meetings on days missing from `days` have no column and are dropped.
/// Repeated display days share one bucket.
pub fn group_by_day(meetings: &[Meeting], days: &[Day]) -> GroupsByDay {
    let mut display: Vec<Day> = Vec::with_capacity(days.len());
    for day in days {
        if !display.contains(day) {
            display.push(*day);
        }
    }

    let mut dropped = 0;
    let mut buckets: Vec<Vec<Meeting>> = vec![Vec::new(); display.len()];
    for meeting in meetings {
        match display.iter().position(|day| *day == meeting.day()) {
            Some(idx) => buckets[idx].push(meeting.clone()),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "meetings on undisplayed days left out");
    }

    let days = display
        .into_iter()
        .zip(buckets)
        .map(|(day, bucket)| {
            let groups = partition(&bucket);
            tracing::trace!(%day, meetings = bucket.len(), groups = groups.len(), "partitioned day");
            (day, groups)
        })
        .collect();

    GroupsByDay { days, dropped }
}
