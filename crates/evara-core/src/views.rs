//! Derived views over synchronized lists.
//!
//! Everything here is a pure function of a slice of records, recomputed on
//! every read: filters, checklist grouping, vendor facets, guest statistics
//! and the upcoming/past split of events.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Error;
use crate::models::{ChecklistItem, Event, Guest, RsvpStatus, Vendor};

/// A filter selecting a subset of records of type `T`
pub trait RecordFilter<T> {
    fn matches(&self, record: &T) -> bool;
}

/// Records accepted by `filter`, in their original order.
pub fn apply_filter<T: Clone, F: RecordFilter<T>>(records: &[T], filter: &F) -> Vec<T> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

/// Split `records` into (accepted, rejected), each keeping the original order.
pub fn split_by_filter<T: Clone, F: RecordFilter<T>>(records: &[T], filter: &F) -> (Vec<T>, Vec<T>) {
    records
        .iter()
        .cloned()
        .partition(|record| filter.matches(record))
}

fn parse_all(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("all")
}

/// Guest list filter on RSVP status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RsvpFilter {
    #[default]
    All,
    Status(RsvpStatus),
}

impl RecordFilter<Guest> for RsvpFilter {
    fn matches(&self, guest: &Guest) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => guest.has_rsvp(*status),
        }
    }
}

impl FromStr for RsvpFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if parse_all(s) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Status)
    }
}

impl fmt::Display for RsvpFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Status(status) => write!(f, "{}", status.label().to_ascii_lowercase()),
        }
    }
}

/// Checklist filter on completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl RecordFilter<ChecklistItem> for CompletionFilter {
    fn matches(&self, item: &ChecklistItem) -> bool {
        match self {
            Self::All => true,
            Self::Completed => item.is_completed(),
            Self::Pending => !item.is_completed(),
        }
    }
}

impl FromStr for CompletionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "pending" | "open" => Ok(Self::Pending),
            other => Err(Error::InvalidInput(format!(
                "unknown task filter: {other} (expected all, completed or pending)"
            ))),
        }
    }
}

/// Vendor directory filter on service type (exact match)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ServiceFilter {
    #[default]
    All,
    Service(String),
}

impl RecordFilter<Vendor> for ServiceFilter {
    fn matches(&self, vendor: &Vendor) -> bool {
        match self {
            Self::All => true,
            Self::Service(service) => vendor.service_type.as_deref() == Some(service.as_str()),
        }
    }
}

impl FromStr for ServiceFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(Error::InvalidInput("service filter cannot be empty".into()));
        }
        if parse_all(value) {
            return Ok(Self::All);
        }
        Ok(Self::Service(value.to_string()))
    }
}

/// Checklist tasks sharing one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub name: String,
    pub items: Vec<ChecklistItem>,
}

/// Group tasks by category in first-seen order.
///
/// Tasks keep their relative order inside each group; blank categories land
/// in "General". Only non-empty groups are returned.
pub fn group_by_category(items: &[ChecklistItem]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for item in items {
        let category = item.category_or_default();
        match groups.iter_mut().find(|group| group.name == category) {
            Some(group) => group.items.push(item.clone()),
            None => groups.push(CategoryGroup {
                name: category.to_string(),
                items: vec![item.clone()],
            }),
        }
    }
    groups
}

/// Distinct non-empty service types in first-seen order
pub fn service_type_facets(vendors: &[Vendor]) -> Vec<String> {
    let mut facets: Vec<String> = Vec::new();
    for service in vendors
        .iter()
        .filter_map(|vendor| vendor.service_type.as_deref())
        .filter(|service| !service.trim().is_empty())
    {
        if !facets.iter().any(|seen| seen == service) {
            facets.push(service.to_string());
        }
    }
    facets
}

/// Headline numbers for the guest list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GuestStats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub declined: usize,
    pub plus_ones: usize,
}

impl GuestStats {
    pub fn tally(guests: &[Guest]) -> Self {
        guests.iter().fold(Self::default(), |mut stats, guest| {
            stats.total += 1;
            match guest.rsvp_status {
                Some(RsvpStatus::Confirmed) => stats.confirmed += 1,
                Some(RsvpStatus::Pending) => stats.pending += 1,
                Some(RsvpStatus::Declined) => stats.declined += 1,
                None => {}
            }
            if guest.has_plus_one {
                stats.plus_ones += 1;
            }
            stats
        })
    }

    /// Guests expected to attend, counting their plus-ones
    pub const fn headcount(&self) -> usize {
        self.confirmed + self.plus_ones
    }
}

/// Events split around a reference instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventPartition {
    /// Starting at or after `now`, in input order
    pub upcoming: Vec<Event>,
    /// Starting before `now`, in input order
    pub past: Vec<Event>,
}

/// Split events into upcoming and past relative to `now`.
///
/// Events without a parseable start time appear in neither half.
pub fn partition_events(events: &[Event], now: DateTime<Utc>) -> EventPartition {
    let mut partition = EventPartition::default();
    for event in events {
        match event.starts_at() {
            Some(at) if at >= now => partition.upcoming.push(event.clone()),
            Some(_) => partition.past.push(event.clone()),
            None => {}
        }
    }
    partition
}
