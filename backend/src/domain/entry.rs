//! Entry records and the filters used to query them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::field::parse_date;
use super::schema_validator::{EntryField, EntryFieldInput};
use super::{DataTypeId, EntryId, UserId};

/// A dated set of values conforming to one data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Identifier.
    pub id: EntryId,
    /// Owner.
    pub user_id: UserId,
    /// Data type the values conform to.
    pub data_type_id: DataTypeId,
    /// When the recorded observation happened.
    #[schema(value_type = String, format = DateTime)]
    pub date: DateTime<Utc>,
    /// Values in submission order.
    pub fields: Vec<EntryField>,
    /// Creation time.
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated entry submitted by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    /// Referenced data type.
    pub data_type_id: DataTypeId,
    /// Observation time.
    pub date: DateTime<Utc>,
    /// Raw values.
    pub fields: Vec<EntryFieldInput>,
}

/// Partial update of an entry. A supplied field list is re-validated and
/// replaces the current values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    /// New observation time.
    pub date: Option<DateTime<Utc>>,
    /// Replacement values.
    pub fields: Option<Vec<EntryFieldInput>>,
}

/// Where a date-only bound snaps to within its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundEdge {
    /// `00:00:00.000` UTC.
    StartOfDay,
    /// `23:59:59.999` UTC.
    EndOfDay,
}

/// Parse a query bound.
///
/// Full RFC 3339 timestamps are taken as given. A bare `YYYY-MM-DD` expands
/// to the start or end of that UTC day so that an end bound includes the
/// whole day.
///
/// # Examples
/// ```
/// use tracker::domain::{BoundEdge, parse_date_bound};
///
/// let end = parse_date_bound("2024-01-31", BoundEdge::EndOfDay).unwrap();
/// assert_eq!(end.to_rfc3339(), "2024-01-31T23:59:59.999+00:00");
/// ```
pub fn parse_date_bound(raw: &str, edge: BoundEdge) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(day_edge(day, edge));
    }
    parse_date(trimmed)
}

/// Instant at the given edge of a UTC calendar day.
pub fn day_edge(day: NaiveDate, edge: BoundEdge) -> DateTime<Utc> {
    let time = match edge {
        BoundEdge::StartOfDay => NaiveTime::MIN,
        BoundEdge::EndOfDay => {
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
        }
    };
    day.and_time(time).and_utc()
}

/// Filters for listing entries. Bounds are inclusive; results are ordered
/// by `date` descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Only entries of this data type.
    pub data_type_id: Option<DataTypeId>,
    /// Earliest `date` to include.
    pub start: Option<DateTime<Utc>>,
    /// Latest `date` to include.
    pub end: Option<DateTime<Utc>>,
}

impl EntryFilter {
    /// Filter for everything within one UTC calendar day.
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            data_type_id: None,
            start: Some(day_edge(day, BoundEdge::StartOfDay)),
            end: Some(day_edge(day, BoundEdge::EndOfDay)),
        }
    }

    /// Whether `entry` passes the filter.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.data_type_id.is_none_or(|id| id == entry.data_type_id)
            && self.start.is_none_or(|start| entry.date >= start)
            && self.end.is_none_or(|end| entry.date <= end)
    }
}

/// Order entries newest first, breaking ties by creation time.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
