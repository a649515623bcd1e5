//! Filter options understood by the workout store.

use chrono::{DateTime, Utc};

/// Closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Options for `Database::find_workouts`. Every option left unset adds no
/// predicate to the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutQuery {
    pub date_range: Option<DateRange>,
    pub date_from: Option<DateTime<Utc>>,
    pub name_contains: Option<String>,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl WorkoutQuery {
    pub fn new(order: SortOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn since(mut self, from: DateTime<Utc>) -> Self {
        self.date_from = Some(from);
        self
    }

    /// Case-insensitive substring match against any exercise name. Blank
    /// needles are ignored.
    pub fn name_contains(mut self, needle: &str) -> Self {
        let needle = needle.trim();
        self.name_contains = (!needle.is_empty()).then(|| needle.to_lowercase());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Same matching rule the store applies, for use on already-loaded records.
pub fn name_matches(needle: &str, name: &str) -> bool {
    name.to_lowercase().contains(&needle.to_lowercase())
}
