use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

/// Typed comparison key for a sortable column.
///
/// Date columns compare as parsed timestamps, never lexically. A record
/// missing the value for the requested column yields `Missing`, which
/// orders after every present value in either direction.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(String),
    Date(NaiveDateTime),
    Number(i64),
    Missing,
}

impl SortKey {
    pub fn is_missing(&self) -> bool {
        matches!(self, SortKey::Missing)
    }

    /// Total order between two present keys. Text compares
    /// case-insensitively. Mismatched variants (should not happen for a
    /// well-behaved column) fall back to a fixed variant order instead of
    /// panicking, since partial/legacy data must not crash the list view.
    fn cmp_present(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Missing => 3,
        }
    }
}

/// Compare two keys for the given direction. Missing values stay last in
/// both directions; only the order of present values flips.
pub fn compare_keys(a: &SortKey, b: &SortKey, descending: bool) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.cmp_present(b);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

/// Field accessors the pipeline reads. One impl per screen's record type;
/// the filter/sort/paginate/chart code is written once against this trait.
///
/// Every accessor is total: missing or malformed fields come back as
/// `None`/empty/`Missing` and are treated as non-matches downstream,
/// never as errors.
pub trait ListRecord {
    /// Ordered list of the fields the free-text search scans.
    fn search_text(&self) -> Vec<&str>;

    /// Canonical status label. Never empty: records deserialize with the
    /// screen's initial status when the backend omits one.
    fn status_text(&self) -> &str;

    /// Secondary classification driving the category pie and color-coding.
    fn category_text(&self) -> Option<&str>;

    /// The date the year/month filters and time buckets read.
    fn event_date(&self) -> Option<NaiveDate>;

    /// Typed key for the named sortable column. Unknown column names and
    /// absent values both yield `SortKey::Missing`.
    fn sort_key(&self, field: &str) -> SortKey;
}
