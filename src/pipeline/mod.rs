//! The derived-state pipeline shared by every record-list screen.
//!
//! Pure, synchronous recomputation: a snapshot of backend records plus the
//! current filter/sort/page controls deterministically re-derive the table
//! page, the chart series, and the summary facts. No I/O happens here;
//! fetching lives in [`crate::api`], and the store only swaps snapshots.

pub mod charts;
pub mod filter;
pub mod page;
pub mod record;
pub mod store;

pub use charts::{
    bucket_by_category, bucket_by_time, busiest_period, most_common_category, CategoryBucket,
    MostCommon, TimeBucket, TimeScope,
};
pub use filter::{filter, FilterCriteria};
pub use page::{clamp_page, paginate, sort, total_pages, PageSpec, PageView, SortDir, SortSpec};
pub use record::{ListRecord, SortKey};
pub use store::{refresh_store, RecordStore};

#[cfg(test)]
pub(crate) mod testutil {
    use super::record::{ListRecord, SortKey};
    use chrono::NaiveDate;

    /// Minimal record used by the pipeline unit tests.
    pub struct TestRecord {
        pub name: String,
        pub ticket: String,
        pub status: String,
        pub category: Option<String>,
        pub date: Option<NaiveDate>,
    }

    pub fn rec(name: &str, status: &str, category: &str) -> TestRecord {
        TestRecord {
            name: name.to_string(),
            ticket: String::new(),
            status: status.to_string(),
            category: Some(category.to_string()),
            date: None,
        }
    }

    pub fn rec_dated(name: &str, year: i32, month: u32, day: u32) -> TestRecord {
        TestRecord {
            date: NaiveDate::from_ymd_opt(year, month, day),
            ..rec(name, "Pending", "Theft")
        }
    }

    pub fn rec_undated(name: &str) -> TestRecord {
        TestRecord {
            name: name.to_string(),
            ticket: String::new(),
            status: "Pending".to_string(),
            category: None,
            date: None,
        }
    }

    impl ListRecord for TestRecord {
        fn search_text(&self) -> Vec<&str> {
            vec![&self.name, &self.ticket]
        }

        fn status_text(&self) -> &str {
            &self.status
        }

        fn category_text(&self) -> Option<&str> {
            self.category.as_deref()
        }

        fn event_date(&self) -> Option<NaiveDate> {
            self.date
        }

        fn sort_key(&self, field: &str) -> SortKey {
            match field {
                "name" => SortKey::Text(self.name.clone()),
                "status" => SortKey::Text(self.status.clone()),
                "date" => match self.date {
                    Some(d) => SortKey::Date(d.and_hms_opt(0, 0, 0).unwrap()),
                    None => SortKey::Missing,
                },
                _ => SortKey::Missing,
            }
        }
    }
}
