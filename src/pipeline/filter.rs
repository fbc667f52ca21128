use crate::pipeline::record::ListRecord;

/// The combined set of active predicates for a list screen. Built fresh
/// from the query string on every request; a `None`/empty field means
/// "predicate inactive, always passes".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub status: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category: Option<String>,
}

impl FilterCriteria {
    pub fn is_inactive(&self) -> bool {
        self.query.trim().is_empty()
            && self.status.is_none()
            && self.year.is_none()
            && self.month.is_none()
            && self.category.is_none()
    }

    fn has_date_filter(&self) -> bool {
        self.year.is_some() || self.month.is_some()
    }
}

/// Returns the records matching every active predicate, in input order.
///
/// AND across independent predicates; OR within the free-text predicate
/// (any searchable field containing the query, case-insensitively).
/// A record with a missing/unparsable date fails an active year/month
/// filter (fails closed) but passes when no date filter is active.
pub fn filter<'a, R: ListRecord>(records: &'a [R], criteria: &FilterCriteria) -> Vec<&'a R> {
    records.iter().filter(|r| matches(*r, criteria)).collect()
}

/// Index variant of [`filter`], used by the store's memo slot.
pub fn filter_indices<R: ListRecord>(records: &[R], criteria: &FilterCriteria) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches(*r, criteria))
        .map(|(i, _)| i)
        .collect()
}

pub fn matches<R: ListRecord>(record: &R, criteria: &FilterCriteria) -> bool {
    let query = criteria.query.trim();
    if !query.is_empty() {
        let needle = query.to_lowercase();
        let hit = record
            .search_text()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }

    if let Some(status) = &criteria.status {
        if record.status_text() != status {
            return false;
        }
    }

    if let Some(category) = &criteria.category {
        match record.category_text() {
            Some(c) if c == category => {}
            _ => return false,
        }
    }

    if criteria.has_date_filter() {
        let Some(date) = record.event_date() else {
            return false;
        };
        if let Some(year) = criteria.year {
            if chrono::Datelike::year(&date) != year {
                return false;
            }
        }
        if let Some(month) = criteria.month {
            if chrono::Datelike::month(&date) != month {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testutil::{rec, rec_dated, rec_undated};

    #[test]
    fn inactive_criteria_is_identity() {
        let records = vec![
            rec("Maria Santos", "Pending", "Theft"),
            rec("John Reyes", "Completed", "Noise Complaint"),
        ];
        assert!(FilterCriteria::default().is_inactive());
        let out = filter(&records, &FilterCriteria::default());
        assert_eq!(out.len(), records.len());
        for (got, want) in out.iter().zip(records.iter()) {
            assert!(std::ptr::eq(*got, want));
        }
    }

    #[test]
    fn status_filter_returns_exact_matches_in_order() {
        // 5 records, 2 Completed, 3 Pending.
        let records = vec![
            rec("a", "Pending", "Theft"),
            rec("b", "Completed", "Theft"),
            rec("c", "Pending", "Theft"),
            rec("d", "Completed", "Theft"),
            rec("e", "Pending", "Theft"),
        ];
        let criteria = FilterCriteria {
            status: Some("Completed".into()),
            ..Default::default()
        };
        let out = filter(&records, &criteria);
        let names: Vec<_> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "d"]);
    }

    #[test]
    fn search_is_case_insensitive_substring_over_all_fields() {
        let records = vec![
            rec("Maria Santos", "Pending", "Theft"),
            rec("John Reyes", "Pending", "Theft"),
        ];
        let criteria = FilterCriteria {
            query: "mari".into(),
            ..Default::default()
        };
        let out = filter(&records, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Maria Santos");
    }

    #[test]
    fn search_matches_secondary_fields_too() {
        let mut r = rec("Juan dela Cruz", "Pending", "Theft");
        r.ticket = "BLT-2025-0042".into();
        let records = vec![r, rec("other", "Pending", "Theft")];
        let criteria = FilterCriteria {
            query: "2025-0042".into(),
            ..Default::default()
        };
        assert_eq!(filter(&records, &criteria).len(), 1);
    }

    #[test]
    fn missing_date_fails_closed_only_when_date_filter_active() {
        let records = vec![
            rec_dated("dated", 2025, 3, 14),
            rec_undated("undated"),
        ];

        let by_year = FilterCriteria {
            year: Some(2025),
            ..Default::default()
        };
        let out = filter(&records, &by_year);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "dated");

        // No date filter: the undated record passes.
        assert_eq!(filter(&records, &FilterCriteria::default()).len(), 2);
    }

    #[test]
    fn year_and_month_must_both_match() {
        let records = vec![
            rec_dated("march", 2025, 3, 1),
            rec_dated("june", 2025, 6, 1),
            rec_dated("old_march", 2024, 3, 1),
        ];
        let criteria = FilterCriteria {
            year: Some(2025),
            month: Some(3),
            ..Default::default()
        };
        let out = filter(&records, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "march");
    }

    #[test]
    fn predicates_combine_with_and() {
        let records = vec![
            rec("Maria Santos", "Completed", "Theft"),
            rec("Maria Cruz", "Pending", "Theft"),
            rec("Maria Lopez", "Completed", "Noise Complaint"),
        ];
        let criteria = FilterCriteria {
            query: "maria".into(),
            status: Some("Completed".into()),
            category: Some("Theft".into()),
            ..Default::default()
        };
        let out = filter(&records, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Maria Santos");
    }

    #[test]
    fn output_is_always_a_subset_matching_every_active_predicate() {
        let records = vec![
            rec_dated("a", 2025, 1, 5),
            rec_undated("b"),
            rec_dated("c", 2025, 2, 5),
        ];
        let criteria = FilterCriteria {
            query: "a".into(),
            year: Some(2025),
            ..Default::default()
        };
        for r in filter(&records, &criteria) {
            assert!(matches(r, &criteria));
        }
        // Completeness: everything matching appears.
        let matching = records.iter().filter(|r| matches(*r, &criteria)).count();
        assert_eq!(filter(&records, &criteria).len(), matching);
    }
}
