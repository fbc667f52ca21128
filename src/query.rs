// Query-string <-> pipeline-control plumbing shared by every list screen.
use crate::pipeline::{FilterCriteria, SortDir, SortSpec};
use std::collections::HashMap;

/// Decoded query parameters. Values are percent/plus-decoded, later keys
/// win on duplicates.
pub fn parse_params(query: Option<&str>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if let Some(q) = query {
        for (k, v) in url::form_urlencoded::parse(q.as_bytes()) {
            map.insert(k.into_owned(), v.into_owned());
        }
    }
    map
}

/// The pipeline controls a list request carries. `sort`/`per_page` stay
/// optional so the caller can fall back to the saved preferences.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub criteria: FilterCriteria,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub per_page: Option<usize>,
    pub view: Option<String>,
}

impl ListQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| -> Option<String> {
            params
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        let criteria = FilterCriteria {
            query: non_empty("q").unwrap_or_default(),
            status: non_empty("status"),
            year: non_empty("year").and_then(|s| s.parse().ok()),
            month: non_empty("month")
                .and_then(|s| s.parse().ok())
                .filter(|m| (1..=12).contains(m)),
            category: non_empty("category"),
        };

        let sort = non_empty("sort").map(|field| {
            let dir = non_empty("dir")
                .map(|d| SortDir::parse(&d))
                .unwrap_or(SortDir::Asc);
            SortSpec::new(field, dir)
        });

        let page = non_empty("page")
            .and_then(|s| s.parse().ok())
            .filter(|&p: &usize| p >= 1)
            .unwrap_or(1);

        let per_page = non_empty("per_page").and_then(|s| s.parse().ok());

        ListQuery {
            criteria,
            sort,
            page,
            per_page,
            view: non_empty("view"),
        }
    }
}

/// Filter params only: what an export link needs to reproduce the view.
pub fn criteria_query_string(criteria: &FilterCriteria) -> String {
    serialize(criteria, None, None)
}

/// Filter + sort + per-page params, without `page`: the form the pager
/// appends its own page number to.
pub fn list_query_string(criteria: &FilterCriteria, sort: &SortSpec, per_page: usize) -> String {
    serialize(criteria, Some(sort), Some(per_page))
}

/// Filter + per-page, no sort: sortable headers add toggled sort params.
pub fn filter_query_string(criteria: &FilterCriteria, per_page: usize) -> String {
    serialize(criteria, None, Some(per_page))
}

fn serialize(
    criteria: &FilterCriteria,
    sort: Option<&SortSpec>,
    per_page: Option<usize>,
) -> String {
    let mut ser = url::form_urlencoded::Serializer::new(String::new());
    if !criteria.query.trim().is_empty() {
        ser.append_pair("q", criteria.query.trim());
    }
    if let Some(s) = &criteria.status {
        ser.append_pair("status", s);
    }
    if let Some(c) = &criteria.category {
        ser.append_pair("category", c);
    }
    if let Some(y) = criteria.year {
        ser.append_pair("year", &y.to_string());
    }
    if let Some(m) = criteria.month {
        ser.append_pair("month", &m.to_string());
    }
    if let Some(spec) = sort {
        ser.append_pair("sort", &spec.field);
        ser.append_pair("dir", spec.dir.as_str());
    }
    if let Some(n) = per_page {
        ser.append_pair("per_page", &n.to_string());
    }
    ser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_of(q: &str) -> HashMap<String, String> {
        parse_params(Some(q))
    }

    #[test]
    fn parse_decodes_and_ignores_empty_values() {
        let q = ListQuery::from_params(&params_of("q=Maria+Santos&status=&year=2025&month=3"));
        assert_eq!(q.criteria.query, "Maria Santos");
        assert!(q.criteria.status.is_none());
        assert_eq!(q.criteria.year, Some(2025));
        assert_eq!(q.criteria.month, Some(3));
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let q = ListQuery::from_params(&params_of("page=banana&month=19&per_page=-2"));
        assert_eq!(q.page, 1);
        assert!(q.criteria.month.is_none());
        assert!(q.per_page.is_none());
    }

    #[test]
    fn query_string_round_trips_through_parse() {
        let criteria = FilterCriteria {
            query: "dela cruz".into(),
            status: Some("Pending".into()),
            year: Some(2025),
            month: None,
            category: Some("Noise Complaint".into()),
        };
        let sort = SortSpec::new("incident_date", SortDir::Desc);
        let qs = list_query_string(&criteria, &sort, 25);
        let parsed = ListQuery::from_params(&params_of(&qs));
        assert_eq!(parsed.criteria, criteria);
        assert_eq!(parsed.sort, Some(sort));
        assert_eq!(parsed.per_page, Some(25));
    }
}
