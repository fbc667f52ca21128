use crate::pipeline::record::ListRecord;
use chrono::{Datelike, Months, NaiveDate};

/// One point of a time series. The full scope is always emitted, zeros
/// included, so chart axes stay stable and gap-free.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    pub label: String,
    pub count: u64,
}

/// One slice of a category pie. Categories are open-ended and data-driven;
/// colors come round-robin from [`CHART_PALETTE`] in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub name: String,
    pub value: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeScope {
    /// All 12 months of the year.
    Year(i32),
    /// Every day of the month.
    Month { year: i32, month: u32 },
    /// Rolling 12-month window ending at (and including) `end`'s month.
    Trailing12 { end: NaiveDate },
}

pub const CHART_PALETTE: [&str; 10] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#14b8a6", "#f97316", "#ec4899",
    "#6366f1", "#84cc16",
];

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    match first {
        Some(d) => {
            let next = d + Months::new(1);
            next.signed_duration_since(d).num_days() as u32
        }
        None => 0,
    }
}

/// Buckets records by their event date over the full scope. Records with
/// no parsable date, or dated outside the scope, contribute nothing; every
/// unit of the scope appears exactly once even at count 0.
pub fn bucket_by_time<'a, R, I>(records: I, scope: &TimeScope) -> Vec<TimeBucket>
where
    R: ListRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    match *scope {
        TimeScope::Year(year) => {
            let mut counts = [0u64; 12];
            for r in records {
                if let Some(d) = r.event_date() {
                    if d.year() == year {
                        counts[(d.month0()) as usize] += 1;
                    }
                }
            }
            MONTH_ABBR
                .iter()
                .zip(counts)
                .map(|(label, count)| TimeBucket {
                    label: (*label).to_string(),
                    count,
                })
                .collect()
        }
        TimeScope::Month { year, month } => {
            let days = days_in_month(year, month);
            let mut counts = vec![0u64; days as usize];
            for r in records {
                if let Some(d) = r.event_date() {
                    if d.year() == year && d.month() == month {
                        counts[(d.day() - 1) as usize] += 1;
                    }
                }
            }
            counts
                .into_iter()
                .enumerate()
                .map(|(i, count)| TimeBucket {
                    label: format!("{}", i + 1),
                    count,
                })
                .collect()
        }
        TimeScope::Trailing12 { end } => {
            // Window of 12 (year, month) pairs ending at `end`'s month.
            let end_first = NaiveDate::from_ymd_opt(end.year(), end.month(), 1)
                .unwrap_or(end);
            let months: Vec<NaiveDate> = (0..12)
                .rev()
                .map(|back| end_first - Months::new(back))
                .collect();
            let mut counts = vec![0u64; 12];
            for r in records {
                if let Some(d) = r.event_date() {
                    if let Some(pos) = months
                        .iter()
                        .position(|m| m.year() == d.year() && m.month() == d.month())
                    {
                        counts[pos] += 1;
                    }
                }
            }
            months
                .iter()
                .zip(counts)
                .map(|(m, count)| TimeBucket {
                    label: format!("{} {}", MONTH_ABBR[m.month0() as usize], m.year()),
                    count,
                })
                .collect()
        }
    }
}

/// One bucket per distinct category actually present, in first-seen order.
/// No zero-filling: categories are driven by data, not a fixed enum.
/// Records without a category land in an "Uncategorized" bucket so counts
/// always sum to the input count.
pub fn bucket_by_category<'a, R, I>(records: I) -> Vec<CategoryBucket>
where
    R: ListRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut buckets: Vec<CategoryBucket> = Vec::new();
    for r in records {
        let name = r.category_text().unwrap_or("Uncategorized");
        match buckets.iter_mut().find(|b| b.name == name) {
            Some(b) => b.value += 1,
            None => {
                let color = CHART_PALETTE[buckets.len() % CHART_PALETTE.len()];
                buckets.push(CategoryBucket {
                    name: name.to_string(),
                    value: 1,
                    color,
                });
            }
        }
    }
    buckets
}

#[derive(Debug, Clone, PartialEq)]
pub struct MostCommon {
    pub name: String,
    pub count: u64,
}

/// Largest bucket; ties keep the first-seen one, since bucket iteration
/// order is itself first-seen.
pub fn most_common<'a, I>(pairs: I) -> Option<MostCommon>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    let mut best: Option<MostCommon> = None;
    for (name, count) in pairs {
        match &best {
            Some(b) if count <= b.count => {}
            _ => {
                best = Some(MostCommon {
                    name: name.to_string(),
                    count,
                })
            }
        }
    }
    best
}

pub fn most_common_category(buckets: &[CategoryBucket]) -> Option<MostCommon> {
    most_common(buckets.iter().map(|b| (b.name.as_str(), b.value)))
}

pub fn busiest_period(buckets: &[TimeBucket]) -> Option<MostCommon> {
    most_common(buckets.iter().map(|b| (b.label.as_str(), b.count)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testutil::{rec, rec_dated, rec_undated, TestRecord};

    #[test]
    fn year_scope_always_yields_twelve_buckets() {
        // Zero records still produce the full axis.
        let empty: Vec<TestRecord> = Vec::new();
        let buckets = bucket_by_time(&empty, &TimeScope::Year(2025));
        assert_eq!(buckets.len(), 12);
        assert!(buckets.iter().all(|b| b.count == 0));
        assert_eq!(buckets[0].label, "Jan");
        assert_eq!(buckets[11].label, "Dec");
    }

    #[test]
    fn year_scope_counts_sum_to_in_scope_records() {
        let records = vec![
            rec_dated("a", 2025, 3, 1),
            rec_dated("b", 2025, 3, 20),
            rec_dated("c", 2025, 7, 4),
            rec_dated("other_year", 2024, 3, 1),
            rec_undated("undated"),
        ];
        let buckets = bucket_by_time(&records, &TimeScope::Year(2025));
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 3);
        assert_eq!(buckets[2].count, 2); // March
        assert_eq!(buckets[6].count, 1); // July
    }

    #[test]
    fn month_scope_emits_one_bucket_per_day() {
        let records = vec![rec_dated("a", 2025, 2, 14)];
        let buckets = bucket_by_time(&records, &TimeScope::Month { year: 2025, month: 2 });
        assert_eq!(buckets.len(), 28);
        assert_eq!(buckets[13].count, 1);

        // Leap year February.
        let leap = bucket_by_time(
            &Vec::<TestRecord>::new(),
            &TimeScope::Month { year: 2024, month: 2 },
        );
        assert_eq!(leap.len(), 29);
    }

    #[test]
    fn trailing_window_covers_twelve_months_across_year_boundary() {
        let end = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let records = vec![
            rec_dated("in_window_past", 2024, 4, 1),
            rec_dated("in_window_now", 2025, 3, 1),
            rec_dated("too_old", 2024, 3, 31),
        ];
        let buckets = bucket_by_time(&records, &TimeScope::Trailing12 { end });
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].label, "Apr 2024");
        assert_eq!(buckets[11].label, "Mar 2025");
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 2);
    }

    #[test]
    fn category_counts_conserve_the_input_count() {
        let records = vec![
            rec("a", "Pending", "Theft"),
            rec("b", "Pending", "Noise Complaint"),
            rec("c", "Pending", "Theft"),
            rec_undated("no_category"), // lands in Uncategorized
        ];
        let buckets = bucket_by_category(&records);
        assert_eq!(buckets.iter().map(|b| b.value).sum::<u64>(), 4);
        // First-seen order.
        assert_eq!(buckets[0].name, "Theft");
        assert_eq!(buckets[0].value, 2);
        assert_eq!(buckets[1].name, "Noise Complaint");
    }

    #[test]
    fn category_colors_assigned_round_robin_first_seen() {
        let records: Vec<TestRecord> = (0..12)
            .map(|i| rec(&format!("r{i}"), "Pending", &format!("cat{i}")))
            .collect();
        let buckets = bucket_by_category(&records);
        assert_eq!(buckets[0].color, CHART_PALETTE[0]);
        assert_eq!(buckets[9].color, CHART_PALETTE[9]);
        // Palette wraps after 10 distinct categories.
        assert_eq!(buckets[10].color, CHART_PALETTE[0]);
    }

    #[test]
    fn most_common_breaks_ties_by_first_seen() {
        let buckets = vec![
            CategoryBucket { name: "Theft".into(), value: 3, color: "#000" },
            CategoryBucket { name: "Curfew".into(), value: 3, color: "#000" },
            CategoryBucket { name: "Noise".into(), value: 1, color: "#000" },
        ];
        let top = most_common_category(&buckets).unwrap();
        assert_eq!(top.name, "Theft");
        assert_eq!(top.count, 3);
    }

    #[test]
    fn empty_input_yields_empty_category_buckets_and_no_most_common() {
        let empty: Vec<TestRecord> = Vec::new();
        assert!(bucket_by_category(&empty).is_empty());
        assert!(most_common_category(&[]).is_none());
    }
}
