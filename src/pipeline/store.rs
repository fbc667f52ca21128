use crate::pipeline::filter::{filter_indices, FilterCriteria};
use crate::pipeline::page::{sort_indices, SortSpec};
use crate::pipeline::record::ListRecord;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Authoritative in-memory snapshot of one screen's records.
///
/// The backend owns the data; this store only holds the last successfully
/// fetched collection. Every successful fetch replaces the whole snapshot
/// (no merging, no optimistic edits) and bumps the generation. A failed
/// fetch leaves the stale-but-consistent snapshot in place and records the
/// error for the screen to banner.
pub struct RecordStore<R> {
    snapshot: Vec<R>,
    generation: u64,
    fetched_at: Option<Instant>,
    last_error: Option<String>,
    memo: Option<ViewMemo>,
}

/// One-slot memo of the filtered+sorted order, keyed by the inputs that
/// affect it. Unrelated re-renders (page changes, chart toggles) reuse the
/// cached order instead of re-filtering the whole snapshot.
struct ViewMemo {
    generation: u64,
    criteria: FilterCriteria,
    sort: SortSpec,
    order: Vec<usize>,
}

impl<R: ListRecord> RecordStore<R> {
    pub fn new() -> Self {
        Self {
            snapshot: Vec::new(),
            generation: 0,
            fetched_at: None,
            last_error: None,
            memo: None,
        }
    }

    pub fn snapshot(&self) -> &[R] {
        &self.snapshot
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_loaded(&self) -> bool {
        self.fetched_at.is_some()
    }

    pub fn is_stale(&self, ttl: Duration) -> bool {
        match self.fetched_at {
            Some(t) => t.elapsed() >= ttl,
            None => true,
        }
    }

    /// Liveness token for a refresh about to start. A refresh result is
    /// only committed if no newer snapshot landed in the meantime.
    pub fn begin_refresh(&self) -> u64 {
        self.generation
    }

    /// Full snapshot replacement. Returns false (and discards the records)
    /// when `started_gen` is no longer current, so a slow fetch can never
    /// clobber a newer snapshot.
    pub fn commit(&mut self, started_gen: u64, records: Vec<R>) -> bool {
        if started_gen != self.generation {
            return false;
        }
        self.snapshot = records;
        self.generation += 1;
        self.fetched_at = Some(Instant::now());
        self.last_error = None;
        self.memo = None;
        true
    }

    pub fn mark_fetch_failed(&mut self, msg: String) {
        self.last_error = Some(msg);
    }

    /// Filtered + sorted view of the current snapshot, in a deterministic
    /// order. Memoized on (generation, criteria, sort); pagination is done
    /// by the caller over the returned rows, which is cheap.
    pub fn view(&mut self, criteria: &FilterCriteria, sort: &SortSpec) -> Vec<&R> {
        let fresh = match &self.memo {
            Some(m) => {
                m.generation != self.generation || m.criteria != *criteria || m.sort != *sort
            }
            None => true,
        };

        if fresh {
            let mut order = filter_indices(&self.snapshot, criteria);
            sort_indices(&self.snapshot, &mut order, sort);
            self.memo = Some(ViewMemo {
                generation: self.generation,
                criteria: criteria.clone(),
                sort: sort.clone(),
                order,
            });
        }

        let order = &self.memo.as_ref().unwrap().order;
        order.iter().map(|&i| &self.snapshot[i]).collect()
    }
}

impl<R: ListRecord> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one load+replace cycle against a shared store. The fetch itself
/// runs without the lock held; the commit is generation-checked so a
/// result that arrives after a newer snapshot landed is discarded.
///
/// Fetch failures are non-fatal: the stale snapshot stays and the error
/// is recorded for the banner. The one exception is a 401, which returns
/// `Err` so the caller's `?` lands in the process-wide login redirect.
pub fn refresh_store<R, F>(
    store: &Mutex<RecordStore<R>>,
    label: &str,
    fetch: F,
) -> Result<(), crate::api::ApiError>
where
    R: ListRecord,
    F: FnOnce() -> Result<Vec<R>, crate::api::ApiError>,
{
    let started = store.lock().unwrap_or_else(|e| e.into_inner()).begin_refresh();

    match fetch() {
        Ok(records) => {
            let mut guard = store.lock().unwrap_or_else(|e| e.into_inner());
            if !guard.commit(started, records) {
                eprintln!("Discarding stale {label} refresh (newer snapshot already landed)");
            }
            Ok(())
        }
        Err(crate::api::ApiError::Unauthorized) => Err(crate::api::ApiError::Unauthorized),
        Err(e) => {
            eprintln!("{label} fetch failed: {e}");
            store
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .mark_fetch_failed(e.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::page::{SortDir, SortSpec};
    use crate::pipeline::testutil::{rec, TestRecord};

    fn sample() -> Vec<TestRecord> {
        vec![
            rec("b", "Pending", "Theft"),
            rec("a", "Completed", "Theft"),
            rec("c", "Pending", "Noise Complaint"),
        ]
    }

    #[test]
    fn commit_replaces_snapshot_and_clears_error() {
        let mut store: RecordStore<TestRecord> = RecordStore::new();
        store.mark_fetch_failed("boom".into());
        assert_eq!(store.last_error(), Some("boom"));

        let gen = store.begin_refresh();
        assert!(store.commit(gen, sample()));
        assert_eq!(store.snapshot().len(), 3);
        assert!(store.last_error().is_none());
        assert!(store.has_loaded());
    }

    #[test]
    fn failed_fetch_keeps_previous_snapshot() {
        let mut store = RecordStore::new();
        let gen = store.begin_refresh();
        store.commit(gen, sample());

        store.mark_fetch_failed("timeout".into());
        assert_eq!(store.snapshot().len(), 3);
        assert_eq!(store.last_error(), Some("timeout"));
    }

    #[test]
    fn stale_refresh_from_superseded_generation_is_discarded() {
        let mut store = RecordStore::new();
        let slow = store.begin_refresh();

        // A newer refresh completes first.
        let fast = store.begin_refresh();
        assert!(store.commit(fast, sample()));

        // The slow one must not clobber it.
        assert!(!store.commit(slow, vec![rec("stale", "Pending", "x")]));
        assert_eq!(store.snapshot().len(), 3);
    }

    #[test]
    fn view_is_memoized_until_inputs_change() {
        let mut store = RecordStore::new();
        let gen = store.begin_refresh();
        store.commit(gen, sample());

        let criteria = FilterCriteria::default();
        let sort = SortSpec::new("name", SortDir::Asc);

        let first: Vec<String> = store
            .view(&criteria, &sort)
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(first, ["a", "b", "c"]);

        // Same inputs reuse the memo slot.
        assert!(store.memo.is_some());
        let memoized_len = store.memo.as_ref().unwrap().order.len();
        let again = store.view(&criteria, &sort);
        assert_eq!(again.len(), memoized_len);

        // New criteria recompute.
        let filtered = store.view(
            &FilterCriteria {
                status: Some("Pending".into()),
                ..Default::default()
            },
            &sort,
        );
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn new_snapshot_invalidates_the_memo() {
        let mut store = RecordStore::new();
        let gen = store.begin_refresh();
        store.commit(gen, sample());

        let criteria = FilterCriteria::default();
        let sort = SortSpec::new("name", SortDir::Asc);
        assert_eq!(store.view(&criteria, &sort).len(), 3);

        let gen = store.begin_refresh();
        store.commit(gen, vec![rec("only", "Pending", "Theft")]);
        assert_eq!(store.view(&criteria, &sort).len(), 1);
    }
}
