use crate::pipeline::record::{compare_keys, ListRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> SortDir {
        if s.eq_ignore_ascii_case("desc") {
            SortDir::Desc
        } else {
            SortDir::Asc
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: String,
    pub dir: SortDir,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }

    /// Column-header click semantics: clicking the current sort column
    /// flips the direction, clicking a new column resets to ascending.
    pub fn toggled(&self, field: &str) -> SortSpec {
        if self.field == field {
            SortSpec::new(
                field,
                match self.dir {
                    SortDir::Asc => SortDir::Desc,
                    SortDir::Desc => SortDir::Asc,
                },
            )
        } else {
            SortSpec::new(field, SortDir::Asc)
        }
    }
}

/// Stable sort by the spec's column: ties keep their input order, so an
/// already-sorted list is a no-op.
pub fn sort<R: ListRecord>(records: &mut [&R], spec: &SortSpec) {
    let descending = spec.dir == SortDir::Desc;
    records.sort_by(|a, b| {
        compare_keys(
            &a.sort_key(&spec.field),
            &b.sort_key(&spec.field),
            descending,
        )
    });
}

/// Index variant of [`sort`], used by the store's memo slot.
pub fn sort_indices<R: ListRecord>(records: &[R], indices: &mut [usize], spec: &SortSpec) {
    let descending = spec.dir == SortDir::Desc;
    indices.sort_by(|&a, &b| {
        compare_keys(
            &records[a].sort_key(&spec.field),
            &records[b].sort_key(&spec.field),
            descending,
        )
    });
}

/// 1-based page selection. Callers must reset to page 1 whenever the
/// filter criteria change, and clamp with [`clamp_page`] when the filtered
/// set shrinks or `per_page` changes. `paginate` itself stays pure and
/// returns an empty page for an out-of-range request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page: usize,
    pub per_page: usize,
}

impl PageSpec {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }
}

#[derive(Debug)]
pub struct PageView<'a, T> {
    pub rows: &'a [T],
    pub total_count: usize,
    pub total_pages: usize,
    /// 1-based position of the first row within the filtered set; 0 when
    /// the page is empty.
    pub range_start: usize,
    pub range_end: usize,
}

pub fn total_pages(total_count: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total_count.div_ceil(per_page).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

pub fn paginate<'a, T>(records: &'a [T], spec: &PageSpec) -> PageView<'a, T> {
    let per_page = spec.per_page.max(1);
    let total_count = records.len();
    let total_pages = total_pages(total_count, per_page);

    let start = spec.page.saturating_sub(1).saturating_mul(per_page);
    let end = (start + per_page).min(total_count);

    if start >= total_count {
        return PageView {
            rows: &[],
            total_count,
            total_pages,
            range_start: 0,
            range_end: 0,
        };
    }

    PageView {
        rows: &records[start..end],
        total_count,
        total_pages,
        range_start: start + 1,
        range_end: end,
    }
}
