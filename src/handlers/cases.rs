use crate::api::models::{BlotterRecord, BlotterStatus};
use crate::errors::ResultResp;
use crate::handlers::{request_context, resolve_controls, respond_page, Controls};
use crate::pipeline::{clamp_page, paginate, refresh_store, total_pages, PageSpec};
use crate::query::{filter_query_string, list_query_string, parse_params, ListQuery};
use crate::state::AppState;
use crate::templates::components::{PagerVm, SortLink};
use crate::templates::pages::cases::{cases_page, cases_table, CasesPageVm, CasesTableVm, TABLE_ID};
use astra::Request;
use std::time::Duration;

const SCREEN: &str = "cases";
const DEFAULT_SORT: &str = "hearing_date";

/// The auto-refresh poll reuses the blotter store; anything fresher than
/// this is served as-is.
const POLL_TTL: Duration = Duration::from_secs(25);

pub fn page(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let q = ListQuery::from_params(&params);
    let controls = resolve_controls(state, &ctx, SCREEN, DEFAULT_SORT, &q);

    refresh_store(&state.blotters, SCREEN, || {
        state.client.list_blotters(&ctx.session.token)
    })?;

    let mut store = state.blotters.lock().unwrap_or_else(|e| e.into_inner());
    let fetch_error = store.last_error().map(str::to_string);

    let scheduled_count = count_status(store.snapshot(), BlotterStatus::Scheduled);
    let ongoing_count = count_status(store.snapshot(), BlotterStatus::Ongoing);

    let rows = case_rows(&mut store, &q, &controls);
    let table = table_markup(&rows, &q, &controls);
    drop(store);

    let markup = cases_page(&CasesPageVm {
        criteria: &q.criteria,
        fetch_error: fetch_error.as_deref(),
        scheduled_count,
        ongoing_count,
        toast: params.get("err").cloned(),
        table,
    });
    respond_page(&ctx, markup)
}

/// Serves both filter changes and the 30-second poll. The poll re-runs
/// the same load+recompute cycle; the store's generation check makes a
/// late poll result harmless.
pub fn table(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let q = ListQuery::from_params(&params);
    let controls = resolve_controls(state, &ctx, SCREEN, DEFAULT_SORT, &q);

    let stale = state
        .blotters
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .is_stale(POLL_TTL);
    if stale {
        refresh_store(&state.blotters, SCREEN, || {
            state.client.list_blotters(&ctx.session.token)
        })?;
    }

    let mut store = state.blotters.lock().unwrap_or_else(|e| e.into_inner());
    let rows = case_rows(&mut store, &q, &controls);
    let markup = table_markup(&rows, &q, &controls);
    drop(store);
    respond_page(&ctx, markup)
}

fn count_status(records: &[BlotterRecord], status: BlotterStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

/// This screen is scoped to the hearing flow: an explicit status filter
/// narrows within it, otherwise Scheduled + Ongoing.
fn case_rows<'a>(
    store: &'a mut crate::pipeline::RecordStore<BlotterRecord>,
    q: &ListQuery,
    controls: &Controls,
) -> Vec<&'a BlotterRecord> {
    let rows = store.view(&q.criteria, &controls.sort);
    if q.criteria.status.is_some() {
        rows
    } else {
        rows.into_iter().filter(|r| r.in_hearing_flow()).collect()
    }
}

fn table_markup(rows: &[&BlotterRecord], q: &ListQuery, controls: &Controls) -> maud::Markup {
    let page = clamp_page(q.page, total_pages(rows.len(), controls.per_page));
    let view = paginate(rows, &PageSpec::new(page, controls.per_page));

    let list_query = list_query_string(&q.criteria, &controls.sort, controls.per_page);
    let filter_query = filter_query_string(&q.criteria, controls.per_page);
    let target = format!("#{TABLE_ID}");
    let poll_url = format!("/cases/table?{list_query}&page={page}");

    cases_table(&CasesTableVm {
        rows: view.rows,
        sort_ctx: SortLink {
            base: "/cases/table",
            target: &target,
            query: &filter_query,
            current: &controls.sort,
        },
        pager: PagerVm {
            base: "/cases/table",
            target: &target,
            query: &list_query,
            page,
            total_pages: view.total_pages,
            total_count: view.total_count,
            range_start: view.range_start,
            range_end: view.range_end,
        },
        poll_url: &poll_url,
    })
}
