use crate::api::models::{BlotterStatus, NewBlotter, StatusLabel};
use crate::api::ApiError;
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{
    form_field, read_form, request_context, resolve_controls, respond_page, toast_redirect,
    Controls, ReqContext,
};
use crate::pipeline::{
    bucket_by_category, bucket_by_time, busiest_period, clamp_page, most_common_category, paginate,
    refresh_store, total_pages, FilterCriteria, ListRecord, PageSpec, TimeScope,
};
use crate::query::{filter_query_string, list_query_string, parse_params, ListQuery};
use crate::responses::see_other;
use crate::state::AppState;
use crate::templates::components::{FormState, PagerVm, SortLink};
use crate::templates::pages::blotter::{
    blotter_page, blotter_table, BlotterPageVm, BlotterTableVm, TABLE_ID,
};
use astra::Request;
use chrono::Datelike;

const SCREEN: &str = "blotter";
const DEFAULT_SORT: &str = "created_at";

/// Full page load: fetch-on-mount, then derive everything client-side.
pub fn page(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let q = ListQuery::from_params(&params);
    let controls = resolve_controls(state, &ctx, SCREEN, DEFAULT_SORT, &q);

    refresh_store(&state.blotters, SCREEN, || {
        state.client.list_blotters(&ctx.session.token)
    })?;

    let markup = render_page(
        state,
        &q,
        &controls,
        FormState::empty(),
        params.get("err").cloned(),
    );
    respond_page(&ctx, markup)
}

/// htmx partial: any filter/sort/page change re-derives the table from
/// the snapshot already in memory, with no backend round trip.
pub fn table(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let q = ListQuery::from_params(&params);
    let controls = resolve_controls(state, &ctx, SCREEN, DEFAULT_SORT, &q);

    ensure_loaded(state, &ctx)?;

    let mut store = state.blotters.lock().unwrap_or_else(|e| e.into_inner());
    let rows = store.view(&q.criteria, &controls.sort);
    let markup = table_markup(&rows, &q, &controls);
    drop(store);
    respond_page(&ctx, markup)
}

pub fn create(req: &mut Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let form = read_form(req)?;

    let payload = NewBlotter {
        complainant_name: form_field(&form, "complainant_name"),
        respondent_name: form_field(&form, "respondent_name"),
        complaint_type: form_field(&form, "complaint_type"),
        incident_location: form_field(&form, "incident_location"),
        incident_date: form_field(&form, "incident_date"),
    };

    match state.client.create_blotter(&ctx.session.token, &payload) {
        Ok(()) => {
            refresh_store(&state.blotters, SCREEN, || {
                state.client.list_blotters(&ctx.session.token)
            })?;
            see_other("/blotter")
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(ApiError::Validation(errors)) => {
            // Inline re-render: modal stays open, fields keep their values.
            let markup = render_page(
                state,
                &ListQuery::from_params(&std::collections::HashMap::new()),
                &Controls::defaults(DEFAULT_SORT),
                FormState::rejected(errors, form),
                None,
            );
            respond_page(&ctx, markup)
        }
        Err(e) => toast_redirect("/blotter", &ServerError::from(e).to_string()),
    }
}

pub fn set_status(req: &mut Request, state: &AppState, id: i64) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let next = params.get("next").map(String::as_str).unwrap_or("/blotter");
    // Only same-screen redirects; anything else smells like a crafted link.
    let next = if next.starts_with('/') { next } else { "/blotter" };

    let form = read_form(req)?;
    let status = BlotterStatus::parse(&form_field(&form, "status"));

    match state
        .client
        .update_blotter_status(&ctx.session.token, id, status)
    {
        Ok(()) => {
            refresh_store(&state.blotters, SCREEN, || {
                state.client.list_blotters(&ctx.session.token)
            })?;
            see_other(next)
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(e) => toast_redirect(next, &ServerError::from(e).to_string()),
    }
}

pub fn delete(req: &Request, state: &AppState, id: i64) -> ResultResp {
    let ctx = request_context(req)?;

    match state.client.delete_blotter(&ctx.session.token, id) {
        Ok(()) => {
            refresh_store(&state.blotters, SCREEN, || {
                state.client.list_blotters(&ctx.session.token)
            })?;
            see_other("/blotter")
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(e) => toast_redirect("/blotter", &ServerError::from(e).to_string()),
    }
}

/// First partial after a cold start has no snapshot yet; load one.
fn ensure_loaded(state: &AppState, ctx: &ReqContext) -> Result<(), ServerError> {
    let loaded = state
        .blotters
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .has_loaded();
    if !loaded {
        refresh_store(&state.blotters, SCREEN, || {
            state.client.list_blotters(&ctx.session.token)
        })?;
    }
    Ok(())
}

fn render_page(
    state: &AppState,
    q: &ListQuery,
    controls: &Controls,
    form: FormState,
    toast: Option<String>,
) -> maud::Markup {
    let mut store = state.blotters.lock().unwrap_or_else(|e| e.into_inner());
    let fetch_error = store.last_error().map(str::to_string);

    let mut categories: Vec<String> = Vec::new();
    let mut years: Vec<i32> = Vec::new();
    for r in store.snapshot() {
        if let Some(c) = r.category_text() {
            if !categories.iter().any(|x| x == c) {
                categories.push(c.to_string());
            }
        }
        if let Some(d) = r.event_date() {
            if !years.contains(&d.year()) {
                years.push(d.year());
            }
        }
    }
    categories.sort();
    years.sort_unstable_by(|a, b| b.cmp(a));

    let rows = store.view(&q.criteria, &controls.sort);
    let filtered_count = rows.len();

    let today = chrono::Local::now().date_naive();
    let (scope, title) = time_scope(&q.criteria, today);
    let time_series = bucket_by_time(rows.iter().copied(), &scope);
    let by_type = bucket_by_category(rows.iter().copied());
    let top_type = most_common_category(&by_type);
    let busiest = busiest_period(&time_series);

    let table = table_markup(&rows, q, controls);

    blotter_page(&BlotterPageVm {
        criteria: &q.criteria,
        per_page: controls.per_page,
        per_page_choices: &crate::prefs::PER_PAGE_CHOICES,
        categories,
        years,
        fetch_error: fetch_error.as_deref(),
        time_series,
        time_series_title: title,
        by_type,
        top_type,
        busiest,
        filtered_count,
        form,
        toast,
        table,
    })
}

fn table_markup(
    rows: &[&crate::api::models::BlotterRecord],
    q: &ListQuery,
    controls: &Controls,
) -> maud::Markup {
    let page = clamp_page(q.page, total_pages(rows.len(), controls.per_page));
    let view = paginate(rows, &PageSpec::new(page, controls.per_page));

    let list_query = list_query_string(&q.criteria, &controls.sort, controls.per_page);
    let filter_query = filter_query_string(&q.criteria, controls.per_page);
    let target = format!("#{TABLE_ID}");

    blotter_table(&BlotterTableVm {
        rows: view.rows,
        sort_ctx: SortLink {
            base: "/blotter/table",
            target: &target,
            query: &filter_query,
            current: &controls.sort,
        },
        pager: PagerVm {
            base: "/blotter/table",
            target: &target,
            query: &list_query,
            page,
            total_pages: view.total_pages,
            total_count: view.total_count,
            range_start: view.range_start,
            range_end: view.range_end,
        },
    })
}

/// Chart scope follows the active date filters: a month gets daily
/// buckets, a year gets monthly ones, no date filter means a rolling
/// 12-month window ending today.
fn time_scope(criteria: &FilterCriteria, today: chrono::NaiveDate) -> (TimeScope, String) {
    match (criteria.year, criteria.month) {
        (Some(year), Some(month)) => (
            TimeScope::Month { year, month },
            format!("Daily records, {year}-{month:02}"),
        ),
        (Some(year), None) => (TimeScope::Year(year), format!("Monthly records, {year}")),
        (None, Some(month)) => (
            TimeScope::Month {
                year: today.year(),
                month,
            },
            format!("Daily records, {}-{month:02}", today.year()),
        ),
        (None, None) => (
            TimeScope::Trailing12 { end: today },
            "Records, last 12 months".to_string(),
        ),
    }
}
