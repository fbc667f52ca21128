use crate::api::models::{Announcement, NewAnnouncement};
use crate::api::ApiError;
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{
    form_field, read_form, request_context, resolve_controls, respond_page, toast_redirect,
    Controls, ReqContext,
};
use crate::pipeline::{
    bucket_by_category, clamp_page, paginate, refresh_store, total_pages, ListRecord, PageSpec,
};
use crate::query::{filter_query_string, list_query_string, parse_params, ListQuery};
use crate::responses::see_other;
use crate::state::AppState;
use crate::templates::components::{FormState, PagerVm, SortLink};
use crate::templates::pages::announcements::{
    announcements_page, announcements_table, AnnouncementsPageVm, AnnouncementsTableVm, TABLE_ID,
};
use astra::Request;

const SCREEN: &str = "announcements";
const DEFAULT_SORT: &str = "created_at";

pub fn page(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let q = ListQuery::from_params(&params);
    let controls = resolve_controls(state, &ctx, SCREEN, DEFAULT_SORT, &q);

    refresh_store(&state.announcements, SCREEN, || {
        state.client.list_announcements(&ctx.session.token)
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

pub fn table(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let q = ListQuery::from_params(&params);
    let controls = resolve_controls(state, &ctx, SCREEN, DEFAULT_SORT, &q);

    ensure_loaded(state, &ctx)?;

    let mut store = state.announcements.lock().unwrap_or_else(|e| e.into_inner());
    let rows = store.view(&q.criteria, &controls.sort);
    let markup = table_markup(&rows, &q, &controls);
    drop(store);
    respond_page(&ctx, markup)
}

pub fn create(req: &mut Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let form = read_form(req)?;

    let payload = NewAnnouncement {
        title: form_field(&form, "title"),
        body: form_field(&form, "body"),
        audience: form_field(&form, "audience"),
        event_date: form_field(&form, "event_date"),
        status: form_field(&form, "status"),
    };

    match state.client.create_announcement(&ctx.session.token, &payload) {
        Ok(()) => {
            refresh_store(&state.announcements, SCREEN, || {
                state.client.list_announcements(&ctx.session.token)
            })?;
            see_other("/announcements")
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(ApiError::Validation(errors)) => {
            let markup = render_page(
                state,
                &ListQuery::from_params(&std::collections::HashMap::new()),
                &Controls::defaults(DEFAULT_SORT),
                FormState::rejected(errors, form),
                None,
            );
            respond_page(&ctx, markup)
        }
        Err(e) => toast_redirect("/announcements", &ServerError::from(e).to_string()),
    }
}

pub fn delete(req: &Request, state: &AppState, id: i64) -> ResultResp {
    let ctx = request_context(req)?;

    match state.client.delete_announcement(&ctx.session.token, id) {
        Ok(()) => {
            refresh_store(&state.announcements, SCREEN, || {
                state.client.list_announcements(&ctx.session.token)
            })?;
            see_other("/announcements")
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(e) => toast_redirect("/announcements", &ServerError::from(e).to_string()),
    }
}

fn ensure_loaded(state: &AppState, ctx: &ReqContext) -> Result<(), ServerError> {
    let loaded = state
        .announcements
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .has_loaded();
    if !loaded {
        refresh_store(&state.announcements, SCREEN, || {
            state.client.list_announcements(&ctx.session.token)
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
    let mut store = state.announcements.lock().unwrap_or_else(|e| e.into_inner());
    let fetch_error = store.last_error().map(str::to_string);

    let mut audiences: Vec<String> = Vec::new();
    for a in store.snapshot() {
        if let Some(aud) = a.category_text() {
            if !audiences.iter().any(|x| x == aud) {
                audiences.push(aud.to_string());
            }
        }
    }
    audiences.sort();

    let rows = store.view(&q.criteria, &controls.sort);
    let by_audience = bucket_by_category(rows.iter().copied());
    let table = table_markup(&rows, q, controls);

    announcements_page(&AnnouncementsPageVm {
        criteria: &q.criteria,
        per_page: controls.per_page,
        per_page_choices: &crate::prefs::PER_PAGE_CHOICES,
        view_mode: &controls.view,
        audiences,
        fetch_error: fetch_error.as_deref(),
        by_audience,
        form,
        toast,
        table,
    })
}

fn table_markup(rows: &[&Announcement], q: &ListQuery, controls: &Controls) -> maud::Markup {
    let page = clamp_page(q.page, total_pages(rows.len(), controls.per_page));
    let view = paginate(rows, &PageSpec::new(page, controls.per_page));

    // View mode rides along so a page flip keeps cards as cards.
    let mut list_query = list_query_string(&q.criteria, &controls.sort, controls.per_page);
    let mut filter_query = filter_query_string(&q.criteria, controls.per_page);
    if controls.view != "table" {
        list_query.push_str(&format!("&view={}", controls.view));
        filter_query.push_str(&format!("&view={}", controls.view));
    }
    let target = format!("#{TABLE_ID}");

    announcements_table(&AnnouncementsTableVm {
        rows: view.rows,
        sort_ctx: SortLink {
            base: "/announcements/table",
            target: &target,
            query: &filter_query,
            current: &controls.sort,
        },
        pager: PagerVm {
            base: "/announcements/table",
            target: &target,
            query: &list_query,
            page,
            total_pages: view.total_pages,
            total_count: view.total_count,
            range_start: view.range_start,
            range_end: view.range_end,
        },
        view_mode: &controls.view,
    })
}
