use crate::api::models::{Appointment, AppointmentStatus, NewAppointment, StatusLabel};
use crate::api::ApiError;
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{
    form_field, read_form, request_context, resolve_controls, respond_page, toast_redirect,
    Controls, ReqContext,
};
use crate::pipeline::{
    bucket_by_category, bucket_by_time, clamp_page, most_common_category, paginate, refresh_store,
    total_pages, ListRecord, PageSpec, TimeScope,
};
use crate::query::{filter_query_string, list_query_string, parse_params, ListQuery};
use crate::responses::see_other;
use crate::state::AppState;
use crate::templates::components::{FormState, PagerVm, SortLink};
use crate::templates::pages::appointments::{
    appointments_page, appointments_table, AppointmentsPageVm, AppointmentsTableVm, TABLE_ID,
};
use astra::Request;

const SCREEN: &str = "appointments";
const DEFAULT_SORT: &str = "preferred_date";

pub fn page(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let q = ListQuery::from_params(&params);
    let controls = resolve_controls(state, &ctx, SCREEN, DEFAULT_SORT, &q);

    refresh_store(&state.appointments, SCREEN, || {
        state.client.list_appointments(&ctx.session.token)
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

    let mut store = state.appointments.lock().unwrap_or_else(|e| e.into_inner());
    let rows = store.view(&q.criteria, &controls.sort);
    let markup = table_markup(&rows, &q, &controls);
    drop(store);
    respond_page(&ctx, markup)
}

pub fn create(req: &mut Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let form = read_form(req)?;

    let payload = NewAppointment {
        requester_name: form_field(&form, "requester_name"),
        purpose: form_field(&form, "purpose"),
        preferred_date: form_field(&form, "preferred_date"),
        preferred_time: form_field(&form, "preferred_time"),
    };

    match state.client.create_appointment(&ctx.session.token, &payload) {
        Ok(()) => {
            refresh_store(&state.appointments, SCREEN, || {
                state.client.list_appointments(&ctx.session.token)
            })?;
            see_other("/appointments")
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
        Err(e) => toast_redirect("/appointments", &ServerError::from(e).to_string()),
    }
}

pub fn set_status(req: &mut Request, state: &AppState, id: i64) -> ResultResp {
    let ctx = request_context(req)?;
    let form = read_form(req)?;
    let status = AppointmentStatus::parse(&form_field(&form, "status"));

    match state
        .client
        .update_appointment_status(&ctx.session.token, id, status)
    {
        Ok(()) => {
            refresh_store(&state.appointments, SCREEN, || {
                state.client.list_appointments(&ctx.session.token)
            })?;
            see_other("/appointments")
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(e) => toast_redirect("/appointments", &ServerError::from(e).to_string()),
    }
}

pub fn delete(req: &Request, state: &AppState, id: i64) -> ResultResp {
    let ctx = request_context(req)?;

    match state.client.delete_appointment(&ctx.session.token, id) {
        Ok(()) => {
            refresh_store(&state.appointments, SCREEN, || {
                state.client.list_appointments(&ctx.session.token)
            })?;
            see_other("/appointments")
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(e) => toast_redirect("/appointments", &ServerError::from(e).to_string()),
    }
}

fn ensure_loaded(state: &AppState, ctx: &ReqContext) -> Result<(), ServerError> {
    let loaded = state
        .appointments
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .has_loaded();
    if !loaded {
        refresh_store(&state.appointments, SCREEN, || {
            state.client.list_appointments(&ctx.session.token)
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
    let mut store = state.appointments.lock().unwrap_or_else(|e| e.into_inner());
    let fetch_error = store.last_error().map(str::to_string);

    let mut purposes: Vec<String> = Vec::new();
    let mut pending_count = 0;
    for a in store.snapshot() {
        if let Some(p) = a.category_text() {
            if !purposes.iter().any(|x| x == p) {
                purposes.push(p.to_string());
            }
        }
        if a.status == AppointmentStatus::Pending {
            pending_count += 1;
        }
    }
    purposes.sort();

    let rows = store.view(&q.criteria, &controls.sort);

    let today = chrono::Local::now().date_naive();
    let trailing = bucket_by_time(rows.iter().copied(), &TimeScope::Trailing12 { end: today });
    let by_purpose = bucket_by_category(rows.iter().copied());
    let top_purpose = most_common_category(&by_purpose);

    let table = table_markup(&rows, q, controls);

    appointments_page(&AppointmentsPageVm {
        criteria: &q.criteria,
        per_page: controls.per_page,
        per_page_choices: &crate::prefs::PER_PAGE_CHOICES,
        purposes,
        fetch_error: fetch_error.as_deref(),
        trailing,
        top_purpose,
        pending_count,
        form,
        toast,
        table,
    })
}

fn table_markup(rows: &[&Appointment], q: &ListQuery, controls: &Controls) -> maud::Markup {
    let page = clamp_page(q.page, total_pages(rows.len(), controls.per_page));
    let view = paginate(rows, &PageSpec::new(page, controls.per_page));

    let list_query = list_query_string(&q.criteria, &controls.sort, controls.per_page);
    let filter_query = filter_query_string(&q.criteria, controls.per_page);
    let target = format!("#{TABLE_ID}");

    appointments_table(&AppointmentsTableVm {
        rows: view.rows,
        sort_ctx: SortLink {
            base: "/appointments/table",
            target: &target,
            query: &filter_query,
            current: &controls.sort,
        },
        pager: PagerVm {
            base: "/appointments/table",
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
