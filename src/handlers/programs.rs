use crate::api::models::{NewBeneficiary, NewProgram, Program, ProgramStatus, StatusLabel};
use crate::api::ApiError;
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{
    form_field, read_form, request_context, resolve_controls, respond_page, toast_redirect,
    Controls, ReqContext,
};
use crate::pipeline::{
    clamp_page, filter, paginate, refresh_store, sort, total_pages, FilterCriteria, ListRecord,
    PageSpec, SortDir, SortSpec,
};
use crate::query::{filter_query_string, list_query_string, parse_params, ListQuery};
use crate::responses::see_other;
use crate::state::AppState;
use crate::templates::components::{FormState, PagerVm, SortLink};
use crate::templates::pages::programs::{
    program_detail_page, programs_page, programs_table, ProgramDetailVm, ProgramsPageVm,
    ProgramsTableVm, TABLE_ID,
};
use astra::Request;

const SCREEN: &str = "programs";
const DEFAULT_SORT: &str = "start_date";

pub fn page(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let q = ListQuery::from_params(&params);
    let controls = resolve_controls(state, &ctx, SCREEN, DEFAULT_SORT, &q);

    refresh_store(&state.programs, SCREEN, || {
        state.client.list_programs(&ctx.session.token)
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

    let mut store = state.programs.lock().unwrap_or_else(|e| e.into_inner());
    let rows = store.view(&q.criteria, &controls.sort);
    let markup = table_markup(&rows, &q, &controls);
    drop(store);
    respond_page(&ctx, markup)
}

pub fn create(req: &mut Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let form = read_form(req)?;

    let payload = NewProgram {
        name: form_field(&form, "name"),
        category: form_field(&form, "category"),
        start_date: form_field(&form, "start_date"),
        status: form_field(&form, "status"),
    };

    match state.client.create_program(&ctx.session.token, &payload) {
        Ok(()) => {
            refresh_store(&state.programs, SCREEN, || {
                state.client.list_programs(&ctx.session.token)
            })?;
            see_other("/programs")
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
        Err(e) => toast_redirect("/programs", &ServerError::from(e).to_string()),
    }
}

pub fn set_status(req: &mut Request, state: &AppState, id: i64) -> ResultResp {
    let ctx = request_context(req)?;
    let form = read_form(req)?;
    let status = ProgramStatus::parse(&form_field(&form, "status"));

    match state
        .client
        .update_program_status(&ctx.session.token, id, status)
    {
        Ok(()) => {
            refresh_store(&state.programs, SCREEN, || {
                state.client.list_programs(&ctx.session.token)
            })?;
            see_other("/programs")
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(e) => toast_redirect("/programs", &ServerError::from(e).to_string()),
    }
}

/// Program detail: header info from the programs snapshot, beneficiaries
/// fetched per visit (small lists, no snapshot cache).
pub fn detail(req: &Request, state: &AppState, id: i64) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let query = params.get("q").map(|s| s.trim().to_string()).unwrap_or_default();

    ensure_loaded(state, &ctx)?;

    let beneficiaries = match state.client.list_beneficiaries(&ctx.session.token, id) {
        Ok(list) => Ok(list),
        Err(ApiError::Unauthorized) => return Err(ServerError::from(ApiError::Unauthorized)),
        Err(e) => Err(e.to_string()),
    };

    let store = state.programs.lock().unwrap_or_else(|e| e.into_inner());
    let Some(program) = store.snapshot().iter().find(|p| p.id == id) else {
        return Err(ServerError::NotFound);
    };

    let criteria = FilterCriteria {
        query: query.clone(),
        ..Default::default()
    };
    let (list, fetch_error) = match &beneficiaries {
        Ok(list) => {
            let mut rows = filter(list, &criteria);
            sort(&mut rows, &SortSpec::new("name", SortDir::Asc));
            (rows, None)
        }
        Err(msg) => (Vec::new(), Some(msg.as_str())),
    };

    let markup = program_detail_page(&ProgramDetailVm {
        program,
        beneficiaries: list,
        query: &query,
        fetch_error,
        form: FormState::empty(),
        toast: params.get("err").cloned(),
    });
    respond_page(&ctx, markup)
}

pub fn enroll_beneficiary(req: &mut Request, state: &AppState, program_id: i64) -> ResultResp {
    let ctx = request_context(req)?;
    let form = read_form(req)?;

    let payload = NewBeneficiary {
        program_id,
        full_name: form_field(&form, "full_name"),
        purok: form_field(&form, "purok"),
        contact_number: form_field(&form, "contact_number"),
    };

    match state.client.create_beneficiary(&ctx.session.token, &payload) {
        Ok(()) => {
            // Beneficiary counts live on the program rows; re-fetch those too.
            refresh_store(&state.programs, SCREEN, || {
                state.client.list_programs(&ctx.session.token)
            })?;
            see_other(&format!("/programs/{program_id}"))
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(ApiError::Validation(errors)) => {
            render_detail_with_form(
                req,
                state,
                &ctx,
                program_id,
                FormState::rejected(errors, form),
            )
        }
        Err(e) => toast_redirect(
            &format!("/programs/{program_id}"),
            &ServerError::from(e).to_string(),
        ),
    }
}

pub fn remove_beneficiary(req: &Request, state: &AppState, program_id: i64, id: i64) -> ResultResp {
    let ctx = request_context(req)?;

    match state
        .client
        .remove_beneficiary(&ctx.session.token, program_id, id)
    {
        Ok(()) => {
            refresh_store(&state.programs, SCREEN, || {
                state.client.list_programs(&ctx.session.token)
            })?;
            see_other(&format!("/programs/{program_id}"))
        }
        Err(ApiError::Unauthorized) => Err(ServerError::from(ApiError::Unauthorized)),
        Err(e) => toast_redirect(
            &format!("/programs/{program_id}"),
            &ServerError::from(e).to_string(),
        ),
    }
}

fn render_detail_with_form(
    _req: &Request,
    state: &AppState,
    ctx: &ReqContext,
    program_id: i64,
    form: FormState,
) -> ResultResp {
    let beneficiaries = state
        .client
        .list_beneficiaries(&ctx.session.token, program_id)
        .unwrap_or_default();

    let store = state.programs.lock().unwrap_or_else(|e| e.into_inner());
    let Some(program) = store.snapshot().iter().find(|p| p.id == program_id) else {
        return Err(ServerError::NotFound);
    };

    let markup = program_detail_page(&ProgramDetailVm {
        program,
        beneficiaries: beneficiaries.iter().collect(),
        query: "",
        fetch_error: None,
        form,
        toast: None,
    });
    respond_page(ctx, markup)
}

fn ensure_loaded(state: &AppState, ctx: &ReqContext) -> Result<(), ServerError> {
    let loaded = state
        .programs
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .has_loaded();
    if !loaded {
        refresh_store(&state.programs, SCREEN, || {
            state.client.list_programs(&ctx.session.token)
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
    let mut store = state.programs.lock().unwrap_or_else(|e| e.into_inner());
    let fetch_error = store.last_error().map(str::to_string);

    let mut categories: Vec<String> = Vec::new();
    for p in store.snapshot() {
        if let Some(c) = p.category_text() {
            if !categories.iter().any(|x| x == c) {
                categories.push(c.to_string());
            }
        }
    }
    categories.sort();

    let rows = store.view(&q.criteria, &controls.sort);
    let table = table_markup(&rows, q, controls);

    programs_page(&ProgramsPageVm {
        criteria: &q.criteria,
        categories,
        fetch_error: fetch_error.as_deref(),
        form,
        toast,
        table,
    })
}

fn table_markup(rows: &[&Program], q: &ListQuery, controls: &Controls) -> maud::Markup {
    let page = clamp_page(q.page, total_pages(rows.len(), controls.per_page));
    let view = paginate(rows, &PageSpec::new(page, controls.per_page));

    let list_query = list_query_string(&q.criteria, &controls.sort, controls.per_page);
    let filter_query = filter_query_string(&q.criteria, controls.per_page);
    let target = format!("#{TABLE_ID}");

    programs_table(&ProgramsTableVm {
        rows: view.rows,
        sort_ctx: SortLink {
            base: "/programs/table",
            target: &target,
            query: &filter_query,
            current: &controls.sort,
        },
        pager: PagerVm {
            base: "/programs/table",
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
