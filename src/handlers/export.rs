use crate::errors::ResultResp;
use crate::handlers::{request_context, resolve_controls};
use crate::pipeline::refresh_store;
use crate::query::{parse_params, ListQuery};
use crate::spreadsheets::export_blotters_xlsx;
use crate::state::AppState;
use astra::Request;

/// Download the blotter list exactly as filtered and sorted on screen:
/// every page of it, not just the visible slice.
pub fn blotter_xlsx(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let params = parse_params(req.uri().query());
    let q = ListQuery::from_params(&params);
    let controls = resolve_controls(state, &ctx, "blotter", "created_at", &q);

    refresh_store(&state.blotters, "blotter export", || {
        state.client.list_blotters(&ctx.session.token)
    })?;

    let mut store = state.blotters.lock().unwrap_or_else(|e| e.into_inner());
    let rows = store.view(&q.criteria, &controls.sort);
    println!("Exporting {} blotter record(s) to xlsx", rows.len());
    export_blotters_xlsx(&rows)
}
