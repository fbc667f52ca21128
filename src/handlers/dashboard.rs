use crate::api::models::{
    AnnouncementStatus, AppointmentStatus, BlotterStatus, ProgramStatus,
};
use crate::errors::ResultResp;
use crate::handlers::{request_context, respond_page};
use crate::pipeline::{
    bucket_by_category, bucket_by_time, busiest_period, most_common_category, refresh_store,
    TimeScope,
};
use crate::state::AppState;
use crate::templates::pages::dashboard::{dashboard_page, DashboardVm};
use astra::Request;

/// Cross-screen summary. One fetch per collection, then everything is
/// derived in memory.
pub fn page(req: &Request, state: &AppState) -> ResultResp {
    let ctx = request_context(req)?;
    let token = &ctx.session.token;

    refresh_store(&state.blotters, "blotter", || state.client.list_blotters(token))?;
    refresh_store(&state.appointments, "appointments", || {
        state.client.list_appointments(token)
    })?;
    refresh_store(&state.announcements, "announcements", || {
        state.client.list_announcements(token)
    })?;
    refresh_store(&state.programs, "programs", || state.client.list_programs(token))?;

    let mut fetch_errors: Vec<String> = Vec::new();

    let blotters = state.blotters.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(e) = blotters.last_error() {
        fetch_errors.push(e.to_string());
    }
    let open_blotters = blotters
        .snapshot()
        .iter()
        .filter(|r| {
            matches!(
                r.status,
                BlotterStatus::Pending | BlotterStatus::Scheduled | BlotterStatus::Ongoing
            )
        })
        .count();
    let cases_in_hearing = blotters
        .snapshot()
        .iter()
        .filter(|r| r.in_hearing_flow())
        .count();

    let today = chrono::Local::now().date_naive();
    let blotter_trailing = bucket_by_time(
        blotters.snapshot().iter(),
        &TimeScope::Trailing12 { end: today },
    );
    let blotter_by_type = bucket_by_category(blotters.snapshot().iter());
    let top_type = most_common_category(&blotter_by_type);
    let busiest_month = busiest_period(&blotter_trailing);
    drop(blotters);

    let appointments = state.appointments.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(e) = appointments.last_error() {
        fetch_errors.push(e.to_string());
    }
    let pending_appointments = appointments
        .snapshot()
        .iter()
        .filter(|a| a.status == AppointmentStatus::Pending)
        .count();
    drop(appointments);

    let announcements = state.announcements.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(e) = announcements.last_error() {
        fetch_errors.push(e.to_string());
    }
    let posted_announcements = announcements
        .snapshot()
        .iter()
        .filter(|a| a.status == AnnouncementStatus::Posted)
        .count();
    drop(announcements);

    let programs = state.programs.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(e) = programs.last_error() {
        fetch_errors.push(e.to_string());
    }
    let ongoing_programs = programs
        .snapshot()
        .iter()
        .filter(|p| p.status == ProgramStatus::Ongoing)
        .count();
    drop(programs);

    let markup = dashboard_page(&DashboardVm {
        open_blotters,
        cases_in_hearing,
        pending_appointments,
        posted_announcements,
        ongoing_programs,
        blotter_trailing,
        blotter_by_type,
        top_type,
        busiest_month,
        fetch_errors: fetch_errors.iter().map(String::as_str).collect(),
    });
    respond_page(&ctx, markup)
}
