use crate::api::models::{Appointment, AppointmentStatus, StatusLabel};
use crate::pipeline::{FilterCriteria, MostCommon, TimeBucket};
use crate::templates::components::{
    error_banner, field_error, form_error, line_chart, modal, pagination, sort_header, stat_tile,
    toast_banner, FormState, PagerVm, SortLink,
};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub const TABLE_ID: &str = "appointments-table";

pub struct AppointmentsTableVm<'a> {
    pub rows: &'a [&'a Appointment],
    pub sort_ctx: SortLink<'a>,
    pub pager: PagerVm<'a>,
}

pub struct AppointmentsPageVm<'a> {
    pub criteria: &'a FilterCriteria,
    pub per_page: usize,
    pub per_page_choices: &'a [usize],
    pub purposes: Vec<String>,
    pub fetch_error: Option<&'a str>,
    pub trailing: Vec<TimeBucket>,
    pub top_purpose: Option<MostCommon>,
    pub pending_count: usize,
    pub form: FormState,
    pub toast: Option<String>,
    pub table: Markup,
}

pub fn appointments_page(vm: &AppointmentsPageVm) -> Markup {
    desktop_layout(
        "Appointments",
        "/appointments",
        html! {
            main class="container" {
                h1 { "Appointment Requests" }

                @if let Some(err) = vm.fetch_error {
                    (error_banner(err))
                }
                @if let Some(msg) = &vm.toast {
                    (toast_banner(msg))
                }

                section class="stat-row" {
                    (stat_tile("Awaiting schedule", &vm.pending_count.to_string()))
                    (stat_tile(
                        "Most requested",
                        &vm.top_purpose
                            .as_ref()
                            .map(|t| format!("{} ({})", t.name, t.count))
                            .unwrap_or_else(|| "—".to_string()),
                    ))
                }

                section class="chart-row" {
                    (line_chart("Requests, last 12 months", &vm.trailing))
                }

                section class="card" {
                    div class="toolbar" {
                        form
                            class="filter-bar"
                            hx-get="/appointments/table"
                            hx-target=(format!("#{TABLE_ID}"))
                            hx-swap="outerHTML"
                            hx-trigger="change, input delay:300ms"
                        {
                            input
                                type="search"
                                name="q"
                                value=(vm.criteria.query)
                                placeholder="Search requester or ticket…";
                            select name="status" {
                                option value="" selected[vm.criteria.status.is_none()] { "All statuses" }
                                @for status in AppointmentStatus::ALL {
                                    option
                                        value=(status.as_str())
                                        selected[vm.criteria.status.as_deref() == Some(status.as_str())]
                                    { (status.as_str()) }
                                }
                            }
                            select name="category" {
                                option value="" selected[vm.criteria.category.is_none()] { "All purposes" }
                                @for p in &vm.purposes {
                                    option value=(p) selected[vm.criteria.category.as_deref() == Some(p.as_str())] { (p) }
                                }
                            }
                            select name="per_page" {
                                @for n in vm.per_page_choices {
                                    option value=(n) selected[vm.per_page == *n] { (n) " per page" }
                                }
                            }
                        }
                        (modal(
                            "appointment-create",
                            "+ New Request",
                            "Log an appointment request",
                            vm.form.has_errors(),
                            create_form(&vm.form),
                        ))
                    }
                    (vm.table)
                }
            }
        },
    )
}

pub fn appointments_table(vm: &AppointmentsTableVm) -> Markup {
    html! {
        div id=(TABLE_ID) {
            div class="table-wrap" {
                table class="records" {
                    thead {
                        tr {
                            (sort_header(&vm.sort_ctx, "ticket", "Ticket"))
                            (sort_header(&vm.sort_ctx, "requester", "Requester"))
                            (sort_header(&vm.sort_ctx, "purpose", "Purpose"))
                            (sort_header(&vm.sort_ctx, "preferred_date", "Preferred Date"))
                            (sort_header(&vm.sort_ctx, "status", "Status"))
                            th { "Actions" }
                        }
                    }
                    tbody {
                        @if vm.rows.is_empty() {
                            tr { td colspan="6" class="empty-row" { "No appointment requests match." } }
                        }
                        @for appt in vm.rows {
                            tr {
                                td { (appt.ticket_number.as_deref().unwrap_or("—")) }
                                td { (appt.requester_name.as_deref().unwrap_or("—")) }
                                td { (appt.purpose.as_deref().unwrap_or("—")) }
                                td {
                                    (appt.preferred_date.as_deref().unwrap_or("—"))
                                    @if let Some(t) = appt.preferred_time.as_deref() {
                                        " " span class="muted" { (t) }
                                    }
                                }
                                td { (crate::templates::status_badge(appt.status.as_str())) }
                                td class="row-actions" {
                                    form method="post" action=(format!("/appointments/{}/status", appt.id)) {
                                        select name="status" {
                                            @for status in AppointmentStatus::ALL {
                                                option value=(status.as_str()) selected[*status == appt.status] {
                                                    (status.as_str())
                                                }
                                            }
                                        }
                                        button type="submit" class="btn btn-small" { "Set" }
                                    }
                                    form
                                        method="post"
                                        action=(format!("/appointments/{}/delete", appt.id))
                                        onsubmit="return confirm('Delete this request?');"
                                    {
                                        button type="submit" class="btn btn-small btn-danger" { "Delete" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            (pagination(&vm.pager))
        }
    }
}

fn create_form(form: &FormState) -> Markup {
    html! {
        form method="post" action="/appointments" class="modal-form" {
            (form_error(&form.errors))

            label { "Requester"
                input type="text" name="requester_name" value=(form.value("requester_name")) required;
                (field_error(&form.errors, "requester_name"))
            }
            label { "Purpose"
                input type="text" name="purpose" value=(form.value("purpose")) required;
                (field_error(&form.errors, "purpose"))
            }
            label { "Preferred date"
                input type="date" name="preferred_date" value=(form.value("preferred_date")) required;
                (field_error(&form.errors, "preferred_date"))
            }
            label { "Preferred time"
                input type="time" name="preferred_time" value=(form.value("preferred_time"));
                (field_error(&form.errors, "preferred_time"))
            }

            button type="submit" class="btn btn-primary" { "Log request" }
        }
    }
}
