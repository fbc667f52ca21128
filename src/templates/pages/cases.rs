use crate::api::models::{BlotterRecord, BlotterStatus, StatusLabel};
use crate::pipeline::FilterCriteria;
use crate::templates::components::{
    error_banner, pagination, sort_header, stat_tile, toast_banner, PagerVm, SortLink,
};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub const TABLE_ID: &str = "cases-table";

pub struct CasesTableVm<'a> {
    pub rows: &'a [&'a BlotterRecord],
    pub sort_ctx: SortLink<'a>,
    pub pager: PagerVm<'a>,
    /// Poll URL carrying the current controls, so the periodic refresh
    /// re-renders exactly the view the user is looking at.
    pub poll_url: &'a str,
}

pub struct CasesPageVm<'a> {
    pub criteria: &'a FilterCriteria,
    pub fetch_error: Option<&'a str>,
    pub scheduled_count: usize,
    pub ongoing_count: usize,
    pub toast: Option<String>,
    pub table: Markup,
}

pub fn cases_page(vm: &CasesPageVm) -> Markup {
    desktop_layout(
        "Ongoing Cases",
        "/cases",
        html! {
            main class="container" {
                h1 { "Ongoing Cases" }
                p class="lead" {
                    "Blotter records currently in the hearing flow. "
                    "This list refreshes on its own while the tab is visible."
                }

                @if let Some(err) = vm.fetch_error {
                    (error_banner(err))
                }
                @if let Some(msg) = &vm.toast {
                    (toast_banner(msg))
                }

                section class="stat-row" {
                    (stat_tile("Scheduled for hearing", &vm.scheduled_count.to_string()))
                    (stat_tile("Hearing ongoing", &vm.ongoing_count.to_string()))
                }

                section class="card" {
                    form
                        class="filter-bar"
                        hx-get="/cases/table"
                        hx-target=(format!("#{TABLE_ID}"))
                        hx-swap="outerHTML"
                        hx-trigger="change, input delay:300ms"
                    {
                        input
                            type="search"
                            name="q"
                            value=(vm.criteria.query)
                            placeholder="Search name or case #…";
                        select name="status" {
                            option value="" selected[vm.criteria.status.is_none()] { "Scheduled + Ongoing" }
                            option value="Scheduled" selected[vm.criteria.status.as_deref() == Some("Scheduled")] { "Scheduled" }
                            option value="Ongoing" selected[vm.criteria.status.as_deref() == Some("Ongoing")] { "Ongoing" }
                        }
                    }
                    (vm.table)
                }
            }
        },
    )
}

pub fn cases_table(vm: &CasesTableVm) -> Markup {
    html! {
        // Fixed-interval poll; skipped while the tab is hidden or a modal
        // is open so it never clobbers an in-progress edit.
        div
            id=(TABLE_ID)
            hx-get=(vm.poll_url)
            hx-trigger="every 30s [document.visibilityState === 'visible' && !document.querySelector('details[open]')]"
            hx-swap="outerHTML"
        {
            div class="table-wrap" {
                table class="records" {
                    thead {
                        tr {
                            (sort_header(&vm.sort_ctx, "case_number", "Case #"))
                            (sort_header(&vm.sort_ctx, "complainant", "Complainant"))
                            (sort_header(&vm.sort_ctx, "respondent", "Respondent"))
                            (sort_header(&vm.sort_ctx, "hearing_date", "Hearing Date"))
                            (sort_header(&vm.sort_ctx, "status", "Status"))
                            th { "Advance" }
                        }
                    }
                    tbody {
                        @if vm.rows.is_empty() {
                            tr { td colspan="6" class="empty-row" { "No cases in the hearing flow." } }
                        }
                        @for record in vm.rows {
                            tr {
                                td { (record.case_number.as_deref().unwrap_or("—")) }
                                td { (record.complainant_name.as_deref().unwrap_or("—")) }
                                td { (record.respondent_name.as_deref().unwrap_or("—")) }
                                td { (record.hearing_date.as_deref().unwrap_or("Not set")) }
                                td { (crate::templates::status_badge(record.status.as_str())) }
                                td class="row-actions" {
                                    @match record.status {
                                        BlotterStatus::Scheduled => {
                                            (advance_form(record.id, BlotterStatus::Ongoing, "Start hearing"))
                                            (advance_form(record.id, BlotterStatus::NoShow, "No show"))
                                        }
                                        BlotterStatus::Ongoing => {
                                            (advance_form(record.id, BlotterStatus::Completed, "Settle"))
                                            (advance_form(record.id, BlotterStatus::Cancelled, "Cancel"))
                                        }
                                        _ => { span class="muted" { "—" } }
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

/// One-click status-change request. Whether the transition is legal is
/// the backend's decision; a rejection comes back as a toast.
fn advance_form(id: i64, to: BlotterStatus, label: &str) -> Markup {
    html! {
        form method="post" action=(format!("/blotter/{id}/status?next=/cases")) {
            input type="hidden" name="status" value=(to.as_str());
            button type="submit" class="btn btn-small" { (label) }
        }
    }
}
