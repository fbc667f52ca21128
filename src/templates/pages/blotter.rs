use crate::api::models::{BlotterRecord, BlotterStatus, StatusLabel};
use crate::pipeline::{CategoryBucket, FilterCriteria, MostCommon, TimeBucket};
use crate::templates::components::{
    error_banner, field_error, form_error, line_chart, modal, pagination, pie_chart, sort_header,
    stat_tile, toast_banner, FormState, PagerVm, SortLink,
};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub const TABLE_ID: &str = "blotter-table";

pub struct BlotterTableVm<'a> {
    pub rows: &'a [&'a BlotterRecord],
    pub sort_ctx: SortLink<'a>,
    pub pager: PagerVm<'a>,
}

pub struct BlotterPageVm<'a> {
    pub criteria: &'a FilterCriteria,
    pub per_page: usize,
    pub per_page_choices: &'a [usize],
    /// Distinct complaint types present in the snapshot, for the dropdown.
    pub categories: Vec<String>,
    pub years: Vec<i32>,
    pub fetch_error: Option<&'a str>,
    pub time_series: Vec<TimeBucket>,
    pub time_series_title: String,
    pub by_type: Vec<CategoryBucket>,
    pub top_type: Option<MostCommon>,
    pub busiest: Option<MostCommon>,
    pub filtered_count: usize,
    pub form: FormState,
    pub toast: Option<String>,
    pub table: Markup,
}

pub fn blotter_page(vm: &BlotterPageVm) -> Markup {
    desktop_layout(
        "Blotter Records",
        "/blotter",
        html! {
            main class="container" {
                h1 { "Blotter Records" }

                @if let Some(err) = vm.fetch_error {
                    (error_banner(err))
                }
                @if let Some(msg) = &vm.toast {
                    (toast_banner(msg))
                }

                section class="stat-row" {
                    (stat_tile("Matching records", &vm.filtered_count.to_string()))
                    (stat_tile(
                        "Most common type",
                        &vm.top_type
                            .as_ref()
                            .map(|t| format!("{} ({})", t.name, t.count))
                            .unwrap_or_else(|| "—".to_string()),
                    ))
                    (stat_tile(
                        "Busiest period",
                        &vm.busiest
                            .as_ref()
                            .map(|t| format!("{} ({})", t.name, t.count))
                            .unwrap_or_else(|| "—".to_string()),
                    ))
                }

                section class="chart-row" {
                    (line_chart(&vm.time_series_title, &vm.time_series))
                    (pie_chart("Complaints by type", &vm.by_type))
                }

                section class="card" {
                    div class="toolbar" {
                        (filter_bar(vm))
                        (modal(
                            "blotter-create",
                            "+ New Record",
                            "File a blotter record",
                            vm.form.has_errors(),
                            create_form(&vm.form),
                        ))
                        a class="btn" href=(format!("/export/blotter?{}", crate::query::criteria_query_string(vm.criteria))) {
                            "Export XLSX"
                        }
                    }
                    (vm.table)
                }
            }
        },
    )
}

/// Filter controls. Every change re-derives the table from the already
/// fetched snapshot (no backend round trip) and lands on page 1.
fn filter_bar(vm: &BlotterPageVm) -> Markup {
    html! {
        form
            class="filter-bar"
            hx-get="/blotter/table"
            hx-target=(format!("#{TABLE_ID}"))
            hx-swap="outerHTML"
            hx-trigger="change, input delay:300ms"
        {
            input
                type="search"
                name="q"
                value=(vm.criteria.query)
                placeholder="Search name, case #, location…";

            select name="status" {
                option value="" selected[vm.criteria.status.is_none()] { "All statuses" }
                @for status in BlotterStatus::ALL {
                    option
                        value=(status.as_str())
                        selected[vm.criteria.status.as_deref() == Some(status.as_str())]
                    { (status.as_str()) }
                }
            }

            select name="category" {
                option value="" selected[vm.criteria.category.is_none()] { "All types" }
                @for cat in &vm.categories {
                    option value=(cat) selected[vm.criteria.category.as_deref() == Some(cat.as_str())] { (cat) }
                }
            }

            select name="year" {
                option value="" selected[vm.criteria.year.is_none()] { "All years" }
                @for year in &vm.years {
                    option value=(year) selected[vm.criteria.year == Some(*year)] { (year) }
                }
            }

            select name="month" {
                option value="" selected[vm.criteria.month.is_none()] { "All months" }
                @for (i, name) in ["January", "February", "March", "April", "May", "June", "July",
                                   "August", "September", "October", "November", "December"]
                    .iter()
                    .enumerate()
                {
                    option value=((i + 1)) selected[vm.criteria.month == Some((i + 1) as u32)] { (name) }
                }
            }

            select name="per_page" {
                @for n in vm.per_page_choices {
                    option value=(n) selected[vm.per_page == *n] { (n) " per page" }
                }
            }
        }
    }
}

pub fn blotter_table(vm: &BlotterTableVm) -> Markup {
    html! {
        div id=(TABLE_ID) {
            div class="table-wrap" {
                table class="records" {
                    thead {
                        tr {
                            (sort_header(&vm.sort_ctx, "case_number", "Case #"))
                            (sort_header(&vm.sort_ctx, "complainant", "Complainant"))
                            (sort_header(&vm.sort_ctx, "respondent", "Respondent"))
                            (sort_header(&vm.sort_ctx, "type", "Type"))
                            (sort_header(&vm.sort_ctx, "incident_date", "Incident Date"))
                            (sort_header(&vm.sort_ctx, "status", "Status"))
                            th { "Actions" }
                        }
                    }
                    tbody {
                        @if vm.rows.is_empty() {
                            tr { td colspan="7" class="empty-row" { "No records match the current filters." } }
                        }
                        @for record in vm.rows {
                            (blotter_row(record))
                        }
                    }
                }
            }
            (pagination(&vm.pager))
        }
    }
}

fn blotter_row(record: &BlotterRecord) -> Markup {
    html! {
        tr {
            td { (record.case_number.as_deref().unwrap_or("—")) }
            td { (record.complainant_name.as_deref().unwrap_or("—")) }
            td { (record.respondent_name.as_deref().unwrap_or("—")) }
            td { (record.complaint_type.as_deref().unwrap_or("—")) }
            td { (record.incident_date.as_deref().unwrap_or("—")) }
            td { (crate::templates::status_badge(record.status.as_str())) }
            td class="row-actions" {
                form method="post" action=(format!("/blotter/{}/status", record.id)) {
                    select name="status" {
                        @for status in BlotterStatus::ALL {
                            option value=(status.as_str()) selected[*status == record.status] {
                                (status.as_str())
                            }
                        }
                    }
                    button type="submit" class="btn btn-small" { "Set" }
                }
                form
                    method="post"
                    action=(format!("/blotter/{}/delete", record.id))
                    onsubmit="return confirm('Delete this blotter record?');"
                {
                    button type="submit" class="btn btn-small btn-danger" { "Delete" }
                }
            }
        }
    }
}

fn create_form(form: &FormState) -> Markup {
    html! {
        form method="post" action="/blotter" class="modal-form" {
            (form_error(&form.errors))

            label { "Complainant"
                input type="text" name="complainant_name" value=(form.value("complainant_name")) required;
                (field_error(&form.errors, "complainant_name"))
            }
            label { "Respondent"
                input type="text" name="respondent_name" value=(form.value("respondent_name")) required;
                (field_error(&form.errors, "respondent_name"))
            }
            label { "Complaint type"
                input type="text" name="complaint_type" value=(form.value("complaint_type")) required;
                (field_error(&form.errors, "complaint_type"))
            }
            label { "Incident location"
                input type="text" name="incident_location" value=(form.value("incident_location"));
                (field_error(&form.errors, "incident_location"))
            }
            label { "Incident date"
                input type="date" name="incident_date" value=(form.value("incident_date")) required;
                (field_error(&form.errors, "incident_date"))
            }

            button type="submit" class="btn btn-primary" { "File record" }
        }
    }
}
