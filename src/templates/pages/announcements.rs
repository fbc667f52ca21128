use crate::api::models::{Announcement, AnnouncementStatus, StatusLabel};
use crate::pipeline::{CategoryBucket, FilterCriteria};
use crate::templates::components::{
    error_banner, field_error, form_error, modal, pagination, pie_chart, sort_header, toast_banner,
    FormState, PagerVm, SortLink,
};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub const TABLE_ID: &str = "announcements-table";

pub struct AnnouncementsTableVm<'a> {
    pub rows: &'a [&'a Announcement],
    pub sort_ctx: SortLink<'a>,
    pub pager: PagerVm<'a>,
    /// "table" or "cards", the saved view mode.
    pub view_mode: &'a str,
}

pub struct AnnouncementsPageVm<'a> {
    pub criteria: &'a FilterCriteria,
    pub per_page: usize,
    pub per_page_choices: &'a [usize],
    pub view_mode: &'a str,
    pub audiences: Vec<String>,
    pub fetch_error: Option<&'a str>,
    pub by_audience: Vec<CategoryBucket>,
    pub form: FormState,
    pub toast: Option<String>,
    pub table: Markup,
}

pub fn announcements_page(vm: &AnnouncementsPageVm) -> Markup {
    desktop_layout(
        "Announcements",
        "/announcements",
        html! {
            main class="container" {
                h1 { "Community Announcements" }

                @if let Some(err) = vm.fetch_error {
                    (error_banner(err))
                }
                @if let Some(msg) = &vm.toast {
                    (toast_banner(msg))
                }

                section class="chart-row" {
                    (pie_chart("Announcements by audience", &vm.by_audience))
                }

                section class="card" {
                    div class="toolbar" {
                        form
                            class="filter-bar"
                            hx-get="/announcements/table"
                            hx-target=(format!("#{TABLE_ID}"))
                            hx-swap="outerHTML"
                            hx-trigger="change, input delay:300ms"
                        {
                            input
                                type="search"
                                name="q"
                                value=(vm.criteria.query)
                                placeholder="Search title or text…";
                            select name="status" {
                                option value="" selected[vm.criteria.status.is_none()] { "All statuses" }
                                @for status in AnnouncementStatus::ALL {
                                    option
                                        value=(status.as_str())
                                        selected[vm.criteria.status.as_deref() == Some(status.as_str())]
                                    { (status.as_str()) }
                                }
                            }
                            select name="category" {
                                option value="" selected[vm.criteria.category.is_none()] { "All audiences" }
                                @for a in &vm.audiences {
                                    option value=(a) selected[vm.criteria.category.as_deref() == Some(a.as_str())] { (a) }
                                }
                            }
                            select name="view" {
                                option value="table" selected[vm.view_mode == "table"] { "Table view" }
                                option value="cards" selected[vm.view_mode == "cards"] { "Card view" }
                            }
                            select name="per_page" {
                                @for n in vm.per_page_choices {
                                    option value=(n) selected[vm.per_page == *n] { (n) " per page" }
                                }
                            }
                        }
                        (modal(
                            "announcement-create",
                            "+ New Announcement",
                            "Draft an announcement",
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

pub fn announcements_table(vm: &AnnouncementsTableVm) -> Markup {
    html! {
        div id=(TABLE_ID) {
            @if vm.view_mode == "cards" {
                div class="announcement-cards" {
                    @if vm.rows.is_empty() {
                        p class="empty-row" { "No announcements match." }
                    }
                    @for a in vm.rows {
                        (announcement_card(a))
                    }
                }
            } @else {
                div class="table-wrap" {
                    table class="records" {
                        thead {
                            tr {
                                (sort_header(&vm.sort_ctx, "title", "Title"))
                                (sort_header(&vm.sort_ctx, "audience", "Audience"))
                                (sort_header(&vm.sort_ctx, "event_date", "Event Date"))
                                (sort_header(&vm.sort_ctx, "status", "Status"))
                                th { "Actions" }
                            }
                        }
                        tbody {
                            @if vm.rows.is_empty() {
                                tr { td colspan="5" class="empty-row" { "No announcements match." } }
                            }
                            @for a in vm.rows {
                                tr {
                                    td { (a.title.as_deref().unwrap_or("(untitled)")) }
                                    td { (a.audience.as_deref().unwrap_or("—")) }
                                    td { (a.event_date.as_deref().unwrap_or("—")) }
                                    td { (crate::templates::status_badge(a.status.as_str())) }
                                    td class="row-actions" {
                                        form
                                            method="post"
                                            action=(format!("/announcements/{}/delete", a.id))
                                            onsubmit="return confirm('Delete this announcement?');"
                                        {
                                            button type="submit" class="btn btn-small btn-danger" { "Delete" }
                                        }
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

fn announcement_card(a: &Announcement) -> Markup {
    html! {
        article class="card announcement" {
            header class="announcement-head" {
                h3 { (a.title.as_deref().unwrap_or("(untitled)")) }
                (crate::templates::status_badge(a.status.as_str()))
            }
            p class="muted" {
                (a.audience.as_deref().unwrap_or("All Residents"))
                @if let Some(d) = a.event_date.as_deref() { " · " (d) }
            }
            @if let Some(body) = a.body.as_deref() {
                p { (body) }
            }
        }
    }
}

fn create_form(form: &FormState) -> Markup {
    html! {
        form method="post" action="/announcements" class="modal-form" {
            (form_error(&form.errors))

            label { "Title"
                input type="text" name="title" value=(form.value("title")) required;
                (field_error(&form.errors, "title"))
            }
            label { "Text"
                textarea name="body" rows="4" required { (form.value("body")) }
                (field_error(&form.errors, "body"))
            }
            label { "Audience"
                input type="text" name="audience" value=(form.value("audience")) placeholder="All Residents";
                (field_error(&form.errors, "audience"))
            }
            label { "Event date"
                input type="date" name="event_date" value=(form.value("event_date"));
                (field_error(&form.errors, "event_date"))
            }
            label { "Status"
                select name="status" {
                    @for status in AnnouncementStatus::ALL {
                        option value=(status.as_str()) { (status.as_str()) }
                    }
                }
            }

            button type="submit" class="btn btn-primary" { "Save announcement" }
        }
    }
}
