use crate::api::models::{Beneficiary, Program, ProgramStatus, StatusLabel};
use crate::pipeline::FilterCriteria;
use crate::templates::components::{
    error_banner, field_error, form_error, modal, pagination, sort_header, toast_banner, FormState,
    PagerVm, SortLink,
};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub const TABLE_ID: &str = "programs-table";

pub struct ProgramsTableVm<'a> {
    pub rows: &'a [&'a Program],
    pub sort_ctx: SortLink<'a>,
    pub pager: PagerVm<'a>,
}

pub struct ProgramsPageVm<'a> {
    pub criteria: &'a FilterCriteria,
    pub categories: Vec<String>,
    pub fetch_error: Option<&'a str>,
    pub form: FormState,
    pub toast: Option<String>,
    pub table: Markup,
}

pub fn programs_page(vm: &ProgramsPageVm) -> Markup {
    desktop_layout(
        "Programs",
        "/programs",
        html! {
            main class="container" {
                h1 { "Social Services Programs" }

                @if let Some(err) = vm.fetch_error {
                    (error_banner(err))
                }
                @if let Some(msg) = &vm.toast {
                    (toast_banner(msg))
                }

                section class="card" {
                    div class="toolbar" {
                        form
                            class="filter-bar"
                            hx-get="/programs/table"
                            hx-target=(format!("#{TABLE_ID}"))
                            hx-swap="outerHTML"
                            hx-trigger="change, input delay:300ms"
                        {
                            input
                                type="search"
                                name="q"
                                value=(vm.criteria.query)
                                placeholder="Search programs…";
                            select name="status" {
                                option value="" selected[vm.criteria.status.is_none()] { "All statuses" }
                                @for status in ProgramStatus::ALL {
                                    option
                                        value=(status.as_str())
                                        selected[vm.criteria.status.as_deref() == Some(status.as_str())]
                                    { (status.as_str()) }
                                }
                            }
                            select name="category" {
                                option value="" selected[vm.criteria.category.is_none()] { "All categories" }
                                @for c in &vm.categories {
                                    option value=(c) selected[vm.criteria.category.as_deref() == Some(c.as_str())] { (c) }
                                }
                            }
                        }
                        (modal(
                            "program-create",
                            "+ New Program",
                            "Create a program",
                            vm.form.has_errors(),
                            create_program_form(&vm.form),
                        ))
                    }
                    (vm.table)
                }
            }
        },
    )
}

pub fn programs_table(vm: &ProgramsTableVm) -> Markup {
    html! {
        div id=(TABLE_ID) {
            div class="table-wrap" {
                table class="records" {
                    thead {
                        tr {
                            (sort_header(&vm.sort_ctx, "name", "Program"))
                            (sort_header(&vm.sort_ctx, "category", "Category"))
                            (sort_header(&vm.sort_ctx, "start_date", "Start"))
                            (sort_header(&vm.sort_ctx, "beneficiaries", "Beneficiaries"))
                            (sort_header(&vm.sort_ctx, "status", "Status"))
                            th { "Actions" }
                        }
                    }
                    tbody {
                        @if vm.rows.is_empty() {
                            tr { td colspan="6" class="empty-row" { "No programs match." } }
                        }
                        @for program in vm.rows {
                            tr {
                                td {
                                    a href=(format!("/programs/{}", program.id)) {
                                        (program.name.as_deref().unwrap_or("(unnamed)"))
                                    }
                                }
                                td { (program.category.as_deref().unwrap_or("—")) }
                                td { (program.start_date.as_deref().unwrap_or("—")) }
                                td { (program.beneficiary_count.unwrap_or(0)) }
                                td { (crate::templates::status_badge(program.status.as_str())) }
                                td class="row-actions" {
                                    form method="post" action=(format!("/programs/{}/status", program.id)) {
                                        select name="status" {
                                            @for status in ProgramStatus::ALL {
                                                option value=(status.as_str()) selected[*status == program.status] {
                                                    (status.as_str())
                                                }
                                            }
                                        }
                                        button type="submit" class="btn btn-small" { "Set" }
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

pub struct ProgramDetailVm<'a> {
    pub program: &'a Program,
    pub beneficiaries: Vec<&'a Beneficiary>,
    pub query: &'a str,
    pub fetch_error: Option<&'a str>,
    pub form: FormState,
    pub toast: Option<String>,
}

pub fn program_detail_page(vm: &ProgramDetailVm) -> Markup {
    let name = vm.program.name.as_deref().unwrap_or("(unnamed)");
    desktop_layout(
        name,
        "/programs",
        html! {
            main class="container" {
                p { a href="/programs" { "← All programs" } }
                h1 { (name) }
                p class="muted" {
                    (vm.program.category.as_deref().unwrap_or("Uncategorized"))
                    " · " (crate::templates::status_badge(vm.program.status.as_str()))
                }

                @if let Some(err) = vm.fetch_error {
                    (error_banner(err))
                }
                @if let Some(msg) = &vm.toast {
                    (toast_banner(msg))
                }

                section class="card" {
                    div class="toolbar" {
                        form
                            class="filter-bar"
                            method="get"
                            action=(format!("/programs/{}", vm.program.id))
                        {
                            input
                                type="search"
                                name="q"
                                value=(vm.query)
                                placeholder="Search beneficiaries…";
                            button type="submit" class="btn btn-small" { "Search" }
                        }
                        (modal(
                            "beneficiary-create",
                            "+ Enroll Beneficiary",
                            "Enroll a beneficiary",
                            vm.form.has_errors(),
                            enroll_form(vm.program.id, &vm.form),
                        ))
                    }

                    div class="table-wrap" {
                        table class="records" {
                            thead {
                                tr {
                                    th { "Name" }
                                    th { "Purok" }
                                    th { "Contact" }
                                    th { "Enrolled" }
                                    th { "Status" }
                                    th { "Actions" }
                                }
                            }
                            tbody {
                                @if vm.beneficiaries.is_empty() {
                                    tr { td colspan="6" class="empty-row" { "No beneficiaries enrolled." } }
                                }
                                @for b in &vm.beneficiaries {
                                    tr {
                                        td { (b.full_name.as_deref().unwrap_or("—")) }
                                        td { (b.purok.as_deref().unwrap_or("—")) }
                                        td { (b.contact_number.as_deref().unwrap_or("—")) }
                                        td { (b.enrolled_at.as_deref().unwrap_or("—")) }
                                        td { (crate::templates::status_badge(b.status.as_str())) }
                                        td class="row-actions" {
                                            form
                                                method="post"
                                                action=(format!("/programs/{}/beneficiaries/{}/remove", vm.program.id, b.id))
                                                onsubmit="return confirm('Remove this beneficiary?');"
                                            {
                                                button type="submit" class="btn btn-small btn-danger" { "Remove" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn create_program_form(form: &FormState) -> Markup {
    html! {
        form method="post" action="/programs" class="modal-form" {
            (form_error(&form.errors))

            label { "Name"
                input type="text" name="name" value=(form.value("name")) required;
                (field_error(&form.errors, "name"))
            }
            label { "Category"
                input type="text" name="category" value=(form.value("category")) placeholder="Health, Livelihood…";
                (field_error(&form.errors, "category"))
            }
            label { "Start date"
                input type="date" name="start_date" value=(form.value("start_date"));
                (field_error(&form.errors, "start_date"))
            }
            label { "Status"
                select name="status" {
                    @for status in ProgramStatus::ALL {
                        option value=(status.as_str()) { (status.as_str()) }
                    }
                }
            }

            button type="submit" class="btn btn-primary" { "Create program" }
        }
    }
}

fn enroll_form(program_id: i64, form: &FormState) -> Markup {
    html! {
        form method="post" action=(format!("/programs/{program_id}/beneficiaries")) class="modal-form" {
            (form_error(&form.errors))

            label { "Full name"
                input type="text" name="full_name" value=(form.value("full_name")) required;
                (field_error(&form.errors, "full_name"))
            }
            label { "Purok / zone"
                input type="text" name="purok" value=(form.value("purok"));
                (field_error(&form.errors, "purok"))
            }
            label { "Contact number"
                input type="text" name="contact_number" value=(form.value("contact_number"));
                (field_error(&form.errors, "contact_number"))
            }

            button type="submit" class="btn btn-primary" { "Enroll" }
        }
    }
}
