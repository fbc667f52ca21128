use crate::pipeline::{CategoryBucket, MostCommon, TimeBucket};
use crate::templates::components::{card, error_banner, line_chart, pie_chart, stat_tile};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct DashboardVm<'a> {
    pub open_blotters: usize,
    pub cases_in_hearing: usize,
    pub pending_appointments: usize,
    pub posted_announcements: usize,
    pub ongoing_programs: usize,
    pub blotter_trailing: Vec<TimeBucket>,
    pub blotter_by_type: Vec<CategoryBucket>,
    pub top_type: Option<MostCommon>,
    pub busiest_month: Option<MostCommon>,
    pub fetch_errors: Vec<&'a str>,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Dashboard",
        "/",
        html! {
            main class="container" {
                h1 { "Dashboard" }

                @for err in &vm.fetch_errors {
                    (error_banner(err))
                }

                section class="stat-row" {
                    (stat_tile("Open blotters", &vm.open_blotters.to_string()))
                    (stat_tile("In hearing", &vm.cases_in_hearing.to_string()))
                    (stat_tile("Pending appointments", &vm.pending_appointments.to_string()))
                    (stat_tile("Posted announcements", &vm.posted_announcements.to_string()))
                    (stat_tile("Ongoing programs", &vm.ongoing_programs.to_string()))
                }

                section class="chart-row" {
                    (line_chart("Blotter records, last 12 months", &vm.blotter_trailing))
                    (pie_chart("Complaints by type", &vm.blotter_by_type))
                }

                (card("At a glance", html! {
                    ul {
                        @match &vm.top_type {
                            Some(t) => li { "Most common complaint type: " strong { (t.name) } " (" (t.count) " records)" },
                            None => li { "No complaint data yet." },
                        }
                        @match &vm.busiest_month {
                            Some(t) => li { "Busiest month: " strong { (t.name) } " (" (t.count) " records)" },
                            None => li { "No monthly activity yet." },
                        }
                    }
                }))
            }
        },
    )
}
