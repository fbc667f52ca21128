use crate::errors::FieldError;
use maud::{html, Markup};
use std::collections::HashMap;

pub mod charts;
pub mod modal;
pub mod pagination;
pub mod sort;

pub use charts::{line_chart, pie_chart};
pub use modal::modal;
pub use pagination::{pagination, PagerVm};
pub use sort::{sort_header, SortLink};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Colored status pill. Colors are keyed by the canonical labels the
/// backend reports; anything unrecognized gets the neutral style.
pub fn status_badge(status: &str) -> Markup {
    let class = match status {
        "Pending" | "Draft" | "Planned" => "badge badge-pending",
        "Scheduled" => "badge badge-scheduled",
        "Ongoing" | "Posted" | "Active" => "badge badge-ongoing",
        "Completed" => "badge badge-completed",
        "Cancelled" | "No Show" | "Removed" => "badge badge-cancelled",
        _ => "badge",
    };
    html! {
        span class=(class) { (status) }
    }
}

/// Non-fatal problem banner: stale data stays on screen, this sits above it.
pub fn error_banner(message: &str) -> Markup {
    html! {
        div class="banner banner-error" role="alert" {
            strong { "Could not refresh from the server. " }
            span { "Showing the last loaded data. (" (message) ")" }
        }
    }
}

pub fn stat_tile(label: &str, value: &str) -> Markup {
    html! {
        div class="stat-tile" {
            p class="stat-value" { (value) }
            p class="stat-label" { (label) }
        }
    }
}

/// Problem with a specific action (delete, status change), shown once,
/// near the list the action came from.
pub fn toast_banner(message: &str) -> Markup {
    html! {
        div class="banner banner-error" role="alert" {
            (message)
        }
    }
}

/// Submitted form state carried through a failed round trip: the
/// backend's field messages plus the user's values, so nothing is lost.
#[derive(Debug, Default)]
pub struct FormState {
    pub errors: Vec<FieldError>,
    pub values: HashMap<String, String>,
}

impl FormState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rejected(errors: Vec<FieldError>, values: HashMap<String, String>) -> Self {
        Self { errors, values }
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Inline, per-field validation messages rendered directly under the input.
pub fn field_error(errors: &[FieldError], field: &str) -> Markup {
    html! {
        @for e in errors.iter().filter(|e| e.field == field) {
            p class="field-error" { (e.message) }
        }
    }
}

/// Catch-all messages the backend did not attribute to a specific field.
pub fn form_error(errors: &[FieldError]) -> Markup {
    html! {
        @for e in errors.iter().filter(|e| e.field == "form") {
            p class="field-error" { (e.message) }
        }
    }
}
