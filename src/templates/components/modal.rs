use maud::{html, Markup};

/// Disclosure-based modal: no JS needed, and the ongoing-cases poll can
/// check for an open one (`details[open]`) before refreshing, so a poll
/// never clobbers a half-filled form.
///
/// `open` forces the modal open on render, used when a submit came back
/// with validation errors and the form must stay visible.
pub fn modal(id: &str, trigger_label: &str, title: &str, open: bool, body: Markup) -> Markup {
    html! {
        details id=(id) class="modal" open[open] {
            summary class="btn btn-primary" { (trigger_label) }
            div class="modal-backdrop" {
                div class="modal-box" {
                    header class="modal-header" {
                        h3 { (title) }
                    }
                    (body)
                }
            }
        }
    }
}
