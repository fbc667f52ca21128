use crate::pipeline::{SortDir, SortSpec};
use maud::{html, Markup};

/// Context a sortable column header needs to build its htmx link:
/// the partial endpoint, the swap target, and the current filter/per-page
/// params (without sort/dir/page; the link supplies those itself).
pub struct SortLink<'a> {
    pub base: &'a str,
    pub target: &'a str,
    pub query: &'a str,
    pub current: &'a SortSpec,
}

/// Clicking the active column flips direction; a new column starts
/// ascending. Either way the view returns to page 1.
pub fn sort_header(ctx: &SortLink, field: &str, label: &str) -> Markup {
    let next = ctx.current.toggled(field);
    let url = format!(
        "{}?{}&sort={}&dir={}&page=1",
        ctx.base,
        ctx.query,
        next.field,
        next.dir.as_str()
    );
    let indicator = if ctx.current.field == field {
        match ctx.current.dir {
            SortDir::Asc => " ▲",
            SortDir::Desc => " ▼",
        }
    } else {
        ""
    };

    html! {
        th {
            a href="#" class="sort-link" hx-get=(url) hx-target=(ctx.target) hx-swap="outerHTML" {
                (label) (indicator)
            }
        }
    }
}
