use maud::{html, Markup};

/// Everything the pager needs to rebuild its htmx links. `query` carries
/// the current filter/sort/per-page params without `page`, so each link
/// can append its own page number.
pub struct PagerVm<'a> {
    /// Partial endpoint, e.g. "/blotter/table".
    pub base: &'a str,
    /// Swap target, e.g. "#blotter-table".
    pub target: &'a str,
    pub query: &'a str,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub range_start: usize,
    pub range_end: usize,
}

pub fn pagination(vm: &PagerVm) -> Markup {
    let page_url = |page: usize| format!("{}?{}&page={}", vm.base, vm.query, page);

    html! {
        div class="pager" {
            p class="pager-range" {
                @if vm.total_count == 0 {
                    "No records"
                } @else {
                    "Showing " strong { (vm.range_start) } "–" strong { (vm.range_end) }
                    " of " strong { (vm.total_count) }
                }
            }
            div class="pager-controls" {
                @if vm.page > 1 {
                    button
                        class="pager-btn"
                        hx-get=(page_url(vm.page - 1))
                        hx-target=(vm.target)
                        hx-swap="outerHTML"
                    { "‹ Prev" }
                } @else {
                    button class="pager-btn" disabled { "‹ Prev" }
                }

                span class="pager-page" { "Page " (vm.page) " of " (vm.total_pages) }

                @if vm.page < vm.total_pages {
                    button
                        class="pager-btn"
                        hx-get=(page_url(vm.page + 1))
                        hx-target=(vm.target)
                        hx-swap="outerHTML"
                    { "Next ›" }
                } @else {
                    button class="pager-btn" disabled { "Next ›" }
                }
            }
        }
    }
}
