use maud::{html, Markup, DOCTYPE};

const NAV_ITEMS: [(&str, &str); 6] = [
    ("/", "Dashboard"),
    ("/blotter", "Blotter Records"),
    ("/cases", "Ongoing Cases"),
    ("/appointments", "Appointments"),
    ("/announcements", "Announcements"),
    ("/programs", "Programs"),
];

pub fn desktop_layout(title: &str, active: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Barangay Portal" }
                link rel="stylesheet" href="/static/main.css";
                script src="https://unpkg.com/htmx.org@1.9.12" defer {};
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    svg
                        xmlns="http://www.w3.org/2000/svg"
                        width="24"
                        height="24"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="#524ed2"
                        stroke-width="2"
                        stroke-linecap="round"
                        stroke-linejoin="round"
                    {
                        path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                        path d="M3 21h18" {}
                        path d="M5 21v-14l8 -4v18" {}
                        path d="M19 21v-10l-6 -4" {}
                    }
                    h3 { "Barangay Case Management" }
                    nav {
                        ul {
                            @for (href, label) in NAV_ITEMS {
                                li {
                                    a href=(href) class=[(active == href).then_some("active")] { (label) }
                                }
                            }
                        }
                    }
                    a href="/login" class="text-base font-medium hover:text-blue-600" { "Sign in" }
                }
                (content)
            }
        }
    }
}
