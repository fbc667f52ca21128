use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Sign-in hand-off. Credentials never touch the portal: the form posts
/// straight to the backend, which sets the session cookie and redirects
/// back here.
pub fn login_page(backend_login_url: &str) -> Markup {
    desktop_layout(
        "Sign in",
        "/login",
        html! {
            main class="container narrow" {
                h1 { "Sign in" }
                p class="lead" {
                    "Use your barangay staff account. You will be redirected back "
                    "to the portal once signed in."
                }

                form method="post" action=(backend_login_url) class="card modal-form" {
                    label { "Email"
                        input type="email" name="email" required;
                    }
                    label { "Password"
                        input type="password" name="password" required;
                    }
                    input type="hidden" name="redirect" value="/";
                    button type="submit" class="btn btn-primary" { "Sign in" }
                }
            }
        },
    )
}
