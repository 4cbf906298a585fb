//! Home page: a simple landing page explaining the URL shapes.

use axum::extract::State;
use axum::response::IntoResponse;
use maud::{DOCTYPE, PreEscaped, html};

use crate::render::components::PAGE_CSS;
use crate::state::AppState;

/// Render the home page.
pub async fn home_page(State(state): State<AppState>) -> impl IntoResponse {
    let site_name = &state.config.site_name;
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (site_name) " \u{2014} " (state.config.site_description) }
                meta name="description" content=(state.config.site_description);
                meta property="og:title" content=(site_name);
                meta property="og:description" content=(state.config.site_description);
                meta property="og:type" content="website";
                style { (PreEscaped(PAGE_CSS)) }
                style { (PreEscaped(HOME_CSS)) }
            }
            body {
                main class="home" {
                    h1 class="home-title" { (site_name) }
                    p class="home-tagline" { (state.config.site_description) }

                    div class="home-how" {
                        p { "Address any claim on the network by URL:" }
                        div class="home-examples" {
                            div class="home-example" {
                                span class="home-label" { "Asset" }
                                code { "/" span class="home-highlight" { "name" } }
                            }
                            div class="home-example" {
                                span class="home-label" { "Raw file" }
                                code { "/" span class="home-highlight" { "name.ext" } }
                            }
                            div class="home-example" {
                                span class="home-label" { "By id" }
                                code { "/" span class="home-highlight" { "claim-id" } "/name" }
                            }
                            div class="home-example" {
                                span class="home-label" { "Channel" }
                                code { "/" span class="home-highlight" { "@channel" } }
                            }
                        }
                    }

                    div class="home-agents" {
                        p { "And for machines:" }
                        div class="home-examples" {
                            div class="home-example" {
                                span class="home-label" { "JSON" }
                                code { "/api/claim-list/" span class="home-highlight" { "name" } }
                            }
                            div class="home-example" {
                                span class="home-label" { "Publish" }
                                code { "POST /api/" span class="home-highlight" { "claim-publish" } }
                            }
                        }
                    }
                }
                footer class="footer" {
                    (site_name) " \u{2014} hosted on the LBRY network"
                }
            }
        }
    };

    markup
}

/// Additional CSS for the home page only.
const HOME_CSS: &str = r#"
.home{display:flex;flex-direction:column;align-items:center;justify-content:center;min-height:60vh;text-align:center;padding:2rem 1rem}
.home-title{font-size:3rem;font-weight:800;letter-spacing:-.04em;color:var(--fg)}
.home-tagline{font-size:1.1rem;color:var(--fg2);margin-top:.5rem;max-width:420px}
.home-how{margin-top:2.5rem;width:100%;max-width:440px}
.home-how>p{font-size:.95rem;color:var(--fg2);margin-bottom:1rem}
.home-examples{display:flex;flex-direction:column;gap:.5rem}
.home-example{display:flex;align-items:center;gap:.75rem;padding:.5rem .75rem;border-radius:6px;border:1px solid var(--border);background:#fff}
.home-label{font-size:.75rem;font-weight:600;color:var(--fg3);text-transform:uppercase;letter-spacing:.05em;width:64px;text-align:right;flex-shrink:0}
.home-example code{font-family:var(--mono);font-size:.85rem;color:var(--fg2)}
.home-highlight{color:var(--accent);font-weight:600}
.home-agents{margin-top:1.75rem;width:100%;max-width:440px}
.home-agents>p{font-size:.95rem;color:var(--fg2);margin-bottom:1rem}
"#;
