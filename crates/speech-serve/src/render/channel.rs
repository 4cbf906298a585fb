//! Channel page: a paged listing of a channel's claims.

use maud::{Markup, html};

use super::components::{OpenGraphData, is_safe_url, page_shell};
use crate::resolve::ChannelViewData;

/// Render one page of a channel's claims.
pub fn render(view: &ChannelViewData, base_url: &str, site_name: &str) -> Markup {
    let title = view.channel_name.clone();
    let description = format!(
        "{} claims published by {}",
        view.total_results, view.channel_name
    );
    let canonical = format!("{base_url}/{}", view.channel_name);

    let og = OpenGraphData {
        title: &title,
        description: &description,
        og_type: "profile",
        image: None,
    };

    let body = html! {
        h1 class="channel-title" { (view.channel_name) }
        div class="channel-id" { (view.channel_claim_id) }

        @if view.claims.is_empty() {
            div class="notice" {
                p { "This channel has not published anything yet." }
            }
        } @else {
            div class="claim-list" {
                @for claim in &view.claims {
                    a class="claim-row" href={(base_url) "/" (claim.claim_id) "/" (claim.name)} {
                        @if let Some(thumb) = claim.thumbnail().filter(|u| is_safe_url(u)) {
                            img class="claim-thumb" src=(thumb) alt=(claim.title());
                        } @else {
                            div class="claim-thumb" {}
                        }
                        div {
                            div class="claim-name" { (claim.title()) }
                            div class="claim-sub" { (claim.name) }
                        }
                    }
                }
            }
            (pager(view, &canonical))
        }
    };

    page_shell(&title, &description, &canonical, og, body, site_name)
}

/// Previous/next links plus the current position.
fn pager(view: &ChannelViewData, canonical: &str) -> Markup {
    html! {
        @if view.total_pages > 1 {
            div class="pager" {
                @if view.page > 1 {
                    a href={(canonical) "?page=" ((view.page - 1))} { "\u{2190} newer" }
                }
                span class="current" { "page " (view.page) " of " (view.total_pages) }
                @if view.page < view.total_pages {
                    a href={(canonical) "?page=" ((view.page + 1))} { "older \u{2192}" }
                }
            }
        }
    }
}
