//! Lightweight asset page.
//!
//! Shown when a serve URL is opened directly in a browser: just the
//! asset, centered, with a link through to the full detail page.

use maud::{Markup, html};

use super::components::{OpenGraphData, asset_embed, is_safe_url, page_shell};
use crate::resolve::AssetView;

/// Render the lightweight wrapper around an asset.
pub fn render(view: &AssetView, base_url: &str, site_name: &str) -> Markup {
    let claim = &view.claim;
    let title = claim.title().to_string();
    let description = format!("{} on {site_name}", claim.name);

    let canonical = format!("{base_url}/{}/{}", view.short_claim_id, claim.name);
    let embed_src = format!("{base_url}/{}/{}", claim.claim_id, claim.name);

    let og = OpenGraphData {
        title: &title,
        description: &description,
        og_type: "website",
        image: claim.thumbnail().filter(|u| is_safe_url(u)),
    };

    let body = html! {
        div class="lite" {
            (asset_embed(claim, &embed_src))
            a href=(canonical) { "hosted via " (site_name) }
        }
    };

    page_shell(&title, &description, &canonical, og, body, site_name)
}
