//! Full asset detail page.

use maud::{Markup, html};

use super::components::{OpenGraphData, asset_embed, is_safe_url, page_shell, truncate};
use crate::resolve::AssetView;

/// Render the asset detail page: title, channel, embedded media,
/// description, and the canonical short URL for sharing.
pub fn render(view: &AssetView, base_url: &str, site_name: &str) -> Markup {
    let claim = &view.claim;
    let title = claim.title().to_string();
    let description = claim
        .description()
        .map(|d| truncate(d, 200))
        .unwrap_or_else(|| format!("{} on {site_name}", claim.name));

    let short_url = format!("{base_url}/{}/{}", view.short_claim_id, claim.name);
    let embed_src = format!("{base_url}/{}/{}", claim.claim_id, claim.name);

    let og_type = match claim.content_type() {
        Some(t) if t.starts_with("video/") => "video.other",
        _ => "article",
    };
    let og_image = claim.thumbnail().filter(|u| is_safe_url(u));

    let og = OpenGraphData {
        title: &title,
        description: &description,
        og_type,
        image: og_image,
    };

    let body = html! {
        div class="card" {
            h1 class="asset-title" { (title) }
            @if let Some(channel) = claim.channel_name.as_deref() {
                div class="asset-channel" {
                    "published by " a href={(base_url) "/" (channel)} { (channel) }
                }
            }

            (asset_embed(claim, &embed_src))

            @if let Some(text) = claim.description() {
                div class="asset-description" { (text) }
            }

            div class="asset-meta" {
                @if let Some(content_type) = claim.content_type() {
                    span { (content_type) }
                }
                span { "claim " (view.short_claim_id) }
            }

            div class="asset-share" {
                "Share this asset: " code { (short_url) }
            }
        }
    };

    page_shell(&title, &description, &short_url, og, body, site_name)
}
