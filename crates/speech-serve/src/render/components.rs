//! Shared HTML components used across all pages.
//!
//! These are maud functions that return `Markup` fragments for
//! composition into full pages. All dynamic values are escaped by maud;
//! URLs destined for attributes go through [`is_safe_url`] first.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use speech_core::claim::ClaimInfo;

/// Inline CSS for all pages. Flat design, no external assets.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#09f;--border:rgba(0,0,0,.12);--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:720px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img,video{max-width:100%;height:auto}
.card{padding:1.5rem;border:1px solid var(--border);border-radius:10px;background:#fff}
.asset-title{font-size:1.4rem;font-weight:700;letter-spacing:-.01em;margin-bottom:.25rem}
.asset-channel{font-size:.9rem;color:var(--fg2);margin-bottom:1rem}
.asset-media{margin:.75rem 0;border-radius:8px;overflow:hidden;background:#000;text-align:center}
.asset-media img,.asset-media video{display:block;margin:0 auto}
.asset-description{margin:.75rem 0;white-space:pre-wrap;word-break:break-word;color:var(--fg2)}
.asset-meta{display:flex;gap:1.25rem;flex-wrap:wrap;margin-top:.75rem;font-size:.85rem;color:var(--fg3)}
.asset-share{margin-top:1rem;padding-top:1rem;border-top:1px solid var(--border);font-size:.85rem;color:var(--fg3)}
.asset-share code{font-family:var(--mono);font-size:.85rem;color:var(--fg2);word-break:break-all}
.channel-title{font-size:1.6rem;font-weight:700;margin-bottom:.25rem}
.channel-id{font-family:var(--mono);font-size:.8rem;color:var(--fg3);word-break:break-all;margin-bottom:1rem}
.claim-list{display:flex;flex-direction:column;gap:.75rem;margin-top:1rem}
.claim-row{display:flex;gap:.85rem;align-items:center;padding:.75rem;border:1px solid var(--border);border-radius:8px;background:#fff}
.claim-thumb{width:96px;height:54px;object-fit:cover;border-radius:4px;background:var(--border);flex-shrink:0}
.claim-name{font-weight:600}
.claim-sub{font-size:.8rem;color:var(--fg3);font-family:var(--mono)}
.pager{display:flex;gap:1rem;justify-content:center;margin-top:1.25rem;font-size:.9rem}
.pager .current{color:var(--fg3)}
.notice{text-align:center;padding:3rem 1rem;color:var(--fg2)}
.notice h1{font-size:1.4rem;color:var(--fg);margin-bottom:.5rem}
.lite{display:flex;flex-direction:column;align-items:center;justify-content:center;min-height:85vh;gap:.75rem}
.lite a{font-size:.85rem;color:var(--fg3)}
.footer{margin-top:2rem;font-size:.8rem;color:var(--fg3)}
"#;

/// CSS for error pages only.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;background:#fafafa;color:#111;min-height:100vh;display:flex;align-items:center;justify-content:center;padding:1rem}
.error-page{max-width:480px;text-align:center}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#555;margin-bottom:1rem;word-break:break-word}
.error-page a{color:#09f;text-decoration:none}
"#;

/// Content-Security-Policy for rendered pages: no script execution,
/// media and images from this origin or https sources only.
pub const CSP_HEADER: &str =
    "default-src 'none'; style-src 'unsafe-inline'; img-src 'self' https: data:; \
     media-src 'self' https:; base-uri 'none'; form-action 'none'";

/// Open Graph metadata for a page's `<head>`.
pub struct OpenGraphData<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub og_type: &'a str,
    pub image: Option<&'a str>,
}

/// Only http(s) URLs are allowed into attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Truncate to at most `max_chars` characters, appending an ellipsis
/// when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}\u{2026}", cut.trim_end())
}

/// Full HTML page shell: head with OG tags, body content, footer.
pub fn page_shell(
    title: &str,
    description: &str,
    canonical: &str,
    og: OpenGraphData<'_>,
    body: Markup,
    site_name: &str,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " \u{2014} " (site_name) }
                meta name="description" content=(description);
                link rel="canonical" href=(canonical);
                meta property="og:title" content=(og.title);
                meta property="og:description" content=(og.description);
                meta property="og:type" content=(og.og_type);
                meta property="og:url" content=(canonical);
                meta property="og:site_name" content=(site_name);
                @if let Some(image) = og.image {
                    meta property="og:image" content=(image);
                    meta name="twitter:card" content="summary_large_image";
                } @else {
                    meta name="twitter:card" content="summary";
                }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body) }
                (footer(site_name))
            }
        }
    }
}

/// Standard page footer.
pub fn footer(site_name: &str) -> Markup {
    html! {
        footer class="footer" {
            (site_name) " \u{2014} hosted on the LBRY network"
        }
    }
}

/// Embed an asset by content type: image, video, audio, or a plain
/// download link for everything else.
///
/// `src` is a show URL; browsers embedding it negotiate raw bytes via
/// the `Accept`/`Range` headers.
pub fn asset_embed(claim: &ClaimInfo, src: &str) -> Markup {
    let content_type = claim.content_type().unwrap_or("");
    html! {
        div class="asset-media" {
            @if content_type.starts_with("image/") {
                img src=(src) alt=(claim.title());
            } @else if content_type.starts_with("video/") {
                video controls preload="metadata" {
                    source src=(src) type=(content_type);
                }
            } @else if content_type.starts_with("audio/") {
                audio controls src=(src) {}
            } @else {
                a href=(src) { "Download " (claim.name) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_url_accepts_http_and_https() {
        assert!(is_safe_url("https://example.com/a.png"));
        assert!(is_safe_url("http://example.com/a.png"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("data:text/html,hi"));
        assert!(!is_safe_url("//example.com/a.png"));
    }

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_long_text_gets_ellipsis() {
        let out = truncate("hello world, this runs long", 11);
        assert!(out.chars().count() <= 11);
        assert!(out.ends_with('\u{2026}'));
    }

    #[test]
    fn embed_picks_tag_by_content_type() {
        let mut claim = ClaimInfo {
            name: "pic".to_string(),
            claim_id: "abc".to_string(),
            ..Default::default()
        };
        claim.value.stream = Some(speech_core::claim::StreamValue {
            metadata: speech_core::claim::StreamMetadata {
                content_type: Some("image/png".to_string()),
                ..Default::default()
            },
            source: None,
        });
        let markup = asset_embed(&claim, "/abc/pic").into_string();
        assert!(markup.contains("<img"));

        claim.value.stream.as_mut().unwrap().metadata.content_type =
            Some("video/mp4".to_string());
        let markup = asset_embed(&claim, "/abc/pic").into_string();
        assert!(markup.contains("<video"));

        claim.value.stream.as_mut().unwrap().metadata.content_type = None;
        let markup = asset_embed(&claim, "/abc/pic").into_string();
        assert!(markup.contains("Download"));
    }

    #[test]
    fn page_shell_escapes_title() {
        let og = OpenGraphData {
            title: "<script>",
            description: "d",
            og_type: "website",
            image: None,
        };
        let markup = page_shell(
            "<script>",
            "d",
            "http://localhost/x",
            og,
            html! { p { "body" } },
            "Speech",
        );
        let out = markup.into_string();
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }
}
