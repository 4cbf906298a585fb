//! "Not found" pages for expected absences.
//!
//! These are normal control flow, not errors: a request for a claim or
//! channel that does not exist renders a friendly page with status 200,
//! matching how the rest of the site treats absence as content.

use maud::{Markup, html};

use super::components::{OpenGraphData, page_shell};

/// Page shown when no claim exists at the requested URL.
pub fn no_claim(base_url: &str, site_name: &str) -> Markup {
    notice_page(
        "No claim found",
        "There are no claims at that URL. It may never have existed, or it may not have synced to this node yet.",
        base_url,
        site_name,
    )
}

/// Page shown when the requested channel does not exist.
pub fn no_channel(base_url: &str, site_name: &str) -> Markup {
    notice_page(
        "No channel found",
        "There is no channel at that URL. Check the channel name and claim id.",
        base_url,
        site_name,
    )
}

fn notice_page(title: &str, message: &str, base_url: &str, site_name: &str) -> Markup {
    let og = OpenGraphData {
        title,
        description: message,
        og_type: "website",
        image: None,
    };
    let body = html! {
        div class="notice" {
            h1 { (title) }
            p { (message) }
            a href=(base_url) { "Back to " (site_name) }
        }
    };
    page_shell(title, message, base_url, og, body, site_name)
}
