//! HTML view components.
//!
//! Every function returns a markup string. Text arguments are escaped here,
//! so callers pass raw values. Arguments named `*_html` are already markup
//! and are inserted as-is.

use std::fmt::Write as _;

use eco_core::format::initials;

/// Escape text for use in element content and double-quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `href` for a path with one dynamic segment, e.g. `/opportunities/{id}`.
#[must_use]
pub fn path_with_id(prefix: &str, id: &str) -> String {
    format!("{prefix}/{}", urlencoding::encode(id))
}

/// Anchor element.
#[must_use]
pub fn link(href: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(href), escape(text))
}

/// Whether a stored URL is an absolute `http` or `https` address.
#[must_use]
pub fn is_web_url(url: &str) -> bool {
    let url = url.trim();
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Anchor to a stored external URL, or plain text when the URL is not a web
/// address.
#[must_use]
pub fn external_link(url: &str, text: &str) -> String {
    if is_web_url(url) {
        link(url.trim(), text)
    } else {
        escape(text)
    }
}

/// Navigation entries for the two site areas.
const PUBLIC_NAV: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/opportunities", "Opportunities"),
    ("/stories", "Stories"),
    ("/dashboard", "Dashboard"),
];

const DASHBOARD_NAV: &[(&str, &str)] = &[
    ("/dashboard", "Overview"),
    ("/dashboard/organizations", "Organizations"),
    ("/dashboard/practitioners", "Practitioners"),
    ("/dashboard/opportunities", "Opportunities"),
    ("/dashboard/investments", "Investments"),
    ("/dashboard/decisions", "Decisions"),
    ("/dashboard/narratives", "Narratives"),
    ("/dashboard/outputs", "Outputs"),
    ("/dashboard/submissions", "Submissions"),
    ("/dashboard/profile", "Profile"),
];

/// Which navigation bar a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Public,
    Dashboard,
}

/// Full HTML document.
#[must_use]
pub fn layout(site_title: &str, page_title: &str, area: Area, body_html: &str) -> String {
    let nav_items = match area {
        Area::Public => PUBLIC_NAV,
        Area::Dashboard => DASHBOARD_NAV,
    };
    let nav: String = nav_items
        .iter()
        .map(|(href, label)| format!("<li>{}</li>", link(href, label)))
        .collect();
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{page} | {site}</title></head><body>\
<header><a class=\"brand\" href=\"/\">{site}</a><nav><ul>{nav}</ul></nav></header>\
<main><h1>{page}</h1>{body_html}</main></body></html>",
        page = escape(page_title),
        site = escape(site_title),
    )
}

/// Headline number with a label, e.g. "Open opportunities: 12".
#[must_use]
pub fn stat_card(label: &str, value: &str) -> String {
    format!(
        "<div class=\"stat-card\"><span class=\"stat-value\">{}</span>\
<span class=\"stat-label\">{}</span></div>",
        escape(value),
        escape(label)
    )
}

/// Small pill label. `tone` becomes a CSS modifier class.
#[must_use]
pub fn badge(text: &str, tone: &str) -> String {
    format!(
        "<span class=\"badge badge-{}\">{}</span>",
        escape(tone),
        escape(text)
    )
}

/// Colour of a status dot.
#[must_use]
pub fn status_tone(status: &str) -> &'static str {
    match status {
        "open" | "approved" | "published" => "green",
        "draft" | "proposed" | "pending" | "under_review" => "amber",
        "closed" | "rejected" | "cancelled" => "red",
        "awarded" => "blue",
        _ => "grey",
    }
}

/// Coloured dot followed by the status label.
#[must_use]
pub fn status_dot(status: &str) -> String {
    let label = status.replace('_', " ");
    format!(
        "<span class=\"status\"><span class=\"dot dot-{}\"></span>{}</span>",
        status_tone(status),
        escape(&label)
    )
}

/// Table with escaped headers and pre-rendered cell markup.
#[must_use]
pub fn table(headers: &[&str], rows_html: &[Vec<String>]) -> String {
    let mut out = String::from("<table><thead><tr>");
    for header in headers {
        let _ = write!(out, "<th>{}</th>", escape(header));
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows_html {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{cell}</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

/// Placeholder shown instead of an empty list.
#[must_use]
pub fn empty_state(message: &str) -> String {
    format!("<p class=\"empty\">{}</p>", escape(message))
}

/// Titled box around pre-rendered content.
#[must_use]
pub fn card(title: &str, body_html: &str) -> String {
    format!(
        "<section class=\"card\"><h2>{}</h2>{body_html}</section>",
        escape(title)
    )
}

/// Round badge with a person's or organization's initials.
#[must_use]
pub fn avatar(name: &str) -> String {
    format!(
        "<span class=\"avatar\" title=\"{}\">{}</span>",
        escape(name),
        escape(&initials(name))
    )
}

/// `table` when there are rows, `empty_state` otherwise.
#[must_use]
pub fn table_or_empty(headers: &[&str], rows_html: &[Vec<String>], empty_message: &str) -> String {
    if rows_html.is_empty() {
        empty_state(empty_message)
    } else {
        table(headers, rows_html)
    }
}
