//! Static HTML dashboard.
//!
//! The page is self-contained: styles and the filter/sort script are
//! embedded from `assets/`, so the output directory can be served as-is.

use super::{Dashboard, ReportRow};
use anyhow::{Context, Result};
use delegators_core::EventKind;
use num_format::{Locale, ToFormattedString};
use std::path::Path;

const STYLE: &str = include_str!("../../assets/dashboard.css");
const SCRIPT: &str = include_str!("../../assets/dashboard.js");

/// Filter presets offered above the table, in whole GRT.
const GRT_FILTERS: [u64; 3] = [50_000, 100_000, 1_000_000];

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn grt(value: u128) -> String {
    value.to_formatted_string(&Locale::en)
}

fn signed_grt(value: i128) -> String {
    value.to_formatted_string(&Locale::en)
}

pub fn render(dashboard: &Dashboard) -> String {
    let mut out = String::with_capacity(16 * 1024 + dashboard.rows.len() * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str("<title>Delegators Activity Log</title>\n");
    out.push_str(&format!("<style>\n{STYLE}</style>\n"));
    out.push_str("</head>\n<body>\n");

    out.push_str("<button class=\"theme-toggle\" type=\"button\" onclick=\"toggleTheme()\">Toggle theme</button>\n");
    out.push_str("<h1>Delegators Activity Log</h1>\n");
    out.push_str(&format!(
        "<p class=\"breadcrumb\">last {} transactions, excluding under {} GRT</p>\n",
        dashboard.window_size(),
        grt(u128::from(dashboard.grt_threshold)),
    ));
    out.push_str(&format!(
        "<p class=\"generated\">Generated on: {} - v{}</p>\n",
        dashboard.generated_at.format("%Y-%m-%d %H:%M UTC"),
        escape(dashboard.version),
    ));

    render_summary(&mut out, dashboard);
    render_controls(&mut out);
    render_table(&mut out, dashboard);

    out.push_str(&format!("<footer>delegators v{}</footer>\n", escape(dashboard.version)));
    out.push_str(&format!("<script>\n{SCRIPT}</script>\n"));
    out.push_str("</body>\n</html>\n");
    out
}

fn render_summary(out: &mut String, dashboard: &Dashboard) {
    let totals = &dashboard.totals;
    let net = totals.net();
    let net_class = if net >= 0 { "positive" } else { "negative" };

    out.push_str("<div class=\"summary\">\n");
    out.push_str(&format!(
        "<div class=\"card\"><h3>Total Delegated</h3><p class=\"positive\">{} GRT</p></div>\n",
        grt(totals.delegated)
    ));
    out.push_str(&format!(
        "<div class=\"card\"><h3>Total Undelegated</h3><p class=\"negative\">{} GRT</p></div>\n",
        grt(totals.undelegated)
    ));
    out.push_str(&format!(
        "<div class=\"card\"><h3>Net</h3><p class=\"{net_class}\">{} GRT</p></div>\n",
        signed_grt(net)
    ));
    out.push_str("</div>\n");
}

fn render_controls(out: &mut String) {
    out.push_str("<div class=\"controls\">\n");
    out.push_str(
        "<input type=\"text\" id=\"search\" placeholder=\"Search indexer...\" onkeyup=\"applyFilters()\">\n",
    );
    out.push_str(&format!(
        "<a class=\"button\" href=\"{}\" download>Download CSV</a>\n",
        super::CSV_FILE
    ));
    out.push_str("<span class=\"filter\">Event: ");
    out.push_str("<a href=\"#\" onclick=\"return setKind('delegation')\">Delegations</a> | ");
    out.push_str("<a href=\"#\" onclick=\"return setKind('undelegation')\">Undelegations</a> | ");
    out.push_str("<a href=\"#\" onclick=\"return setKind('')\">All</a></span>\n");
    out.push_str("<span class=\"filter\">Min GRT: ");
    for preset in GRT_FILTERS {
        out.push_str(&format!(
            "<a href=\"#\" onclick=\"return setMinGrt({preset})\">{}</a> | ",
            grt(u128::from(preset))
        ));
    }
    out.push_str("<a href=\"#\" onclick=\"return setMinGrt(0)\">All</a></span>\n");
    out.push_str("</div>\n");
}

fn render_table(out: &mut String, dashboard: &Dashboard) {
    out.push_str("<table id=\"events\">\n<thead>\n<tr>");
    for (i, title) in ["Event", "GRT", "Date", "Indexer", "Delegator", "Tx"].iter().enumerate() {
        out.push_str(&format!("<th onclick=\"sortTable({i})\">{title}</th>"));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &dashboard.rows {
        render_row(out, row, dashboard);
    }

    out.push_str("</tbody>\n</table>\n");
}

fn render_row(out: &mut String, row: &ReportRow, dashboard: &Dashboard) {
    let event = &row.event;
    let tokens = event.tokens_grt();
    let label = match event.kind {
        EventKind::Delegation => "✅ Delegation",
        EventKind::Undelegation => "❌ Undelegation",
    };

    out.push_str(&format!("<tr data-kind=\"{}\" data-grt=\"{tokens}\">", event.kind.as_str()));
    out.push_str(&format!("<td>{label}</td>"));
    out.push_str(&format!("<td data-sort=\"{tokens}\">{}</td>", grt(tokens)));
    out.push_str(&format!(
        "<td data-sort=\"{}\">{}</td>",
        event.block_timestamp,
        event.block_datetime().format("%Y-%m-%d %H:%M")
    ));

    let avatar = row
        .indexer_avatar
        .as_deref()
        .map(|src| format!("<img class=\"avatar\" src=\"{}\" alt=\"\" height=\"20\"> ", escape(src)))
        .unwrap_or_default();
    out.push_str(&format!(
        "<td class=\"indexer\">{avatar}{}</td>",
        profile_link(&dashboard.profile_url, &event.indexer, row.indexer_label())
    ));
    out.push_str(&format!(
        "<td>{}</td>",
        profile_link(&dashboard.profile_url, &event.delegator, row.delegator_label())
    ));
    out.push_str(&format!(
        "<td><a href=\"{}/{}\" target=\"_blank\" rel=\"noopener\">view</a></td>",
        escape(&dashboard.tx_url),
        escape(&event.transaction_hash)
    ));
    out.push_str("</tr>\n");
}

fn profile_link(base: &str, address: &str, label: &str) -> String {
    format!(
        "<a href=\"{}/{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
        escape(base),
        escape(address),
        escape(label)
    )
}

pub fn write_html(path: &Path, dashboard: &Dashboard) -> Result<()> {
    std::fs::write(path, render(dashboard)).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = dashboard.rows.len(), "wrote HTML dashboard");
    Ok(())
}
