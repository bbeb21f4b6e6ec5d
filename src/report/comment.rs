//! Comment body assembly.
//!
//! The first line of every body is the identity marker
//! (`**<title><identity>**`). Callers look for it in existing comments to
//! avoid posting the same report twice.

use serde::Serialize;
use tracing::warn;

use crate::config::ReportConfig;
use crate::report::html::html_escape;
use crate::{DeltasError, DeltasResult};

pub const DETAIL_SUMMARY_LABEL: &str = "Click for full report table";

pub const DETAIL_OMITTED_NOTICE: &str =
    "_The full report table was omitted because it does not fit in a single comment._";

/// An assembled comment body ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentReport {
    /// Commit hash or content digest the report is keyed on
    pub identity: String,
    pub body: String,
    /// True when the detail table had to be dropped to fit the length budget
    pub detail_omitted: bool,
}

impl CommentReport {
    pub fn length(&self) -> usize {
        self.body.chars().count()
    }
}

/// The identity marker a report body starts with.
pub fn marker(title: &str, identity: &str) -> String {
    format!("**{}{}**", title, identity)
}

/// Whether any existing comment body already carries the marker.
pub fn report_exists<'a>(bodies: impl IntoIterator<Item = &'a str>, marker: &str) -> bool {
    bodies.into_iter().any(|body| body.starts_with(marker))
}

/// Assemble the comment from the two rendered HTML tables.
///
/// When the full body exceeds `config.max_length` characters the detail
/// table is replaced by a notice.
///
/// # Errors
/// Returns `ReportTooLarge` if the body does not fit even without the
/// detail table.
pub fn assemble(
    identity: &str,
    summary_html: &str,
    detail_html: &str,
    config: &ReportConfig,
) -> DeltasResult<CommentReport> {
    let head = format!(
        "{}\n\n{}\n\n{}\n",
        marker(&config.title, identity),
        config.explanation,
        summary_html
    );

    let full = format!(
        "{head}<details>\n<summary>{}</summary>\n\n{}</details>\n",
        html_escape(DETAIL_SUMMARY_LABEL),
        detail_html
    );
    let full_length = full.chars().count();
    if full_length <= config.max_length {
        return Ok(CommentReport {
            identity: identity.to_string(),
            body: full,
            detail_omitted: false,
        });
    }

    let short = format!("{head}{DETAIL_OMITTED_NOTICE}\n");
    let short_length = short.chars().count();
    if short_length > config.max_length {
        return Err(DeltasError::ReportTooLarge {
            length: short_length,
            limit: config.max_length,
        });
    }

    warn!(
        length = full_length,
        limit = config.max_length,
        "report too long for a comment, dropping the detail table"
    );
    Ok(CommentReport {
        identity: identity.to_string(),
        body: short,
        detail_omitted: true,
    })
}
