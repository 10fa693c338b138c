//! HTML wrapping of quarto-citeproc bibliography entries.
//!
//! Inline markup comes from quarto-citeproc's CSL HTML renderer. This module
//! applies the locale's punctuation rule and adds the `csl-entry` wrapper
//! used by citeproc-js's `html` output format.

use quarto_citeproc::output::{Output, move_punctuation_inside_quotes, render_blocks_to_csl_html};

/// Opening wrapper for a rendered bibliography.
pub const BIB_START: &str = "<div class=\"csl-bib-body\">\n";
/// Closing wrapper for a rendered bibliography.
pub const BIB_END: &str = "</div>";

/// Render one bibliography entry as a `csl-entry` block.
///
/// When `punctuation_in_quote` is set (as in the English locales), periods
/// and commas following a closing quote are moved inside it first.
pub fn render_entry(output: Output, punctuation_in_quote: bool) -> String {
    let output = if punctuation_in_quote {
        move_punctuation_inside_quotes(output)
    } else {
        output
    };
    let html = render_blocks_to_csl_html(&output.to_blocks());
    wrap_entry(&html)
}

fn wrap_entry(html: &str) -> String {
    if html.contains("class=\"csl-left-margin\"") || html.contains("class=\"csl-right-inline\"") {
        format!("  <div class=\"csl-entry\">\n    {html}\n  </div>\n")
    } else if html.contains("class=\"csl-indent\"") || html.contains("class=\"csl-block\"") {
        format!("  <div class=\"csl-entry\">{html}\n  </div>\n")
    } else {
        format!("  <div class=\"csl-entry\">{html}</div>\n")
    }
}
