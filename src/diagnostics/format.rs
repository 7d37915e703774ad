//! Diagnostic output formatting (`spec.md` §4.6).

use std::fmt::Write as _;

use super::entry::{DiagnosticEntry, Severity};
use super::sink::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    CompilerOutput,
    HtmlOutput,
}

impl OutputMode {
    pub fn render(self, entries: &[DiagnosticEntry], summary: Summary) -> String {
        match self {
            OutputMode::CompilerOutput => render_compiler(entries, summary),
            OutputMode::HtmlOutput => render_html(entries, summary),
        }
    }
}

fn render_compiler(entries: &[DiagnosticEntry], summary: Summary) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}: {}: {}", entry.position, entry.severity, entry.text);
    }
    let _ = write!(out, "Warnings: {}, Errors: {}", summary.warnings, summary.errors);
    out
}

fn render_html(entries: &[DiagnosticEntry], summary: Summary) -> String {
    let mut out = String::from("<html><body><ul>");
    for entry in entries {
        let class = match entry.severity {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        let _ = write!(out, "<li class=\"{class}\">{}</li>", html_escape(&entry.text));
    }
    let _ = write!(out, "</ul>Warnings: {}, Errors: {}</body></html>", summary.warnings, summary.errors);
    out
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::Position;
    use crate::diagnostics::entry::Reason;

    #[test]
    fn compiler_output_has_no_header_and_a_summary_footer() {
        let entries = vec![DiagnosticEntry::warning(Position::new("a.c", 3, 1, 0), "hm".into())];
        let text = OutputMode::CompilerOutput.render(&entries, Summary { notes: 0, warnings: 1, errors: 0 });
        assert_eq!(text, "a.c:3: warning: hm\nWarnings: 1, Errors: 0");
    }

    #[test]
    fn html_output_wraps_entries_in_list_items() {
        let entries = vec![DiagnosticEntry::error(Position::new("a.c", 1, 1, 0), "bad".into(), Reason::Other)];
        let text = OutputMode::HtmlOutput.render(&entries, Summary { notes: 0, warnings: 0, errors: 1 });
        assert!(text.starts_with("<html><body><ul>"));
        assert!(text.contains("<li class=\"error\">bad</li>"));
        assert!(text.ends_with("</body></html>"));
    }

    #[test]
    fn summary_line_prints_even_with_zero_entries() {
        let text = OutputMode::CompilerOutput.render(&[], Summary::default());
        assert_eq!(text, "Warnings: 0, Errors: 0");
    }
}
