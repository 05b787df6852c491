//! Rendering diagnostics for a terminal.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use bddlay_source::SourceText;

/// Formats a diagnostic against the document it refers to.
pub trait DiagnosticRenderer {
    /// Renders one diagnostic.
    fn render(&self, diag: &Diagnostic, source: &SourceText) -> String;

    /// Renders a batch, one after another.
    fn render_all(&self, diags: &[Diagnostic], source: &SourceText) -> String {
        diags.iter().map(|d| self.render(d, source)).collect()
    }
}

/// rustc-style output:
///
/// ```text
/// warning[W201]: unrecognized node shape `[0, 1]`
///   --> sample.bsd:2:9
///   |
/// 2 | [(0,1),[0, 1]]
///   |        ^^^^^^
///   = note: the node was skipped
/// ```
pub struct TerminalRenderer {
    /// Whether to emit ANSI colour codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{code}m{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source: &SourceText) -> String {
        let mut out = String::new();
        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(diag.severity, &header),
            diag.message
        ));

        if let (Some(loc), Some(line)) = (source.locate(diag.span), source.line_of(diag.span)) {
            let number = line.number.to_string();
            let gutter = " ".repeat(number.len());
            out.push_str(&format!("{gutter}--> {loc}\n"));
            out.push_str(&format!("{gutter} |\n"));
            out.push_str(&format!("{number} | {}\n", line.text));

            let line_end = line.span.end.max(diag.span.start + 1);
            let width = (diag.span.end.min(line_end) - diag.span.start).max(1) as usize;
            let indent = " ".repeat(loc.column as usize - 1);
            out.push_str(&format!("{gutter} | {indent}{}\n", "^".repeat(width)));
        }

        for note in &diag.notes {
            out.push_str(&format!("  = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("  = help: {help}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::codes;
    use bddlay_source::Span;

    #[test]
    fn render_with_span() {
        let source = SourceText::new("sample.bsd", "[(0,1)]\n[(0,1),[0, 1]]\n[0,1]\n".into());
        let diag = Diagnostic::warning(
            codes::UNRECOGNIZED_NODE_SHAPE,
            "unrecognized node shape `[0, 1]`",
            Span::new(15, 21),
        )
        .with_note("the node was skipped");

        let out = TerminalRenderer::new(false).render(&diag, &source);
        assert!(out.starts_with("warning[W201]: unrecognized node shape"));
        assert!(out.contains("--> sample.bsd:2:8"));
        assert!(out.contains("2 | [(0,1),[0, 1]]"));
        assert!(out.contains("  |        ^^^^^^"));
        assert!(out.contains("= note: the node was skipped"));
    }

    #[test]
    fn render_without_span() {
        let source = SourceText::new("sample.bsd", String::new());
        let diag = Diagnostic::note(
            codes::SHORT_CONTROL_SEQUENCE,
            "3 layers but only 2 control variables",
            Span::DUMMY,
        );
        let out = TerminalRenderer::new(false).render(&diag, &source);
        assert_eq!(out, "note[N205]: 3 layers but only 2 control variables\n");
    }

    #[test]
    fn color_wraps_header() {
        let source = SourceText::new("x", String::new());
        let diag = Diagnostic::error(codes::MALFORMED_LITERAL, "bad", Span::DUMMY);
        let out = TerminalRenderer::new(true).render(&diag, &source);
        assert!(out.starts_with("\x1b[1;31merror[E101]\x1b[0m: bad"));
    }
}
