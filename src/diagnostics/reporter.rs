//! Diagnostic reporter that collects diagnostics across stages.

use super::{Diagnostic, SourceLocation};

/// Collects diagnostics during compilation. Byte offsets from the
/// lexer and parser are resolved to line and column through a line
/// table built once from the source.
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
    source: String,
    file: String,
    lines: Vec<(usize, usize)>, // (start, end) byte offsets per line
}

impl DiagnosticReporter {
    pub fn new(file: &str, source: &str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;

        for (i, c) in source.char_indices() {
            if c == '\n' {
                lines.push((start, i));
                start = i + 1;
            }
        }

        // last line has no trailing newline
        if start <= source.len() {
            lines.push((start, source.len()));
        }

        Self {
            diagnostics: Vec::new(),
            source: source.to_string(),
            file: file.to_string(),
            lines,
        }
    }

    /// Resolve a byte offset to a location plus the line's content
    pub fn location_from_offset(&self, offset: usize) -> (SourceLocation, String) {
        let mut line_num = 1;
        let mut line_start = 0;

        for (i, &(start, end)) in self.lines.iter().enumerate() {
            if offset >= start && offset <= end {
                line_num = i + 1;
                line_start = start;
                break;
            }
        }

        let column = offset - line_start + 1;
        let line_content = self.line(line_num);

        (
            SourceLocation::new(&self.file, line_num, column, 1),
            line_content,
        )
    }

    fn line(&self, line_num: usize) -> String {
        if line_num == 0 || line_num > self.lines.len() {
            return String::new();
        }

        let (start, end) = self.lines[line_num - 1];
        self.source[start..end].to_string()
    }

    /// Attach location and source line to a diagnostic, then record it
    pub fn report(&mut self, diagnostic: Diagnostic, offset: usize, length: usize) {
        let (mut loc, line_content) = self.location_from_offset(offset);
        loc.length = length;

        self.diagnostics
            .push(diagnostic.with_location(loc).with_source_line(line_content));
    }

    /// Record a diagnostic that carries no source position
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the reporter, yielding everything collected
    pub fn take_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn offset_resolves_to_line_and_column() {
        let reporter = DiagnosticReporter::new("test.trc", "let x: int = 5;\nlet y: int = 6;\n");
        let (loc, line) = reporter.location_from_offset(20);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 5);
        assert_eq!(line, "let y: int = 6;");
    }

    #[test]
    fn offset_on_last_line_without_newline() {
        let reporter = DiagnosticReporter::new("test.trc", "a\nreturn 0;");
        let (loc, line) = reporter.location_from_offset(2);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
        assert_eq!(line, "return 0;");
    }

    #[test]
    fn error_count_ignores_warnings() {
        let mut reporter = DiagnosticReporter::new("test.trc", "x");
        reporter.add(Diagnostic::warning("E202", "w"));
        reporter.add(Diagnostic::error("E100", "e"));
        assert_eq!(reporter.error_count(), 1);
        assert!(reporter.has_errors());
    }
}
