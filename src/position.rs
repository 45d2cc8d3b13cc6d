use std::fmt;
use std::sync::Arc;

/// Source name used when the caller does not supply one.
pub const DEFAULT_SOURCE_NAME: &str = "<stdin>";

/// Snapshot of a scan location.
///
/// `index` counts characters (not bytes) from the start of the source,
/// `line` is 1-based and `column` is 0-based. The source name and the
/// full text are shared, so copying a position is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub source_name: Arc<str>,
    pub text: Arc<str>,
}

impl Position {
    /// Position of the first character of `text`.
    #[must_use]
    pub fn start(source_name: &str, text: &str) -> Self {
        Self {
            index: 0,
            line: 1,
            column: 0,
            source_name: Arc::from(source_name),
            text: Arc::from(text),
        }
    }

    /// Move past `consumed`. A newline bumps the line and resets the column.
    pub const fn advance(&mut self, consumed: Option<char>) {
        self.index += 1;
        self.column += 1;
        if let Some('\n') = consumed {
            self.line += 1;
            self.column = 0;
        }
    }

    /// The full source line this position sits on, without its newline.
    #[must_use]
    pub fn line_text(&self) -> &str {
        self.text
            .split('\n')
            .nth(self.line.saturating_sub(1))
            .unwrap_or("")
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File {}, line {}, column {}",
            self.source_name, self.line, self.column
        )
    }
}

/// Render the source line under `start` with `^` markers covering
/// `start..end`. Multi-line ranges mark every covered line.
#[must_use]
pub fn render_context(start: &Position, end: &Position) -> String {
    let mut out = String::new();
    let last_line = end.line.max(start.line);

    for line_no in start.line..=last_line {
        let line = if line_no == start.line {
            start.line_text()
        } else if line_no == end.line {
            end.line_text()
        } else {
            start.text.split('\n').nth(line_no - 1).unwrap_or("")
        };
        let width = line.chars().count();

        let from = if line_no == start.line {
            start.column
        } else {
            0
        };
        let to = if line_no == end.line {
            end.column
        } else {
            width
        };
        let marks = to.saturating_sub(from).max(1);

        out.push_str(line);
        out.push('\n');
        out.push_str(&" ".repeat(from));
        out.push_str(&"^".repeat(marks));
        if line_no != last_line {
            out.push('\n');
        }
    }

    out
}
