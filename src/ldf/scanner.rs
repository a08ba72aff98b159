/// Event emitted by the [`Scanner`] when a delimiter closes the current buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScanEvent {
    /// Text terminated by `;`.
    Statement(String),
    /// Text terminated by `{` (possibly empty).
    GroupStart(String),
    /// Text terminated by `}` (possibly empty).
    GroupEnd(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Comment {
    None,
    /// A `/` was read outside quotes.
    Slash,
    /// `//` comment (or a lone `/`), skipped until newline.
    Line,
    /// `/* ... */` comment.
    Block,
    /// A `*` was read inside a block comment.
    BlockStar,
}

/// Character scanner splitting LDF text into statements and group boundaries.
///
/// - `;` terminates a statement, `{` and `}` terminate one and open/close a group.
/// - Comments are skipped. Quoted text is kept verbatim, delimiters included.
/// - Leading whitespace is dropped; a line break inside a statement becomes one space.
#[derive(Debug)]
pub(crate) struct Scanner {
    buffer: String,
    in_quotes: bool,
    comment: Comment,
}

impl Scanner {
    pub(crate) fn new() -> Scanner {
        Scanner {
            buffer: String::new(),
            in_quotes: false,
            comment: Comment::None,
        }
    }

    /// Consumes one character, returning an event when it closes the buffer.
    pub(crate) fn push(&mut self, ch: char) -> Option<ScanEvent> {
        match self.comment {
            Comment::Slash => {
                self.comment = match ch {
                    '*' => Comment::Block,
                    '\n' => Comment::None,
                    _ => Comment::Line,
                };
                if ch == '\n' {
                    self.push_whitespace();
                }
                return None;
            }
            Comment::Line => {
                if ch == '\n' {
                    self.comment = Comment::None;
                    self.push_whitespace();
                }
                return None;
            }
            Comment::Block => {
                if ch == '*' {
                    self.comment = Comment::BlockStar;
                }
                return None;
            }
            Comment::BlockStar => {
                self.comment = match ch {
                    '/' => Comment::None,
                    '*' => Comment::BlockStar,
                    _ => Comment::Block,
                };
                return None;
            }
            Comment::None => {}
        }

        if self.in_quotes {
            if ch == '"' {
                self.in_quotes = false;
            }
            if ch == '\n' || ch == '\r' {
                self.buffer.push(' ');
            } else {
                self.buffer.push(ch);
            }
            return None;
        }

        match ch {
            '"' => {
                self.in_quotes = true;
                self.buffer.push(ch);
                None
            }
            '/' => {
                self.comment = Comment::Slash;
                None
            }
            ';' => {
                let text: String = self.take();
                (!text.is_empty()).then_some(ScanEvent::Statement(text))
            }
            '{' => Some(ScanEvent::GroupStart(self.take())),
            '}' => Some(ScanEvent::GroupEnd(self.take())),
            c if c.is_whitespace() => {
                self.push_whitespace_char(c);
                None
            }
            c => {
                self.buffer.push(c);
                None
            }
        }
    }

    /// Text left in the buffer at end of input (a statement without terminator).
    pub(crate) fn finish(&mut self) -> Option<ScanEvent> {
        self.comment = Comment::None;
        self.in_quotes = false;
        let text: String = self.take();
        (!text.is_empty()).then_some(ScanEvent::Statement(text))
    }

    fn take(&mut self) -> String {
        let text: String = self.buffer.trim_end().to_string();
        self.buffer.clear();
        text
    }

    fn push_whitespace(&mut self) {
        self.push_whitespace_char(' ');
    }

    fn push_whitespace_char(&mut self, ch: char) {
        if self.buffer.is_empty() {
            return;
        }
        match ch {
            '\n' | '\r' | '\t' => self.buffer.push(' '),
            c => self.buffer.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<ScanEvent> {
        let mut scanner: Scanner = Scanner::new();
        let mut events: Vec<ScanEvent> = text.chars().filter_map(|c| scanner.push(c)).collect();
        events.extend(scanner.finish());
        events
    }

    #[test]
    fn test_statements_and_groups() {
        let events: Vec<ScanEvent> = scan("  A = 1;\r\nNodes {\n  Master: ECU, 5 ms;\n}\n");
        assert_eq!(
            events,
            vec![
                ScanEvent::Statement("A = 1".to_string()),
                ScanEvent::GroupStart("Nodes".to_string()),
                ScanEvent::Statement("Master: ECU, 5 ms".to_string()),
                ScanEvent::GroupEnd(String::new()),
            ]
        );
    }

    #[test]
    fn test_comments() {
        let events: Vec<ScanEvent> =
            scan("// header; {\nA; /* block ; } */ B;\nC /* inline */ D; / lone\nE;");
        assert_eq!(
            events,
            vec![
                ScanEvent::Statement("A".to_string()),
                ScanEvent::Statement("B".to_string()),
                ScanEvent::Statement("C  D".to_string()),
                ScanEvent::Statement("E".to_string()),
            ]
        );
    }

    #[test]
    fn test_quotes_and_line_breaks() {
        let events: Vec<ScanEvent> = scan("U = \"km/h; {x}\";\nSig: 8,\n  0, Door;\nlast");
        assert_eq!(
            events,
            vec![
                ScanEvent::Statement("U = \"km/h; {x}\"".to_string()),
                ScanEvent::Statement("Sig: 8,   0, Door".to_string()),
                ScanEvent::Statement("last".to_string()),
            ]
        );
    }

    #[test]
    fn test_text_before_group_end() {
        assert_eq!(
            scan("T { F delay 10 ms }"),
            vec![
                ScanEvent::GroupStart("T".to_string()),
                ScanEvent::GroupEnd("F delay 10 ms".to_string()),
            ]
        );
    }
}
