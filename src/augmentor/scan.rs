//! Minimal structured scan of generated route-helper sources.
//!
//! The patch step needs two exact answers about a file: does a top-level
//! `<target>.form = ...` assignment already exist, and where does the last
//! `<target>.<verb> = ...` assignment end. A whole-file regex cannot answer
//! either reliably once method names repeat inside strings or nested scopes,
//! so this scanner walks the source once, skipping comments and string
//! literals (template interpolation included), tracking bracket depth, and
//! records every property assignment that starts at statement level.
//!
//! This is a scanner for generated TypeScript, not a general parser: the
//! expression-continuation heuristics cover the shapes the generator emits.

/// A top-level `target.property = <expression>` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: String,
    pub property: String,
    /// Byte offset of the first character of `target`.
    pub start: usize,
    /// Byte offset one past the end of the right-hand side expression.
    pub end: usize,
}

/// Scan `source` and return its top-level property assignments in order.
#[must_use]
pub fn scan_assignments(source: &str) -> Vec<Assignment> {
    Scanner::new(source).run()
}

struct Pending {
    target: String,
    property: String,
    start: usize,
    /// One past the last significant right-hand-side byte seen so far.
    last_significant: usize,
    rhs_seen: bool,
}

struct Scanner<'a> {
    bytes: &'a [u8],
    i: usize,
    depth: usize,
    statement_start: bool,
    pending: Option<Pending>,
    assignments: Vec<Assignment>,
}

const fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

const fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            i: 0,
            depth: 0,
            statement_start: true,
            pending: None,
            assignments: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Assignment> {
        while self.i < self.bytes.len() {
            let b = self.bytes[self.i];

            match b {
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment(),
                b'\'' | b'"' => {
                    self.skip_string(b);
                    self.mark_significant();
                }
                b'`' => {
                    self.skip_template();
                    self.mark_significant();
                }
                b'(' | b'[' | b'{' => {
                    self.depth += 1;
                    self.i += 1;
                    self.mark_significant();
                }
                b')' | b']' | b'}' => {
                    self.depth = self.depth.saturating_sub(1);
                    self.i += 1;
                    self.mark_significant();
                }
                b';' if self.depth == 0 => {
                    self.i += 1;
                    if let Some(pending) = self.pending.take() {
                        // A statement terminator belongs to the assignment.
                        self.finish(pending, self.i);
                    }
                    self.statement_start = true;
                }
                b'\n' if self.depth == 0 => {
                    self.i += 1;
                    let ends = self
                        .pending
                        .as_ref()
                        .is_some_and(|p| p.rhs_seen && !self.continues_expression());
                    if ends {
                        if let Some(pending) = self.pending.take() {
                            let end = pending.last_significant;
                            self.finish(pending, end);
                        }
                    }
                    if self.pending.is_none() {
                        self.statement_start = true;
                    }
                }
                _ if b.is_ascii_whitespace() => self.i += 1,
                _ if self.pending.is_none()
                    && self.statement_start
                    && self.depth == 0
                    && is_ident_start(b) =>
                {
                    self.try_assignment();
                }
                _ => {
                    self.i += 1;
                    self.mark_significant();
                    self.statement_start = false;
                }
            }
        }

        if let Some(pending) = self.pending.take() {
            if pending.rhs_seen {
                let end = pending.last_significant;
                self.finish(pending, end);
            }
        }

        self.assignments
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.i + ahead).copied()
    }

    fn finish(&mut self, pending: Pending, end: usize) {
        self.assignments.push(Assignment {
            target: pending.target,
            property: pending.property,
            start: pending.start,
            end,
        });
    }

    /// Record progress of the pending right-hand side.
    fn mark_significant(&mut self) {
        if let Some(pending) = self.pending.as_mut() {
            pending.last_significant = self.i;
            pending.rhs_seen = true;
        }
    }

    /// Try to parse `ident . ident =` starting at the current position. On a
    /// miss, consume the leading identifier so scanning resumes after it.
    fn try_assignment(&mut self) {
        let bytes = self.bytes;
        let start = self.i;

        let mut j = start;
        while j < bytes.len() && is_ident_char(bytes[j]) {
            j += 1;
        }
        let target_end = j;

        let miss = |scanner: &mut Self| {
            scanner.i = target_end;
            scanner.statement_start = false;
        };

        let mut k = target_end;
        while k < bytes.len() && matches!(bytes[k], b' ' | b'\t') {
            k += 1;
        }
        if bytes.get(k) != Some(&b'.') {
            return miss(self);
        }
        k += 1;
        while k < bytes.len() && matches!(bytes[k], b' ' | b'\t') {
            k += 1;
        }

        let prop_start = k;
        while k < bytes.len() && is_ident_char(bytes[k]) {
            k += 1;
        }
        if k == prop_start {
            return miss(self);
        }
        let prop_end = k;

        while k < bytes.len() && matches!(bytes[k], b' ' | b'\t') {
            k += 1;
        }
        if bytes.get(k) != Some(&b'=') || matches!(bytes.get(k + 1), Some(b'=') | Some(b'>')) {
            return miss(self);
        }

        self.pending = Some(Pending {
            target: String::from_utf8_lossy(&bytes[start..target_end]).into_owned(),
            property: String::from_utf8_lossy(&bytes[prop_start..prop_end]).into_owned(),
            start,
            last_significant: k + 1,
            rhs_seen: false,
        });
        self.i = k + 1;
        self.statement_start = false;
    }

    /// Whether the text after a depth-zero newline keeps the pending
    /// expression going (chained call, arrow, ternary, operator).
    fn continues_expression(&self) -> bool {
        let bytes = self.bytes;
        let mut k = self.i;
        while k < bytes.len() && bytes[k].is_ascii_whitespace() {
            k += 1;
        }

        match bytes.get(k) {
            Some(b'.' | b'(' | b'[' | b'`' | b'?' | b':' | b'+' | b'*' | b'&' | b'|') => true,
            Some(b'=') => bytes.get(k + 1) == Some(&b'>'),
            _ => false,
        }
    }

    fn skip_line_comment(&mut self) {
        while self.i < self.bytes.len() && self.bytes[self.i] != b'\n' {
            self.i += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.i += 2;
        while self.i + 1 < self.bytes.len() {
            if self.bytes[self.i] == b'*' && self.bytes[self.i + 1] == b'/' {
                self.i += 2;
                return;
            }
            self.i += 1;
        }
        self.i = self.bytes.len();
    }

    fn skip_string(&mut self, quote: u8) {
        self.i += 1;
        while self.i < self.bytes.len() {
            match self.bytes[self.i] {
                b'\\' => self.i += 2,
                b if b == quote => {
                    self.i += 1;
                    return;
                }
                _ => self.i += 1,
            }
        }
    }

    fn skip_template(&mut self) {
        self.i += 1;
        while self.i < self.bytes.len() {
            match self.bytes[self.i] {
                b'\\' => self.i += 2,
                b'`' => {
                    self.i += 1;
                    return;
                }
                b'$' if self.peek(1) == Some(b'{') => {
                    self.i += 2;
                    self.skip_interpolation();
                }
                _ => self.i += 1,
            }
        }
    }

    fn skip_interpolation(&mut self) {
        let mut braces = 1usize;
        while self.i < self.bytes.len() {
            match self.bytes[self.i] {
                b'\'' | b'"' => {
                    let quote = self.bytes[self.i];
                    self.skip_string(quote);
                }
                b'`' => self.skip_template(),
                b'{' => {
                    braces += 1;
                    self.i += 1;
                }
                b'}' => {
                    braces -= 1;
                    self.i += 1;
                    if braces == 0 {
                        return;
                    }
                }
                _ => self.i += 1,
            }
        }
    }
}
