//! Content stream reader.
//!
//! [`ContentReader`] walks decoded content stream bytes lazily and yields one
//! [`ContentRecord`] per operator, carrying the operands that preceded it.
//! Comments (`%` to end of line) are skipped. `BI ... ID ... EI` sequences
//! come back as a single [`ContentKind::InlineImage`] record.
//!
//! A syntax error is yielded once as `Err` and ends the iteration; records
//! already yielded stay valid.

use tracing::trace;

use crate::error::BackendError;
use crate::operator::{ContentKind, ContentRecord, Operand, PdfOperator};

/// Lazy operator reader over one decoded content stream.
#[derive(Debug, Clone)]
pub struct ContentReader<'a> {
    input: &'a [u8],
    pos: usize,
    operands: Vec<Operand>,
    finished: bool,
}

impl<'a> ContentReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            operands: Vec::new(),
            finished: false,
        }
    }

    /// Byte offset of the next unread token.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn error(&self, msg: impl Into<String>) -> BackendError {
        BackendError::Interpreter(format!("{} at byte {}", msg.into(), self.pos))
    }

    /// Read tokens until an operator completes a record.
    fn read_record(&mut self) -> Result<Option<ContentRecord>, BackendError> {
        loop {
            self.skip_whitespace_and_comments();
            let Some(b) = self.peek() else {
                if !self.operands.is_empty() {
                    trace!(
                        count = self.operands.len(),
                        "discarding operands left at end of stream"
                    );
                    self.operands.clear();
                }
                return Ok(None);
            };

            match b {
                b'(' => {
                    let s = self.read_literal_string()?;
                    self.operands.push(Operand::LiteralString(s));
                }
                b'<' if self.peek_at(1) == Some(b'<') => {
                    let dict = self.read_dictionary()?;
                    self.operands.push(Operand::Dictionary(dict));
                }
                b'<' => {
                    let s = self.read_hex_string()?;
                    self.operands.push(Operand::HexString(s));
                }
                b'[' => {
                    self.pos += 1;
                    let arr = self.read_array()?;
                    self.operands.push(Operand::Array(arr));
                }
                b'/' => {
                    let name = self.read_name();
                    self.operands.push(Operand::Name(name));
                }
                b'0'..=b'9' | b'+' | b'-' | b'.' => {
                    let num = self.read_number()?;
                    self.operands.push(num);
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'*' | b'\'' | b'"' => {
                    let keyword = self.read_keyword();
                    match keyword.as_str() {
                        "true" => self.operands.push(Operand::Boolean(true)),
                        "false" => self.operands.push(Operand::Boolean(false)),
                        "null" => self.operands.push(Operand::Null),
                        "BI" => {
                            self.operands.clear();
                            let (dict, data) = self.read_inline_image()?;
                            return Ok(Some(ContentRecord::new(
                                ContentKind::InlineImage,
                                PdfOperator::BeginInlineImage,
                                vec![Operand::Dictionary(dict), Operand::LiteralString(data)],
                            )));
                        }
                        _ => {
                            let operands = std::mem::take(&mut self.operands);
                            return Ok(Some(ContentRecord::from_keyword(&keyword, operands)));
                        }
                    }
                }
                b']' => return Err(self.error("unexpected ']' outside array")),
                _ => {
                    trace!(byte = b, offset = self.pos, "skipping unexpected byte");
                    self.pos += 1;
                }
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// `(...)` with balanced parentheses and backslash escapes.
    fn read_literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => {
                    let Some(escaped) = self.peek() else {
                        break;
                    };
                    self.pos += 1;
                    match escaped {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'\r' => {
                            // line continuation, CR or CRLF
                            if self.peek() == Some(b'\n') {
                                self.pos += 1;
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut val = escaped - b'0';
                            for _ in 0..2 {
                                match self.peek() {
                                    Some(d @ b'0'..=b'7') => {
                                        val = val.wrapping_mul(8).wrapping_add(d - b'0');
                                        self.pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            out.push(val);
                        }
                        // \( \) \\ and unknown escapes yield the byte itself
                        other => out.push(other),
                    }
                }
                _ => out.push(b),
            }
        }

        self.pos = self.input.len();
        Err(BackendError::Interpreter(format!(
            "unterminated literal string starting at byte {start}"
        )))
    }

    /// `<...>`; whitespace ignored, an odd final digit is padded with 0.
    fn read_hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        let start = self.pos;
        self.pos += 1;
        let mut digits = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(BackendError::Interpreter(format!(
                        "unterminated hex string starting at byte {start}"
                    )));
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b) if is_whitespace(b) => self.pos += 1,
                Some(b) => {
                    digits.push(hex_digit(b).ok_or_else(|| {
                        self.error(format!("invalid hex digit {:?}", b as char))
                    })?);
                    self.pos += 1;
                }
            }
        }
        if digits.len() % 2 != 0 {
            digits.push(0);
        }
        Ok(digits.chunks(2).map(|p| (p[0] << 4) | p[1]).collect())
    }

    /// Array body up to and including `]`; the `[` is already consumed.
    fn read_array(&mut self) -> Result<Vec<Operand>, BackendError> {
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => return Err(self.error("unterminated array")),
                Some(b']') => {
                    self.pos += 1;
                    return Ok(elements);
                }
                Some(_) => elements.push(self.read_value("array")?),
            }
        }
    }

    /// `<< /Key value ... >>`.
    fn read_dictionary(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        self.pos += 2;
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => return Err(self.error("unterminated dictionary")),
                (Some(b'>'), Some(b'>')) => {
                    self.pos += 2;
                    return Ok(entries);
                }
                (Some(b'/'), _) => {
                    let key = self.read_name();
                    self.skip_whitespace_and_comments();
                    if self.peek().is_none() {
                        return Err(self.error("unterminated dictionary"));
                    }
                    let value = self.read_value("dictionary")?;
                    entries.push((key, value));
                }
                _ => return Err(self.error("expected name key in dictionary")),
            }
        }
    }

    /// One value nested in an array, dictionary or inline image header.
    /// Bare keywords other than `true`/`false`/`null` read as names.
    fn read_value(&mut self, context: &str) -> Result<Operand, BackendError> {
        let Some(b) = self.peek() else {
            return Err(self.error(format!("unterminated {context}")));
        };
        let value = match b {
            b'/' => Operand::Name(self.read_name()),
            b'(' => Operand::LiteralString(self.read_literal_string()?),
            b'<' if self.peek_at(1) == Some(b'<') => Operand::Dictionary(self.read_dictionary()?),
            b'<' => Operand::HexString(self.read_hex_string()?),
            b'[' => {
                self.pos += 1;
                Operand::Array(self.read_array()?)
            }
            b'0'..=b'9' | b'+' | b'-' | b'.' => self.read_number()?,
            b'a'..=b'z' | b'A'..=b'Z' => match self.read_keyword().as_str() {
                "true" => Operand::Boolean(true),
                "false" => Operand::Boolean(false),
                "null" => Operand::Null,
                other => Operand::Name(other.to_string()),
            },
            _ => {
                return Err(self.error(format!("unexpected byte 0x{b:02X} in {context}")));
            }
        };
        Ok(value)
    }

    /// `/Name` with `#xx` escapes decoded.
    fn read_name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !is_whitespace(b) && !is_delimiter(b))
        {
            self.pos += 1;
        }

        let raw = &self.input[start..self.pos];
        let mut name = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(hi), Some(lo)) = (hex_digit(raw[i + 1]), hex_digit(raw[i + 2])) {
                    name.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            name.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&name).into_owned()
    }

    fn read_number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut has_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'.' if !has_dot => has_dot = true,
                b'0'..=b'9' => {}
                _ => break,
            }
            self.pos += 1;
        }

        // ASCII only, so this cannot fail
        let token = String::from_utf8_lossy(&self.input[start..self.pos]);
        if has_dot {
            // "-." and "." are malformed but common; PDF readers treat them as 0
            let digits = token.trim_start_matches(['+', '-']);
            if digits == "." {
                return Ok(Operand::Real(0.0));
            }
            token
                .parse()
                .map(Operand::Real)
                .map_err(|_| self.error(format!("invalid real number {token:?}")))
        } else if let Ok(i) = token.parse() {
            Ok(Operand::Integer(i))
        } else {
            // out of i64 range
            token
                .parse()
                .map(Operand::Real)
                .map_err(|_| self.error(format!("invalid integer {token:?}")))
        }
    }

    /// Operator keyword: a letter or quote, then letters, digits or `*`.
    fn read_keyword(&mut self) -> String {
        let start = self.pos;
        self.pos += 1;
        if !matches!(self.input[start], b'\'' | b'"') {
            while self
                .peek()
                .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'*')
            {
                self.pos += 1;
            }
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Header entries and data of an inline image; `BI` is already consumed.
    fn read_inline_image(&mut self) -> Result<(Vec<(String, Operand)>, Vec<u8>), BackendError> {
        let mut dict = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1), self.peek_at(2)) {
                (None, _, _) => return Err(self.error("inline image without ID")),
                (Some(b'I'), Some(b'D'), next) if next.is_none_or(is_whitespace) => {
                    self.pos += 2;
                    // exactly one whitespace byte separates ID from the data
                    if self.peek().is_some_and(is_whitespace) {
                        self.pos += 1;
                    }
                    break;
                }
                (Some(b'/'), _, _) => {
                    let key = self.read_name();
                    self.skip_whitespace_and_comments();
                    let value = self.read_value("inline image header")?;
                    dict.push((key, value));
                }
                _ => return Err(self.error("expected name key in inline image header")),
            }
        }

        let data_start = self.pos;
        let input = self.input;
        let mut i = data_start;
        while i + 1 < input.len() {
            let preceded = i == data_start || is_whitespace(input[i - 1]);
            let followed = input
                .get(i + 2)
                .is_none_or(|&b| is_whitespace(b) || is_delimiter(b));
            if preceded && followed && input[i] == b'E' && input[i + 1] == b'I' {
                let mut end = i;
                if end > data_start && is_whitespace(input[end - 1]) {
                    end -= 1;
                }
                self.pos = i + 2;
                return Ok((dict, input[data_start..end].to_vec()));
            }
            i += 1;
        }

        self.pos = input.len();
        Err(BackendError::Interpreter(format!(
            "inline image starting at byte {data_start} has no EI"
        )))
    }
}

impl Iterator for ContentReader<'_> {
    type Item = Result<ContentRecord, BackendError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Read a whole content stream eagerly.
///
/// # Errors
///
/// Returns the first syntax error; records before it are discarded.
pub fn tokenize(input: &[u8]) -> Result<Vec<ContentRecord>, BackendError> {
    ContentReader::new(input).collect()
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
