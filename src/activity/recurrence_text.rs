//! Safe decoder for the legacy textual recurrence encoding.
//!
//! Legacy tables hold recurrences as mapping literals, for example
//! `{'type': 'weekly', 'days': [0, 2, 4]}` or `{"type": "daily"}`. This is a
//! small recursive-descent parser over that literal grammar:
//!
//! ```text
//! map    := '{' (key ':' value (',' key ':' value)* ','?)? '}'
//! key    := string
//! value  := string | integer | list | map | None | null | True | False
//! list   := ('[' | '(') (value (',' value)* ','?)? (']' | ')')
//! string := '\'' chars '\'' | '"' chars '"'
//! ```
//!
//! Only the `type` (or `kind`) and `days` keys are interpreted; other keys
//! are parsed and ignored. Nothing is ever executed.

use std::collections::BTreeSet;

use super::types::{Recurrence, RecurrenceKind};

/// Deepest list/map nesting accepted inside the top-level mapping.
pub const MAX_NESTING: usize = 32;

/// Failure to decode a textual recurrence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceTextError {
    /// A specific token was expected at the given character offset.
    #[error("expected {expected} at offset {offset}")]
    Expected {
        expected: &'static str,
        offset: usize,
    },
    /// A quoted string was never closed.
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    /// An integer literal did not fit.
    #[error("integer out of range at offset {0}")]
    IntegerOverflow(usize),
    /// `days` held something other than a list of small integers.
    #[error("invalid days value: {0}")]
    InvalidDays(String),
    /// Input continued after the closing brace.
    #[error("unexpected trailing input at offset {0}")]
    TrailingInput(usize),
    /// Lists or maps nested deeper than [`MAX_NESTING`].
    #[error("nesting too deep at offset {0}")]
    TooDeep(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
    List(Vec<Literal>),
    Map(Vec<(String, Literal)>),
}

/// Parse a textual recurrence mapping into a [`Recurrence`].
///
/// A missing `type` key means daily; a `type` that is not a string decodes
/// as [`RecurrenceKind::Unrecognized`]; a null `days` is treated as absent.
pub fn parse_recurrence_text(text: &str) -> Result<Recurrence, RecurrenceTextError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let entries = parser.parse_map()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(RecurrenceTextError::TrailingInput(parser.pos));
    }

    let mut kind = RecurrenceKind::Daily;
    let mut days = None;
    for (key, value) in entries {
        match key.as_str() {
            "type" | "kind" => {
                kind = match value {
                    Literal::Str(name) => RecurrenceKind::from_name(&name),
                    _ => RecurrenceKind::Unrecognized,
                };
            }
            "days" => days = decode_days(value)?,
            _ => {}
        }
    }

    Ok(Recurrence { kind, days })
}

fn decode_days(value: Literal) -> Result<Option<BTreeSet<u8>>, RecurrenceTextError> {
    let items = match value {
        Literal::Null => return Ok(None),
        Literal::List(items) => items,
        other => {
            return Err(RecurrenceTextError::InvalidDays(format!(
                "expected a list, found {other:?}"
            )));
        }
    };

    let mut days = BTreeSet::new();
    for item in items {
        match item {
            Literal::Int(n) => {
                let day = u8::try_from(n).map_err(|_| {
                    RecurrenceTextError::InvalidDays(format!("{n} is not a valid day number"))
                })?;
                days.insert(day);
            }
            other => {
                return Err(RecurrenceTextError::InvalidDays(format!(
                    "expected an integer, found {other:?}"
                )));
            }
        }
    }
    Ok(Some(days))
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn descend(&mut self) -> Result<(), RecurrenceTextError> {
        if self.depth >= MAX_NESTING {
            return Err(RecurrenceTextError::TooDeep(self.pos));
        }
        self.depth += 1;
        Ok(())
    }

    fn expect(&mut self, ch: char, expected: &'static str) -> Result<(), RecurrenceTextError> {
        self.skip_ws();
        if self.peek() == Some(ch) {
            self.pos += 1;
            Ok(())
        } else {
            Err(RecurrenceTextError::Expected {
                expected,
                offset: self.pos,
            })
        }
    }

    fn parse_map(&mut self) -> Result<Vec<(String, Literal)>, RecurrenceTextError> {
        self.expect('{', "'{'")?;
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(entries);
            }
            let key = match self.peek() {
                Some('\'' | '"') => self.parse_string()?,
                _ => {
                    return Err(RecurrenceTextError::Expected {
                        expected: "quoted key",
                        offset: self.pos,
                    });
                }
            };
            self.expect(':', "':'")?;
            let value = self.parse_value()?;
            entries.push((key, value));

            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                _ => {
                    return Err(RecurrenceTextError::Expected {
                        expected: "',' or '}'",
                        offset: self.pos,
                    });
                }
            }
        }
    }

    fn parse_list(&mut self, close: char) -> Result<Vec<Literal>, RecurrenceTextError> {
        // Opening bracket already consumed.
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(c) if c == close => {}
                _ => {
                    return Err(RecurrenceTextError::Expected {
                        expected: "',' or closing bracket",
                        offset: self.pos,
                    });
                }
            }
        }
    }

    fn parse_value(&mut self) -> Result<Literal, RecurrenceTextError> {
        self.skip_ws();
        match self.peek() {
            Some('{') => {
                self.descend()?;
                let entries = self.parse_map()?;
                self.depth -= 1;
                Ok(Literal::Map(entries))
            }
            Some(open @ ('[' | '(')) => {
                self.descend()?;
                self.pos += 1;
                let close = if open == '[' { ']' } else { ')' };
                let items = self.parse_list(close)?;
                self.depth -= 1;
                Ok(Literal::List(items))
            }
            Some('\'' | '"') => Ok(Literal::Str(self.parse_string()?)),
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() => self.parse_int(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_keyword(),
            _ => Err(RecurrenceTextError::Expected {
                expected: "value",
                offset: self.pos,
            }),
        }
    }

    fn parse_string(&mut self) -> Result<String, RecurrenceTextError> {
        let start = self.pos;
        let Some(quote) = self.peek() else {
            return Err(RecurrenceTextError::Expected {
                expected: "string",
                offset: start,
            });
        };
        self.pos += 1;

        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(RecurrenceTextError::UnterminatedString(start));
            };
            self.pos += 1;
            if c == quote {
                return Ok(out);
            }
            if c == '\\' {
                let Some(escaped) = self.peek() else {
                    return Err(RecurrenceTextError::UnterminatedString(start));
                };
                self.pos += 1;
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            } else {
                out.push(c);
            }
        }
    }

    fn parse_int(&mut self) -> Result<Literal, RecurrenceTextError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.pos += 1;
                true
            }
            Some('+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let mut value: i64 = 0;
        let mut digits = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(i64::from(d)))
                .ok_or(RecurrenceTextError::IntegerOverflow(start))?;
            digits += 1;
            self.pos += 1;
        }
        if digits == 0 {
            return Err(RecurrenceTextError::Expected {
                expected: "digit",
                offset: self.pos,
            });
        }
        Ok(Literal::Int(if negative { -value } else { value }))
    }

    fn parse_keyword(&mut self) -> Result<Literal, RecurrenceTextError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "None" | "null" => Ok(Literal::Null),
            "True" | "true" => Ok(Literal::Bool(true)),
            "False" | "false" => Ok(Literal::Bool(false)),
            _ => Err(RecurrenceTextError::Expected {
                expected: "literal value",
                offset: start,
            }),
        }
    }
}
