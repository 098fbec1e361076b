//! The incremental token reader.
//!
//! [`JsonReader`] runs two cooperating state machines: a grammar machine
//! that tracks where the document is (between values, after a field name,
//! after an element) and a lexer machine that tracks where inside the
//! current token the cursor is. Input arrives in chunks through
//! [`JsonReader::feed`]; when a chunk runs out mid-token the lexer state,
//! scratch buffer, and digit-shape counters persist, so the next chunk
//! resumes exactly where the previous one stopped. With pending data
//! exhausted and [`JsonReader::end_input`] not yet called, `next_token`
//! returns [`Token::NotAvailable`] rather than guessing whether a token is
//! complete.
//!
//! Scalar payloads are decoded into a scratch buffer during lexing, but all
//! numeric parsing is deferred to the first value access: the lexer only
//! records the literal's digit shape, and the accessors classify and parse
//! on demand through the [`crate::numbers`] machinery.

mod buffer;
mod escape;
mod literal;

use alloc::{string::String, vec::Vec};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use buffer::CharRing;
use escape::{EscapeStep, UnicodeEscapeBuffer};
use literal::{LiteralMatcher, LiteralStep};

use crate::{
    base64::{self, Base64Variant},
    context::{ContextKind, ReadContextStack},
    error::{ReadError, ReadErrorKind, SyntaxError},
    location::Location,
    numbers::{coerce, CoercionError, Number, NumberCache, NumberKind, NumberShape},
    options::ReaderOptions,
    stream::TokenSource,
    token::Token,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Peeked {
    /// The ring is empty but more input may still be fed.
    Empty,
    /// The next unread character.
    Char(char),
    /// The ring is empty and end-of-input has been signaled.
    End,
}

/// Where the grammar machine stands between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrammarState {
    Start,
    BeforeFieldName,
    AfterFieldName,
    BeforeFieldValue,
    BeforeArrayValue,
    AfterFieldValue,
    AfterArrayValue,
    End,
}

/// Where the lexer machine stands inside the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    Sign,
    Zero,
    Int,
    Point,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentInt,
    Str,
    StrEscape,
    StrEscapeUnicode,
    StrEscapeSurrogate,
    StrEscapeSurrogateU,
    Literal,
}

/// One completed lexical unit, or the reason none could be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexed {
    /// More input is required.
    Pending,
    /// True end of the input stream.
    Eof,
    /// A string literal; the decoded content is in the scratch buffer.
    Str,
    /// A numeric literal; raw text in the scratch buffer, shape recorded.
    Number,
    /// `true`, `false`, or `null`.
    Literal(Token),
    /// One of `{` `}` `[` `]` `:` `,`.
    Punct(char),
}

/// The incremental JSON token reader.
///
/// # Examples
///
/// ```rust
/// use jsoncodec::{JsonReader, Token, TokenSource};
///
/// let mut reader = JsonReader::new();
/// reader.feed(r#"{"x":1}"#)?;
/// reader.end_input();
///
/// assert_eq!(reader.next_token()?, Some(Token::StartObject));
/// assert_eq!(reader.next_token()?, Some(Token::FieldName));
/// assert_eq!(reader.text()?, "x");
/// assert_eq!(reader.next_token()?, Some(Token::Int));
/// assert_eq!(reader.int_value()?, 1);
/// assert_eq!(reader.next_token()?, Some(Token::EndObject));
/// assert_eq!(reader.next_token()?, None);
/// # Ok::<(), jsoncodec::ReadError>(())
/// ```
pub struct JsonReader {
    options: ReaderOptions,
    source: CharRing,
    end_of_input: bool,
    closed: bool,

    /// Global character position and human-readable line/column.
    pos: usize,
    line: usize,
    column: usize,
    /// Position of the first character of the current token.
    token_start: Location,
    /// First character of the current token, for diagnostics.
    token_first: char,

    grammar: GrammarState,
    lex: LexState,
    context: ReadContextStack,

    /// Decoded payload of the current token (string content, field name,
    /// or raw number text).
    scratch: String,
    shape: NumberShape,
    escapes: UnicodeEscapeBuffer,
    literal: LiteralMatcher,
    quote: char,

    current: Option<Token>,
    cache: NumberCache,
    /// Containers still open in a suspended `skip_children`.
    skip_depth: usize,
    /// A fatal lexical/structural error, re-reported on every subsequent
    /// `next_token` call.
    fatal: Option<ReadError>,
}

impl Default for JsonReader {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReader {
    /// Creates a reader with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ReaderOptions::default())
    }

    /// Creates a reader with the given options.
    #[must_use]
    pub fn with_options(options: ReaderOptions) -> Self {
        Self {
            options,
            source: CharRing::new(),
            end_of_input: false,
            closed: false,
            pos: 0,
            line: 1,
            column: 1,
            token_start: Location::start(),
            token_first: '\0',
            grammar: GrammarState::Start,
            lex: LexState::Default,
            context: ReadContextStack::new(options.strict_duplicate_detection),
            scratch: String::new(),
            shape: NumberShape::default(),
            escapes: UnicodeEscapeBuffer::new(),
            literal: LiteralMatcher::none(),
            quote: '"',
            current: None,
            cache: NumberCache::default(),
            skip_depth: 0,
            fatal: None,
        }
    }

    /// Supplies the next chunk of input. Chunks may split the document at
    /// any character boundary, including inside tokens.
    ///
    /// # Errors
    ///
    /// Fails when the reader is closed or end-of-input was already
    /// signaled.
    pub fn feed(&mut self, chunk: &str) -> Result<(), ReadError> {
        if self.closed {
            return Err(ReadError::new(ReadErrorKind::Closed, self.here()));
        }
        if self.end_of_input {
            return Err(ReadError::new(ReadErrorKind::InputAfterEnd, self.here()));
        }
        self.source.push_str(chunk);
        Ok(())
    }

    /// Marks true end-of-input. Idempotent. After this, exhausting the
    /// pending data means the document is over rather than paused.
    pub fn end_input(&mut self) {
        self.end_of_input = true;
    }

    fn here(&self) -> Location {
        Location {
            offset: self.pos,
            line: self.line,
            column: Some(self.column),
        }
    }

    fn fail(&mut self, kind: impl Into<ReadErrorKind>) -> ReadError {
        let err = ReadError::new(kind, self.here());
        self.fatal = Some(err.clone());
        err
    }

    // ----------------------------------------------------------------
    // Lexer
    // ----------------------------------------------------------------

    fn peek(&self) -> Peeked {
        match self.source.peek() {
            Some(c) => Peeked::Char(c),
            None if self.end_of_input => Peeked::End,
            None => Peeked::Empty,
        }
    }

    fn advance(&mut self) {
        if let Some(c) = self.source.advance() {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn is_token_whitespace(&self, c: char) -> bool {
        matches!(c, ' ' | '\n' | '\r' | '\t')
            || (self.options.allow_unicode_whitespace && c.is_whitespace())
    }

    fn mark_token_start(&mut self, first: char) {
        self.token_start = self.here();
        self.token_first = first;
    }

    /// Dispatches on the first character of a new token. Returns the token
    /// directly for punctuators, otherwise arms the lexer state machine.
    fn begin_token(&mut self, c: char) -> Result<Option<Lexed>, SyntaxError> {
        self.mark_token_start(c);
        match c {
            '{' | '}' | '[' | ']' | ':' | ',' => {
                self.advance();
                return Ok(Some(Lexed::Punct(c)));
            }
            '"' => {
                self.advance();
                self.scratch.clear();
                self.escapes.reset();
                self.quote = '"';
                self.lex = LexState::Str;
            }
            '\'' if self.options.allow_single_quotes => {
                self.advance();
                self.scratch.clear();
                self.escapes.reset();
                self.quote = '\'';
                self.lex = LexState::Str;
            }
            '-' => {
                self.advance();
                self.scratch.clear();
                self.scratch.push('-');
                self.shape = NumberShape {
                    negative: true,
                    ..NumberShape::default()
                };
                self.lex = LexState::Sign;
            }
            '0' => {
                self.advance();
                self.scratch.clear();
                self.scratch.push('0');
                self.shape = NumberShape {
                    int_digits: 1,
                    ..NumberShape::default()
                };
                self.lex = LexState::Zero;
            }
            '1'..='9' => {
                self.advance();
                self.scratch.clear();
                self.scratch.push(c);
                self.shape = NumberShape {
                    int_digits: 1,
                    ..NumberShape::default()
                };
                self.lex = LexState::Int;
            }
            't' | 'f' | 'n' => {
                self.advance();
                self.literal = LiteralMatcher::new(c);
                self.lex = LexState::Literal;
            }
            _ => return Err(SyntaxError::InvalidCharacter(c)),
        }
        Ok(None)
    }

    fn finish_number(&mut self) -> Lexed {
        self.lex = LexState::Default;
        Lexed::Number
    }

    #[allow(clippy::too_many_lines)]
    fn lex_token(&mut self) -> Result<Lexed, SyntaxError> {
        loop {
            let peeked = self.peek();
            match self.lex {
                LexState::Default => match peeked {
                    Peeked::Char(c) if self.is_token_whitespace(c) => self.advance(),
                    Peeked::Char(c) => {
                        if let Some(lexed) = self.begin_token(c)? {
                            return Ok(lexed);
                        }
                    }
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Ok(Lexed::Eof),
                },

                // ---- numbers -------------------------------------------
                LexState::Sign => match peeked {
                    Peeked::Char('0') => {
                        self.advance();
                        self.scratch.push('0');
                        self.shape.int_digits = 1;
                        self.lex = LexState::Zero;
                    }
                    Peeked::Char(c @ '1'..='9') => {
                        self.advance();
                        self.scratch.push(c);
                        self.shape.int_digits = 1;
                        self.lex = LexState::Int;
                    }
                    Peeked::Char(_) => return Err(SyntaxError::InvalidNumber),
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },
                LexState::Zero => match peeked {
                    Peeked::Char('.') => {
                        self.advance();
                        self.scratch.push('.');
                        self.lex = LexState::Point;
                    }
                    Peeked::Char(c @ ('e' | 'E')) => {
                        self.advance();
                        self.scratch.push(c);
                        self.lex = LexState::Exponent;
                    }
                    Peeked::Char('0'..='9') => return Err(SyntaxError::LeadingZero),
                    Peeked::Char(_) | Peeked::End => return Ok(self.finish_number()),
                    Peeked::Empty => return Ok(Lexed::Pending),
                },
                LexState::Int => match peeked {
                    Peeked::Char(c @ '0'..='9') => {
                        self.advance();
                        self.scratch.push(c);
                        self.shape.int_digits += 1;
                    }
                    Peeked::Char('.') => {
                        self.advance();
                        self.scratch.push('.');
                        self.lex = LexState::Point;
                    }
                    Peeked::Char(c @ ('e' | 'E')) => {
                        self.advance();
                        self.scratch.push(c);
                        self.lex = LexState::Exponent;
                    }
                    Peeked::Char(_) | Peeked::End => return Ok(self.finish_number()),
                    Peeked::Empty => return Ok(Lexed::Pending),
                },
                LexState::Point => match peeked {
                    Peeked::Char(c @ '0'..='9') => {
                        self.advance();
                        self.scratch.push(c);
                        self.shape.frac_digits = 1;
                        self.lex = LexState::Fraction;
                    }
                    Peeked::Char(_) => return Err(SyntaxError::InvalidNumber),
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },
                LexState::Fraction => match peeked {
                    Peeked::Char(c @ '0'..='9') => {
                        self.advance();
                        self.scratch.push(c);
                        self.shape.frac_digits += 1;
                    }
                    Peeked::Char(c @ ('e' | 'E')) => {
                        self.advance();
                        self.scratch.push(c);
                        self.lex = LexState::Exponent;
                    }
                    Peeked::Char(_) | Peeked::End => return Ok(self.finish_number()),
                    Peeked::Empty => return Ok(Lexed::Pending),
                },
                LexState::Exponent => match peeked {
                    Peeked::Char(c @ ('+' | '-')) => {
                        self.advance();
                        self.scratch.push(c);
                        self.lex = LexState::ExponentSign;
                    }
                    Peeked::Char(c @ '0'..='9') => {
                        self.advance();
                        self.scratch.push(c);
                        self.shape.exp_digits = 1;
                        self.lex = LexState::ExponentInt;
                    }
                    Peeked::Char(_) => return Err(SyntaxError::InvalidNumber),
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },
                LexState::ExponentSign => match peeked {
                    Peeked::Char(c @ '0'..='9') => {
                        self.advance();
                        self.scratch.push(c);
                        self.shape.exp_digits = 1;
                        self.lex = LexState::ExponentInt;
                    }
                    Peeked::Char(_) => return Err(SyntaxError::InvalidNumber),
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },
                LexState::ExponentInt => match peeked {
                    Peeked::Char(c @ '0'..='9') => {
                        self.advance();
                        self.scratch.push(c);
                        self.shape.exp_digits += 1;
                    }
                    Peeked::Char(_) | Peeked::End => return Ok(self.finish_number()),
                    Peeked::Empty => return Ok(Lexed::Pending),
                },

                // ---- strings -------------------------------------------
                LexState::Str => match peeked {
                    Peeked::Char(c) if c == self.quote => {
                        self.advance();
                        self.lex = LexState::Default;
                        return Ok(Lexed::Str);
                    }
                    Peeked::Char('\\') => {
                        self.advance();
                        self.lex = LexState::StrEscape;
                    }
                    Peeked::Char(c) if (c as u32) < 0x20 => {
                        if self.options.allow_unquoted_control_chars {
                            self.advance();
                            self.scratch.push(c);
                        } else {
                            return Err(SyntaxError::UnescapedControl(c as u32));
                        }
                    }
                    Peeked::Char(c) => {
                        self.advance();
                        self.scratch.push(c);
                    }
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },
                LexState::StrEscape => match peeked {
                    Peeked::Char('u') => {
                        self.advance();
                        self.lex = LexState::StrEscapeUnicode;
                    }
                    Peeked::Char(c) => {
                        let decoded = match c {
                            '"' | '\\' | '/' => Some(c),
                            'b' => Some('\u{0008}'),
                            'f' => Some('\u{000C}'),
                            'n' => Some('\n'),
                            'r' => Some('\r'),
                            't' => Some('\t'),
                            '\'' if self.quote == '\'' => Some('\''),
                            _ if self.options.allow_backslash_escaping_any => Some(c),
                            _ => None,
                        };
                        let Some(decoded) = decoded else {
                            return Err(SyntaxError::InvalidEscape(c));
                        };
                        self.advance();
                        self.scratch.push(decoded);
                        self.lex = LexState::Str;
                    }
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },
                LexState::StrEscapeUnicode => match peeked {
                    Peeked::Char(c) => {
                        let step = self.escapes.feed(c)?;
                        self.advance();
                        match step {
                            EscapeStep::NeedMore => {}
                            EscapeStep::Complete(decoded) => {
                                self.scratch.push(decoded);
                                self.lex = LexState::Str;
                            }
                            EscapeStep::HighSurrogate => {
                                self.lex = LexState::StrEscapeSurrogate;
                            }
                        }
                    }
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },
                LexState::StrEscapeSurrogate => match peeked {
                    Peeked::Char('\\') => {
                        self.advance();
                        self.lex = LexState::StrEscapeSurrogateU;
                    }
                    Peeked::Char(_) => {
                        return Err(self.unpaired_high());
                    }
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },
                LexState::StrEscapeSurrogateU => match peeked {
                    Peeked::Char('u') => {
                        self.advance();
                        self.lex = LexState::StrEscapeUnicode;
                    }
                    Peeked::Char(_) => {
                        return Err(self.unpaired_high());
                    }
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },

                // ---- literals ------------------------------------------
                LexState::Literal => match peeked {
                    Peeked::Char(c) => match self.literal.step(c) {
                        LiteralStep::NeedMore => self.advance(),
                        LiteralStep::Done(token) => {
                            self.advance();
                            self.lex = LexState::Default;
                            return Ok(Lexed::Literal(token));
                        }
                        LiteralStep::Reject => return Err(SyntaxError::InvalidCharacter(c)),
                    },
                    Peeked::Empty => return Ok(Lexed::Pending),
                    Peeked::End => return Err(SyntaxError::UnexpectedEndOfInput),
                },
            }
        }
    }

    fn unpaired_high(&self) -> SyntaxError {
        SyntaxError::UnpairedSurrogate(u32::from(self.escapes.pending_surrogate().unwrap_or(0)))
    }

    // ----------------------------------------------------------------
    // Grammar
    // ----------------------------------------------------------------

    fn expect_value_position(&self, found: char) -> Result<(), SyntaxError> {
        match self.grammar {
            GrammarState::Start
            | GrammarState::BeforeFieldValue
            | GrammarState::BeforeArrayValue => Ok(()),
            GrammarState::End if self.options.allow_multiple_documents => Ok(()),
            GrammarState::End => Err(SyntaxError::TrailingData(found)),
            GrammarState::BeforeFieldName => Err(SyntaxError::InvalidCharacter(found)),
            GrammarState::AfterFieldName => Err(SyntaxError::ExpectedColon(found)),
            GrammarState::AfterFieldValue => Err(SyntaxError::ExpectedCommaOr {
                close: '}',
                found,
            }),
            GrammarState::AfterArrayValue => Err(SyntaxError::ExpectedCommaOr {
                close: ']',
                found,
            }),
        }
    }

    fn after_value_state(&self) -> GrammarState {
        match self.context.kind() {
            ContextKind::Root => GrammarState::End,
            ContextKind::Object => GrammarState::AfterFieldValue,
            ContextKind::Array => GrammarState::AfterArrayValue,
        }
    }

    fn produce(&mut self, token: Token) -> Option<Token> {
        self.current = Some(token);
        Some(token)
    }

    fn scalar(&mut self, token: Token) -> Result<Option<Token>, ReadError> {
        if let Err(e) = self.expect_value_position(self.token_first) {
            return Err(self.fail(e));
        }
        self.context.note_value();
        self.grammar = self.after_value_state();
        self.cache.reset();
        Ok(self.produce(token))
    }

    fn open_container(&mut self, token: Token) -> Result<Option<Token>, ReadError> {
        if let Err(e) = self.expect_value_position(self.token_first) {
            return Err(self.fail(e));
        }
        self.context.note_value();
        if token == Token::StartObject {
            self.context.push_object();
            self.grammar = GrammarState::BeforeFieldName;
        } else {
            self.context.push_array();
            self.grammar = GrammarState::BeforeArrayValue;
        }
        Ok(self.produce(token))
    }

    fn close_container(&mut self, token: Token) -> Option<Token> {
        let parent = self.context.pop().unwrap_or(ContextKind::Root);
        self.grammar = match parent {
            ContextKind::Root => GrammarState::End,
            ContextKind::Object => GrammarState::AfterFieldValue,
            ContextKind::Array => GrammarState::AfterArrayValue,
        };
        self.produce(token)
    }

    #[allow(clippy::too_many_lines)]
    fn handle_punct(&mut self, c: char) -> Result<Option<Token>, ReadError> {
        match c {
            '{' => self.open_container(Token::StartObject),
            '[' => self.open_container(Token::StartArray),
            '}' => match self.grammar {
                GrammarState::BeforeFieldName => {
                    if self.context.entry_count() > 0 {
                        Err(self.fail(SyntaxError::TrailingComma('}')))
                    } else {
                        Ok(self.close_container(Token::EndObject))
                    }
                }
                GrammarState::AfterFieldValue => Ok(self.close_container(Token::EndObject)),
                GrammarState::BeforeArrayValue | GrammarState::AfterArrayValue => {
                    Err(self.fail(SyntaxError::MismatchedClose {
                        expected: ']',
                        found: '}',
                    }))
                }
                GrammarState::AfterFieldName => Err(self.fail(SyntaxError::ExpectedColon('}'))),
                GrammarState::BeforeFieldValue | GrammarState::Start => {
                    Err(self.fail(SyntaxError::InvalidCharacter('}')))
                }
                GrammarState::End => {
                    let e = if self.options.allow_multiple_documents {
                        SyntaxError::InvalidCharacter('}')
                    } else {
                        SyntaxError::TrailingData('}')
                    };
                    Err(self.fail(e))
                }
            },
            ']' => match self.grammar {
                GrammarState::BeforeArrayValue => {
                    if self.context.entry_count() > 0 {
                        Err(self.fail(SyntaxError::TrailingComma(']')))
                    } else {
                        Ok(self.close_container(Token::EndArray))
                    }
                }
                GrammarState::AfterArrayValue => Ok(self.close_container(Token::EndArray)),
                GrammarState::BeforeFieldName | GrammarState::AfterFieldValue => {
                    Err(self.fail(SyntaxError::MismatchedClose {
                        expected: '}',
                        found: ']',
                    }))
                }
                GrammarState::AfterFieldName => Err(self.fail(SyntaxError::ExpectedColon(']'))),
                GrammarState::BeforeFieldValue | GrammarState::Start => {
                    Err(self.fail(SyntaxError::InvalidCharacter(']')))
                }
                GrammarState::End => {
                    let e = if self.options.allow_multiple_documents {
                        SyntaxError::InvalidCharacter(']')
                    } else {
                        SyntaxError::TrailingData(']')
                    };
                    Err(self.fail(e))
                }
            },
            ':' => {
                if self.grammar == GrammarState::AfterFieldName {
                    self.grammar = GrammarState::BeforeFieldValue;
                    Ok(None)
                } else {
                    Err(self.fail(SyntaxError::InvalidCharacter(':')))
                }
            }
            ',' => match self.grammar {
                GrammarState::AfterFieldValue => {
                    self.grammar = GrammarState::BeforeFieldName;
                    Ok(None)
                }
                GrammarState::AfterArrayValue => {
                    self.grammar = GrammarState::BeforeArrayValue;
                    Ok(None)
                }
                _ => Err(self.fail(SyntaxError::InvalidCharacter(','))),
            },
            _ => Err(self.fail(SyntaxError::InvalidCharacter(c))),
        }
    }

    fn handle_string(&mut self) -> Result<Option<Token>, ReadError> {
        if self.grammar == GrammarState::BeforeFieldName {
            if let Err(name) = self.context.set_name(&self.scratch) {
                return Err(self.fail(ReadErrorKind::DuplicateField(name)));
            }
            self.grammar = GrammarState::AfterFieldName;
            return Ok(self.produce(Token::FieldName));
        }
        self.scalar(Token::String)
    }

    fn handle_eof(&mut self) -> Result<Option<Token>, ReadError> {
        match self.grammar {
            GrammarState::Start | GrammarState::End => {
                self.current = None;
                Ok(None)
            }
            _ => Err(self.fail(SyntaxError::UnexpectedEndOfInput)),
        }
    }

    // ----------------------------------------------------------------
    // Lazy numeric materialization
    // ----------------------------------------------------------------

    fn require_numeric(&self, expected: &'static str) -> Result<NumberKind, ReadError> {
        if self.closed {
            return Err(ReadError::new(ReadErrorKind::Closed, self.here()));
        }
        match self.current {
            Some(token) if token.is_numeric() => {
                Ok(self.shape.classify(self.options.use_big_decimal_for_floats))
            }
            Some(token) => Err(ReadError::new(
                ReadErrorKind::TypeMismatch { expected, token },
                self.token_start,
            )),
            None => Err(ReadError::new(ReadErrorKind::NoToken, self.here())),
        }
    }

    fn cached_int(&mut self) -> i32 {
        let scratch = &self.scratch;
        // At most 9 digits; always fits i32.
        *self
            .cache
            .int
            .get_or_insert_with(|| scratch.parse().unwrap_or_else(|_| unreachable!()))
    }

    fn cached_long(&mut self) -> i64 {
        let scratch = &self.scratch;
        // At most 18 digits; always fits i64.
        *self
            .cache
            .long
            .get_or_insert_with(|| scratch.parse().unwrap_or_else(|_| unreachable!()))
    }

    fn cached_bigint(&mut self) -> &BigInt {
        let scratch = &self.scratch;
        // Any sign-and-digits literal parses.
        self.cache
            .big
            .get_or_insert_with(|| scratch.parse().unwrap_or_else(|_| unreachable!()))
    }

    fn cached_double(&mut self) -> f64 {
        let scratch = &self.scratch;
        // The fast lossy path; oversized exponents saturate to infinity.
        *self
            .cache
            .double
            .get_or_insert_with(|| scratch.parse().unwrap_or_else(|_| unreachable!()))
    }

    fn cached_decimal(&mut self) -> Result<&BigDecimal, ReadError> {
        match &mut self.cache.decimal {
            Some(value) => Ok(value),
            slot => {
                // bigdecimal stores the scale in an i64; a literal exponent
                // beyond that range has no exact representation.
                let parsed = self.scratch.parse().map_err(|_| {
                    ReadError::new(
                        CoercionError::PrecisionLoss {
                            target: "BigDecimal",
                        },
                        self.token_start,
                    )
                })?;
                Ok(slot.insert(parsed))
            }
        }
    }

    fn coercion_result<T>(&self, result: Result<T, CoercionError>) -> Result<T, ReadError> {
        result.map_err(|e| ReadError::new(e, self.token_start))
    }
}

impl TokenSource for JsonReader {
    fn next_token(&mut self) -> Result<Option<Token>, ReadError> {
        if self.closed {
            return Ok(None);
        }
        if let Some(err) = &self.fatal {
            return Err(err.clone());
        }
        loop {
            let lexed = match self.lex_token() {
                Ok(lexed) => lexed,
                Err(e) => return Err(self.fail(e)),
            };
            match lexed {
                Lexed::Pending => return Ok(self.produce(Token::NotAvailable)),
                Lexed::Eof => return self.handle_eof(),
                // ':' and ',' are consumed silently; keep lexing.
                Lexed::Punct(c) => {
                    if let Some(token) = self.handle_punct(c)? {
                        return Ok(Some(token));
                    }
                }
                Lexed::Str => return self.handle_string(),
                Lexed::Number => {
                    let token = if self.shape.is_integral() {
                        Token::Int
                    } else {
                        Token::Float
                    };
                    return self.scalar(token);
                }
                Lexed::Literal(token) => return self.scalar(token),
            }
        }
    }

    fn current_token(&self) -> Option<Token> {
        self.current
    }

    fn current_name(&self) -> Option<&str> {
        self.context.current_name()
    }

    fn text(&mut self) -> Result<&str, ReadError> {
        if self.closed {
            return Err(ReadError::new(ReadErrorKind::Closed, self.here()));
        }
        match self.current {
            None => Err(ReadError::new(ReadErrorKind::NoToken, self.here())),
            Some(Token::NotAvailable) => Err(ReadError::new(
                ReadErrorKind::TypeMismatch {
                    expected: "text-bearing",
                    token: Token::NotAvailable,
                },
                self.here(),
            )),
            Some(Token::FieldName | Token::String | Token::Int | Token::Float) => {
                Ok(&self.scratch)
            }
            Some(token) => Ok(token.fixed_text().unwrap_or_default()),
        }
    }

    fn number_value(&mut self) -> Result<Number, ReadError> {
        let kind = self.require_numeric("numeric")?;
        Ok(match kind {
            NumberKind::Int => Number::Int(self.cached_int()),
            NumberKind::Long => {
                let value = self.cached_long();
                // The 10-digit boundary is the only long shape that might
                // still fit i32; avoid the re-scan everywhere else.
                if self.shape.int_digits == 10 {
                    match coerce::long_to_int(value) {
                        Ok(int) => {
                            self.cache.int = Some(int);
                            Number::Int(int)
                        }
                        Err(_) => Number::Long(value),
                    }
                } else {
                    Number::Long(value)
                }
            }
            NumberKind::BigInt => Number::BigInt(self.cached_bigint().clone()),
            NumberKind::Double => Number::Double(self.cached_double()),
            NumberKind::BigDecimal => Number::BigDecimal(self.cached_decimal()?.clone()),
        })
    }

    fn number_type(&mut self) -> Result<NumberKind, ReadError> {
        let kind = self.require_numeric("numeric")?;
        if kind == NumberKind::Long
            && self.shape.int_digits == 10
            && coerce::long_to_int(self.cached_long()).is_ok()
        {
            return Ok(NumberKind::Int);
        }
        Ok(kind)
    }

    fn int_value(&mut self) -> Result<i32, ReadError> {
        let kind = self.require_numeric("numeric")?;
        match kind {
            NumberKind::Int => Ok(self.cached_int()),
            NumberKind::Long => {
                let value = self.cached_long();
                self.coercion_result(coerce::long_to_int(value))
            }
            NumberKind::BigInt => {
                let result = coerce::bigint_to_int(self.cached_bigint());
                self.coercion_result(result)
            }
            NumberKind::Double => {
                let value = self.cached_double();
                self.coercion_result(coerce::double_to_int(value))
            }
            NumberKind::BigDecimal => {
                let result = coerce::decimal_to_int(self.cached_decimal()?);
                self.coercion_result(result)
            }
        }
    }

    fn long_value(&mut self) -> Result<i64, ReadError> {
        let kind = self.require_numeric("numeric")?;
        match kind {
            NumberKind::Int => Ok(coerce::int_to_long(self.cached_int())),
            NumberKind::Long => Ok(self.cached_long()),
            NumberKind::BigInt => {
                let result = coerce::bigint_to_long(self.cached_bigint());
                self.coercion_result(result)
            }
            NumberKind::Double => {
                let value = self.cached_double();
                self.coercion_result(coerce::double_to_long(value))
            }
            NumberKind::BigDecimal => {
                let result = coerce::decimal_to_long(self.cached_decimal()?);
                self.coercion_result(result)
            }
        }
    }

    fn bigint_value(&mut self) -> Result<BigInt, ReadError> {
        let kind = self.require_numeric("numeric")?;
        match kind {
            NumberKind::Int => Ok(coerce::int_to_bigint(self.cached_int())),
            NumberKind::Long => Ok(coerce::long_to_bigint(self.cached_long())),
            NumberKind::BigInt => Ok(self.cached_bigint().clone()),
            NumberKind::Double => {
                let value = self.cached_double();
                self.coercion_result(coerce::double_to_bigint(value))
            }
            NumberKind::BigDecimal => {
                let result = coerce::decimal_to_bigint(self.cached_decimal()?);
                self.coercion_result(result)
            }
        }
    }

    fn double_value(&mut self) -> Result<f64, ReadError> {
        self.require_numeric("numeric")?;
        Ok(self.cached_double())
    }

    fn decimal_value(&mut self) -> Result<BigDecimal, ReadError> {
        self.require_numeric("numeric")?;
        Ok(self.cached_decimal()?.clone())
    }

    fn binary_value_with(&mut self, variant: &Base64Variant) -> Result<Vec<u8>, ReadError> {
        if self.closed {
            return Err(ReadError::new(ReadErrorKind::Closed, self.here()));
        }
        match self.current {
            Some(Token::String) => base64::decode(&self.scratch, variant)
                .map_err(|e| ReadError::new(e, self.token_start)),
            Some(token) => Err(ReadError::new(
                ReadErrorKind::TypeMismatch {
                    expected: "string",
                    token,
                },
                self.token_start,
            )),
            None => Err(ReadError::new(ReadErrorKind::NoToken, self.here())),
        }
    }

    fn skip_children(&mut self) -> Result<bool, ReadError> {
        if self.skip_depth == 0 {
            match self.current {
                Some(token) if token.is_structural_start() => self.skip_depth = 1,
                _ => return Ok(true),
            }
        }
        while self.skip_depth > 0 {
            match self.next_token()? {
                Some(Token::NotAvailable) => return Ok(false),
                Some(token) if token.is_structural_start() => self.skip_depth += 1,
                Some(token) if token.is_structural_end() => self.skip_depth -= 1,
                Some(_) => {}
                None => {
                    return Err(self.fail(SyntaxError::UnexpectedEndOfInput));
                }
            }
        }
        Ok(true)
    }

    fn current_location(&self) -> Location {
        self.here()
    }

    fn token_location(&self) -> Location {
        self.token_start
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.source.clear();
        self.scratch = String::new();
        self.cache.reset();
        self.context.clear();
        self.current = None;
        self.skip_depth = 0;
        self.fatal = None;
    }
}
