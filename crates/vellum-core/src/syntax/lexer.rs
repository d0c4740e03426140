//! Trivia-preserving lexer
//!
//! Unlike a conventional lexer this one keeps every character of the
//! input: whitespace, line breaks and comments come out as ordinary
//! tokens. Token buffers seeded from this stream reproduce the source
//! byte for byte, which is the foundation of the round-trip guarantee.

use biome_text_size::{TextRange, TextSize};

use crate::syntax::token::{Token, TokenKind};

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: TextRange,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: TextRange) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Result returned by the lexer
pub type LexResult = (Vec<Token>, Vec<LexerError>);

fn span(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

/// Lex input preserving all trivia
///
/// Errors do not abort lexing; the offending characters are skipped and
/// reported so that callers can decide how strict to be.
pub fn lex_with_trivia(input: &str) -> LexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let len = input.len();
    let mut i = 0usize;

    while i < len {
        let Some((current, size)) = next_char(input, i) else {
            break;
        };
        let start = i;

        match current {
            // Newlines (separate from whitespace for formatting purposes)
            '\n' => {
                tokens.push(Token::new(TokenKind::Newline, "\n", span(start, i + size)));
                i += size;
            }
            '\r' => {
                // Handle \r\n as a single newline
                let mut end = i + size;
                if let Some(('\n', nl_size)) = next_char(input, end) {
                    end += nl_size;
                }
                tokens.push(Token::new(
                    TokenKind::Newline,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            // Whitespace runs (spaces, tabs)
            c if c.is_whitespace() => {
                let mut end = i + size;
                while end < len {
                    match next_char(input, end) {
                        Some((next, next_size))
                            if next.is_whitespace() && next != '\n' && next != '\r' =>
                        {
                            end += next_size;
                        }
                        _ => break,
                    }
                }
                tokens.push(Token::new(
                    TokenKind::Whitespace,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            // Comments
            '/' => match next_char(input, i + size) {
                Some(('/', slash_size)) => {
                    let mut end = i + size + slash_size;
                    while let Some((c, step)) = next_char(input, end) {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                        end += step;
                    }
                    tokens.push(Token::new(
                        TokenKind::LineComment,
                        &input[start..end],
                        span(start, end),
                    ));
                    i = end;
                }
                Some(('*', star_size)) => {
                    let mut end = i + size + star_size;
                    let mut terminated = false;
                    while let Some((c, step)) = next_char(input, end) {
                        if c == '*'
                            && let Some(('/', close_size)) = next_char(input, end + step)
                        {
                            end += step + close_size;
                            terminated = true;
                            break;
                        }
                        end += step;
                    }
                    if !terminated {
                        end = len;
                        errors.push(LexerError::new("Unterminated block comment", span(start, end)));
                    }
                    tokens.push(Token::new(
                        TokenKind::BlockComment,
                        &input[start..end],
                        span(start, end),
                    ));
                    i = end;
                }
                _ => {
                    errors.push(LexerError::new(
                        "Unexpected character '/'",
                        span(start, i + size),
                    ));
                    i += size;
                }
            },

            // Punctuation
            '{' => {
                tokens.push(Token::new(TokenKind::LBrace, "{", span(start, i + size)));
                i += size;
            }
            '}' => {
                tokens.push(Token::new(TokenKind::RBrace, "}", span(start, i + size)));
                i += size;
            }
            ';' => {
                tokens.push(Token::new(TokenKind::Semicolon, ";", span(start, i + size)));
                i += size;
            }
            ',' => {
                tokens.push(Token::new(TokenKind::Comma, ",", span(start, i + size)));
                i += size;
            }
            '=' => {
                tokens.push(Token::new(TokenKind::Eq, "=", span(start, i + size)));
                i += size;
            }

            // String literals and text blocks
            '"' => {
                let (token, error) = lex_string(input, start);
                if let Some(err) = error {
                    errors.push(err);
                }
                i = u32::from(token.span.end()) as usize;
                tokens.push(token);
            }

            // Integer literals
            c if c.is_ascii_digit() => {
                let mut end = i + size;
                while let Some((next, next_size)) = next_char(input, end) {
                    if next.is_ascii_digit() {
                        end += next_size;
                    } else {
                        break;
                    }
                }
                tokens.push(Token::new(
                    TokenKind::IntLiteral,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            // Identifiers and keywords
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = i + size;
                while let Some((next, next_size)) = next_char(input, end) {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        end += next_size;
                    } else {
                        break;
                    }
                }
                let text = &input[start..end];
                let kind = TokenKind::from_keyword(text).unwrap_or(TokenKind::Ident);
                tokens.push(Token::new(kind, text, span(start, end)));
                i = end;
            }

            other => {
                errors.push(LexerError::new(
                    format!("Unexpected character '{other}'"),
                    span(start, i + size),
                ));
                i += size;
            }
        }
    }

    (tokens, errors)
}

/// Lex a string literal or a triple-quoted text block starting at `start`
fn lex_string(input: &str, start: usize) -> (Token, Option<LexerError>) {
    let len = input.len();

    if input[start..].starts_with("\"\"\"") {
        // Text block: runs until the closing triple quote, newlines allowed
        let mut end = start + 3;
        while end < len {
            if input[end..].starts_with("\"\"\"") {
                end += 3;
                let token = Token::new(
                    TokenKind::TextBlockLiteral,
                    &input[start..end],
                    span(start, end),
                );
                return (token, None);
            }
            match next_char(input, end) {
                Some((_, step)) => end += step,
                None => break,
            }
        }
        let token = Token::new(
            TokenKind::TextBlockLiteral,
            &input[start..len],
            span(start, len),
        );
        return (
            token,
            Some(LexerError::new("Unterminated text block", span(start, len))),
        );
    }

    // Plain string: single line, backslash escapes the next character
    let mut end = start + 1;
    while let Some((c, step)) = next_char(input, end) {
        match c {
            '"' => {
                end += step;
                let token = Token::new(
                    TokenKind::StringLiteral,
                    &input[start..end],
                    span(start, end),
                );
                return (token, None);
            }
            '\\' => {
                end += step;
                match next_char(input, end) {
                    Some((_, esc_step)) => end += esc_step,
                    None => break,
                }
            }
            '\n' | '\r' => break,
            _ => end += step,
        }
    }
    let token = Token::new(
        TokenKind::StringLiteral,
        &input[start..end],
        span(start, end),
    );
    (
        token,
        Some(LexerError::new(
            "Unterminated string literal",
            span(start, end),
        )),
    )
}
