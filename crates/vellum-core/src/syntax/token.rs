//! Token kinds produced by the trivia-preserving lexer

use biome_text_size::TextRange;

/// Kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    Newline,
    LineComment,
    BlockComment,

    // Keywords
    ClassKw,
    ExtendsKw,
    PublicKw,
    ProtectedKw,
    PrivateKw,
    StaticKw,
    FinalKw,
    AbstractKw,

    // Punctuation
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Eq,

    // Values
    Ident,
    IntLiteral,
    StringLiteral,
    TextBlockLiteral,
}

impl TokenKind {
    /// Whitespace or a line break
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Trivia carries no syntactic meaning but is preserved in buffers
    pub fn is_trivia(&self) -> bool {
        self.is_whitespace() || self.is_comment()
    }

    /// Canonical text of kinds that always lex the same way
    ///
    /// Template tokens are restricted to these kinds; a `Whitespace`
    /// template token prints a single space and a `Newline` one prints
    /// the document's line ending.
    pub fn fixed_text(&self) -> Option<&'static str> {
        match self {
            TokenKind::Whitespace => Some(" "),
            TokenKind::Newline => Some("\n"),
            TokenKind::ClassKw => Some("class"),
            TokenKind::ExtendsKw => Some("extends"),
            TokenKind::PublicKw => Some("public"),
            TokenKind::ProtectedKw => Some("protected"),
            TokenKind::PrivateKw => Some("private"),
            TokenKind::StaticKw => Some("static"),
            TokenKind::FinalKw => Some("final"),
            TokenKind::AbstractKw => Some("abstract"),
            TokenKind::LBrace => Some("{"),
            TokenKind::RBrace => Some("}"),
            TokenKind::Semicolon => Some(";"),
            TokenKind::Comma => Some(","),
            TokenKind::Eq => Some("="),
            _ => None,
        }
    }

    /// Keyword kind for an identifier-shaped lexeme
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        match text {
            "class" => Some(TokenKind::ClassKw),
            "extends" => Some(TokenKind::ExtendsKw),
            "public" => Some(TokenKind::PublicKw),
            "protected" => Some(TokenKind::ProtectedKw),
            "private" => Some(TokenKind::PrivateKw),
            "static" => Some(TokenKind::StaticKw),
            "final" => Some(TokenKind::FinalKw),
            "abstract" => Some(TokenKind::AbstractKw),
            _ => None,
        }
    }

    /// Human readable name for parse error messages
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "line break",
            TokenKind::LineComment | TokenKind::BlockComment => "comment",
            TokenKind::Ident => "identifier",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::TextBlockLiteral => "text block",
            other => other
                .fixed_text()
                .unwrap_or("token"),
        }
    }
}

/// A token with its kind, text and source span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: TextRange,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: TextRange) -> Token {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }
}
