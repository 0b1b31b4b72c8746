use crate::literal::LiteralValue;

#[derive(Debug, Clone, PartialEq)]
pub struct SourcePosition {
    pub line: usize,
    pub span: std::ops::Range<usize>,
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}..{}]", self.line, self.span.start, self.span.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    EOF,

    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    KwAnd,
    KwClass,
    KwElse,
    KwFalse,
    KwFun,
    KwFor,
    KwIf,
    KwNil,
    KwOr,
    KwPrint,
    KwReturn,
    KwSuper,
    KwThis,
    KwTrue,
    KwVar,
    KwWhile,
}

/// A classified lexeme. Tokens are built once by the scanner and never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub r#type: TokenType,
    pub lexeme: String,
    pub literal: Option<LiteralValue>,
    pub position: SourcePosition,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}", self.r#type, self.lexeme)?;
        if let Some(literal) = &self.literal {
            write!(f, " {}", literal)?;
        }
        Ok(())
    }
}

impl Token {
    pub fn new(
        r#type: TokenType,
        lexeme: impl Into<String>,
        literal: Option<LiteralValue>,
        position: SourcePosition,
    ) -> Self {
        Self {
            r#type,
            lexeme: lexeme.into(),
            literal,
            position,
        }
    }

    /// Line the lexeme started on.
    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn literal_num(&self) -> Option<f64> {
        match self.literal {
            Some(LiteralValue::Num(x)) => Some(x),
            _ => None,
        }
    }

    pub fn literal_str(&self) -> Option<&str> {
        match self.literal {
            Some(LiteralValue::Str(ref s)) => Some(s),
            _ => None,
        }
    }
}
