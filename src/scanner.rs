use crate::{
    error::LexError,
    keywords::keyword,
    literal::LiteralValue,
    reporter::ErrorReporter,
    token::{SourcePosition, Token, TokenType},
};

trait IsIdentifier {
    fn is_identifier_start(&self) -> bool;
    fn is_identifier(&self) -> bool;
}

impl IsIdentifier for char {
    fn is_identifier_start(&self) -> bool {
        self.is_ascii_alphabetic() || *self == '_'
    }

    fn is_identifier(&self) -> bool {
        self.is_ascii_alphanumeric() || *self == '_'
    }
}

/// Current scanner state for iterating over the source input.
pub struct Scanner<'src> {
    source: &'src str, // Utf8 source
    line: usize,       // Current line number
    start_line: usize, // Line the lexeme being scanned started on
    start: usize,      // Byte offset of the lexeme being scanned
    current: usize,    // Byte offset of the next unread character
    tokens: Vec<Token>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            line: 1,
            start_line: 1,
            start: 0,
            current: 0,
            tokens: vec![],
        }
    }

    /// Scan the whole source. Errors go to `reporter` and the scan resumes
    /// after the offending lexeme, so the result always ends with `EOF`.
    pub fn scan_tokens(mut self, reporter: &mut impl ErrorReporter) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.scan_token(reporter);
        }
        self.start = self.current;
        self.start_line = self.line;
        self.add_token(TokenType::EOF);
        log::debug!(
            "scanned {} tokens over {} lines",
            self.tokens.len(),
            self.line
        );
        self.tokens
    }

    fn scan_token(&mut self, reporter: &mut impl ErrorReporter) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),
            '!' => {
                let r#type = if self.matches('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.add_token(r#type);
            }
            '=' => {
                let r#type = if self.matches('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.add_token(r#type);
            }
            '<' => {
                let r#type = if self.matches('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.add_token(r#type);
            }
            '>' => {
                let r#type = if self.matches('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.add_token(r#type);
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.matches('*') {
                    self.block_comment();
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            ' ' | '\r' | '\t' => {
                // Ignore whitespace.
            }
            '\n' => {
                self.line += 1;
            }
            '"' => self.string(reporter),
            '0'..='9' => self.number(),
            c if c.is_identifier_start() => self.identifier(),
            character => reporter.report(LexError::UnexpectedCharacter {
                character,
                position: self.current_position(),
            }),
        }
    }

    /// Skips up to and including the closing `*/`. Comments do not nest, and
    /// one left open runs to end of input without an error.
    fn block_comment(&mut self) {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return;
            }
            if self.advance() == '\n' {
                self.line += 1;
            }
        }
        log::trace!("block comment at line {} runs to end of input", self.line);
    }

    fn string(&mut self, reporter: &mut impl ErrorReporter) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
        if self.is_at_end() {
            reporter.report(LexError::UnterminatedString {
                position: self.current_position(),
            });
            return;
        }
        // The closing ".
        self.advance();

        // Skip " " around the string value.
        let value = &self.source[self.start + 1..self.current - 1];
        self.add_token_with_value(TokenType::String, LiteralValue::Str(value.into()));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        // Digits with at most one inner '.' always parse.
        let value = self.lexeme().parse().unwrap_or_default();
        self.add_token_with_value(TokenType::Number, LiteralValue::Num(value));
    }

    fn identifier(&mut self) {
        while self.peek().is_identifier() {
            self.advance();
        }
        let r#type = keyword(self.lexeme()).unwrap_or(TokenType::Identifier);
        self.add_token(r#type);
    }

    fn lexeme(&self) -> &'src str {
        &self.source[self.start..self.current]
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += c.len_utf8();
        c
    }

    /// Return true and advance if the next character is the expected one.
    fn matches(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.current += expected.len_utf8();
        true
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source[self.current..].chars().nth(1).unwrap_or('\0')
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            span: self.start..self.current,
        }
    }

    fn token_position(&self) -> SourcePosition {
        SourcePosition {
            line: self.start_line,
            span: self.start..self.current,
        }
    }

    fn add_token(&mut self, r#type: TokenType) {
        self.push(Token::new(r#type, self.lexeme(), None, self.token_position()));
    }

    fn add_token_with_value(&mut self, r#type: TokenType, value: LiteralValue) {
        self.push(Token::new(
            r#type,
            self.lexeme(),
            Some(value),
            self.token_position(),
        ));
    }

    fn push(&mut self, token: Token) {
        log::trace!("{} {}", token.position, token);
        self.tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::token::TokenType::{self, *},
    };

    fn scan(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut errors = vec![];
        let tokens = Scanner::new(source).scan_tokens(&mut errors);
        (tokens, errors)
    }

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.r#type).collect()
    }

    fn lexemes(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        let (tokens, errors) = scan("");
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].r#type, EOF);
        assert_eq!(tokens[0].lexeme, "");
        assert_eq!(tokens[0].line(), 1);
        assert_eq!(tokens[0].literal, None);
    }

    #[test]
    fn whitespace_and_comments_only() {
        let (tokens, errors) = scan(" \t\r\n// line comment\n/* block\ncomment */ \n");
        assert!(errors.is_empty());
        assert_eq!(types(&tokens), vec![EOF]);
        assert_eq!(tokens[0].line(), 5);
    }

    #[test]
    fn punctuation_and_operators() {
        let source = "( ) { } , . - + ; * / ! != = == < <= > >=";
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty());
        assert_eq!(
            types(&tokens),
            vec![
                LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Minus, Plus,
                Semicolon, Star, Slash, Bang, BangEqual, Equal, EqualEqual, Less, LessEqual,
                Greater, GreaterEqual, EOF
            ]
        );
        let mut expected: Vec<&str> = source.split(' ').collect();
        expected.push("");
        assert_eq!(lexemes(&tokens), expected);
        assert!(tokens.iter().all(|t| t.literal.is_none()));
    }

    #[test]
    fn two_char_operators_without_spaces() {
        let (tokens, _) = scan("!!====<>=");
        assert_eq!(
            types(&tokens),
            vec![Bang, BangEqual, EqualEqual, Equal, Less, GreaterEqual, EOF]
        );
    }

    #[test]
    fn spans_cover_lexemes() {
        let source = "a <= 12.5";
        let (tokens, _) = scan(source);
        for token in &tokens {
            assert_eq!(&source[token.position.span.clone()], token.lexeme);
        }
        assert_eq!(tokens[1].position.span, 2..4);
    }

    #[test]
    fn numbers() {
        let (tokens, errors) = scan("3.14 42 0.5");
        assert!(errors.is_empty());
        assert_eq!(types(&tokens), vec![Number, Number, Number, EOF]);
        assert_eq!(tokens[0].literal_num(), Some(3.14));
        assert_eq!(tokens[0].lexeme, "3.14");
        assert_eq!(tokens[1].literal_num(), Some(42.0));
        assert_eq!(tokens[2].literal_num(), Some(0.5));
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        let (tokens, _) = scan("10.");
        assert_eq!(types(&tokens), vec![Number, Dot, EOF]);
        assert_eq!(tokens[0].lexeme, "10");
        assert_eq!(tokens[0].literal_num(), Some(10.0));
        assert_eq!(tokens[1].lexeme, ".");
    }

    #[test]
    fn leading_dot_is_separate() {
        let (tokens, _) = scan(".5");
        assert_eq!(types(&tokens), vec![Dot, Number, EOF]);
        assert_eq!(tokens[1].literal_num(), Some(5.0));
    }

    #[test]
    fn string_literal() {
        let (tokens, errors) = scan("\"hello\"");
        assert!(errors.is_empty());
        assert_eq!(types(&tokens), vec![String, EOF]);
        assert_eq!(tokens[0].lexeme, "\"hello\"");
        assert_eq!(tokens[0].literal_str(), Some("hello"));
    }

    #[test]
    fn empty_string_literal() {
        let (tokens, _) = scan("\"\"");
        assert_eq!(tokens[0].literal_str(), Some(""));
    }

    #[test]
    fn multiline_string_counts_newline_once() {
        let (tokens, errors) = scan("\"hello\nworld\" x");
        assert!(errors.is_empty());
        assert_eq!(types(&tokens), vec![String, Identifier, EOF]);
        assert_eq!(tokens[0].literal_str(), Some("hello\nworld"));
        assert_eq!(tokens[0].line(), 1);
        assert_eq!(tokens[1].line(), 2);
        assert_eq!(tokens[2].line(), 2);
    }

    #[test]
    fn unterminated_string() {
        let (tokens, errors) = scan("\"abc");
        assert_eq!(types(&tokens), vec![EOF]);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
        assert_eq!(errors[0].to_string(), "Unterminated string");
        assert_eq!(errors[0].line(), 1);
        assert_eq!(errors[0].span(), 0..4);
    }

    #[test]
    fn unterminated_string_reports_line_reached() {
        let (_, errors) = scan("x\n\"ab\nc");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line(), 3);
    }

    #[test]
    fn identifiers() {
        let (tokens, errors) = scan("foo bar123 _baz");
        assert!(errors.is_empty());
        assert_eq!(types(&tokens), vec![Identifier, Identifier, Identifier, EOF]);
        assert_eq!(lexemes(&tokens), vec!["foo", "bar123", "_baz", ""]);
        assert!(tokens.iter().all(|t| t.literal.is_none()));
    }

    #[test]
    fn keywords_and_near_misses() {
        let (tokens, _) = scan("and class else false for fun if nil or print return super this true var while");
        assert_eq!(
            types(&tokens),
            vec![
                KwAnd, KwClass, KwElse, KwFalse, KwFor, KwFun, KwIf, KwNil, KwOr, KwPrint,
                KwReturn, KwSuper, KwThis, KwTrue, KwVar, KwWhile, EOF
            ]
        );
        let (tokens, _) = scan("orchid classy Var");
        assert_eq!(types(&tokens), vec![Identifier, Identifier, Identifier, EOF]);
    }

    #[test]
    fn var_declaration() {
        let (tokens, errors) = scan("var x = 1;");
        assert!(errors.is_empty());
        assert_eq!(
            types(&tokens),
            vec![KwVar, Identifier, Equal, Number, Semicolon, EOF]
        );
        assert_eq!(tokens[0].lexeme, "var");
        assert_eq!(tokens[0].literal, None);
        assert_eq!(tokens[3].literal_num(), Some(1.0));
    }

    #[test]
    fn unexpected_character() {
        let (tokens, errors) = scan("@");
        assert_eq!(types(&tokens), vec![EOF]);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0],
            LexError::UnexpectedCharacter {
                character: '@',
                position: SourcePosition { line: 1, span: 0..1 },
            }
        );
    }

    #[test]
    fn every_error_is_reported_in_one_pass() {
        let (tokens, errors) = scan("a @ b\n# c\n\"open");
        assert_eq!(types(&tokens), vec![Identifier, Identifier, Identifier, EOF]);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.iter().map(LexError::line).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(matches!(errors[2], LexError::UnterminatedString { .. }));
    }

    #[test]
    fn non_ascii_is_unexpected_and_spans_whole_char() {
        let (tokens, errors) = scan("é x");
        assert_eq!(types(&tokens), vec![Identifier, EOF]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 0..2);
        assert_eq!(tokens[0].position.span, 3..4);
    }

    #[test]
    fn utf8_inside_strings_is_kept() {
        let (tokens, errors) = scan("\"héllo\"");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].literal_str(), Some("héllo"));
    }

    #[test]
    fn line_comment_stops_at_newline() {
        let (tokens, _) = scan("a // b c\nd");
        assert_eq!(lexemes(&tokens), vec!["a", "d", ""]);
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn block_comment_ends_at_terminator() {
        let (tokens, errors) = scan("a /* b * / c */ d");
        assert!(errors.is_empty());
        assert_eq!(lexemes(&tokens), vec!["a", "d", ""]);
    }

    #[test]
    fn block_comment_counts_lines() {
        let (tokens, _) = scan("/* one\ntwo\n*/ x");
        assert_eq!(tokens[0].lexeme, "x");
        assert_eq!(tokens[0].line(), 3);
    }

    #[test]
    fn unterminated_block_comment_swallows_rest_silently() {
        let (tokens, errors) = scan("a /* b\nc");
        assert!(errors.is_empty());
        assert_eq!(lexemes(&tokens), vec!["a", ""]);
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn lone_slash_and_star() {
        let (tokens, _) = scan("a/b*/c");
        assert_eq!(
            types(&tokens),
            vec![Identifier, Slash, Identifier, Star, Slash, Identifier, EOF]
        );
    }

    #[test]
    fn eof_line_is_last_line_reached() {
        let (tokens, _) = scan("x\n\n");
        assert_eq!(tokens.last().map(Token::line), Some(3));
    }

    #[test]
    fn lexemes_rebuild_source_without_whitespace() {
        let source = "fun add(a, b) {\n  return a + b; // sum\n}\nprint add(1, 2.5) >= \"s\";";
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty());
        let rebuilt: std::string::String = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(rebuilt, "funadd(a,b){returna+b;}printadd(1,2.5)>=\"s\";");
    }
}
