use {
    crate::token::TokenType,
    maplit::hashmap,
    std::{collections::HashMap, sync::OnceLock},
};

static KEYWORDS: OnceLock<HashMap<&'static str, TokenType>> = OnceLock::new();

fn table() -> &'static HashMap<&'static str, TokenType> {
    KEYWORDS.get_or_init(|| {
        hashmap! {
            "and" => TokenType::KwAnd,
            "class" => TokenType::KwClass,
            "else" => TokenType::KwElse,
            "false" => TokenType::KwFalse,
            "for" => TokenType::KwFor,
            "fun" => TokenType::KwFun,
            "if" => TokenType::KwIf,
            "nil" => TokenType::KwNil,
            "or" => TokenType::KwOr,
            "print" => TokenType::KwPrint,
            "return" => TokenType::KwReturn,
            "super" => TokenType::KwSuper,
            "this" => TokenType::KwThis,
            "true" => TokenType::KwTrue,
            "var" => TokenType::KwVar,
            "while" => TokenType::KwWhile,
        }
    })
}

/// Reserved word kind for an identifier-shaped lexeme, if it is one.
pub fn keyword(text: &str) -> Option<TokenType> {
    table().get(text).copied()
}
