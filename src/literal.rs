/// Decoded value carried by number and string tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Num(f64),
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LiteralValue::Str(s) => s.clone(),
                LiteralValue::Num(n) => n.to_string().trim_end_matches(".0").to_string(),
            }
        )
    }
}
