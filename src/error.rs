use {crate::token::SourcePosition, miette::ErrReport, thiserror::Error};

/// Problems found while scanning. None of them stops the scan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character")]
    UnexpectedCharacter {
        character: char,
        position: SourcePosition,
    },
    #[error("Unterminated string")]
    UnterminatedString { position: SourcePosition },
}

impl LexError {
    pub fn position(&self) -> &SourcePosition {
        match self {
            LexError::UnexpectedCharacter { position, .. } => position,
            LexError::UnterminatedString { position } => position,
        }
    }

    pub fn line(&self) -> usize {
        self.position().line
    }

    pub fn span(&self) -> std::ops::Range<usize> {
        self.position().span.clone()
    }

    /// Short text for the diagnostic label.
    pub fn label(&self) -> String {
        match self {
            LexError::UnexpectedCharacter { character, .. } => format!("`{}`", character),
            LexError::UnterminatedString { .. } => "string starts here".into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum NexError {
    #[error("Usage: {0}")]
    Usage(ErrReport),
    #[error("Could not read from file {0}")]
    IoError(#[from] std::io::Error),
    #[error("{0} lexical error(s) reported")]
    LexicalErrors(usize),
}

impl NexError {
    /// sysexits(3) code for the driver to exit with.
    pub fn exit_code(&self) -> u8 {
        match self {
            NexError::Usage(_) => 64,
            NexError::LexicalErrors(_) => 65,
            NexError::IoError(_) => 66,
        }
    }
}
