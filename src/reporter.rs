use {
    crate::error::LexError,
    liso::{liso, OutputOnly},
    miette::{LabeledSpan, MietteDiagnostic, Report},
};

/// Sink for lexical errors. The scanner calls it and carries on.
pub trait ErrorReporter {
    fn report(&mut self, error: LexError);
}

impl ErrorReporter for Vec<LexError> {
    fn report(&mut self, error: LexError) {
        self.push(error);
    }
}

/// Driver-side sink: renders each error against the source and keeps count,
/// so the caller can decide on an exit status after the scan.
pub struct Reporter<'src> {
    source: &'src str,
    out: Option<&'src OutputOnly>,
    errors: usize,
}

impl<'src> Reporter<'src> {
    /// Without an output handle, diagnostics go to stderr.
    pub fn new(source: &'src str, out: Option<&'src OutputOnly>) -> Self {
        Self {
            source,
            out,
            errors: 0,
        }
    }

    pub fn had_error(&self) -> bool {
        self.errors > 0
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }
}

impl ErrorReporter for Reporter<'_> {
    fn report(&mut self, error: LexError) {
        self.errors += 1;
        log::debug!("lexical error at {}: {}", error.position(), error);
        let rendered = render(self.source, &error);
        match self.out {
            Some(out) => out.println(liso!(fg = red, bold, rendered, fg = none)),
            None => eprintln!("{}", rendered),
        }
    }
}

/// One-line summary in the `[line N] Error: message` form.
pub fn headline(error: &LexError) -> String {
    format!("[line {}] Error: {}", error.line(), error)
}

/// Full diagnostic with the offending span labeled in the source.
pub fn render(source: &str, error: &LexError) -> String {
    let diag = MietteDiagnostic::new(headline(error))
        .with_label(LabeledSpan::at(error.span(), error.label()));
    let report = Report::new(diag).with_source_code(source.to_string());
    format!("{:?}", report)
}
