use {
    anyhow::Result,
    argh::FromArgs,
    culpa::{throw, throws},
    error::NexError,
    liso::{liso, OutputOnly, Response},
    miette::miette,
    reporter::Reporter,
    scanner::Scanner,
    std::{process::ExitCode, sync::OnceLock},
};

mod error;
mod keywords;
mod literal;
mod reporter;
mod scanner;
mod token;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tokenize a nex script or run a REPL that prints tokens for each line.
#[derive(FromArgs)]
struct Args {
    /// print version information
    #[argh(switch, short = 'v')]
    version: bool,

    /// script file
    #[argh(positional)]
    script: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The liso terminal is gone by now, plain stderr is safe.
            eprintln!("{}", e);
            ExitCode::from(e.downcast_ref::<NexError>().map_or(1, NexError::exit_code))
        }
    }
}

fn try_main() -> Result<()> {
    let args: Args = argh::from_env();

    if args.version {
        println!("{} {}", APP_NAME, APP_VERSION);
        return Ok(());
    }

    if args.script.len() > 1 {
        return Err(NexError::Usage(miette!("{} [script file]", APP_NAME)).into());
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true) // diagnostics go through println, not wrapln
                .color(false) // liso colours the whole report itself
                .context_lines(3)
                .build(),
        )
    }))?;

    let io = liso::InputOutput::new();
    let _ = OUT.set(io.clone_output());

    if args.script.len() == 1 {
        run_script(&args.script[0])?;
    } else {
        run_repl(io);
    }

    Ok(())
}

static OUT: OnceLock<OutputOnly> = OnceLock::new();

fn run_repl(mut io: liso::InputOutput) {
    io.prompt(liso!(fg = green, bold, "> ", reset), true, false);
    loop {
        match io.read_blocking() {
            Response::Input(line) => {
                io.echoln(liso!(fg = green, dim, "> ", fg = none, line.as_str()));
                // Each line gets its own reporter, so errors don't carry over.
                run(&line);
            }
            Response::Discarded(line) => {
                io.echoln(liso!(bold + dim, "X ", -bold, line));
            }
            Response::Dead => break,
            Response::Quit => break,
            Response::Finish => break,
            _ => {}
        }
    }
}

#[throws(NexError)]
fn run_script(script: &str) {
    let contents = std::fs::read_to_string(script)?;
    log::info!("scanning {} ({} bytes)", script, contents.len());
    let errors = run(&contents);
    if errors > 0 {
        throw!(NexError::LexicalErrors(errors));
    }
}

/// Scan `source`, print its tokens and return how many lexical errors were reported.
fn run(source: &str) -> usize {
    let mut reporter = Reporter::new(source, OUT.get());
    let tokens = Scanner::new(source).scan_tokens(&mut reporter);
    for token in &tokens {
        wrapln(token.to_string());
    }
    if reporter.had_error() {
        log::debug!("{} lexical error(s) reported", reporter.error_count());
    }
    reporter.error_count()
}

pub fn wrapln(args: impl AsRef<str>) {
    match OUT.get() {
        Some(out) => out.wrapln(liso!(fg = blue, args.as_ref(), fg = none)),
        None => println!("{}", args.as_ref()),
    }
}
