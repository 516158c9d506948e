use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bumpalo::Bump;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;
use tracing::{debug, info, Level};

use utf8_scrub::{sanitize_utf8, sanitize_utf8_in, validate, SanitizeError};

mod escape;
mod report;

#[derive(clap::Parser, Debug)]
#[command(version, about = "Checks and sanitizes UTF-8.", long_about = None)]
struct Args {
    #[arg(help = "Files to read, in order. `-` reads standard input.")]
    files: Vec<PathBuf>,

    #[arg(short, long, help = "Only check the inputs. Exits with status 1 if any of them is not UTF-8.")]
    check: bool,

    #[arg(short, long, help = "List every invalid span on standard error.")]
    spans: bool,

    #[arg(short, long, conflicts_with = "files", default_value = "", help = "Process this string, with \\xNN escapes, instead of files.")]
    run: String,

    #[arg(short, long, conflicts_with = "check", help = "Write the sanitized output here instead of standard output.")]
    output: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Log more. Repeat for more detail.")]
    verbose: u8,
}

#[derive(Debug, Error)]
enum RunError {
    #[error("{}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Escape(#[from] escape::EscapeError),

    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error("couldn't read input: {0}")]
    Readline(#[from] ReadlineError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> RunError + '_ {
    move |source| RunError::Io { path: path.to_path_buf(), source }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            anstream::eprintln!("{}error:{} {err}", report::ERROR.render(), report::ERROR.render_reset());
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` when `--check` found an input that is not UTF-8.
fn run(args: &Args) -> Result<bool, RunError> {
    if !args.run.is_empty() {
        let bytes = escape::unescape(&args.run)?;
        return process_all(args, vec![("<--run>".to_string(), bytes)]);
    }

    if args.files.is_empty() {
        repl()?;
        return Ok(true);
    }

    let mut inputs = Vec::with_capacity(args.files.len());
    for path in &args.files {
        inputs.push((path.display().to_string(), read_input(path)?));
    }
    process_all(args, inputs)
}

fn read_input(path: &Path) -> Result<Vec<u8>, RunError> {
    let result = if path == Path::new("-") {
        let mut bytes = Vec::new();
        io::stdin().lock().read_to_end(&mut bytes).map(|_| bytes)
    } else {
        fs::read(path)
    };
    let bytes = result.map_err(io_error(path))?;
    debug!(input = %path.display(), len = bytes.len(), "read input");
    Ok(bytes)
}

fn process_all(args: &Args, inputs: Vec<(String, Vec<u8>)>) -> Result<bool, RunError> {
    let stderr_path = Path::new("<stderr>");
    let stdout_path = Path::new("<stdout>");

    if args.spans {
        let mut err = anstream::stderr().lock();
        for (name, bytes) in &inputs {
            report::write_spans(&mut err, name, bytes).map_err(io_error(stderr_path))?;
        }
    }

    if args.check {
        let mut out = anstream::stdout().lock();
        let mut all_valid = true;
        for (name, bytes) in &inputs {
            let result = validate(bytes);
            all_valid &= result.is_ok();
            report::write_check(&mut out, name, &result).map_err(io_error(stdout_path))?;
        }
        return Ok(all_valid);
    }

    let out_path = args.output.as_deref().unwrap_or(stdout_path);
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).map_err(io_error(path))?),
        None => Box::new(io::stdout().lock()),
    };
    for (name, bytes) in &inputs {
        let sanitized = sanitize_utf8(bytes)?;
        info!(input = %name, replacements = sanitized.replacements(), "sanitized");
        out.write_all(sanitized.as_bytes()).map_err(io_error(out_path))?;
    }
    out.flush().map_err(io_error(out_path))?;
    Ok(true)
}

fn repl() -> Result<(), RunError> {
    println!("utf8-scrub {}", env!("CARGO_PKG_VERSION"));
    println!("Type text, with \\xNN for raw bytes. Type \"exit()\", Ctrl+C or Ctrl+D to exit.");

    // Every line is sanitized into the arena, which is reset once the line is shown.
    let mut arena = Bump::new();
    let mut input = String::with_capacity(50);

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline(if input.is_empty() { ">>> " } else { "... " }) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                input.push_str(line.as_str());

                if input.trim_end() == "exit()" { break; }

                if escape::continues(&input) {
                    // Line continuations
                    input.pop();
                    input.push('\n');
                    continue;
                }

                match escape::unescape(&input) {
                    Ok(bytes) => show(&bytes, &arena)?,
                    Err(e) => anstream::println!("{}{e}{}", report::ERROR.render(), report::ERROR.render_reset()),
                }
                input.clear();
                arena.reset();
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn show(bytes: &[u8], arena: &Bump) -> Result<(), RunError> {
    let stdout_path = Path::new("<stdout>");
    let mut out = anstream::stdout().lock();

    report::write_check(&mut out, "input", &validate(bytes)).map_err(io_error(stdout_path))?;
    report::write_spans(&mut out, "input", bytes).map_err(io_error(stdout_path))?;

    report::write_highlighted(&mut out, bytes).map_err(io_error(stdout_path))?;

    let sanitized = sanitize_utf8_in(bytes, arena)?;
    debug!(capacity = sanitized.capacity(), allocated = arena.allocated_bytes(), "sanitized line");
    report::write_summary(&mut out, bytes.len(), &sanitized).map_err(io_error(stdout_path))?;
    Ok(())
}
