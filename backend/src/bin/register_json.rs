//! Validate a registration document from a file or standard input.
//!
//! Prints the canonical user JSON and exits with status 0, or prints the
//! `{"errors": [...]}` failure body and exits with status 1.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use registration::domain::{EmailDomainPolicy, RegistrationEngine, RegistrationError};
use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `register-json` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "register-json",
    about = "Validate a user registration JSON document",
    version
)]
struct CliArgs {
    /// JSON document to validate. Reads standard input when omitted.
    #[arg(value_name = "path")]
    path: Option<PathBuf>,
    /// Accept only addresses at this domain or its subdomains. Repeatable.
    #[arg(long = "allow-email-domain", value_name = "domain")]
    allow_email_domains: Vec<String>,
    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,
}

/// Rendered result of one validation run.
#[derive(Debug)]
struct Outcome {
    accepted: bool,
    body: String,
}

fn main() -> io::Result<ExitCode> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let raw = match args.path.as_deref() {
        Some(path) => read_file(path)?,
        None => read_stdin()?,
    };
    let engine = build_engine(&args.allow_email_domains);
    let outcome = render(&engine, &raw, args.pretty)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", outcome.body)?;
    stdout.flush()?;
    Ok(if outcome.accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_engine(allowed: &[String]) -> RegistrationEngine {
    let policy = if allowed.is_empty() {
        EmailDomainPolicy::any()
    } else {
        EmailDomainPolicy::allow_only(allowed)
    };
    RegistrationEngine::new().with_email_policy(policy)
}

fn render(engine: &RegistrationEngine, raw: &str, pretty: bool) -> io::Result<Outcome> {
    if !pretty {
        return match engine.process_registration(raw) {
            Ok(body) => Ok(Outcome {
                accepted: true,
                body,
            }),
            Err(error) => rejection(&error, pretty),
        };
    }

    match engine.validate(raw) {
        Ok(user) => Ok(Outcome {
            accepted: true,
            body: serde_json::to_string_pretty(&user).map_err(io::Error::other)?,
        }),
        Err(error) => rejection(&error, pretty),
    }
}

/// Failure body for rejected input. Rendering failures carry no violations
/// and surface as I/O errors instead of an empty `errors` list.
fn rejection(error: &RegistrationError, pretty: bool) -> io::Result<Outcome> {
    if let RegistrationError::Serialisation { .. } = error {
        return Err(io::Error::other(error.to_string()));
    }
    let body = if pretty {
        serde_json::to_string_pretty(&error.to_json()).map_err(io::Error::other)?
    } else {
        error.to_json().to_string()
    };
    Ok(Outcome {
        accepted: false,
        body,
    })
}

fn read_file(path: &Path) -> io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "input path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open input parent directory '{}': {error}",
            parent.display()
        ))
    })?;
    let mut file = directory.open(Path::new(file_name)).map_err(|error| {
        io::Error::other(format!("open input file '{}': {error}", path.display()))
    })?;
    let mut raw = String::new();
    file.read_to_string(&mut raw).map_err(|error| {
        io::Error::other(format!("read input file '{}': {error}", path.display()))
    })?;
    Ok(raw)
}

fn read_stdin() -> io::Result<String> {
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .map_err(|error| io::Error::other(format!("read standard input: {error}")))?;
    Ok(raw)
}
