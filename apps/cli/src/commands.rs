//! Subcommand implementations

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ruleval_validator::{ErrorCatalog, RuleValidator, ValidatorConfig};
use serde_json::Value;

use crate::Outcome;
use crate::cli::{CodesArgs, ValidateArgs};
use crate::output::Report;

fn load_engine(rules: &Path, default_code: Option<&str>) -> Result<RuleValidator> {
    let mut config = ValidatorConfig::from_path(rules)
        .with_context(|| format!("loading rules from {}", rules.display()))?;

    if let Some(code) = default_code {
        config.default_error_code = code.to_owned();
    }
    if config.name.is_empty()
        && let Some(stem) = rules.file_stem().and_then(|s| s.to_str())
    {
        config.name = stem.to_owned();
    }

    let engine = ruleval_log::timed!("compile", config.into_builder().build())
        .with_context(|| format!("compiling rules from {}", rules.display()))?;
    Ok(engine)
}

fn load_catalog(path: Option<&Path>) -> Result<ErrorCatalog> {
    match path {
        Some(path) => ErrorCatalog::from_path(path)
            .with_context(|| format!("loading error catalog from {}", path.display())),
        None => Ok(ErrorCatalog::new()),
    }
}

fn read_payload(path: Option<&Path>) -> Result<Value> {
    let source = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading payload from {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading payload from stdin")?;
            buf
        }
    };

    serde_json::from_str(&source).context("payload is not valid JSON")
}

pub fn validate(args: &ValidateArgs) -> Result<Outcome> {
    let engine = load_engine(&args.rules, args.default_code.as_deref())?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let payload = read_payload(args.payload.as_deref())?;

    let errors = ruleval_log::timed!("validate", engine.validate(&payload))
        .map_err(|e| ruleval_log::log_error!(e, "validation aborted"))
        .context("payload could not be validated")?;

    tracing::info!(name = engine.name(), findings = errors.len(), "validation finished");

    let report = Report::new(catalog.render(&errors));
    let mut stdout = io::stdout().lock();
    report.write(&mut stdout, args.format)?;
    stdout.flush()?;

    Ok(if report.is_valid() {
        Outcome::Clean
    } else {
        Outcome::Findings
    })
}

pub fn codes(args: &CodesArgs) -> Result<Outcome> {
    let engine = load_engine(&args.rules, None)?;
    let (codes, name) = engine.error_codes_in_use();

    let mut stdout = io::stdout().lock();
    for code in codes {
        writeln!(stdout, "{code}")?;
    }
    stdout.flush()?;

    let Some(path) = args.catalog.as_deref() else {
        return Ok(Outcome::Clean);
    };

    let catalog = load_catalog(Some(path))?;
    match catalog.verify([&engine]) {
        Ok(()) => {
            tracing::info!(name, codes = codes.len(), "every code has a message");
            Ok(Outcome::Clean)
        }
        Err(missing) => {
            for m in &missing {
                eprintln!("{m}");
            }
            Ok(Outcome::Findings)
        }
    }
}
