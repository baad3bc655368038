//! Rendering of validation findings

use std::io::Write;

use anyhow::Result;
use ruleval_validator::RenderedFieldError;
use serde::Serialize;

use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
pub struct Report {
    valid: bool,
    errors: Vec<RenderedFieldError>,
}

impl Report {
    pub fn new(errors: Vec<RenderedFieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn write(&self, out: &mut impl Write, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
            OutputFormat::Text if self.valid => writeln!(out, "valid")?,
            OutputFormat::Text => {
                for e in &self.errors {
                    if e.message == e.code {
                        writeln!(out, "{}: {}", e.field, e.code)?;
                    } else {
                        writeln!(out, "{}: {} ({})", e.field, e.code, e.message)?;
                    }
                }
            }
        }
        Ok(())
    }
}
