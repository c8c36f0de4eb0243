//! Rendering of command results as text or JSON

use clap::ValueEnum;
use profsel_core::{ProfileType, Query, Suggestion, Token};
use serde::Serialize;
use std::io::Write;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable lines
    Text,
    /// One JSON document per result
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseReport<'a> {
    selector: String,
    profile_name: &'a str,
    profile_type: Option<ProfileType>,
    #[serde(flatten)]
    query: &'a Query,
}

#[derive(Serialize)]
struct TokenReport<'a> {
    kind: String,
    text: &'a str,
    offset: usize,
}

pub fn write_query(out: &mut impl Write, query: &Query, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let report = ParseReport {
                selector: query.to_string(),
                profile_name: query.profile_name(),
                profile_type: query.profile_type(),
                query,
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        }
        Format::Text => {
            writeln!(out, "selector: {}", query)?;
            writeln!(out, "profile:  {}", query.profile_name())?;
            if let Some(profile_type) = query.profile_type() {
                writeln!(
                    out,
                    "type:     sample={}/{} period={}/{}{}",
                    profile_type.sample_type,
                    profile_type.sample_unit,
                    profile_type.period_type,
                    profile_type.period_unit,
                    if profile_type.delta { " delta" } else { "" }
                )?;
            }
            for matcher in query.label_matchers() {
                writeln!(out, "  {}", matcher)?;
            }
            if query.is_partial() {
                writeln!(out, "partial:  {}", query.raw_trailing_matcher_text())?;
            }
        }
    }
    Ok(())
}

pub fn write_suggestions(
    out: &mut impl Write,
    suggestions: &[Suggestion],
    format: Format,
) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer(&mut *out, suggestions)?;
            writeln!(out)?;
        }
        Format::Text => {
            if suggestions.is_empty() {
                writeln!(out, "(no suggestions)")?;
            }
            for suggestion in suggestions {
                writeln!(out, "{}", suggestion)?;
            }
        }
    }
    Ok(())
}

pub fn write_tokens(out: &mut impl Write, tokens: &[Token<'_>], format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let reports: Vec<TokenReport> = tokens
                .iter()
                .map(|t| TokenReport {
                    kind: t.kind.to_string(),
                    text: t.text,
                    offset: t.offset,
                })
                .collect();
            serde_json::to_writer(&mut *out, &reports)?;
            writeln!(out)?;
        }
        Format::Text => {
            for token in tokens {
                let kind = token.kind.to_string();
                writeln!(out, "{:>4}  {:<14} {:?}", token.offset, kind, token.text)?;
            }
        }
    }
    Ok(())
}
