//! A registry built from a manifest whose callbacks only record what they saw.

use anyhow::{Context, Result};
use serde::Serialize;
use slashopt::{ArgumentSpec, OptionSpec, ParseError, Registry};

use crate::manifest::Manifest;

/// One callback invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Dispatch {
    Option {
        key: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Argument {
        name: String,
        value: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParseReport {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub dispatches: Vec<Dispatch>,
}

pub fn build_registry(manifest: &Manifest) -> Result<Registry<Vec<Dispatch>>> {
    let mut builder = Registry::builder().command_from_env();
    if let Some(command) = &manifest.command {
        builder = builder.command(command.clone());
    }
    if let Some(prefix) = manifest.prefix {
        builder = builder.prefix(prefix);
    }
    if let Some(delimiters) = &manifest.delimiters {
        builder = builder.delimiters(delimiters.iter().copied());
    }

    for decl in &manifest.options {
        let prefix = manifest.prefix.unwrap_or(slashopt::DEFAULT_PREFIX);
        // Recorded under the first alias as it will appear after normalization.
        let key = format!(
            "{prefix}{}",
            decl.keys.split('|').next().unwrap_or_default().to_ascii_uppercase()
        );
        let option = match &decl.value {
            Some(meta) => OptionSpec::value(
                decl.keys.as_str(),
                meta.clone(),
                decl.help.clone(),
                move |log: &mut Vec<Dispatch>, value| {
                    log.push(Dispatch::Option {
                        key: key.clone(),
                        value: Some(value.to_string()),
                    })
                },
            ),
            None => OptionSpec::flag(decl.keys.as_str(), decl.help.clone(), move |log: &mut Vec<Dispatch>| {
                log.push(Dispatch::Option {
                    key: key.clone(),
                    value: None,
                })
            }),
        };
        builder = builder.option(if decl.multiple { option.multiple() } else { option });
    }

    for decl in &manifest.arguments {
        let name = decl.name.clone();
        let mut argument = ArgumentSpec::new(decl.name.clone(), move |log: &mut Vec<Dispatch>, value| {
            log.push(Dispatch::Argument {
                name: name.clone(),
                value: value.to_string(),
            })
        });
        if decl.optional {
            argument = argument.optional();
        }
        if decl.multiple {
            argument = argument.multiple();
        }
        builder = builder.argument(argument);
    }

    builder.build().context("invalid declarations in manifest")
}

/// Parse `tokens` and collect every dispatch, including those made before a rejection.
pub fn run_parse(registry: &Registry<Vec<Dispatch>>, tokens: &[String]) -> ParseReport {
    let mut dispatches = Vec::new();
    let result: Result<(), ParseError> = registry.try_parse_with(tokens, &mut dispatches);
    ParseReport {
        accepted: result.is_ok(),
        error: result.err().map(|e| e.to_string()),
        dispatches,
    }
}
