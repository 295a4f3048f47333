use crate::InputArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use protojsonnet_model::{DiagnosticKind, LoadOptions, OneOf, PackageTree, Registry};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TypeSummary<'a> {
    name: &'a str,
    kind: &'static str,
    package: &'a str,
    top_level: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageView<'a> {
    name: &'a str,
    fields: BTreeMap<String, protojsonnet_model::FieldMeta>,
    one_ofs: &'a [OneOf],
}

fn load(input: &InputArgs) -> Result<Registry> {
    let text = if input.descriptor.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read descriptor set from stdin")?;
        buf
    } else {
        fs::read_to_string(&input.descriptor)
            .with_context(|| format!("failed to read {}", input.descriptor.display()))?
    };
    let options = LoadOptions {
        skip_validation: input.skip_validation,
    };
    let registry = Registry::from_json(&text, &options)
        .with_context(|| format!("failed to load {}", input.descriptor.display()))?;
    tracing::debug!(
        descriptor = %input.descriptor.display(),
        types = registry.len(),
        diagnostics = registry.diagnostics().len(),
        skip_validation = options.skip_validation,
        "loaded registry"
    );
    Ok(registry)
}

fn write_out(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("  {} {}", "→".cyan(), path.display());
    Ok(())
}

fn emit<T: Serialize>(input: &InputArgs, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match &input.out {
        Some(path) => write_out(path, &text)?,
        None => println!("{text}"),
    }
    Ok(())
}

pub fn cmd_types(input: &InputArgs) -> Result<()> {
    let registry = load(input)?;
    let summaries: Vec<TypeSummary<'_>> = registry
        .iter()
        .map(|(name, t)| TypeSummary {
            name,
            kind: t.kind(),
            package: t.package(),
            top_level: t.is_top_level(),
        })
        .collect();
    emit(input, &summaries)
}

pub fn cmd_meta(input: &InputArgs, message: &str) -> Result<()> {
    let registry = load(input)?;
    let msg = registry.require_message(message)?;
    emit(
        input,
        &MessageView {
            name: message,
            fields: msg.field_meta(),
            one_ofs: msg.one_ofs(),
        },
    )
}

pub fn cmd_tree(input: &InputArgs) -> Result<()> {
    let registry = load(input)?;
    emit(input, &PackageTree::build(&registry))
}

pub fn cmd_diagnostics(input: &InputArgs, json: bool) -> Result<()> {
    let registry = load(input)?;
    if json {
        return emit(input, &registry.diagnostics());
    }
    if let Some(path) = &input.out {
        let text: String = registry
            .diagnostics()
            .iter()
            .map(|d| format!("{d}\n"))
            .collect();
        return write_out(path, &text);
    }
    if registry.diagnostics().is_empty() {
        println!("{} no diagnostics", "✓".green());
        return Ok(());
    }
    for d in registry.diagnostics() {
        let tag = match d.kind {
            DiagnosticKind::MalformedExtension => "malformed".yellow(),
            DiagnosticKind::UnresolvedListElement | DiagnosticKind::UnresolvedMapEntry => {
                "unresolved".yellow()
            }
        };
        println!("  {tag} {} {}", d.subject.bold(), d.message);
    }
    Ok(())
}
