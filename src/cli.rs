//! Minimal CLI: check documents against a registry type, or look one up.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;

use rutypi::{validate_type_no_throw, Type, TypeRegistry, ValidateResult, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON documents against extracted type descriptors
#[derive(Parser, Debug)]
#[command(name = "rutypi", version)]
pub struct CommandLineInterface {
    /// more log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document against one type
    Check(CheckOut),
    /// print the definition a registry name resolves to
    Lookup(LookupOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is checked on its own
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    /// registry file: `{definitions, definitionReferences}` or `{knownTypes}`
    #[arg(long, short)]
    registry: Option<PathBuf>,

    /// registry name to check against, or an inline descriptor (`{"type": ...}`)
    #[arg(long = "type", short = 't')]
    type_arg: String,

    #[command(flatten)]
    input_settings: InputSettings,

    /// print `[{source, result}]` as JSON and exit 0 instead of failing
    #[arg(long)]
    no_throw: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct LookupOut {
    /// registry file
    #[arg(long, short)]
    registry: PathBuf,

    /// definition name
    name: String,
}

struct Document {
    source: String,
    value: serde_json::Value,
}

#[derive(Serialize)]
struct Report<'a> {
    source: &'a str,
    result: &'a ValidateResult,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for source_path in resolve_file_path_patterns(&self.input)? {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let label = format!("{source_path_str}:{}", line_no + 1);
                    let value = serde_json::from_str(line)
                        .with_context(|| format!("failed to parse NDJSON line ({label})"))?;
                    self.process(label, value, &mut documents)?;
                }
            } else {
                let value = serde_json::from_str(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                self.process(source_path_str, value, &mut documents)?;
            }
        }
        Ok(documents)
    }

    fn process(&self, source: String, value: serde_json::Value, out: &mut Vec<Document>) -> Result<()> {
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(pointer) => value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("JSON pointer {pointer} selects nothing in {source}"))?,
        };
        match self.jq_expr.as_deref() {
            None => out.push(Document { source, value }),
            Some(jq_expr) => {
                let results = crate::jq_exec::run_jaq(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression to {source}"))?;
                for (index, value) in results.into_iter().enumerate() {
                    out.push(Document {
                        source: format!("{source}#{index}"),
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Check(target) => target.run(),
            Command::Lookup(target) => target.run(),
        }
    }
}

impl CheckOut {
    fn run(&self) -> Result<ExitCode> {
        let registry = match self.registry.as_deref() {
            Some(path) => load_registry(path)?,
            None => TypeRegistry::new(),
        };
        let ty = parse_type_arg(&self.type_arg)?;
        let documents = self.input_settings.load()?;
        tracing::info!(
            documents = documents.len(),
            definitions = registry.len(),
            descriptor = ty.describe(),
            "checking documents"
        );

        // the registry is only read from here on, so documents can share it
        let results: Vec<(String, ValidateResult)> = documents
            .into_par_iter()
            .map(|doc| {
                let result = validate_type_no_throw(&registry, &ty, Value::from(doc.value));
                (doc.source, result)
            })
            .collect();

        if self.no_throw {
            let reports: Vec<Report> = results
                .iter()
                .map(|(source, result)| Report { source, result })
                .collect();
            let json = serde_json::to_string_pretty(&reports)?;
            write_output(self.out.as_deref(), &json)?;
            return Ok(ExitCode::SUCCESS);
        }

        if self.out.is_some() {
            colored::control::set_override(false);
        }
        let failed = results.iter().filter(|(_, r)| !r.is_success()).count();
        let mut report = String::new();
        for (source, result) in &results {
            if result.is_success() {
                report.push_str(&format!("{} {source}\n", "✅".green()));
                continue;
            }
            report.push_str(&format!("{} {}\n", "❌".red(), source.bold()));
            for error in result.errors() {
                let path = if error.access_stack.is_empty() {
                    "<root>".to_string()
                } else {
                    error.path()
                };
                report.push_str(&format!("    {}: {}\n", path.yellow(), error.message));
            }
        }
        report.push_str(&format!(
            "{} passed, {} failed\n",
            results.len() - failed,
            failed
        ));
        write_output(self.out.as_deref(), report.trim_end())?;

        Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::from(1) })
    }
}

impl LookupOut {
    fn run(&self) -> Result<ExitCode> {
        let registry = load_registry(&self.registry)?;
        match registry.lookup_reference(self.name.as_str()) {
            Ok(definition) => {
                println!("{}", serde_json::to_string_pretty(definition)?);
                Ok(ExitCode::SUCCESS)
            }
            Err(not_found) => {
                eprintln!("{}", not_found.to_string().red());
                Ok(ExitCode::from(1))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_registry(path: &Path) -> Result<TypeRegistry> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read registry ({})", path.display()))?;
    let registry = TypeRegistry::from_json_slice(&bytes)
        .with_context(|| format!("failed to load registry ({})", path.display()))?;
    tracing::debug!(definitions = registry.len(), "loaded registry");
    Ok(registry)
}

fn parse_type_arg(arg: &str) -> Result<Type> {
    let arg = arg.trim();
    if arg.starts_with('{') {
        Type::from_json_str(arg).context("failed to parse --type descriptor")
    } else if arg.is_empty() {
        bail!("--type needs a registry name or a descriptor")
    } else {
        Ok(Type::reference(arg))
    }
}

fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, content)
                .with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
