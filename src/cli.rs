//! Minimal CLI: catalog → (project | match | check)
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use enum_json::catalog::{self, Catalog};
use enum_json::check::{check_set, Finding, Report};
use enum_json::{match_text_at, project, resolve, Config, Nesting, ProjectionKind};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// project enum variants to JSON scalar tokens, read tokens back, and check catalogs for round-trip safety
#[derive(Parser, Debug)]
#[command(name = "enum-json", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the JSON token each variant is written as
    Project(ProjectCmd),
    /// print the variant each token is read as
    Match(MatchCmd),
    /// verify every variant survives a round trip under every projection
    Check(CheckCmd),
}

/// Call-site configuration. Giving any of these replaces the catalog's config
/// entirely; unset options take their defaults.
#[derive(Args, Debug, Clone)]
struct SiteOverrides {
    /// projection to use (alias, name, ordinal, value)
    #[arg(long)]
    projection: Option<ProjectionKind>,

    /// compare names and field values ignoring case
    #[arg(long, default_value_t = false)]
    case_insensitive: bool,

    /// field holding each variant's VALUE representation
    #[arg(long)]
    value_field: Option<String>,

    /// field holding each variant's ALIAS representation
    #[arg(long)]
    alias_field: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct ProjectCmd {
    /// catalog .json file declaring the variant set
    #[arg(long, short)]
    catalog: PathBuf,

    #[command(flatten)]
    overrides: SiteOverrides,

    /// variant names (every variant if omitted)
    variants: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct MatchCmd {
    /// catalog .json file declaring the variant set
    #[arg(long, short)]
    catalog: PathBuf,

    #[command(flatten)]
    overrides: SiteOverrides,

    /// read tokens as whole documents, dropping one layer of wrapping quotes
    #[arg(long, default_value_t = false)]
    root: bool,

    /// tokens in textual form
    #[arg(required = true)]
    tokens: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckCmd {
    /// One or more catalogs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// emit the reports as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// output .json file (stdout if omitted, implies --json)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SiteOverrides {
    fn site_config(&self) -> Option<Config> {
        let given = self.projection.is_some()
            || self.case_insensitive
            || self.value_field.is_some()
            || self.alias_field.is_some();
        given.then(|| Config {
            projection: self.projection.unwrap_or_default(),
            case_insensitive: self.case_insensitive,
            value_field_name: self.value_field.clone().map(Cow::Owned),
            alias_field_name: self.alias_field.clone().map(Cow::Owned),
        })
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Project(target) => {
                let set = load_catalog(&target.catalog)?;
                let site = target.overrides.site_config();
                let effective = resolve(set.config(), site.as_ref());
                tracing::debug!(source = ?effective.source(), projection = %effective.projection, "projecting");

                let variants = if target.variants.is_empty() {
                    set.variants().iter().collect::<Vec<_>>()
                } else {
                    target
                        .variants
                        .iter()
                        .map(|name| {
                            set.variant_named(name)
                                .ok_or_else(|| anyhow!("`{}` declares no variant named `{name}`", set.type_name()))
                        })
                        .collect::<Result<Vec<_>>>()?
                };

                for variant in variants {
                    let token = match project(&set, variant, &effective) {
                        Some(scalar) => serde_json::to_string(&scalar.to_json())?,
                        None => "null".dimmed().to_string(),
                    };
                    println!("{}\t{token}", variant.name());
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Match(target) => {
                let set = load_catalog(&target.catalog)?;
                let site = target.overrides.site_config();
                let effective = resolve(set.config(), site.as_ref());
                let nesting = if target.root { Nesting::Root } else { Nesting::Nested };

                let mut unmatched = 0usize;
                for token in &target.tokens {
                    match match_text_at(token, nesting, &set, &effective) {
                        Some(variant) => println!("{token}\t{}", variant.name()),
                        None => {
                            unmatched += 1;
                            println!("{token}\t{}", "<no match>".yellow());
                        }
                    }
                }
                Ok(if unmatched == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            Command::Check(target) => {
                let source_paths = resolve_file_path_patterns(&target.input)
                    .context("failed to resolve input file paths")?;
                let reports = source_paths
                    .par_iter()
                    .map(|path| load_catalog(path).map(|set| check_set(&set)))
                    .collect::<Result<Vec<Report>>>()?;
                let clean = reports.iter().all(Report::is_clean);

                if target.json || target.out.is_some() {
                    let src = serde_json::to_string_pretty(&reports)?;
                    if let Some(out) = target.out.as_ref() {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(out, &src).with_context(|| format!("failed to write {}", out.display()))?;
                    } else {
                        println!("{src}");
                    }
                } else {
                    for (path, report) in source_paths.iter().zip(&reports) {
                        print_report(path, report);
                    }
                }
                Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_catalog(path: &Path) -> Result<Catalog> {
    catalog::load(path).with_context(|| format!("failed to load catalog {}", path.display()))
}

fn print_report(path: &Path, report: &Report) {
    let header = format!("{} ({} variants)", report.type_name, report.variants);
    if report.is_clean() {
        println!("{} {header} {}", "✔".green(), path.display().to_string().dimmed());
        return;
    }
    println!(
        "{} {header}, {} findings {}",
        "✘".red().bold(),
        report.findings.len(),
        path.display().to_string().dimmed()
    );
    for finding in &report.findings {
        match finding {
            Finding::Absent { projection, variant } => {
                println!("    {projection:<8} {variant} has no value, written as null");
            }
            Finding::Mismatch { projection, variant, token, read_back } => {
                let read_back = read_back.as_deref().unwrap_or("nothing");
                println!("    {projection:<8} {variant} → {token} reads back as {}", read_back.red());
            }
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
