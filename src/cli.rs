// File: ./src/cli.rs
//! Command-line parsing and help text shared by the binary.
use crate::config::Config;
use crate::model::MarkupDialect;
use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::PathBuf;

/// Flags that override values from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub years: Option<(i32, i32)>,
    pub dialect: Option<MarkupDialect>,
    pub base_url: Option<String>,
    pub output: Option<String>,
    pub no_html: bool,
    pub skip_unknown_months: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some((first, last)) = self.years {
            config.first_year = first;
            config.last_year = last;
        }
        if let Some(dialect) = self.dialect {
            config.dialect = dialect;
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if self.no_html {
            config.html = false;
        }
        if self.skip_unknown_months {
            config.unknown_month = crate::config::UnknownMonthPolicy::Skip;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    /// Rewrite a semicolon separated file as comma separated.
    Convert(PathBuf),
    /// Write the effective configuration to the config file.
    InitConfig,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub overrides: Overrides,
    pub log_level: LevelFilter,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            command: Command::Run,
            root: None,
            config: None,
            overrides: Overrides::default(),
            log_level: LevelFilter::Info,
        }
    }
}

fn parse_years(value: &str) -> Result<(i32, i32)> {
    let (first, last) = match value.split_once('-') {
        Some((a, b)) => (a.trim(), b.trim()),
        None => (value.trim(), value.trim()),
    };
    let first = first
        .parse::<i32>()
        .with_context(|| format!("Invalid year '{}'", first))?;
    let last = last
        .parse::<i32>()
        .with_context(|| format!("Invalid year '{}'", last))?;
    if first > last {
        anyhow::bail!("Year range {} is reversed", value);
    }
    Ok((first, last))
}

fn value_for(flag: &str, iter: &mut std::slice::Iter<'_, String>) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing value for {}", flag))
}

/// Parses the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => parsed.command = Command::Help,
            "convert" => {
                let file = value_for("convert", &mut iter)?;
                parsed.command = Command::Convert(PathBuf::from(file));
            }
            "init" => parsed.command = Command::InitConfig,
            "-r" | "--root" => parsed.root = Some(PathBuf::from(value_for(arg, &mut iter)?)),
            "-c" | "--config" => parsed.config = Some(PathBuf::from(value_for(arg, &mut iter)?)),
            "--years" => parsed.overrides.years = Some(parse_years(&value_for(arg, &mut iter)?)?),
            "--dialect" => {
                let value = value_for(arg, &mut iter)?;
                let dialect = value
                    .parse::<MarkupDialect>()
                    .map_err(|_| anyhow::anyhow!("Unknown dialect '{}' (anchor, link-tag)", value))?;
                parsed.overrides.dialect = Some(dialect);
            }
            "--base-url" => parsed.overrides.base_url = Some(value_for(arg, &mut iter)?),
            "-o" | "--output" => parsed.overrides.output = Some(value_for(arg, &mut iter)?),
            "--no-html" => parsed.overrides.no_html = true,
            "--skip-unknown-months" => parsed.overrides.skip_unknown_months = true,
            "-v" | "--verbose" => parsed.log_level = LevelFilter::Debug,
            "-q" | "--quiet" => parsed.log_level = LevelFilter::Warn,
            other => anyhow::bail!("Unknown argument '{}'. See --help.", other),
        }
    }
    Ok(parsed)
}

pub fn print_help(binary_name: &str) {
    println!(
        "M21cal v{} - Converts the M21 event listing into an iCalendar feed",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS]                 Convert all configured years", binary_name);
    println!("    {} init [OPTIONS]            Write m21cal.toml with the effective settings", binary_name);
    println!("    {} convert <file.csv>        Rewrite a ';' separated file as ',' separated", binary_name);
    println!("    {} --help                    Show this help message", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>         Directory holding inputs, outputs and m21cal.toml");
    println!("    -c, --config <file>       Use this config file instead of m21cal.toml");
    println!("    --years <A-B>             Process years A to B (inclusive), e.g. 2009-2016");
    println!("    --dialect <name>          Link markup: anchor (<a href>) or link-tag (<link 123>)");
    println!("    --base-url <url>          Base for numeric <link> references (<url>?id=123)");
    println!("    -o, --output <file>       Calendar file to write");
    println!("    --no-html                 Do not write the per-year HTML tables");
    println!("    --skip-unknown-months     Warn and skip rows with unknown month names");
    println!("                              instead of aborting the run");
    println!("    -v, --verbose             Debug logging");
    println!("    -q, --quiet               Only warnings and errors");
    println!();
    println!("INPUT FORMAT:");
    println!("    One file per year, columns: Datum;Uhrzeit;OV;Veranstaltung");
    println!("    Dates:   3. Januar | 3. bis 5. Mai | 30. April bis 2. Mai");
    println!("    Times:   19:30 (optional; without a time the event is all-day)");
    println!("    Markup:  <b>..</b>, <br>, <a href=\"..\">..</a> or <link 123>..</link>");
}
