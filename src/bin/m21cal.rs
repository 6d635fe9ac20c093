use anyhow::Result;
use m21cal::cli::{self, Command};
use m21cal::config::Config;
use m21cal::context::{AppContext, StandardContext};
use m21cal::controller::Converter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let binary_name = args
        .first()
        .and_then(|a| std::path::Path::new(a).file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "m21cal".to_string());

    let parsed = cli::parse_args(args.get(1..).unwrap_or_default())?;

    if parsed.command == Command::Help {
        cli::print_help(&binary_name);
        return Ok(());
    }

    let log_config = ConfigBuilder::new()
        .set_time_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .build();
    TermLogger::init(
        parsed.log_level,
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    // CLI Command: m21cal convert <file>
    if let Command::Convert(path) = &parsed.command {
        m21cal::convert::convert_file(path)?;
        return Ok(());
    }

    let ctx = StandardContext::new(parsed.root.clone());
    let mut config = match &parsed.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(&ctx)?,
    };
    parsed.overrides.apply(&mut config);
    config.validate()?;

    if parsed.command == Command::InitConfig {
        let path = config.save(&ctx)?;
        log::info!("Configuration written to {}", path.display());
        return Ok(());
    }

    log::debug!(
        "Processing {}..={} with {} links",
        config.first_year,
        config.last_year,
        config.dialect
    );
    let summary = Converter::new(&config, &ctx).run()?;
    log::info!(
        "{} events from {} files in {}",
        summary.events,
        summary.sources.len(),
        ctx.get_work_dir()?.display()
    );
    Ok(())
}
