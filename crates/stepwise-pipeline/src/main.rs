//! `stepwise` command-line entry point

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use stepwise_core::MigrationConfig;
use stepwise_pipeline::{build_pipeline, logging, LogFormat};

fn cli() -> Command {
    Command::new("stepwise")
        .version(stepwise_pipeline::VERSION)
        .about("Rule-driven, auditable Spring Boot upgrade steps")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(value_parser!(PathBuf))
                .help("Path to stepwise.toml"),
        )
        .arg(
            Arg::new("project")
                .long("project")
                .short('p')
                .value_parser(value_parser!(PathBuf))
                .help("Project root (overrides project_root)"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Framework version to migrate to (overrides target_version)"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report intended changes without writing anything"),
        )
        .arg(
            Arg::new("skip-validation")
                .long("skip-validation")
                .action(ArgAction::SetTrue)
                .help("Do not run the build tool after migrating"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the report as JSON"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Log line format on stderr"),
        )
}

fn load_config(args: &ArgMatches) -> anyhow::Result<MigrationConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => MigrationConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MigrationConfig::new(),
    };

    if let Some(project) = args.get_one::<PathBuf>("project") {
        config = config.with_project_root(project.clone());
    }
    if let Some(target) = args.get_one::<String>("target") {
        config = config.with_target_version(target.clone());
    }
    if args.get_flag("dry-run") {
        config = config.with_dry_run(true);
    }
    if args.get_flag("skip-validation") {
        config = config.with_validation(false);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = cli().get_matches();

    let format: LogFormat = args
        .get_one::<String>("log-format")
        .map_or(Ok(LogFormat::Text), |s| s.parse())
        .map_err(|e: String| anyhow!(e))?;
    logging::init(format)?;

    let config = load_config(&args)?;
    let pipeline = build_pipeline(&config).context("assembling migration pipeline")?;
    let report = pipeline.run();

    if args.get_flag("json") {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    tracing::info!("Run {} finished with exit code {}", report.run_id(), report.exit_code());
    std::process::exit(report.exit_code());
}
