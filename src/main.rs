use clap::Parser;
use cli::{Cli, Commands};
use commands::{check::check, convert::convert, example::example, render::render};
use config::Config;
use fs_err::tokio as fs;
use indicatif::MultiProgress;
use log::LevelFilter;
use schemars::schema_for;

mod batch;
mod cli;
mod commands;
mod config;
mod convert;
mod intake;
mod package;
mod progress_bar;
mod util;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut binding = env_logger::Builder::new();
    let logger = binding
        .filter_level(LevelFilter::Info)
        .filter_module("svgpng", args.verbose.log_level_filter())
        .format_timestamp(None)
        .format_module_path(false)
        .build();

    let level = logger.filter();

    let multi_progress = MultiProgress::new();
    indicatif_log_bridge::LogWrapper::new(multi_progress.clone(), logger).try_init()?;

    log::set_max_level(level);

    match args.command {
        Commands::Convert(convert_args) => {
            let config = Config::read(&args.config).await?;
            convert(convert_args, config, multi_progress).await
        }
        Commands::Render(render_args) => {
            let config = Config::read(&args.config).await?;
            render(render_args, config).await
        }
        Commands::Check(check_args) => check(check_args).await,
        Commands::Example => {
            example();
            Ok(())
        }
        Commands::GenerateConfigSchema => generate_config_schema().await,
    }
}

async fn generate_config_schema() -> anyhow::Result<()> {
    let schema = schema_for!(Config);
    fs::write("schema.json", serde_json::to_string_pretty(&schema)?).await?;

    Ok(())
}
