use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use shared::environment::loader;
use shared::{EnvironmentConfig, Variant};

#[derive(Parser, Debug)]
#[command(name = "coffeeshop-envgen")]
#[command(about = "Validate an environment variant and render it for the frontend bundle")]
struct Args {
    /// Variant to build: development or production
    #[arg(long, env = "RUST_ENV")]
    variant: Option<Variant>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// Validate only, write nothing
    #[arg(long, default_value_t = false)]
    check: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Typescript,
}

fn render(config: &EnvironmentConfig, format: Format) -> Result<String> {
    let json = config.to_json_pretty()?;
    Ok(match format {
        Format::Json => format!("{json}\n"),
        Format::Typescript => format!("export const environment = {json};\n"),
    })
}

/// An explicit variant also selects its `.env.<variant>` file; otherwise
/// `RUST_ENV` decides both.
fn load_config(variant: Option<Variant>) -> Result<EnvironmentConfig> {
    let config = match variant {
        Some(variant) => {
            loader::load_env_files_for(variant).context("load env files")?;
            loader::load_variant(variant, |key| env::var(key).ok())
        }
        None => {
            loader::load_env_files().context("load env files")?;
            loader::load_from(|key| env::var(key).ok())
        }
    }
    .context("invalid environment configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Args::parse();

    let config = load_config(args.variant)?;

    if args.check {
        info!("{} environment configuration is valid", config.variant());
        return Ok(());
    }

    let rendered = render(&config, args.format)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("write {:?}", path))?;
            info!("Wrote {} environment to {:?}", config.variant(), path);
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
