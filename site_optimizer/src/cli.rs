use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::build::build_site;
use crate::config::{ConfigOverrides, SiteConfig};
use crate::errors::AppError;
use crate::logger::LogFormat;
use crate::package::create_package;
use crate::report::{group_thousands, print_build_summary, print_deployment_instructions};
use crate::server;

#[derive(Parser)]
#[command(name = "site-optimizer", version)]
#[command(about = "Serve, optimize and package a static website")]
pub struct Cli {
    /// Project root holding the HTML/CSS sources.
    #[arg(short, long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Explicit config file; defaults to site-optimizer.{toml,yaml,json} in the root.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the project root over HTTP for local development
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long)]
        no_browser: bool,
    },
    /// Minify, obfuscate and protect the site into the output directory
    Build {
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the build report as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Zip the output directory into a timestamped deployment package
    Package {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        destination: Option<PathBuf>,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        match &self.command {
            Commands::Serve { port, no_browser } => ConfigOverrides {
                port: *port,
                open_browser: no_browser.then_some(false),
                ..Default::default()
            },
            Commands::Build { output, .. } => ConfigOverrides {
                output_dir: output.clone(),
                ..Default::default()
            },
            Commands::Package {
                output,
                destination,
            } => ConfigOverrides {
                output_dir: output.clone(),
                package_destination: destination.clone(),
                ..Default::default()
            },
        }
    }

    pub fn load_config(&self) -> Result<SiteConfig, AppError> {
        Ok(SiteConfig::load(
            &self.root,
            self.config.as_deref(),
            &self.overrides(),
        )?)
    }
}

pub async fn serve_command(config: &SiteConfig) -> Result<(), AppError> {
    info!(port = config.server.port, "starting development server");
    server::serve(config.project_root.clone(), &config.server).await?;
    Ok(())
}

pub fn build_command(config: &SiteConfig, json: bool) -> Result<(), AppError> {
    if !json {
        println!("🚀 Starting production optimization...");
    }
    let report = build_site(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_build_summary(&report);
    }
    Ok(())
}

pub fn package_command(config: &SiteConfig) -> Result<(), AppError> {
    println!("📦 Creating deployment package...");
    let output_dir = config.output_path();
    let summary = create_package(
        &output_dir,
        &config.package_destination(),
        &config.package.prefix,
    )?;
    println!("✅ Deployment package created: {}", summary.path.display());
    println!("📁 Package size: {} bytes", group_thousands(summary.bytes));
    print_deployment_instructions(&output_dir);
    println!("✅ Your website is ready for deployment!");
    Ok(())
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    match cli.command {
        Commands::Serve { .. } => serve_command(&config).await,
        Commands::Build { json, .. } => build_command(&config, json),
        Commands::Package { .. } => package_command(&config),
    }
}
