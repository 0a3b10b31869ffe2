use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use config as config_rs;
use serde::Deserialize;
use thiserror::Error;

/// Base name of the optional config file looked up in the project root.
pub const CONFIG_FILE_STEM: &str = "site-optimizer";
pub const ENV_PREFIX: &str = "SITE_OPTIMIZER";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub open_browser: bool,
    pub browser_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8001,
            open_browser: true,
            browser_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub prefix: String,
    pub destination: PathBuf,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            prefix: "western-cape-industrial-website".to_string(),
            destination: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub project_root: PathBuf,
    pub output_dir: PathBuf,
    pub html_file: String,
    pub css_file: String,
    pub minified_css_file: String,
    pub asset_dirs: Vec<String>,
    pub aux_files: Vec<String>,
    /// Identifiers the obfuscator must leave alone.
    pub protected_names: Vec<String>,
    pub server: ServerConfig,
    pub package: PackageConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            output_dir: PathBuf::from("dist"),
            html_file: "index.html".to_string(),
            css_file: "style.css".to_string(),
            minified_css_file: "style.min.css".to_string(),
            asset_dirs: vec!["images".to_string(), "documents".to_string()],
            aux_files: vec!["README.md".to_string(), "requirements.txt".to_string()],
            protected_names: default_protected_names(),
            server: ServerConfig::default(),
            package: PackageConfig::default(),
        }
    }
}

pub fn default_protected_names() -> Vec<String> {
    ["currentSlideIndex", "autoSlideInterval", "totalSlides", "slideInterval"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Values given on the command line. They win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_dir: Option<PathBuf>,
    pub port: Option<u16>,
    pub open_browser: Option<bool>,
    pub package_destination: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Config(#[from] config_rs::ConfigError),
    #[error("config file not found: {0}")]
    MissingFile(PathBuf),
}

impl SiteConfig {
    /// Builds the layered configuration: defaults, then the config file
    /// (explicit, or `site-optimizer.*` in `root` if present), then
    /// `SITE_OPTIMIZER_*` environment variables, then CLI overrides.
    pub fn load(
        root: &Path,
        explicit_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut builder = config_rs::Config::builder();

        match explicit_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::MissingFile(path.to_path_buf()));
                }
                builder = builder.add_source(config_rs::File::from(path).required(true));
            }
            None => {
                let implicit = root.join(CONFIG_FILE_STEM);
                builder = builder.add_source(
                    config_rs::File::with_name(&implicit.to_string_lossy()).required(false),
                );
            }
        }

        builder = builder.add_source(
            config_rs::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder = builder.set_override("project_root", root.to_string_lossy().into_owned())?;
        if let Some(output) = &overrides.output_dir {
            builder = builder.set_override("output_dir", output.to_string_lossy().into_owned())?;
        }
        if let Some(port) = overrides.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(open) = overrides.open_browser {
            builder = builder.set_override("server.open_browser", open)?;
        }
        if let Some(dest) = &overrides.package_destination {
            builder = builder
                .set_override("package.destination", dest.to_string_lossy().into_owned())?;
        }

        let cfg = builder.build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn source_path(&self, name: &str) -> PathBuf {
        self.project_root.join(name)
    }

    pub fn output_path(&self) -> PathBuf {
        self.project_root.join(&self.output_dir)
    }

    pub fn package_destination(&self) -> PathBuf {
        self.project_root.join(&self.package.destination)
    }
}
