pub mod build;
pub mod cli;
pub mod config;
pub mod css_minifier;
pub mod errors;
pub mod html;
pub mod js_minifier;
pub mod logger;
pub mod obfuscator;
pub mod package;
pub mod protection;
pub mod report;
pub mod server;
