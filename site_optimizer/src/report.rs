use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::protection::APPLIED_PROTECTIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeStats {
    pub original_bytes: u64,
    pub optimized_bytes: u64,
}

impl SizeStats {
    pub fn new(original_bytes: u64, optimized_bytes: u64) -> Self {
        Self {
            original_bytes,
            optimized_bytes,
        }
    }

    /// Percentage saved relative to the original. Zero for empty input.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        let original = self.original_bytes as f64;
        (original - self.optimized_bytes as f64) / original * 100.0
    }

    pub fn summary_line(&self, label: &str) -> String {
        format!(
            "{}: {} bytes → {} bytes ({:.1}% reduction)",
            label,
            group_thousands(self.original_bytes),
            group_thousands(self.optimized_bytes),
            self.reduction_percent()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub css: SizeStats,
    pub html: SizeStats,
    pub script_obfuscated: bool,
    pub renamed_identifiers: usize,
    pub copied_assets: Vec<String>,
    pub copied_aux_files: Vec<String>,
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn print_build_summary(report: &BuildReport) {
    println!("✅ Production build complete!");
    println!("📁 Optimized files are in '{}'", report.output_dir.display());
    println!("\n📊 Optimization Summary:");
    println!("{}", report.css.summary_line("CSS"));
    println!("{}", report.html.summary_line("HTML"));
    if report.script_obfuscated {
        println!("JavaScript: {} identifiers renamed", report.renamed_identifiers);
    } else {
        println!("JavaScript: no inline script found, obfuscation skipped");
    }
    println!("\n🔒 Security features added:");
    for protection in APPLIED_PROTECTIONS {
        println!("• {}", protection);
    }
}

pub fn print_deployment_instructions(output_dir: &Path) {
    let dir = output_dir.display();
    println!(
        r#"
🚀 DEPLOYMENT INSTRUCTIONS
==========================

Production files: {dir}

Static hosting:
  • Netlify: drag and drop the '{dir}' folder, or `netlify deploy --prod --dir={dir}`
  • Vercel: `cd {dir} && vercel --prod`
  • GitHub Pages: push the contents of '{dir}' to the gh-pages branch
  • S3 + CloudFront: sync '{dir}' to the bucket

Traditional hosting:
  • Upload everything inside '{dir}' to the web root
  • index.html must sit at the root, next to images/ and documents/

Notes:
  • Serve over HTTPS
  • The in-page protections only deter casual inspection; add CSP and HSTS
    headers on the server for real hardening
  • Rebuild with `site-optimizer build` after every source change and test
    the build before deploying
"#
    );
}
