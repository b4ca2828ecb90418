//! `ytbot validate`: check the configuration without starting the bot.

use std::path::Path;

use {
    anyhow::Result,
    ytbot_config::{CONFIG_FILENAMES, Severity, ValidationResult, find_config_file},
};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Print diagnostics for the config in `dir`. Returns `false` when the
/// configuration has errors.
pub fn validate(dir: &Path) -> Result<bool> {
    let Some(path) = find_config_file(dir) else {
        anyhow::bail!(
            "no config file found in {} (looked for {})",
            dir.display(),
            CONFIG_FILENAMES.join(", ")
        );
    };

    let result = ytbot_config::validate(&path);
    println!("{}", render_report(&path, &result));
    Ok(!result.has_errors())
}

fn render_report(path: &Path, result: &ValidationResult) -> String {
    let mut out = format!("Config: {}\n", path.display());

    for diagnostic in &result.diagnostics {
        let color = match diagnostic.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        };
        out.push_str(&format!("  {color}{diagnostic}{RESET}\n"));
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        out.push_str(&format!("  {GREEN}ok{RESET}"));
    } else {
        out.push_str(&format!("  {errors} error(s), {warnings} warning(s)"));
    }
    out
}
