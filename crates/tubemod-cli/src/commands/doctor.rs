//! Doctor command
//!
//! Diagnose configuration and connectivity.

use anyhow::Result;
use clap::Args;
use tubemod_core::config::Config;
use tubemod_core::TubemodError;

use super::connect_store;

/// Arguments for the doctor command
#[derive(Debug, Args)]
pub struct DoctorArgs {
    /// Skip the network checks
    #[arg(long)]
    pub offline: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check result
struct CheckResult {
    name: String,
    passed: bool,
    message: String,
    suggestion: Option<String>,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            suggestion: None,
        }
    }

    fn fail(name: &str, message: &str, suggestion: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    fn warn(name: &str, message: &str, suggestion: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: format!("⚠ {}", message),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    fn is_warning(&self) -> bool {
        self.passed && self.message.starts_with('⚠')
    }
}

/// Execute the doctor command
pub async fn execute(args: DoctorArgs, config: &Config) -> Result<()> {
    use colored::Colorize;

    let mut results = Vec::new();

    println!("\n{}", "1. Configuration".bold().underline());
    results.extend(check_configuration(config));

    if !args.offline {
        println!("\n{}", "2. Connectivity".bold().underline());
        results.extend(check_connectivity(config).await);
    }

    for result in &results {
        let status = if !result.passed {
            "✗".red()
        } else if result.is_warning() {
            "⚠".yellow()
        } else {
            "✓".green()
        };

        println!("   {} {}: {}", status, result.name, result.message);

        if args.verbose {
            if let Some(suggestion) = &result.suggestion {
                println!("     {}", suggestion.dimmed());
            }
        }
    }

    let warnings: Vec<_> = results.iter().filter(|r| r.is_warning()).collect();
    let errors: Vec<_> = results.iter().filter(|r| !r.passed).collect();

    println!(
        "\n{}: {} warnings, {} errors",
        "Summary".bold(),
        warnings.len().to_string().yellow(),
        errors.len().to_string().red()
    );

    if !errors.is_empty() {
        println!("\n{}", "✗ Errors:".red());
        for result in &errors {
            println!("  - {}: {}", result.name, result.message);
            if let Some(suggestion) = &result.suggestion {
                println!("    Fix: {}", suggestion);
            }
        }
    }

    if errors.is_empty() && warnings.is_empty() {
        println!("\n{} All checks passed!", "✓".green());
    }

    Ok(())
}

fn check_configuration(config: &Config) -> Vec<CheckResult> {
    let mut results = vec![CheckResult::ok("tubemod version", env!("CARGO_PKG_VERSION"))];

    match Config::candidate_paths().into_iter().find(|p| p.exists()) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<toml::Value>(&content) {
                Ok(_) => results.push(CheckResult::ok("Config file", &path.display().to_string())),
                Err(e) => results.push(CheckResult::fail(
                    "Config file",
                    &format!("invalid TOML: {}", e),
                    Some("Fix syntax errors or run 'tubemod config init --force'"),
                )),
            },
            Err(_) => results.push(CheckResult::fail("Config file", "cannot read", None)),
        },
        None => results.push(CheckResult::warn(
            "Config file",
            "not found, using defaults",
            Some("Run 'tubemod config init' to create one"),
        )),
    }

    results.push(CheckResult::ok("Comment store", &config.store.base_url));
    results.push(CheckResult::ok(
        "Classifier",
        &format!("{}{}", config.classifier.base_url, config.classifier.endpoint),
    ));

    if config.store.session_cookie.is_some() {
        results.push(CheckResult::ok("Session cookie", "configured"));
    } else {
        results.push(CheckResult::fail(
            "Session cookie",
            "not set",
            Some("Sign in through the dashboard and export TUBEMOD_SESSION"),
        ));
    }

    results
}

async fn check_connectivity(config: &Config) -> Vec<CheckResult> {
    let store = match connect_store(config) {
        Ok(store) => store,
        Err(e) => return vec![CheckResult::fail("Comment store", &e.to_string(), None)],
    };

    match store.current_user().await {
        Ok(user) => vec![CheckResult::ok("Signed in", &format!("{} <{}>", user.name, user.email))],
        Err(e) if e.is_unauthenticated() => vec![CheckResult::fail(
            "Signed in",
            &e.to_string(),
            Some("The session expired; sign in again and update TUBEMOD_SESSION"),
        )],
        Err(TubemodError::Network(message)) => vec![CheckResult::fail(
            "Comment store",
            &format!("unreachable: {}", message),
            Some("Check store.base_url or TUBEMOD_STORE_URL"),
        )],
        Err(e) => vec![CheckResult::warn("Signed in", &e.to_string(), None)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cookie_is_an_error() {
        let config = Config::default();
        let results = check_configuration(&config);
        let cookie = results.iter().find(|r| r.name == "Session cookie").unwrap();
        assert!(!cookie.passed);
    }

    #[test]
    fn test_warning_detection() {
        assert!(CheckResult::warn("x", "y", None).is_warning());
        assert!(!CheckResult::ok("x", "y").is_warning());
        assert!(!CheckResult::fail("x", "y", None).is_warning());
    }
}
