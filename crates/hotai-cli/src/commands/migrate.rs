use anyhow::{Context, Result};
use hotai_infrastructure::ConfigService;

/// Migration already ran while opening the state; this prints its report.
pub fn run(config: &ConfigService) -> Result<()> {
    let report = config.migration_report();
    let json = serde_json::to_string_pretty(report).context("Failed to serialize migration report")?;
    println!("{}", json);
    if !report.performed {
        eprintln!("Nothing to migrate (schema v{}).", report.to_version);
    }
    Ok(())
}
