use anyhow::Result;
use hotai_application::PresetService;
use hotai_infrastructure::ConfigService;

fn service(config: &ConfigService) -> PresetService {
    PresetService::new(config.presets().clone())
}

pub fn list(config: &ConfigService) -> Result<()> {
    for preset in service(config).list() {
        let status = if preset.enabled { "enabled " } else { "disabled" };
        let first_line = preset.system.lines().next().unwrap_or_default();
        println!("{:<12} {}  {}", preset.name, status, first_line);
    }
    Ok(())
}

pub fn set_enabled(config: &ConfigService, name: &str, enabled: bool) -> Result<()> {
    service(config).set_enabled(name, enabled)?;
    println!("{} {}.", name, if enabled { "enabled" } else { "disabled" });
    Ok(())
}

pub fn set_system(config: &ConfigService, name: &str, text: String) -> Result<()> {
    service(config).set_system(name, text)?;
    println!("System prompt of {} updated.", name);
    Ok(())
}

pub fn reset(config: &ConfigService, name: &str) -> Result<()> {
    service(config).reset_system(name)?;
    println!("System prompt of {} restored to default.", name);
    Ok(())
}
