use anyhow::{Result, bail};
use hotai_infrastructure::ConfigService;

pub fn set_api_key(config: &ConfigService, key: String) -> Result<()> {
    let key = key.trim().to_string();
    if key.is_empty() {
        bail!("API key must not be empty");
    }
    config.settings().update(|s| s.api_key = Some(key))?;
    println!("API key saved.");
    Ok(())
}

pub fn set_model(config: &ConfigService, model: Option<String>) -> Result<()> {
    let model = model.map(|m| m.trim().to_string()).filter(|m| !m.is_empty());
    let message = match &model {
        Some(m) => format!("Model set to {}.", m),
        None => "Model cleared.".to_string(),
    };
    config.settings().update(|s| s.model = model)?;
    println!("{}", message);
    Ok(())
}
