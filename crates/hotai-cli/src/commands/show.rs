use anyhow::Result;
use hotai_infrastructure::ConfigService;
use hotai_infrastructure::migration::read_version;

use super::mask_secret;

pub fn run(config: &ConfigService) -> Result<()> {
    let settings = config.settings().get();
    let version = read_version(config.storage().as_ref())?;

    println!("Schema version: {}", version);
    println!();
    println!("Settings:");
    println!(
        "  API key:       {}",
        settings.api_key.as_deref().map(mask_secret).unwrap_or_else(|| "(unset)".into())
    );
    println!("  Model:         {}", settings.model.as_deref().unwrap_or("(unset)"));
    match &settings.hot_key {
        Some(binding) => {
            let modifiers: Vec<String> = binding.modifiers().iter().map(|m| m.0.to_string()).collect();
            println!("  Hotkey:        modifiers [{}], key {}", modifiers.join(", "), binding.key().0);
        }
        None => println!("  Hotkey:        (unset)"),
    }
    println!("  Always on top: {}", flag(settings.always_on_top));
    println!("  Maximized:     {}", flag(settings.is_maximized));
    match settings.bounds {
        Some(b) => println!("  Bounds:        {}x{} at ({}, {})", b.width, b.height, b.x, b.y),
        None => println!("  Bounds:        (unset)"),
    }

    println!();
    println!("Presets:");
    config.presets().with(|presets| {
        for preset in presets {
            println!("  [{}] {}", if preset.enabled { "x" } else { " " }, preset.name);
        }
    });

    Ok(())
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "(unset)",
    }
}
