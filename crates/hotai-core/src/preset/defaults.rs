//! Compiled-in default presets.
//!
//! The list order is the display order. Migration rebuilds the user's list
//! from this one, so adding, removing or reordering entries here changes what
//! every user sees after upgrading.

use super::model::Preset;

/// Returns the default preset list of the current release.
///
/// - **Colleague**, **Teacher**, **Geek**: enabled on first launch
/// - **Documenter**, **Reviewer**, **Coder**: shipped disabled
pub fn get_default_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "Colleague",
            "You are a helpful colleague. Answer briefly and to the point, the way a coworker would over a quick chat.",
            "presets/colleague.png",
            true,
        ),
        Preset::new(
            "Teacher",
            "You are a patient teacher. Explain concepts step by step, check understanding with short examples and avoid jargon unless you define it.",
            "presets/teacher.png",
            true,
        ),
        Preset::new(
            "Geek",
            "You are an enthusiastic geek. Dive into technical details, mention relevant tools and trivia, and do not shy away from depth.",
            "presets/geek.png",
            true,
        ),
        Preset::new(
            "Documenter",
            "You write documentation. Turn the given code or notes into clear, well-structured documentation with headings and examples.",
            "presets/documenter.png",
            false,
        ),
        Preset::new(
            "Reviewer",
            "You are a careful code reviewer. Point out bugs, unclear naming and missing edge cases, and suggest concrete improvements.",
            "presets/reviewer.png",
            false,
        ),
        Preset::new(
            "Coder",
            "You are an expert programmer. Reply with working code first and keep the explanation short.",
            "presets/coder.png",
            false,
        ),
    ]
}

/// Returns the compiled-in default for `name`, if the current release ships one.
pub fn default_preset(name: &str) -> Option<Preset> {
    get_default_presets().into_iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_names_and_order() {
        let names: Vec<String> = get_default_presets().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["Colleague", "Teacher", "Geek", "Documenter", "Reviewer", "Coder"]
        );
    }

    #[test]
    fn test_last_three_disabled() {
        for preset in get_default_presets() {
            let expect_enabled = !matches!(preset.name.as_str(), "Documenter" | "Reviewer" | "Coder");
            assert_eq!(preset.enabled, expect_enabled, "{}", preset.name);
        }
    }

    #[test]
    fn test_names_unique_and_fields_populated() {
        let presets = get_default_presets();
        let names: HashSet<&str> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), presets.len());
        assert!(presets.iter().all(|p| !p.system.is_empty() && !p.image.is_empty()));
    }

    #[test]
    fn test_default_preset_lookup() {
        assert_eq!(default_preset("Geek").unwrap().image, "presets/geek.png");
        assert!(default_preset("Poet").is_none());
    }
}
