use serde::{Deserialize, Serialize};

/// A selectable assistant persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name, unique within the preset list
    pub name: String,
    /// System prompt text sent ahead of the conversation
    pub system: String,
    /// Bundled icon asset reference
    pub image: String,
    /// Whether the preset is offered in the persona picker
    pub enabled: bool,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        system: impl Into<String>,
        image: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            name: name.into(),
            system: system.into(),
            image: image.into(),
            enabled,
        }
    }
}
