use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("classic", include_str!("../themes/classic.toml")),
    ("slate", include_str!("../themes/slate.toml")),
];

const CANVAS_WIDTH: f32 = 1400.0;
const CANVAS_HEIGHT: f32 = 800.0;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Theme file not found: {0}")]
    NotFound(String),
    #[error("Failed to read theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse theme as TOML ({toml}) or YAML ({yaml})")]
    Format { toml: String, yaml: String },
    #[error("Unknown built-in theme '{name}'. Available: {available}")]
    UnknownBuiltin { name: String, available: String },
}

/// Colors and canvas settings for a rendered diagram.
///
/// Every field is optional in theme files; missing ones fall back to the
/// classic palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramTheme {
    pub background_color: String,
    pub font_family: String,

    pub entity_fill: String,
    pub entity_stroke: String,
    pub entity_text: String,

    pub process_fill: String,
    pub process_stroke: String,
    pub process_text: String,

    pub store_stroke: String,
    pub store_text: String,

    pub flow_color: String,
    pub boundary_color: String,
    pub pii_color: String,

    pub legend_fill: String,
    pub legend_border: String,
    pub legend_text: String,

    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Default for DiagramTheme {
    fn default() -> Self {
        Self::classic()
    }
}

impl DiagramTheme {
    pub fn classic() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            font_family: "sans-serif".to_string(),
            entity_fill: "#dbeafe".to_string(),
            entity_stroke: "#1e40af".to_string(),
            entity_text: "#1e40af".to_string(),
            process_fill: "#dcfce7".to_string(),
            process_stroke: "#15803d".to_string(),
            process_text: "#15803d".to_string(),
            store_stroke: "#7c3aed".to_string(),
            store_text: "#7c3aed".to_string(),
            flow_color: "#3b82f6".to_string(),
            boundary_color: "#dc2626".to_string(),
            pii_color: "#fbbf24".to_string(),
            legend_fill: "#f8fafc".to_string(),
            legend_border: "#cbd5e1".to_string(),
            legend_text: "#1e293b".to_string(),
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
        }
    }

    pub fn from_builtin(name: &str) -> Result<Self, ThemeError> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_THEMES
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| ThemeError::UnknownBuiltin {
                name: name.to_string(),
                available: Self::list_builtins().join(", "),
            })?;
        Self::from_str_any(content)
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_THEMES.iter().map(|(n, _)| *n).collect()
    }

    /// Resolve `--theme`: an existing file path wins, otherwise a built-in name.
    pub fn load(name_or_path: &str) -> Result<Self, ThemeError> {
        let path = Path::new(name_or_path);
        if path.is_file() {
            return Self::from_file(path);
        }
        if path.extension().is_some() {
            return Err(ThemeError::NotFound(path.display().to_string()));
        }
        Self::from_builtin(name_or_path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str_any(&content)
    }

    /// TOML first, then YAML.
    pub fn from_str_any(content: &str) -> Result<Self, ThemeError> {
        let toml_err = match toml::from_str::<Self>(content) {
            Ok(theme) => return Ok(theme),
            Err(e) => e.to_string(),
        };
        serde_yaml::from_str::<Self>(content).map_err(|yaml_err| ThemeError::Format {
            toml: toml_err.trim().to_string(),
            yaml: yaml_err.to_string(),
        })
    }
}
