use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Recipe catalog from `DRP Recipes.yaml`.
///
/// Maps each reduction type to the ordered list of module names the GUI
/// offers as its starting recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeConfig {
    #[serde(rename = "DRP_Recipes")]
    pub drp_recipes: DrpRecipes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrpRecipes {
    pub version: String,
    pub version_date: String,

    #[serde(rename = "Module_Presets")]
    pub module_presets: IndexMap<String, Vec<String>>,

    #[serde(rename = "Keyword_Datatypes")]
    pub keyword_datatypes: Vec<String>,
}

impl RecipeConfig {
    /// Ordered module names for a reduction type, if the catalog knows it.
    pub fn get_preset(&self, reduction_type: &str) -> Option<&Vec<String>> {
        self.drp_recipes.module_presets.get(reduction_type)
    }

    /// Reduction types in catalog order, for populating GUI choosers.
    pub fn reduction_types(&self) -> impl Iterator<Item = &str> {
        self.drp_recipes.module_presets.keys().map(String::as_str)
    }
}

/// User settings from `DRP Settings.yaml`.
///
/// Paths and flags the GUI seeds new job definitions from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(rename = "DRP_Settings")]
    pub drp_settings: DrpSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrpSettings {
    #[serde(rename = "Log Dir", default = "default_log_dir")]
    pub log_dir: String,

    #[serde(rename = "Input Dir", default)]
    pub input_dir: String,

    #[serde(rename = "Output Dir", default)]
    pub output_dir: String,

    #[serde(rename = "Console Logging", default = "default_console_logging")]
    pub console_logging: bool,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,
}

impl Default for DrpSettings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            input_dir: String::new(),
            output_dir: String::new(),
            console_logging: default_console_logging(),
            debug_mode: false,
        }
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            drp_settings: DrpSettings::default(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_console_logging() -> bool {
    true
}
