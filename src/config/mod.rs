use crate::models::{DrpRecipes, RecipeConfig, UserSettings};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Loads and saves the YAML settings files.
///
/// Two files live in the configuration directory:
/// - `DRP Recipes.yaml`: the recipe catalog (module presets per reduction
///   type, known keyword datatypes)
/// - `DRP Settings.yaml`: user settings (default directories, logging flags)
///
/// Job definitions themselves are never persisted here; they live only in
/// memory for the duration of a GUI session.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    config_dir: Utf8PathBuf,
    recipe_config_path: Utf8PathBuf,
    user_settings_path: Utf8PathBuf,
}

impl SettingsManager {
    /// Create a manager rooted at `config_dir`, creating the directory if
    /// it does not exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            recipe_config_path: config_dir.join("DRP Recipes.yaml"),
            user_settings_path: config_dir.join("DRP Settings.yaml"),
            config_dir,
        })
    }

    /// Load the recipe catalog, falling back to the built-in defaults when
    /// the file does not exist.
    pub fn load_recipe_config(&self) -> Result<RecipeConfig> {
        if !self.recipe_config_path.exists() {
            tracing::warn!(
                "Recipe catalog not found at {}, using defaults",
                self.recipe_config_path
            );
            return Ok(Self::default_recipe_config());
        }

        let file_contents = fs::read_to_string(&self.recipe_config_path)
            .with_context(|| format!("Failed to read recipe catalog: {}", self.recipe_config_path))?;

        let config: RecipeConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse recipe catalog: {}", self.recipe_config_path))?;

        tracing::info!("Loaded recipe catalog from {}", self.recipe_config_path);
        Ok(config)
    }

    /// Save the recipe catalog.
    pub fn save_recipe_config(&self, config: &RecipeConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize recipe catalog to YAML")?;

        fs::write(&self.recipe_config_path, yaml_string).with_context(|| {
            format!("Failed to write recipe catalog: {}", self.recipe_config_path)
        })?;

        tracing::info!("Saved recipe catalog to {}", self.recipe_config_path);
        Ok(())
    }

    /// Load user settings, falling back to defaults when the file does not
    /// exist.
    pub fn load_user_settings(&self) -> Result<UserSettings> {
        if !self.user_settings_path.exists() {
            tracing::warn!(
                "User settings not found at {}, using defaults",
                self.user_settings_path
            );
            return Ok(UserSettings::default());
        }

        let file_contents = fs::read_to_string(&self.user_settings_path)
            .with_context(|| format!("Failed to read user settings: {}", self.user_settings_path))?;

        let settings: UserSettings = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse user settings: {}", self.user_settings_path))?;

        tracing::info!("Loaded user settings from {}", self.user_settings_path);
        Ok(settings)
    }

    /// Save user settings.
    pub fn save_user_settings(&self, settings: &UserSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize user settings to YAML")?;

        fs::write(&self.user_settings_path, yaml_string).with_context(|| {
            format!("Failed to write user settings: {}", self.user_settings_path)
        })?;

        tracing::info!("Saved user settings to {}", self.user_settings_path);
        Ok(())
    }

    /// Built-in recipe catalog used when no `DRP Recipes.yaml` exists.
    pub fn default_recipe_config() -> RecipeConfig {
        use indexmap::IndexMap;

        let mut module_presets = IndexMap::new();

        module_presets.insert(
            "ARP_SPEC".to_string(),
            vec![
                "Subtract Frame".to_string(),
                "Adjust Channel Levels".to_string(),
                "Remove Crosstalk".to_string(),
                "Clean Cosmic Rays".to_string(),
                "Extract Spectra".to_string(),
                "Assemble Data Cube".to_string(),
                "Correct Dispersion".to_string(),
                "Divide by Flat Field".to_string(),
                "Scaled Sky Subtraction".to_string(),
                "Save DataSet Information".to_string(),
            ],
        );

        module_presets.insert(
            "CRP_SPEC".to_string(),
            vec![
                "Adjust Channel Levels".to_string(),
                "Remove Crosstalk".to_string(),
                "Clean Cosmic Rays".to_string(),
                "Extract Spectra".to_string(),
                "Save DataSet Information".to_string(),
            ],
        );

        module_presets.insert(
            "ORP_SPEC".to_string(),
            vec![
                "Subtract Frame".to_string(),
                "Adjust Channel Levels".to_string(),
                "Remove Crosstalk".to_string(),
                "Extract Spectra".to_string(),
                "Assemble Data Cube".to_string(),
                "Save DataSet Information".to_string(),
            ],
        );

        module_presets.insert(
            "ARP_IMAG".to_string(),
            vec![
                "Subtract Frame".to_string(),
                "Divide by Flat Field".to_string(),
                "Clean Cosmic Rays".to_string(),
                "Mosaic Frames".to_string(),
                "Save DataSet Information".to_string(),
            ],
        );

        let keyword_datatypes = vec![
            "string".to_string(),
            "integer".to_string(),
            "float".to_string(),
            "boolean".to_string(),
        ];

        RecipeConfig {
            drp_recipes: DrpRecipes {
                version: "1.0.0".to_string(),
                version_date: "26.08.30".to_string(),
                module_presets,
                keyword_datatypes,
            },
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
