// drpjob - reduction job definition model for pipeline GUIs
//
// Holds the mutable definition of a data-reduction job, its field-level
// change-notification machinery, and the settings and logging layers a GUI
// frontend builds on. The GUI and the pipeline executor live elsewhere and
// consume this crate through getters and change events.

pub mod config;
pub mod logging;
pub mod models;
pub mod state;

// Re-export commonly used types for convenience
pub use config::SettingsManager;
pub use models::{
    ConfigChange, FitsFile, KeywordUpdateReductionModule, NO_HEADER_SELECTED, RecipeConfig,
    ReductionJobConfig, ReductionModule, SubscriptionId, UserSettings,
};
pub use state::JobConfigManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const LIB_NAME: &str = env!("CARGO_PKG_NAME");
