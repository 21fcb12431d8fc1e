//! Data models for the reduction pipeline frontend.
//!
//! - [`ReductionJobConfig`]: the mutable definition of a single reduction
//!   job, with field-level change notifications for GUI synchronization
//! - [`ReductionModule`] / [`KeywordUpdateReductionModule`]: the value types
//!   held by the job's two module lists
//! - [`FitsFile`]: opaque input-frame reference, shared between clones of a
//!   job definition
//! - [`RecipeConfig`] / [`UserSettings`]: YAML-backed settings loaded by
//!   [`SettingsManager`](crate::config::SettingsManager)

pub mod job;
pub mod module;
pub mod settings;

pub use job::{ConfigChange, NO_HEADER_SELECTED, ReductionJobConfig, SubscriptionId};
pub use module::{FitsFile, KeywordUpdateReductionModule, ReductionModule};
pub use settings::{DrpRecipes, DrpSettings, RecipeConfig, UserSettings};
