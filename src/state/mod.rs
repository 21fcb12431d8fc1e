// Shared job handle
//
// Wraps a ReductionJobConfig in Arc<RwLock<T>> and re-broadcasts its change
// events over a tokio broadcast channel so async GUI code can react without
// polling the model.

use crate::models::job::{ConfigChange, ReductionJobConfig};
use crate::models::{RecipeConfig, ReductionModule, UserSettings};
use camino::Utf8PathBuf;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Thread-safe handle to a shared job definition.
///
/// The synchronous listeners on [`ReductionJobConfig`] serve widgets living
/// on the GUI thread; this handle is for everything else. Mutations go
/// through [`update()`](Self::update), which forwards every emitted
/// [`ConfigChange`] to all broadcast subscribers.
///
/// Clones share the same underlying job definition and channel.
pub struct JobConfigManager {
    job: Arc<RwLock<ReductionJobConfig>>,

    /// Broadcast channel re-emitting the job's change events.
    change_tx: broadcast::Sender<ConfigChange>,
}

impl JobConfigManager {
    /// Create a manager around a default job definition.
    ///
    /// The broadcast channel buffers 100 events per subscriber.
    pub fn new() -> Self {
        Self::from_config(ReductionJobConfig::new())
    }

    /// Create a manager around an existing job definition.
    pub fn from_config(config: ReductionJobConfig) -> Self {
        let (change_tx, _) = broadcast::channel(100);
        Self {
            job: Arc::new(RwLock::new(config)),
            change_tx,
        }
    }

    /// Clone of the current job definition.
    ///
    /// The snapshot carries no subscribers (clone semantics of
    /// [`ReductionJobConfig`]), so it is safe to hand to worker code.
    pub fn snapshot(&self) -> ReductionJobConfig {
        self.job.read().unwrap().clone()
    }

    /// Execute a function with read access to the job definition.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ReductionJobConfig) -> R,
    {
        let job = self.job.read().unwrap();
        f(&job)
    }

    /// Mutate the job definition and broadcast the resulting changes.
    ///
    /// The closure should mutate through the job's setters and return the
    /// [`ConfigChange`]s they produced; each is re-broadcast after the write
    /// lock is released. Send errors are ignored when nobody is listening.
    pub fn update<F>(&self, update_fn: F) -> Vec<ConfigChange>
    where
        F: FnOnce(&mut ReductionJobConfig) -> Vec<ConfigChange>,
    {
        let changes = {
            let mut job = self.job.write().unwrap();
            update_fn(&mut job)
        };

        for change in &changes {
            let _ = self.change_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to broadcast change events.
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigChange> {
        self.change_tx.subscribe()
    }

    // Convenience setters for the fields the GUI edits most often.

    pub fn set_dataset_name(&self, name: impl Into<String>) -> Vec<ConfigChange> {
        let name = name.into();
        self.update(|job| vec![job.set_dataset_name(name)])
    }

    pub fn set_reduction_type(&self, reduction_type: impl Into<String>) -> Vec<ConfigChange> {
        let reduction_type = reduction_type.into();
        self.update(|job| vec![job.set_reduction_type(reduction_type)])
    }

    pub fn set_dataset_input_dir(&self, dir: impl Into<Utf8PathBuf>) -> Vec<ConfigChange> {
        let dir = dir.into();
        self.update(|job| vec![job.set_dataset_input_dir(dir)])
    }

    pub fn set_dataset_output_dir(&self, dir: impl Into<Utf8PathBuf>) -> Vec<ConfigChange> {
        let dir = dir.into();
        self.update(|job| vec![job.set_dataset_output_dir(dir)])
    }

    pub fn set_update_header_number(&self, header: i32) -> Vec<ConfigChange> {
        self.update(|job| vec![job.set_update_header_number(header)])
    }

    /// Seed the job's paths from the user settings file.
    ///
    /// Empty settings fields leave the corresponding job field untouched.
    pub fn apply_user_settings(&self, settings: &UserSettings) -> Vec<ConfigChange> {
        let drp = &settings.drp_settings;

        let changes = self.update(|job| {
            let mut changes = Vec::new();

            if !drp.log_dir.is_empty() {
                changes.push(job.set_log_path(drp.log_dir.as_str()));
            }
            if !drp.input_dir.is_empty() {
                changes.push(job.set_dataset_input_dir(drp.input_dir.as_str()));
            }
            if !drp.output_dir.is_empty() {
                changes.push(job.set_dataset_output_dir(drp.output_dir.as_str()));
            }

            changes
        });

        tracing::info!(
            "Applied user settings to job: log_dir={}, input_dir={}, output_dir={}",
            drp.log_dir,
            drp.input_dir,
            drp.output_dir
        );

        changes
    }

    /// Set the reduction type and replace the module list with the
    /// catalog's preset recipe for that type.
    ///
    /// An unknown reduction type still updates the type field but leaves
    /// the module list alone.
    pub fn apply_recipe_preset(
        &self,
        recipes: &RecipeConfig,
        reduction_type: &str,
    ) -> Vec<ConfigChange> {
        let preset = recipes.get_preset(reduction_type).cloned();

        if preset.is_none() {
            tracing::warn!(
                "No preset recipe for reduction type {}, keeping current module list",
                reduction_type
            );
        }

        self.update(|job| {
            let mut changes = vec![job.set_reduction_type(reduction_type)];

            if let Some(names) = preset {
                let modules: Vec<ReductionModule> =
                    names.into_iter().map(ReductionModule::new).collect();
                tracing::info!(
                    "Applied preset recipe for {}: {} modules",
                    reduction_type,
                    modules.len()
                );
                changes.push(job.set_module_list(modules));
            }

            changes
        })
    }

    /// Arc reference to the job definition for code that wants to hold the
    /// lock directly. Mutations made this way bypass the broadcast channel.
    pub fn job_arc(&self) -> Arc<RwLock<ReductionJobConfig>> {
        Arc::clone(&self.job)
    }
}

impl Default for JobConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for JobConfigManager {
    fn clone(&self) -> Self {
        Self {
            job: Arc::clone(&self.job),
            change_tx: self.change_tx.clone(),
        }
    }
}
