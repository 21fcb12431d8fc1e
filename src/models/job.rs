use crate::models::module::{FitsFile, KeywordUpdateReductionModule, ReductionModule};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Sentinel value of [`ReductionJobConfig::update_header_number`] meaning
/// "no header selected".
pub const NO_HEADER_SELECTED: i32 = -1;

/// Change events emitted when a job definition field is modified.
///
/// Every setter emits exactly one event carrying the previous and the new
/// value, even when both are equal. GUI widgets rely on the unconditional
/// event to refresh after programmatic edits.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigChange {
    LogPath {
        old: Utf8PathBuf,
        new: Utf8PathBuf,
    },
    ReductionType {
        old: String,
        new: String,
    },
    DatasetInputDir {
        old: Utf8PathBuf,
        new: Utf8PathBuf,
    },
    DatasetName {
        old: String,
        new: String,
    },
    DatasetOutputDir {
        old: Utf8PathBuf,
        new: Utf8PathBuf,
    },
    FitsFileList {
        old: Vec<Arc<FitsFile>>,
        new: Vec<Arc<FitsFile>>,
    },
    ModuleList {
        old: Vec<ReductionModule>,
        new: Vec<ReductionModule>,
    },
    KeywordUpdateModuleList {
        old: Vec<KeywordUpdateReductionModule>,
        new: Vec<KeywordUpdateReductionModule>,
    },
    UpdateDatasetNumber {
        old: i32,
        new: i32,
    },
    UpdateHeaderNumber {
        old: i32,
        new: i32,
    },
}

impl ConfigChange {
    /// Name of the field this event refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigChange::LogPath { .. } => "log_path",
            ConfigChange::ReductionType { .. } => "reduction_type",
            ConfigChange::DatasetInputDir { .. } => "dataset_input_dir",
            ConfigChange::DatasetName { .. } => "dataset_name",
            ConfigChange::DatasetOutputDir { .. } => "dataset_output_dir",
            ConfigChange::FitsFileList { .. } => "dataset_fits_file_list",
            ConfigChange::ModuleList { .. } => "module_list",
            ConfigChange::KeywordUpdateModuleList { .. } => "keyword_update_module_list",
            ConfigChange::UpdateDatasetNumber { .. } => "update_dataset_number",
            ConfigChange::UpdateHeaderNumber { .. } => "update_header_number",
        }
    }
}

/// Handle returned by [`ReductionJobConfig::subscribe`].
///
/// Passing it to [`ReductionJobConfig::unsubscribe`] removes that one
/// registration; ids are never reused within a job definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&ConfigChange) + Send>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    // Registration order is delivery order; duplicates are allowed.
    entries: Vec<(SubscriptionId, Listener)>,
}

/// Mutable definition of a single data-reduction job.
///
/// Holds the input/output locations, the ordered processing recipe and the
/// keyword-update list for one job, and notifies subscribed listeners on
/// every field mutation so GUI widgets stay synchronized with the model.
///
/// Setters accept any value; nothing here validates paths or executes
/// modules. Cloning produces an independent definition with deep-copied
/// module lists, a shallow-copied FITS file list (shared elements, new
/// container) and an empty subscriber registry.
pub struct ReductionJobConfig {
    log_path: Utf8PathBuf,
    reduction_type: String,
    dataset_input_dir: Utf8PathBuf,
    dataset_name: String,
    dataset_output_dir: Utf8PathBuf,
    dataset_fits_file_list: Vec<Arc<FitsFile>>,
    module_list: Vec<ReductionModule>,
    keyword_update_module_list: Vec<KeywordUpdateReductionModule>,
    update_dataset_number: i32,
    update_header_number: i32,

    // One lock covers subscription management and dispatch. Listeners run
    // with the registry held, so a listener must not subscribe or
    // unsubscribe on this job definition from inside its callback.
    listeners: Mutex<ListenerRegistry>,
}

impl ReductionJobConfig {
    pub fn new() -> Self {
        Self {
            log_path: Utf8PathBuf::new(),
            reduction_type: String::new(),
            dataset_input_dir: Utf8PathBuf::new(),
            dataset_name: String::new(),
            dataset_output_dir: Utf8PathBuf::new(),
            dataset_fits_file_list: Vec::new(),
            module_list: Vec::new(),
            keyword_update_module_list: Vec::new(),
            update_dataset_number: 0,
            update_header_number: NO_HEADER_SELECTED,
            listeners: Mutex::new(ListenerRegistry::default()),
        }
    }

    // Subscription management

    /// Register a listener for all future change events.
    ///
    /// The same closure may be registered more than once; each registration
    /// is delivered independently and removed independently.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ConfigChange) + Send + 'static,
    {
        let mut registry = self.listeners.lock().unwrap();
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a registration. Unknown ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut registry = self.listeners.lock().unwrap();
        registry.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    /// Number of currently registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().unwrap().entries.len()
    }

    /// Deliver a change synchronously to every listener in registration
    /// order. Delivery happens in the setter's calling thread.
    fn notify(&self, change: &ConfigChange) {
        let registry = self.listeners.lock().unwrap();
        for (_, listener) in &registry.entries {
            listener(change);
        }
    }

    // Scalar accessors. Every setter stores the value and fires exactly one
    // event, also when the new value equals the old one.

    pub fn log_path(&self) -> &Utf8Path {
        &self.log_path
    }

    pub fn set_log_path(&mut self, value: impl Into<Utf8PathBuf>) -> ConfigChange {
        let new = value.into();
        let old = std::mem::replace(&mut self.log_path, new.clone());
        let change = ConfigChange::LogPath { old, new };
        self.notify(&change);
        change
    }

    pub fn reduction_type(&self) -> &str {
        &self.reduction_type
    }

    pub fn set_reduction_type(&mut self, value: impl Into<String>) -> ConfigChange {
        let new = value.into();
        let old = std::mem::replace(&mut self.reduction_type, new.clone());
        let change = ConfigChange::ReductionType { old, new };
        self.notify(&change);
        change
    }

    pub fn dataset_input_dir(&self) -> &Utf8Path {
        &self.dataset_input_dir
    }

    pub fn set_dataset_input_dir(&mut self, value: impl Into<Utf8PathBuf>) -> ConfigChange {
        let new = value.into();
        let old = std::mem::replace(&mut self.dataset_input_dir, new.clone());
        let change = ConfigChange::DatasetInputDir { old, new };
        self.notify(&change);
        change
    }

    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    pub fn set_dataset_name(&mut self, value: impl Into<String>) -> ConfigChange {
        let new = value.into();
        let old = std::mem::replace(&mut self.dataset_name, new.clone());
        let change = ConfigChange::DatasetName { old, new };
        self.notify(&change);
        change
    }

    pub fn dataset_output_dir(&self) -> &Utf8Path {
        &self.dataset_output_dir
    }

    pub fn set_dataset_output_dir(&mut self, value: impl Into<Utf8PathBuf>) -> ConfigChange {
        let new = value.into();
        let old = std::mem::replace(&mut self.dataset_output_dir, new.clone());
        let change = ConfigChange::DatasetOutputDir { old, new };
        self.notify(&change);
        change
    }

    pub fn update_dataset_number(&self) -> i32 {
        self.update_dataset_number
    }

    pub fn set_update_dataset_number(&mut self, value: i32) -> ConfigChange {
        let old = std::mem::replace(&mut self.update_dataset_number, value);
        let change = ConfigChange::UpdateDatasetNumber { old, new: value };
        self.notify(&change);
        change
    }

    pub fn update_header_number(&self) -> i32 {
        self.update_header_number
    }

    /// Any integer is accepted, including [`NO_HEADER_SELECTED`].
    pub fn set_update_header_number(&mut self, value: i32) -> ConfigChange {
        let old = std::mem::replace(&mut self.update_header_number, value);
        let change = ConfigChange::UpdateHeaderNumber { old, new: value };
        self.notify(&change);
        change
    }

    /// Whether a FITS header is currently selected for keyword updates.
    pub fn is_header_selected(&self) -> bool {
        self.update_header_number != NO_HEADER_SELECTED
    }

    // List accessors. Getters expose the live sequence; in-place edits via
    // the `_mut` accessors do not fire events, replacing the whole list does.

    pub fn dataset_fits_file_list(&self) -> &[Arc<FitsFile>] {
        &self.dataset_fits_file_list
    }

    pub fn dataset_fits_file_list_mut(&mut self) -> &mut Vec<Arc<FitsFile>> {
        &mut self.dataset_fits_file_list
    }

    pub fn set_dataset_fits_file_list(&mut self, value: Vec<Arc<FitsFile>>) -> ConfigChange {
        let old = std::mem::replace(&mut self.dataset_fits_file_list, value.clone());
        let change = ConfigChange::FitsFileList { old, new: value };
        self.notify(&change);
        change
    }

    pub fn module_list(&self) -> &[ReductionModule] {
        &self.module_list
    }

    pub fn module_list_mut(&mut self) -> &mut Vec<ReductionModule> {
        &mut self.module_list
    }

    pub fn set_module_list(&mut self, value: Vec<ReductionModule>) -> ConfigChange {
        let old = std::mem::replace(&mut self.module_list, value.clone());
        let change = ConfigChange::ModuleList { old, new: value };
        self.notify(&change);
        change
    }

    pub fn keyword_update_module_list(&self) -> &[KeywordUpdateReductionModule] {
        &self.keyword_update_module_list
    }

    pub fn keyword_update_module_list_mut(&mut self) -> &mut Vec<KeywordUpdateReductionModule> {
        &mut self.keyword_update_module_list
    }

    pub fn set_keyword_update_module_list(
        &mut self,
        value: Vec<KeywordUpdateReductionModule>,
    ) -> ConfigChange {
        let old = std::mem::replace(&mut self.keyword_update_module_list, value.clone());
        let change = ConfigChange::KeywordUpdateModuleList { old, new: value };
        self.notify(&change);
        change
    }
}

impl Default for ReductionJobConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ReductionJobConfig {
    /// Copy a job definition.
    ///
    /// Module lists are deep copies (independent elements); the FITS file
    /// list is a new container sharing the source's element references in
    /// order. Subscribers do not carry over.
    fn clone(&self) -> Self {
        Self {
            log_path: self.log_path.clone(),
            reduction_type: self.reduction_type.clone(),
            dataset_input_dir: self.dataset_input_dir.clone(),
            dataset_name: self.dataset_name.clone(),
            dataset_output_dir: self.dataset_output_dir.clone(),
            // Arc clones: shared elements, independent container.
            dataset_fits_file_list: self.dataset_fits_file_list.clone(),
            module_list: self.module_list.clone(),
            keyword_update_module_list: self.keyword_update_module_list.clone(),
            update_dataset_number: self.update_dataset_number,
            update_header_number: self.update_header_number,
            listeners: Mutex::new(ListenerRegistry::default()),
        }
    }
}

impl fmt::Debug for ReductionJobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReductionJobConfig")
            .field("log_path", &self.log_path)
            .field("reduction_type", &self.reduction_type)
            .field("dataset_input_dir", &self.dataset_input_dir)
            .field("dataset_name", &self.dataset_name)
            .field("dataset_output_dir", &self.dataset_output_dir)
            .field("dataset_fits_file_list", &self.dataset_fits_file_list)
            .field("module_list", &self.module_list)
            .field("keyword_update_module_list", &self.keyword_update_module_list)
            .field("update_dataset_number", &self.update_dataset_number)
            .field("update_header_number", &self.update_header_number)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn recording_listener() -> (
        Arc<StdMutex<Vec<ConfigChange>>>,
        impl Fn(&ConfigChange) + Send + 'static,
    ) {
        let received = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        (received, move |change: &ConfigChange| {
            sink.lock().unwrap().push(change.clone())
        })
    }

    #[test]
    fn test_defaults() {
        let job = ReductionJobConfig::new();
        assert_eq!(job.log_path(), Utf8Path::new(""));
        assert_eq!(job.reduction_type(), "");
        assert_eq!(job.dataset_input_dir(), Utf8Path::new(""));
        assert_eq!(job.dataset_name(), "");
        assert_eq!(job.dataset_output_dir(), Utf8Path::new(""));
        assert!(job.dataset_fits_file_list().is_empty());
        assert!(job.module_list().is_empty());
        assert!(job.keyword_update_module_list().is_empty());
        assert_eq!(job.update_dataset_number(), 0);
        assert_eq!(job.update_header_number(), NO_HEADER_SELECTED);
        assert_eq!(job.subscriber_count(), 0);
        assert!(!job.is_header_selected());
    }

    #[test]
    fn test_setter_stores_and_notifies() {
        let mut job = ReductionJobConfig::new();
        let (received, listener) = recording_listener();
        job.subscribe(listener);

        job.set_dataset_name("obs001");
        assert_eq!(job.dataset_name(), "obs001");

        let events = received.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            ConfigChange::DatasetName {
                old: String::new(),
                new: "obs001".to_string(),
            }
        );
        assert_eq!(events[0].field(), "dataset_name");
    }

    #[test]
    fn test_setter_notifies_even_when_value_unchanged() {
        let mut job = ReductionJobConfig::new();
        job.set_reduction_type("ARP_SPEC");

        let (received, listener) = recording_listener();
        job.subscribe(listener);

        job.set_reduction_type("ARP_SPEC");

        let events = received.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            ConfigChange::ReductionType {
                old: "ARP_SPEC".to_string(),
                new: "ARP_SPEC".to_string(),
            }
        );
    }

    #[test]
    fn test_list_setter_fires_old_and_new_sequence() {
        let mut job = ReductionJobConfig::new();
        job.set_module_list(vec![ReductionModule::new("Subtract Frame")]);

        let (received, listener) = recording_listener();
        job.subscribe(listener);

        let replacement = vec![
            ReductionModule::new("Adjust Channel Levels"),
            ReductionModule::new("Extract Spectra"),
        ];
        job.set_module_list(replacement.clone());

        let events = received.lock().unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ConfigChange::ModuleList { old, new } => {
                assert_eq!(old.len(), 1);
                assert_eq!(old[0].name, "Subtract Frame");
                assert_eq!(new, &replacement);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_in_place_list_mutation_does_not_notify() {
        let mut job = ReductionJobConfig::new();
        let (received, listener) = recording_listener();
        job.subscribe(listener);

        job.module_list_mut().push(ReductionModule::new("Subtract Frame"));
        job.dataset_fits_file_list_mut()
            .push(Arc::new(FitsFile::new("/data/raw/a001.fits")));

        assert_eq!(job.module_list().len(), 1);
        assert_eq!(job.dataset_fits_file_list().len(), 1);
        assert!(received.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut job = ReductionJobConfig::new();
        let (received, listener) = recording_listener();
        let id = job.subscribe(listener);

        job.set_dataset_name("first");
        job.unsubscribe(id);
        job.set_dataset_name("second");

        assert_eq!(received.lock().unwrap().len(), 1);
        assert_eq!(job.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_noop() {
        let mut job = ReductionJobConfig::new();
        let (received, listener) = recording_listener();
        let id = job.subscribe(listener);

        // Unsubscribe twice; the second call finds nothing to remove.
        job.unsubscribe(id);
        job.unsubscribe(id);

        let (other_received, other_listener) = recording_listener();
        job.subscribe(other_listener);
        job.unsubscribe(id);

        job.set_update_dataset_number(7);
        assert!(received.lock().unwrap().is_empty());
        assert_eq!(other_received.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_registration_delivers_twice() {
        let mut job = ReductionJobConfig::new();
        let received = Arc::new(StdMutex::new(Vec::new()));

        for _ in 0..2 {
            let sink = Arc::clone(&received);
            job.subscribe(move |change| sink.lock().unwrap().push(change.clone()));
        }
        assert_eq!(job.subscriber_count(), 2);

        job.set_update_header_number(3);
        assert_eq!(received.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let mut job = ReductionJobConfig::new();
        let order = Arc::new(StdMutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let sink = Arc::clone(&order);
            job.subscribe(move |_| sink.lock().unwrap().push(tag));
        }

        job.set_dataset_name("obs001");
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_clone_deep_copies_module_lists() {
        let mut job = ReductionJobConfig::new();
        job.set_module_list(vec![
            ReductionModule::new("Subtract Frame"),
            ReductionModule::new("Extract Spectra"),
        ]);
        job.set_keyword_update_module_list(vec![KeywordUpdateReductionModule::new(
            "OBJECT", "NGC 1068",
        )]);

        let mut copy = job.clone();
        assert_eq!(copy.module_list(), job.module_list());
        assert_eq!(
            copy.keyword_update_module_list(),
            job.keyword_update_module_list()
        );

        // Mutating the copy leaves the source untouched.
        copy.module_list_mut()[0].skip = true;
        assert!(!job.module_list()[0].skip);
    }

    #[test]
    fn test_clone_shares_fits_file_references() {
        let mut job = ReductionJobConfig::new();
        let f1 = Arc::new(FitsFile::new("/data/raw/a001.fits"));
        let f2 = Arc::new(FitsFile::new("/data/raw/a002.fits"));
        job.set_dataset_fits_file_list(vec![Arc::clone(&f1), Arc::clone(&f2)]);

        let mut copy = job.clone();
        assert_eq!(copy.dataset_fits_file_list().len(), 2);
        assert!(Arc::ptr_eq(&copy.dataset_fits_file_list()[0], &f1));
        assert!(Arc::ptr_eq(&copy.dataset_fits_file_list()[1], &f2));

        // Containers are independent even though elements are shared.
        copy.dataset_fits_file_list_mut().pop();
        assert_eq!(job.dataset_fits_file_list().len(), 2);
    }

    #[test]
    fn test_clone_does_not_transfer_subscribers() {
        let mut job = ReductionJobConfig::new();
        let (received, listener) = recording_listener();
        job.subscribe(listener);

        job.set_dataset_name("obs001");
        job.set_update_header_number(3);

        let mut copy = job.clone();
        assert_eq!(copy.dataset_name(), "obs001");
        assert_eq!(copy.update_header_number(), 3);
        assert_eq!(copy.subscriber_count(), 0);

        // Mutating the copy notifies nobody.
        copy.set_dataset_name("obs002");
        assert_eq!(received.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_sentinel_round_trip() {
        let mut job = ReductionJobConfig::new();
        job.set_update_header_number(5);
        assert!(job.is_header_selected());

        let change = job.set_update_header_number(NO_HEADER_SELECTED);
        assert!(!job.is_header_selected());
        assert_eq!(
            change,
            ConfigChange::UpdateHeaderNumber {
                old: 5,
                new: NO_HEADER_SELECTED,
            }
        );
    }
}
