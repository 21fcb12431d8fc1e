use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// How a module's calibration file is resolved at execution time.
///
/// Stored as a plain string so the GUI can offer site-specific resolution
/// modes without a code change; common values are "Most Recent", "Specify
/// File" and "None".
pub const FIND_FILE_NONE: &str = "None";

/// A single processing step in a reduction recipe.
///
/// Order within [`ReductionJobConfig::module_list`](crate::models::ReductionJobConfig::module_list)
/// is execution order. The job definition deep-copies these on clone, so the
/// type only needs to be [`Clone`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionModule {
    /// Display name of the processing step, e.g. "Subtract Frame".
    pub name: String,

    /// Calibration-file resolution mode for this step.
    pub find_file: String,

    /// Resolved calibration file, empty until resolution has happened.
    pub calibration_file: Utf8PathBuf,

    /// Skipped steps stay in the list so the recipe shape is preserved.
    pub skip: bool,
}

impl ReductionModule {
    /// Create a module with the given step name and no calibration file.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            find_file: FIND_FILE_NONE.to_string(),
            calibration_file: Utf8PathBuf::new(),
            skip: false,
        }
    }
}

impl Default for ReductionModule {
    fn default() -> Self {
        Self::new("")
    }
}

/// A FITS header keyword edit, tracked separately from the main module list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordUpdateReductionModule {
    /// Header keyword to update, e.g. "OBJECT".
    pub keyword: String,

    /// New value, kept as its textual form.
    pub value: String,

    /// Value type the pipeline should write: "string", "integer", "float"
    /// or "boolean". Not validated here.
    pub datatype: String,

    /// Optional FITS comment for the card.
    pub comment: String,
}

impl KeywordUpdateReductionModule {
    pub fn new(keyword: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            value: value.into(),
            datatype: "string".to_string(),
            comment: String::new(),
        }
    }
}

/// An input frame reference, opaque to the job definition.
///
/// Held behind `Arc` in the job's FITS file list: cloning a job definition
/// produces a new list sharing the same file references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitsFile {
    pub path: Utf8PathBuf,
}

impl FitsFile {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File name portion of the path, or the empty string for bare paths.
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or("")
    }
}
