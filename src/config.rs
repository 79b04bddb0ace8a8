use crate::constants;

/// Immutable configuration for one import run.
///
/// Every knob the pipeline consults lives here; stages receive a shared
/// reference and never mutate it. Defaults come from `constants`.
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    /// Canonical name given to the entity identifier column.
    pub dcid_column: String,
    /// Canonical name given to the date column (when unpivoting).
    pub date_column: String,
    /// Variable column name in long-format output.
    pub variable_column: String,
    /// Value column name in long-format output.
    pub value_column: String,

    /// Prefix marking an entity reference as pre-resolved.
    pub dcid_override_prefix: String,
    /// Base URL for browser links in the debug trace.
    pub browser_url: String,
    /// Identifier written to the debug trace for unresolved names.
    pub unresolved_marker: String,

    /// Whether to unpivot wide variable columns into long format.
    pub unpivot_variables: bool,

    /// Position of the entity reference column in the input. The loader
    /// supplies columns in file order; renaming is positional.
    pub entity_column_index: usize,
    /// Position of the date column in the input. Only consulted when
    /// `unpivot_variables` is set.
    pub date_column_index: usize,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            dcid_column: constants::COLUMN_DCID.to_string(),
            date_column: constants::COLUMN_DATE.to_string(),
            variable_column: constants::COLUMN_VARIABLE.to_string(),
            value_column: constants::COLUMN_VALUE.to_string(),
            dcid_override_prefix: constants::DCID_OVERRIDE_PREFIX.to_string(),
            browser_url: constants::DC_BROWSER.to_string(),
            unresolved_marker: constants::DEBUG_UNRESOLVED_DCID.to_string(),
            unpivot_variables: constants::UNPIVOT_VARIABLES,
            entity_column_index: 0,
            date_column_index: 1,
        }
    }
}

impl ImporterConfig {
    /// Browser link for a resolved identifier.
    pub fn browser_link(&self, dcid: &str) -> String {
        format!("{}/{}", self.browser_url, dcid)
    }
}
