/// Fixed names and markers shared across the import pipeline.
/// These constants define the canonical column names and output file names
/// so they stay consistent between the importer, the writer, and tests.

// Canonical observation column names.
pub const COLUMN_DCID: &str = "dcid";
pub const COLUMN_DATE: &str = "date";
pub const COLUMN_VARIABLE: &str = "variable";
pub const COLUMN_VALUE: &str = "value";

// Debug resolve trace column names.
pub const DEBUG_COLUMN_NAME: &str = "name";
pub const DEBUG_COLUMN_DCID: &str = "dcid";
pub const DEBUG_COLUMN_LINK: &str = "link";

// Output file names, relative to the output directory.
pub const OBSERVATIONS_FILE_NAME: &str = "observations.csv";
pub const DEBUG_RESOLVE_FILE_NAME: &str = "debug_resolve.csv";

/// Prefix marking an entity reference as already carrying its dcid.
/// `dcid:country/USA` resolves to `country/USA` without a resolver call.
pub const DCID_OVERRIDE_PREFIX: &str = "dcid:";

/// Sentinel written to the debug trace for names the resolver did not know.
pub const DEBUG_UNRESOLVED_DCID: &str = "*UNRESOLVED*";

/// Base URL for browser links in the debug trace.
pub const DC_BROWSER: &str = "https://datacommons.org/browser";

/// When true, wide variable columns are unpivoted into long format.
pub const UNPIVOT_VARIABLES: bool = true;
