//! Constants shared by the search service and its callers.

/// Species value carried by documents that have no species of their own.
pub const ENTRIES_WITHOUT_SPECIES: &str = "Entries without species";

/// Species used by fireworks flagging when the caller selected none.
pub const DEFAULT_FLAGGING_SPECIES: &str = "Homo sapiens";

/// Rows fetched by the flagging handlers. Terms matching more documents than
/// this are not precise enough to flag, so only the first page counts.
pub const FLAGGING_ROWS: u32 = 100;

pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Report-metadata keys.
pub const REPORT_RELEASE_VERSION: &str = "release-version";
pub const REPORT_IP_ADDRESS: &str = "ip-address";
pub const REPORT_USER_AGENT: &str = "user-agent";

/// Marker placed by the engine's highlighter around matched text.
pub const HIGHLIGHT_MARKER: &str = "highlighting";

/// Encoded-set sentinel used by occurrence records for "no values".
pub const OCCURRENCE_EMPTY_SENTINEL: &str = "#";

/// Multi-valued fields holding packed occurrence records.
pub const OCCURRENCES_FIELD: &str = "occurrences";
pub const OCCURRENCES_WITH_INTERACTOR_FIELD: &str = "occurrencesWithInteractor";
