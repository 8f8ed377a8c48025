//! Search resolution: facets, relaxation, result assembly and reporting.

mod search_cascade;
pub use search_cascade::{SearchOptions, paging_parameters, search_for_results};

mod search_for_results;
pub use search_for_results::{
    assemble_entries, assemble_grouped_entries, build_entry, flat_group, get_entries, search_entries,
    select_reference_identifier,
};

mod search_facets;
pub use search_facets::{
    ReconciledFacets, available_facets, detect_drift, reconcile_facets, search_facets, total_facets,
};

mod search_targets;
pub use search_targets::{match_targets, search_targets};

mod search_suggestions;
pub use search_suggestions::{autocomplete, spellcheck};

pub mod search_filters;
pub mod search_report;
