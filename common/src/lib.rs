//! Common library exports shared between the search backend and its callers.

extern crate serde;


pub mod search_query;
pub mod search_result;
pub mod target_result;
pub mod diagram_result;
pub mod search_const;
