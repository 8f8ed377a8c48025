//! Search operations, grouped by the view they serve.

pub mod diagrams;
pub mod entities;
pub mod icons;
pub mod search;
