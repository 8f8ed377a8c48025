//! Index access: the engine boundary, its Solr adapter and record codecs.

pub mod index_fields;
pub mod occurrence_codec;
pub mod search_engine;
pub mod solr_utils;
