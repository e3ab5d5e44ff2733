//! File-backed stores for the service layer.

pub mod json_vec_store;
