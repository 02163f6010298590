//! Product query and mutation rules that do not depend on a store.

pub mod filter;
pub mod pagination;
pub mod validation;
