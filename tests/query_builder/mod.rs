//! Query Builder Tests Module
//!
//! Rendering and arithmetic of the query-state value and its parts.

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod pagination;
