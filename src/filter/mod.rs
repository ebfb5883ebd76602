//! # Filter Descriptors
//!
//! Data-only description of a query: predicates, joins, ranges, date-part
//! filters, ordering, limits and eager-loaded relations.
//!
//! - [`predicate`] - column/operator/value triples and structured fragments
//! - [`descriptor`] - the optional-keyed [`FilterDescriptor`] bag
//! - [`parse`] - JSON ingestion with comma-string normalization

pub mod descriptor;
pub mod parse;
pub mod predicate;

pub use descriptor::{FilterDescriptor, JoinSpec, MembershipFragment, RelationSpec};
pub use parse::parse_predicates;
pub use predicate::{Between, OrderSpec, Predicate, SortDirection};
