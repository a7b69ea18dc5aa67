//! In-memory rule retrieval.
//!
//! The index is rebuilt from scratch on every process run: embed the rule
//! corpus, L2-normalise, add to a brute-force inner-product index, then
//! answer top-k queries against it.

pub mod index;
pub mod retriever;
pub mod rules;

pub use index::{FlatIpIndex, normalize_l2};
pub use retriever::RuleRetriever;
