//! Role/domain vocabulary adapter
//!
//! [`StaticVocabulary`] implements the
//! [`Vocabulary`](planner_application::Vocabulary) port over fixed name lists.

mod static_vocabulary;

pub use static_vocabulary::{DEFAULT_DOMAINS, DEFAULT_ROLES, StaticVocabulary, similarity};
