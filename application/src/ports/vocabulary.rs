//! Role/domain vocabulary port
//!
//! Judges return free text. Before a role or domain reaches the merged triage
//! recommendation it is canonicalized and matched against the fixed
//! vocabulary owned by an adapter.

/// Which vocabulary a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyKind {
    Role,
    Domain,
}

/// Validates and corrects role/domain names.
pub trait Vocabulary: Send + Sync {
    /// Normalize spelling (case, separators, known aliases).
    fn canonicalize(&self, name: &str) -> String;

    /// Closest valid name whose similarity clears `threshold`, if any.
    fn closest_match(&self, name: &str, kind: VocabularyKind, threshold: f64) -> Option<String>;
}
