//! Fixed role/domain taxonomy with fuzzy correction.

use planner_application::ports::vocabulary::{Vocabulary, VocabularyKind};
use std::collections::HashMap;

/// Built-in agent roles
pub const DEFAULT_ROLES: &[&str] = &[
    "architect",
    "backend_engineer",
    "frontend_engineer",
    "devops_engineer",
    "security_engineer",
    "qa_engineer",
    "data_engineer",
    "technical_writer",
    "product_manager",
    "site_reliability_engineer",
];

/// Built-in work domains
pub const DEFAULT_DOMAINS: &[&str] = &[
    "general",
    "backend",
    "frontend",
    "infrastructure",
    "security",
    "data",
    "documentation",
    "testing",
    "mobile",
    "machine_learning",
];

/// Short forms judges commonly emit, mapped to their canonical name.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("qa", "qa_engineer"),
    ("sre", "site_reliability_engineer"),
    ("pm", "product_manager"),
    ("docs", "documentation"),
    ("infra", "infrastructure"),
    ("ml", "machine_learning"),
];

/// Vocabulary backed by in-memory role and domain lists.
///
/// Names are compared after [`canonicalize`](Vocabulary::canonicalize), so
/// `"Backend Engineer"`, `"backend-engineer"` and `"backend_engineer"` are the
/// same entry.
#[derive(Debug, Clone)]
pub struct StaticVocabulary {
    roles: Vec<String>,
    domains: Vec<String>,
    aliases: HashMap<String, String>,
}

impl StaticVocabulary {
    pub fn new(
        roles: impl IntoIterator<Item = impl Into<String>>,
        domains: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            roles: normalize_all(roles),
            domains: normalize_all(domains),
            aliases: HashMap::new(),
        }
    }

    /// Add an alias; both sides are normalized.
    pub fn with_alias(mut self, alias: &str, canonical: &str) -> Self {
        self.aliases.insert(normalize(alias), normalize(canonical));
        self
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    fn entries(&self, kind: VocabularyKind) -> &[String] {
        match kind {
            VocabularyKind::Role => &self.roles,
            VocabularyKind::Domain => &self.domains,
        }
    }
}

impl Default for StaticVocabulary {
    fn default() -> Self {
        DEFAULT_ALIASES.iter().fold(
            Self::new(DEFAULT_ROLES.iter().copied(), DEFAULT_DOMAINS.iter().copied()),
            |vocabulary, (alias, canonical)| vocabulary.with_alias(alias, canonical),
        )
    }
}

impl Vocabulary for StaticVocabulary {
    fn canonicalize(&self, name: &str) -> String {
        let normalized = normalize(name);
        match self.aliases.get(&normalized) {
            Some(canonical) => canonical.clone(),
            None => normalized,
        }
    }

    fn closest_match(&self, name: &str, kind: VocabularyKind, threshold: f64) -> Option<String> {
        let candidate = self.canonicalize(name);
        if candidate.is_empty() {
            return None;
        }

        let entries = self.entries(kind);
        if entries.contains(&candidate) {
            return Some(candidate);
        }

        // Strictly greater keeps the earliest entry on ties.
        let mut best: Option<(&String, f64)> = None;
        for entry in entries {
            let score = similarity(&candidate, entry);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((entry, score));
            }
        }

        best.filter(|(_, score)| *score >= threshold)
            .map(|(entry, _)| entry.clone())
    }
}

fn normalize_all(names: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| {
            let name: String = name.into();
            normalize(&name)
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Lowercase, map spaces and hyphens to `_`, collapse repeats, trim edges.
fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        let c = match c {
            ' ' | '-' | '\t' => '_',
            other => other,
        };
        if c == '_' && (out.is_empty() || out.ends_with('_')) {
            continue;
        }
        out.extend(c.to_lowercase());
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Normalized edit similarity in [0, 1]: `1 - levenshtein / max_len`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
