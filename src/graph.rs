//! Project-level symbol graph.
//!
//! Two maps: FQN -> owning definition (last writer wins, exactly one owner
//! at any instant) and FQN -> referring document URIs (set semantics).
//! The graph never owns AST nodes; it holds URIs and symbol descriptors,
//! and queries follow graph -> URI -> document -> node.

use crate::document::Document;
use crate::model::fqn::Fqn;
use crate::model::symbol::Definition;
use std::collections::{HashMap, HashSet};
use tower_lsp::lsp_types::Url;

#[derive(Debug, Default, Clone)]
pub struct SymbolGraph {
    definitions: HashMap<Fqn, Definition>,
    referrers: HashMap<Fqn, HashSet<Url>>,
}

impl SymbolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last writer wins; a previous definition under the same FQN is
    /// replaced regardless of owner.
    pub fn set_definition(&mut self, fqn: Fqn, definition: Definition) {
        self.definitions.insert(fqn, definition);
    }

    /// Removes the definition and the referrer set filed under `fqn`.
    pub fn remove_definition(&mut self, fqn: &Fqn) {
        self.definitions.remove(fqn);
        self.referrers.remove(fqn);
    }

    /// No-op when already present.
    pub fn add_referrer(&mut self, fqn: Fqn, uri: Url) {
        self.referrers.entry(fqn).or_default().insert(uri);
    }

    /// No-op when absent.
    pub fn remove_referrer(&mut self, fqn: &Fqn, uri: &Url) {
        if let Some(set) = self.referrers.get_mut(fqn) {
            set.remove(uri);
            if set.is_empty() {
                self.referrers.remove(fqn);
            }
        }
    }

    pub fn is_defined(&self, fqn: &Fqn) -> bool {
        self.definitions.contains_key(fqn)
    }

    pub fn definition(&self, fqn: &Fqn) -> Option<&Definition> {
        self.definitions.get(fqn)
    }

    pub fn owner_of(&self, fqn: &Fqn) -> Option<&Url> {
        self.definitions.get(fqn).map(|d| d.uri())
    }

    pub fn referrers(&self, fqn: &Fqn) -> impl Iterator<Item = &Url> {
        self.referrers.get(fqn).into_iter().flatten()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Publish a document build, diffing against the previously published
    /// build of the same URI. Old entries are retired before new ones land,
    /// so observers under the same lock never see a mix.
    pub fn apply_document(&mut self, previous: Option<&Document>, next: &Document) {
        if let Some(previous) = previous {
            for fqn in previous.definitions.keys() {
                if !next.definitions.contains_key(fqn) {
                    self.remove_definition(fqn);
                }
            }
            for fqn in &previous.references {
                if !next.references.contains(fqn) {
                    self.remove_referrer(fqn, &previous.uri);
                }
            }
        }
        for (fqn, definition) in &next.definitions {
            self.set_definition(fqn.clone(), definition.clone());
        }
        for fqn in &next.references {
            self.add_referrer(fqn.clone(), next.uri.clone());
        }
    }

    /// Retire a closed document: its definitions leave the graph and its
    /// URI leaves every referrer set.
    pub fn remove_document(&mut self, document: &Document) {
        for fqn in document.definitions.keys() {
            if self.owner_of(fqn) == Some(&document.uri) {
                self.remove_definition(fqn);
            }
        }
        for fqn in &document.references {
            self.remove_referrer(fqn, &document.uri);
        }
        // The local maps are authoritative for what this document published,
        // but a sweep keeps invariant 2 honest even if an entry was
        // overwritten in between.
        self.referrers.retain(|_, uris| {
            uris.remove(&document.uri);
            !uris.is_empty()
        });
    }
}
