//! Parser collaborator: tolerant PHP parsing into the arena AST.
//!
//! tree-sitter produces the concrete tree; [`lower`] turns it into
//! [`crate::model::ast::Ast`] and collects diagnostics for ERROR/MISSING
//! regions instead of failing. A partial tree is always usable.

pub mod docblock;
mod lower;

use crate::error::{PhpscopeError, Result};
use crate::model::ast::{Ast, Span};

/// A parse problem to surface to the client. Never aborts indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
}

pub struct ParseResult {
    pub ast: Ast,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct PhpParser {
    language: tree_sitter::Language,
}

impl Default for PhpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PhpParser {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_php::LANGUAGE_PHP.into(),
        }
    }

    pub fn parse(&self, source: &str) -> Result<ParseResult> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| PhpscopeError::Parse(e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| PhpscopeError::Parse("parser returned no tree".to_string()))?;

        let (ast, diagnostics) = lower::lower(&tree, source);
        Ok(ParseResult { ast, diagnostics })
    }
}
