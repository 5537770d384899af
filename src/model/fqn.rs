//! Fully qualified names.
//!
//! The canonical forms are:
//!   - type / function / constant: `\Ns\Sub\Name`
//!   - method:                     `\Ns\Class::method()`
//!   - property / class constant:  `\Ns\Class::member`
//!   - static property:            `\Ns\Class::$member`
//!
//! Equality is byte-exact on the canonical string; matching is
//! case-sensitive and never trims.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fqn(String);

impl Fqn {
    /// Canonicalize a qualified name that may or may not carry the leading
    /// backslash: `Ns\Name` and `\Ns\Name` both become `\Ns\Name`.
    pub fn from_qualified(name: &str) -> Self {
        if let Some(stripped) = name.strip_prefix('\\') {
            Fqn(format!("\\{}", stripped))
        } else {
            Fqn(format!("\\{}", name))
        }
    }

    /// `\Ns\Name` from an optional namespace and a local identifier.
    pub fn in_namespace(namespace: Option<&str>, name: &str) -> Self {
        match namespace {
            Some(ns) if !ns.is_empty() => Fqn(format!("\\{}\\{}", ns, name)),
            _ => Fqn(format!("\\{}", name)),
        }
    }

    /// `\Class::method()`
    pub fn method(owner: &Fqn, name: &str) -> Self {
        Fqn(format!("{}::{}()", owner.0, name))
    }

    /// `\Class::member` — instance property or class constant.
    pub fn member(owner: &Fqn, name: &str) -> Self {
        Fqn(format!("{}::{}", owner.0, name))
    }

    /// `\Class::$member`
    pub fn static_property(owner: &Fqn, name: &str) -> Self {
        Fqn(format!("{}::${}", owner.0, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for plain (non-member) names: no `::` separator.
    pub fn is_plain(&self) -> bool {
        !self.0.contains("::")
    }

    /// The last segment without namespace qualification or member suffix.
    pub fn short_name(&self) -> &str {
        let tail = match self.0.rsplit_once("::") {
            Some((_, member)) => return member.trim_end_matches("()"),
            None => self.0.as_str(),
        };
        tail.rsplit('\\').next().unwrap_or(tail)
    }

    /// Strip every namespace segment, keeping only the bare name:
    /// `\App\Sub\strlen` becomes `\strlen`. Returns `None` when the name is
    /// not a plain name or is already global.
    pub fn global_fallback(&self) -> Option<Fqn> {
        if !self.is_plain() {
            return None;
        }
        let bare = self.0.trim_start_matches('\\');
        let short = bare.rsplit('\\').next().unwrap_or(bare);
        if short == bare {
            return None;
        }
        Some(Fqn(format!("\\{}", short)))
    }
}

impl fmt::Display for Fqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_forms() {
        let class = Fqn::in_namespace(Some("App\\Sub"), "Foo");
        assert_eq!(class.as_str(), "\\App\\Sub\\Foo");
        assert_eq!(Fqn::method(&class, "bar").as_str(), "\\App\\Sub\\Foo::bar()");
        assert_eq!(Fqn::member(&class, "bar").as_str(), "\\App\\Sub\\Foo::bar");
        assert_eq!(
            Fqn::static_property(&class, "bar").as_str(),
            "\\App\\Sub\\Foo::$bar"
        );
        assert_eq!(Fqn::in_namespace(None, "strlen").as_str(), "\\strlen");
    }

    #[test]
    fn from_qualified_normalizes_leading_backslash() {
        assert_eq!(
            Fqn::from_qualified("App\\Foo"),
            Fqn::from_qualified("\\App\\Foo")
        );
    }

    #[test]
    fn global_fallback_strips_namespaces() {
        let namespaced = Fqn::in_namespace(Some("App"), "strlen");
        assert_eq!(namespaced.global_fallback().unwrap().as_str(), "\\strlen");
        assert!(Fqn::in_namespace(None, "strlen").global_fallback().is_none());
        let method = Fqn::method(&Fqn::in_namespace(Some("App"), "Thing"), "run");
        assert!(method.global_fallback().is_none());
    }

    #[test]
    fn short_name_handles_members() {
        let class = Fqn::in_namespace(Some("App"), "Foo");
        assert_eq!(Fqn::method(&class, "bar").short_name(), "bar");
        assert_eq!(class.short_name(), "Foo");
    }
}
