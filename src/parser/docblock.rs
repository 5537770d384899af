//! Docblock collaborator: structured tags out of `/** .. */` comments, and
//! the mapping from PHP type text (docblock or signature hint) into the
//! core type algebra.

use crate::model::fqn::Fqn;
use crate::model::types::Type;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocblockTags {
    /// `@return T`
    pub return_type: Option<String>,
    /// `@var T`
    pub var_type: Option<String>,
    /// `@param T $name` — keyed by name without the `$` sigil.
    pub params: HashMap<String, String>,
}

/// Extract the tags the semantic core consumes. Unknown tags are ignored.
pub fn parse(comment: &str) -> DocblockTags {
    let mut tags = DocblockTags::default();
    for raw_line in comment.lines() {
        let line = raw_line
            .trim()
            .trim_start_matches("/**")
            .trim_start_matches('*')
            .trim_end_matches("*/")
            .trim();
        if let Some(rest) = line.strip_prefix("@return") {
            if let Some(ty) = rest.split_whitespace().next() {
                tags.return_type = Some(ty.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("@var") {
            if let Some(ty) = rest.split_whitespace().next() {
                tags.var_type = Some(ty.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("@param") {
            let mut words = rest.split_whitespace();
            let ty = words.next();
            let name = words.next();
            if let (Some(ty), Some(name)) = (ty, name) {
                if let Some(var) = name.strip_prefix('$') {
                    tags.params.insert(var.to_string(), ty.to_string());
                }
            }
        }
    }
    tags
}

/// Map PHP type text into the algebra. Unions split on `|`, `?T` adds
/// `null`, `T[]` is an integer-keyed array. Class names resolve through the
/// file's namespace context; anything unrecognized widens to `mixed`.
pub fn type_from_text(
    text: &str,
    namespace: Option<&str>,
    uses: &HashMap<String, String>,
) -> Type {
    let text = text.trim();
    if text.is_empty() {
        return Type::Mixed;
    }
    if text.contains('|') {
        return Type::compound(
            text.split('|')
                .map(|part| type_from_text(part, namespace, uses)),
        );
    }
    if let Some(inner) = text.strip_prefix('?') {
        return Type::compound([type_from_text(inner, namespace, uses), Type::Null]);
    }
    if let Some(element) = text.strip_suffix("[]") {
        return Type::array(type_from_text(element, namespace, uses), Type::Integer);
    }
    if let Some(args) = text
        .strip_prefix("array<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        let parts: Vec<&str> = args.splitn(2, ',').collect();
        return match parts.as_slice() {
            [value] => Type::array(type_from_text(value, namespace, uses), Type::Integer),
            [key, value] => Type::array(
                type_from_text(value, namespace, uses),
                type_from_text(key, namespace, uses),
            ),
            _ => Type::array(Type::Mixed, Type::Mixed),
        };
    }
    match text {
        "int" | "integer" => Type::Integer,
        "float" | "double" => Type::Float,
        "string" => Type::String,
        "bool" | "boolean" | "true" | "false" => Type::Boolean,
        "null" => Type::Null,
        "void" => Type::Void,
        "mixed" => Type::Mixed,
        "callable" | "Closure" | "\\Closure" => Type::Callable,
        "array" | "iterable" => Type::array(Type::Mixed, Type::Mixed),
        "object" => Type::Object(None),
        // `self`/`static`/`$this` need a class context the docblock parser
        // does not carry.
        "self" | "static" | "$this" => Type::Mixed,
        class_name => match crate::naming::resolve_in_context(class_name, namespace, uses) {
            Some(resolved) => Type::object(Fqn::from_qualified(&resolved)),
            None => Type::Mixed,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_return_var_and_params() {
        let tags = parse(
            "/**\n * Does things.\n * @param string $name\n * @param int $count\n * @return Foo\n */",
        );
        assert_eq!(tags.return_type.as_deref(), Some("Foo"));
        assert_eq!(tags.params.get("name").map(String::as_str), Some("string"));
        assert_eq!(tags.params.get("count").map(String::as_str), Some("int"));
    }

    #[test]
    fn single_line_var_tag() {
        let tags = parse("/** @var string|null */");
        assert_eq!(tags.var_type.as_deref(), Some("string|null"));
    }

    #[test]
    fn maps_scalars_unions_and_arrays() {
        let uses = HashMap::new();
        assert_eq!(type_from_text("int", None, &uses), Type::Integer);
        assert_eq!(
            type_from_text("int|string", None, &uses),
            Type::compound([Type::Integer, Type::String])
        );
        assert_eq!(
            type_from_text("?string", None, &uses),
            Type::compound([Type::String, Type::Null])
        );
        assert_eq!(
            type_from_text("Foo[]", Some("App"), &uses),
            Type::array(
                Type::object(Fqn::in_namespace(Some("App"), "Foo")),
                Type::Integer
            )
        );
    }

    #[test]
    fn resolves_class_names_through_use_map() {
        let mut uses = HashMap::new();
        uses.insert("Bar".to_string(), "Vendor\\Lib\\Bar".to_string());
        assert_eq!(
            type_from_text("Bar", Some("App"), &uses),
            Type::object(Fqn::from_qualified("Vendor\\Lib\\Bar"))
        );
        assert_eq!(
            type_from_text("\\Other\\Baz", Some("App"), &uses),
            Type::object(Fqn::from_qualified("Other\\Baz"))
        );
    }
}
