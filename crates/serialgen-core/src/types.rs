//! Heuristic classification of declared C++ field types.
//!
//! Classification works on identifier tokens of the declared type rather than
//! on a type system: `unsigned long` is primitive because it contains the token
//! `unsigned`, `std::string` is string-like because one of its tokens contains
//! `string`. Anything else that is not optional-wrapped is a nested object that
//! is expected to carry its own generated `Serialize`/`Deserialize`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Primitive keyword tokens, including the `StandardDefines.h` aliases.
///
/// A type is primitive when one of its identifier tokens equals an entry here.
/// Substrings do not count, so `Point` does not match `int`.
const PRIMITIVE_TOKENS: &[&str] = &[
    "int", "Int", "CInt", "long", "Long", "CLong", "float", "Float", "CFloat", "double", "Double",
    "CDouble", "bool", "Bool", "CBool", "char", "Char", "CChar", "unsigned", "signed", "UInt",
    "CUInt", "ULong", "CULong", "UInt8", "UChar", "CUChar", "short", "Short", "CShort", "Size",
    "CSize", "size_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t",
    "uint32_t", "uint64_t",
];

#[allow(clippy::unwrap_used)] // Safe: constant pattern
static OPTIONAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\boptional\s*<(.+)>").unwrap()
});

#[allow(clippy::unwrap_used)] // Safe: constant pattern
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap()
});

/// Category of a declared field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeCategory {
    Primitive,
    StringLike,
    OptionalPrimitive,
    OptionalString,
    OptionalNestedObject,
    NestedObject,
}

impl TypeCategory {
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            TypeCategory::OptionalPrimitive
                | TypeCategory::OptionalString
                | TypeCategory::OptionalNestedObject
        )
    }
}

/// Result of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeClassification {
    pub category: TypeCategory,
    /// Inner type of an optional wrapper, trimmed.
    pub inner_type: Option<String>,
}

impl TypeClassification {
    pub fn is_optional(&self) -> bool {
        self.category.is_optional()
    }

    /// The type the value has once unwrapped: the inner type for optionals.
    pub fn value_type<'a>(&'a self, declared: &'a str) -> &'a str {
        self.inner_type.as_deref().unwrap_or_else(|| declared.trim())
    }
}

/// Classify a declared type string.
///
/// ```
/// use serialgen_core::types::{classify, TypeCategory};
///
/// let c = classify("optional<int>");
/// assert_eq!(c.category, TypeCategory::OptionalPrimitive);
/// assert_eq!(c.inner_type.as_deref(), Some("int"));
/// assert_eq!(classify("Foo").category, TypeCategory::NestedObject);
/// ```
pub fn classify(declared_type: &str) -> TypeClassification {
    let trimmed = declared_type.trim();

    if let Some(inner) = optional_inner(trimmed) {
        let category = match classify_plain(&inner) {
            TypeCategory::StringLike => TypeCategory::OptionalString,
            TypeCategory::Primitive => TypeCategory::OptionalPrimitive,
            _ => TypeCategory::OptionalNestedObject,
        };
        return TypeClassification {
            category,
            inner_type: Some(inner),
        };
    }

    TypeClassification {
        category: classify_plain(trimmed),
        inner_type: None,
    }
}

/// Inner type of `optional<...>` / `std::optional<...>`, if the type is wrapped.
pub fn optional_inner(declared_type: &str) -> Option<String> {
    OPTIONAL_RE
        .captures(declared_type.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Non-optional classification: string tokens win over primitive tokens.
fn classify_plain(ty: &str) -> TypeCategory {
    let tokens: Vec<&str> = TOKEN_RE.find_iter(ty).map(|m| m.as_str()).collect();

    if tokens
        .iter()
        .any(|t| t.to_ascii_lowercase().contains("string"))
    {
        TypeCategory::StringLike
    } else if tokens.iter().any(|t| PRIMITIVE_TOKENS.contains(t)) {
        TypeCategory::Primitive
    } else {
        TypeCategory::NestedObject
    }
}

/// ArduinoJson accessor type used when reading a primitive back from a document.
pub fn primitive_accessor(inner_type: &str) -> String {
    let lower = inner_type.to_ascii_lowercase();
    let accessor = if lower.contains("bool") {
        "bool"
    } else if lower.contains("int") {
        "int"
    } else if lower.contains("float") {
        "float"
    } else if lower.contains("double") {
        "double"
    } else if lower.contains("char") {
        "char"
    } else {
        return inner_type.trim().to_string();
    };
    accessor.to_string()
}
