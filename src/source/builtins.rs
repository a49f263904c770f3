//! Host built-in types.
//!
//! A reference that is not declared in any loaded user file is passed through
//! verbatim when its name is on the allow-list below (or on the extra names
//! supplied by the caller). Declarations that live in a TypeScript standard
//! library file (`typescript/lib/lib.*.d.ts`) count as built-in too, in case
//! those files were loaded along with the user's sources.

use std::path::Path;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Global types of the ECMAScript and DOM standard libraries that generated
/// API clients commonly reference.
pub const DEFAULT_BUILTINS: &[&str] = &[
    "Array",
    "ArrayBuffer",
    "ArrayLike",
    "BigInt",
    "Blob",
    "Boolean",
    "DataView",
    "Date",
    "Error",
    "Float32Array",
    "Float64Array",
    "Function",
    "Int8Array",
    "Int16Array",
    "Int32Array",
    "Iterable",
    "Map",
    "Number",
    "Object",
    "Partial",
    "Pick",
    "Promise",
    "PromiseLike",
    "Readonly",
    "ReadonlyArray",
    "ReadonlyMap",
    "ReadonlySet",
    "Record",
    "RegExp",
    "Required",
    "Set",
    "String",
    "Symbol",
    "Uint8Array",
    "Uint8ClampedArray",
    "Uint16Array",
    "Uint32Array",
    "URL",
    "WeakMap",
    "WeakSet",
];

static STANDARD_LIBRARY_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[/\\])typescript[/\\]lib[/\\]lib(\.[\w.-]+)?\.d\.ts$")
        .expect("valid standard library pattern")
});

/// Known built-in type names.
#[derive(Debug, Clone)]
pub struct Builtins {
    names: IndexSet<String>,
}

impl Default for Builtins {
    fn default() -> Self {
        Self {
            names: DEFAULT_BUILTINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Builtins {
    pub fn with_extra<I>(extra: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut builtins = Self::default();
        builtins.names.extend(extra.into_iter().map(Into::into));
        builtins
    }

    /// Looks at the root of a possibly qualified name (`Intl.DateTimeFormat`).
    pub fn contains(&self, name: &str) -> bool {
        let root = name.split('.').next().unwrap_or(name);
        self.names.contains(name) || self.names.contains(root)
    }
}

pub fn is_standard_library_file(path: &Path) -> bool {
    STANDARD_LIBRARY_FILE.is_match(&path.to_string_lossy())
}
