// Resolved source types: the closed set of shapes the projector dispatches on.

use std::fmt;
use std::path::PathBuf;

use super::decl::{Keyword, Literal};

#[derive(Debug, Clone, PartialEq)]
pub enum SourceType {
    Intrinsic(Keyword),
    Literal(Literal),
    Union(Vec<SourceType>),
    Array(Box<SourceType>),
    Tuple(Vec<SourceType>),
    ObjectRef(ObjectRef),
    /// Anything the resolver could not map onto the shapes above.
    Unsupported(String),
}

/// A named reference to an object type and where it was declared.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRef {
    /// Declared name, the name a generated interface would carry.
    pub name: String,
    /// Reference as written at the use site, type arguments included.
    pub text: String,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    /// Host runtime type, passed through as written.
    BuiltIn,
    /// Class or interface declared in a loaded source file.
    Declared(PathBuf),
    /// No declaration could be found.
    Unresolved,
}

impl SourceType {
    pub fn is_undefined(&self) -> bool {
        matches!(self, SourceType::Intrinsic(Keyword::Undefined))
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Intrinsic(keyword) => f.write_str(keyword.as_str()),
            SourceType::Literal(literal) => write!(f, "{literal}"),
            SourceType::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            SourceType::Array(element) => match element.as_ref() {
                SourceType::Union(_) => write!(f, "({element})[]"),
                _ => write!(f, "{element}[]"),
            },
            SourceType::Tuple(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            SourceType::ObjectRef(object) => f.write_str(&object.text),
            SourceType::Unsupported(text) => f.write_str(text),
        }
    }
}
