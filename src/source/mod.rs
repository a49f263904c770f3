//! Loading and resolving TypeScript declaration files.

pub mod builtins;
pub mod decl;
pub mod parser;
pub mod project;
pub mod types;

pub use builtins::Builtins;
pub use decl::{Keyword, Literal, PropertyDecl, ShapeDecl, TypeExpr};
pub use project::{SourceFile, SourceProject};
pub use types::{ObjectRef, Origin, SourceType};
