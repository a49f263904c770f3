//! Projects classes from TypeScript declaration files into structural,
//! read-only interfaces that a JSII-style binding generator accepts.
//!
//! A [`SourceProject`] loads and resolves the declarations, a list of
//! [`BuildInstruction`]s names the seed classes for each output file, and
//! [`export_interfaces`] walks every class reachable from the seeds, emitting
//! each one exactly once per [`ConversionSession`].

pub mod cli;
pub mod codegen;
pub mod error;
pub mod export;
pub mod instructions;
pub mod ir;
pub mod lower;
pub mod path_de;
pub mod primitive;
pub mod session;
pub mod source;
pub mod walker;

pub use error::{Error, Result};
pub use export::{ExportOptions, ExportReport, convert_instruction, export_interfaces};
pub use instructions::{BuildInstruction, SeedClass, load_instructions};
pub use session::{ConversionSession, SessionScope};
pub use source::{Builtins, SourceProject};
pub use walker::Converter;
