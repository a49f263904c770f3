//! Build instructions: which classes go into which output file.
//!
//! ```json
//! [
//!   {
//!     "targetFile": "src/imports/datadog.d.ts",
//!     "sourceTypes": [
//!       { "file": "node_modules/client/dist/models/Dashboard.d.ts", "type": "Dashboard" }
//!     ]
//!   }
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path_de::from_str_with_path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInstruction {
    /// Output declaration file, overwritten on every run.
    pub target_file: PathBuf,
    /// Seed classes, converted in order.
    pub source_types: Vec<SeedClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedClass {
    pub file: PathBuf,
    #[serde(rename = "type")]
    pub class: String,
}

pub fn load_instructions(path: &Path) -> Result<Vec<BuildInstruction>> {
    let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_instructions(path, &source)
}

/// `path` only labels errors.
pub fn parse_instructions(path: &Path, source: &str) -> Result<Vec<BuildInstruction>> {
    from_str_with_path(source).map_err(|message| Error::Instructions {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_instructions() {
        let source = r#"[
            {
                "targetFile": "out/datadog.d.ts",
                "sourceTypes": [
                    { "file": "models/Dashboard.d.ts", "type": "Dashboard" },
                    { "file": "models/Monitor.d.ts", "type": "Monitor" }
                ]
            },
            { "targetFile": "out/empty.d.ts", "sourceTypes": [] }
        ]"#;
        let instructions = parse_instructions(Path::new("build.json"), source).unwrap();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].target_file, PathBuf::from("out/datadog.d.ts"));
        assert_eq!(
            instructions[0].source_types[1],
            SeedClass {
                file: PathBuf::from("models/Monitor.d.ts"),
                class: "Monitor".into(),
            }
        );
        assert!(instructions[1].source_types.is_empty());
    }

    #[test]
    fn malformed_instructions_name_the_offending_field() {
        let source = r#"[{ "targetFile": "out.d.ts", "sourceTypes": [{ "file": "a.d.ts" }] }]"#;
        match parse_instructions(Path::new("build.json"), source) {
            Err(Error::Instructions { path, message }) => {
                assert_eq!(path, PathBuf::from("build.json"));
                assert!(message.contains("[0].sourceTypes[0]"), "{message}");
                assert!(message.contains("type"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_instruction_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_instructions(&dir.path().join("missing.json")),
            Err(Error::Io { .. })
        ));
    }
}
