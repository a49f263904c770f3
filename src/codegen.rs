//! Renders [`TargetFile`]s as TypeScript declaration source.

use std::fmt::Write as _;

use crate::ir::{DocBlock, InterfaceDecl, PropertySig, TargetFile};

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct Codegen {
    out: String,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interfaces in order, separated by a blank line. An empty file renders
    /// as the empty string.
    pub fn emit_file(&mut self, file: &TargetFile) {
        for (i, interface) in file.interfaces.iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.emit_interface(interface);
        }
    }

    pub fn emit_interface(&mut self, interface: &InterfaceDecl) {
        if interface.exported {
            self.out.push_str("export ");
        }
        let _ = writeln!(self.out, "interface {} {{", interface.name);
        for property in &interface.properties {
            self.emit_property(property);
        }
        self.out.push_str("}\n");
    }

    fn emit_property(&mut self, property: &PropertySig) {
        for doc in &property.docs {
            self.emit_doc(doc);
        }
        self.out.push_str(INDENT);
        if property.readonly {
            self.out.push_str("readonly ");
        }
        self.out.push_str(&property.name);
        if property.optional {
            self.out.push('?');
        }
        let _ = writeln!(self.out, ": {};", property.ty);
    }

    fn emit_doc(&mut self, doc: &DocBlock) {
        let lines: Vec<String> = doc
            .description
            .lines()
            .map(str::to_string)
            .chain(doc.tags.iter().map(|tag| format!("@{tag}")))
            .collect();
        if lines.is_empty() {
            return;
        }
        let _ = writeln!(self.out, "{INDENT}/**");
        for line in lines {
            if line.is_empty() {
                let _ = writeln!(self.out, "{INDENT} *");
            } else {
                let _ = writeln!(self.out, "{INDENT} * {line}");
            }
        }
        let _ = writeln!(self.out, "{INDENT} */");
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

pub fn render(file: &TargetFile) -> String {
    let mut cg = Codegen::new();
    cg.emit_file(file);
    cg.into_string()
}
