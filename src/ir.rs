// Generated declarations. Types are already projected to text here; nothing
// in this module knows about the source side.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct TargetFile {
    pub path: PathBuf,
    pub interfaces: Vec<InterfaceDecl>, // emission order (pre-order walk)
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub exported: bool,
    pub properties: Vec<PropertySig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySig {
    pub name: String,        // as written in the source, quotes included
    pub optional: bool,
    pub readonly: bool,
    pub ty: String,
    pub docs: Vec<DocBlock>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocBlock {
    pub description: String, // may span several lines
    pub tags: Vec<String>,   // tag names without the leading `@`
}

impl TargetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            interfaces: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends an exported interface with no properties and returns its index.
    pub fn add_interface(&mut self, name: impl Into<String>) -> usize {
        self.interfaces.push(InterfaceDecl {
            name: name.into(),
            exported: true,
            properties: Vec::new(),
        });
        self.interfaces.len() - 1
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn interface_names(&self) -> Vec<&str> {
        self.interfaces.iter().map(|i| i.name.as_str()).collect()
    }
}

impl InterfaceDecl {
    pub fn property(&self, name: &str) -> Option<&PropertySig> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl DocBlock {
    pub fn text(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            tags: Vec::new(),
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            description: String::new(),
            tags: vec![tag.into()],
        }
    }
}
