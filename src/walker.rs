//! Class to interface conversion.

use std::path::Path;

use tracing::{debug, debug_span, info};

use crate::error::Result;
use crate::ir::{DocBlock, PropertySig, TargetFile};
use crate::session::ConversionSession;
use crate::source::{PropertyDecl, SourceProject};

/// Static member generated clients use for their serializer metadata.
const ATTRIBUTE_TYPE_MAP: &str = "attributeTypeMap";
/// Unparsed-payload holder that is kept but marked internal.
const DATA_PROPERTY: &str = "_data";

/// Walks a class graph, appending one interface per newly visited class to
/// the target file.
pub struct Converter<'a> {
    project: &'a SourceProject,
    session: &'a mut ConversionSession,
    target: &'a mut TargetFile,
}

impl<'a> Converter<'a> {
    pub fn new(
        project: &'a SourceProject,
        session: &'a mut ConversionSession,
        target: &'a mut TargetFile,
    ) -> Self {
        Self {
            project,
            session,
            target,
        }
    }

    /// Converts `class` from `file` into an interface, recursing into every
    /// class its properties reference. A class already in the session is a
    /// no-op. A missing file or class is an error.
    pub fn convert_class(&mut self, file: &Path, class: &str) -> Result<()> {
        if !self.session.mark(class) {
            debug!(class, "already converted");
            return Ok(());
        }

        let project = self.project;
        let source = project.file(file)?;
        let shape = source.class(class)?;
        info!(class, kind = ?shape.kind, file = %file.display(), "exporting interface");

        // appended before the properties are projected so nested interfaces
        // land after their first referrer
        let index = self.target.add_interface(class);

        for property in shape.properties.iter().filter(|p| is_exported_property(p)) {
            let _span = debug_span!("property", class, property = %property.name).entered();
            let resolved = project.resolve_type(source, &property.ty);
            debug!(ty = %resolved, "projecting");
            let ty = self.project(&resolved, property.optional)?;

            let mut docs: Vec<DocBlock> = property.docs.iter().map(DocBlock::text).collect();
            if property.name == DATA_PROPERTY {
                docs.push(DocBlock::tag("internal"));
            }
            self.target.interfaces[index].properties.push(PropertySig {
                name: property.name.clone(),
                optional: property.optional,
                readonly: true,
                ty,
                docs,
            });
        }
        Ok(())
    }
}

fn is_exported_property(property: &PropertyDecl) -> bool {
    property.name != ATTRIBUTE_TYPE_MAP && !property.name.starts_with("\"_")
}
