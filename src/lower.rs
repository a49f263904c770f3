//! Projection of resolved source types into target type text.
//!
//! Every [`SourceType`] maps onto the vocabulary a JSII-style consumer
//! accepts: primitives, unions, arrays and bare interface names. Class
//! references are expanded into interfaces of their own through the walker as
//! a side effect.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::primitive::is_primitive;
use crate::source::{ObjectRef, Origin, SourceType};
use crate::walker::Converter;

static BARE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").expect("valid identifier pattern"));

impl Converter<'_> {
    /// Projects `ty` to target text. `optional` is the optionality of the
    /// owning property; it drops `undefined` from unions at every depth.
    pub fn project(&mut self, ty: &SourceType, optional: bool) -> Result<String> {
        if is_primitive(ty) {
            return Ok(ty.to_string());
        }
        match ty {
            SourceType::Union(members) => self.project_union(members, optional),
            SourceType::Array(element) => self.project_array(element, optional),
            SourceType::Tuple(elements) => self.project_tuple(elements, optional),
            SourceType::ObjectRef(object) => self.project_object(object),
            SourceType::Intrinsic(_) | SourceType::Literal(_) | SourceType::Unsupported(_) => {
                warn!(ty = %ty, "unhandled type, passing it through as written");
                Ok(ty.to_string())
            }
        }
    }

    fn project_union(&mut self, members: &[SourceType], optional: bool) -> Result<String> {
        let mut projected = Vec::with_capacity(members.len());
        let mut has_undefined = false;
        for member in members {
            if member.is_undefined() {
                has_undefined = true;
                continue;
            }
            // unresolved references project to undefined too
            let text = self.project(member, optional)?;
            if text == "undefined" {
                has_undefined = true;
            } else {
                projected.push(text);
            }
        }
        if (has_undefined && !optional) || projected.is_empty() {
            projected.push("undefined".to_string());
        }
        Ok(projected.join(" | "))
    }

    fn project_array(&mut self, element: &SourceType, optional: bool) -> Result<String> {
        let projected = self.project(element, optional)?;
        if is_primitive(element) || BARE_IDENTIFIER.is_match(&projected) {
            Ok(format!("{projected}[]"))
        } else {
            Ok(format!("Array<{projected}>"))
        }
    }

    /// Tuples are not representable; they widen to an array over the union of
    /// their slot types, losing arity and position.
    fn project_tuple(&mut self, elements: &[SourceType], optional: bool) -> Result<String> {
        if elements.is_empty() {
            return Ok("Array<undefined>".to_string());
        }
        let mut projected = Vec::with_capacity(elements.len());
        for element in elements {
            projected.push(self.project(element, optional)?);
        }
        Ok(format!("Array<{}>", projected.join(" | ")))
    }

    fn project_object(&mut self, object: &ObjectRef) -> Result<String> {
        match &object.origin {
            Origin::BuiltIn => {
                debug!(ty = %object.text, "built-in type");
                Ok(object.text.clone())
            }
            Origin::Declared(file) => {
                self.convert_class(file, &object.name)?;
                Ok(object.name.clone())
            }
            Origin::Unresolved => {
                warn!(ty = %object.text, "could not find a declaration, emitting undefined");
                Ok("undefined".to_string())
            }
        }
    }
}
