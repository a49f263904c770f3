//! The loaded set of declaration files plus symbol and type resolution.

use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::builtins::{Builtins, is_standard_library_file};
use super::decl::{
    Declaration, EnumDecl, EnumMember, Import, ImportNames, Keyword, Module, ShapeDecl, TypeExpr,
};
use super::parser::parse_module;
use super::types::{ObjectRef, Origin, SourceType};
use crate::error::{Error, Result};

// re-export chains deeper than this are treated as unresolvable
const MAX_LOOKUP_DEPTH: usize = 16;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    module: Module,
}

#[derive(Debug, Default)]
pub struct SourceProject {
    files: IndexMap<PathBuf, SourceFile>,
    builtins: Builtins,
}

/// What a name resolves to.
enum Symbol<'p> {
    Declared(&'p SourceFile, &'p Declaration),
    EnumMember(&'p EnumDecl, &'p EnumMember),
}

// ————————————————————————————————————————————————————————————————————————————
// SOURCE FILE
// ————————————————————————————————————————————————————————————————————————————

impl SourceFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Finds a class (or interface) declaration by name.
    pub fn class(&self, name: &str) -> Result<&ShapeDecl> {
        match self.module.declaration(name) {
            Some(Declaration::Shape(shape)) => Ok(shape),
            _ => Err(Error::class_not_found(name, &self.path)),
        }
    }

    pub fn is_standard_library(&self) -> bool {
        is_standard_library_file(&self.path)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PROJECT
// ————————————————————————————————————————————————————————————————————————————

impl SourceProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins(builtins: Builtins) -> Self {
        Self {
            files: IndexMap::new(),
            builtins,
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Loads every file matched by a glob pattern (or literal path), then the
    /// files they import. Returns the number of files loaded.
    pub fn add_source_files_at_paths(&mut self, pattern: &str) -> Result<usize> {
        let before = self.files.len();
        for path in resolve_file_path_patterns([pattern])? {
            self.add_source_file(&path)?;
        }
        let dependencies = self.resolve_source_file_dependencies()?;
        let loaded = self.files.len() - before;
        info!(pattern, loaded, dependencies, "loaded declaration files");
        Ok(loaded)
    }

    pub fn add_source_file(&mut self, path: &Path) -> Result<()> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.add_source_text(path, &source)
    }

    /// Parses `source` and registers it under `path`, replacing any file
    /// already registered there.
    pub fn add_source_text(&mut self, path: impl AsRef<Path>, source: &str) -> Result<()> {
        let path = normalize_path(path.as_ref());
        let module = parse_module(source).map_err(|message| Error::Parse {
            path: path.clone(),
            message,
        })?;
        debug!(
            path = %path.display(),
            declarations = module.declarations.len(),
            "parsed declaration file"
        );
        self.files.insert(path.clone(), SourceFile { path, module });
        Ok(())
    }

    /// Loads relatively-imported files that exist on disk but were not part
    /// of the initial file set. Returns how many were added.
    pub fn resolve_source_file_dependencies(&mut self) -> Result<usize> {
        let mut added = 0;
        let mut cursor = 0;
        while let Some((_, file)) = self.files.get_index(cursor) {
            let missing: Vec<PathBuf> = file
                .module
                .imports
                .iter()
                .filter(|import| self.resolve_module(file, &import.specifier).is_none())
                .filter_map(|import| relative_module_base(file, &import.specifier))
                .filter_map(|base| {
                    module_candidates(&base)
                        .into_iter()
                        .find(|candidate| candidate.is_file())
                })
                .collect();
            for path in missing {
                if !self.files.contains_key(&normalize_path(&path)) {
                    self.add_source_file(&path)?;
                    added += 1;
                }
            }
            cursor += 1;
        }
        Ok(added)
    }

    /// Looks up a loaded file, failing loudly if it is absent.
    pub fn file(&self, path: &Path) -> Result<&SourceFile> {
        self.files
            .get(&normalize_path(path))
            .ok_or_else(|| Error::SourceFileNotFound {
                path: path.to_path_buf(),
            })
    }

    /// Resolves a type expression written in `file` into a [`SourceType`].
    pub fn resolve_type(&self, file: &SourceFile, expr: &TypeExpr) -> SourceType {
        Resolver {
            project: self,
            aliases: Vec::new(),
        }
        .resolve(file, expr)
    }

    fn resolve_module(&self, from: &SourceFile, specifier: &str) -> Option<&SourceFile> {
        let base = relative_module_base(from, specifier)?;
        module_candidates(&base)
            .into_iter()
            .find_map(|candidate| self.files.get(&candidate))
    }

    fn lookup<'p>(&'p self, file: &'p SourceFile, name: &str, depth: usize) -> Option<Symbol<'p>> {
        if depth > MAX_LOOKUP_DEPTH {
            return None;
        }
        if let Some((head, tail)) = name.split_once('.') {
            let namespace = file.module.imports.iter().find_map(|import| match &import.names {
                ImportNames::Namespace(local) if !import.is_reexport && local == head => {
                    self.resolve_module(file, &import.specifier)
                }
                _ => None,
            });
            if let Some(target) = namespace {
                return self.lookup_export(target, tail, depth + 1);
            }
            return match self.lookup(file, head, depth + 1)? {
                Symbol::Declared(_, Declaration::Enum(e)) => e
                    .members
                    .iter()
                    .find(|member| member.name == tail)
                    .map(|member| Symbol::EnumMember(e, member)),
                _ => None,
            };
        }

        if let Some(declaration) = file.module.declaration(name) {
            return Some(Symbol::Declared(file, declaration));
        }
        for import in file.module.imports.iter().filter(|i| !i.is_reexport) {
            if let Some(found) = self.lookup_import(file, import, name, depth) {
                return Some(found);
            }
        }
        self.lookup_global(name)
    }

    fn lookup_import<'p>(
        &'p self,
        file: &'p SourceFile,
        import: &Import,
        name: &str,
        depth: usize,
    ) -> Option<Symbol<'p>> {
        let ImportNames::Named(bindings) = &import.names else {
            return None;
        };
        let binding = bindings.iter().find(|binding| binding.local == name)?;
        let target = self.resolve_module(file, &import.specifier)?;
        self.lookup_export(target, &binding.imported, depth + 1)
    }

    fn lookup_export<'p>(&'p self, file: &'p SourceFile, name: &str, depth: usize) -> Option<Symbol<'p>> {
        if depth > MAX_LOOKUP_DEPTH {
            return None;
        }
        if name.contains('.') {
            return self.lookup(file, name, depth + 1);
        }
        if let Some(declaration) = file.module.declaration(name) {
            return Some(Symbol::Declared(file, declaration));
        }
        for import in file.module.imports.iter().filter(|i| i.is_reexport) {
            let found = match &import.names {
                ImportNames::All => self
                    .resolve_module(file, &import.specifier)
                    .and_then(|target| self.lookup_export(target, name, depth + 1)),
                ImportNames::Named(_) => self.lookup_import(file, import, name, depth),
                ImportNames::Namespace(_) => None,
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Ambient declarations of the standard library files, if any are loaded.
    fn lookup_global(&self, name: &str) -> Option<Symbol<'_>> {
        self.files
            .values()
            .filter(|file| file.is_standard_library())
            .find_map(|file| {
                file.module
                    .declaration(name)
                    .map(|declaration| Symbol::Declared(file, declaration))
            })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE RESOLUTION
// ————————————————————————————————————————————————————————————————————————————

struct Resolver<'p> {
    project: &'p SourceProject,
    /// Aliases currently being expanded, for cycle detection.
    aliases: Vec<(PathBuf, String)>,
}

impl<'p> Resolver<'p> {
    fn resolve(&mut self, file: &'p SourceFile, expr: &TypeExpr) -> SourceType {
        match expr {
            TypeExpr::Keyword(keyword) => SourceType::Intrinsic(*keyword),
            TypeExpr::Literal(literal) => SourceType::Literal(literal.clone()),
            TypeExpr::Union(members) => {
                let mut resolved = Vec::with_capacity(members.len());
                for member in members {
                    match self.resolve(file, member) {
                        SourceType::Union(inner) => resolved.extend(inner),
                        other => resolved.push(other),
                    }
                }
                SourceType::Union(resolved)
            }
            TypeExpr::Array(element) => SourceType::Array(Box::new(self.resolve(file, element))),
            TypeExpr::Tuple(elements) => {
                SourceType::Tuple(elements.iter().map(|e| self.resolve(file, e)).collect())
            }
            TypeExpr::Reference { name, .. } => self.resolve_reference(file, name, expr),
            TypeExpr::TypeOf(name) => self.resolve_typeof(file, name, expr),
            TypeExpr::Raw(text) => SourceType::Unsupported(text.clone()),
        }
    }

    fn resolve_reference(&mut self, file: &'p SourceFile, name: &str, expr: &TypeExpr) -> SourceType {
        let text = expr.to_string();
        match self.project.lookup(file, name, 0) {
            Some(Symbol::Declared(declared_in, declaration)) if declared_in.is_standard_library() => {
                SourceType::ObjectRef(ObjectRef {
                    name: declaration.name().to_string(),
                    text,
                    origin: Origin::BuiltIn,
                })
            }
            Some(Symbol::Declared(declared_in, Declaration::Shape(shape))) => {
                SourceType::ObjectRef(ObjectRef {
                    name: shape.name.clone(),
                    text,
                    origin: Origin::Declared(declared_in.path.clone()),
                })
            }
            Some(Symbol::Declared(declared_in, Declaration::Alias(alias))) => {
                let key = (declared_in.path.clone(), alias.name.clone());
                if self.aliases.contains(&key) {
                    warn!(alias = %alias.name, "cyclic type alias");
                    return SourceType::Unsupported(alias.name.clone());
                }
                self.aliases.push(key);
                let resolved = self.resolve(declared_in, &alias.ty);
                self.aliases.pop();
                resolved
            }
            Some(Symbol::Declared(_, Declaration::Enum(e))) => {
                let mut members: Vec<SourceType> = e
                    .members
                    .iter()
                    .map(|member| enum_member_type(e, member))
                    .collect();
                match members.len() {
                    1 => members.remove(0),
                    _ => SourceType::Union(members),
                }
            }
            Some(Symbol::EnumMember(e, member)) => enum_member_type(e, member),
            Some(Symbol::Declared(_, Declaration::Const(_))) => SourceType::Unsupported(text),
            None if self.project.builtins.contains(name) => SourceType::ObjectRef(ObjectRef {
                name: name.to_string(),
                text,
                origin: Origin::BuiltIn,
            }),
            None => {
                debug!(name, file = %file.path.display(), "no declaration found");
                SourceType::ObjectRef(ObjectRef {
                    name: name.to_string(),
                    text,
                    origin: Origin::Unresolved,
                })
            }
        }
    }

    fn resolve_typeof(&mut self, file: &'p SourceFile, name: &str, expr: &TypeExpr) -> SourceType {
        match self.project.lookup(file, name, 0) {
            Some(Symbol::Declared(declared_in, Declaration::Const(constant))) => {
                match (&constant.ty, &constant.value) {
                    (Some(ty), _) => self.resolve(declared_in, ty),
                    (None, Some(literal)) => SourceType::Literal(literal.clone()),
                    (None, None) => SourceType::Intrinsic(Keyword::Any),
                }
            }
            Some(Symbol::EnumMember(e, member)) => enum_member_type(e, member),
            _ => SourceType::Unsupported(expr.to_string()),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Expands glob patterns; anything without glob characters is taken as a
/// literal path.
pub fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                return Err(Error::NoSourceFiles {
                    pattern: pattern.to_string(),
                });
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

/// Lexically normalizes a path: drops `.` and folds `..` where possible.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// computed members keep their qualified name
fn enum_member_type(e: &EnumDecl, member: &EnumMember) -> SourceType {
    match &member.value {
        Some(literal) => SourceType::Literal(literal.clone()),
        None => SourceType::Unsupported(format!("{}.{}", e.name, member.name)),
    }
}

fn relative_module_base(from: &SourceFile, specifier: &str) -> Option<PathBuf> {
    if !specifier.starts_with('.') {
        return None;
    }
    let dir = from.path.parent().unwrap_or_else(|| Path::new(""));
    Some(normalize_path(&dir.join(specifier)))
}

fn module_candidates(base: &Path) -> Vec<PathBuf> {
    let literal = base.to_string_lossy();
    let stem = literal.strip_suffix(".js").unwrap_or(&literal);
    vec![
        PathBuf::from(format!("{stem}.d.ts")),
        PathBuf::from(format!("{stem}.ts")),
        PathBuf::from(literal.as_ref()),
        Path::new(stem).join("index.d.ts"),
        Path::new(stem).join("index.ts"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::decl::Literal;

    fn project(files: &[(&str, &str)]) -> SourceProject {
        let mut project = SourceProject::new();
        for (path, source) in files {
            project.add_source_text(path, source).unwrap();
        }
        project
    }

    fn property_type(project: &SourceProject, file: &str, class: &str, property: &str) -> SourceType {
        let file = project.file(Path::new(file)).unwrap();
        let class = file.class(class).unwrap();
        let property = class
            .properties
            .iter()
            .find(|p| p.name == property)
            .unwrap();
        project.resolve_type(file, &property.ty)
    }

    fn string(s: &str) -> SourceType {
        SourceType::Literal(Literal::String(s.into()))
    }

    #[test]
    fn resolves_imported_classes_to_their_declaring_file() {
        let project = project(&[
            (
                "models/Dashboard.d.ts",
                "import { Widget } from './Widget';\nexport declare class Dashboard {\n    \"widgets\": Array<Widget>;\n}",
            ),
            ("models/Widget.d.ts", "export declare class Widget {\n    \"id\": string;\n}"),
        ]);
        let ty = property_type(&project, "models/Dashboard.d.ts", "Dashboard", "\"widgets\"");
        assert_eq!(
            ty,
            SourceType::Array(Box::new(SourceType::ObjectRef(ObjectRef {
                name: "Widget".into(),
                text: "Widget".into(),
                origin: Origin::Declared(PathBuf::from("models/Widget.d.ts")),
            })))
        );
    }

    #[test]
    fn expands_aliases_of_typeof_constants() {
        let project = project(&[
            (
                "models/Dashboard.d.ts",
                "import { DashboardLayoutType } from \"./DashboardLayoutType\";\nexport declare class Dashboard {\n    \"layoutType\"?: DashboardLayoutType | undefined;\n}",
            ),
            (
                "models/DashboardLayoutType.d.ts",
                "import { UnparsedObject } from \"../util\";\nexport declare const ORDERED = \"ordered\";\nexport declare const FREE = \"free\";\nexport declare type DashboardLayoutType = typeof ORDERED | typeof FREE | UnparsedObject;",
            ),
            ("util.d.ts", "export declare class UnparsedObject {\n    _data: any;\n}"),
        ]);
        let ty = property_type(&project, "models/Dashboard.d.ts", "Dashboard", "\"layoutType\"");
        assert_eq!(
            ty,
            SourceType::Union(vec![
                string("ordered"),
                string("free"),
                SourceType::ObjectRef(ObjectRef {
                    name: "UnparsedObject".into(),
                    text: "UnparsedObject".into(),
                    origin: Origin::Declared(PathBuf::from("util.d.ts")),
                }),
                SourceType::Intrinsic(Keyword::Undefined),
            ])
        );
    }

    #[test]
    fn follows_reexports_and_namespaces() {
        let project = project(&[
            (
                "app.d.ts",
                "import { Widget as W } from './index';\nimport * as common from './common';\nexport declare class App {\n    main: W;\n    level: common.Level;\n    low: common.Level.Low;\n}",
            ),
            ("index.d.ts", "export * from './models';"),
            ("models/index.d.ts", "export { Widget } from './Widget.js';"),
            ("models/Widget.d.ts", "export declare class Widget {\n    id: string;\n}"),
            ("common.ts", "export declare enum Level { Low = 'low', High = 'high' }"),
        ]);
        match property_type(&project, "app.d.ts", "App", "main") {
            SourceType::ObjectRef(object) => {
                assert_eq!(object.name, "Widget");
                assert_eq!(object.text, "W");
                assert_eq!(object.origin, Origin::Declared(PathBuf::from("models/Widget.d.ts")));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            property_type(&project, "app.d.ts", "App", "level"),
            SourceType::Union(vec![string("low"), string("high")])
        );
        assert_eq!(property_type(&project, "app.d.ts", "App", "low"), string("low"));
    }

    #[test]
    fn classifies_builtin_and_unresolved_references() {
        let mut project = SourceProject::with_builtins(Builtins::with_extra(["HttpFile"]));
        project
            .add_source_text(
                "a.d.ts",
                "export declare class A {\n    created: Date;\n    file: HttpFile;\n    lookup: Record<string, number>;\n    ghost: Ghost;\n    weird: { a: string };\n}",
            )
            .unwrap();
        let origin = |property: &str| match property_type(&project, "a.d.ts", "A", property) {
            SourceType::ObjectRef(object) => object.origin,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(origin("created"), Origin::BuiltIn);
        assert_eq!(origin("file"), Origin::BuiltIn);
        assert_eq!(origin("lookup"), Origin::BuiltIn);
        assert_eq!(origin("ghost"), Origin::Unresolved);
        assert_eq!(
            property_type(&project, "a.d.ts", "A", "weird"),
            SourceType::Unsupported("{ a: string }".into())
        );
    }

    #[test]
    fn standard_library_declarations_are_builtin() {
        let project = project(&[
            (
                "node_modules/typescript/lib/lib.es2020.intl.d.ts",
                "interface Collator {\n    compare: any;\n}",
            ),
            ("a.d.ts", "export declare class A {\n    collator: Collator;\n}"),
        ]);
        match property_type(&project, "a.d.ts", "A", "collator") {
            SourceType::ObjectRef(object) => assert_eq!(object.origin, Origin::BuiltIn),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn computed_enum_members_degrade_to_unsupported() {
        let project = project(&[(
            "a.d.ts",
            "export declare enum Flags { Read = 1 << 0, Write = 2 }\nexport declare class A {\n    flags: Flags;\n    read: Flags.Read;\n}",
        )]);
        assert_eq!(
            property_type(&project, "a.d.ts", "A", "flags"),
            SourceType::Union(vec![
                SourceType::Unsupported("Flags.Read".into()),
                SourceType::Literal(Literal::Number("2".into())),
            ])
        );
        assert_eq!(
            property_type(&project, "a.d.ts", "A", "read"),
            SourceType::Unsupported("Flags.Read".into())
        );
    }

    #[test]
    fn cyclic_aliases_degrade_to_unsupported() {
        let project = project(&[(
            "a.d.ts",
            "type Loop = Loop[];\nexport declare class A {\n    value: Loop;\n}",
        )]);
        assert_eq!(
            property_type(&project, "a.d.ts", "A", "value"),
            SourceType::Array(Box::new(SourceType::Unsupported("Loop".into())))
        );
    }

    #[test]
    fn lookups_fail_loudly() {
        let project = project(&[("./models/../a.d.ts", "export declare class A {}")]);
        assert!(project.file(Path::new("a.d.ts")).is_ok());
        assert!(matches!(
            project.file(Path::new("missing.d.ts")),
            Err(Error::SourceFileNotFound { .. })
        ));
        let file = project.file(Path::new("a.d.ts")).unwrap();
        assert!(matches!(file.class("B"), Err(Error::ClassNotFound { .. })));
    }

    #[test]
    fn normalizes_paths_lexically() {
        assert_eq!(normalize_path(Path::new("./a/b/../c.d.ts")), PathBuf::from("a/c.d.ts"));
        assert_eq!(normalize_path(Path::new("../x/./y")), PathBuf::from("../x/y"));
        assert_eq!(normalize_path(Path::new("/a/../../b")), PathBuf::from("/b"));
    }

    #[test]
    fn loads_imported_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let models = dir.path().join("models");
        std::fs::create_dir_all(&models).unwrap();
        std::fs::write(
            models.join("Dashboard.d.ts"),
            "import { Widget } from './Widget';\nexport declare class Dashboard {\n    widgets: Widget[];\n}",
        )
        .unwrap();
        std::fs::write(models.join("Widget.d.ts"), "export declare class Widget {\n    id: string;\n}").unwrap();

        let mut project = SourceProject::new();
        let dashboard = models.join("Dashboard.d.ts");
        let loaded = project
            .add_source_files_at_paths(&dashboard.to_string_lossy())
            .unwrap();
        assert_eq!(loaded, 2);
        assert!(project.file(&models.join("Widget.d.ts")).is_ok());
    }

    #[test]
    fn empty_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/**/*.d.ts", dir.path().display());
        assert!(matches!(
            resolve_file_path_patterns([pattern]),
            Err(Error::NoSourceFiles { .. })
        ));
    }
}
