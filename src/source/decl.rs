// Syntax-level model of a parsed declaration file. Nothing here is resolved;
// see `types.rs` for the resolved shapes the projector consumes.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub imports: Vec<Import>,
    pub declarations: Vec<Declaration>,
}

impl Module {
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name() == name)
    }
}

/// `import ... from "x"` or a re-export `export ... from "x"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub specifier: String,
    pub names: ImportNames,
    pub is_reexport: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportNames {
    /// `{ A, B as C }`
    Named(Vec<ImportBinding>),
    /// `* as ns`
    Namespace(String),
    /// `export * from "x"`
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportBinding {
    pub imported: String,
    pub local: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Shape(ShapeDecl),
    Alias(AliasDecl),
    Enum(EnumDecl),
    Const(ConstDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Shape(s) => &s.name,
            Declaration::Alias(a) => &a.name,
            Declaration::Enum(e) => &e.name,
            Declaration::Const(c) => &c.name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Class,
    Interface,
}

/// A class or interface: the only declarations that become generated interfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDecl {
    pub kind: ShapeKind,
    pub name: String,
    pub properties: Vec<PropertyDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    /// Exactly as written, quotes included.
    pub name: String,
    pub optional: bool,
    /// Inner text of each JSDoc block attached to the property.
    pub docs: Vec<String>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasDecl {
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    /// `None` for computed members (`1 << 2`, `Other.X`).
    pub value: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub value: Option<Literal>,
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    String,
    Number,
    Boolean,
    Undefined,
    Null,
    Any,
    Unknown,
    Void,
    Never,
    Object,
    BigInt,
    Symbol,
}

impl Keyword {
    pub fn from_ident(ident: &str) -> Option<Self> {
        let keyword = match ident {
            "string" => Keyword::String,
            "number" => Keyword::Number,
            "boolean" => Keyword::Boolean,
            "undefined" => Keyword::Undefined,
            "null" => Keyword::Null,
            "any" => Keyword::Any,
            "unknown" => Keyword::Unknown,
            "void" => Keyword::Void,
            "never" => Keyword::Never,
            "object" => Keyword::Object,
            "bigint" => Keyword::BigInt,
            "symbol" => Keyword::Symbol,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::Boolean => "boolean",
            Keyword::Undefined => "undefined",
            Keyword::Null => "null",
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Void => "void",
            Keyword::Never => "never",
            Keyword::Object => "object",
            Keyword::BigInt => "bigint",
            Keyword::Symbol => "symbol",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Inner text without quotes, escapes left as written.
    String(String),
    /// Source text of the number, sign included.
    Number(String),
    Boolean(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", escape_double_quotes(s)),
            Literal::Number(n) => f.write_str(n),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

// single-quoted literals may carry bare double quotes
fn escape_double_quotes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;
    for c in s.chars() {
        if c == '"' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Keyword(Keyword),
    Literal(Literal),
    Union(Vec<TypeExpr>),
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    /// Possibly qualified (`ns.Name`) reference with type arguments.
    Reference { name: String, args: Vec<TypeExpr> },
    TypeOf(String),
    /// Syntax outside the supported subset, whitespace-collapsed.
    Raw(String),
}

impl TypeExpr {
    pub fn reference(name: impl Into<String>) -> Self {
        TypeExpr::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Keyword(k) => f.write_str(k.as_str()),
            TypeExpr::Literal(l) => write!(f, "{l}"),
            TypeExpr::Union(members) => write_joined(f, members, " | "),
            TypeExpr::Array(element) => match element.as_ref() {
                TypeExpr::Union(_) => write!(f, "({element})[]"),
                _ => write!(f, "{element}[]"),
            },
            TypeExpr::Tuple(elements) => {
                f.write_str("[")?;
                write_joined(f, elements, ", ")?;
                f.write_str("]")
            }
            TypeExpr::Reference { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_joined(f, args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeExpr::TypeOf(name) => write!(f, "typeof {name}"),
            TypeExpr::Raw(text) => f.write_str(text),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
