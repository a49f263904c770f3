//! Declaration-file parser.
//!
//! Understands the slice of TypeScript that autogenerated API clients emit in
//! their `.d.ts` output: imports and re-exports, classes, interfaces, type
//! aliases, enums and constants. Statements outside that slice are skipped,
//! and member types outside the supported type grammar are kept as
//! [`TypeExpr::Raw`] so the projector can degrade them later.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while},
    character::complete::{char, digit1, line_ending, multispace1, satisfy},
    combinator::{all_consuming, cut, eof, map, not, opt, peek, recognize, value, verify},
    error::{ErrorKind, ParseError, VerboseError, context, convert_error},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use super::decl::{
    AliasDecl, ConstDecl, Declaration, EnumDecl, EnumMember, Import, ImportBinding, ImportNames,
    Keyword, Literal, Module, PropertyDecl, ShapeDecl, ShapeKind, TypeExpr,
};

type PResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

// ————————————————————————————————————————————————————————————————————————————
// PUBLIC API
// ————————————————————————————————————————————————————————————————————————————

/// Parses a whole declaration file.
pub fn parse_module(source: &str) -> Result<Module, String> {
    match all_consuming(module)(source) {
        Ok((_, module)) => Ok(module),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(convert_error(source, e)),
        Err(nom::Err::Incomplete(_)) => Err("incomplete input".to_string()),
    }
}

/// Parses a single type expression, e.g. `Array<Widget> | undefined`.
pub fn parse_type(source: &str) -> Result<TypeExpr, String> {
    let source = source.trim();
    match all_consuming(terminated(type_expr, ws))(source) {
        Ok((_, ty)) => Ok(ty),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(convert_error(source, e)),
        Err(nom::Err::Incomplete(_)) => Err("incomplete input".to_string()),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// STATEMENTS
// ————————————————————————————————————————————————————————————————————————————

enum Statement {
    Import(Import),
    Declaration(Declaration),
    Skipped,
}

fn module(input: &str) -> PResult<'_, Module> {
    let mut module = Module::default();
    let mut input = input;
    loop {
        let (rest, _) = trivia(input)?;
        if rest.is_empty() {
            return Ok((rest, module));
        }
        let (rest, statement) = statement(rest)?;
        match statement {
            Statement::Import(import) => module.imports.push(import),
            Statement::Declaration(declaration) => module.declarations.push(declaration),
            Statement::Skipped => {}
        }
        input = rest;
    }
}

fn statement(input: &str) -> PResult<'_, Statement> {
    alt((
        map(import_decl, Statement::Import),
        map(reexport_decl, Statement::Import),
        map(declaration, Statement::Declaration),
        map(skip_statement, |_| Statement::Skipped),
    ))(input)
}

fn import_decl(input: &str) -> PResult<'_, Import> {
    let (input, _) = kw("import")(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = opt(terminated(kw("type"), ws))(input)?;
    let (input, names) = alt((
        map(named_bindings, ImportNames::Named),
        map(
            tuple((char('*'), ws, kw("as"), ws, identifier)),
            |(_, _, _, _, ns)| ImportNames::Namespace(ns.to_string()),
        ),
    ))(input)?;
    let (input, specifier) = from_clause(input)?;
    Ok((
        input,
        Import {
            specifier,
            names,
            is_reexport: false,
        },
    ))
}

fn reexport_decl(input: &str) -> PResult<'_, Import> {
    let (input, _) = kw("export")(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = opt(terminated(kw("type"), ws))(input)?;
    let (input, names) = alt((
        map(named_bindings, ImportNames::Named),
        value(
            ImportNames::All,
            terminated(char('*'), not(preceded(ws, kw("as")))),
        ),
    ))(input)?;
    let (input, specifier) = from_clause(input)?;
    Ok((
        input,
        Import {
            specifier,
            names,
            is_reexport: true,
        },
    ))
}

fn from_clause(input: &str) -> PResult<'_, String> {
    let (input, _) = ws(input)?;
    let (input, _) = kw("from")(input)?;
    let (input, _) = ws(input)?;
    let (input, specifier) = string_literal(input)?;
    let (input, _) = statement_end(input)?;
    Ok((input, specifier.to_string()))
}

fn named_bindings(input: &str) -> PResult<'_, Vec<ImportBinding>> {
    let (input, _) = char('{')(input)?;
    let (input, _) = ws(input)?;
    let (input, bindings) = separated_list0(delimited(ws, char(','), ws), import_binding)(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = opt(char(','))(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = char('}')(input)?;
    Ok((input, bindings))
}

fn import_binding(input: &str) -> PResult<'_, ImportBinding> {
    let (input, _) = opt(terminated(kw("type"), peek(pair(ws, identifier))))(input)?;
    let (input, _) = ws(input)?;
    let (input, imported) = identifier(input)?;
    let (input, alias) = opt(preceded(tuple((ws, kw("as"), ws)), identifier))(input)?;
    Ok((
        input,
        ImportBinding {
            imported: imported.to_string(),
            local: alias.unwrap_or(imported).to_string(),
        },
    ))
}

fn declaration(input: &str) -> PResult<'_, Declaration> {
    let (input, _) = many0(terminated(
        alt((kw("export"), kw("declare"), kw("abstract"), kw("default"))),
        ws,
    ))(input)?;
    alt((
        map(shape_decl, Declaration::Shape),
        map(alias_decl, Declaration::Alias),
        map(enum_decl, Declaration::Enum),
        map(const_decl, Declaration::Const),
    ))(input)
}

fn shape_decl(input: &str) -> PResult<'_, ShapeDecl> {
    let (input, kind) = alt((
        value(ShapeKind::Class, kw("class")),
        value(ShapeKind::Interface, kw("interface")),
    ))(input)?;
    let (input, _) = ws(input)?;
    let (input, name) = identifier(input)?;
    // type parameters and heritage clauses carry nothing we project
    let (input, _) = cut(context("declaration header", balanced_until(b"{")))(input)?;
    let (input, properties) = cut(context("declaration body", shape_body))(input)?;
    Ok((
        input,
        ShapeDecl {
            kind,
            name: name.to_string(),
            properties,
        },
    ))
}

fn alias_decl(input: &str) -> PResult<'_, AliasDecl> {
    let (input, _) = kw("type")(input)?;
    let (input, _) = ws(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = opt(type_parameters)(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = char('=')(input)?;
    let (input, ty) = cut(context("type alias", preceded(ws, member_type)))(input)?;
    let (input, _) = statement_end(input)?;
    Ok((
        input,
        AliasDecl {
            name: name.to_string(),
            ty,
        },
    ))
}

fn enum_decl(input: &str) -> PResult<'_, EnumDecl> {
    let (input, _) = opt(terminated(kw("const"), ws))(input)?;
    let (input, _) = kw("enum")(input)?;
    let (input, _) = ws(input)?;
    let (input, name) = identifier(input)?;
    let (input, raw_members) = cut(context("enum body", enum_body))(input)?;

    // implicit members count up from the previous numeric value; after a
    // computed or non-integer member they have no known value
    let mut members = Vec::with_capacity(raw_members.len());
    let mut next_number: Option<i64> = Some(0);
    for (member_name, initializer) in raw_members {
        let value = match initializer {
            Some(Some(literal)) => {
                next_number = match &literal {
                    Literal::Number(text) => text.parse::<i64>().ok().and_then(|n| n.checked_add(1)),
                    _ => None,
                };
                Some(literal)
            }
            Some(None) => {
                next_number = None;
                None
            }
            None => {
                let value = next_number.map(|n| Literal::Number(n.to_string()));
                next_number = next_number.and_then(|n| n.checked_add(1));
                value
            }
        };
        members.push(EnumMember {
            name: member_name,
            value,
        });
    }

    Ok((
        input,
        EnumDecl {
            name: name.to_string(),
            members,
        },
    ))
}

type RawEnumMember = (String, Option<Option<Literal>>);

fn enum_body(input: &str) -> PResult<'_, Vec<RawEnumMember>> {
    let (input, _) = ws(input)?;
    let (input, _) = char('{')(input)?;
    let (input, _) = trivia(input)?;
    let (input, members) = separated_list0(delimited(trivia, char(','), trivia), enum_member)(input)?;
    let (input, _) = trivia(input)?;
    let (input, _) = opt(char(','))(input)?;
    let (input, _) = trivia(input)?;
    let (input, _) = char('}')(input)?;
    Ok((input, members))
}

/// Member name plus its initializer: `Some(None)` when the initializer is
/// not a plain literal.
fn enum_member(input: &str) -> PResult<'_, RawEnumMember> {
    let (input, name) = alt((identifier, string_literal))(input)?;
    let (input, initializer) = opt(preceded(tuple((ws, char('='), ws)), enum_initializer))(input)?;
    let initializer = initializer.map(|raw| {
        all_consuming(terminated(literal, ws))(raw.trim_start())
            .ok()
            .map(|(_, literal)| literal)
    });
    Ok((input, (name.to_string(), initializer)))
}

/// Initializer text up to the next member separator. Unlike
/// `balanced_until`, angle brackets do not nest here (`1 << 2`).
fn enum_initializer(input: &str) -> PResult<'_, &str> {
    let mut depth = 0usize;
    let mut end = None;
    scan(input, |i, b, _| {
        match b {
            b',' | b'}' if depth == 0 => {
                end = Some(i);
                return true;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        false
    });
    match end {
        Some(i) if !input[..i].trim().is_empty() => Ok((&input[i..], &input[..i])),
        _ => Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::TakeUntil,
        ))),
    }
}

fn const_decl(input: &str) -> PResult<'_, ConstDecl> {
    let (input, _) = alt((kw("const"), kw("let"), kw("var")))(input)?;
    let (input, _) = ws(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = ws(input)?;
    let (input, ty) = opt(preceded(pair(char(':'), ws), member_type))(input)?;
    let (input, _) = ws(input)?;
    let (input, value) = opt(preceded(pair(char('='), ws), literal))(input)?;
    let (input, _) = statement_end(input)?;
    Ok((
        input,
        ConstDecl {
            name: name.to_string(),
            ty,
            value,
        },
    ))
}

fn statement_end(input: &str) -> PResult<'_, ()> {
    value((), pair(sp, opt(char(';'))))(input)
}

/// Consumes one statement we do not model: up to a `;` at depth zero, or
/// through a closing `}` that ends a top-level block.
fn skip_statement(input: &str) -> PResult<'_, &str> {
    let mut end = None;
    let mut stray = false;
    scan(input, |i, b, depth| match b {
        b';' if depth == 0 => {
            end = Some(i + 1);
            true
        }
        // no semicolon: the next line opening a statement ends this one
        b'\n' if depth == 0 && starts_statement(&input[i + 1..]) => {
            end = Some(i + 1);
            true
        }
        b'}' if depth == 0 => {
            stray = true;
            true
        }
        b'}' if depth == 1 => {
            let after = input[i + 1..].trim_start_matches([' ', '\t']);
            if let Some(rest) = after.strip_prefix(';') {
                end = Some(input.len() - rest.len());
                true
            } else if after.is_empty() || after.starts_with(['\n', '\r']) {
                end = Some(i + 1);
                true
            } else {
                false
            }
        }
        _ => false,
    });
    match end {
        Some(end) if !stray && end > 0 => Ok((&input[end..], &input[..end])),
        // a statement running to end of file without a terminator
        None if !stray && !input.trim().is_empty() => Ok(("", input)),
        _ => Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::TakeUntil,
        ))),
    }
}

const STATEMENT_KEYWORDS: &[&str] = &[
    "export",
    "declare",
    "abstract",
    "class",
    "interface",
    "type",
    "enum",
    "const",
    "let",
    "var",
    "import",
    "function",
    "namespace",
    "module",
];

fn starts_statement(rest: &str) -> bool {
    let rest = rest.trim_start();
    rest.starts_with("/**") || STATEMENT_KEYWORDS.iter().any(|&word| kw(word)(rest).is_ok())
}

// ————————————————————————————————————————————————————————————————————————————
// MEMBERS
// ————————————————————————————————————————————————————————————————————————————

fn shape_body(input: &str) -> PResult<'_, Vec<PropertyDecl>> {
    let (mut input, _) = char('{')(input)?;
    let mut properties = Vec::new();
    loop {
        let (rest, _) = ws(input)?;
        let (rest, docs) = many0(terminated(jsdoc, ws))(rest)?;
        if let Ok((rest, _)) = char::<_, VerboseError<&str>>('}')(rest) {
            return Ok((rest, properties));
        }
        let (rest, property) = alt((
            map(|i| property(i, &docs), Some),
            value(None, char(';')),
            value(None, skip_member),
        ))(rest)?;
        properties.extend(property);
        input = rest;
    }
}

fn property<'a>(input: &'a str, docs: &[&'a str]) -> PResult<'a, PropertyDecl> {
    let (input, _) = many0(terminated(member_modifier, ws))(input)?;
    let (input, name) = property_name(input)?;
    let (input, _) = sp(input)?;
    let (input, optional) = map(opt(char('?')), |q| q.is_some())(input)?;
    let (input, _) = opt(char('!'))(input)?;
    let (input, _) = sp(input)?;
    let (input, annotation) = opt(preceded(pair(char(':'), ws), member_type))(input)?;
    let (input, initializer) = opt(preceded(tuple((sp, char('='), ws)), literal))(input)?;
    let (input, _) = member_end(input)?;

    let ty = match (annotation, initializer) {
        (Some(ty), _) => ty,
        (None, Some(literal)) => TypeExpr::Literal(literal),
        (None, None) => TypeExpr::Keyword(Keyword::Any),
    };
    Ok((
        input,
        PropertyDecl {
            name: name.to_string(),
            optional,
            docs: docs.iter().map(|d| jsdoc_inner_text(d)).collect(),
            ty,
        },
    ))
}

fn member_modifier(input: &str) -> PResult<'_, &str> {
    // a modifier must be followed by the member name, so `readonly: boolean`
    // still parses as a property called `readonly`
    terminated(
        alt((
            kw("static"),
            kw("readonly"),
            kw("public"),
            kw("private"),
            kw("protected"),
            kw("declare"),
            kw("abstract"),
            kw("override"),
        )),
        peek(pair(
            ws,
            satisfy(|c| is_ident_start(c) || c == '"' || c == '\''),
        )),
    )(input)
}

fn property_name(input: &str) -> PResult<'_, &str> {
    alt((identifier, recognize(string_literal), digit1))(input)
}

fn member_end(input: &str) -> PResult<'_, ()> {
    preceded(
        sp,
        alt((
            value((), char(';')),
            value((), char(',')),
            value((), peek(char('}'))),
            value((), line_ending),
            value((), peek(tag("//"))),
            value((), eof),
        )),
    )(input)
}

/// Methods, accessors, constructors, index signatures: anything up to `;`.
fn skip_member(input: &str) -> PResult<'_, &str> {
    let (rest, skipped) = balanced_until(b";}")(input)?;
    let (rest, semicolon) = opt(char(';'))(rest)?;
    if skipped.trim().is_empty() && semicolon.is_none() {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::TakeUntil,
        )));
    }
    Ok((rest, skipped))
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// A member or alias type. Falls back to the raw text when the annotation is
/// outside the grammar below.
fn member_type(input: &str) -> PResult<'_, TypeExpr> {
    alt((
        terminated(type_expr, peek(type_end)),
        map(
            verify(balanced_until(b";}"), |s: &str| !s.trim().is_empty()),
            |s| TypeExpr::Raw(collapse_ws(s)),
        ),
    ))(input)
}

fn type_end(input: &str) -> PResult<'_, ()> {
    preceded(
        sp,
        alt((
            value((), char(';')),
            value((), char('}')),
            value((), char('=')),
            value((), char(',')),
            value((), line_ending),
            value((), tag("//")),
            value((), eof),
        )),
    )(input)
}

fn type_expr(input: &str) -> PResult<'_, TypeExpr> {
    let (input, _) = ws(input)?;
    let (input, _) = opt(terminated(char('|'), ws))(input)?;
    let (input, first) = intersection(input)?;
    let (input, rest) = many0(preceded(tuple((ws, char('|'), ws)), intersection))(input)?;
    if rest.is_empty() {
        return Ok((input, first));
    }
    let mut members = Vec::with_capacity(rest.len() + 1);
    for member in std::iter::once(first).chain(rest) {
        match member {
            TypeExpr::Union(inner) => members.extend(inner),
            other => members.push(other),
        }
    }
    Ok((input, TypeExpr::Union(members)))
}

fn intersection(input: &str) -> PResult<'_, TypeExpr> {
    let start = input;
    let (input, first) = postfix(input)?;
    let (input, rest) = many0(preceded(tuple((ws, char('&'), ws)), postfix))(input)?;
    if rest.is_empty() {
        Ok((input, first))
    } else {
        Ok((input, raw_between(start, input)))
    }
}

fn postfix(input: &str) -> PResult<'_, TypeExpr> {
    let start = input;
    let (mut input, mut ty) = primary(input)?;
    loop {
        if let Ok((rest, _)) = tuple((char('['), ws, char(']')))(input) {
            ty = TypeExpr::Array(Box::new(ty));
            input = rest;
            continue;
        }
        // indexed access, `T["key"]`
        if let Ok((rest, _)) = tuple((char('['), balanced_until(b"]"), char(']')))(input) {
            ty = raw_between(start, rest);
            input = rest;
            continue;
        }
        return Ok((input, ty));
    }
}

fn primary(input: &str) -> PResult<'_, TypeExpr> {
    alt((
        function_type,
        delimited(pair(char('('), ws), type_expr, pair(ws, char(')'))),
        tuple_type,
        map(
            recognize(tuple((char('{'), balanced_until(b"}"), char('}')))),
            |s| TypeExpr::Raw(collapse_ws(s)),
        ),
        map(
            recognize(tuple((char('`'), take_until("`"), char('`')))),
            |s: &str| TypeExpr::Raw(s.to_string()),
        ),
        map(literal, TypeExpr::Literal),
        map(preceded(pair(kw("typeof"), ws), qualified_name), |name| {
            TypeExpr::TypeOf(name.to_string())
        }),
        type_operator,
        named_type,
    ))(input)
}

fn function_type(input: &str) -> PResult<'_, TypeExpr> {
    let start = input;
    let (input, _) = opt(terminated(kw("new"), ws))(input)?;
    let (input, _) = opt(terminated(type_parameters, ws))(input)?;
    let (input, _) = tuple((char('('), balanced_until(b")"), char(')')))(input)?;
    let (input, _) = tuple((ws, tag("=>"), ws))(input)?;
    let (input, _) = type_expr(input)?;
    Ok((input, raw_between(start, input)))
}

fn type_operator(input: &str) -> PResult<'_, TypeExpr> {
    let start = input;
    let (input, operator) = terminated(alt((kw("keyof"), kw("readonly"), kw("unique"))), ws)(input)?;
    let (input, operand) = postfix(input)?;
    // `readonly T[]` carries no information once every property is read-only
    if operator == "readonly" {
        return Ok((input, operand));
    }
    Ok((input, raw_between(start, input)))
}

fn tuple_type(input: &str) -> PResult<'_, TypeExpr> {
    let (input, _) = char('[')(input)?;
    let (input, _) = ws(input)?;
    let (input, elements) = separated_list0(delimited(ws, char(','), ws), tuple_element)(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = opt(char(','))(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = char(']')(input)?;
    Ok((input, TypeExpr::Tuple(elements)))
}

fn tuple_element(input: &str) -> PResult<'_, TypeExpr> {
    let (input, rest) = opt(tag("..."))(input)?;
    let (input, _) = opt(terminated(
        identifier,
        tuple((ws, opt(char('?')), ws, char(':'))),
    ))(input)?;
    let (input, ty) = type_expr(input)?;
    let (input, _) = opt(char('?'))(input)?;
    let ty = match (rest, ty) {
        (Some(_), TypeExpr::Array(element)) => *element,
        (_, ty) => ty,
    };
    Ok((input, ty))
}

fn named_type(input: &str) -> PResult<'_, TypeExpr> {
    let (input, name) = qualified_name(input)?;
    if let Some(keyword) = Keyword::from_ident(name) {
        return Ok((input, TypeExpr::Keyword(keyword)));
    }
    let (input, args) = opt(type_arguments)(input)?;
    let mut args = args.unwrap_or_default();
    if matches!(name, "Array" | "ReadonlyArray") && args.len() <= 1 {
        let element = args.pop().unwrap_or(TypeExpr::Keyword(Keyword::Any));
        return Ok((input, TypeExpr::Array(Box::new(element))));
    }
    Ok((
        input,
        TypeExpr::Reference {
            name: name.to_string(),
            args,
        },
    ))
}

fn type_arguments(input: &str) -> PResult<'_, Vec<TypeExpr>> {
    let (input, _) = char('<')(input)?;
    let (input, args) = separated_list1(delimited(ws, char(','), ws), type_expr)(input)?;
    let (input, _) = ws(input)?;
    let (input, _) = char('>')(input)?;
    Ok((input, args))
}

fn type_parameters(input: &str) -> PResult<'_, &str> {
    recognize(tuple((char('<'), balanced_until(b">"), char('>'))))(input)
}

// ————————————————————————————————————————————————————————————————————————————
// TOKENS
// ————————————————————————————————————————————————————————————————————————————

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(satisfy(is_ident_start), take_while(is_ident_char)))(input)
}

fn qualified_name(input: &str) -> PResult<'_, &str> {
    recognize(pair(identifier, many0(pair(char('.'), identifier))))(input)
}

fn kw<'a>(word: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    terminated(tag(word), not(satisfy(is_ident_char)))
}

/// Inner text of a string literal in either quote style, escapes untouched.
fn string_literal(input: &str) -> PResult<'_, &str> {
    let quote = match input.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => {
            return Err(nom::Err::Error(VerboseError::from_error_kind(
                input,
                ErrorKind::Char,
            )));
        }
    };
    let body = &input[1..];
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((&body[i + 1..], &body[..i]));
        }
    }
    Err(nom::Err::Error(VerboseError::from_error_kind(
        input,
        ErrorKind::Char,
    )))
}

fn literal(input: &str) -> PResult<'_, Literal> {
    alt((
        map(string_literal, |s| Literal::String(s.to_string())),
        map(
            recognize(tuple((
                opt(char('-')),
                digit1,
                opt(pair(char('.'), digit1)),
            ))),
            |n: &str| Literal::Number(n.to_string()),
        ),
        value(Literal::Boolean(true), kw("true")),
        value(Literal::Boolean(false), kw("false")),
    ))(input)
}

fn sp(input: &str) -> PResult<'_, &str> {
    take_while(|c| c == ' ' || c == '\t')(input)
}

/// Whitespace and comments, JSDoc blocks excluded.
fn ws(input: &str) -> PResult<'_, ()> {
    value((), many0(alt((multispace1, line_comment, block_comment))))(input)
}

/// Whitespace and every kind of comment.
fn trivia(input: &str) -> PResult<'_, ()> {
    value(
        (),
        many0(alt((multispace1, line_comment, block_comment, jsdoc))),
    )(input)
}

fn line_comment(input: &str) -> PResult<'_, &str> {
    recognize(pair(tag("//"), take_while(|c| c != '\n')))(input)
}

fn block_comment(input: &str) -> PResult<'_, &str> {
    recognize(tuple((
        tag("/*"),
        not(pair(char('*'), not(char('/')))),
        take_until("*/"),
        tag("*/"),
    )))(input)
}

/// Raw body of a `/** ... */` block.
fn jsdoc(input: &str) -> PResult<'_, &str> {
    preceded(
        pair(tag("/**"), not(char('/'))),
        terminated(take_until("*/"), tag("*/")),
    )(input)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Strips the comment gutter (` * `) from a JSDoc body.
pub(crate) fn jsdoc_inner_text(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn raw_between(start: &str, rest: &str) -> TypeExpr {
    TypeExpr::Raw(collapse_ws(&start[..start.len() - rest.len()]))
}

fn balanced_until<'a>(stops: &'static [u8]) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    move |input: &'a str| {
        let mut stop_at = None;
        scan(input, |i, b, depth| {
            let closer = matches!(b, b')' | b']' | b'}' | b'>');
            if depth == 0 && (stops.contains(&b) || closer) {
                if stops.contains(&b) {
                    stop_at = Some(i);
                }
                return true;
            }
            false
        });
        match stop_at {
            Some(i) => Ok((&input[i..], &input[..i])),
            None => Err(nom::Err::Error(VerboseError::from_error_kind(
                input,
                ErrorKind::TakeUntil,
            ))),
        }
    }
}

/// Walks `input` outside string literals and comments, calling
/// `visit(index, byte, depth)` for each byte with the bracket depth before
/// that byte. Stops when `visit` returns true.
fn scan(input: &str, mut visit: impl FnMut(usize, u8, usize) -> bool) {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' | b'\'' | b'`' => {
                i = skip_quoted(bytes, i);
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = match input[i..].find('\n') {
                    Some(offset) => i + offset,
                    None => bytes.len(),
                };
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = match input[i + 2..].find("*/") {
                    Some(offset) => i + 2 + offset + 2,
                    None => bytes.len(),
                };
                continue;
            }
            b'=' if bytes.get(i + 1) == Some(&b'>') => {
                if visit(i, b, depth) {
                    return;
                }
                i += 2;
                continue;
            }
            _ => {
                if visit(i, b, depth) {
                    return;
                }
                match b {
                    b'(' | b'[' | b'{' | b'<' => depth += 1,
                    b')' | b']' | b'}' | b'>' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
        }
        i += 1;
    }
}

/// Index of the closing quote of the literal opening at `start`.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => return j,
            _ => j += 1,
        }
    }
    bytes.len()
}
