use crate::source::{Keyword, SourceType};

/// Leaf types that project to their own text: the scalar keywords, `null`,
/// `undefined`, the top types and every literal.
///
/// `never`, `object`, `bigint` and `symbol` are deliberately not primitive;
/// they fall through to the projector's degraded path.
pub fn is_primitive(ty: &SourceType) -> bool {
    match ty {
        SourceType::Literal(_) => true,
        SourceType::Intrinsic(keyword) => matches!(
            keyword,
            Keyword::String
                | Keyword::Number
                | Keyword::Boolean
                | Keyword::Undefined
                | Keyword::Null
                | Keyword::Any
                | Keyword::Unknown
                | Keyword::Void
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Literal, ObjectRef, Origin};

    #[test]
    fn scalars_and_literals_are_primitive() {
        for keyword in [
            Keyword::String,
            Keyword::Number,
            Keyword::Boolean,
            Keyword::Undefined,
            Keyword::Null,
            Keyword::Any,
            Keyword::Unknown,
            Keyword::Void,
        ] {
            assert!(is_primitive(&SourceType::Intrinsic(keyword)), "{keyword:?}");
        }
        assert!(is_primitive(&SourceType::Literal(Literal::String("a".into()))));
        assert!(is_primitive(&SourceType::Literal(Literal::Number("1".into()))));
        assert!(is_primitive(&SourceType::Literal(Literal::Boolean(false))));
    }

    #[test]
    fn structured_types_are_not_primitive() {
        for keyword in [Keyword::Never, Keyword::Object, Keyword::BigInt, Keyword::Symbol] {
            assert!(!is_primitive(&SourceType::Intrinsic(keyword)), "{keyword:?}");
        }
        let string = SourceType::Intrinsic(Keyword::String);
        assert!(!is_primitive(&SourceType::Union(vec![string.clone()])));
        assert!(!is_primitive(&SourceType::Array(Box::new(string.clone()))));
        assert!(!is_primitive(&SourceType::Tuple(vec![string])));
        assert!(!is_primitive(&SourceType::ObjectRef(ObjectRef {
            name: "Date".into(),
            text: "Date".into(),
            origin: Origin::BuiltIn,
        })));
        assert!(!is_primitive(&SourceType::Unsupported("{ a: string }".into())));
    }
}
