//! Reader tests

use parenpress::reader::{read_all, read_one};
use parenpress::{Error, Value};

mod atoms {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_symbols_and_numbers() {
        assert_eq!(read_one("foo").unwrap(), Value::symbol("foo"));
        assert_eq!(read_one("42").unwrap(), Value::Int(42));
        assert_eq!(read_one("-7").unwrap(), Value::Int(-7));
        assert_eq!(read_one("3.25").unwrap(), Value::Float(3.25));
        assert_eq!(read_one(":name").unwrap(), Value::Keyword("name".to_string()));
        assert_eq!(read_one("nil").unwrap(), Value::Nil);
    }

    #[test]
    fn arithmetic_symbols_are_not_numbers() {
        assert_eq!(read_one("+").unwrap(), Value::symbol("+"));
        assert_eq!(read_one("-").unwrap(), Value::symbol("-"));
        assert_eq!(read_one("1+").unwrap(), Value::symbol("1+"));
    }

    #[test]
    fn reads_strings_with_escapes() {
        assert_eq!(
            read_one("\"a\\\"b\\n\"").unwrap(),
            Value::Str("a\"b\n".to_string())
        );
    }

    #[test]
    fn reads_character_literals() {
        assert_eq!(read_one("#\\a").unwrap(), Value::Char('a'));
        assert_eq!(read_one("#\\space").unwrap(), Value::Char(' '));
        assert_eq!(read_one("#\\newline").unwrap(), Value::Char('\n'));
    }
}

mod lists {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_list_reads_as_nil() {
        assert_eq!(read_one("()").unwrap(), Value::Nil);
    }

    #[test]
    fn reads_nested_lists() {
        assert_eq!(
            read_one("(a (b c) d)").unwrap(),
            Value::list(vec![
                Value::symbol("a"),
                Value::list(vec![Value::symbol("b"), Value::symbol("c")]),
                Value::symbol("d"),
            ])
        );
    }

    #[test]
    fn reads_dotted_lists() {
        assert_eq!(
            read_one("(a b . c)").unwrap(),
            Value::DottedList(
                vec![Value::symbol("a"), Value::symbol("b")],
                Box::new(Value::symbol("c")),
            )
        );
    }

    #[test]
    fn reads_vectors() {
        assert_eq!(
            read_one("#(1 2 3)").unwrap(),
            Value::Vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }
}

mod sugar {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quote_expands() {
        assert_eq!(
            read_one("'x").unwrap(),
            Value::list(vec![Value::symbol("quote"), Value::symbol("x")])
        );
    }

    #[test]
    fn quasiquote_and_unquote_expand() {
        assert_eq!(
            read_one("`(a ,b ,@c)").unwrap(),
            Value::list(vec![
                Value::symbol("quasiquote"),
                Value::list(vec![
                    Value::symbol("a"),
                    Value::list(vec![Value::symbol("unquote"), Value::symbol("b")]),
                    Value::list(vec![
                        Value::symbol("unquote-splicing"),
                        Value::symbol("c"),
                    ]),
                ]),
            ])
        );
    }
}

mod toplevel {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_multiple_forms() {
        let forms = read_all("(a) (b)\n42").unwrap();
        assert_eq!(forms.len(), 3);
    }

    #[test]
    fn comments_are_skipped() {
        let forms = read_all("; leading\n(a) ; trailing\n; closing\n").unwrap();
        assert_eq!(forms, vec![Value::list(vec![Value::symbol("a")])]);
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unclosed_list() {
        assert!(matches!(
            read_one("(a b"),
            Err(Error::ReadError { .. })
        ));
    }

    #[test]
    fn stray_close_paren_has_a_span() {
        match read_one(")") {
            Err(Error::ReadError { span, .. }) => assert_eq!(span, Some((0, 1))),
            other => panic!("expected read error, got {:?}", other.map(|v| v.to_string())),
        }
    }

    #[test]
    fn unterminated_string() {
        assert!(read_one("\"abc").is_err());
        assert!(read_all("(x \"abc)").is_err());
    }

    #[test]
    fn misplaced_dot() {
        assert!(read_one("(. a)").is_err());
        assert!(read_one(".").is_err());
    }
}
