//! End-to-end formatting tests

use parenpress::{check, format, format_with, PrinterConfig, Value};

mod flat_output {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_forms_stay_on_one_line() {
        assert_eq!(format("(a b c)").unwrap(), "(a b c)\n");
        assert_eq!(
            format("(let ((x 1) (y 2)) (+ x y))").unwrap(),
            "(let ((x 1) (y 2)) (+ x y))\n"
        );
    }

    #[test]
    fn atoms_print_plainly() {
        assert_eq!(format("42").unwrap(), "42\n");
        assert_eq!(format("foo").unwrap(), "foo\n");
        assert_eq!(format("\"hi\"").unwrap(), "\"hi\"\n");
        assert_eq!(format("nil").unwrap(), "nil\n");
    }

    #[test]
    fn each_top_level_form_gets_its_own_line() {
        assert_eq!(format("(a)   (b)\n\n42").unwrap(), "(a)\n(b)\n42\n");
    }

    #[test]
    fn whitespace_is_normalized() {
        assert_eq!(format("( a\n   b\tc )").unwrap(), "(a b c)\n");
    }

    #[test]
    fn dotted_lists_and_vectors() {
        assert_eq!(format("(a b . c)").unwrap(), "(a b . c)\n");
        assert_eq!(format("#(1 2 3)").unwrap(), "#(1 2 3)\n");
    }
}

mod sugar {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quote_forms_reprint_as_sugar() {
        assert_eq!(format("'(a b)").unwrap(), "'(a b)\n");
        assert_eq!(format("`(a ,b ,@c)").unwrap(), "`(a ,b ,@c)\n");
    }

    #[test]
    fn unquote_keeps_a_space_before_sugar_fusing_characters() {
        let form = Value::list(vec![Value::symbol("unquote"), Value::symbol("@foo")]);
        let mut out = String::new();
        parenpress::output_pretty(&mut out, &form, &PrinterConfig::default()).unwrap();
        assert_eq!(out, ", @foo");
    }
}

mod wrapping {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn long_call_forms_wrap_with_arguments_aligned() {
        let out = format(
            "(frobnicate-the-widget alpha-component beta-component \
             gamma-component delta-component epsilon-component)",
        )
        .unwrap();
        let continuation_indent = " ".repeat("(frobnicate-the-widget ".len());
        assert_eq!(
            out,
            format!(
                "(frobnicate-the-widget alpha-component beta-component gamma-component\n{continuation_indent}delta-component epsilon-component)\n"
            )
        );
    }

    #[test]
    fn margin_config_controls_wrapping() {
        let config = PrinterConfig::new().with_margin(12);
        let out = format_with("(add one two three)", &config).unwrap();
        assert_eq!(out, "(add one\n     two\n     three)\n");
    }
}

mod laws {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formatting_is_idempotent() {
        let inputs = [
            "(a b c)",
            "( a\n b )",
            "(frobnicate-the-widget alpha-component beta-component \
             gamma-component delta-component epsilon-component)",
            "'(quoted list)",
            "#(1 2.5 \"s\" :k)",
        ];
        for input in inputs {
            let once = format(input).unwrap();
            let twice = format(&once).unwrap();
            assert_eq!(once, twice, "input: {input:?}");
        }
    }

    #[test]
    fn formatted_output_rereads_to_the_same_values() {
        let input = "(defn area (r) (* pi r r)) #(1 2) '(x . y)";
        let before = parenpress::reader::read_all(input).unwrap();
        let after = parenpress::reader::read_all(&format(input).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn check_accepts_formatted_and_rejects_unformatted() {
        assert!(check("(a b c)\n").unwrap());
        assert!(!check("( a b c )").unwrap());
    }
}
