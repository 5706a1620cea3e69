//! CLI integration tests
//!
//! Tests for the parenpress command-line interface.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn parenpress() -> Command {
    Command::cargo_bin("parenpress").unwrap()
}

mod fmt_command {
    use super::*;

    #[test]
    fn fmt_single_file_to_stdout() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("forms.lisp");
        fs::write(&file_path, "( a   b c )").unwrap();

        parenpress()
            .arg("fmt")
            .arg(&file_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("(a b c)"));
    }

    #[test]
    fn fmt_single_file_in_place() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("forms.lisp");
        fs::write(&file_path, "( a   b c )").unwrap();

        parenpress()
            .arg("fmt")
            .arg("--write")
            .arg(&file_path)
            .assert()
            .success();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "(a b c)\n");
    }

    #[test]
    fn fmt_directory_discovers_source_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("one.lisp"), "( a )").unwrap();
        fs::write(temp.path().join("two.sexp"), "( b )").unwrap();
        fs::write(temp.path().join("skip.txt"), "( not sexp )").unwrap();

        parenpress()
            .arg("fmt")
            .arg("--write")
            .arg(temp.path())
            .assert()
            .success();

        assert_eq!(fs::read_to_string(temp.path().join("one.lisp")).unwrap(), "(a)\n");
        assert_eq!(fs::read_to_string(temp.path().join("two.sexp")).unwrap(), "(b)\n");
        assert_eq!(
            fs::read_to_string(temp.path().join("skip.txt")).unwrap(),
            "( not sexp )"
        );
    }

    #[test]
    fn fmt_reads_stdin_with_dash() {
        parenpress()
            .arg("fmt")
            .arg("-")
            .write_stdin("( x   y )")
            .assert()
            .success()
            .stdout("(x y)\n");
    }

    #[test]
    fn fmt_honors_margin_flag() {
        parenpress()
            .arg("fmt")
            .arg("--margin")
            .arg("12")
            .arg("-")
            .write_stdin("(add one two three)")
            .assert()
            .success()
            .stdout(predicate::str::contains("(add one\n"));
    }

    #[test]
    fn fmt_reports_read_errors_with_exit_code_2() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("broken.lisp");
        fs::write(&file_path, "(unclosed").unwrap();

        parenpress()
            .arg("fmt")
            .arg(&file_path)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Read error"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn check_passes_formatted_files() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("forms.lisp");
        fs::write(&file_path, "(a b c)\n").unwrap();

        parenpress().arg("check").arg(&file_path).assert().success();
    }

    #[test]
    fn check_fails_unformatted_files_with_exit_code_1() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("forms.lisp");
        fs::write(&file_path, "( a b c )").unwrap();

        parenpress()
            .arg("check")
            .arg(&file_path)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("needs formatting"));
    }

    #[test]
    fn check_reports_read_errors_with_exit_code_2() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("broken.lisp");
        fs::write(&file_path, ")").unwrap();

        parenpress().arg("check").arg(&file_path).assert().code(2);
    }
}
