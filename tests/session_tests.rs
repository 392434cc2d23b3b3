use std::io;

use sdt_calc::ast::printer::TreeFormat;
use sdt_calc::repl::{self, Session, SessionConfig, Summary};

fn run_fixture(source: &str) -> (Vec<String>, Summary) {
    let config = SessionConfig {
        tree_file: None,
        tree_format: TreeFormat::Tree,
        capture_output: true,
    };
    let mut session = Session::with_writer(config, Box::new(io::sink()));
    let summary = repl::run_lines(&mut session, source.as_bytes()).expect("read fixture");
    (session.output().to_vec(), summary)
}

#[test]
fn fixture_session() {
    let source = include_str!("../fixtures/session.sdt");
    let expected = include_str!("../fixtures/session.expected");
    let (output, _) = run_fixture(source);
    let expected_lines: Vec<&str> = expected.lines().collect();
    assert_eq!(output, expected_lines);
}

#[test]
fn fixture_session_summary() {
    let source = include_str!("../fixtures/session.sdt");
    let (_, summary) = run_fixture(source);
    assert_eq!(
        summary,
        Summary {
            evaluated: 7,
            failed: 3
        }
    );
}

#[test]
fn session_holds_no_bindings() {
    // the second line would need `x` from the first
    let (output, summary) = run_fixture("x = 1\ny = x\n");
    assert_eq!(summary.failed, 1);
    assert!(
        output
            .last()
            .is_some_and(|l| l.starts_with("parsing error: 'x' cannot be used as a value"))
    );
}
