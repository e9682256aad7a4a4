// tests/directive_parser.rs

use std::collections::BTreeSet;

use execfile::errors::{ExecfileError, SyntaxErrorKind};
use execfile::types::Trigger;
use execfile_test_utils::builders::{CommandBuilder, SinkBuilder};
use execfile_test_utils::{init_tracing, parse_handler};

fn syntax_kind(err: ExecfileError) -> SyntaxErrorKind {
    match err {
        ExecfileError::Syntax { kind, .. } => kind,
        other => panic!("Expected syntax error, got: {:?}", other),
    }
}

#[test]
fn inline_command_args_and_trigger() {
    init_tracing();
    let cmd = parse_handler("exec echo hello world { startup }").unwrap();

    let expected = CommandBuilder::new("echo")
        .args(&["hello", "world"])
        .at(Trigger::Startup)
        .build();
    assert_eq!(cmd, expected);
}

#[test]
fn block_form_sets_every_field() {
    init_tracing();
    let cmd = parse_handler(
        r#"
exec {
    command   ./backup.sh
    args      --full "/var/lib/my data"
    directory /srv
    timeout   10m
    foreground
    shutdown
    log       stdout
    err_log   discard
}
"#,
    )
    .unwrap();

    let expected = CommandBuilder::new("./backup.sh")
        .args(&["--full", "/var/lib/my data"])
        .directory("/srv")
        .timeout("10m")
        .foreground()
        .at(Trigger::Shutdown)
        .log(SinkBuilder::new("stdout").build())
        .err_log(SinkBuilder::new("discard").build())
        .build();
    assert_eq!(cmd, expected);
}

#[test]
fn command_field_takes_trailing_args() {
    let cmd = parse_handler("exec {\n command git pull --ff-only\n}").unwrap();
    assert_eq!(cmd.command, "git");
    assert_eq!(cmd.args, vec!["pull", "--ff-only"]);
}

#[test]
fn command_field_without_args_keeps_earlier_args() {
    let cmd = parse_handler("exec {\n args -la\n command ls\n}").unwrap();
    assert_eq!(cmd.command, "ls");
    assert_eq!(cmd.args, vec!["-la"]);
}

#[test]
fn missing_command_is_not_an_error() {
    let cmd = parse_handler("exec {\n startup\n}").unwrap();
    assert_eq!(cmd.command, "");
    assert!(cmd.args.is_empty());

    let cmd = parse_handler("exec").unwrap();
    assert_eq!(cmd.command, "");
}

#[test]
fn handler_scope_keeps_empty_triggers() {
    let cmd = parse_handler("exec date").unwrap();
    assert!(cmd.triggers.is_empty());
}

#[test]
fn repeated_triggers_are_a_set() {
    let cmd = parse_handler("exec x {\n startup\n shutdown\n startup\n shutdown\n}").unwrap();
    let expected: BTreeSet<Trigger> = [Trigger::Startup, Trigger::Shutdown].into();
    assert_eq!(cmd.triggers, expected);
}

#[test]
fn args_inline_and_in_block_is_a_duplicate() {
    let err = parse_handler("exec echo hi {\n args there\n}").unwrap_err();
    assert_eq!(
        syntax_kind(err),
        SyntaxErrorKind::DuplicateField("args".to_string())
    );
}

#[test]
fn args_twice_in_block_is_a_duplicate() {
    let err = parse_handler("exec {\n args a\n args b\n}").unwrap_err();
    assert_eq!(
        syntax_kind(err),
        SyntaxErrorKind::DuplicateField("args".to_string())
    );
}

#[test]
fn command_inline_and_in_block_is_a_duplicate() {
    let err = parse_handler("exec echo {\n command ls\n}").unwrap_err();
    assert_eq!(
        syntax_kind(err),
        SyntaxErrorKind::DuplicateField("command".to_string())
    );
}

#[test]
fn command_trailing_args_clash_with_args_field() {
    let err = parse_handler("exec {\n args a\n command ls -l\n}").unwrap_err();
    assert_eq!(
        syntax_kind(err),
        SyntaxErrorKind::DuplicateField("args".to_string())
    );
}

#[test]
fn log_twice_is_a_duplicate() {
    let err = parse_handler("exec x {\n log stdout\n log stderr\n}").unwrap_err();
    assert_eq!(
        syntax_kind(err),
        SyntaxErrorKind::DuplicateField("log".to_string())
    );
}

#[test]
fn required_arguments() {
    for src in [
        "exec {\n directory\n}",
        "exec {\n timeout\n}",
        "exec {\n command\n}",
        "exec {\n log\n}",
        "exec {\n err_log\n}",
    ] {
        let err = parse_handler(src).unwrap_err();
        assert!(
            matches!(syntax_kind(err), SyntaxErrorKind::MissingArgument(_)),
            "source: {src}"
        );
    }
}

#[test]
fn single_argument_fields_reject_extras() {
    let err = parse_handler("exec {\n directory /a /b\n}").unwrap_err();
    assert_eq!(
        syntax_kind(err),
        SyntaxErrorKind::MissingArgument("/b".to_string())
    );
}

#[test]
fn flags_take_no_arguments() {
    let err = parse_handler("exec x {\n foreground yes\n}").unwrap_err();
    assert_eq!(
        syntax_kind(err),
        SyntaxErrorKind::MissingArgument("yes".to_string())
    );
}

#[test]
fn unknown_keyword_is_named() {
    let err = parse_handler("exec x {\n\n retries 3\n}").unwrap_err();
    match err {
        ExecfileError::Syntax { line, kind, .. } => {
            assert_eq!(line, 3);
            assert_eq!(kind, SyntaxErrorKind::UnexpectedToken("retries".to_string()));
        }
        other => panic!("Expected syntax error, got: {:?}", other),
    }
    let msg = parse_handler("exec x {\n retries 3\n}").unwrap_err().to_string();
    assert!(msg.contains("'retries' not expected"));
}

#[test]
fn unclosed_block_fails() {
    let err = parse_handler("exec x {\n startup\n").unwrap_err();
    assert!(matches!(syntax_kind(err), SyntaxErrorKind::UnexpectedEof(_)));
}

#[test]
fn file_sink_with_nested_block() {
    let cmd = parse_handler(
        "exec worker {\n log file /var/log/worker.log {\n  roll_keep 5\n }\n err_log stderr\n startup\n}",
    )
    .unwrap();

    let log = cmd.stdout_sink.expect("log sink");
    assert_eq!(log.output, "file");
    assert_eq!(log.options["filename"], "/var/log/worker.log");
    assert_eq!(log.options["roll_keep"], 5);
    assert_eq!(cmd.stderr_sink.map(|s| s.output).as_deref(), Some("stderr"));
    assert!(cmd.triggers.contains(&Trigger::Startup));
}

#[test]
fn timeout_text_is_stored_unvalidated() {
    let cmd = parse_handler("exec sleep 5 {\n timeout soon\n}").unwrap();
    assert_eq!(cmd.timeout.as_deref(), Some("soon"));
    assert!(matches!(cmd.timeout_duration(), Some(Err(_))));
}
