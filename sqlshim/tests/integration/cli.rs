#![cfg(all(not(target_family = "wasm"), feature = "cli"))]

use std::process::Command;

use insta_cmd::assert_cmd_snapshot;
use insta_cmd::get_cargo_bin;

const PAGINATED: &str = r#"{"Select": {"cores": [{"projections": [{"kind": {"Column": {"name": "name"}}}], "source": {"base": {"Table": {"name": "employees"}}}}], "limit": {"expr": {"kind": {"Literal": {"Integer": 10}}}}, "offset": {"expr": {"kind": {"Literal": {"Integer": 20}}}}}}"#;

const FILTERED: &str = r#"{"Select": {"cores": [{"source": {"base": {"Table": {"name": "employees"}}}, "wheres": [{"kind": {"Binary": {"left": {"kind": {"Column": {"name": "dept"}}}, "op": "Eq", "right": {"kind": {"Param": {"name": "dept", "value": {"Integer": 3}}}}}}}]}]}}"#;

#[test]
fn get_targets() {
    assert_cmd_snapshot!(sqlshim_command().arg("list-targets"), @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    sql.any
    sql.generic
    sql.oracle

    ----- stderr -----
    "###);
}

#[test]
fn compile_generic() {
    assert_cmd_snapshot!(sqlshim_command()
        .args(["compile", "--hide-signature-comment", "--no-format"])
        .pass_stdin(PAGINATED), @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    SELECT name FROM employees LIMIT 10 OFFSET 20

    ----- stderr -----
    "###);
}

#[test]
fn compile_oracle() {
    assert_cmd_snapshot!(sqlshim_command()
        .args(["compile", "--hide-signature-comment", "--no-format", "--target", "sql.oracle"])
        .pass_stdin(PAGINATED), @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    SELECT * FROM (SELECT raw_sql_.*, rownum raw_rnum_ FROM (SELECT name FROM employees) raw_sql_ WHERE rownum <= 30) WHERE raw_rnum_ > 20

    ----- stderr -----
    "###);
}

#[test]
fn compile_target_from_env() {
    assert_cmd_snapshot!(sqlshim_command()
        .env("SQLSHIM_TARGET", "sql.oracle")
        .args(["compile", "--hide-signature-comment", "--no-format", "--server-version", "12"])
        .pass_stdin(PAGINATED), @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    SELECT name FROM employees OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY

    ----- stderr -----
    "###);
}

#[test]
fn compile_json_output() {
    assert_cmd_snapshot!(sqlshim_command()
        .args([
            "compile",
            "--hide-signature-comment",
            "--no-format",
            "--target",
            "sql.oracle",
            "--emit",
            "json",
        ])
        .pass_stdin(FILTERED), @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    {
      "sql": "SELECT * FROM employees WHERE dept = :a1",
      "params": [
        {
          "marker": ":a1",
          "name": "dept",
          "value": {
            "Integer": 3
          }
        }
      ]
    }

    ----- stderr -----
    "###);
}

#[test]
fn compile_param_style() {
    assert_cmd_snapshot!(sqlshim_command()
        .args(["compile", "--hide-signature-comment", "--no-format", "--param-style", "inline"])
        .pass_stdin(FILTERED), @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    SELECT * FROM employees WHERE dept = 3

    ----- stderr -----
    "###);
}

#[test]
fn compile_error() {
    assert_cmd_snapshot!(sqlshim_command()
        .args(["compile", "--target", "sql.oracle", "--max-in-list", "0"])
        .pass_stdin(FILTERED), @r###"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    [E0103] Error: invalid argument: the maximum IN list length must be at least 1
    "###);
}

#[test]
fn json_schema() {
    let output = sqlshim_command()
        .args(["debug", "json-schema", "--schema-type", "statement"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["title"], "Statement");
}

fn sqlshim_command() -> Command {
    let mut cmd = Command::new(get_cargo_bin("sqlshim"));
    normalize_sqlshim(&mut cmd);
    cmd
}

fn normalize_sqlshim(cmd: &mut Command) -> &mut Command {
    cmd
        // We don't want the tests to be affected by the user's environment.
        .env_remove("RUST_BACKTRACE")
        .env_remove("RUST_LOG")
        .env_remove("SQLSHIM_TARGET")
}
