// ABOUTME: Integration tests for the kube-render binary
// ABOUTME: Checks variable precedence, rendered output, and exit codes end to end

mod common;
use common::{stderr, stdout, TestEnvironment};

#[test]
fn test_cli_help_command() {
    let env = TestEnvironment::new();
    let output = env.command().arg("--help").output().unwrap();

    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("--template"));
    assert!(help.contains("--set"));
}

#[test]
fn test_cli_version_command() {
    let env = TestEnvironment::new();
    let output = env.command().arg("--version").output().unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_requires_template() {
    let env = TestEnvironment::new();
    let output = env.command().args(["--set", "A=1"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_set_override_beats_default() {
    let env = TestEnvironment::new();
    let output = env.render("{{val \"REPLICAS\" 1}}", &[], &["REPLICAS=5"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "5");
}

#[test]
fn test_default_used_without_override_or_environment() {
    let env = TestEnvironment::new();
    let output = env.render("{{val \"REPLICAS\" 1}}", &[], &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "1");
}

#[test]
fn test_environment_variable_is_used() {
    let env = TestEnvironment::new();
    let output = env.render("{{val \"REPLICAS\" 1}}", &[("REPLICAS", "3")], &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "3");
}

#[test]
fn test_override_beats_environment_and_later_override_wins() {
    let env = TestEnvironment::new();
    let output = env.render(
        "{{REPLICAS}}",
        &[("REPLICAS", "3")],
        &["REPLICAS=4", "REPLICAS=7"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "7");
}

#[test]
fn test_override_value_keeps_equals_signs() {
    let env = TestEnvironment::new();
    let output = env.render("{{val \"ARGS\"}}", &[], &["ARGS=--level=debug"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "--level=debug");
}

#[test]
fn test_label_suppressed_for_empty_tier() {
    let env = TestEnvironment::new();
    let output = env.render("{{K8sLabel Tier \"tier\" Tier}}", &[], &["Tier="]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_label_emitted_for_set_tier() {
    let env = TestEnvironment::new();
    let output = env.render("{{K8sLabel Tier \"tier\" Tier}}", &[], &["Tier=web"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "tier: \"web\"");
}

#[test]
fn test_full_manifest() {
    let env = TestEnvironment::new();
    let template = r#"{{#*inline "labels"}}app: {{val "APP"}}{{ENDL}}{{K8sLabel (val "TIER" "") "tier" (val "TIER" "")}}{{/inline}}apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{val "APP"}}
  labels:{{nindent 4 (include "labels" this)}}
spec:
  replicas: {{val "REPLICAS" 1}}
"#;
    let output = env.render(template, &[("APP", "shop")], &["TIER=web"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: shop\n  labels:\n    app: shop\n    tier: \"web\"\nspec:\n  replicas: 1\n"
    );
}

#[test]
fn test_malformed_set_exits_non_zero() {
    let env = TestEnvironment::new();
    let output = env.render("{{val \"A\" 1}}", &[], &["NO_EQUALS"]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let diagnostic = stdout(&output);
    assert!(diagnostic.starts_with("ERROR occurred: "));
    assert!(diagnostic.contains("NO_EQUALS"));
}

#[test]
fn test_parse_error_exits_non_zero_without_output() {
    let env = TestEnvironment::new();
    let output = env.render("before {{#if x}}a{{/each}}", &[], &[]);

    assert_eq!(output.status.code(), Some(1));
    let diagnostic = stdout(&output);
    assert!(diagnostic.starts_with("ERROR occurred: "));
    assert!(diagnostic.contains("template.yaml"));
}

#[test]
fn test_render_error_exits_non_zero() {
    let env = TestEnvironment::new();
    let output = env.render("{{val \"MISSING\"}}", &[], &[]);

    assert_eq!(output.status.code(), Some(1));
    let diagnostic = stdout(&output);
    assert!(diagnostic.starts_with("ERROR occurred: "));
    assert!(diagnostic.contains("MISSING"));
    assert!(!stderr(&output).contains("MISSING"));
}

#[test]
fn test_missing_template_file_exits_non_zero() {
    let env = TestEnvironment::new();
    let output = env
        .command()
        .args(["--template", "does-not-exist.yaml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("does-not-exist.yaml"));
}

#[test]
fn test_template_named_like_a_config_file_renders() {
    let env = TestEnvironment::new();
    let path = env.write_template(
        "kube-render.yaml",
        "kind: Service\nname: {{#if APP}}{{APP}}{{/if}}",
    );
    let output = env
        .command()
        .args(["--template", "kube-render.yaml", "--set", "APP=web"])
        .output()
        .unwrap();

    assert!(path.exists());
    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert_eq!(stdout(&output), "kind: Service\nname: web");
}

#[test]
fn test_check_parses_without_rendering() {
    let env = TestEnvironment::new();
    let path = env.write_template("check.yaml", "{{val \"MISSING\"}}");
    let output = env
        .command()
        .arg("--template")
        .arg(&path)
        .arg("--check")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_strict_flag_rejects_missing_paths() {
    let env = TestEnvironment::new();
    let path = env.write_template("strict.yaml", "name: {{Missing}}");

    let lenient = env.command().arg("--template").arg(&path).output().unwrap();
    assert!(lenient.status.success());
    assert_eq!(stdout(&lenient), "name: ");

    let strict = env
        .command()
        .arg("--template")
        .arg(&path)
        .arg("--strict")
        .output()
        .unwrap();
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn test_logs_stay_off_stdout() {
    let env = TestEnvironment::new();
    let path = env.write_template("verbose.yaml", "kind: Service");
    let output = env
        .command()
        .arg("--template")
        .arg(&path)
        .args(["--verbose", "--no-color"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "kind: Service");
    assert!(stderr(&output).contains("DEBUG"));
}
