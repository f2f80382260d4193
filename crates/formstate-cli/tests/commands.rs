//! Subcommand handlers run against documents on disk.

use std::path::{Path, PathBuf};

use formstate_cli::input::FormArgs;
use formstate_cli::{state, submit};
use serde_json::{json, Value};

fn write(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
    path
}

fn form(schema: PathBuf, data: Option<PathBuf>) -> FormArgs {
    FormArgs {
        schema,
        data,
        ui: None,
        config: None,
        live_validate: false,
        omit_extra_data: false,
        no_validate: false,
        id_prefix: None,
        id_separator: None,
    }
}

fn signup_schema() -> Value {
    json!({
        "type": "object",
        "required": ["email"],
        "properties": {
            "email": {"type": "string", "minLength": 3},
            "newsletter": {"type": "boolean", "default": false}
        }
    })
}

#[test]
fn state_prints_trees_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "schema.json", &signup_schema());
    let args = state::StateArgs {
        form: form(schema, None),
        data_only: false,
    };
    let mut out = Vec::new();
    state::run(&args, &mut out).unwrap();
    let printed: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed["formData"], json!({"newsletter": false}));
    assert_eq!(printed["idSchema"]["email"]["$id"], "root_email");
    assert_eq!(printed["pathSchema"]["newsletter"]["$name"], "newsletter");
    assert_eq!(printed["errorSchema"], json!({}));
}

#[test]
fn state_data_only() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "schema.json", &signup_schema());
    let data = write(dir.path(), "data.json", &json!({"email": "a@b"}));
    let args = state::StateArgs {
        form: form(schema, Some(data)),
        data_only: true,
    };
    let mut out = Vec::new();
    state::run(&args, &mut out).unwrap();
    let printed: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed, json!({"email": "a@b", "newsletter": false}));
}

#[test]
fn submit_accepts_valid_data() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "schema.json", &signup_schema());
    let data = write(dir.path(), "data.json", &json!({"email": "a@b", "extra": 1}));
    let mut args = submit::SubmitArgs {
        form: form(schema, Some(data)),
    };
    args.form.omit_extra_data = true;
    let mut out = Vec::new();
    assert!(submit::run(&args, &mut out).unwrap());
    let printed: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        printed,
        json!({"status": "submitted", "formData": {"email": "a@b", "newsletter": false}})
    );
}

#[test]
fn submit_rejects_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "schema.json", &signup_schema());
    let data = write(dir.path(), "data.json", &json!({"email": "a"}));
    let args = submit::SubmitArgs {
        form: form(schema, Some(data)),
    };
    let mut out = Vec::new();
    assert!(!submit::run(&args, &mut out).unwrap());
    let printed: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed["status"], "rejected");
    assert_eq!(printed["errors"][0]["stack"], "email: should NOT be shorter than 3 characters");
}
