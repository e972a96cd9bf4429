use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_trackerd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn trackerd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn export_page() -> serde_json::Value {
    json!({
        "tag": "body",
        "children": [
            {
                "tag": "table",
                "id": "marks",
                "children": [
                    {
                        "tag": "thead",
                        "children": [
                            {"tag": "tr", "children": [
                                {"tag": "th", "text": "Student"},
                                {"tag": "th", "text": "Remark"}
                            ]}
                        ]
                    },
                    {
                        "tag": "tbody",
                        "children": [
                            {"tag": "tr", "children": [
                                {"tag": "td", "text": "Doe, John"},
                                {"tag": "td", "text": "She said \"hi\""}
                            ]},
                            {"tag": "tr", "children": [
                                {"tag": "td", "text": "  Plain  "},
                                {"tag": "td", "text": "90"}
                            ]}
                        ]
                    }
                ]
            }
        ]
    })
}

#[test]
fn commas_and_quotes_are_escaped() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "page.load",
        json!({ "document": export_page() }),
    );
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "table.exportCsv",
        json!({ "tableId": "marks", "filename": "term1.csv" }),
    );
    assert_eq!(result.get("exported").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(
        result.get("filename").and_then(|v| v.as_str()),
        Some("term1.csv")
    );
    let csv = result.get("csv").and_then(|v| v.as_str()).expect("csv");
    let expected = "Student,Remark\n\"Doe, John\",\"She said \"\"hi\"\"\"\nPlain,90";
    assert_eq!(csv, expected);
}

#[test]
fn filename_defaults_when_not_supplied() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "page.load",
        json!({ "document": export_page() }),
    );
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "table.exportCsv",
        json!({ "tableId": "marks" }),
    );
    assert_eq!(
        result.get("filename").and_then(|v| v.as_str()),
        Some("export.csv")
    );
}

#[test]
fn missing_table_exports_nothing() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "page.load",
        json!({ "document": export_page() }),
    );
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "table.exportCsv",
        json!({ "tableId": "ghost" }),
    );
    assert_eq!(result.get("exported").and_then(|v| v.as_bool()), Some(false));
    assert!(result.get("csv").is_none());
}
