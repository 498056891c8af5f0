//! CLI integration tests for callforge
//!
//! Tests command parsing, output formatting, and config handling.

use std::path::Path;
use std::process::Command;

/// Helper to run the CLI with an isolated config directory
fn run_in(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_callforge"))
        .env("CALLFORGE_HOME", home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn run_callforge(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().expect("tempdir");
    run_in(home.path(), args)
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

const ADDR: &str = "0x742d35cc6634c0532925a3b844bc9e7595f0ab3d";

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let output = run_callforge(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("callforge"));
    for cmd in ["selector", "encode", "decode", "call", "supports", "config"] {
        assert!(stdout.contains(cmd), "help lists {}", cmd);
    }
}

#[test]
fn test_cli_version() {
    let output = run_callforge(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("callforge"));
}

// ==================== ABI Tests ====================

#[test]
fn test_selector_transfer() {
    let output = run_callforge(&["selector", "transfer(address,uint256)"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "0xa9059cbb");
}

#[test]
fn test_selector_ignores_outputs_json() {
    let output = run_callforge(&["--json", "selector", "balanceOf(address)(uint256)"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["selector"], "0x70a08231");
    assert_eq!(json["signature"], "balanceOf(address)");
}

#[test]
fn test_encode_transfer() {
    let output = run_callforge(&["--json", "encode", "transfer(address,uint256)", ADDR, "1000"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    let expected = format!(
        "0xa9059cbb{:0>64}{:0>64}",
        &ADDR[2..],
        "3e8"
    );
    assert_eq!(json["data"], expected.as_str());
    assert_eq!(json["bytes"], 68);
}

#[test]
fn test_encode_no_selector() {
    let output = run_callforge(&["encode", "--no-selector", "setPrice(uint256)", "0x10"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("0x{:0>64}", "10")
    );
}

#[test]
fn test_encode_wrong_arg_count() {
    let output = run_callforge(&["encode", "transfer(address,uint256)", ADDR]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected 2 arguments"));
}

#[test]
fn test_encode_invalid_value() {
    let output = run_callforge(&["--json", "encode", "f(uint8)", "256"]);
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
}

#[test]
fn test_decode_uint_and_string() {
    let data = format!(
        "0x{:0>64}{:0>64}{:0>64}{:0<64}",
        "2a", "40", "2", "6869"
    );
    let output = run_callforge(&["--json", "decode", "(uint256,string)", &data]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["values"], serde_json::json!(["42", "hi"]));
}

#[test]
fn test_decode_calldata_skips_selector() {
    let data = format!("0xa9059cbb{:0>64}{:0>64}", &ADDR[2..], "3e8");
    let output = run_callforge(&["decode", "--calldata", "address,uint256", &data]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec![ADDR, "1000"]);
}

#[test]
fn test_decode_short_data_fails() {
    let output = run_callforge(&["decode", "uint256", "0x0102"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn test_decode_oversized_fixed_array_fails_cleanly() {
    let data = format!("0x{:0>64}", "1");
    for ty in ["uint256[268435456]", "uint256[1152921504606846976]"] {
        let output = run_callforge(&["--json", "decode", ty, &data]);
        assert!(!output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("insufficient data"));
    }
}

#[test]
fn test_selector_rejects_signed_size() {
    let output = run_callforge(&["selector", "f(uint+8)"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid type"));
}

#[test]
fn test_decode_invalid_hex() {
    let output = run_callforge(&["decode", "uint256", "0xzz"]);
    assert!(!output.status.success());
}

// ==================== Capability Probe Tests ====================

#[test]
fn test_supports_known_method() {
    let output = run_callforge(&["--json", "supports", "balanceOf", "0x18160ddd", "0x70A08231"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["supported"], true);
    assert_eq!(json["selector"], "0x70a08231");
}

#[test]
fn test_supports_missing_method() {
    let output = run_callforge(&["--json", "supports", "transfer", "0x70a08231"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["supported"], false);
}

#[test]
fn test_supports_signature() {
    let output = run_callforge(&["supports", "setPrice(uint256)", "0x91b7f5ed"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("is supported"));
}

#[test]
fn test_supports_unknown_name() {
    let output = run_callforge(&["supports", "frobnicate", "0x70a08231"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown method"));
}

// ==================== Call Tests ====================

#[test]
fn test_call_unreachable_rpc() {
    let output = run_callforge(&[
        "--rpc-url",
        "http://127.0.0.1:1",
        "call",
        ADDR,
        "balanceOf(address)(uint256)",
        ADDR,
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_call_invalid_address() {
    let output = run_callforge(&["call", "0x1234", "decimals()(uint8)"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid address"));
}

#[test]
fn test_call_invalid_block() {
    let output = run_callforge(&["call", ADDR, "decimals()(uint8)", "--block", "soon"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid block"));
}

// ==================== Config Tests ====================

#[test]
fn test_config_show_defaults() {
    let output = run_callforge(&["--json", "config", "--show"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["rpc_url"], "http://localhost:8545");
    assert_eq!(json["chain_id"], 1);
    assert_eq!(json["block"], "latest");
}

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();

    let output = run_in(
        home.path(),
        &["config", "--set-rpc", "http://node:8545", "--set-chain-id", "5", "--set-block", "0x10"],
    );
    assert!(output.status.success());
    assert!(home.path().join("config.toml").exists());

    let output = run_in(home.path(), &["--json", "config", "--show"]);
    let json = stdout_json(&output);
    assert_eq!(json["rpc_url"], "http://node:8545");
    assert_eq!(json["chain_id"], 5);
    assert_eq!(json["block"], "0x10");
}

#[test]
fn test_config_rejects_bad_block() {
    let home = tempfile::tempdir().unwrap();
    let output = run_in(home.path(), &["config", "--set-block", "tomorrow"]);
    assert!(!output.status.success());
    assert!(!home.path().join("config.toml").exists());
}

#[test]
fn test_config_without_flags_prints_hint() {
    let output = run_callforge(&["config"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--show"));
}

#[test]
fn test_invalid_subcommand() {
    let output = run_callforge(&["frobnicate"]);
    assert!(!output.status.success());
}
