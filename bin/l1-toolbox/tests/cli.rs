//! End-to-end runs of the `l1-toolbox` binary.

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_l1-toolbox");

const GENESIS_INPUT: &str = r#"
[chain]
chain_id = 43117

[[tokenomics.allocations]]
address = "0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC"
amount = 1000000.0

[permissions.contract_deployer]
activated = true

[permissions.contract_deployer.addresses]
admin = ["0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC"]
"#;

fn toolbox(args: &[&str], cwd: &Path) -> Output {
    Command::new(BIN)
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run l1-toolbox")
}

#[test]
fn genesis_writes_document() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("chain.toml"), GENESIS_INPUT).unwrap();

    let out = toolbox(
        &[
            "genesis",
            "--input",
            "chain.toml",
            "--output",
            "out",
            "--timestamp",
            "1700000000",
        ],
        dir.path(),
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let raw = fs::read_to_string(dir.path().join("out/genesis-43117.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["config"]["chainId"], 43117);
    assert_eq!(doc["timestamp"], "0x6553f100");
    assert!(doc["config"]["contractDeployerAllowListConfig"].is_object());
}

#[test]
fn genesis_reports_errors() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("chain.toml"),
        "[chain]\nchain_id = 0\n\n[fees]\ngas_limit = 1\n",
    )
    .unwrap();

    let out = toolbox(&["genesis", "-i", "chain.toml", "--check"], dir.path());
    assert!(!out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("chain.chain_id"));
    assert!(stdout.contains("fees.gas_limit"));
    assert!(stdout.contains("tokenomics.allocations"));
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("ERROR"));
}

#[test]
fn checkpoint_lists_empty_store() {
    let dir = TempDir::new().unwrap();
    let out = toolbox(&["checkpoint", "--store", "cps"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());
}

#[test]
fn checkpoint_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    let out = toolbox(&["checkpoint", "--store", "cps", "missing"], dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no checkpoint for registration missing"));
}

#[test]
fn show_config_applies_overrides() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("toolbox.toml"),
        "[registration]\npoll_max_attempts = 7\n",
    )
    .unwrap();

    let out = toolbox(
        &["--config", "toolbox.toml", "--network", "mainnet", "show-config"],
        dir.path(),
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(r#"network = "mainnet""#));
    assert!(stdout.contains("poll_max_attempts = 7"));
}
