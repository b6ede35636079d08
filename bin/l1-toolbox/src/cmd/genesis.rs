//! `genesis` subcommand: validates genesis inputs and writes the documents.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use anyhow::{bail, Context};
use l1_common::{ChainRegistry, Clock, FixedClock, SystemClock};
use l1_genesis::{
    recompute, GenesisBuilderHandle, GenesisConfigState, GenesisDocument, GenesisEdit,
    GenesisOutput,
};
use tokio::time;
use tracing::{info, warn};

use crate::{args::SubcGenesis, config::ToolboxConfig};

pub(super) async fn exec(cmd: SubcGenesis, config: &ToolboxConfig) -> anyhow::Result<()> {
    if cmd.input.is_empty() {
        bail!("at least one --input is required");
    }

    let out_dir = cmd
        .output
        .clone()
        .unwrap_or_else(|| config.genesis.output_dir.clone());
    let clock: Arc<dyn Clock> = match cmd.timestamp {
        Some(ts) => Arc::new(FixedClock::new(ts)),
        None => Arc::new(SystemClock),
    };

    if cmd.watch {
        let [input] = cmd.input.as_slice() else {
            bail!("--watch takes exactly one --input");
        };
        return watch_input(input, &out_dir, cmd.check, clock, config).await;
    }

    generate_all(&cmd.input, &out_dir, cmd.check, clock.as_ref())
}

/// Generates one document per input. Inputs must target distinct chains;
/// every input is checked before anything is written.
fn generate_all(
    inputs: &[PathBuf],
    out_dir: &Path,
    check_only: bool,
    clock: &dyn Clock,
) -> anyhow::Result<()> {
    let registry = ChainRegistry::new();
    let mut docs = Vec::with_capacity(inputs.len());
    let mut conflicts = Vec::new();
    let mut invalid = 0;

    for path in inputs {
        let state = load_input(path)?;
        let output = recompute(&state, 0, clock.now_unix_secs());
        report(path, &output);

        let Some(doc) = output.document else {
            invalid += 1;
            continue;
        };
        match registry.create(doc.chain_id(), state) {
            Ok(()) => docs.push((path, doc)),
            Err(e) => conflicts.push(format!("{}: {e}", path.display())),
        }
    }

    if !conflicts.is_empty() {
        bail!("nothing written, {}", conflicts.join("; "));
    }

    for (path, doc) in docs {
        if check_only {
            println!("{}: ok (chain {})", path.display(), doc.chain_id());
        } else {
            let written = write_document(out_dir, &doc)?;
            println!("{}: wrote {}", path.display(), written.display());
        }
    }

    if invalid > 0 {
        bail!("{invalid} genesis input(s) failed validation");
    }
    Ok(())
}

async fn watch_input(
    path: &Path,
    out_dir: &Path,
    check_only: bool,
    clock: Arc<dyn Clock>,
    config: &ToolboxConfig,
) -> anyhow::Result<()> {
    let state = load_input(path)?;
    let (handle, task) = GenesisBuilderHandle::create(state, config.debounce(), clock);
    let task = tokio::spawn(task);

    let mut outputs = handle.output_watcher();
    let initial = outputs.borrow_and_update().clone();
    emit(path, out_dir, check_only, &initial);

    let mut last_modified = modified_at(path)?;
    let mut ticker = time::interval(config.watch_interval());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    info!(path = %path.display(), "watching genesis input");

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                if !input_changed(path, &mut last_modified) {
                    continue;
                }
                match load_input(path) {
                    Ok(state) => handle.edit(GenesisEdit::Replace(Box::new(state))).await?,
                    Err(e) => warn!(err = %format!("{e:#}"), "ignoring unreadable genesis input"),
                }
            }
            changed = outputs.changed() => {
                if changed.is_err() {
                    break;
                }
                let output = outputs.borrow_and_update().clone();
                emit(path, out_dir, check_only, &output);
            }
        }
    }

    drop(handle);
    task.await?;
    Ok(())
}

/// Reports one output and writes it when valid. Failures are logged so the
/// watcher keeps running.
fn emit(path: &Path, out_dir: &Path, check_only: bool, output: &GenesisOutput) {
    report(path, output);
    let Some(doc) = &output.document else {
        warn!(generation = output.generation, "genesis input has errors");
        return;
    };
    if check_only {
        info!(generation = output.generation, chain_id = doc.chain_id(), "genesis valid");
        return;
    }
    match write_document(out_dir, doc) {
        Ok(written) => info!(generation = output.generation, path = %written.display(), "wrote genesis"),
        Err(e) => warn!(err = %format!("{e:#}"), "failed to write genesis"),
    }
}

fn report(path: &Path, output: &GenesisOutput) {
    for diag in output.diagnostics.iter() {
        println!("{}: {diag}", path.display());
    }
}

fn load_input(path: &Path) -> anyhow::Result<GenesisConfigState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading genesis input {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing genesis input {}", path.display()))
}

fn write_document(out_dir: &Path, doc: &GenesisDocument) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output dir {}", out_dir.display()))?;
    let path = out_dir.join(doc.file_name());
    fs::write(&path, doc.to_json_pretty()?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Whether `path` was modified since `last`, updating `last` when it was. A
/// file that cannot be stat'ed, e.g. mid-replace by an editor, counts as
/// unchanged.
fn input_changed(path: &Path, last: &mut SystemTime) -> bool {
    match modified_at(path) {
        Ok(modified) if modified != *last => {
            *last = modified;
            true
        }
        Ok(_) => false,
        Err(e) => {
            warn!(err = %format!("{e:#}"), "cannot stat genesis input, skipping tick");
            false
        }
    }
}

fn modified_at(path: &Path) -> anyhow::Result<SystemTime> {
    let meta = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    Ok(meta.modified()?)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const TS: u64 = 1_700_000_000;

    fn input(chain_id: u64) -> String {
        format!(
            r#"
            [chain]
            chain_id = {chain_id}

            [[tokenomics.allocations]]
            address = "0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC"
            amount = 1000.0
            "#
        )
    }

    fn write_input(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_generate_writes_per_chain() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let a = write_input(&dir, "a.toml", &input(1001));
        let b = write_input(&dir, "b.toml", &input(1002));

        generate_all(&[a, b], &out, false, &FixedClock::new(TS)).unwrap();

        let raw = fs::read_to_string(out.join("genesis-1001.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["config"]["chainId"], 1001);
        assert!(out.join("genesis-1002.json").exists());
    }

    #[test]
    fn test_check_only_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let a = write_input(&dir, "a.toml", &input(1001));

        generate_all(&[a], &out, true, &FixedClock::new(TS)).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_duplicate_chain_rejected() {
        let dir = TempDir::new().unwrap();
        let a = write_input(&dir, "a.toml", &input(1001));
        let b = write_input(&dir, "b.toml", &input(1001));

        let err = generate_all(&[a, b], dir.path(), true, &FixedClock::new(TS)).unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));
    }

    #[test]
    fn test_duplicate_chain_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let a = write_input(&dir, "a.toml", &input(1001));
        let b = write_input(&dir, "b.toml", &input(1002));
        let c = write_input(&dir, "c.toml", &input(1001));

        let err = generate_all(&[a, b, c], &out, false, &FixedClock::new(TS)).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("nothing written"));
        assert!(msg.contains("c.toml"));
        assert!(!out.join("genesis-1001.json").exists());
        assert!(!out.join("genesis-1002.json").exists());
    }

    #[test]
    fn test_invalid_input_fails_after_reporting_all() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let bad = write_input(&dir, "bad.toml", "[chain]\nchain_id = 7\n");
        let good = write_input(&dir, "good.toml", &input(1001));

        let err = generate_all(&[bad, good], &out, false, &FixedClock::new(TS)).unwrap_err();
        assert!(err.to_string().contains("1 genesis input(s)"));
        assert!(out.join("genesis-1001.json").exists());
    }

    #[test]
    fn test_missing_input_skips_tick() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "a.toml", &input(1001));
        let mut last = modified_at(&path).unwrap();
        assert!(!input_changed(&path, &mut last));

        fs::remove_file(&path).unwrap();
        let before = last;
        assert!(!input_changed(&path, &mut last));
        assert_eq!(last, before);

        fs::write(&path, input(1002)).unwrap();
        let stale = SystemTime::UNIX_EPOCH;
        last = stale;
        assert!(input_changed(&path, &mut last));
        assert_ne!(last, stale);
    }

    #[test]
    fn test_unparseable_input() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, "a.toml", "chain = 5");
        let err = load_input(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing genesis input"));
    }
}
