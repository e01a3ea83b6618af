use crate::model::{SinkKind, SubmitConfig};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::{collections::HashMap, env, fs};

fn expand_cmdline_env(cmdline: &str) -> Result<String> {
    // ${VAR} from the environment; unknown vars expand to ""
    let re = Regex::new(r"\$\{([A-Za-z0-9_]+)\}").context("compiling env pattern")?;
    let env_map: HashMap<String, String> = env::vars().collect();
    Ok(re
        .replace_all(cmdline, |caps: &regex::Captures| {
            env_map.get(&caps[1]).cloned().unwrap_or_default()
        })
        .to_string())
}

/// Spawns `cmdline` with `input` on stdin and waits for it. Returns stdout.
pub fn run_with_stdin(cmdline: &str, input: &str) -> Result<String> {
    let expanded = expand_cmdline_env(cmdline)?;
    let parts = shlex::split(&expanded).ok_or_else(|| anyhow!("Failed to parse command line"))?;
    if parts.is_empty() {
        return Err(anyhow!("Empty command line"));
    }
    let program = &parts[0];
    let args = &parts[1..];
    let mut child = Command::new(program)
        .args(args)
        .env("FORMFORGE_JSON", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning {expanded}"))?;
    // Stdin is fed from its own thread so a command echoing its input can
    // drain into stdout while we collect it
    let writer = child.stdin.take().map(|mut stdin| {
        let bytes = input.as_bytes().to_vec();
        thread::spawn(move || stdin.write_all(&bytes))
    });
    let output = child
        .wait_with_output()
        .with_context(|| format!("waiting for {expanded}"))?;
    if let Some(handle) = writer {
        let written = handle
            .join()
            .map_err(|_| anyhow!("stdin writer for {program} panicked"))?;
        // A command that exits without reading is judged by its status below
        if let Err(e) = written {
            if e.kind() != ErrorKind::BrokenPipe {
                return Err(e).with_context(|| format!("writing submission to {program}"));
            }
        }
    }
    if !output.status.success() {
        let err = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(anyhow!("Command failed: {}\n{}", cmdline, err));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Delivers one submission to the configured sink and names the destination.
///
/// The stdout sink only queues the line; the caller prints the queue once
/// the terminal is restored.
pub fn deliver(
    cfg: &SubmitConfig,
    payload: &JsonValue,
    stdout_queue: &mut Vec<String>,
) -> Result<String> {
    match cfg.sink {
        SinkKind::Stdout => {
            stdout_queue.push(payload.to_string());
            Ok("stdout".to_string())
        }
        SinkKind::File => {
            let path = cfg
                .path
                .as_deref()
                .ok_or_else(|| anyhow!("file sink needs submit.path"))?;
            let text = serde_json::to_string_pretty(payload).context("encoding submission")?;
            fs::write(path, text + "\n").with_context(|| format!("writing {path}"))?;
            Ok(path.to_string())
        }
        SinkKind::Command => {
            let cmdline = cfg
                .command
                .as_deref()
                .ok_or_else(|| anyhow!("command sink needs submit.command"))?;
            run_with_stdin(cmdline, &payload.to_string())?;
            Ok(cmdline.to_string())
        }
    }
}
