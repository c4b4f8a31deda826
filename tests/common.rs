//! Shared test utilities for integration tests.
//!
//! Provides helpers for building render contexts, writing temporary input
//! files, and running the refmark binary.

#![allow(dead_code)]

use anyhow::Result;
use refmark::{MarkdownHelper, MarkdownRenderer, Project, RenderContext};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Creates helper over the default comrak renderer.
pub fn helper() -> MarkdownHelper<MarkdownRenderer<'static>> {
    MarkdownHelper::new(MarkdownRenderer::new())
}

/// Render context for project `group/project`.
pub fn project_context() -> RenderContext {
    RenderContext::for_project(Project::new("group", "project"))
}

/// Writes `content` to `name` inside `dir`.
///
/// # Errors
///
/// Returns error if the file cannot be written
pub fn write_input(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Runs the refmark binary with `args`, feeding `stdin` to it.
///
/// # Errors
///
/// Returns error if the process cannot be spawned or awaited
pub fn run_cli(args: &[&str], stdin: &str) -> Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_refmark"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut input) = child.stdin.take() {
        input.write_all(stdin.as_bytes())?;
    }

    Ok(child.wait_with_output()?)
}

/// Returns stdout of a successful run, failing with stderr otherwise.
///
/// # Errors
///
/// Returns error if the command failed or printed invalid UTF8
pub fn stdout_of(output: Output) -> Result<String> {
    if !output.status.success() {
        anyhow::bail!(
            "refmark failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(String::from_utf8(output.stdout)?)
}
