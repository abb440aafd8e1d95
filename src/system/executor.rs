//! tplink-smarthome-api subprocess executor.
//! Spawns the control tool and respects POWERSTRIP_TOOL for pointing at a stub during testing.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, trace};

/// Environment override for the control tool binary.
pub const TOOL_ENV: &str = "POWERSTRIP_TOOL";

/// Build a Command for the control tool.
/// If POWERSTRIP_TOOL is set it wins over the configured program.
pub fn build_tool_command(program: &str) -> std::process::Command {
    match std::env::var(TOOL_ENV) {
        Ok(overridden) if !overridden.is_empty() => {
            debug!("Control tool overridden by {}: {}", TOOL_ENV, overridden);
            std::process::Command::new(overridden)
        }
        _ => std::process::Command::new(program),
    }
}

/// Run `program args...`, returning stdout on a zero exit status.
/// A `limit` of `None` waits for as long as the tool takes.
pub async fn run_tool(program: &str, args: &[&str], limit: Option<Duration>) -> Result<String> {
    let mut cmd = build_tool_command(program);
    cmd.args(args);

    trace!("Executing: {} {:?}", program, cmd.get_args().collect::<Vec<_>>());

    let mut cmd = tokio::process::Command::from(cmd);
    cmd.kill_on_drop(true);

    let output = match limit {
        Some(limit) => tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| anyhow!("{} {} timed out after {:?}", program, args.join(" "), limit))?,
        None => cmd.output().await,
    }
    .with_context(|| format!("Failed to execute {}", program))?;

    if !output.status.success() {
        return Err(anyhow!(
            "{} {} failed ({}): {}",
            program,
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
