use std::process::Command;

use tracing::info;

use crate::error::GostError;

#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub command: String,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Both streams, trimmed, for error messages.
    pub fn diagnostic(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (false, true) => stdout.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

/// Runs `cmd` to completion and captures its output. Only a failure to spawn
/// is an error here; callers decide what a non-zero exit means.
pub fn run_tool(mut cmd: Command) -> Result<ToolOutput, GostError> {
    let command = describe(&cmd);
    info!("Running {command}");
    let output = cmd.output().map_err(|err| GostError::ToolSpawn {
        program: cmd.get_program().to_string_lossy().to_string(),
        message: err.to_string(),
    })?;
    Ok(ToolOutput {
        command,
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
    parts.extend(cmd.get_args().map(|arg| arg.to_string_lossy().to_string()));
    parts.join(" ")
}
