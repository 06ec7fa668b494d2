use std::process::Command;

use camino::Utf8PathBuf;

use crate::domain::Branch;
use crate::error::GostError;
use crate::process::{ToolOutput, run_tool};

/// The git operations gost needs from the host repository.
///
/// `prefix` arguments are paths relative to the repository root.
pub trait Vcs: Send + Sync {
    fn init(&self) -> Result<(), GostError>;
    fn add_path(&self, path: &str) -> Result<(), GostError>;
    fn commit(&self, paths: &[&str], message: &str) -> Result<(), GostError>;
    fn has_staged_changes(&self) -> Result<bool, GostError>;
    fn subtree_add(&self, prefix: &str, remote: &str, branch: &Branch) -> Result<(), GostError>;
    fn subtree_pull(&self, prefix: &str, remote: &str, branch: &Branch) -> Result<(), GostError>;
    fn subtree_push(&self, prefix: &str, remote: &str, branch: &Branch) -> Result<(), GostError>;
}

#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: Utf8PathBuf,
}

impl SystemGit {
    pub fn new(workdir: Utf8PathBuf) -> Self {
        Self { workdir }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(self.workdir.as_std_path());
        cmd
    }

    fn git(&self, args: &[&str]) -> Result<ToolOutput, GostError> {
        run_tool(self.command(args))
    }

    fn run_git(&self, args: &[&str]) -> Result<(), GostError> {
        let output = self.git(args)?;
        if output.success() {
            return Ok(());
        }
        Err(GostError::Git {
            output: output.diagnostic(),
            command: output.command,
        })
    }
}

/// Arguments for `git subtree <action>`. Pushes are never squashed.
fn subtree_args<'a>(
    action: &'a str,
    prefix: &'a str,
    remote: &'a str,
    branch: &'a Branch,
) -> Vec<&'a str> {
    let mut args = vec!["subtree", action];
    if action != "push" {
        args.push("--squash");
    }
    args.extend(["--prefix", prefix, remote, branch.as_str()]);
    args
}

fn commit_args<'a>(paths: &[&'a str], message: &'a str) -> Vec<&'a str> {
    let mut args = vec!["commit"];
    args.extend_from_slice(paths);
    args.extend(["-m", message]);
    args
}

// `git diff --cached --quiet` exits 1 when something is staged.
fn staged_changes(output: ToolOutput) -> Result<bool, GostError> {
    match output.code {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(GostError::Git {
            output: output.diagnostic(),
            command: output.command,
        }),
    }
}

impl Vcs for SystemGit {
    fn init(&self) -> Result<(), GostError> {
        self.run_git(&["init"])
    }

    fn add_path(&self, path: &str) -> Result<(), GostError> {
        self.run_git(&["add", path])
    }

    fn commit(&self, paths: &[&str], message: &str) -> Result<(), GostError> {
        self.run_git(&commit_args(paths, message))
    }

    fn has_staged_changes(&self) -> Result<bool, GostError> {
        staged_changes(self.git(&["diff", "--cached", "--quiet"])?)
    }

    fn subtree_add(&self, prefix: &str, remote: &str, branch: &Branch) -> Result<(), GostError> {
        self.run_git(&subtree_args("add", prefix, remote, branch))
    }

    fn subtree_pull(&self, prefix: &str, remote: &str, branch: &Branch) -> Result<(), GostError> {
        self.run_git(&subtree_args("pull", prefix, remote, branch))
    }

    fn subtree_push(&self, prefix: &str, remote: &str, branch: &Branch) -> Result<(), GostError> {
        self.run_git(&subtree_args("push", prefix, remote, branch))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn exited(code: Option<i32>) -> ToolOutput {
        ToolOutput {
            command: "git diff --cached --quiet".to_string(),
            code,
            stdout: String::new(),
            stderr: "fatal: not a git repository\n".to_string(),
        }
    }

    #[test]
    fn add_and_pull_squash_but_push_does_not() {
        let branch: Branch = "master".parse().unwrap();
        let remote = "https://github.com/a/b.git";
        assert_eq!(
            subtree_args("add", "src/github.com/a/b", remote, &branch),
            vec!["subtree", "add", "--squash", "--prefix", "src/github.com/a/b", remote, "master"]
        );
        assert_eq!(
            subtree_args("pull", "src/github.com/a/b", remote, &branch),
            vec!["subtree", "pull", "--squash", "--prefix", "src/github.com/a/b", remote, "master"]
        );
        assert_eq!(
            subtree_args("push", "src/github.com/a/b", remote, &branch),
            vec!["subtree", "push", "--prefix", "src/github.com/a/b", remote, "master"]
        );
    }

    #[test]
    fn commit_lists_paths_before_message() {
        assert_eq!(
            commit_args(&[".gost"], "[gost] Initialized .gost"),
            vec!["commit", ".gost", "-m", "[gost] Initialized .gost"]
        );
        assert_eq!(commit_args(&[], "msg"), vec!["commit", "-m", "msg"]);
    }

    #[test]
    fn diff_exit_code_means_staged() {
        assert!(!staged_changes(exited(Some(0))).unwrap());
        assert!(staged_changes(exited(Some(1))).unwrap());
        let err = staged_changes(exited(Some(128))).unwrap_err();
        assert_matches!(err, GostError::Git { output, .. }
            if output == "fatal: not a git repository");
        assert_matches!(staged_changes(exited(None)), Err(GostError::Git { .. }));
    }

    #[test]
    fn commands_run_in_the_workspace() {
        let git = SystemGit::new(Utf8PathBuf::from("/work/gopath"));
        let cmd = git.command(&["diff", "--cached", "--quiet"]);
        assert_eq!(cmd.get_program(), "git");
        assert_eq!(cmd.get_current_dir(), Some(std::path::Path::new("/work/gopath")));
        let args = cmd.get_args().collect::<Vec<_>>();
        assert_eq!(args, vec!["diff", "--cached", "--quiet"]);
    }
}
