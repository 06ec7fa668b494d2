use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::Command;

use camino::Utf8PathBuf;

use crate::config::GOPATH_ENV;
use crate::domain::ImportPath;
use crate::error::GostError;
use crate::process::run_tool;

// Module mode ignores the GOPATH layout gost vendors into.
const GO_MODULES_ENV: &str = "GO111MODULE";

/// Template for `go list`: every transitive dependency plus the test imports.
pub const DEPS_TEMPLATE: &str = "{{range .Deps}}{{.}} {{end}} {{range .TestImports}}{{.}} {{end}}";

pub trait GoToolchain: Send + Sync {
    /// Transitive build dependencies and test imports of `pkg`, flattened.
    fn list_imports(&self, pkg: &ImportPath) -> Result<BTreeSet<ImportPath>, GostError>;
    /// Fetches a single package the way `go get` does.
    fn get_package(&self, pkg: &ImportPath, update: bool) -> Result<(), GostError>;
}

#[derive(Debug, Clone)]
pub struct SystemGo {
    program: PathBuf,
    gopath: Utf8PathBuf,
}

impl SystemGo {
    pub fn new(gopath: Utf8PathBuf) -> Self {
        Self::with_program(PathBuf::from("go"), gopath)
    }

    /// Uses a specific `go` binary instead of the one on `PATH`.
    pub fn with_program(program: PathBuf, gopath: Utf8PathBuf) -> Self {
        Self { program, gopath }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .env(GOPATH_ENV, self.gopath.as_std_path())
            .env(GO_MODULES_ENV, "off")
            .current_dir(self.gopath.as_std_path());
        cmd
    }

    /// Runs `go` and returns its stdout. stderr carries progress chatter
    /// such as `go: downloading ...` and only ends up in error messages.
    fn run_go(&self, args: &[&str]) -> Result<String, GostError> {
        let output = run_tool(self.command(args))?;
        if !output.success() {
            return Err(GostError::Go {
                output: output.diagnostic(),
                command: output.command,
            });
        }
        Ok(output.stdout)
    }
}

fn get_args(pkg: &ImportPath, update: bool) -> Vec<&str> {
    let mut args = vec!["get"];
    if update {
        args.push("-u");
    }
    args.push(pkg.as_str());
    args
}

impl GoToolchain for SystemGo {
    fn list_imports(&self, pkg: &ImportPath) -> Result<BTreeSet<ImportPath>, GostError> {
        let listing = self.run_go(&["list", "-f", DEPS_TEMPLATE, pkg.as_str()])?;
        parse_imports(&listing)
    }

    fn get_package(&self, pkg: &ImportPath, update: bool) -> Result<(), GostError> {
        self.run_go(&get_args(pkg, update)).map(|_| ())
    }
}

/// Parses the output of `go list -f DEPS_TEMPLATE`, dropping blanks and `.`.
pub fn parse_imports(listing: &str) -> Result<BTreeSet<ImportPath>, GostError> {
    listing
        .replace(['[', ']'], " ")
        .split_whitespace()
        .filter(|entry| *entry != ".")
        .map(str::parse)
        .collect()
}
