use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{ImportPath, RepoRoot};
use crate::error::GostError;

pub const GIT_DIR: &str = ".git";
pub const GIT_IGNORE: &str = ".gitignore";
pub const GOST_FILE: &str = ".gost";
pub const SET_ENV: &str = "setenv.bash";
pub const SOURCE_DIR: &str = "src";

pub const DEFAULT_GIT_IGNORE: &str = "pkg
bin
.DS_Store
*.cov
";

pub const DEFAULT_GOST_FILE: &str = "a gost lives here";

pub const DEFAULT_SET_ENV: &str = r#"#!/bin/bash

DIR=$( cd "$( dirname "${BASH_SOURCE[0]}" )" && pwd )
export GOPATH=$DIR
export PATH=$GOPATH/bin:$PATH
"#;

/// Files written and committed by `gost init`, in order.
pub const SCAFFOLD_FILES: [(&str, &str); 3] = [
    (GIT_IGNORE, DEFAULT_GIT_IGNORE),
    (GOST_FILE, DEFAULT_GOST_FILE),
    (SET_ENV, DEFAULT_SET_ENV),
];

/// A gost workspace: a git repository that is also the `GOPATH`.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: Utf8PathBuf,
}

impl Workspace {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn current_dir() -> Result<Self, GostError> {
        let cwd = std::env::current_dir().map_err(|err| {
            GostError::Filesystem(format!("unable to determine current directory: {err}"))
        })?;
        let root = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|_| GostError::Filesystem("non-utf8 current directory".to_string()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn source_root(&self) -> Utf8PathBuf {
        self.root.join(SOURCE_DIR)
    }

    pub fn vendor_path(&self, root: &RepoRoot) -> Utf8PathBuf {
        self.source_root().join(root.as_str())
    }

    /// Workspace-relative prefix handed to `git subtree`.
    pub fn subtree_prefix(&self, root: &RepoRoot) -> String {
        format!("{SOURCE_DIR}/{}", root.as_str())
    }

    pub fn package_dir(&self, pkg: &ImportPath) -> Utf8PathBuf {
        self.source_root().join(pkg.as_str())
    }

    pub fn exists(&self, path: &Utf8Path) -> bool {
        path.as_std_path().exists()
    }

    pub fn require_initialized(&self) -> Result<(), GostError> {
        for file in [GOST_FILE, GIT_DIR] {
            if !self.exists(&self.root.join(file)) {
                return Err(GostError::NotAWorkspace {
                    root: self.root.clone(),
                    file: file.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn require_uninitialized(&self) -> Result<(), GostError> {
        if self.exists(&self.root.join(GIT_DIR)) {
            return Err(GostError::AlreadyInitialized {
                root: self.root.clone(),
                file: format!("a {GIT_DIR} folder"),
            });
        }
        Ok(())
    }

    /// Writes a scaffold file, refusing to overwrite anything already there.
    pub fn write_new_file(&self, name: &str, content: &str) -> Result<Utf8PathBuf, GostError> {
        let path = self.root.join(name);
        if self.exists(&path) {
            return Err(GostError::AlreadyInitialized {
                root: self.root.clone(),
                file: name.to_string(),
            });
        }
        fs::write(path.as_std_path(), content)
            .map_err(|err| GostError::Filesystem(format!("unable to write {path}: {err}")))?;
        Ok(path)
    }

    /// Immediate subdirectories of `pkg`, as packages, sorted by name.
    pub fn list_subpackages(&self, pkg: &ImportPath) -> Result<Vec<ImportPath>, GostError> {
        let dir = self.package_dir(pkg);
        let entries = fs::read_dir(dir.as_std_path()).map_err(|err| {
            GostError::Filesystem(format!("unable to list subpackages of {pkg}: {err}"))
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| GostError::Filesystem(err.to_string()))?;
            let is_dir = entry
                .file_type()
                .map(|kind| kind.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names.iter().map(|name| pkg.join(name)).collect())
    }
}
