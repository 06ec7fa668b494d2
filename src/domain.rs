use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GostError;

/// Host of the only forge whose repositories are vendored as subtrees.
pub const FORGE_HOST: &str = "github.com";

const ROOT_SEGMENTS: usize = 3;

/// A slash-delimited Go package path. Not necessarily a repository root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportPath(String);

impl ImportPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    pub fn is_forge_native(&self) -> bool {
        self.segments().next() == Some(FORGE_HOST) && self.0.len() > FORGE_HOST.len()
    }

    /// Projects the path onto its hosting repository: host, owner and project.
    ///
    /// Paths with fewer than three segments come back whole; only forge-native
    /// paths are expected here.
    pub fn repo_root(&self) -> RepoRoot {
        let root = self
            .segments()
            .take(ROOT_SEGMENTS)
            .collect::<Vec<_>>()
            .join("/");
        RepoRoot(root)
    }

    pub fn join(&self, child: &str) -> ImportPath {
        ImportPath(format!("{}/{}", self.0, child.trim_matches('/')))
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ImportPath {
    type Err = GostError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().trim_matches('/');
        let is_valid = !normalized.is_empty()
            && normalized != "."
            && !normalized.chars().any(char::is_whitespace)
            && normalized.split('/').all(|segment| !segment.is_empty());
        if !is_valid {
            return Err(GostError::InvalidImportPath(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

/// The `host/owner/project` prefix naming one version-controlled repository.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoRoot(String);

impl RepoRoot {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn remote_url(&self) -> String {
        format!("https://{}.git", self.0)
    }

    pub fn as_import_path(&self) -> ImportPath {
        ImportPath(self.0.clone())
    }
}

impl fmt::Display for RepoRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Branch(String);

impl Branch {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Branch {
    type Err = GostError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        let is_valid = !normalized.is_empty()
            && !normalized.starts_with('-')
            && !normalized.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(GostError::InvalidBranch(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

/// Which branch the walker merges when it recurses into a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DependencyBranch {
    /// Reuse the branch requested for the root package.
    #[default]
    Inherit,
    /// Always merge dependencies from this branch.
    Pinned(Branch),
}

impl DependencyBranch {
    pub fn resolve<'a>(&'a self, requested: &'a Branch) -> &'a Branch {
        match self {
            DependencyBranch::Inherit => requested,
            DependencyBranch::Pinned(branch) => branch,
        }
    }
}

/// Rejects packages that cannot be pushed to or pulled from the forge.
pub fn require_forge_native(pkg: &ImportPath) -> Result<(), GostError> {
    if !pkg.is_forge_native() {
        return Err(GostError::UnsupportedHost(pkg.to_string()));
    }
    Ok(())
}
