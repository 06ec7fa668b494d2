use camino::Utf8PathBuf;

use crate::domain::DependencyBranch;
use crate::error::GostError;
use crate::workspace::Workspace;

pub const GOPATH_ENV: &str = "GOPATH";

#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    pub update: bool,
    pub dependency_branch: DependencyBranch,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolves the workspace root from an explicit path or `GOPATH`.
    pub fn resolve(gopath: Option<&str>) -> Result<Workspace, GostError> {
        let from_env = std::env::var(GOPATH_ENV).ok();
        Self::resolve_with(gopath, from_env.as_deref())
    }

    pub fn resolve_with(
        gopath: Option<&str>,
        from_env: Option<&str>,
    ) -> Result<Workspace, GostError> {
        let root = gopath
            .and_then(non_blank)
            .or_else(|| from_env.and_then(non_blank))
            .ok_or(GostError::MissingGopath)?;

        // GOPATH may list several roots; gost only manages the first.
        let first = std::env::split_paths(root)
            .next()
            .ok_or(GostError::MissingGopath)?;
        let root = Utf8PathBuf::from_path_buf(first)
            .map_err(|_| GostError::Filesystem("non-utf8 GOPATH".to_string()))?;
        Ok(Workspace::new(root))
    }
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|value| !value.is_empty())
}
