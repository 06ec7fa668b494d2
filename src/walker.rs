//! Dependency-closure walk: merge one subtree per forge repository reachable
//! from a package, and hand everything else to `go get`.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Branch, DependencyBranch, ImportPath, RepoRoot};
use crate::error::GostError;
use crate::golang::GoToolchain;
use crate::vcs::Vcs;
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeAction {
    Added,
    Pulled,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRecord {
    pub root: RepoRoot,
    pub branch: Branch,
    pub prefix: String,
    pub action: MergeAction,
}

/// Bookkeeping for one fetch invocation. Owned by the caller and threaded
/// through every recursive call so sibling branches see each other's visits.
#[derive(Debug, Default)]
pub struct FetchState {
    pub visited: BTreeSet<RepoRoot>,
    pub fetched_foreign: BTreeSet<ImportPath>,
    pub merges: Vec<MergeRecord>,
    pub foreign: Vec<ImportPath>,
}

impl FetchState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct Walker<'a, V: Vcs, G: GoToolchain> {
    workspace: &'a Workspace,
    vcs: &'a V,
    go: &'a G,
    dependency_branch: DependencyBranch,
}

impl<'a, V: Vcs, G: GoToolchain> Walker<'a, V, G> {
    pub fn new(
        workspace: &'a Workspace,
        vcs: &'a V,
        go: &'a G,
        dependency_branch: DependencyBranch,
    ) -> Self {
        Self {
            workspace,
            vcs,
            go,
            dependency_branch,
        }
    }

    pub fn fetch_closure(
        &self,
        pkg: &ImportPath,
        branch: &Branch,
        update: bool,
        state: &mut FetchState,
    ) -> Result<(), GostError> {
        let root = pkg.repo_root();
        if state.visited.contains(&root) {
            debug!("{root} already visited, skipping {pkg}");
            return Ok(());
        }

        let exists = self.workspace.exists(&self.workspace.vendor_path(&root));
        let action = self.merge_subtree(&root, branch, update, exists)?;
        state.merges.push(MergeRecord {
            prefix: self.workspace.subtree_prefix(&root),
            root: root.clone(),
            branch: branch.clone(),
            action,
        });
        state.visited.insert(root);

        let dependency_branch = self.dependency_branch.resolve(branch);
        let mut foreign = Vec::new();
        for dep in self.go.list_imports(pkg)? {
            if dep.is_forge_native() {
                self.fetch_closure(&dep, dependency_branch, update, state)?;
            } else {
                foreign.push(dep);
            }
        }

        for dep in foreign {
            if state.fetched_foreign.contains(&dep) {
                continue;
            }
            self.go.get_package(&dep, update)?;
            state.fetched_foreign.insert(dep.clone());
            state.foreign.push(dep);
        }
        Ok(())
    }

    /// Adds or pulls `root` as a squashed subtree. An existing subtree is left
    /// alone unless `update` is set.
    pub fn merge_subtree(
        &self,
        root: &RepoRoot,
        branch: &Branch,
        update: bool,
        exists: bool,
    ) -> Result<MergeAction, GostError> {
        let prefix = self.workspace.subtree_prefix(root);
        let remote = root.remote_url();
        match (exists, update) {
            (true, false) => {
                info!("{prefix} already exists, declining to add as subtree");
                Ok(MergeAction::Skipped)
            }
            (true, true) => {
                self.vcs.subtree_pull(&prefix, &remote, branch)?;
                Ok(MergeAction::Pulled)
            }
            (false, _) => {
                self.vcs.subtree_add(&prefix, &remote, branch)?;
                Ok(MergeAction::Added)
            }
        }
    }
}
