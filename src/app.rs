use serde::Serialize;

use crate::config::GetOptions;
use crate::domain::{Branch, ImportPath, RepoRoot, require_forge_native};
use crate::error::GostError;
use crate::golang::GoToolchain;
use crate::sanitize::{SanitizeReport, sanitize};
use crate::vcs::Vcs;
use crate::walker::{FetchState, MergeRecord, Walker};
use crate::workspace::{SCAFFOLD_FILES, SOURCE_DIR, Workspace};

#[derive(Debug, Clone, Serialize)]
pub struct InitResult {
    pub root: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub package: ImportPath,
    pub branch: Branch,
    pub fetched_at: String,
    pub merges: Vec<MergeRecord>,
    pub foreign: Vec<ImportPath>,
    pub visited: Vec<RepoRoot>,
    pub sanitize: SanitizeReport,
    pub committed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushResult {
    pub items: Vec<PushItemResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushItemResult {
    pub package: ImportPath,
    pub root: RepoRoot,
    pub prefix: String,
    pub pushed: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

fn emit(sink: &dyn ProgressSink, message: impl Into<String>) {
    sink.event(ProgressEvent {
        message: message.into(),
    });
}

#[derive(Clone)]
pub struct App<V: Vcs, G: GoToolchain> {
    workspace: Workspace,
    vcs: V,
    go: G,
}

impl<V: Vcs, G: GoToolchain> App<V, G> {
    pub fn new(workspace: Workspace, vcs: V, go: G) -> Self {
        Self { workspace, vcs, go }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Turns the workspace root into a fresh gost repository.
    pub fn init(&self, sink: &dyn ProgressSink) -> Result<InitResult, GostError> {
        self.workspace.require_uninitialized()?;

        emit(sink, "phase=Init; git init");
        self.vcs.init()?;

        let mut files = Vec::new();
        for (name, content) in SCAFFOLD_FILES {
            let path = self.workspace.write_new_file(name, content)?;
            self.vcs.add_path(name)?;
            self.vcs
                .commit(&[name], &format!("[gost] Initialized {name}"))?;
            emit(sink, format!("phase=Init; initialized and committed {name}"));
            files.push(path.to_string());
        }

        Ok(InitResult {
            root: self.workspace.root().to_string(),
            files,
        })
    }

    /// Vendors `pkg` and its whole dependency closure, then commits `src`.
    ///
    /// Any failure during the walk aborts before anything is staged.
    pub fn get(
        &self,
        pkg: &ImportPath,
        branch: &Branch,
        options: &GetOptions,
        sink: &dyn ProgressSink,
    ) -> Result<FetchResult, GostError> {
        self.workspace.require_initialized()?;
        require_forge_native(pkg)?;

        emit(sink, format!("phase=Resolve; {pkg} on branch {branch}"));
        let walker = Walker::new(
            &self.workspace,
            &self.vcs,
            &self.go,
            options.dependency_branch.clone(),
        );
        let mut state = FetchState::new();
        walker.fetch_closure(pkg, branch, options.update, &mut state)?;
        emit(
            sink,
            format!(
                "phase=Merge; {} repositories, {} foreign packages",
                state.visited.len(),
                state.foreign.len()
            ),
        );

        emit(sink, "phase=Sanitize; removing nested git folders");
        let report = sanitize(&self.workspace.source_root());

        self.vcs.add_path(SOURCE_DIR)?;
        let committed = self.vcs.has_staged_changes()?;
        if committed {
            self.vcs.commit(
                &[],
                &format!("[gost] Added {pkg} and its dependencies"),
            )?;
            emit(sink, "phase=Commit; committed vendored sources");
        } else {
            emit(sink, "phase=Commit; nothing changed");
        }

        Ok(FetchResult {
            package: pkg.clone(),
            branch: branch.clone(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
            merges: state.merges,
            foreign: state.foreign,
            visited: state.visited.into_iter().collect(),
            sanitize: report,
            committed,
        })
    }

    /// Pushes a vendored repository back to its remote. A package of two
    /// segments or fewer pushes every subdirectory beneath it instead; those
    /// individual failures are reported, not raised.
    pub fn push(
        &self,
        pkg: &ImportPath,
        branch: &Branch,
        sink: &dyn ProgressSink,
    ) -> Result<PushResult, GostError> {
        self.workspace.require_initialized()?;
        require_forge_native(pkg)?;

        if pkg.segments().count() > 2 {
            emit(sink, format!("phase=Push; single package {pkg}"));
            let item = self.push_one(pkg, branch)?;
            return Ok(PushResult { items: vec![item] });
        }

        emit(sink, format!("phase=Push; all subpackages of {pkg}"));
        let mut items = Vec::new();
        for sub in self.workspace.list_subpackages(pkg)? {
            let root = sub.repo_root();
            match self.push_one(&sub, branch) {
                Ok(item) => items.push(item),
                Err(err) => {
                    tracing::warn!("unable to push package {sub}: {err}");
                    items.push(PushItemResult {
                        prefix: self.workspace.subtree_prefix(&root),
                        package: sub,
                        root,
                        pushed: false,
                        error: Some(err.to_string()),
                    });
                }
            }
        }
        Ok(PushResult { items })
    }

    fn push_one(&self, pkg: &ImportPath, branch: &Branch) -> Result<PushItemResult, GostError> {
        let root = pkg.repo_root();
        let prefix = self.workspace.subtree_prefix(&root);
        self.vcs.subtree_push(&prefix, &root.remote_url(), branch)?;
        Ok(PushItemResult {
            package: pkg.clone(),
            root,
            prefix,
            pushed: true,
            error: None,
        })
    }
}
