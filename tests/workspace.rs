use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use gost::domain::ImportPath;
use gost::error::GostError;
use gost::workspace::{GIT_DIR, GOST_FILE, Workspace};

fn temp_workspace() -> (tempfile::TempDir, Workspace) {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    (temp, Workspace::new(root))
}

#[test]
fn vendor_path_is_deterministic() {
    let (_temp, workspace) = temp_workspace();
    let a: ImportPath = "github.com/a/b/cmd".parse().unwrap();
    let b: ImportPath = "github.com/a/b/lib".parse().unwrap();
    assert_eq!(
        workspace.vendor_path(&a.repo_root()),
        workspace.vendor_path(&b.repo_root())
    );
    assert!(
        workspace
            .vendor_path(&a.repo_root())
            .starts_with(workspace.source_root())
    );
}

#[test]
fn initialized_requires_marker_and_git_dir() {
    let (_temp, workspace) = temp_workspace();
    assert_matches!(
        workspace.require_initialized(),
        Err(GostError::NotAWorkspace { file, .. }) if file == GOST_FILE
    );

    std::fs::write(workspace.root().join(GOST_FILE).as_std_path(), "").unwrap();
    assert_matches!(
        workspace.require_initialized(),
        Err(GostError::NotAWorkspace { file, .. }) if file == GIT_DIR
    );

    std::fs::create_dir(workspace.root().join(GIT_DIR).as_std_path()).unwrap();
    assert!(workspace.require_initialized().is_ok());
    assert_matches!(
        workspace.require_uninitialized(),
        Err(GostError::AlreadyInitialized { .. })
    );
}

#[test]
fn write_new_file_never_overwrites() {
    let (_temp, workspace) = temp_workspace();
    workspace.write_new_file(".gitignore", "bin\n").unwrap();
    let err = workspace.write_new_file(".gitignore", "pkg\n").unwrap_err();
    assert_matches!(err, GostError::AlreadyInitialized { .. });
    let content = std::fs::read_to_string(workspace.root().join(".gitignore").as_std_path()).unwrap();
    assert_eq!(content, "bin\n");
}

#[test]
fn list_subpackages_skips_files() {
    let (_temp, workspace) = temp_workspace();
    let owner: ImportPath = "github.com/acme".parse().unwrap();
    let dir = workspace.package_dir(&owner);
    std::fs::create_dir_all(dir.join("zeta").as_std_path()).unwrap();
    std::fs::create_dir_all(dir.join("alpha").as_std_path()).unwrap();
    std::fs::write(dir.join("notes.txt").as_std_path(), "").unwrap();

    let subs = workspace.list_subpackages(&owner).unwrap();
    let names = subs.iter().map(ImportPath::as_str).collect::<Vec<_>>();
    assert_eq!(names, vec!["github.com/acme/alpha", "github.com/acme/zeta"]);
}
