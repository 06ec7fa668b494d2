use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GostError {
    #[error("invalid import path: {0}")]
    InvalidImportPath(String),

    #[error("invalid branch name: {0}")]
    InvalidBranch(String),

    #[error("gost only supports github.com packages, got {0}")]
    UnsupportedHost(String),

    #[error("GOPATH is not set")]
    #[diagnostic(help("set GOPATH to your gost workspace or pass --gopath"))]
    MissingGopath,

    #[error("unable to find '{file}' in the GOPATH '{root}'")]
    #[diagnostic(help("make sure you've run `gost init` within your GOPATH"))]
    NotAWorkspace { root: Utf8PathBuf, file: String },

    #[error("{root} already contains {file}, can't initialize gost")]
    AlreadyInitialized { root: Utf8PathBuf, file: String },

    #[error("{command} says {output}")]
    Git { command: String, output: String },

    #[error("{command} says {output}")]
    Go { command: String, output: String },

    #[error("failed to run {program}: {message}")]
    ToolSpawn { program: String, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
