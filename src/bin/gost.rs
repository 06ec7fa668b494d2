use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use gost::app::App;
use gost::config::{ConfigLoader, GetOptions};
use gost::domain::{Branch, DependencyBranch, ImportPath};
use gost::error::GostError;
use gost::golang::SystemGo;
use gost::output::{JsonOutput, OutputMode, TextOutput};
use gost::vcs::SystemGit;
use gost::workspace::Workspace;

#[derive(Parser)]
#[command(name = "gost")]
#[command(about = "Like go get, except that all github dependencies are imported as git subtrees")]
#[command(version, author)]
struct Cli {
    /// Print machine-readable JSON results on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Workspace root to use instead of $GOPATH
    #[arg(long, global = true, value_name = "DIR")]
    gopath: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Initialize a git repo in the current directory and set GOPATH to here")]
    Init,
    #[command(about = "Import a package and its dependencies, github repos as subtrees")]
    Get(GetArgs),
    #[command(about = "Push the subtree(s) for a package back to github")]
    Push(PushArgs),
}

#[derive(Args)]
struct GetArgs {
    package: String,
    branch: String,

    /// Update existing subtrees from their remotes
    #[arg(short = 'u', long)]
    update: bool,

    /// Merge dependencies from this branch instead of <BRANCH>
    #[arg(long, value_name = "BRANCH")]
    deps_branch: Option<String>,
}

#[derive(Args)]
struct PushArgs {
    package: String,
    branch: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(gost) = report.downcast_ref::<GostError>() {
            return ExitCode::from(map_exit_code(gost));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &GostError) -> u8 {
    match error {
        GostError::MissingGopath
        | GostError::NotAWorkspace { .. }
        | GostError::AlreadyInitialized { .. }
        | GostError::InvalidImportPath(_)
        | GostError::InvalidBranch(_)
        | GostError::UnsupportedHost(_) => 2,
        GostError::Git { .. } | GostError::Go { .. } | GostError::ToolSpawn { .. } => 3,
        GostError::Filesystem(_) => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    match cli.command {
        Commands::Init => {
            let workspace = match cli.gopath.as_deref() {
                Some(root) => ConfigLoader::resolve_with(Some(root), None)?,
                None => Workspace::current_dir()?,
            };
            run_init(build_app(workspace), output_mode)
        }
        Commands::Get(args) => {
            let workspace = ConfigLoader::resolve(cli.gopath.as_deref())?;
            run_get(args, build_app(workspace), output_mode)
        }
        Commands::Push(args) => {
            let workspace = ConfigLoader::resolve(cli.gopath.as_deref())?;
            run_push(args, build_app(workspace), output_mode)
        }
    }
}

fn build_app(workspace: Workspace) -> App<SystemGit, SystemGo> {
    let git = SystemGit::new(workspace.root().to_path_buf());
    let go = SystemGo::new(workspace.root().to_path_buf());
    App::new(workspace, git, go)
}

fn run_init(app: App<SystemGit, SystemGo>, output_mode: OutputMode) -> miette::Result<()> {
    match output_mode {
        OutputMode::Json => {
            let result = app.init(&JsonOutput)?;
            JsonOutput::print_init(&result).into_diagnostic()?;
        }
        OutputMode::Text => {
            let result = app.init(&TextOutput)?;
            TextOutput::print_init(&result);
        }
    }
    Ok(())
}

fn run_get(
    args: GetArgs,
    app: App<SystemGit, SystemGo>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let GetArgs {
        package,
        branch,
        update,
        deps_branch,
    } = args;

    let package = package.parse::<ImportPath>()?;
    let branch = branch.parse::<Branch>()?;
    let dependency_branch = match deps_branch {
        Some(value) => DependencyBranch::Pinned(value.parse()?),
        None => DependencyBranch::Inherit,
    };
    tracing::info!("Using branch {branch}");

    let options = GetOptions {
        update,
        dependency_branch,
    };
    match output_mode {
        OutputMode::Json => {
            let result = app.get(&package, &branch, &options, &JsonOutput)?;
            JsonOutput::print_fetch(&result).into_diagnostic()?;
        }
        OutputMode::Text => {
            let result = app.get(&package, &branch, &options, &TextOutput)?;
            TextOutput::print_fetch(&result);
        }
    }
    Ok(())
}

fn run_push(
    args: PushArgs,
    app: App<SystemGit, SystemGo>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let package = args.package.parse::<ImportPath>()?;
    let branch = args.branch.parse::<Branch>()?;
    tracing::info!("Using branch {branch}");

    match output_mode {
        OutputMode::Json => {
            let result = app.push(&package, &branch, &JsonOutput)?;
            JsonOutput::print_push(&result).into_diagnostic()?;
        }
        OutputMode::Text => {
            let result = app.push(&package, &branch, &TextOutput)?;
            TextOutput::print_push(&result);
        }
    }
    Ok(())
}
