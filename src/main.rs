use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use twig::areas::repository::Repository;
use twig::artifacts::core::{PagerWriter, should_page};
use twig::config;
use twig::errors::{EXIT_FATAL, RepoError};

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small content-addressed version control system",
    long_about = "twig keeps the history of a directory as immutable, content-addressed \
    objects (blobs, trees and commits) plus a small set of mutable pointers: \
    branches, HEAD and the staging index.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create an empty repository",
        long_about = "This command initializes a repository in the current directory or at the specified path. \
        Running it in an existing repository is safe."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(name = "add", about = "Stage file contents for the next commit")]
    Add {
        #[arg(required = true, help = "Files or directories to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(name = "rm", about = "Stop tracking files")]
    Rm {
        #[arg(long, help = "Only remove the paths from the index, keep the working files")]
        cached: bool,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Record the staged snapshot as a new commit",
        long_about = "This command creates a new commit from the index. The author is read from \
        TWIG_AUTHOR_NAME and TWIG_AUTHOR_EMAIL, the date from TWIG_AUTHOR_DATE when set."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show commit history")]
    Log {
        #[arg(index = 1, help = "Revision to start from, HEAD by default")]
        revision: Option<String>,
        #[arg(long, help = "One line per commit")]
        oneline: bool,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status {
        #[arg(long, help = "Machine-readable two-column output")]
        porcelain: bool,
    },
    #[command(name = "diff", about = "Show unstaged or staged changes")]
    Diff {
        #[arg(long, alias = "staged", help = "Compare the index with HEAD")]
        cached: bool,
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "checkout",
        about = "Switch to a branch or commit, or restore files from the index",
        long_about = "With a revision, moves HEAD there and updates the index and working tree, \
        refusing when local changes would be lost. With paths after '--', overwrites those \
        working files with their staged content."
    )]
    Checkout {
        #[arg(index = 1, required_unless_present = "paths")]
        target: Option<String>,
        #[arg(index = 2, last = true)]
        paths: Vec<PathBuf>,
    },
    #[command(name = "branch", about = "List, create or delete branches")]
    Branch {
        #[arg(short = 'd', long = "delete", requires = "name", help = "Delete the branch")]
        delete: bool,
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(index = 2, conflicts_with = "delete", help = "Revision the new branch starts at")]
        start: Option<String>,
    },
    #[command(
        name = "reset",
        about = "Reset HEAD, index and working tree to a commit",
        long_about = "This command moves the current branch to the given revision and forces the \
        index and working tree to match it. Local changes to tracked files are discarded."
    )]
    Reset {
        #[arg(index = 1, default_value = "HEAD")]
        revision: String,
    },
    #[command(name = "merge-base", about = "Find the best common ancestor of two commits")]
    MergeBase {
        #[arg(index = 1)]
        first: String,
        #[arg(index = 2)]
        second: String,
    },
}

fn main() -> ExitCode {
    if let Err(e) = config::init_logging() {
        eprintln!("warning: {e}");
    }

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn run(command: Commands) -> Result<()> {
    let pwd = std::env::current_dir()?;

    if let Commands::Init { path } = &command {
        let path = path.clone().unwrap_or(pwd);
        return Repository::new(&path, Box::new(std::io::stdout()))?.init();
    }

    let pager = matches!(command, Commands::Log { .. } if should_page()).then(Pager::new);
    let writer: Box<dyn Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };
    let repository = Repository::discover(&pwd, writer)?;

    match command {
        Commands::Init { .. } => repository.init()?,
        Commands::Add { paths } => repository.add(&paths)?,
        Commands::Rm { cached, paths } => repository.rm(&paths, cached)?,
        Commands::Commit { message } => repository.commit(&message)?,
        Commands::Log { revision, oneline } => repository.log(revision.as_deref(), oneline)?,
        Commands::Status { porcelain } => repository.status(porcelain)?,
        Commands::Diff { cached, paths } => repository.diff(cached, &paths)?,
        Commands::Checkout { target, paths } => match target {
            Some(target) if paths.is_empty() => repository.checkout(&target)?,
            Some(target) => anyhow::bail!("cannot combine revision '{target}' with paths"),
            None => repository.checkout_paths(&paths)?,
        },
        Commands::Branch {
            delete,
            name,
            start,
        } => match name {
            Some(name) if delete => repository.delete_branch(&name)?,
            Some(name) => repository.create_branch(&name, start.as_deref())?,
            None => repository.list_branches()?,
        },
        Commands::Reset { revision } => repository.reset(&revision)?,
        Commands::MergeBase { first, second } => repository.merge_base(&first, &second)?,
    }

    repository.writer().flush()?;
    if let Some(pager) = pager {
        minus::page_all(pager)?;
    }

    Ok(())
}

/// Print an error the way its kind calls for and pick the exit code
fn report(err: anyhow::Error) -> ExitCode {
    let code = match err.downcast_ref::<RepoError>() {
        Some(repo_error) if repo_error.is_recoverable() => {
            eprintln!("{repo_error}");
            repo_error.exit_code()
        }
        Some(repo_error) => {
            eprintln!("fatal: {err:#}");
            repo_error.exit_code()
        }
        None => {
            eprintln!("fatal: {err:#}");
            EXIT_FATAL
        }
    };

    ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))
}
