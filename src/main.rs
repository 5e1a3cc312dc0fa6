use anyhow::Result;
use clap::{Parser, Subcommand};
use vit::areas::repository::Repository;
use vit::commands::branch::BranchAction;
use vit::commands::reset::ResetMode;

#[derive(Parser)]
#[command(
    name = "vit",
    version,
    about = "A minimal content-addressed version control engine",
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
    #[command(about = "Initialize a repository in the current directory or at the given path")]
    Init {
        #[arg(index = 1, help = "Where to create the repository")]
        path: Option<String>,
    },
    #[command(about = "Stage files or directories")]
    Add {
        #[arg(required = true, help = "Paths to stage")]
        paths: Vec<String>,
    },
    #[command(about = "Show staged, unstaged and untracked changes")]
    Status,
    #[command(about = "Revert a path's index record to what HEAD has")]
    Unstage {
        #[arg(index = 1)]
        path: String,
    },
    #[command(about = "Commit the staged snapshot")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(about = "Show the history reachable from HEAD")]
    Log,
    #[command(about = "Rewrite a working-tree file from its staged blob")]
    Restore {
        #[arg(index = 1)]
        path: String,
    },
    #[command(about = "Move HEAD to a commit")]
    Reset {
        #[arg(long, conflicts_with_all = ["mixed", "hard"], help = "Move HEAD only")]
        soft: bool,
        #[arg(long, help = "Also reset the index (the default)")]
        mixed: bool,
        #[arg(long, conflicts_with = "mixed", help = "Also reset the working tree")]
        hard: bool,
        #[arg(index = 1, help = "The commit digest to reset to")]
        commit: String,
    },
    #[command(about = "List, create or delete branches")]
    Branch {
        #[arg(long, help = "Print the active branch name")]
        show: bool,
        #[arg(short, long, value_name = "NAME", help = "Delete a branch")]
        delete: Option<String>,
        #[arg(index = 1, help = "Create a branch at HEAD")]
        name: Option<String>,
    },
    #[command(about = "Check out a branch, or detach HEAD onto a commit")]
    Switch {
        #[arg(index = 1, help = "Branch name or commit digest")]
        target: String,
    },
    #[command(about = "Compare two revisions")]
    Diff {
        #[arg(index = 1, help = "Branch name or commit digest")]
        left: String,
        #[arg(index = 2, help = "Branch name or commit digest")]
        right: String,
    },
    #[command(about = "Merge a branch into the active one")]
    Merge {
        #[arg(long, help = "Abort a conflicted merge")]
        abort: bool,
        #[arg(index = 1, required_unless_present = "abort")]
        branch: Option<String>,
    },
    #[command(about = "Shelve the working tree, or manage shelved snapshots")]
    Stash {
        #[arg(long, help = "Restore and drop the newest entry")]
        pop: bool,
        #[arg(long, help = "List the stash chain")]
        list: bool,
        #[arg(long, help = "Diff the newest entry against its base commit")]
        show: bool,
    },
    #[command(about = "Delete objects unreachable from any ref")]
    Gc,
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::discover(&pwd, Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => {
            let root = match path {
                Some(path) => std::path::PathBuf::from(path),
                None => std::env::current_dir()?,
            };
            Repository::at(&root, Box::new(std::io::stdout()))?.init()?;
        }
        Commands::Add { paths } => open_repository()?.add(&paths)?,
        Commands::Status => open_repository()?.status()?,
        Commands::Unstage { path } => open_repository()?.unstage(&path)?,
        Commands::Commit { message } => open_repository()?.commit(&message)?,
        Commands::Log => open_repository()?.log()?,
        Commands::Restore { path } => open_repository()?.restore(&path)?,
        Commands::Reset {
            soft,
            mixed: _,
            hard,
            commit,
        } => {
            let mode = if soft {
                ResetMode::Soft
            } else if hard {
                ResetMode::Hard
            } else {
                ResetMode::Mixed
            };
            open_repository()?.reset(&commit, mode)?;
        }
        Commands::Branch { show, delete, name } => {
            let action = if show {
                BranchAction::Show
            } else if let Some(name) = delete {
                BranchAction::Delete(name)
            } else if let Some(name) = name {
                BranchAction::Create(name)
            } else {
                BranchAction::List
            };
            open_repository()?.branch(action)?;
        }
        Commands::Switch { target } => open_repository()?.switch(&target)?,
        Commands::Diff { left, right } => open_repository()?.diff(&left, &right)?,
        Commands::Merge { abort, branch } => {
            let repository = open_repository()?;
            match branch {
                _ if abort => repository.merge_abort()?,
                Some(branch) => repository.merge(&branch)?,
                None => unreachable!("clap requires a branch unless --abort is given"),
            }
        }
        Commands::Stash { pop, list, show } => {
            let repository = open_repository()?;
            if pop {
                repository.stash_pop()?;
            } else if list {
                repository.stash_list()?;
            } else if show {
                repository.stash_show()?;
            } else {
                repository.stash_push()?;
            }
        }
        Commands::Gc => open_repository()?.gc()?,
    }

    Ok(())
}
