use crate::constants::WORKSPACE_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pagesmith: version, preview and export generated web projects
#[derive(Parser, Debug)]
#[command(name = "pagesmith", about, long_about = None, version)]
pub struct Cli {
    /// workspace file holding the project files and history
    #[arg(long, global = true, default_value = WORKSPACE_FILE)]
    pub workspace: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// start a new history, discarding any existing one
    Init {
        /// do not ask before discarding existing commits
        #[arg(long)]
        force: bool,
    },

    /// show staged and unstaged changes against HEAD
    Status,

    /// stage files for the next commit
    Stage {
        /// file names to stage
        #[arg(required_unless_present = "all")]
        names: Vec<String>,

        /// stage every changed file
        #[arg(long, conflicts_with = "names")]
        all: bool,
    },

    /// remove files from the staging set
    Unstage {
        /// file names to unstage
        #[arg(required_unless_present = "all")]
        names: Vec<String>,

        /// unstage everything
        #[arg(long, conflicts_with = "names")]
        all: bool,
    },

    /// record the staged files as a new commit
    Commit {
        /// commit message (prompted for when omitted)
        #[arg(short, long)]
        message: Option<String>,

        /// commit author (defaults to $PAGESMITH_AUTHOR or "User")
        #[arg(long)]
        author: Option<String>,

        /// write the message in $EDITOR
        #[arg(long, conflicts_with = "message")]
        long: bool,
    },

    /// list commits, newest first
    Log,

    /// list the files captured by a commit
    Show {
        /// commit id
        id: String,
    },

    /// merge the files from a model response into the project
    Apply {
        /// response text file, or "-" for stdin
        response: PathBuf,
    },

    /// add or replace a project file from disk
    Add {
        /// file to read
        path: PathBuf,

        /// name inside the project (defaults to the file name)
        #[arg(long)]
        name: Option<String>,

        /// store the content base64-encoded (images, audio, video)
        #[arg(long)]
        binary: bool,
    },

    /// remove a project file
    Rm {
        /// file name
        name: String,
    },

    /// mount a sandboxed preview of the project until quit
    Preview {
        /// report clicked elements and highlight them
        #[arg(long)]
        debug: bool,

        /// present a phone-like device to the page
        #[arg(long)]
        mobile: bool,

        /// also copy the composed document here on every reload
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// export the project
    #[command(subcommand)]
    Export(ExportCommand),

    /// manage saved projects
    #[command(subcommand)]
    Project(ProjectCommand),
}

#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// zip archive with one entry per file
    Zip { out: PathBuf },

    /// single self-contained html document
    Html { out: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// save the current files under a name (replaces a project of that name)
    Save { name: String },

    /// list saved projects
    List,

    /// replace the current files with a saved project
    Load { id: String },

    /// delete a saved project
    Delete { id: String },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
