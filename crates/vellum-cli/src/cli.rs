use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vellum",
    about = "Vellum — a document vault over a hash-addressed remote store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Server to connect to for vault commands.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8744")]
    pub server: String,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the vault server
    Serve(ServeArgs),
    /// Print the vault tree
    Tree(TreeArgs),
    /// Print a document's raw content
    Cat(PathArg),
    /// Print a document's parsed frontmatter and body
    Doc(PathArg),
    /// Create or overwrite a file or folder
    Put(PutArgs),
    /// Rename a file or directory in place
    Mv(MvArgs),
    /// Delete a file or a whole directory
    Rm(PathArg),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file; defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address.
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Subtree to list; the vault root when omitted.
    pub path: Option<String>,
}

#[derive(Args)]
pub struct PathArg {
    pub path: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub path: String,
    /// Read content from this local file; stdin when omitted.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Create a folder (marker blob) instead of a file.
    #[arg(long)]
    pub folder: bool,
}

#[derive(Args)]
pub struct MvArgs {
    pub old_path: String,
    pub new_name: String,
}
