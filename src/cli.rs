//! CLI argument parsing for the release publishing and retrieval tools.
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use crate::result::Result;

/// Arguments for the tag-release binary.
#[derive(Parser, Debug)]
#[command(
    name = "tag-release",
    version,
    about = "Tag the code, create a GitHub release, and upload release \
             assets"
)]
pub struct PublishArgs {
    /// GitHub user name.
    #[arg(short, long)]
    pub user: Option<String>,

    /// GitHub repo name.
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Tag name.
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Release name, defaults to tag name.
    #[arg(short = 'n', long = "release_name")]
    pub release_name: Option<String>,

    /// Release description file name.
    #[arg(short, long)]
    pub description: Option<PathBuf>,

    /// Mark as pre-release.
    #[arg(short, long)]
    pub prerelease: bool,

    /// Manifest file mapping asset names to the local files to upload.
    #[arg(short = 'l', long)]
    pub uploads: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Fully validated options for a publish run.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub user: String,
    pub repo: String,
    pub tag: String,
    pub release_name: Option<String>,
    pub description: Option<PathBuf>,
    pub prerelease: bool,
    pub uploads: Option<PathBuf>,
    pub verbose: bool,
}

impl PublishArgs {
    /// Require the user, repo, and tag flags. When any is missing, print
    /// an informational message plus usage and return None so the caller
    /// can exit cleanly before any side effect.
    pub fn validated(self) -> Result<Option<PublishOptions>> {
        let (Some(user), Some(repo), Some(tag)) =
            (self.user, self.repo, self.tag)
        else {
            println!("Please provide a user name, repository name and tag");
            Self::command().print_help()?;
            return Ok(None);
        };

        Ok(Some(PublishOptions {
            user,
            repo,
            tag,
            release_name: self.release_name,
            description: self.description,
            prerelease: self.prerelease,
            uploads: self.uploads,
            verbose: self.verbose,
        }))
    }
}

/// Arguments for the get-binaries binary.
#[derive(Parser, Debug)]
#[command(
    name = "get-binaries",
    version,
    about = "Download release assets for a tag into local destinations"
)]
pub struct FetchArgs {
    /// Tag name.
    #[arg(short, long)]
    pub tag: String,

    /// Manifest file mapping asset names to local destination paths.
    #[arg(short = 'l', long)]
    pub uploads: PathBuf,
}
