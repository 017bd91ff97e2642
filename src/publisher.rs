//! Release publication: tagging, release creation, and asset upload.
//!
//! Publication is three sequential steps with no rollback: a failed
//! release does not undo the tag, and a failed upload does not undo the
//! uploads before it.
use log::*;
use std::fs;

use color_eyre::eyre::WrapErr;

use crate::{
    cli::PublishOptions,
    error::ReleaseToolError,
    exec::CommandRunner,
    manifest::Manifest,
    result::Result,
};

/// External tool handling release creation and asset upload.
pub const RELEASE_TOOL: &str = "github-release";

/// Description used when no description file is supplied.
pub const DEFAULT_DESCRIPTION: &str = "None";

/// Release descriptor assembled from CLI options, handed once to the
/// external tool and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub tag: String,
    pub name: String,
    pub description: String,
    pub prerelease: bool,
}

impl ReleaseRequest {
    /// Build the release descriptor: the name falls back to the tag and
    /// the description is read from the given file, or defaults to the
    /// literal "None".
    pub fn from_options(options: &PublishOptions) -> Result<Self> {
        let name = options
            .release_name
            .clone()
            .unwrap_or_else(|| options.tag.clone());

        let description = match &options.description {
            Some(path) => fs::read_to_string(path).wrap_err_with(|| {
                format!(
                    "failed to read description file: {}",
                    path.display()
                )
            })?,
            None => DEFAULT_DESCRIPTION.to_string(),
        };

        Ok(Self {
            tag: options.tag.clone(),
            name,
            description,
            prerelease: options.prerelease,
        })
    }
}

/// Publishes releases by driving git and the github-release tool through
/// a [`CommandRunner`].
pub struct ReleasePublisher {
    user: String,
    repo: String,
    verbose: bool,
    runner: Box<dyn CommandRunner>,
}

impl ReleasePublisher {
    pub fn new(
        options: &PublishOptions,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            user: options.user.clone(),
            repo: options.repo.clone(),
            verbose: options.verbose,
            runner,
        }
    }

    /// Run the full publication sequence: tag, release, then uploads when
    /// a manifest was supplied.
    pub fn publish(
        &self,
        request: &ReleaseRequest,
        uploads: Option<&Manifest>,
    ) -> Result<()> {
        self.create_tag(&request.tag)?;
        self.create_release(request)?;

        if let Some(manifest) = uploads {
            self.upload_assets(&request.tag, manifest)?;
        }

        Ok(())
    }

    /// Create the git tag and push all tags to the remote. A failure in
    /// either command aborts publication.
    pub fn create_tag(&self, tag: &str) -> Result<()> {
        if self.verbose {
            debug!("existing tags");
            self.run_unchecked("git", &to_args(&["tag", "-l"]));
            debug!("adding tag {tag}");
        }

        self.run_checked("git", &to_args(&["tag", tag]))?;
        self.run_checked("git", &to_args(&["push", "--tags"]))
    }

    /// Create the release record, then echo the resulting release list.
    pub fn create_release(&self, request: &ReleaseRequest) -> Result<()> {
        if self.verbose {
            debug!("existing releases");
            self.run_unchecked(RELEASE_TOOL, &self.info_args());
            debug!("adding release {}", request.name);
        }

        let mut args = to_args(&[
            "release",
            "-u",
            &self.user,
            "-r",
            &self.repo,
            "--tag",
            &request.tag,
            "--name",
            &request.name,
            "--description",
            &request.description,
        ]);

        if request.prerelease {
            args.push("-p".to_string());
        }

        self.run_checked(RELEASE_TOOL, &args)?;

        self.run_unchecked(RELEASE_TOOL, &self.info_args());

        Ok(())
    }

    /// Upload every manifest entry to the release. Paths are used exactly
    /// as written in the manifest. A failed upload is logged and the
    /// remaining entries are still attempted.
    pub fn upload_assets(&self, tag: &str, manifest: &Manifest) -> Result<()> {
        for entry in manifest.entries() {
            if self.verbose {
                debug!("uploading file {}", entry.path);
            }

            info!("uploading {} from {}", entry.name, entry.path);

            let args = to_args(&[
                "upload",
                "-u",
                &self.user,
                "-r",
                &self.repo,
                "-t",
                tag,
                "-n",
                &entry.name,
                "-f",
                &entry.path,
            ]);

            if let Err(err) = self.run_checked(RELEASE_TOOL, &args) {
                error!("upload of {} failed: {err:#}", entry.name);
            }
        }

        Ok(())
    }

    fn info_args(&self) -> Vec<String> {
        to_args(&["info", "-u", &self.user, "-r", &self.repo])
    }

    fn run_checked(&self, program: &str, args: &[String]) -> Result<()> {
        let status = self.runner.run(program, args)?;

        if !status.success() {
            return Err(ReleaseToolError::CommandFailed {
                command: format!("{program} {}", args.join(" ")),
                status,
            }
            .into());
        }

        Ok(())
    }

    /// Informational invocations only: a failure is logged and ignored.
    fn run_unchecked(&self, program: &str, args: &[String]) {
        match self.runner.run(program, args) {
            Ok(status) if !status.success() => {
                debug!("{program} reported {status}");
            }
            Err(err) => debug!("failed to run {program}: {err:#}"),
            Ok(_) => {}
        }
    }
}

fn to_args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}
