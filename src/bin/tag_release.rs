use clap::Parser;

use ctp7_release_tools::{
    Result,
    cli::PublishArgs,
    exec::SystemRunner,
    logger,
    manifest::Manifest,
    publisher::{ReleasePublisher, ReleaseRequest},
};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = PublishArgs::parse();

    logger::init(args.verbose)?;

    let Some(options) = args.validated()? else {
        return Ok(());
    };

    let request = ReleaseRequest::from_options(&options)?;

    let uploads = options
        .uploads
        .as_deref()
        .map(Manifest::load)
        .transpose()?;

    let publisher =
        ReleasePublisher::new(&options, Box::new(SystemRunner::new()));

    publisher.publish(&request, uploads.as_ref())
}
