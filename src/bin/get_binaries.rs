use clap::Parser;

use ctp7_release_tools::{
    Result,
    cli::FetchArgs,
    fetcher::{AssetFetcher, FetcherConfig, HttpAssetSource},
    logger,
    manifest::Manifest,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = FetchArgs::parse();

    logger::init(false)?;

    let manifest = Manifest::load(&args.uploads)?;

    let fetcher = AssetFetcher::new(
        FetcherConfig::from_env(),
        Box::new(HttpAssetSource::new()),
    )?;

    fetcher.fetch_all(&args.tag, &manifest).await?;

    Ok(())
}
