//! Terminal logger setup shared by the release tool binaries.
use crate::result::Result;

/// Initialize terminal logging filtered to this crate. Verbose mode
/// lowers the filter to debug.
pub fn init(verbose: bool) -> Result<()> {
    let filter = if verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("ctp7_release_tools")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}
