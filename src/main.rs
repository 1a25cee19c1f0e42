use anyhow::Result;
use clap::Parser;

use brick::cli::{self, CliArgs};
use brick::config::BrickConfig;
use brick::templates::TemplateCatalog;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    brick::tracing::init();

    let config = BrickConfig::load();
    let catalog = TemplateCatalog::load();
    tracing::debug!(templates = catalog.len(), "starting {:?}", args.command);

    let output = cli::run(&args, &config, catalog)?;
    print!("{}", output);
    if args.json {
        println!();
    }
    Ok(())
}
