use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use media_request_core::SearchAggregator;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Catalog {
    Movies,
    Tv,
    All,
}

pub async fn run_search(catalog: Catalog, name: &str, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = super::load_config(config_path)?;
    let search = SearchAggregator::new(super::connect(&config).await?);

    let results = match catalog {
        Catalog::Movies => search.search_movies(name).await.wrap_err("Movie search failed")?,
        Catalog::Tv => search.search_tv(name).await.wrap_err("TV search failed")?,
        Catalog::All => search.search_all(name).await,
    };

    output.search_results(&results);
    Ok(())
}
