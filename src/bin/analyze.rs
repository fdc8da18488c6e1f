use anyhow::{Context, Result};
use shelfmark::{Analyzer, CategoryModel, config::Config};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let url = std::env::args().nth(1).context("usage: analyze <url>")?;

    // Load configuration and the frozen model
    let config = Config::from_env()?;
    let model = CategoryModel::load(config.model_dir())
        .with_context(|| format!("loading model from {}", config.model_dir().display()))?;

    let analyzer = Analyzer::from_config(&config, Arc::new(model));
    let analysis = analyzer.analyze(&url).await?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
