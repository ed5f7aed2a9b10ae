use anyhow::Result;
use mods::Druid;
use rollconf::RollConfig;

use crate::build::{build, BuildOptions};

/// Commit message for scheduled regenerations.
pub fn default_message() -> String {
    format!(
        "Regenerate roll catalog ({})",
        chrono::Utc::now().format("%Y-%m-%d")
    )
}

/// The full scheduled job: sync sources, build every roll in the roster,
/// publish the outputs. Each step must succeed before the next runs, so a
/// partial build is never committed.
pub async fn run(
    config: &RollConfig,
    roster: &[Druid],
    build_opts: &BuildOptions,
    publish_opts: &rollpub::PublishOptions,
) -> Result<rollpub::Published> {
    crate::sync(config, None).await?;
    build(config, roster, build_opts).await?;
    let published = rollpub::publish(&config.paths.root, publish_opts).await?;
    Ok(published)
}
