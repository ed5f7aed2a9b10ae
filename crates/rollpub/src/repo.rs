use crate::process::run_git;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Make sure `target` holds a current checkout of `url`: fast-forward an
/// existing clone, otherwise clone shallowly. The source repository is
/// large and its history is not needed here.
pub async fn clone_or_update(url: &str, target: &Path) -> crate::Result<()> {
    if target.join(".git").is_dir() {
        info!("updating checkout in {}", target.display());
        run_git(target, ["pull", "--ff-only"]).await?;
        return Ok(());
    }

    let parent = match target.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => Path::new("."),
    };
    fs::create_dir_all(parent).await?;

    info!("cloning {} into {}", url, target.display());
    let dest = target.display().to_string();
    run_git(parent, ["clone", "--depth", "1", url, dest.as_str()]).await?;
    Ok(())
}
