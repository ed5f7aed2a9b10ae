use crate::process::run_git;
use std::path::Path;
use tracing::info;

/// How to publish regenerated outputs.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Pathspecs bounding what may be committed.
    pub allow: Vec<String>,
    pub author_name: String,
    pub author_email: String,
    pub message: String,
    pub remote: String,
    pub branch: String,
    pub push: bool,
    /// Report what would be committed without touching the repository.
    pub dry_run: bool,
}

/// What publishing did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    /// Nothing inside the allow list had changed.
    NoChanges,
    DryRun { files: Vec<String> },
    Committed { files: Vec<String> },
}

/// Commit changed files under the allow list, and optionally push.
///
/// Status is taken with the allow pathspecs, but the add uses the exact
/// paths that came back: `git add` fails on a pathspec that matches
/// nothing, and an allow list routinely has globs with no matches yet.
pub async fn publish(repo: &Path, opts: &PublishOptions) -> crate::Result<Published> {
    // quotePath off keeps non-ASCII file names verbatim in the status
    // output instead of octal-escaped
    let mut status_args = vec![
        "-c".to_string(),
        "core.quotePath=false".to_string(),
        "status".to_string(),
        "--porcelain".to_string(),
        "--".to_string(),
    ];
    status_args.extend(opts.allow.iter().cloned());

    let status = run_git(repo, status_args).await?;
    let files: Vec<String> = status.stdout.lines().filter_map(porcelain_path).collect();

    if files.is_empty() {
        info!("no changes under the allow list, nothing to publish");
        return Ok(Published::NoChanges);
    }

    if opts.dry_run {
        info!("dry run: {} file(s) would be committed", files.len());
        return Ok(Published::DryRun { files });
    }

    let mut add_args = vec!["add".to_string(), "--".to_string()];
    add_args.extend(files.iter().cloned());
    run_git(repo, add_args).await?;

    run_git(
        repo,
        [
            "-c".to_string(),
            format!("user.name={}", opts.author_name),
            "-c".to_string(),
            format!("user.email={}", opts.author_email),
            "commit".to_string(),
            "-m".to_string(),
            opts.message.clone(),
        ],
    )
    .await?;
    info!("committed {} file(s)", files.len());

    if opts.push {
        run_git(repo, ["push", opts.remote.as_str(), opts.branch.as_str()]).await?;
        info!("pushed to {}/{}", opts.remote, opts.branch);
    }

    Ok(Published::Committed { files })
}

/// Pull the pathname out of a `git status --porcelain` line.
///
/// Lines look like `XY path`, or `XY from -> to` for renames. Status runs
/// with `core.quotePath` off, so non-ASCII stays verbatim and C-quoting
/// only appears for quotes, backslashes, and control characters.
fn porcelain_path(line: &str) -> Option<String> {
    if line.len() < 4 {
        return None;
    }
    let mut path = &line[3..];
    if let Some((_, to)) = path.split_once(" -> ") {
        path = to;
    }
    let path = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .map(|p| p.replace("\\\"", "\"").replace("\\\\", "\\"))
        .unwrap_or_else(|| path.to_string());
    Some(path)
}
