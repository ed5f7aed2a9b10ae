use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured output of a successful git command.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run a git command in `workdir` and capture its output. A nonzero exit
/// becomes an error carrying the command line and trimmed stderr.
pub async fn run_git<I, S>(workdir: &Path, args: I) -> crate::Result<GitOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
    debug!("git {} (in {})", args.join(" "), workdir.display());

    let output = Command::new("git")
        .args(&args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(crate::GitError::CommandFailed {
            command: args.join(" "),
            code: output.status.code().unwrap_or(-1),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(GitOutput { stdout, stderr })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_git_version() {
        let output = run_git(Path::new("."), ["--version"]).await.unwrap();
        assert!(output.stdout.starts_with("git version"));
    }

    #[tokio::test]
    async fn test_failed_command_carries_context() {
        let err = run_git(Path::new("."), ["no-such-subcommand"])
            .await
            .unwrap_err();
        match err {
            crate::GitError::CommandFailed { command, code, .. } => {
                assert_eq!(command, "no-such-subcommand");
                assert_ne!(code, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
