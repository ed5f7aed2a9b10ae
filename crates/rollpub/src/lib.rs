//! Git plumbing for the roll pipeline, built on the system `git` binary.
//!
//! Two jobs live here: keeping a local checkout of the roll production
//! sources current ([`clone_or_update`]), and committing regenerated
//! outputs back to that repository ([`publish`]). Publishing is bounded by
//! an allow list of pathspecs so that scratch files in the checkout never
//! leak into a commit.

pub mod process;
pub mod publish;
pub mod repo;

pub use process::{run_git, GitOutput};
pub use publish::{publish, PublishOptions, Published};
pub use repo::clone_or_update;

/// Errors from git operations.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("`git {command}` failed with exit code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },
}

pub type Result<T> = std::result::Result<T, GitError>;
