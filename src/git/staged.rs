//! Staged diff collection with one-shot auto-staging.

use git2::{Diff, DiffFormat, ErrorCode, IndexAddOption, Repository, Tree};
use tracing::debug;

use crate::error::GitError;

/// The staged changes queued for the next commit.
#[derive(Debug, Clone)]
pub struct StagedDiff {
    /// Unified diff text of the index against HEAD.
    pub text: String,
    /// Whether `collect_staged` had to stage pending changes itself.
    pub auto_staged: bool,
}

/// Discover the repository from the current directory.
pub fn open_repo() -> Result<Repository, GitError> {
    Repository::discover(".").map_err(GitError::OpenRepository)
}

/// Collect the staged diff, auto-staging once if nothing is staged.
///
/// Returns `Ok(None)` when the tree is clean even after staging all pending
/// changes — the caller treats that as a successful no-op, not an error.
/// This is strictly a one-shot escalation: stage all, re-check once, stop.
pub fn collect_staged(repo: &Repository) -> Result<Option<StagedDiff>, GitError> {
    let text = staged_diff_text(repo)?;
    if !text.is_empty() {
        return Ok(Some(StagedDiff {
            text,
            auto_staged: false,
        }));
    }

    debug!("Nothing staged; staging all pending changes");
    stage_all(repo)?;

    let text = staged_diff_text(repo)?;
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(StagedDiff {
        text,
        auto_staged: true,
    }))
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// so the staged diff is taken against an empty tree. Real errors propagate.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Render the diff of the index against HEAD as unified patch text.
fn staged_diff_text(repo: &Repository) -> Result<String, GitError> {
    let head_tree = resolve_head_tree(repo)?;
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;
    render_patch(&diff)
}

fn render_patch(diff: &Diff<'_>) -> Result<String, GitError> {
    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(std::str::from_utf8(line.content()).unwrap_or(""));
        true
    })
    .map_err(GitError::DiffFailed)?;
    Ok(text)
}

/// Stage all pending changes, the `git add -A` equivalent.
///
/// `add_all` also drops index entries whose working-tree file is gone, so
/// deletions are staged too.
fn stage_all(repo: &Repository) -> Result<(), GitError> {
    let mut index = repo.index().map_err(GitError::StagingFailed)?;
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .map_err(GitError::StagingFailed)?;
    index.write().map_err(GitError::StagingFailed)?;
    Ok(())
}
