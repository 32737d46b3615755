//! GitHub repository inference from the npm `repository` field

use crate::metadata::types::RepositoryField;

const GITHUB_HOST: &str = "github.com";

/// Infer the `owner/repo` slug from a `repository` field.
///
/// Accepts bare slugs, `github:` shorthands, http(s)/git+https URLs with or
/// without scheme and `.git` suffix, and scp-style `git@github.com:owner/repo`.
/// Repositories hosted elsewhere yield `None`.
pub fn infer_github_repository(repository: &RepositoryField) -> Option<String> {
    match repository {
        RepositoryField::Text(text) => infer_from_str(text),
        RepositoryField::Object { url } => infer_from_str(url),
    }
}

fn infer_from_str(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix("github:").unwrap_or(trimmed);

    // Other host shorthands: gitlab:owner/repo, bitbucket:owner/repo, gist:id
    if !trimmed.contains("://") && !trimmed.contains('@') && trimmed.contains(':') {
        return None;
    }

    // scp-like syntax: git@github.com:owner/repo
    let normalized = if !trimmed.contains("://") && trimmed.contains('@') {
        trimmed.replacen(':', "/", 1)
    } else {
        trimmed.to_string()
    };

    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return None;
    }

    let (owner, repo) = (segments[segments.len() - 2], segments[segments.len() - 1]);
    if segments.len() > 2 {
        let host = segments[segments.len() - 3];
        if !host.ends_with(GITHUB_HOST) {
            return None;
        }
    }

    Some(format!("{}/{}", owner, repo))
}
