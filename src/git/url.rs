/// Owner/name pair parsed out of a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentifier {
    pub owner: String,
    pub name: String,
}

/// Best-effort parse of free-form clone-URL text into an owner/name pair.
///
/// Accepts https URLs, ssh URLs, scp-like `git@host:owner/name` remotes and
/// bare `owner/name` shorthand. Returns None when no identifier can be read;
/// callers use the result for default destination naming only, never for
/// validation.
pub fn parse_repository_url(text: &str) -> Option<RepoIdentifier> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let rest = if let Some(rest) = text.strip_prefix("https://").or(text.strip_prefix("http://")) {
        // Drop credentials and the host segment
        let rest = rest.rsplit_once('@').map(|(_, r)| r).unwrap_or(rest);
        rest.split_once('/').map(|(_, path)| path)?
    } else if let Some(rest) = text.strip_prefix("ssh://") {
        let rest = rest.rsplit_once('@').map(|(_, r)| r).unwrap_or(rest);
        rest.split_once('/').map(|(_, path)| path)?
    } else if let Some((_, path)) = scp_like(text) {
        path
    } else {
        // Bare `owner/name` shorthand
        text
    };

    let mut segments = rest.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let name = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let name = name.strip_suffix(".git").unwrap_or(name);
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some(RepoIdentifier {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// Host portion of a clone URL, if one is present.
pub fn url_host(text: &str) -> Option<String> {
    let text = text.trim();
    if let Some(rest) = text
        .strip_prefix("https://")
        .or(text.strip_prefix("http://"))
        .or(text.strip_prefix("ssh://"))
    {
        let rest = rest.rsplit_once('@').map(|(_, r)| r).unwrap_or(rest);
        let host = rest.split('/').next()?;
        let host = host.split(':').next()?;
        (!host.is_empty()).then(|| host.to_string())
    } else {
        scp_like(text).map(|(host, _)| host.to_string())
    }
}

/// Split an scp-like remote (`git@host:owner/name.git`) into host and path.
fn scp_like(text: &str) -> Option<(&str, &str)> {
    let (user_host, path) = text.split_once(':')?;
    if path.contains("//") || user_host.contains('/') {
        return None;
    }
    let host = user_host.rsplit_once('@').map(|(_, h)| h).unwrap_or(user_host);
    (!host.is_empty() && !path.is_empty()).then_some((host, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(owner: &str, name: &str) -> RepoIdentifier {
        RepoIdentifier {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn parses_https_url() {
        assert_eq!(
            parse_repository_url("https://github.com/rust-lang/cargo"),
            Some(ident("rust-lang", "cargo"))
        );
    }

    #[test]
    fn parses_https_url_with_git_suffix() {
        assert_eq!(
            parse_repository_url("https://github.com/rust-lang/cargo.git"),
            Some(ident("rust-lang", "cargo"))
        );
    }

    #[test]
    fn parses_scp_like_remote() {
        assert_eq!(
            parse_repository_url("git@github.com:tokio-rs/tokio.git"),
            Some(ident("tokio-rs", "tokio"))
        );
    }

    #[test]
    fn parses_ssh_url() {
        assert_eq!(
            parse_repository_url("ssh://git@gitlab.com/inkscape/inkscape"),
            Some(ident("inkscape", "inkscape"))
        );
    }

    #[test]
    fn parses_bare_shorthand() {
        assert_eq!(
            parse_repository_url("rust-lang/rust"),
            Some(ident("rust-lang", "rust"))
        );
    }

    #[test]
    fn rejects_free_text() {
        assert_eq!(parse_repository_url("not a url"), None);
        assert_eq!(parse_repository_url(""), None);
        assert_eq!(parse_repository_url("https://github.com/"), None);
    }

    #[test]
    fn host_extraction() {
        assert_eq!(
            url_host("https://github.com/rust-lang/cargo"),
            Some("github.com".to_string())
        );
        assert_eq!(
            url_host("git@gitlab.com:a/b.git"),
            Some("gitlab.com".to_string())
        );
        assert_eq!(url_host("owner/name"), None);
    }
}
