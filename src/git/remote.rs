use anyhow::Result;

use super::url::{url_host, RepoIdentifier};

/// A configured forge account. Only the host and login matter here;
/// credential storage is the git credential helper's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub host: String,
    pub login: String,
}

/// Pick the account whose host matches the clone URL.
///
/// No match is a normal outcome (anonymous clone), never an error.
pub fn resolve_account<'a>(url: &str, accounts: &'a [Account]) -> Option<&'a Account> {
    let host = url_host(url)?;
    accounts
        .iter()
        .find(|a| a.host.eq_ignore_ascii_case(&host))
}

/// Source of canonical clone-URL metadata for a parsed identifier.
///
/// Returning `Ok(None)` means "no canonical form known" and leaves the
/// user-entered URL untouched.
pub trait CloneUrlResolver {
    fn resolve(&self, account: Option<&Account>, id: &RepoIdentifier) -> Result<Option<String>>;
}

/// Canonicalizes clone URLs for hosts we know the URL scheme of.
pub struct KnownHostResolver;

const KNOWN_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org", "codeberg.org"];

impl CloneUrlResolver for KnownHostResolver {
    fn resolve(&self, account: Option<&Account>, id: &RepoIdentifier) -> Result<Option<String>> {
        let host = account
            .map(|a| a.host.as_str())
            .filter(|h| KNOWN_HOSTS.contains(h))
            .or(Some("github.com"));
        Ok(host.map(|h| format!("https://{}/{}/{}.git", h, id.owner, id.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> Vec<Account> {
        vec![
            Account {
                host: "github.com".to_string(),
                login: "octocat".to_string(),
            },
            Account {
                host: "gitlab.com".to_string(),
                login: "tanuki".to_string(),
            },
        ]
    }

    #[test]
    fn resolves_account_by_host() {
        let accounts = accounts();
        let found = resolve_account("https://gitlab.com/a/b", &accounts);
        assert_eq!(found.map(|a| a.login.as_str()), Some("tanuki"));
    }

    #[test]
    fn unknown_host_degrades_to_anonymous() {
        let accounts = accounts();
        assert!(resolve_account("https://example.org/a/b", &accounts).is_none());
        assert!(resolve_account("plain text", &accounts).is_none());
    }

    #[test]
    fn known_host_resolver_builds_canonical_url() {
        let id = RepoIdentifier {
            owner: "rust-lang".to_string(),
            name: "cargo".to_string(),
        };
        let url = KnownHostResolver.resolve(None, &id).unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://github.com/rust-lang/cargo.git")
        );
    }
}
