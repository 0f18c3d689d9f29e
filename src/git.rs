//! Git hosting helpers.

/// URL of the default public git host.
pub const GITHUB_URL: &str = "https://github.com";

/// Join URL fragments with single `/` separators.
///
/// Redundant slashes at fragment boundaries are collapsed and empty
/// fragments are skipped.
pub fn url_join(parts: &[&str]) -> String {
    let mut joined = String::new();
    for part in parts {
        let part = part.trim_matches('/');
        if part.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push('/');
        }
        joined.push_str(part);
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        assert_eq!(
            url_join(&["https://github.com", "acme"]),
            "https://github.com/acme"
        );
        assert_eq!(
            url_join(&["https://github.com/", "/acme/"]),
            "https://github.com/acme"
        );
    }

    #[test]
    fn test_url_join_skips_empty_fragments() {
        assert_eq!(url_join(&["https://github.com", "", "acme"]), "https://github.com/acme");
        assert_eq!(url_join(&["", "/"]), "");
    }

    #[test]
    fn test_url_join_single_part() {
        assert_eq!(url_join(&["https://gitlab.com/"]), "https://gitlab.com");
    }
}
