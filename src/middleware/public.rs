/// URL substrings that mark endpoints which never carry credentials
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &["/auth/", "/public/"];

/// Allow-list of public endpoints.
///
/// A URL is public when it contains any configured pattern. Public requests
/// skip token attachment and 401 recovery entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicEndpoints {
    patterns: Vec<String>,
}

impl PublicEndpoints {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated list such as `/auth/,/public/`
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(',').map(str::trim))
    }

    pub fn matches(&self, url: &str) -> bool {
        self.patterns.iter().any(|p| url.contains(p.as_str()))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for PublicEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_PATHS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_patterns() {
        let public = PublicEndpoints::default();
        assert!(public.matches("http://localhost:8080/api/auth/login"));
        assert!(public.matches("http://localhost:8080/api/auth/refresh-token"));
        assert!(public.matches("https://portal.example.com/api/public/jobs?page=1"));
        assert!(!public.matches("http://localhost:8080/api/jobs"));
        assert!(!public.matches("http://localhost:8080/api/users/7"));
        // no trailing slash, so not the auth namespace
        assert!(!public.matches("http://localhost:8080/api/authors"));
    }

    #[test]
    fn test_parse_ignores_blank_entries() {
        let public = PublicEndpoints::parse(" /auth/ , ,/public/,");
        assert_eq!(public.patterns(), &["/auth/".to_string(), "/public/".to_string()]);
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let public = PublicEndpoints::parse("");
        assert!(public.patterns().is_empty());
        assert!(!public.matches("http://localhost/api/auth/login"));
    }

    proptest! {
        #[test]
        fn prop_urls_under_public_prefix_match(suffix in "[a-z0-9/-]{0,24}") {
            let public = PublicEndpoints::default();
            let url = format!("http://localhost:8080/api/public/{}", suffix);
            prop_assert!(public.matches(&url));
        }

        #[test]
        fn prop_private_paths_do_not_match(segment in "(jobs|users|applications|companies)/[0-9]{1,6}") {
            let public = PublicEndpoints::default();
            let url = format!("http://localhost:8080/api/{}", segment);
            prop_assert!(!public.matches(&url));
        }
    }
}
