//! Supabase-backed sync: PostgREST for inserts, Realtime for the change feed.

mod realtime;
mod rest;

pub use rest::SupabaseBackend;

/// Connection details for a Supabase project
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,
    /// Public anon key, sent as `apikey` on every request
    pub anon_key: String,
    /// Signed-in user's JWT. Without it requests run as the anon role.
    pub access_token: Option<String>,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Bearer token for REST and Realtime auth
    pub(crate) fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("has_access_token", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_prefers_access_token() {
        let config = SupabaseConfig::new("https://p.supabase.co/", "anon");
        assert_eq!(config.url, "https://p.supabase.co");
        assert_eq!(config.bearer(), "anon");

        let config = config.with_access_token("jwt");
        assert_eq!(config.bearer(), "jwt");
        assert!(!format!("{:?}", config).contains("jwt"));
    }
}
