use url::Url;

use crate::error::{Result, RetrievalError};

/// Authorization query string detached from a manifest URL.
///
/// Signed CDN links carry their token in the query of the manifest URL only. Sibling
/// resources referenced by relative URIs need the same query to be fetchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    query: Option<String>,
}

impl AuthContext {
    pub fn from_url(url: &Url) -> Self {
        Self {
            query: url.query().filter(|q| !q.is_empty()).map(str::to_owned),
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none()
    }

    /// Appends the token to `url`, after any query it already has.
    pub fn apply(&self, url: &mut Url) {
        let Some(auth) = &self.query else {
            return;
        };
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{auth}"),
            _ => auth.clone(),
        };
        url.set_query(Some(&query));
    }

    /// Resolves a playlist entry against the playlist it was read from.
    ///
    /// Absolute entries are returned unchanged. Relative ones are joined to the
    /// directory of `base` and receive the token, unless the entry names its own
    /// host (`//edge.test/seg.ts`).
    pub fn resolve(&self, base: &Url, uri: &str) -> Result<Url> {
        if let Ok(absolute) = Url::parse(uri) {
            return Ok(absolute);
        }

        let mut url = base
            .join(uri)
            .map_err(|e| RetrievalError::invalid_url(uri, format!("cannot join to {base}: {e}")))?;
        if url.origin() == base.origin() {
            self.apply(&mut url);
        }
        Ok(url)
    }
}
