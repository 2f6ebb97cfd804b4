//! Resolution of media paths returned by the backend.
//!
//! Image and video URLs may come back as paths relative to the media host
//! (`/uploads/abc.jpg`). They are joined against the configured origin before
//! any record reaches a view.

use url::Url;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResolver {
    origin: Url,
}

impl MediaResolver {
    pub fn new(origin: &str) -> Result<Self> {
        let mut origin = Url::parse(origin)?;
        // Relative paths without a leading slash resolve against the directory,
        // so make sure the base path is one.
        if !origin.path().ends_with('/') {
            let path = format!("{}/", origin.path());
            origin.set_path(&path);
        }
        Ok(Self { origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Absolute URL for `raw`. Absolute inputs, `data:` URLs included, are
    /// returned unchanged.
    pub fn resolve(&self, raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() || Url::parse(raw).is_ok() {
            return raw.to_string();
        }
        match self.origin.join(raw) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("Failed to resolve media path '{raw}': {e}");
                raw.to_string()
            }
        }
    }

    pub fn resolve_in_place(&self, value: &mut String) {
        *value = self.resolve(value);
    }

    pub fn resolve_opt(&self, value: &mut Option<String>) {
        if let Some(v) = value {
            self.resolve_in_place(v);
        }
    }
}
