//! Per-resource font cache
//!
//! Parsing a font file is done once per resource identity; every later
//! extraction borrows the cached bytes.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::library::{FontLibrary, FontResource, LoadedFont};
use crate::core::errors::CardResult;

#[derive(Debug, Default)]
pub struct FontCache {
    library: FontLibrary,
    fonts: HashMap<FontResource, Arc<LoadedFont>>,
}

impl FontCache {
    pub fn new(library: FontLibrary) -> Self {
        Self {
            library,
            fonts: HashMap::new(),
        }
    }

    pub fn library(&self) -> &FontLibrary {
        &self.library
    }

    pub fn get(&self, resource: &FontResource) -> Option<Arc<LoadedFont>> {
        self.fonts.get(resource).cloned()
    }

    pub fn contains(&self, resource: &FontResource) -> bool {
        self.fonts.contains_key(resource)
    }

    /// Store a font that was loaded elsewhere (e.g. on a task thread)
    pub fn insert(&mut self, font: LoadedFont) -> Arc<LoadedFont> {
        let font = Arc::new(font);
        self.fonts.insert(font.resource.clone(), font.clone());
        font
    }

    /// Return the cached font or load it synchronously.
    /// Failed loads are not cached so a later request retries.
    pub fn get_or_load(&mut self, resource: &FontResource) -> CardResult<Arc<LoadedFont>> {
        if let Some(font) = self.fonts.get(resource) {
            return Ok(font.clone());
        }
        debug!("Font cache miss for {}", resource);
        let font = self.library.load(resource)?;
        Ok(self.insert(font))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_parsed_once_per_resource() {
        let mut cache = FontCache::default();
        let a = cache.get_or_load(&FontResource::Builtin).unwrap();
        let b = cache.get_or_load(&FontResource::Builtin).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_not_cached() {
        let mut cache = FontCache::new(FontLibrary::new("/nope"));
        assert!(cache
            .get_or_load(&FontResource::Family("Coiny".into()))
            .is_err());
        assert!(cache.is_empty());
    }
}
