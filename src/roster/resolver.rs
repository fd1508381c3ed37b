use std::sync::Arc;

use super::fetch::Fetch;
use super::listing::extract_image_links;
use super::manifest::RosterManifest;
use crate::config::RosterPreset;
use crate::error::RosterError;

/// Image paths for one roster, in board order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoster {
    pub roster: String,
    pub base_path: String,
    /// Fetchable paths, e.g. "default-rosters/genshin/amber.jpg"; root-relative
    /// listing links stay as "/..."
    pub images: Vec<String>,
}

/// Turns a roster identifier into the image paths that belong to it.
///
/// A manifest entry wins when present (an empty entry counts as empty, no
/// listing is attempted). Otherwise the preset's base path is fetched and the
/// returned directory listing is searched for image links.
pub struct RosterResolver<F> {
    source: Arc<F>,
    manifest: Option<RosterManifest>,
    presets: Vec<RosterPreset>,
}

impl<F: Fetch> RosterResolver<F> {
    pub fn new(source: Arc<F>, manifest: Option<RosterManifest>, presets: Vec<RosterPreset>) -> Self {
        Self {
            source,
            manifest,
            presets,
        }
    }

    /// Build a resolver, reading the manifest through `source` if it exists
    pub async fn load(source: Arc<F>, manifest_path: String, presets: Vec<RosterPreset>) -> Self {
        let manifest = fetch_manifest(source.as_ref(), &manifest_path).await;
        Self::new(source, manifest, presets)
    }

    pub fn source(&self) -> &Arc<F> {
        &self.source
    }

    pub fn has_manifest(&self) -> bool {
        self.manifest.is_some()
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, roster: &str) -> Result<ResolvedRoster, RosterError> {
        if let Some(entry) = self.manifest.as_ref().and_then(|m| m.get(roster)) {
            if entry.images.is_empty() {
                tracing::warn!(path = %entry.path, "roster has no images in the manifest");
                return Err(RosterError::Empty {
                    roster: roster.to_string(),
                    path: entry.path.clone(),
                });
            }

            tracing::debug!(images = entry.images.len(), "resolved roster from manifest");
            return Ok(ResolvedRoster {
                roster: roster.to_string(),
                base_path: entry.path.clone(),
                images: entry.images.iter().map(|file| join_path(&entry.path, file)).collect(),
            });
        }

        let Some(preset) = self.presets.iter().find(|preset| preset.id == roster) else {
            tracing::warn!("roster is neither in the manifest nor a preset");
            return Err(RosterError::Unknown {
                roster: roster.to_string(),
            });
        };

        self.resolve_from_listing(roster, &preset.path).await
    }

    async fn resolve_from_listing(&self, roster: &str, base: &str) -> Result<ResolvedRoster, RosterError> {
        let base = base.trim_end_matches('/');

        let response = match self.source.get(base).await {
            Ok(response) => response,
            Err(source) => {
                tracing::error!(path = %base, error = %source, "error loading roster listing");
                return Err(RosterError::Unavailable {
                    roster: roster.to_string(),
                    path: base.to_string(),
                    source,
                });
            }
        };

        if !response.is_success() {
            tracing::warn!(
                path = %base,
                status = response.status,
                "could not load roster, make sure images exist in the roster folder"
            );
            return Err(RosterError::Empty {
                roster: roster.to_string(),
                path: base.to_string(),
            });
        }

        let html = String::from_utf8_lossy(&response.body);
        let files = extract_image_links(&html);

        if files.is_empty() {
            tracing::warn!(path = %base, "roster listing has no image links");
            return Err(RosterError::Empty {
                roster: roster.to_string(),
                path: base.to_string(),
            });
        }

        tracing::debug!(images = files.len(), "resolved roster from directory listing");
        Ok(ResolvedRoster {
            roster: roster.to_string(),
            base_path: base.to_string(),
            images: files.iter().map(|file| join_path(base, file)).collect(),
        })
    }
}

// Implement Debug without requiring it of the fetch source
impl<F> std::fmt::Debug for RosterResolver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterResolver")
            .field("manifest_rosters", &self.manifest.as_ref().map(RosterManifest::len))
            .field("presets", &self.presets.len())
            .finish()
    }
}

/// A missing or unreadable manifest is not an error; listings take over
async fn fetch_manifest<F: Fetch>(source: &F, path: &str) -> Option<RosterManifest> {
    let response = match source.get(path).await {
        Ok(response) if response.is_success() => response,
        Ok(response) => {
            tracing::info!(path, status = response.status, "no roster manifest, using directory listings");
            return None;
        }
        Err(err) => {
            tracing::warn!(path, error = %err, "could not fetch roster manifest, using directory listings");
            return None;
        }
    };

    match RosterManifest::from_json(&String::from_utf8_lossy(&response.body)) {
        Ok(manifest) => {
            tracing::info!(path, rosters = manifest.len(), "loaded roster manifest");
            Some(manifest)
        }
        Err(err) => {
            tracing::warn!(path, error = %err, "malformed roster manifest, using directory listings");
            None
        }
    }
}

/// Join a listing href onto the roster base. Root-relative hrefs keep their
/// leading `/` so the fetch source resolves them from its own root.
fn join_path(base: &str, file: &str) -> String {
    if file.starts_with('/') {
        return file.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::roster::manifest::RosterEntry;
    use crate::roster::testing::MapFetch;

    fn presets() -> Vec<RosterPreset> {
        GameConfig::default().rosters
    }

    #[tokio::test]
    async fn test_manifest_entry_wins() {
        let mut manifest = RosterManifest::default();
        manifest.insert(
            "genshin",
            RosterEntry {
                path: "default-rosters/genshin".to_string(),
                images: vec!["a.jpg".to_string(), "b.png".to_string()],
            },
        );
        let resolver = RosterResolver::new(Arc::new(MapFetch::default()), Some(manifest), presets());

        let resolved = resolver.resolve("genshin").await.unwrap();
        assert_eq!(
            resolved.images,
            vec!["default-rosters/genshin/a.jpg", "default-rosters/genshin/b.png"]
        );
    }

    #[tokio::test]
    async fn test_empty_manifest_entry_is_empty() {
        let mut manifest = RosterManifest::default();
        manifest.insert(
            "furniture",
            RosterEntry {
                path: "default-rosters/furniture".to_string(),
                images: Vec::new(),
            },
        );
        let resolver = RosterResolver::new(Arc::new(MapFetch::default()), Some(manifest), presets());

        let err = resolver.resolve("furniture").await.unwrap_err();
        assert!(matches!(err, RosterError::Empty { .. }));
    }

    #[tokio::test]
    async fn test_listing_fallback() {
        let fetch = MapFetch::default().with_page(
            "default-rosters/harry-potter",
            r#"<ul><li><a href="ron.png">ron.png</a></li><li><a href="readme.md">x</a></li>
            <li><a href="/default-rosters/harry-potter/harry.jpg">harry</a></li></ul>"#,
        );
        let resolver = RosterResolver::new(Arc::new(fetch), None, presets());

        let resolved = resolver.resolve("harry-potter").await.unwrap();
        assert_eq!(resolved.base_path, "default-rosters/harry-potter");
        assert_eq!(
            resolved.images,
            vec!["default-rosters/harry-potter/ron.png", "/default-rosters/harry-potter/harry.jpg"]
        );
    }

    #[tokio::test]
    async fn test_listing_without_images_is_empty() {
        let fetch = MapFetch::default().with_page("default-rosters/genshin", "<p>no files</p>");
        let resolver = RosterResolver::new(Arc::new(fetch), None, presets());

        let err = resolver.resolve("genshin").await.unwrap_err();
        assert!(matches!(err, RosterError::Empty { .. }));
    }

    #[tokio::test]
    async fn test_missing_listing_is_empty() {
        let resolver = RosterResolver::new(Arc::new(MapFetch::default()), None, presets());

        let err = resolver.resolve("genshin").await.unwrap_err();
        assert!(matches!(err, RosterError::Empty { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_unavailable() {
        let fetch = MapFetch::default().with_failure("default-rosters/genshin");
        let resolver = RosterResolver::new(Arc::new(fetch), None, presets());

        let err = resolver.resolve("genshin").await.unwrap_err();
        assert!(matches!(err, RosterError::Unavailable { .. }));
        assert!(err.notice().contains("default-rosters/genshin/"));
    }

    #[tokio::test]
    async fn test_unknown_roster() {
        let resolver = RosterResolver::new(Arc::new(MapFetch::default()), None, presets());
        let err = resolver.resolve("pokemon").await.unwrap_err();
        assert!(matches!(err, RosterError::Unknown { .. }));
    }

    #[tokio::test]
    async fn test_load_reads_manifest_through_source() {
        let fetch = MapFetch::default().with_page(
            "rosters.json",
            r#"{ "furniture": { "path": "default-rosters/furniture", "images": ["chair.png"] } }"#,
        );
        let resolver = RosterResolver::load(Arc::new(fetch), "rosters.json".to_string(), presets()).await;

        assert!(resolver.has_manifest());
        let resolved = resolver.resolve("furniture").await.unwrap();
        assert_eq!(resolved.images, vec!["default-rosters/furniture/chair.png"]);
    }

    #[tokio::test]
    async fn test_load_tolerates_bad_manifest() {
        let fetch = MapFetch::default().with_page("rosters.json", "{ broken");
        let resolver = RosterResolver::load(Arc::new(fetch), "rosters.json".to_string(), presets()).await;
        assert!(!resolver.has_manifest());
    }
}
