use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::has_image_extension;
use crate::error::{BuildError, ScanError};

/// One roster in the manifest
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Base path the image names are relative to (e.g. "default-rosters/genshin")
    pub path: String,
    /// Image filenames, sorted
    pub images: Vec<String>,
}

/// Precomputed listing of every roster and its images.
///
/// Serializes as `{ "<roster>": { "path": ..., "images": [...] }, ... }`.
/// Keys come out in directory scan order, which is sorted by name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct RosterManifest {
    rosters: BTreeMap<String, RosterEntry>,
}

/// What a build produced, including the rosters it had to leave out
#[derive(Debug)]
pub struct BuildReport {
    pub manifest: RosterManifest,
    pub skipped: Vec<ScanError>,
}

impl RosterManifest {
    pub fn get(&self, roster: &str) -> Option<&RosterEntry> {
        self.rosters.get(roster)
    }

    pub fn insert(&mut self, roster: impl Into<String>, entry: RosterEntry) {
        self.rosters.insert(roster.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RosterEntry)> {
        self.rosters.iter()
    }

    /// Parse manifest JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Scan `root` for roster subdirectories.
    ///
    /// Every subdirectory becomes a roster whose base path is `prefix/<name>`.
    /// An unreadable subdirectory is logged and left out; an unreadable root
    /// fails the whole build.
    pub fn build(root: &Path, prefix: &str) -> Result<BuildReport, BuildError> {
        // Fail loudly before walking if the root itself is unusable
        std::fs::read_dir(root).map_err(|source| BuildError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let prefix = prefix.trim_end_matches('/');
        let mut manifest = RosterManifest::default();
        let mut skipped = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable roster entry");
                    skipped.push(ScanError {
                        path: err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                        source: err,
                    });
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();

            match list_images(entry.path()) {
                Ok(images) => {
                    tracing::info!(roster = %name, images = images.len(), "roster scanned");
                    manifest.insert(
                        name.clone(),
                        RosterEntry {
                            path: format!("{prefix}/{name}"),
                            images,
                        },
                    );
                }
                Err(err) => {
                    tracing::warn!(roster = %name, error = %err, "could not read roster directory, leaving it out");
                    skipped.push(err);
                }
            }
        }

        Ok(BuildReport { manifest, skipped })
    }

    /// Write the manifest, replacing any existing file
    pub fn save(&self, output: &Path) -> Result<(), BuildError> {
        let json = self.to_json()?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| BuildError::WriteManifest {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(output, json).map_err(|source| BuildError::WriteManifest {
            path: output.to_path_buf(),
            source,
        })
    }
}

/// Sorted image filenames directly inside `dir`
pub fn list_images(dir: &Path) -> Result<Vec<String>, ScanError> {
    let mut images = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            // The directory itself could not be opened
            Err(source) if source.depth() == 0 => {
                return Err(ScanError {
                    path: dir.to_path_buf(),
                    source,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable file");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if has_image_extension(&name) {
            images.push(name);
        }
    }

    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_build_filters_and_sorts() {
        let root = tempfile::tempdir().unwrap();
        let genshin = root.path().join("genshin");
        fs::create_dir(&genshin).unwrap();
        for name in ["zhongli.PNG", "amber.jpg", "notes.txt", "Diluc.webp", "klee.Svg", "raw.nef"] {
            touch(&genshin, name);
        }
        fs::create_dir(genshin.join("nested.png")).unwrap();

        let report = RosterManifest::build(root.path(), "default-rosters").unwrap();
        let entry = report.manifest.get("genshin").unwrap();

        assert_eq!(entry.path, "default-rosters/genshin");
        assert_eq!(entry.images, vec!["Diluc.webp", "amber.jpg", "klee.Svg", "zhongli.PNG"]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_build_keeps_empty_rosters_and_ignores_files() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("furniture")).unwrap();
        fs::create_dir(root.path().join("harry-potter")).unwrap();
        touch(&root.path().join("harry-potter"), "hermione.gif");
        touch(root.path(), "README.md");

        let report = RosterManifest::build(root.path(), "default-rosters/").unwrap();
        let names: Vec<_> = report.manifest.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(names, vec!["furniture", "harry-potter"]);
        assert!(report.manifest.get("furniture").unwrap().images.is_empty());
        assert_eq!(
            report.manifest.get("harry-potter").unwrap().path,
            "default-rosters/harry-potter"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_roster_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let locked = root.path().join("locked");
        fs::create_dir(root.path().join("open")).unwrap();
        touch(&root.path().join("open"), "a.png");
        fs::create_dir(&locked).unwrap();
        touch(&locked, "b.png");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let report = RosterManifest::build(root.path(), "default-rosters");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let report = report.unwrap();

        assert!(report.manifest.get("locked").is_none());
        assert_eq!(report.manifest.get("open").unwrap().images, vec!["a.png"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, locked);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_is_recorded() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("genshin")).unwrap();
        std::os::unix::fs::symlink(root.path().join("gone"), root.path().join("broken")).unwrap();

        let report = RosterManifest::build(root.path(), "default-rosters").unwrap();

        assert_eq!(report.manifest.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, root.path().join("broken"));
    }

    const EXTENSIONS: [&str; 12] = [
        "png", "PNG", "Jpg", "jpeg", "gif", "WebP", "svg", "txt", "md", "nef", "json", "",
    ];

    proptest::proptest! {
        /// Exactly the recognized files come back, sorted, whatever the case
        #[test]
        fn list_images_returns_sorted_recognized_subset(
            files in proptest::collection::btree_map(
                "[a-z0-9_-]{1,8}",
                proptest::sample::select(EXTENSIONS.to_vec()),
                0..12,
            ),
        ) {
            let dir = tempfile::tempdir().unwrap();
            let mut expected = Vec::new();
            for (stem, ext) in &files {
                let name = if ext.is_empty() { stem.clone() } else { format!("{stem}.{ext}") };
                touch(dir.path(), &name);
                if crate::config::IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    expected.push(name);
                }
            }
            expected.sort();

            let images = list_images(dir.path()).unwrap();
            proptest::prop_assert!(images.windows(2).all(|pair| pair[0] <= pair[1]));
            proptest::prop_assert_eq!(images, expected);
        }
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("nope");

        let err = RosterManifest::build(&missing, "default-rosters").unwrap_err();
        assert!(matches!(err, BuildError::RootUnreadable { .. }));
    }

    #[test]
    fn test_list_images_on_missing_dir_is_scan_error() {
        let root = tempfile::tempdir().unwrap();
        let err = list_images(&root.path().join("gone")).unwrap_err();
        assert_eq!(err.path, root.path().join("gone"));
    }

    #[test]
    fn test_save_writes_expected_shape() {
        let root = tempfile::tempdir().unwrap();
        let mut manifest = RosterManifest::default();
        manifest.insert(
            "genshin",
            RosterEntry {
                path: "default-rosters/genshin".to_string(),
                images: vec!["a.jpg".to_string(), "b.png".to_string()],
            },
        );

        let output = root.path().join("out").join("rosters.json");
        manifest.save(&output).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["genshin"]["path"], "default-rosters/genshin");
        assert_eq!(json["genshin"]["images"][1], "b.png");

        let reloaded = RosterManifest::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(reloaded, manifest);
    }
}
