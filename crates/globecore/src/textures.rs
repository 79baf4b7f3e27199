use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureRole {
    EarthDay,
    EarthNight,
    EarthNormal,
    EarthSpecular,
    EarthClouds,
    MoonColor,
    MoonNormal,
}

impl TextureRole {
    /// Required roles in manifest order
    pub const ALL: [TextureRole; 7] = [
        TextureRole::EarthDay,
        TextureRole::EarthNight,
        TextureRole::EarthNormal,
        TextureRole::EarthSpecular,
        TextureRole::EarthClouds,
        TextureRole::MoonColor,
        TextureRole::MoonNormal,
    ];

    pub fn default_file(self) -> &'static str {
        match self {
            TextureRole::EarthDay => "earth_daymap.jpg",
            TextureRole::EarthNight => "earth_nightmap.jpg",
            TextureRole::EarthNormal => "earth_normal_map.jpg",
            TextureRole::EarthSpecular => "earth_specular_map.jpg",
            TextureRole::EarthClouds => "earth_clouds.jpg",
            TextureRole::MoonColor => "moon_map.jpg",
            TextureRole::MoonNormal => "moon_normal.jpg",
        }
    }
}

impl fmt::Display for TextureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureRole::EarthDay => "earth day",
            TextureRole::EarthNight => "earth night",
            TextureRole::EarthNormal => "earth normal",
            TextureRole::EarthSpecular => "earth specular",
            TextureRole::EarthClouds => "earth clouds",
            TextureRole::MoonColor => "moon color",
            TextureRole::MoonNormal => "moon normal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureEntry {
    pub role: TextureRole,
    pub file: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("texture manifest lists {found} entries, expected {expected}")]
    WrongLength { expected: usize, found: usize },

    #[error("texture manifest has no entry for {0}")]
    MissingRole(TextureRole),
}

/// The fixed, ordered list of textures a session needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureManifest {
    entries: Vec<TextureEntry>,
}

impl Default for TextureManifest {
    fn default() -> Self {
        Self {
            entries: TextureRole::ALL
                .into_iter()
                .map(|role| TextureEntry {
                    role,
                    file: role.default_file().to_string(),
                })
                .collect(),
        }
    }
}

impl TextureManifest {
    /// Reorders configured entries into canonical role order, rejecting incomplete lists.
    pub fn from_entries(entries: &[TextureEntry]) -> Result<Self, ManifestError> {
        if entries.len() != TextureRole::ALL.len() {
            return Err(ManifestError::WrongLength {
                expected: TextureRole::ALL.len(),
                found: entries.len(),
            });
        }

        let ordered = TextureRole::ALL
            .into_iter()
            .map(|role| {
                entries
                    .iter()
                    .find(|entry| entry.role == role)
                    .cloned()
                    .ok_or(ManifestError::MissingRole(role))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries: ordered })
    }

    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Asset path of every entry under `root`
    pub fn paths(&self, root: &str) -> Vec<String> {
        let root = root.trim_end_matches('/');
        self.entries
            .iter()
            .map(|entry| {
                if root.is_empty() {
                    entry.file.clone()
                } else {
                    format!("{}/{}", root, entry.file)
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Slot<H> {
    Pending(H),
    Loaded(H),
    Failed,
}

/// One resolved texture, either the real asset or the placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTexture<H> {
    pub role: TextureRole,
    pub handle: H,
    pub color_space: ColorSpace,
    pub fallback: bool,
}

/// Tracks a set of concurrent texture loads; completions may arrive in any order.
#[derive(Debug, Clone)]
pub struct TextureBatch<H> {
    roles: Vec<TextureRole>,
    slots: Vec<Slot<H>>,
}

impl<H: Clone> TextureBatch<H> {
    pub fn new(manifest: &TextureManifest, handles: Vec<H>) -> Self {
        debug_assert_eq!(manifest.len(), handles.len());
        Self {
            roles: manifest.entries().iter().map(|entry| entry.role).collect(),
            slots: handles.into_iter().map(Slot::Pending).collect(),
        }
    }

    /// Handles still waiting on a result, with their slot index
    pub fn pending(&self) -> impl Iterator<Item = (usize, &H)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Pending(handle) => Some((index, handle)),
            _ => None,
        })
    }

    pub fn mark_loaded(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index)
            && matches!(slot, Slot::Pending(_))
            && let Slot::Pending(handle) = std::mem::replace(slot, Slot::Failed)
        {
            *slot = Slot::Loaded(handle);
        }
    }

    pub fn mark_failed(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index)
            && matches!(slot, Slot::Pending(_))
        {
            *slot = Slot::Failed;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| !matches!(slot, Slot::Pending(_)))
    }

    /// Share of slots resolved, in [0, 1]; an empty batch counts as done.
    pub fn progress(&self) -> f32 {
        if self.slots.is_empty() {
            return 1.0;
        }
        let resolved = self.slots.iter().filter(|slot| !matches!(slot, Slot::Pending(_))).count();
        resolved as f32 / self.slots.len() as f32
    }

    pub fn failed_count(&self) -> usize {
        self.slots.iter().filter(|slot| matches!(slot, Slot::Failed)).count()
    }

    /// Resolves every slot in manifest order. Failed or still pending slots get `placeholder`.
    pub fn finish(self, placeholder: H) -> Vec<ResolvedTexture<H>> {
        self.roles
            .into_iter()
            .zip(self.slots)
            .map(|(role, slot)| match slot {
                Slot::Loaded(handle) => ResolvedTexture {
                    role,
                    handle,
                    color_space: ColorSpace::Srgb,
                    fallback: false,
                },
                Slot::Pending(_) | Slot::Failed => {
                    log::warn!("Texture for {} failed to load, using placeholder", role);
                    ResolvedTexture {
                        role,
                        handle: placeholder.clone(),
                        color_space: ColorSpace::Srgb,
                        fallback: true,
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_order() {
        let manifest = TextureManifest::default();
        let roles: Vec<_> = manifest.entries().iter().map(|entry| entry.role).collect();
        assert_eq!(roles, TextureRole::ALL.to_vec());
        assert_eq!(manifest.paths("textures/")[0], "textures/earth_daymap.jpg");
    }

    #[test]
    fn test_from_entries_reorders() {
        let mut entries = TextureManifest::default().entries().to_vec();
        entries.reverse();
        let manifest = TextureManifest::from_entries(&entries).unwrap();
        assert_eq!(manifest, TextureManifest::default());
    }

    #[test]
    fn test_from_entries_rejects_short_list() {
        let manifest = TextureManifest::default();
        let entries = &manifest.entries()[..5];
        assert_eq!(
            TextureManifest::from_entries(entries),
            Err(ManifestError::WrongLength { expected: 7, found: 5 })
        );
    }

    #[test]
    fn test_from_entries_rejects_duplicate_role() {
        let mut entries = TextureManifest::default().entries().to_vec();
        entries[6].role = TextureRole::MoonColor;
        assert_eq!(
            TextureManifest::from_entries(&entries),
            Err(ManifestError::MissingRole(TextureRole::MoonNormal))
        );
    }

    #[test]
    fn test_out_of_order_completion_keeps_order() {
        let manifest = TextureManifest::default();
        let mut batch = TextureBatch::new(&manifest, (0..7).collect());

        for index in [6, 2, 0, 4] {
            batch.mark_loaded(index);
        }
        assert!(!batch.is_complete());
        for index in [5, 1, 3] {
            batch.mark_failed(index);
        }
        assert!(batch.is_complete());
        assert_eq!(batch.failed_count(), 3);

        let resolved = batch.finish(99);
        let handles: Vec<_> = resolved.iter().map(|texture| texture.handle).collect();
        assert_eq!(handles, vec![0, 99, 2, 99, 4, 99, 6]);
        assert!(resolved.iter().all(|texture| texture.color_space == ColorSpace::Srgb));
    }

    #[test]
    fn test_late_completion_does_not_overwrite_failure() {
        let manifest = TextureManifest::default();
        let mut batch = TextureBatch::new(&manifest, (0..7).collect());
        batch.mark_failed(3);
        batch.mark_loaded(3);
        assert_eq!(batch.failed_count(), 1);
    }

    #[test]
    fn test_progress_counts_resolved_slots() {
        let manifest = TextureManifest::default();
        let mut batch = TextureBatch::new(&manifest, (0..7).collect());
        assert_eq!(batch.progress(), 0.0);
        batch.mark_loaded(0);
        batch.mark_failed(1);
        assert!((batch.progress() - 2.0 / 7.0).abs() < 1e-6);
    }
}
