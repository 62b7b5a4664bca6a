//! Ordered sound-name to locator mapping.

use once_cell::sync::Lazy;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Catalog entry that maps to the empty locator.
pub const SILENCE_SOUND_NAME: &str = "Bez skaņas";

static DEFAULT_SOUND_CATALOG: Lazy<SoundCatalog> = Lazy::new(|| {
    SoundCatalog::from_entries([
        (SILENCE_SOUND_NAME, ""),
        ("Android", "sound/android.mp3"),
        ("Caramelldansen", "sound/caramelldansen.mp3"),
        ("Pareizi", "sound/correct.mp3"),
        ("Giga Chad", "sound/gigachad.mp3"),
        ("iPhone", "sound/iphone.opus"),
        ("Nauda", "sound/kaching.mp3"),
        ("Kaķis", "sound/meow.mp3"),
        ("Minecraft", "sound/minecraft.mp3"),
        ("Sirēna", "sound/siren.mp3"),
        ("To Be Continued", "sound/to_be_continued.mp3"),
        ("Windows", "sound/windows.mp3"),
    ])
});

/// Sounds bundled with the application.
pub fn default_sound_catalog() -> &'static SoundCatalog {
    &DEFAULT_SOUND_CATALOG
}

/// Insertion-ordered map from display name to playable locator.
///
/// Serializes as a JSON object in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundCatalog {
    entries: Vec<(String, String)>,
}

impl SoundCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog; a later entry with an existing name replaces the
    /// locator but keeps its position.
    pub fn from_entries<N, L>(entries: impl IntoIterator<Item = (N, L)>) -> Self
    where
        N: Into<String>,
        L: Into<String>,
    {
        let mut catalog = Self::new();
        for (name, locator) in entries {
            catalog.insert(name, locator);
        }
        catalog
    }

    pub fn insert(&mut self, name: impl Into<String>, locator: impl Into<String>) {
        let name = name.into();
        let locator = locator.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = locator,
            None => self.entries.push((name, locator)),
        }
    }

    /// Locator for `name`. Silence resolves to `Some("")`.
    pub fn locator(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, locator)| locator.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locator(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, locator)| (name.as_str(), locator.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SoundCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, locator) in &self.entries {
            map.serialize_entry(name, locator)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{default_sound_catalog, SoundCatalog, SILENCE_SOUND_NAME};

    #[test]
    fn default_catalog_starts_with_silence() {
        let catalog = default_sound_catalog();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.names().next(), Some(SILENCE_SOUND_NAME));
        assert_eq!(catalog.locator(SILENCE_SOUND_NAME), Some(""));
        assert_eq!(
            catalog.locator("To Be Continued"),
            Some("sound/to_be_continued.mp3")
        );
        assert_eq!(catalog.locator("Trombone"), None);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut catalog = SoundCatalog::from_entries([("a", "1"), ("b", "2")]);
        catalog.insert("a", "3");
        let entries: Vec<(&str, &str)> = catalog.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let catalog = SoundCatalog::from_entries([("z", "z.mp3"), ("a", "a.mp3")]);
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"{"z":"z.mp3","a":"a.mp3"}"#);
    }
}
