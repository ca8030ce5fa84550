//! The immutable sound catalog.
//!
//! A [`Catalog`] is built once at startup (usually [`Catalog::builtin`]) and
//! shared read-only, typically behind an `Arc`. Names keep their insertion
//! order so selector UIs list sounds the same way every time. Categories are
//! display groupings only and never affect playback.

mod builtin;
mod sound;

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

pub use builtin::builtin_metadata;
pub use sound::{Segment, SegmentError, SoundDefinition, MAX_SEGMENT_MS};

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("sound '{0}' has no segments")]
    EmptySound(String),

    #[error("sound '{name}' segment {index} has non-positive duration {duration_ms} ms")]
    InvalidDuration {
        name: String,
        index: usize,
        duration_ms: f32,
    },

    #[error("sound '{name}' segment {index} is {duration_ms} ms, longer than {MAX_SEGMENT_MS} ms")]
    SegmentTooLong {
        name: String,
        index: usize,
        duration_ms: f32,
    },

    #[error("sound '{name}' segment {index} has invalid frequency {frequency_hz} Hz")]
    InvalidFrequency {
        name: String,
        index: usize,
        frequency_hz: f32,
    },

    #[error("sound '{0}' is defined more than once")]
    DuplicateSound(String),

    #[error("category '{category}' lists unknown sound '{sound}'")]
    UnknownCategoryEntry { category: String, sound: String },

    #[error("sound '{sound}' appears in both '{first}' and '{second}'")]
    OverlappingCategories {
        sound: String,
        first: String,
        second: String,
    },
}

/// A display grouping of sound names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub sounds: Vec<String>,
}

/// Descriptive information about where a catalog's sounds come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogMetadata {
    pub kind: String,
    pub method: String,
    pub license: String,
    pub description: String,
    pub attribution_required: bool,
}

impl Default for CatalogMetadata {
    fn default() -> Self {
        Self {
            kind: "Procedurally Generated".into(),
            method: "Oscillator synthesis".into(),
            license: "Unspecified".into(),
            description: String::new(),
            attribution_required: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    sounds: Vec<SoundDefinition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    categories: Vec<Category>,
    metadata: CatalogMetadata,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The twenty preloaded alert sounds.
    pub fn builtin() -> Self {
        builtin::builtin_catalog()
    }

    pub fn get(&self, name: &str) -> Option<&SoundDefinition> {
        self.index.get(name).map(|&i| &self.sounds[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Sound names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sounds.iter().map(SoundDefinition::name)
    }

    pub fn sounds(&self) -> &[SoundDefinition] {
        &self.sounds
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category a sound is displayed under, if any.
    pub fn category_of(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.sounds.iter().any(|s| s == name))
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

/// Collects sounds and categories, then validates them all at once in
/// [`CatalogBuilder::build`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    sounds: Vec<(String, Vec<Segment>)>,
    categories: Vec<Category>,
    metadata: Option<CatalogMetadata>,
}

impl CatalogBuilder {
    pub fn sound(mut self, name: impl Into<String>, segments: impl Into<Vec<Segment>>) -> Self {
        self.sounds.push((name.into(), segments.into()));
        self
    }

    pub fn category<I, S>(mut self, name: impl Into<String>, sounds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.push(Category {
            name: name.into(),
            sounds: sounds.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn metadata(mut self, metadata: CatalogMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut index = HashMap::with_capacity(self.sounds.len());
        let mut sounds = Vec::with_capacity(self.sounds.len());

        for (name, segments) in self.sounds {
            validate_segments(&name, &segments)?;
            if index.insert(name.clone(), sounds.len()).is_some() {
                return Err(CatalogError::DuplicateSound(name));
            }
            sounds.push(SoundDefinition::new(name, segments));
        }

        let mut seen: HashMap<&str, &str> = HashMap::new();
        for category in &self.categories {
            for sound in &category.sounds {
                if !index.contains_key(sound) {
                    return Err(CatalogError::UnknownCategoryEntry {
                        category: category.name.clone(),
                        sound: sound.clone(),
                    });
                }
                if let Some(first) = seen.insert(sound.as_str(), category.name.as_str()) {
                    return Err(CatalogError::OverlappingCategories {
                        sound: sound.clone(),
                        first: first.to_string(),
                        second: category.name.clone(),
                    });
                }
            }
        }

        Ok(Catalog {
            sounds,
            index,
            categories: self.categories,
            metadata: self.metadata.unwrap_or_default(),
        })
    }
}

fn validate_segments(name: &str, segments: &[Segment]) -> Result<(), CatalogError> {
    if segments.is_empty() {
        return Err(CatalogError::EmptySound(name.to_string()));
    }

    for (index, segment) in segments.iter().enumerate() {
        segment.validate().map_err(|err| {
            let name = name.to_string();
            match err {
                SegmentError::Duration(duration_ms) => CatalogError::InvalidDuration {
                    name,
                    index,
                    duration_ms,
                },
                SegmentError::TooLong(duration_ms) => CatalogError::SegmentTooLong {
                    name,
                    index,
                    duration_ms,
                },
                SegmentError::Frequency(frequency_hz) => CatalogError::InvalidFrequency {
                    name,
                    index,
                    frequency_hz,
                },
            }
        })?;
    }

    Ok(())
}
