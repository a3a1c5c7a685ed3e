//! Dataset aggregate types.
//!
//! # Responsibility
//! - Define the serialized shape of the rundown document.
//! - Provide lookup and splice helpers used by the repository layer.
//!
//! # Invariants
//! - Episodes are stored newest first.
//! - Field names (`DBVersion`, `Episodes`, `ID`, ...) are an on-disk
//!   contract and must not change.
//! - Lists written as `null` by older writers decode as empty lists.

use crate::model::slug::slugify;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a story within its segment. Zero means "not yet assigned".
pub type StoryId = u32;

/// Whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dataset {
    /// Schema version; absent in legacy files, which decode as `0`.
    #[serde(rename = "DBVersion", default)]
    pub db_version: u32,
    /// Newest first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub episodes: Vec<Episode>,
    /// Segment names copied into every new episode, in order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub default_segments: Vec<String>,
    /// Presenter names offered by the story form.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub presenters: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Episode {
    pub title: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Segment {
    pub name: String,
    /// Editorial order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Story {
    #[serde(rename = "ID", default)]
    pub id: StoryId,
    pub title: String,
    pub notes: String,
    pub presenter: String,
}

/// User-supplied story fields, before an id and position are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryDraft {
    pub title: String,
    pub notes: String,
    pub presenter: String,
}

impl StoryDraft {
    pub fn new(
        title: impl Into<String>,
        notes: impl Into<String>,
        presenter: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            notes: notes.into(),
            presenter: presenter.into(),
        }
    }

    /// Materializes the draft as a story carrying `id`.
    pub fn into_story(self, id: StoryId) -> Story {
        Story {
            id,
            title: self.title,
            notes: self.notes,
            presenter: self.presenter,
        }
    }
}

impl Dataset {
    /// Creates an empty dataset at the latest schema version.
    pub fn new(default_segments: Vec<String>, presenters: Vec<String>) -> Self {
        Self {
            db_version: crate::store::migrations::latest_version(),
            episodes: Vec::new(),
            default_segments,
            presenters,
        }
    }

    /// Prepends a new episode built from the default segments.
    ///
    /// The slug is derived from `title`; when another episode already owns
    /// that slug a `-2`, `-3`, ... suffix is appended.
    pub fn add_episode(&mut self, title: &str) -> &Episode {
        let slug = self.unique_slug(slugify(title));
        let episode = Episode {
            title: title.to_string(),
            slug,
            segments: self
                .default_segments
                .iter()
                .map(|name| Segment::new(name.clone()))
                .collect(),
        };
        self.episodes.insert(0, episode);
        &self.episodes[0]
    }

    pub fn episode_by_slug(&self, slug: &str) -> Option<&Episode> {
        self.episodes.iter().find(|episode| episode.slug == slug)
    }

    pub fn episode_by_slug_mut(&mut self, slug: &str) -> Option<&mut Episode> {
        self.episodes.iter_mut().find(|episode| episode.slug == slug)
    }

    fn unique_slug(&self, base: String) -> String {
        if self.episode_by_slug(&base).is_none() {
            return base;
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| self.episode_by_slug(candidate).is_none())
            .unwrap_or(base)
    }
}

impl Episode {
    pub fn segment_by_name(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.name == name)
    }

    pub fn segment_by_name_mut(&mut self, name: &str) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|segment| segment.name == name)
    }

    /// Segment names in display order.
    pub fn segment_names(&self) -> Vec<String> {
        self.segments.iter().map(|segment| segment.name.clone()).collect()
    }
}

impl Segment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stories: Vec::new(),
        }
    }

    /// First story carrying `id`. Duplicate ids resolve to the earliest one.
    pub fn story_by_id(&self, id: StoryId) -> Option<&Story> {
        self.stories.iter().find(|story| story.id == id)
    }

    pub fn story_by_id_mut(&mut self, id: StoryId) -> Option<&mut Story> {
        self.stories.iter_mut().find(|story| story.id == id)
    }

    /// Removes and returns the first story carrying `id`.
    pub fn remove_story(&mut self, id: StoryId) -> Option<Story> {
        let position = self.stories.iter().position(|story| story.id == id)?;
        Some(self.stories.remove(position))
    }

    /// Id the next inserted story receives: the post-insert story count.
    pub fn next_story_id(&self) -> StoryId {
        StoryId::try_from(self.stories.len() + 1).unwrap_or(StoryId::MAX)
    }

    /// Whether no two adjacent stories share a presenter.
    pub fn alternates(&self) -> bool {
        self.stories
            .windows(2)
            .all(|pair| pair[0].presenter != pair[1].presenter)
    }
}

impl Story {
    /// Notes rendered as safe HTML with line breaks and links.
    pub fn notes_html(&self) -> String {
        crate::render::notes::notes_html(&self.notes)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{Dataset, Segment, Story, StoryDraft};

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["News".to_string(), "Tips".to_string()],
            vec!["A".to_string(), "B".to_string()],
        )
    }

    #[test]
    fn add_episode_prepends_and_copies_default_segments() {
        let mut data = dataset();
        data.add_episode("A");
        data.add_episode("B");

        let titles: Vec<&str> = data.episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(data.episodes[0].segment_names(), vec!["News", "Tips"]);
        assert!(data.episodes[0].segments.iter().all(|s| s.stories.is_empty()));
    }

    #[test]
    fn segment_lookup_by_name_is_exact() {
        let mut data = dataset();
        let episode = data.add_episode("Ep");

        let tips = episode.segment_by_name("Tips").expect("Tips is a default segment");
        assert_eq!(tips.name, "Tips");
        assert!(tips.stories.is_empty());
        assert!(episode.segment_by_name("tips").is_none());
        assert!(episode.segment_by_name("Weather").is_none());
    }

    #[test]
    fn colliding_slugs_get_numeric_suffix() {
        let mut data = dataset();
        assert_eq!(data.add_episode("Ep 1!").slug, "ep-1-");
        assert_eq!(data.add_episode("ep 1?").slug, "ep-1--2");
        assert_eq!(data.add_episode("EP 1.").slug, "ep-1--3");
        assert!(data.episode_by_slug("ep-1--2").is_some());
    }

    #[test]
    fn duplicate_story_ids_resolve_to_first_match() {
        let mut segment = Segment::new("News");
        segment.stories.push(StoryDraft::new("first", "", "A").into_story(2));
        segment.stories.push(StoryDraft::new("second", "", "B").into_story(2));

        assert_eq!(segment.story_by_id(2).map(|s| s.title.as_str()), Some("first"));
        let removed = segment.remove_story(2).expect("story 2 exists");
        assert_eq!(removed.title, "first");
        assert_eq!(segment.story_by_id(2).map(|s| s.title.as_str()), Some("second"));
    }

    #[test]
    fn null_lists_decode_as_empty() {
        let raw = r#"{
            "Episodes": [{"Title": "x", "Slug": "x", "Segments": [{"Name": "News", "Stories": null}]}],
            "DefaultSegments": null,
            "Presenters": null
        }"#;
        let data: Dataset = serde_json::from_str(raw).expect("legacy document should decode");
        assert_eq!(data.db_version, 0);
        assert!(data.default_segments.is_empty());
        assert!(data.presenters.is_empty());
        assert!(data.episodes[0].segments[0].stories.is_empty());
    }

    #[test]
    fn serialized_field_names_match_document_contract() {
        let story = Story {
            id: 3,
            title: "t".to_string(),
            notes: "n".to_string(),
            presenter: "p".to_string(),
        };
        let value = serde_json::to_value(&story).expect("story serializes");
        assert_eq!(value["ID"], 3);
        assert_eq!(value["Presenter"], "p");

        let value = serde_json::to_value(dataset()).expect("dataset serializes");
        for key in ["DBVersion", "Episodes", "DefaultSegments", "Presenters"] {
            assert!(value.get(key).is_some(), "missing `{key}`");
        }
    }
}
