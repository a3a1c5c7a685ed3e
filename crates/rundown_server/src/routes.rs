//! URL routing table.
//!
//! | Method | Path                              | Route          |
//! |--------|-----------------------------------|----------------|
//! | GET    | `/`                               | `ListEpisodes` |
//! | POST   | `/`                               | `CreateEpisode`|
//! | GET    | `/{slug}`                         | `ShowEpisode`  |
//! | POST   | `/{slug}`                         | `AddStory`     |
//! | GET    | `/{slug}/{segment}/{story}/edit`  | `EditStory`    |
//! | POST   | `/{slug}/{segment}/{story}/edit`  | `UpdateStory`  |
//! | POST   | `/{slug}/{segment}/{story}/delete`| `DeleteStory`  |
//!
//! Non-numeric segment or story ids do not match any route.

use hyper::Method;
use rundown_core::StoryId;

/// Position of a story: segment index within the episode plus story id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRef {
    pub slug: String,
    pub segment_index: usize,
    pub story_id: StoryId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ListEpisodes,
    CreateEpisode,
    ShowEpisode(String),
    AddStory(String),
    EditStory(StoryRef),
    UpdateStory(StoryRef),
    DeleteStory(StoryRef),
}

impl Route {
    /// Resolves a request line, percent-decoding path segments.
    pub fn resolve(method: &Method, path: &str) -> Option<Self> {
        if path == "/" {
            return match *method {
                Method::GET => Some(Self::ListEpisodes),
                Method::POST => Some(Self::CreateEpisode),
                _ => None,
            };
        }

        let parts = path
            .strip_prefix('/')?
            .split('/')
            .map(|part| urlencoding::decode(part).ok().map(|p| p.into_owned()))
            .collect::<Option<Vec<String>>>()?;

        match (method, parts.as_slice()) {
            (&Method::GET, [slug]) => Some(Self::ShowEpisode(slug.clone())),
            (&Method::POST, [slug]) => Some(Self::AddStory(slug.clone())),
            (&Method::GET, [slug, segment, story, action]) if action == "edit" => {
                story_ref(slug, segment, story).map(Self::EditStory)
            }
            (&Method::POST, [slug, segment, story, action]) if action == "edit" => {
                story_ref(slug, segment, story).map(Self::UpdateStory)
            }
            (&Method::POST, [slug, segment, story, action]) if action == "delete" => {
                story_ref(slug, segment, story).map(Self::DeleteStory)
            }
            _ => None,
        }
    }
}

fn story_ref(slug: &str, segment: &str, story: &str) -> Option<StoryRef> {
    Some(StoryRef {
        slug: slug.to_string(),
        segment_index: segment.parse().ok()?,
        story_id: story.parse().ok()?,
    })
}

/// Path of an episode page, with the slug percent-encoded.
pub fn episode_path(slug: &str) -> String {
    format!("/{}", urlencoding::encode(slug))
}

/// Path of a story action (`edit` or `delete`).
pub fn story_path(slug: &str, segment_index: usize, story_id: StoryId, action: &str) -> String {
    format!(
        "/{}/{}/{}/{}",
        urlencoding::encode(slug),
        segment_index,
        story_id,
        action
    )
}
