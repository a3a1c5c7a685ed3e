//! HTML pages.
//!
//! All user text goes through `escape_html`; notes go through `notes_html`,
//! which escapes before adding its own markup.

use crate::routes::{episode_path, story_path};
use rundown_core::{escape_html, Episode, Story};
use std::fmt::Write;

/// Form state shared by the add and edit pages.
pub struct StoryForm<'a> {
    /// Pre-filled values; empty for a new story.
    pub story: Option<&'a Story>,
    pub presenters: &'a [String],
    /// Segment choices; only offered when adding.
    pub segments: &'a [String],
    pub action: String,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// Episode list with the new-episode form.
pub fn index(episodes: &[Episode]) -> String {
    let mut body = String::from("<h1>Episodes</h1>\n");
    body.push_str(
        "<form method=\"post\" action=\"/\">\n<label>Title <input name=\"title\" required></label>\n<button type=\"submit\">Create episode</button>\n</form>\n",
    );
    if episodes.is_empty() {
        body.push_str("<p>No episodes yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for episode in episodes {
            let _ = writeln!(
                body,
                "<li><a href=\"{}\">{}</a></li>",
                escape_html(&episode_path(&episode.slug)),
                escape_html(&episode.title)
            );
        }
        body.push_str("</ul>\n");
    }
    layout("Episodes", &body)
}

/// Episode rundown with per-story edit/delete controls and the add form.
pub fn episode_details(episode: &Episode, presenters: &[String]) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<p><a href=\"/\">All episodes</a></p>");
    let _ = writeln!(body, "<h1>{}</h1>", escape_html(&episode.title));

    for (segment_index, segment) in episode.segments.iter().enumerate() {
        let _ = writeln!(body, "<h2>{}</h2>", escape_html(&segment.name));
        if segment.stories.is_empty() {
            body.push_str("<p>No stories.</p>\n");
            continue;
        }
        body.push_str("<ol>\n");
        for story in &segment.stories {
            let _ = writeln!(
                body,
                "<li><h3>{}</h3>\n<p>Presenter: {}</p>\n<p>{}</p>\n<a href=\"{}\">Edit</a>\n<form method=\"post\" action=\"{}\"><button type=\"submit\">Delete</button></form></li>",
                escape_html(&story.title),
                escape_html(&story.presenter),
                story.notes_html(),
                escape_html(&story_path(&episode.slug, segment_index, story.id, "edit")),
                escape_html(&story_path(&episode.slug, segment_index, story.id, "delete")),
            );
        }
        body.push_str("</ol>\n");
    }

    body.push_str("<h2>Add a story</h2>\n");
    let segments = episode.segment_names();
    body.push_str(&story_form(&StoryForm {
        story: None,
        presenters,
        segments: &segments,
        action: episode_path(&episode.slug),
    }));
    layout(&episode.title, &body)
}

/// Edit page for one story.
pub fn edit_story(slug: &str, segment_index: usize, story: &Story, presenters: &[String]) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<p><a href=\"{}\">Back to episode</a></p>\n<h1>Edit story</h1>",
        escape_html(&episode_path(slug))
    );
    body.push_str(&story_form(&StoryForm {
        story: Some(story),
        presenters,
        segments: &[],
        action: story_path(slug, segment_index, story.id, "edit"),
    }));
    layout("Edit story", &body)
}

fn story_form(form: &StoryForm<'_>) -> String {
    let (title, notes, current) = form
        .story
        .map(|s| (s.title.as_str(), s.notes.as_str(), s.presenter.as_str()))
        .unwrap_or(("", "", ""));

    let mut html = String::new();
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"{}\">",
        escape_html(&form.action)
    );
    let _ = writeln!(
        html,
        "<label>Title <input name=\"title\" value=\"{}\" required></label>",
        escape_html(title)
    );
    let _ = writeln!(
        html,
        "<label>Notes <textarea name=\"notes\">{}</textarea></label>",
        escape_html(notes)
    );

    html.push_str("<label>Presenter <select name=\"presenter\">\n");
    let mut options: Vec<&str> = form.presenters.iter().map(String::as_str).collect();
    if !current.is_empty() && !options.contains(&current) {
        options.push(current);
    }
    for name in options {
        let selected = if name == current { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape_html(name),
            selected
        );
    }
    html.push_str("</select></label>\n");

    if !form.segments.is_empty() {
        html.push_str("<label>Segment <select name=\"segment\">\n");
        for name in form.segments {
            let _ = writeln!(html, "<option value=\"{0}\">{0}</option>", escape_html(name));
        }
        html.push_str("</select></label>\n");
    }

    let label = if form.story.is_some() { "Save" } else { "Add story" };
    let _ = writeln!(html, "<button type=\"submit\">{label}</button>\n</form>");
    html
}
