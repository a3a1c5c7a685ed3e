//! Markdown export of a whole dataset.
//!
//! Read-only: operates on borrowed episodes and never migrates or saves.

use crate::model::dataset::{Episode, Segment, Story};
use std::fmt::Write;

/// Renders episodes (in the given order) as one Markdown document.
///
/// Layout: `#` per episode, `##` per segment, `###` per story followed by
/// the presenter line and the notes paragraph. Empty segments are listed
/// with a placeholder line so the rundown shape stays visible.
pub fn render_markdown(episodes: &[Episode]) -> String {
    let mut out = String::new();
    for (position, episode) in episodes.iter().enumerate() {
        if position > 0 {
            out.push('\n');
        }
        write_episode(&mut out, episode);
    }
    out
}

fn write_episode(out: &mut String, episode: &Episode) {
    let _ = writeln!(out, "# {}", single_line(&episode.title));
    for segment in &episode.segments {
        out.push('\n');
        write_segment(out, segment);
    }
}

fn write_segment(out: &mut String, segment: &Segment) {
    let _ = writeln!(out, "## {}", single_line(&segment.name));
    if segment.stories.is_empty() {
        out.push_str("\n_No stories._\n");
        return;
    }
    for story in &segment.stories {
        out.push('\n');
        write_story(out, story);
    }
}

fn write_story(out: &mut String, story: &Story) {
    let _ = writeln!(out, "### {}", single_line(&story.title));
    out.push('\n');
    let _ = writeln!(out, "Presenter: {}", single_line(&story.presenter));
    let notes = story.notes.trim();
    if !notes.is_empty() {
        out.push('\n');
        for line in notes.lines() {
            // Two trailing spaces keep the author's line breaks in Markdown.
            let _ = writeln!(out, "{}  ", line.trim_end());
        }
    }
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::render_markdown;
    use crate::model::dataset::{Dataset, StoryDraft};

    #[test]
    fn renders_headings_in_storage_order() {
        let mut data = Dataset::new(vec!["News".to_string(), "Tips".to_string()], vec![]);
        data.add_episode("First");
        data.add_episode("Second");
        data.episodes[1].segments[0]
            .stories
            .push(StoryDraft::new("Launch", "line one\nline two", "Ann").into_story(1));

        let doc = render_markdown(&data.episodes);
        let second = doc.find("# Second").expect("second episode heading");
        let first = doc.find("# First").expect("first episode heading");
        assert!(second < first);
        assert!(doc.contains("### Launch\n\nPresenter: Ann\n\nline one  \nline two  \n"));
        assert!(doc.contains("## Tips\n\n_No stories._\n"));
    }

    #[test]
    fn empty_dataset_renders_empty_document() {
        assert_eq!(render_markdown(&[]), "");
    }
}
