use rundown_core::placement::neutral_candidates;
use rundown_core::{
    choose_placement, Dataset, MemoryRepository, Policy, RandomSource, RngSource,
    RundownRepository, Story, StoryDraft,
};

const PRESENTERS: [&str; 4] = ["Alice", "Bob", "Carol", "Dave"];

/// Always picks the last candidate.
struct LastPick;

impl RandomSource for LastPick {
    fn intn(&mut self, n: usize) -> usize {
        n - 1
    }
}

fn stories(presenters: &[&str]) -> Vec<Story> {
    presenters
        .iter()
        .enumerate()
        .map(|(i, p)| StoryDraft::new(format!("s{i}"), "", *p).into_story(i as u32 + 1))
        .collect()
}

fn presenters_of(stories: &[Story]) -> Vec<&str> {
    stories.iter().map(|s| s.presenter.as_str()).collect()
}

fn insert(segment: &mut Vec<Story>, presenter: &str, rng: &mut impl RandomSource) -> Policy {
    let story = StoryDraft::new("new", "", presenter).into_story(segment.len() as u32 + 1);
    let placement = choose_placement(segment, presenter, rng);
    segment.insert(placement.index, story);
    placement.policy
}

fn alternates(stories: &[Story]) -> bool {
    stories.windows(2).all(|w| w[0].presenter != w[1].presenter)
}

/// Deterministic alternating segment of length `len` over `PRESENTERS`.
fn alternating(len: usize, offset: usize) -> Vec<Story> {
    let names: Vec<&str> = (0..len)
        .map(|i| PRESENTERS[(i * 3 + offset) % PRESENTERS.len()])
        .collect();
    stories(&names)
}

#[test]
fn empty_segment_appends_with_fallback() {
    let mut segment = Vec::new();
    let policy = insert(&mut segment, "Alice", &mut LastPick);
    assert_eq!(policy, Policy::Append);
    assert_eq!(presenters_of(&segment), vec!["Alice"]);
}

#[test]
fn safe_slot_with_last_pick_appends_after_alice() {
    let mut segment = stories(&["Alice", "Bob", "Alice"]);
    let policy = insert(&mut segment, "Bob", &mut LastPick);
    assert_eq!(policy, Policy::Neutral);
    assert_eq!(presenters_of(&segment), vec!["Alice", "Bob", "Alice", "Bob"]);
}

#[test]
fn violation_is_repaired_deterministically() {
    for seed in 0..32 {
        let mut segment = stories(&["Alice", "Alice", "Bob"]);
        let policy = insert(&mut segment, "Carol", &mut RngSource::seeded(seed));
        assert_eq!(policy, Policy::Repair);
        assert_eq!(presenters_of(&segment), vec!["Alice", "Carol", "Alice", "Bob"]);
    }
}

#[test]
fn dominated_segment_forces_append() {
    let mut segment = stories(&["Alice", "Alice", "Alice"]);
    let policy = insert(&mut segment, "Alice", &mut RngSource::seeded(9));
    assert_eq!(policy, Policy::Append);
    assert_eq!(segment.len(), 4);
    assert_eq!(segment.last().map(|s| s.title.as_str()), Some("new"));
}

#[test]
fn alternation_is_preserved_whenever_a_safe_slot_exists() {
    for len in 0..8 {
        for offset in 0..PRESENTERS.len() {
            let base = alternating(len, offset);
            assert!(alternates(&base));
            for presenter in PRESENTERS.iter().chain(["Eve"].iter()) {
                for seed in 0..8 {
                    let mut segment = base.clone();
                    let policy = insert(&mut segment, presenter, &mut RngSource::seeded(seed));
                    if len == 0 {
                        assert_eq!(policy, Policy::Append);
                    }
                    // A forced append may break alternation only when no
                    // slot avoided the presenter in the first place.
                    let forced = policy == Policy::Append
                        && neutral_candidates(&base, presenter).is_empty();
                    assert!(
                        alternates(&segment) || forced,
                        "len={len} offset={offset} presenter={presenter} seed={seed}: {:?}",
                        presenters_of(&segment)
                    );
                }
            }
        }
    }
}

#[test]
fn single_violation_pair_is_split() {
    // One duplicate pair at every possible position, inside an otherwise
    // alternating A/B segment; the inserting presenter is always C.
    for len in 2..9 {
        for dup in 0..len - 1 {
            let mut names = Vec::with_capacity(len);
            for i in 0..len {
                let name = if i <= dup {
                    if i % 2 == 0 { "A" } else { "B" }
                } else if (i - 1) % 2 == 0 {
                    "A"
                } else {
                    "B"
                };
                names.push(name);
            }
            let base = stories(&names);
            let violations = base
                .windows(2)
                .filter(|w| w[0].presenter == w[1].presenter)
                .count();
            assert_eq!(violations, 1, "fixture {names:?}");

            let mut segment = base.clone();
            let policy = insert(&mut segment, "C", &mut RngSource::seeded(len as u64));
            assert_eq!(policy, Policy::Repair);
            assert!(alternates(&segment), "{:?}", presenters_of(&segment));
        }
    }
}

#[test]
fn fallback_only_when_every_story_shares_the_presenter() {
    for len in 1..6 {
        let mut segment = stories(&vec!["Alice"; len]);
        assert_eq!(insert(&mut segment, "Alice", &mut LastPick), Policy::Append);
        assert_eq!(segment.len(), len + 1);
        assert_eq!(segment.last().map(|s| s.id), Some(len as u32 + 1));

        let mut segment = stories(&vec!["Alice"; len]);
        assert_ne!(insert(&mut segment, "Bob", &mut LastPick), Policy::Append);
    }
}

#[test]
fn repository_ids_track_story_count() {
    let data = Dataset::new(vec!["News".to_string()], vec![]);
    let mut repo = MemoryRepository::with_rng(data, RngSource::seeded(11));
    let slug = repo.add_episode("Ep").unwrap().slug;

    for (n, presenter) in ["A", "A", "B", "C", "A", "B", "B", "A"].iter().enumerate() {
        let story = repo
            .add_story(&slug, "News", StoryDraft::new("t", "", *presenter))
            .unwrap();
        let count = repo.episode_by_slug(&slug).unwrap().segments[0].stories.len();
        assert_eq!(story.id as usize, count);
        assert_eq!(count, n + 1);
    }
}
