//! Tag handling: the [`tag_universe`] derivation and the [`TagSelection`]
//! type, which represents the set of tags a reader has chosen to filter by.

use crate::post::Post;
use std::collections::BTreeSet;
use std::iter::FromIterator;

/// Returns every distinct tag across `posts`, sorted ascending. Comparison is
/// case-sensitive, so `CSS` and `css` are distinct tags.
pub fn tag_universe<'a, I>(posts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts
        .into_iter()
        .flat_map(|post| post.tags.iter())
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// A set of selected tags. Membership is what matters for filtering and
/// equality; selection order is kept only so the active filters can be shown
/// in the order the reader picked them.
#[derive(Clone, Debug, Default)]
pub struct TagSelection {
    tags: Vec<String>,
}

impl TagSelection {
    /// Constructs an empty selection.
    pub fn new() -> TagSelection {
        TagSelection::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Iterates the selected tags in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Removes `tag` if it is selected, otherwise adds it. Returns whether
    /// `tag` is selected afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(i) => {
                self.tags.remove(i);
                false
            }
            None => {
                self.tags.push(tag.to_owned());
                true
            }
        }
    }

    /// Deselects every tag at once.
    pub fn clear(&mut self) {
        self.tags = Vec::new();
    }

    /// Returns `true` if the selection is empty or at least one of `tags` is
    /// selected.
    pub fn matches(&self, tags: &[String]) -> bool {
        self.is_empty() || tags.iter().any(|t| self.contains(t))
    }
}

impl PartialEq for TagSelection {
    /// Two selections are equal when they hold the same tags, regardless of
    /// the order in which the tags were selected.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}
impl Eq for TagSelection {}

impl<S: Into<String>> FromIterator<S> for TagSelection {
    /// Collects tags into a selection, dropping repeats.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = TagSelection::new();
        for tag in iter {
            let tag = tag.into();
            if !selection.contains(&tag) {
                selection.tags.push(tag);
            }
        }
        selection
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn post(id: &str, tags: &[&str]) -> Post {
        Post {
            id: id.to_owned(),
            title: id.to_owned(),
            excerpt: String::new(),
            content: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            read_time: String::from("1 min read"),
            slug: id.to_owned(),
        }
    }

    #[test]
    fn test_tag_universe_deduplicated_and_sorted() {
        let posts = vec![
            post("1", &["React", "CSS"]),
            post("2", &["CSS", "React"]),
            post("3", &["JavaScript"]),
        ];
        assert_eq!(tag_universe(&posts), vec!["CSS", "JavaScript", "React"]);
    }

    #[test]
    fn test_tag_universe_case_sensitive() {
        let posts = vec![post("1", &["css", "CSS", "css"])];
        assert_eq!(tag_universe(&posts), vec!["CSS", "css"]);
    }

    #[test]
    fn test_tag_universe_empty() {
        assert!(tag_universe(&Vec::<Post>::new()).is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut selection = TagSelection::new();
        assert!(selection.toggle("A"));
        assert!(selection.toggle("B"));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(!selection.toggle("A"));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn test_toggle_is_involutive() {
        let starts: Vec<TagSelection> = vec![
            TagSelection::new(),
            vec!["A"].into_iter().collect(),
            vec!["T", "A"].into_iter().collect(),
            vec!["A", "T", "B"].into_iter().collect(),
        ];
        for start in starts {
            let mut selection = start.clone();
            selection.toggle("T");
            selection.toggle("T");
            assert_eq!(selection, start);
        }
    }

    #[test]
    fn test_clear() {
        let mut selection: TagSelection = vec!["A", "B", "C"].into_iter().collect();
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection, TagSelection::new());
    }

    #[test]
    fn test_matches_is_inclusive_or() {
        let selection: TagSelection = vec!["A", "B"].into_iter().collect();
        assert!(selection.matches(&[String::from("A")]));
        assert!(selection.matches(&[String::from("B")]));
        assert!(selection.matches(&[String::from("A"), String::from("B")]));
        assert!(!selection.matches(&[String::from("C")]));
        assert!(!selection.matches(&[]));
        assert!(TagSelection::new().matches(&[]));
    }

    #[test]
    fn test_from_iter_drops_repeats() {
        let selection: TagSelection = vec!["A", "A", "B"].into_iter().collect();
        assert_eq!(selection.len(), 2);
    }
}
