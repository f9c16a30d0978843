//! Defines the [`Session`] type: the state of one blog page as a reader
//! browses it. A session owns its query, the open post, and the tag bar's
//! expansion; the [`Repository`] it reads from is shared and never changes.

use crate::post::Post;
use crate::query::{evaluate, Query, SortKey, SortOption, SortOrder};
use crate::repository::Repository;
use crate::tag::TagSelection;
use tracing::debug;

/// One tag in the tag bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagChip<'a> {
    pub name: &'a str,

    /// Whether the tag is currently selected.
    pub active: bool,
}

/// The tags offered for filtering, as the reader currently sees them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagBar<'a> {
    /// The visible tags, in tag-universe order.
    pub chips: Vec<TagChip<'a>>,

    /// How many tags are hidden behind the "+N more" toggle. Zero when
    /// expanded or when every tag fits.
    pub hidden: usize,

    /// Whether there are more tags than fit in the preview, i.e. whether the
    /// expand/collapse toggle is offered at all.
    pub collapsible: bool,

    pub expanded: bool,
}

impl TagBar<'_> {
    /// The label of the expand/collapse toggle, if one is offered.
    pub fn toggle_label(&self) -> Option<String> {
        match (self.collapsible, self.expanded) {
            (false, _) => None,
            (true, true) => Some(String::from("Show Less")),
            (true, false) => Some(format!("+{} more", self.hidden)),
        }
    }
}

pub struct Session<'r> {
    repository: &'r Repository,
    query: Query,

    /// Bumped on every query change.
    generation: u64,

    /// The last evaluation and the generation it was computed for.
    visible: Option<(u64, Vec<&'r Post>)>,

    open_post: Option<&'r Post>,
    tags_expanded: bool,
    tag_preview_count: usize,
}

impl<'r> Session<'r> {
    /// Starts a session with the default query (everything, newest first).
    pub fn new(repository: &'r Repository, tag_preview_count: usize) -> Session<'r> {
        Session {
            repository,
            query: Query::default(),
            generation: 0,
            visible: None,
            open_post: None,
            tags_expanded: false,
            tag_preview_count,
        }
    }

    pub fn repository(&self) -> &'r Repository {
        self.repository
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    fn query_changed(&mut self) {
        self.generation += 1;
    }

    pub fn set_search_term<S: Into<String>>(&mut self, term: S) {
        let term = term.into();
        if term != self.query.search_term {
            self.query.search_term = term;
            self.query_changed();
        }
    }

    /// Selects `tag` if it isn't selected, deselects it otherwise.
    pub fn toggle_tag(&mut self, tag: &str) {
        self.query.selected_tags.toggle(tag);
        self.query_changed();
    }

    /// Deselects every tag.
    pub fn clear_tags(&mut self) {
        if !self.query.selected_tags.is_empty() {
            self.query.selected_tags.clear();
            self.query_changed();
        }
    }

    pub fn set_sort(&mut self, sort_by: SortKey, order: SortOrder) {
        if (sort_by, order) != (self.query.sort_by, self.query.order) {
            self.query.sort_by = sort_by;
            self.query.order = order;
            self.query_changed();
        }
    }

    pub fn apply_sort_option(&mut self, option: SortOption) {
        let (sort_by, order) = option.key_and_order();
        self.set_sort(sort_by, order);
    }

    /// The current sort as one of the menu presets.
    pub fn sort_option(&self) -> SortOption {
        SortOption::from_key_and_order(self.query.sort_by, self.query.order)
    }

    /// The posts to display for the current query. The pipeline only re-runs
    /// when the query changed since the previous call.
    pub fn visible_posts(&mut self) -> &[&'r Post] {
        let generation = self.generation;
        let stale = match &self.visible {
            Some((computed_for, _)) => *computed_for != generation,
            None => true,
        };
        if stale {
            let posts = evaluate(self.repository.all_posts(), &self.query);
            debug!(generation, matched = posts.len(), "evaluated query");
            self.visible = Some((generation, posts));
        }

        match &self.visible {
            Some((_, posts)) => posts,
            None => &[],
        }
    }

    /// The selected tags in the order they were picked.
    pub fn active_filters(&self) -> &TagSelection {
        &self.query.selected_tags
    }

    pub fn tag_bar(&self) -> TagBar<'r> {
        let tags = self.repository.all_tags();
        let collapsible = tags.len() > self.tag_preview_count;
        let shown = if self.tags_expanded {
            tags.len()
        } else {
            tags.len().min(self.tag_preview_count)
        };
        TagBar {
            chips: tags[..shown]
                .iter()
                .map(|name| TagChip {
                    name: name.as_str(),
                    active: self.query.selected_tags.contains(name),
                })
                .collect(),
            hidden: tags.len() - shown,
            collapsible,
            expanded: self.tags_expanded,
        }
    }

    pub fn toggle_tags_expanded(&mut self) {
        self.tags_expanded = !self.tags_expanded;
    }

    /// Opens the post with the given ID or slug for reading. Returns the post,
    /// or `None` (leaving the open post unchanged) if there is no such post.
    pub fn open_post(&mut self, id_or_slug: &str) -> Option<&'r Post> {
        let post = self.repository.find(id_or_slug)?;
        self.open_post = Some(post);
        Some(post)
    }

    pub fn close_post(&mut self) {
        self.open_post = None;
    }

    /// The post currently open for reading, if any.
    pub fn opened(&self) -> Option<&'r Post> {
        self.open_post
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::Parser;

    fn repository() -> Repository {
        Repository::builtin(&Parser::default()).unwrap()
    }

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_default_session_shows_newest_first() {
        let repository = repository();
        let mut session = Session::new(&repository, 6);
        assert_eq!(ids(session.visible_posts()), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(session.sort_option(), SortOption::NewestFirst);
    }

    #[test]
    fn test_query_changes_recompute() {
        let repository = repository();
        let mut session = Session::new(&repository, 6);

        session.set_search_term("typescript");
        assert_eq!(ids(session.visible_posts()), vec!["2", "4", "5"]);

        session.apply_sort_option(SortOption::OldestFirst);
        assert_eq!(ids(session.visible_posts()), vec!["5", "4", "2"]);

        session.set_search_term("");
        session.toggle_tag("CSS");
        session.toggle_tag("Performance");
        assert_eq!(ids(session.visible_posts()), vec!["4", "3"]);

        session.clear_tags();
        assert!(session.active_filters().is_empty());
        assert_eq!(session.visible_posts().len(), 5);
    }

    #[test]
    fn test_visible_posts_is_memoized() {
        let repository = repository();
        let mut session = Session::new(&repository, 6);
        let first = session.visible_posts().as_ptr();
        let second = session.visible_posts().as_ptr();
        assert_eq!(first, second);
        assert_eq!(session.generation, 0);

        // No-op changes don't invalidate.
        session.set_search_term("");
        session.clear_tags();
        session.apply_sort_option(SortOption::NewestFirst);
        assert_eq!(session.generation, 0);
    }

    #[test]
    fn test_toggle_twice_restores_results() {
        let repository = repository();
        let mut session = Session::new(&repository, 6);
        let before = ids(session.visible_posts());
        session.toggle_tag("React");
        assert_eq!(ids(session.visible_posts()), vec!["1", "4"]);
        session.toggle_tag("React");
        assert_eq!(ids(session.visible_posts()), before);
    }

    #[test]
    fn test_tag_bar() {
        let repository = repository();
        let mut session = Session::new(&repository, 6);
        session.toggle_tag("CSS");

        let bar = session.tag_bar();
        assert_eq!(bar.chips.len(), 6);
        assert_eq!(bar.hidden, repository.all_tags().len() - 6);
        assert_eq!(bar.toggle_label(), Some(format!("+{} more", bar.hidden)));
        assert!(bar.chips.iter().any(|c| c.name == "CSS" && c.active));
        assert!(bar.chips.iter().filter(|c| c.active).count() == 1);

        session.toggle_tags_expanded();
        let bar = session.tag_bar();
        assert_eq!(bar.chips.len(), repository.all_tags().len());
        assert_eq!(bar.hidden, 0);
        assert_eq!(bar.toggle_label().as_deref(), Some("Show Less"));
    }

    #[test]
    fn test_tag_bar_without_overflow() {
        let repository = repository();
        let session = Session::new(&repository, 100);
        let bar = session.tag_bar();
        assert!(!bar.collapsible);
        assert_eq!(bar.toggle_label(), None);
    }

    #[test]
    fn test_open_and_close_post() {
        let repository = repository();
        let mut session = Session::new(&repository, 6);
        assert!(session.opened().is_none());

        let post = session.open_post("css-grid-complex-layouts-made-simple");
        assert_eq!(post.map(|p| p.id.as_str()), Some("3"));
        assert_eq!(session.opened().map(|p| p.id.as_str()), Some("3"));

        assert!(session.open_post("missing").is_none());
        assert_eq!(session.opened().map(|p| p.id.as_str()), Some("3"));

        session.close_post();
        assert!(session.opened().is_none());
    }
}
