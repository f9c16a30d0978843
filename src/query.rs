//! The search-filter-sort pipeline. [`evaluate`] derives the list of posts to
//! display from the full collection and a [`Query`].

use crate::collate::{self, CollationKey};
use crate::post::Post;
use crate::tag::TagSelection;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The field posts are ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Date,
    Title,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Date
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SortKey::Date => write!(f, "date"),
            SortKey::Title => write!(f, "title"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Descending
    }
}

impl SortOrder {
    /// Applies the direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// The four sort presets offered to readers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortOption {
    NewestFirst,
    OldestFirst,
    TitleAscending,
    TitleDescending,
}

impl SortOption {
    /// All presets in menu order.
    pub const ALL: [SortOption; 4] = [
        SortOption::NewestFirst,
        SortOption::OldestFirst,
        SortOption::TitleAscending,
        SortOption::TitleDescending,
    ];

    /// The menu label, e.g. `Newest First`.
    pub fn label(self) -> &'static str {
        match self {
            SortOption::NewestFirst => "Newest First",
            SortOption::OldestFirst => "Oldest First",
            SortOption::TitleAscending => "Title A-Z",
            SortOption::TitleDescending => "Title Z-A",
        }
    }

    /// The command-line name, e.g. `newest`.
    pub fn name(self) -> &'static str {
        match self {
            SortOption::NewestFirst => "newest",
            SortOption::OldestFirst => "oldest",
            SortOption::TitleAscending => "title-asc",
            SortOption::TitleDescending => "title-desc",
        }
    }

    pub fn key_and_order(self) -> (SortKey, SortOrder) {
        match self {
            SortOption::NewestFirst => (SortKey::Date, SortOrder::Descending),
            SortOption::OldestFirst => (SortKey::Date, SortOrder::Ascending),
            SortOption::TitleAscending => (SortKey::Title, SortOrder::Ascending),
            SortOption::TitleDescending => (SortKey::Title, SortOrder::Descending),
        }
    }

    pub fn from_key_and_order(key: SortKey, order: SortOrder) -> SortOption {
        match (key, order) {
            (SortKey::Date, SortOrder::Descending) => SortOption::NewestFirst,
            (SortKey::Date, SortOrder::Ascending) => SortOption::OldestFirst,
            (SortKey::Title, SortOrder::Ascending) => SortOption::TitleAscending,
            (SortKey::Title, SortOrder::Descending) => SortOption::TitleDescending,
        }
    }
}

impl FromStr for SortOption {
    type Err = ParseSortOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .iter()
            .copied()
            .find(|option| option.name() == s)
            .ok_or_else(|| ParseSortOptionError(s.to_owned()))
    }
}

/// Returned when a string names no [`SortOption`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortOptionError(String);

impl fmt::Display for ParseSortOptionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown sort option `{}` (expected one of: newest, oldest, title-asc, title-desc)",
            self.0
        )
    }
}

impl std::error::Error for ParseSortOptionError {}

/// The reader's current selection. The defaults (empty term, no tags, newest
/// first) show every post.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    /// Free text matched case-insensitively against title, excerpt, and
    /// content.
    pub search_term: String,

    /// Posts must carry at least one of these tags (any post matches when
    /// empty).
    pub selected_tags: TagSelection,

    pub sort_by: SortKey,

    pub order: SortOrder,
}

impl Query {
    pub fn new() -> Query {
        Query::default()
    }

    pub fn with_search_term<S: Into<String>>(mut self, term: S) -> Query {
        self.search_term = term.into();
        self
    }

    pub fn with_tags(mut self, tags: TagSelection) -> Query {
        self.selected_tags = tags;
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey, order: SortOrder) -> Query {
        self.sort_by = sort_by;
        self.order = order;
        self
    }

    /// Returns `true` if `post` passes both the text and the tag filter.
    pub fn matches(&self, post: &Post) -> bool {
        Matcher::new(self).matches(post)
    }
}

/// Filters and sorts `posts` according to `query`. Returns a new sequence of
/// references; `posts` is left untouched. The sort is stable, so posts that
/// compare equal keep their relative order from `posts` in either direction.
pub fn evaluate<'a>(posts: &'a [Post], query: &Query) -> Vec<&'a Post> {
    let matcher = Matcher::new(query);
    let matched = posts.iter().filter(|post| matcher.matches(post));

    match query.sort_by {
        SortKey::Date => {
            let mut matched: Vec<&Post> = matched.collect();
            matched.sort_by(|a, b| query.order.apply(a.date.cmp(&b.date)));
            matched
        }
        SortKey::Title => {
            let mut keyed: Vec<(CollationKey, &Post)> = matched
                .map(|post| (collate::key(&post.title), post))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| query.order.apply(a.cmp(b)));
            keyed.into_iter().map(|(_, post)| post).collect()
        }
    }
}

// Holds the case-folded search term so it is folded once per evaluation.
struct Matcher<'q> {
    term: String,
    tags: &'q TagSelection,
}

impl<'q> Matcher<'q> {
    fn new(query: &'q Query) -> Matcher<'q> {
        Matcher {
            term: query.search_term.to_lowercase(),
            tags: &query.selected_tags,
        }
    }

    fn matches(&self, post: &Post) -> bool {
        self.matches_text(post) && self.tags.matches(&post.tags)
    }

    // An empty term is a substring of everything.
    fn matches_text(&self, post: &Post) -> bool {
        [&post.title, &post.excerpt, &post.content]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.term))
    }
}
