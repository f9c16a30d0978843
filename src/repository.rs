//! Defines the [`Repository`], the canonical immutable collection of posts
//! along with its derived tag universe.

use crate::builtin;
use crate::post::{self, Parser, Post};
use crate::tag::tag_universe;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// An immutable set of posts in insertion order plus the sorted, deduplicated
/// list of every tag they carry. The tag list is derived once at
/// construction; there is no way to change the posts afterwards.
#[derive(Debug, Clone)]
pub struct Repository {
    posts: Vec<Post>,
    tags: Vec<String>,
}

impl Repository {
    /// Builds a repository from `posts`, rejecting duplicate IDs and slugs.
    pub fn new(posts: Vec<Post>) -> Result<Repository> {
        let mut ids = HashSet::with_capacity(posts.len());
        let mut slugs = HashSet::with_capacity(posts.len());
        for post in &posts {
            if !ids.insert(post.id.as_str()) {
                return Err(Error::DuplicateId(post.id.clone()));
            }
            if !slugs.insert(post.slug.as_str()) {
                return Err(Error::DuplicateSlug(post.slug.clone()));
            }
        }

        let tags = tag_universe(&posts);
        debug!(posts = posts.len(), tags = tags.len(), "built repository");
        Ok(Repository { posts, tags })
    }

    /// Builds a repository from the posts compiled into the binary.
    pub fn builtin(parser: &Parser) -> Result<Repository> {
        Repository::new(builtin::posts(parser)?)
    }

    /// Builds a repository from the markdown files under `dir`. See
    /// [`Parser::parse_directory`].
    pub fn from_directory(dir: &Path, parser: &Parser) -> Result<Repository> {
        info!(directory = %dir.display(), "loading posts");
        Repository::new(parser.parse_directory(dir)?)
    }

    /// Every post, in insertion order.
    pub fn all_posts(&self) -> &[Post] {
        &self.posts
    }

    /// Every distinct tag, sorted ascending (case-sensitive).
    pub fn all_tags(&self) -> &[String] {
        &self.tags
    }

    /// Looks a post up by ID.
    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Looks a post up by ID, falling back to slug.
    pub fn find(&self, id_or_slug: &str) -> Option<&Post> {
        self.get(id_or_slug)
            .or_else(|| self.posts.iter().find(|p| p.slug == id_or_slug))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem building a [`Repository`].
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source can't be read or parsed.
    Parse(post::Error),

    /// Returned when two posts share an ID.
    DuplicateId(String),

    /// Returned when two posts share a slug.
    DuplicateSlug(String),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::DuplicateId(id) => write!(f, "duplicate post id `{}`", id),
            Error::DuplicateSlug(slug) => {
                write!(f, "duplicate post slug `{}`", slug)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::DuplicateId(_) => None,
            Error::DuplicateSlug(_) => None,
        }
    }
}

impl From<post::Error> for Error {
    /// Converts [`post::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: post::Error) -> Error {
        Error::Parse(err)
    }
}
