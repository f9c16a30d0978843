//! Defines the [`Post`], [`Parser`], and [`Error`] types. Also defines the
//! logic for parsing posts from markdown source files (either compiled into
//! the binary or read from a directory on disk) into memory.

use std::{
    fmt,
    fs::File,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::markdown;

/// The words-per-minute rate used to estimate a post's reading time when the
/// front matter doesn't provide one.
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

const MARKDOWN_EXTENSION: &str = "md";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

/// A single article. Posts are immutable once loaded into a
/// [`crate::repository::Repository`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    /// Unique, stable key for the post.
    pub id: String,

    /// The display title. Also a search target.
    pub title: String,

    /// A short summary shown on post cards. Also a search target.
    pub excerpt: String,

    /// The full body in markdown. Also a search target.
    pub content: String,

    /// Tags in source order. Duplicates are tolerated; matching treats the
    /// list as a set.
    pub tags: Vec<String>,

    /// The publication date.
    pub date: NaiveDate,

    /// Human-readable reading time (e.g., `8 min read`).
    pub read_time: String,

    /// Unique, human-readable address for the post.
    pub slug: String,
}

impl Post {
    /// Formats the publication date in the long `en-US` form, e.g.
    /// `January 15, 2024`.
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// Estimates reading time as whole minutes at `words_per_minute`, rounding up
/// and never reporting less than one minute.
pub fn estimate_read_time(content: &str, words_per_minute: usize) -> String {
    let words_per_minute = words_per_minute.max(1);
    let words = content.split_whitespace().count();
    let mut minutes = words / words_per_minute;
    if words % words_per_minute != 0 {
        minutes += 1;
    }
    let minutes = minutes.max(1);
    format!("{} min read", minutes)
}

/// Parses [`Post`] objects from markdown sources with YAML front matter.
#[derive(Clone, Debug)]
pub struct Parser {
    /// Reading rate used for posts without an explicit `ReadTime`.
    words_per_minute: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new(DEFAULT_WORDS_PER_MINUTE)
    }
}

impl Parser {
    /// Constructs a new parser.
    pub fn new(words_per_minute: usize) -> Parser {
        Parser { words_per_minute }
    }

    /// Parses a single [`Post`] from a `default_id` and `input` string. The
    /// `default_id` is used unless the front matter sets `Id`. Each source
    /// must be structured as follows:
    ///
    /// 1. Initial front matter fence (`---`)
    /// 2. YAML front matter with fields `Title`, `Date`, and optionally
    ///    `Id`, `Slug`, `Excerpt`, `Tags`, and `ReadTime`
    /// 3. Terminal front matter fence (`---`) on its own line
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// Title: Hello, world!
    /// Date: 2024-01-15
    /// Tags: [greet]
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_post(&self, default_id: &str, input: &str) -> Result<Post> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            match input[FENCE.len()..].find("\n---") {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                            // yaml_start
                    FENCE.len() + offset + 1,               // yaml_stop
                    FENCE.len() + offset + 1 + FENCE.len(), // body_start
                )),
            }
        }

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        let date = NaiveDate::parse_from_str(frontmatter.date.trim(), DATE_FORMAT)
            .map_err(|err| Error::InvalidDate {
                date: frontmatter.date.clone(),
                err,
            })?;

        let content = input[body_start..]
            .trim_start_matches(|c: char| c == '\r' || c == '\n')
            .trim_end()
            .to_owned();

        let excerpt = match frontmatter.excerpt {
            Some(excerpt) => excerpt,
            None => markdown::first_paragraph_text(&content).unwrap_or_default(),
        };
        let read_time = match frontmatter.read_time {
            Some(read_time) => read_time,
            None => estimate_read_time(&content, self.words_per_minute),
        };

        let slug = match frontmatter.slug {
            Some(slug) => slug,
            None => slug::slugify(&frontmatter.title),
        };

        Ok(Post {
            id: frontmatter.id.unwrap_or_else(|| default_id.to_owned()),
            slug,
            title: frontmatter.title,
            excerpt,
            content,
            tags: frontmatter.tags,
            date,
            read_time,
        })
    }

    /// Parses a named source, annotating any error with `name`.
    pub fn parse_source(&self, name: &str, input: &str) -> Result<Post> {
        self.parse_post(name, input)
            .map_err(|e| Error::Annotated(format!("parsing post `{}`", name), Box::new(e)))
    }

    /// Searches `source_directory` recursively for post files (extension =
    /// `.md`) and returns the parsed posts in path order. The default ID of
    /// each post is its path relative to `source_directory` less the
    /// extension (e.g., the ID for `{source_directory}/foo/bar.md` is
    /// `foo/bar`).
    pub fn parse_directory(&self, source_directory: &Path) -> Result<Vec<Post>> {
        use walkdir::WalkDir;

        let mut posts = Vec::new();
        for result in WalkDir::new(source_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result?;
            let is_markdown = entry.path().extension().map_or(false, |ext| {
                ext == MARKDOWN_EXTENSION
            });
            if !entry.file_type().is_file() || !is_markdown {
                continue;
            }

            // strip_prefix() should never fail since `source_directory` is
            // always an ancestor of the entry
            let relative_path = entry
                .path()
                .strip_prefix(source_directory)
                .unwrap_or_else(|_| entry.path());
            posts.push(self.parse_file(entry.path(), relative_path)?);
        }

        debug!(
            directory = %source_directory.display(),
            count = posts.len(),
            "parsed posts"
        );
        Ok(posts)
    }

    fn parse_file(&self, path: &Path, relative_path: &Path) -> Result<Post> {
        let id = relative_path
            .with_extension("")
            .to_str()
            .ok_or_else(|| Error::InvalidFileName(relative_path.to_owned()))?
            .replace('\\', "/");

        use std::io::Read;
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|err| {
                Error::Annotated(
                    format!("reading post `{}`", path.display()),
                    Box::new(Error::Io(err)),
                )
            })?;

        self.parse_post(&id, &contents).map_err(|e| {
            Error::Annotated(format!("parsing post `{}`", path.display()), Box::new(e))
        })
    }
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    /// Overrides the ID derived from the source name.
    #[serde(default, rename = "Id")]
    pub id: Option<String>,

    /// The title of the post.
    #[serde(rename = "Title")]
    pub title: String,

    /// The publication date of the post (`YYYY-MM-DD`).
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(default, rename = "Excerpt")]
    pub excerpt: Option<String>,

    /// The tags associated with the post.
    #[serde(default, rename = "Tags")]
    pub tags: Vec<String>,

    #[serde(default, rename = "ReadTime")]
    pub read_time: Option<String>,

    #[serde(default, rename = "Slug")]
    pub slug: Option<String>,
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source is missing its starting front matter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source is missing its terminal front matter
    /// fence (i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the front matter as YAML.
    /// This includes missing required fields.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the `Date` field isn't a `YYYY-MM-DD` calendar date.
    InvalidDate { date: String, err: chrono::ParseError },

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source file's path isn't valid UTF-8.
    InvalidFileName(PathBuf),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::InvalidDate { date, err } => {
                write!(f, "invalid date `{}`: {}", date, err)
            }
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::InvalidDate { date: _, err } => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(_) => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking the posts directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
