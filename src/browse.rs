//! Exports the [`run`] function which stitches together the steps behind each
//! command: loading the configuration ([`crate::config`]), building the
//! repository ([`crate::repository`]), driving a [`Session`] the way a reader
//! would, and rendering the result ([`crate::render`]).

use crate::config::{self, Config};
use crate::page::Session;
use crate::post::Parser;
use crate::query::SortOption;
use crate::render;
use crate::repository::{self, Repository};
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;

/// Options shared by every command.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// An explicit configuration file. When absent, `devcorner.yaml` is
    /// searched for from the working directory upwards.
    pub config_file: Option<PathBuf>,

    /// Overrides the configured posts directory.
    pub posts_directory: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show the header, filters, and matching post cards.
    List {
        search: Option<String>,
        tags: Vec<String>,
        sort: SortOption,
        expand_tags: bool,
    },

    /// Print the tag universe.
    Tags,

    /// Open one post in the reader.
    Show { post: String, html: bool },
}

/// The reader's HTML article nests body headings one level below its title.
const ARTICLE_HEADING_OFFSET: u32 = 1;

/// Runs `command`, writing its output to `w`.
pub fn run<W: Write>(options: &Options, command: &Command, w: &mut W) -> Result<()> {
    let config = load_config(options)?;
    let parser = Parser::new(config.words_per_minute);
    let posts_directory = options
        .posts_directory
        .as_ref()
        .or_else(|| config.posts_directory.as_ref());
    let repository = match posts_directory {
        Some(dir) => Repository::from_directory(dir, &parser)?,
        None => Repository::builtin(&parser)?,
    };
    let mut session = Session::new(&repository, config.tag_preview_count);

    match command {
        Command::List {
            search,
            tags,
            sort,
            expand_tags,
        } => {
            if let Some(term) = search {
                session.set_search_term(term.as_str());
            }
            for tag in tags {
                if !repository.all_tags().iter().any(|t| t == tag) {
                    warn!(tag = %tag, "no post carries this tag");
                }
                if !session.active_filters().contains(tag) {
                    session.toggle_tag(tag);
                }
            }
            session.apply_sort_option(*sort);
            if *expand_tags {
                session.toggle_tags_expanded();
            }

            render::write_header(w, &config)?;
            render::write_filters(w, &session)?;
            render::write_cards(w, session.visible_posts())?;
        }
        Command::Tags => {
            for tag in repository.all_tags() {
                writeln!(w, "{}", tag)?;
            }
        }
        Command::Show { post, html } => {
            let opened = session
                .open_post(post)
                .ok_or_else(|| Error::UnknownPost(post.clone()))?;
            if *html {
                w.write_all(render::article_html(opened, ARTICLE_HEADING_OFFSET)?.as_bytes())?;
            } else {
                render::write_post(w, opened)?;
            }
        }
    }
    Ok(())
}

fn load_config(options: &Options) -> Result<Config> {
    Ok(match &options.config_file {
        Some(path) => Config::from_project_file(path)?,
        None => Config::from_directory(&std::env::current_dir()?)?,
    })
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for running a command.
#[derive(Debug)]
pub enum Error {
    /// Returned for configuration problems.
    Config(config::Error),

    /// Returned when the posts can't be loaded.
    Repository(repository::Error),

    /// Returned for rendering problems.
    Render(render::Error),

    /// Returned when `show` names no known post.
    UnknownPost(String),

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(err) => err.fmt(f),
            Error::Repository(err) => err.fmt(f),
            Error::Render(err) => err.fmt(f),
            Error::UnknownPost(post) => {
                write!(f, "no post with id or slug `{}`", post)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Repository(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::UnknownPost(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<config::Error> for Error {
    /// Converts [`config::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: config::Error) -> Error {
        Error::Config(err)
    }
}

impl From<repository::Error> for Error {
    /// Converts [`repository::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: repository::Error) -> Error {
        Error::Repository(err)
    }
}

impl From<render::Error> for Error {
    /// Converts [`render::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: render::Error) -> Error {
        Error::Render(err)
    }
}

impl From<io::Error> for Error {
    /// Converts [`io::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    // Pins the configuration so the working directory can't leak in.
    fn options() -> (TempDir, Options) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(config::CONFIG_FILE_NAME);
        std::fs::write(&path, "title: Test Blog\ndescription: For tests.\n").unwrap();
        let options = Options {
            config_file: Some(path),
            posts_directory: None,
        };
        (dir, options)
    }

    fn output(options: &Options, command: &Command) -> Result<String> {
        let mut out = Vec::new();
        run(options, command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn list(search: Option<&str>, tags: &[&str], sort: SortOption) -> Command {
        Command::List {
            search: search.map(String::from),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            sort,
            expand_tags: false,
        }
    }

    #[test]
    fn test_list() -> Result<()> {
        let (_dir, options) = options();
        let out = output(&options, &list(None, &[], SortOption::NewestFirst))?;
        assert!(out.starts_with("Test Blog\nFor tests.\n"));
        assert!(out.contains("Sort: Newest First"));
        let first = out.find("Building a Modern Blog").unwrap();
        let last = out.find("Modern JavaScript: ES2024").unwrap();
        assert!(first < last);
        Ok(())
    }

    #[test]
    fn test_list_with_filters() -> Result<()> {
        let (_dir, options) = options();
        let out = output(
            &options,
            &list(Some("REACT"), &["Performance"], SortOption::TitleAscending),
        )?;
        assert!(out.contains("Active filters: Performance ×"));
        assert!(out.contains("Building Scalable React Applications"));
        assert!(!out.contains("Building a Modern Blog"));
        Ok(())
    }

    #[test]
    fn test_list_no_match() -> Result<()> {
        let (_dir, options) = options();
        let out = output(
            &options,
            &list(Some("zzz-nonexistent"), &["CSS"], SortOption::NewestFirst),
        )?;
        assert!(out.contains("No posts found"));
        Ok(())
    }

    #[test]
    fn test_tags() -> Result<()> {
        let (_dir, options) = options();
        let out = output(&options, &Command::Tags)?;
        let tags: Vec<&str> = out.lines().collect();
        assert_eq!(tags.first(), Some(&"Architecture"));
        assert_eq!(tags.len(), 19);
        Ok(())
    }

    #[test]
    fn test_show() -> Result<()> {
        let (_dir, options) = options();
        let out = output(
            &options,
            &Command::Show {
                post: String::from("2"),
                html: false,
            },
        )?;
        assert!(out.starts_with("Mastering TypeScript: Advanced Patterns and Best Practices\nJanuary 12, 2024 · 6 min read\n"));

        let html = output(
            &options,
            &Command::Show {
                post: String::from("css-grid-complex-layouts-made-simple"),
                html: true,
            },
        )?;
        assert!(html.contains("<h1>The Art of CSS Grid: Creating Complex Layouts Made Simple</h1>"));
        assert!(html.contains("<h2>The Art of CSS Grid"));
        Ok(())
    }

    #[test]
    fn test_show_unknown_post() {
        let (_dir, options) = options();
        let command = Command::Show {
            post: String::from("nope"),
            html: false,
        };
        match output(&options, &command) {
            Err(Error::UnknownPost(post)) => assert_eq!(post, "nope"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_posts_directory_override() -> Result<()> {
        let (dir, mut options) = options();
        let posts = dir.path().join("posts");
        std::fs::create_dir(&posts)?;
        std::fs::write(
            posts.join("hello.md"),
            "---\nTitle: Hello There\nDate: 2024-05-01\nTags: [Greeting]\n---\nHi!\n",
        )?;
        options.posts_directory = Some(posts);

        let out = output(&options, &Command::Tags)?;
        assert_eq!(out, "Greeting\n");
        let out = output(&options, &list(None, &[], SortOption::NewestFirst))?;
        assert!(out.contains("Hello There\n  May 1, 2024 · 1 min read\n  Hi!\n"));
        Ok(())
    }
}
