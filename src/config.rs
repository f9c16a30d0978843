//! Site configuration. A project may carry a `devcorner.yaml` file; without
//! one the built-in defaults describe the embedded blog.

use crate::post::DEFAULT_WORDS_PER_MINUTE;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// The configuration file name searched for by [`Config::from_directory`].
pub const CONFIG_FILE_NAME: &str = "devcorner.yaml";

const DEFAULT_TITLE: &str = "Developer's Corner";
const DEFAULT_DESCRIPTION: &str = "Thoughts, tutorials, and insights on modern web development, programming patterns, and the ever-evolving tech landscape.";
const DEFAULT_REPOSITORY: &str = "https://github.com/yourusername/your-blog-repo";
const NEW_POST_PATH: &str = "new/main?filename=posts/new-post.md";

#[derive(Deserialize)]
struct TagPreviewCount(usize);
impl Default for TagPreviewCount {
    fn default() -> Self {
        TagPreviewCount(6)
    }
}

#[derive(Deserialize)]
struct WordsPerMinute(usize);
impl Default for WordsPerMinute {
    fn default() -> Self {
        WordsPerMinute(DEFAULT_WORDS_PER_MINUTE)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub repository: Option<Url>,

    #[serde(default)]
    pub posts_directory: Option<PathBuf>,

    #[serde(default)]
    pub tag_preview_count: TagPreviewCount,

    #[serde(default)]
    pub words_per_minute: WordsPerMinute,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The blog title shown in the header.
    pub title: String,

    /// The tagline shown under the title.
    pub description: String,

    /// The blog's source repository, if any. Used for the "View Source" and
    /// "New Post" links.
    pub repository: Option<Url>,

    /// Where to load posts from. `None` means the built-in posts.
    pub posts_directory: Option<PathBuf>,

    /// How many tags the tag bar shows before collapsing the rest behind a
    /// "+N more" toggle.
    pub tag_preview_count: usize,

    /// Reading rate for posts without an explicit read time.
    pub words_per_minute: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: DEFAULT_TITLE.to_owned(),
            description: DEFAULT_DESCRIPTION.to_owned(),
            repository: Url::parse(DEFAULT_REPOSITORY).ok(),
            posts_directory: None,
            tag_preview_count: TagPreviewCount::default().0,
            words_per_minute: WordsPerMinute::default().0,
        }
    }
}

impl Config {
    /// Looks for [`CONFIG_FILE_NAME`] in `dir` and then in each of its
    /// ancestors. Falls back to [`Config::default`] when no file is found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(dir) = current {
            let path = dir.join(CONFIG_FILE_NAME);
            if path.is_file() {
                return Config::from_project_file(&path);
            }
            current = dir.parent();
        }

        info!(start = %dir.display(), "no {} found; using defaults", CONFIG_FILE_NAME);
        Ok(Config::default())
    }

    /// Loads a configuration file. A relative `posts_directory` is resolved
    /// against the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project =
            serde_yaml::from_reader(file).map_err(|err| Error::Parse {
                path: path.to_owned(),
                err,
            })?;

        if project.words_per_minute.0 == 0 {
            return Err(Error::Invalid(
                "`words_per_minute` must be greater than zero".to_owned(),
            ));
        }

        let project_root = path.parent().unwrap_or_else(|| Path::new("."));
        let defaults = Config::default();
        let config = Config {
            title: project.title.unwrap_or(defaults.title),
            description: project.description.unwrap_or(defaults.description),
            repository: project.repository,
            posts_directory: project
                .posts_directory
                .map(|dir| project_root.join(dir)),
            tag_preview_count: project.tag_preview_count.0,
            words_per_minute: project.words_per_minute.0,
        };
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// The URL that opens a new post file in the repository's web editor.
    pub fn new_post_url(&self) -> Option<Url> {
        let repository = self.repository.as_ref()?;
        // NOTE: a trailing slash is significant to [`Url::join`]. Without
        // it, the repository name is treated as a file name and replaced.
        let base = if repository.path().ends_with('/') {
            repository.clone()
        } else {
            Url::parse(&format!("{}/", repository)).ok()?
        };
        base.join(NEW_POST_PATH).ok()
    }
}

/// The result of a fallible configuration operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading a [`Config`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the configuration file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the configuration file isn't valid YAML or has unknown
    /// or mistyped fields.
    Parse { path: PathBuf, err: serde_yaml::Error },

    /// Returned when a field has an unusable value.
    Invalid(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening config file `{}`: {}", path.display(), err)
            }
            Error::Parse { path, err } => {
                write!(f, "Loading configuration `{}`: {}", path.display(), err)
            }
            Error::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::Parse { path: _, err } => Some(err),
            Error::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.title, "Developer's Corner");
        assert_eq!(config.tag_preview_count, 6);
        assert_eq!(config.words_per_minute, 200);
        assert!(config.posts_directory.is_none());
    }

    #[test]
    fn test_from_project_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "title: Notes\nrepository: https://example.com/me/notes\nposts_directory: content\ntag_preview_count: 3\n",
        )?;

        let config = Config::from_project_file(&path)?;
        assert_eq!(config.title, "Notes");
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert_eq!(config.posts_directory, Some(dir.path().join("content")));
        assert_eq!(config.tag_preview_count, 3);
        assert_eq!(config.words_per_minute, 200);
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_ancestors() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "title: Found\n")?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(config.title, "Found");
        Ok(())
    }

    #[test]
    fn test_unknown_field() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "titel: typo\n")?;
        match Config::from_project_file(&path) {
            Err(Error::Parse { .. }) => Ok(()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_zero_words_per_minute() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "words_per_minute: 0\n")?;
        match Config::from_project_file(&path) {
            Err(Error::Invalid(_)) => Ok(()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_new_post_url() {
        let config = Config::default();
        assert_eq!(
            config.new_post_url().map(|u| u.to_string()),
            Some(String::from(
                "https://github.com/yourusername/your-blog-repo/new/main?filename=posts/new-post.md"
            ))
        );

        let config = Config {
            repository: None,
            ..Config::default()
        };
        assert!(config.new_post_url().is_none());
    }
}
