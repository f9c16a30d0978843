//! Presentation for the blog page: plain text for the terminal (header, tag
//! bar, post cards, and the post reader) and an HTML article for the reader,
//! rendered through a template.

use crate::config::Config;
use crate::markdown;
use crate::page::{Session, TagBar};
use crate::post::Post;
use gtmpl::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

/// The template for [`article_html`]. Every field except `body` is
/// HTML-escaped before templating; `body` is already HTML.
const ARTICLE_TEMPLATE: &str = r#"<article class="post">
  <header>
    <h1>{{ .title }}</h1>
    <p class="meta"><time datetime="{{ .datetime }}">{{ .date }}</time> &middot; {{ .read_time }}</p>
    {{ if .tags }}<ul class="tags">{{ range .tags }}<li>{{ . }}</li>{{ end }}</ul>{{ end }}
  </header>
  <div class="content">
{{ .body }}
  </div>
</article>
"#;

pub fn write_header<W: Write>(w: &mut W, config: &Config) -> io::Result<()> {
    writeln!(w, "{}", config.title)?;
    writeln!(w, "{}", config.description)?;
    if let Some(repository) = &config.repository {
        writeln!(w, "View Source: {}", repository)?;
    }
    if let Some(new_post) = config.new_post_url() {
        writeln!(w, "New Post: {}", new_post)?;
    }
    writeln!(w)
}

/// Writes the tag bar, the current sort, and the active filters.
pub fn write_filters<W: Write>(w: &mut W, session: &Session) -> io::Result<()> {
    write_tag_bar(w, &session.tag_bar())?;
    writeln!(w, "Sort: {}", session.sort_option().label())?;

    let active = session.active_filters();
    if !active.is_empty() {
        let tags: Vec<String> = active.iter().map(|t| format!("{} ×", t)).collect();
        writeln!(w, "Active filters: {}  (clear all)", tags.join(", "))?;
    }
    writeln!(w)
}

fn write_tag_bar<W: Write>(w: &mut W, bar: &TagBar) -> io::Result<()> {
    let chips: Vec<String> = bar
        .chips
        .iter()
        .map(|chip| match chip.active {
            true => format!("[{}]", chip.name),
            false => chip.name.to_owned(),
        })
        .collect();
    write!(w, "Tags: {}", chips.join(", "))?;
    if let Some(label) = bar.toggle_label() {
        write!(w, "  ({})", label)?;
    }
    writeln!(w)
}

/// Writes one card per post, or the empty-state message when there are no
/// posts.
pub fn write_cards<W: Write>(w: &mut W, posts: &[&Post]) -> io::Result<()> {
    if posts.is_empty() {
        writeln!(w, "No posts found")?;
        return writeln!(w, "Try adjusting your search terms or selected tags.");
    }

    for post in posts {
        writeln!(w, "{}", post.title)?;
        writeln!(w, "  {} · {}", post.display_date(), post.read_time)?;
        writeln!(w, "  {}", post.excerpt)?;
        if !post.tags.is_empty() {
            writeln!(w, "  Tags: {}", post.tags.join(", "))?;
        }
        writeln!(w, "  Read more: {}", post.slug)?;
        writeln!(w)?;
    }
    Ok(())
}

/// Writes the full post as text: title, meta, tags, and the markdown source.
pub fn write_post<W: Write>(w: &mut W, post: &Post) -> io::Result<()> {
    writeln!(w, "{}", post.title)?;
    writeln!(w, "{} · {}", post.display_date(), post.read_time)?;
    if !post.tags.is_empty() {
        writeln!(w, "Tags: {}", post.tags.join(", "))?;
    }
    writeln!(w)?;
    writeln!(w, "{}", post.content)
}

/// Renders the post as an HTML `<article>`. `heading_offset` demotes the
/// body's headings (see [`markdown::to_html`]) beneath the article title.
pub fn article_html(post: &Post, heading_offset: u32) -> Result<String> {
    let mut body = String::new();
    markdown::to_html(&mut body, &post.content, heading_offset);

    let tags = post
        .tags
        .iter()
        .map(|tag| escape(tag).map(Value::String))
        .collect::<io::Result<Vec<Value>>>()?;

    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), Value::String(escape(&post.title)?));
    m.insert("date".to_owned(), Value::String(post.display_date()));
    m.insert("datetime".to_owned(), Value::String(post.date.to_string()));
    m.insert("read_time".to_owned(), Value::String(escape(&post.read_time)?));
    m.insert("tags".to_owned(), Value::Array(tags));
    m.insert("body".to_owned(), Value::String(body));

    Ok(gtmpl::template(ARTICLE_TEMPLATE, Value::Object(m))?)
}

fn escape(s: &str) -> io::Result<String> {
    let mut escaped = String::with_capacity(s.len());
    escape_html(&mut escaped, s)?;
    Ok(escaped)
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a page.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing the output.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
