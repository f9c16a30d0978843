//! The post collection compiled into the binary.

use crate::post::{Parser, Post, Result};

/// `(source name, source)` pairs in display insertion order.
const SOURCES: &[(&str, &str)] = &[
    (
        "building-modern-blog-react-tailwindcss",
        include_str!("../posts/building-modern-blog-react-tailwindcss.md"),
    ),
    (
        "mastering-typescript-advanced-patterns",
        include_str!("../posts/mastering-typescript-advanced-patterns.md"),
    ),
    (
        "css-grid-complex-layouts-made-simple",
        include_str!("../posts/css-grid-complex-layouts-made-simple.md"),
    ),
    (
        "scalable-react-applications-architecture",
        include_str!("../posts/scalable-react-applications-architecture.md"),
    ),
    (
        "modern-javascript-es2024-features",
        include_str!("../posts/modern-javascript-es2024-features.md"),
    ),
];

/// Parses the embedded posts in insertion order.
pub fn posts(parser: &Parser) -> Result<Vec<Post>> {
    SOURCES
        .iter()
        .map(|(name, source)| parser.parse_source(name, source))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builtin_posts_parse() -> Result<()> {
        let posts = posts(&Parser::default())?;
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

        let first = &posts[0];
        assert_eq!(first.title, "Building a Modern Blog with React and TailwindCSS");
        assert_eq!(first.slug, "building-modern-blog-react-tailwindcss");
        assert_eq!(first.read_time, "8 min read");
        assert_eq!(first.display_date(), "January 15, 2024");
        assert_eq!(
            first.tags,
            vec!["React", "TailwindCSS", "Web Development", "Tutorial"]
        );
        assert!(first.content.starts_with("# Building a Modern Blog"));
        Ok(())
    }
}
