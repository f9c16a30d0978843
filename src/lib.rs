//! The library code for `devcorner`, a small developer blog. The architecture
//! breaks down into three layers:
//!
//! 1. Loading posts ([`crate::post`]) into an immutable repository
//!    ([`crate::repository`]), either from the posts compiled into the binary
//!    ([`crate::builtin`]) or from a directory of markdown files
//! 2. Querying them ([`crate::query`]): a case-insensitive search over title,
//!    excerpt, and content, then a tag filter, then a stable sort by date or
//!    title
//! 3. Presenting a browsing session ([`crate::page`]) as text or HTML
//!    ([`crate::render`])
//!
//! The query pipeline is the heart of it. A post is visible when it matches
//! the search term (an empty term matches everything) and carries at least
//! one of the selected tags (no selection matches everything). Visible posts
//! keep their repository order among equals, so sorting is stable.
//!
//! [`crate::browse`] ties the layers together behind the command line.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod browse;
pub mod builtin;
pub mod collate;
pub mod config;
pub mod markdown;
pub mod page;
pub mod post;
pub mod query;
pub mod render;
pub mod repository;
pub mod tag;
