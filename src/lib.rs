//! The library code for the `blogview` site. Serving a page breaks down into
//! three steps:
//!
//! 1. Loading everything the page shows in a fixed number of statements
//!    ([`crate::planner`])
//! 2. Projecting the loaded rows into flat view models ([`crate::project`]),
//!    assembled per page by [`crate::pages`]
//! 3. Rendering the page context with the theme's templates
//!    ([`crate::render`])
//!
//! The first step is the one that matters. Listings show, for every post, its
//! author, its comment count, and each of its tags with that tag's own post
//! count. Fetched naively, that is several statements per listed post. The
//! planner instead returns [`post::PostCard`]s and [`post::PostDetail`]s that
//! already carry every related row, and the projector accepts nothing else.
//!
//! The HTTP side lives in [`crate::web`]; it runs the first two steps on the
//! blocking pool and the third on the worker.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod comment;
pub mod config;
pub mod db;
pub mod error;
pub mod markdown;
pub mod pages;
pub mod planner;
pub mod post;
pub mod project;
pub mod render;
pub mod tag;
pub mod url;
pub mod value;
pub mod web;

#[cfg(test)]
mod testutil;
