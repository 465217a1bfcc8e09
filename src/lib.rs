//! Starlinks - starred links as a web site
//!
//! This crate republishes a feed reader's starred-items RSS export: HTML
//! views at `/` and `/tech`, rewritten XML at `/feed.xml` and
//! `/tech-feed.xml`, static files for everything else.

pub mod config;
pub mod error;
pub mod feed;
pub mod fetcher;
pub mod render;
pub mod routes;
pub mod xml;
