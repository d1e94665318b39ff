//! Pulls PDF resources out of a Moodle-style learning site, either
//! live (login session, course and section crawl, concurrent
//! downloads) or offline over previously saved course pages.

mod config;
mod fetch;
mod links;
mod names;

pub use crate::config::{FetchConfig, OnError};
pub use crate::fetch::fetch_courses;
pub use crate::links::{link_lists, rename_downloads, section_pages};
