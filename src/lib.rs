//! HS tariff code lookup.
//!
//! Builds a hierarchy of tariff chapters and headings from a leveled table,
//! finds the chapter whose words best match a product description and hands
//! the chapter's descendants to a narrowing step that picks the final code.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
