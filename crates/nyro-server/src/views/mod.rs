//! Server-rendered HTML views.
//!
//! Views build strings directly; every value that did not come from the
//! markdown renderer is escaped here.

mod changelog;
mod docs;
mod footer;
mod header;
mod home;
mod icons;
mod layout;

pub(crate) use changelog::changelog_page;
pub(crate) use docs::docs_page;
pub(crate) use home::home_page;
pub(crate) use layout::{Shell, not_found_page, render};
