//! Campaign Board - event membership and public publication backend
//!
//! Campaigns and individual users create events, manage who attends or
//! watches them, publish campaign events and announcements to a public
//! board, and rank that board by each viewer's campaign preferences.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
