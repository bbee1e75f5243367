//! Active rendering systems
//!
//! This module contains the stateful runtime systems that turn draw requests
//! into backend submissions: atlases, text, batching and the UI painter.

pub mod atlas;
pub mod batching;
pub mod text;
pub mod ui;
