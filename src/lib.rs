// src/lib.rs

pub mod annotator;
pub mod cli;
pub mod config;
pub mod error;
pub mod heat;
pub mod logging;
pub mod model;
pub mod renderer;
pub mod repo;
pub mod revisions;
pub mod timeline;

pub use annotator::Annotator;
pub use error::{Error, Result};
pub use heat::{build_levels, interpolate, HeatMap, Palette, Theme, ThemeId};
pub use model::{Commit, HistoryModel, LineRecord};
pub use repo::RepoLocation;
pub use revisions::RevisionCache;
pub use timeline::Session;
