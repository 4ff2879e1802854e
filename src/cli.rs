// src/cli.rs

use crate::heat::ThemeId;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File to show the history of
    pub file: PathBuf,

    /// Show the file as of this change (0 is the oldest surviving change)
    #[arg(long, conflicts_with_all = ["seek", "step"])]
    pub index: Option<usize>,

    /// Show the change nearest to this point of the timeline, in percent
    #[arg(long, conflicts_with = "step")]
    pub seek: Option<f64>,

    /// Step this many changes back (negative) or forward from the newest
    #[arg(long, allow_hyphen_values = true)]
    pub step: Option<i64>,

    /// Color theme, overrides the config file
    #[arg(long, value_enum)]
    pub theme: Option<ThemeId>,

    /// Pick the light variant when the theme is `auto`
    #[arg(long)]
    pub light: bool,

    /// Hide the author column
    #[arg(long)]
    pub no_authors: bool,

    /// List the changes instead of the file content
    #[arg(long)]
    pub commits: bool,

    /// Print the model, heat levels and colors as JSON
    #[arg(long, conflicts_with = "commits")]
    pub json: bool,

    /// git executable to run, overrides the config file
    #[arg(long)]
    pub git: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}
