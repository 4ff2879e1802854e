// src/heat.rs

use crate::error::{Error, Result};
use palette::Srgb;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

pub type Color = Srgb<u8>;

/// Maps a line timestamp to a heat level in 0..=255
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeatMap {
    levels: BTreeMap<i64, u8>,
}

impl HeatMap {
    pub fn get(&self, timestamp: i64) -> Option<u8> {
        self.levels.get(&timestamp).copied()
    }

    /// Level for `timestamp`, unknown timestamps are treated as the coldest
    pub fn level(&self, timestamp: i64) -> u8 {
        self.get(timestamp).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, u8)> + '_ {
        self.levels.iter().map(|(&timestamp, &level)| (timestamp, level))
    }
}

/// Builds heat levels from a set of distinct timestamps.
///
/// Each level couples how far a timestamp sits between the oldest and newest
/// edit with its rank among all edits, cubed so that outliers are compressed
/// towards the cold end. Timestamp 0 always maps to level 0.
pub fn build_levels<I>(timestamps: I) -> HeatMap
where
    I: IntoIterator<Item = i64>,
{
    let mut levels = BTreeMap::new();
    levels.insert(0, 0);

    let sorted: Vec<i64> = timestamps
        .into_iter()
        .filter(|&timestamp| timestamp != 0)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    match sorted.as_slice() {
        [] => {}
        [only] => {
            levels.insert(*only, 0);
        }
        [min, .., max] => {
            let span = (max - min) as f64;
            let last = (sorted.len() - 1) as f64;
            for (i, &timestamp) in sorted.iter().enumerate() {
                let t0 = (timestamp - min) as f64 / span;
                let t1 = i as f64 / last;
                let t = (t0 * t1).powi(3);
                levels.insert(timestamp, (t * 255.0).floor() as u8);
            }
        }
    }

    HeatMap { levels }
}

/// Linearly interpolates each channel between `from` (level 0) and `to` (level 255).
pub fn interpolate(level: i64, from: Color, to: Color) -> Result<Color> {
    let level = u8::try_from(level).map_err(|_| Error::InvalidLevel(level))?;
    Ok(lerp(level, from, to))
}

fn lerp(level: u8, from: Color, to: Color) -> Color {
    let l = level as f64 / 255.0;
    let channel = |from: u8, to: u8| ((to as f64 - from as f64) * l + from as f64).floor() as u8;

    Srgb::new(
        channel(from.red, to.red),
        channel(from.green, to.green),
        channel(from.blue, to.blue),
    )
}

pub fn to_hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Whether the surrounding UI is light or dark, used to pick a theme for `auto`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    /// Yellow Snow on light backgrounds, Purple Stain otherwise
    #[default]
    Auto,
    /// Black text, white fading to yellow
    YellowSnow,
    /// White text turning yellow, grey fading to purple
    PurpleStain,
}

impl ThemeId {
    pub fn resolve(self, appearance: Appearance) -> Theme {
        match (self, appearance) {
            (ThemeId::YellowSnow, _) | (ThemeId::Auto, Appearance::Light) => Theme::yellow_snow(),
            (ThemeId::PurpleStain, _) | (ThemeId::Auto, Appearance::Dark) => Theme::purple_stain(),
        }
    }
}

/// Two gradients, old to new, evaluated at the same level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub fg_old: Color,
    pub fg_new: Color,
    pub bg_old: Color,
    pub bg_new: Color,
}

impl Theme {
    pub fn yellow_snow() -> Self {
        Self {
            name: "Yellow Snow",
            fg_old: Srgb::new(0, 0, 0),
            fg_new: Srgb::new(0, 0, 0),
            bg_old: Srgb::new(255, 255, 255),
            bg_new: Srgb::new(255, 255, 0),
        }
    }

    pub fn purple_stain() -> Self {
        Self {
            name: "Purple Stain",
            fg_old: Srgb::new(255, 255, 255),
            fg_new: Srgb::new(255, 255, 0),
            bg_old: Srgb::new(48, 48, 48),
            bg_new: Srgb::new(87, 38, 128),
        }
    }
}

/// Foreground/background pairs for every level of a theme
#[derive(Debug, Clone)]
pub struct Palette {
    pairs: Vec<(Color, Color)>,
}

impl Palette {
    pub fn new(theme: &Theme) -> Self {
        let pairs = (0..=u8::MAX)
            .map(|level| {
                (
                    lerp(level, theme.fg_old, theme.fg_new),
                    lerp(level, theme.bg_old, theme.bg_new),
                )
            })
            .collect();
        Self { pairs }
    }

    pub fn pair(&self, level: u8) -> (Color, Color) {
        self.pairs[level as usize]
    }

    pub fn fg(&self, level: u8) -> Color {
        self.pair(level).0
    }

    pub fn bg(&self, level: u8) -> Color {
        self.pair(level).1
    }
}
