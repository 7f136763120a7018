//! Fill colors for zone polygons.
//!
//! Colors are decorative: they need not be unique or stable between runs.
//! Generation is behind [`ColorSource`] so tests can seed it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation, e.g. `#1f77b4`
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Produces one fill color per zone.
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

/// Uniformly random colors.
pub struct RandomColors {
    rng: StdRng,
}

impl RandomColors {
    /// Seeded from OS entropy
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColors {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> Color {
        Color::new(self.rng.gen(), self.rng.gen(), self.rng.gen())
    }
}

/// Cycles through a fixed list of colors.
pub struct Palette {
    colors: Vec<Color>,
    next: usize,
}

impl Palette {
    /// # Panics
    /// Panics if `colors` is empty.
    #[must_use]
    pub fn new(colors: Vec<Color>) -> Self {
        assert!(!colors.is_empty(), "palette needs at least one color");
        Self { colors, next: 0 }
    }
}

impl ColorSource for Palette {
    fn next_color(&mut self) -> Color {
        let color = self.colors[self.next % self.colors.len()];
        self.next += 1;
        color
    }
}
