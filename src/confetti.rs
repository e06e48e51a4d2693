//! Particle model for the celebratory confetti burst.
//!
//! Pieces are emitted from the top edge over a fixed emission window, thrown
//! with a random velocity and pulled down by gravity until they leave the
//! drawing area. Rendering is left to the caller; this module only moves
//! rectangles around.

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::f64::consts::TAU;
use std::fmt;

/// Pink palette shown on a result reveal.
pub const DEFAULT_PALETTE: &[&str] = &["#FF69B4", "#FFB6C1", "#FFC0CB", "#FF1493"];

/// Duration of a single animation frame the physics constants are tuned for.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiConfig {
    pub palette: &'static [&'static str],
    pub pieces: usize,
    pub gravity: f64,
    pub initial_velocity_x: f64,
    pub initial_velocity_y: f64,
    pub friction: f64,
    pub wind: f64,
    /// Time over which all pieces are released.
    pub emit_duration_ms: f64,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE,
            pieces: 5000,
            gravity: 0.1,
            initial_velocity_x: 4.0,
            initial_velocity_y: 12.0,
            friction: 0.99,
            wind: 0.0,
            emit_duration_ms: 5000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfettiError {
    EmptyArea { width: f64, height: f64 },
    EmptyPalette,
    InvalidRange(&'static str),
}

impl fmt::Display for ConfettiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfettiError::EmptyArea { width, height } => {
                write!(f, "Cannot draw confetti on a {}x{} area", width, height)
            }
            ConfettiError::EmptyPalette => write!(f, "Confetti palette is empty"),
            ConfettiError::InvalidRange(what) => write!(f, "Invalid confetti range for {}", what),
        }
    }
}

impl std::error::Error for ConfettiError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    pub angle: f64,
    pub spin: f64,
    pub color: &'static str,
}

struct SpawnDistributions {
    x: Uniform<f64>,
    vx: Uniform<f64>,
    vy: Uniform<f64>,
    width: Uniform<f64>,
    height: Uniform<f64>,
    angle: Uniform<f64>,
    spin: Uniform<f64>,
    color: Uniform<usize>,
}

impl SpawnDistributions {
    fn new(config: &ConfettiConfig, area_width: f64) -> Result<Self, ConfettiError> {
        let range = |what, low: f64, high: f64| {
            Uniform::new_inclusive(low, high).map_err(|_| ConfettiError::InvalidRange(what))
        };
        let vx = config.initial_velocity_x.abs();
        let vy = config.initial_velocity_y.abs();

        Ok(Self {
            x: range("x", 0.0, area_width)?,
            vx: range("horizontal velocity", -vx, vx)?,
            vy: range("vertical velocity", -vy, 0.0)?,
            width: range("piece width", 5.0, 20.0)?,
            height: range("piece height", 10.0, 30.0)?,
            angle: range("angle", 0.0, TAU)?,
            spin: range("spin", -0.2, 0.2)?,
            color: Uniform::new(0, config.palette.len())
                .map_err(|_| ConfettiError::EmptyPalette)?,
        })
    }
}

/// A single non-recycling confetti burst.
pub struct ConfettiBurst<R: Rng> {
    config: ConfettiConfig,
    width: f64,
    height: f64,
    rng: R,
    spawn: SpawnDistributions,
    particles: Vec<Particle>,
    emitted: usize,
    elapsed_ms: f64,
}

impl<R: Rng> ConfettiBurst<R> {
    pub fn new(config: ConfettiConfig, width: f64, height: f64, rng: R) -> Result<Self, ConfettiError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfettiError::EmptyArea { width, height });
        }
        if config.palette.is_empty() {
            return Err(ConfettiError::EmptyPalette);
        }
        let spawn = SpawnDistributions::new(&config, width)?;

        Ok(Self {
            particles: Vec::with_capacity(config.pieces),
            config,
            width,
            height,
            rng,
            spawn,
            emitted: 0,
            elapsed_ms: 0.0,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Every piece has been released and has left the area.
    pub fn is_finished(&self) -> bool {
        self.emitted >= self.config.pieces && self.particles.is_empty()
    }

    /// Advance one frame, `dt_ms` after the previous one.
    pub fn step(&mut self, dt_ms: f64) {
        self.elapsed_ms += dt_ms.max(0.0);
        self.emit_due();

        let cfg = &self.config;
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += cfg.gravity;
            p.vx += cfg.wind;
            p.vx *= cfg.friction;
            p.vy *= cfg.friction;
            p.angle += p.spin;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain(|p| {
            let margin = p.width.max(p.height);
            p.y <= height + margin && p.x >= -margin && p.x <= width + margin
        });
    }

    fn emit_due(&mut self) {
        let due = if self.config.emit_duration_ms <= 0.0 {
            self.config.pieces
        } else {
            let progress = (self.elapsed_ms / self.config.emit_duration_ms).min(1.0);
            (progress * self.config.pieces as f64).round() as usize
        };

        while self.emitted < due {
            let particle = Particle {
                x: self.spawn.x.sample(&mut self.rng),
                y: 0.0,
                width: self.spawn.width.sample(&mut self.rng),
                height: self.spawn.height.sample(&mut self.rng),
                vx: self.spawn.vx.sample(&mut self.rng),
                vy: self.spawn.vy.sample(&mut self.rng),
                angle: self.spawn.angle.sample(&mut self.rng),
                spin: self.spawn.spin.sample(&mut self.rng),
                color: self.config.palette[self.spawn.color.sample(&mut self.rng)],
            };
            self.particles.push(particle);
            self.emitted += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_config() -> ConfettiConfig {
        ConfettiConfig {
            pieces: 200,
            emit_duration_ms: 1000.0,
            ..ConfettiConfig::default()
        }
    }

    fn burst(config: ConfettiConfig) -> ConfettiBurst<StdRng> {
        ConfettiBurst::new(config, 800.0, 600.0, StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn defaults_match_the_pink_burst() {
        let cfg = ConfettiConfig::default();
        assert_eq!(cfg.pieces, 5000);
        assert_eq!(cfg.gravity, 0.1);
        assert_eq!(cfg.initial_velocity_y, 12.0);
        assert_eq!(cfg.palette.len(), 4);
    }

    #[test]
    fn rejects_empty_area_and_palette() {
        let rng = StdRng::seed_from_u64(0);
        assert_eq!(
            ConfettiBurst::new(ConfettiConfig::default(), 0.0, 600.0, rng.clone()).err(),
            Some(ConfettiError::EmptyArea {
                width: 0.0,
                height: 600.0
            })
        );

        let cfg = ConfettiConfig {
            palette: &[],
            ..ConfettiConfig::default()
        };
        assert_eq!(
            ConfettiBurst::new(cfg, 800.0, 600.0, rng).err(),
            Some(ConfettiError::EmptyPalette)
        );
    }

    #[test]
    fn emission_spreads_over_the_window() {
        let mut b = burst(small_config());
        b.step(250.0);
        assert_eq!(b.emitted(), 50);
        b.step(250.0);
        assert_eq!(b.emitted(), 100);
        b.step(10_000.0);
        assert_eq!(b.emitted(), 200);
        assert!(!b.is_finished());
    }

    #[test]
    fn pieces_start_at_top_edge_with_palette_colors() {
        let mut b = burst(small_config());
        b.step(0.0);
        b.step(1000.0);
        for p in b.particles() {
            assert!(DEFAULT_PALETTE.contains(&p.color));
            assert!(p.x >= -30.0 && p.x <= 830.0);
            assert!(p.width >= 5.0 && p.width <= 20.0);
        }
    }

    #[test]
    fn burst_eventually_finishes() {
        let mut b = burst(small_config());
        let mut frames = 0;
        while !b.is_finished() && frames < 5000 {
            b.step(FRAME_MS);
            frames += 1;
        }
        assert!(b.is_finished(), "still {} pieces after {} frames", b.particles().len(), frames);
        assert_eq!(b.emitted(), 200);
    }

    #[test]
    fn zero_emit_window_releases_everything_at_once() {
        let mut b = burst(ConfettiConfig {
            emit_duration_ms: 0.0,
            ..small_config()
        });
        b.step(FRAME_MS);
        assert_eq!(b.emitted(), 200);
    }
}
