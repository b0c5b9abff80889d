use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use targetcore::interface::Frame;
use targetcore::orchestrator::FrameSource;
use targetcore::prelude::StageResult;

/// Green that falls inside the default color range.
pub const TARGET_COLOR: [u8; 3] = [40, 220, 180];
const BACKGROUND: [u8; 3] = [32, 36, 64];

/// Axis-aligned rectangle `[x, x + width) x [y, y + height)` painted in the target color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub x: i64,
    pub y: i64,
    pub width: usize,
    pub height: usize,
}

/// Configuration for generating synthetic scenes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    pub targets: Vec<TargetSpec>,
    /// Horizontal motion of every target in pixels per frame.
    pub drift: i64,
    /// Maximum background jitter per channel.
    pub noise: u8,
    pub seed: u64,
    /// Stop after this many frames; `None` runs forever.
    pub frame_count: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            targets: vec![TargetSpec {
                x: 420,
                y: 270,
                width: 61,
                height: 61,
            }],
            drift: 0,
            noise: 12,
            seed: 0,
            frame_count: None,
        }
    }
}

/// Renders frame `index` of the scene described by `config`.
pub fn build_frame(config: &GeneratorConfig, index: u64, rng: &mut StdRng) -> StageResult<Frame> {
    let mut frame = Frame::filled(config.width, config.height, BACKGROUND)?;
    if config.noise > 0 {
        for y in 0..config.height {
            for x in 0..config.width {
                let jitter: u8 = rng.gen_range(0..=config.noise);
                frame.set_pixel(
                    x,
                    y,
                    [
                        BACKGROUND[0].saturating_add(jitter),
                        BACKGROUND[1].saturating_add(jitter),
                        BACKGROUND[2].saturating_add(jitter),
                    ],
                );
            }
        }
    }

    let shift = config.drift * index as i64;
    for target in &config.targets {
        let x0 = (target.x + shift).max(0) as usize;
        let x1 = (target.x + shift + target.width as i64).max(0) as usize;
        let y0 = target.y.max(0) as usize;
        let y1 = (target.y + target.height as i64).max(0) as usize;
        frame.fill_rect(x0, y0, x1, y1, TARGET_COLOR);
    }
    Ok(frame)
}

/// Deterministic frame source for offline runs and tests.
pub struct SyntheticSource {
    config: GeneratorConfig,
    rng: StdRng,
    produced: u64,
}

impl SyntheticSource {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            produced: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> StageResult<Option<Frame>> {
        if self
            .config
            .frame_count
            .is_some_and(|limit| self.produced >= limit)
        {
            return Ok(None);
        }
        let frame = build_frame(&self.config, self.produced, &mut self.rng)?;
        self.produced += 1;
        Ok(Some(frame))
    }

    fn is_live(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!(
            "synthetic scene ({}x{}, seed {})",
            self.config.width, self.config.height, self.config.seed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_paints_target_over_background() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let frame = build_frame(&config, 0, &mut rng).unwrap();
        assert_eq!((frame.width(), frame.height()), (800, 600));
        assert_eq!(frame.pixel(450, 300).to_vec(), TARGET_COLOR.to_vec());
        assert_ne!(frame.pixel(10, 10).to_vec(), TARGET_COLOR.to_vec());
    }

    #[test]
    fn same_seed_repeats_the_same_frames() {
        let config = GeneratorConfig {
            seed: 13,
            ..Default::default()
        };
        let mut a = SyntheticSource::new(config.clone());
        let mut b = SyntheticSource::new(config);
        assert_eq!(a.next_frame().unwrap(), b.next_frame().unwrap());
    }

    #[test]
    fn drift_moves_targets_and_frame_count_ends_stream() {
        let config = GeneratorConfig {
            width: 100,
            height: 50,
            targets: vec![TargetSpec {
                x: 10,
                y: 10,
                width: 10,
                height: 10,
            }],
            drift: 5,
            noise: 0,
            seed: 1,
            frame_count: Some(2),
        };
        let mut source = SyntheticSource::new(config);
        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(first.pixel(10, 10).to_vec(), TARGET_COLOR.to_vec());
        assert_ne!(second.pixel(10, 10).to_vec(), TARGET_COLOR.to_vec());
        assert_eq!(second.pixel(15, 10).to_vec(), TARGET_COLOR.to_vec());
        assert!(source.next_frame().unwrap().is_none());
    }
}
