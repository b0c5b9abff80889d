use crate::prelude::{AreaPolicy, ColorRange};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Values a control surface may change while the pipeline runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub color_range: ColorRange,
    pub area: AreaPolicy,
}

/// Thread-safe handle to the live thresholds.
///
/// Readers take a full copy under the lock, so a frame never sees half of an
/// update. Clones share the same underlying values.
#[derive(Debug, Clone, Default)]
pub struct SharedThresholds {
    inner: Arc<RwLock<Thresholds>>,
}

impl SharedThresholds {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            inner: Arc::new(RwLock::new(thresholds)),
        }
    }

    pub fn snapshot(&self) -> Thresholds {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Applies `change` to the thresholds under the write lock.
    pub fn update<F>(&self, change: F) -> Thresholds
    where
        F: FnOnce(&mut Thresholds),
    {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        change(&mut guard);
        *guard
    }

    pub fn set_color_range(&self, range: ColorRange) -> Thresholds {
        self.update(|t| t.color_range = range)
    }

    pub fn set_area_policy(&self, area: AreaPolicy) -> Thresholds {
        self.update(|t| t.area = area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_observe_updates() {
        let shared = SharedThresholds::default();
        let control = shared.clone();
        control.set_color_range(ColorRange::new((1, 2), (3, 4), (5, 6)));
        assert_eq!(shared.snapshot().color_range.val_high, 6);
    }

    #[test]
    fn concurrent_updates_never_tear() {
        let shared = SharedThresholds::new(Thresholds {
            color_range: ColorRange::new((0, 0), (0, 0), (0, 0)),
            area: AreaPolicy::default(),
        });
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..2000u32 {
                    let v = (i % 256) as u8;
                    shared.set_color_range(ColorRange::new((v, v), (v, v), (v, v)));
                }
            })
        };
        for _ in 0..2000 {
            let r = shared.snapshot().color_range;
            assert!(
                [r.hue_high, r.sat_low, r.sat_high, r.val_low, r.val_high]
                    .iter()
                    .all(|&b| b == r.hue_low)
            );
        }
        writer.join().unwrap();
    }
}
