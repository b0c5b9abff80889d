use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use targetcore::prelude::ColorRange;

/// Values that survive between sessions: the camera index and the color range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "camera-index")]
    pub camera_index: u32,
    #[serde(rename = "lowH")]
    pub low_h: u8,
    #[serde(rename = "highH")]
    pub high_h: u8,
    #[serde(rename = "lowS")]
    pub low_s: u8,
    #[serde(rename = "highS")]
    pub high_s: u8,
    #[serde(rename = "lowV")]
    pub low_v: u8,
    #[serde(rename = "highV")]
    pub high_v: u8,
}

impl Default for Settings {
    fn default() -> Self {
        let range = ColorRange::default();
        Self {
            camera_index: 0,
            low_h: range.hue_low,
            high_h: range.hue_high,
            low_s: range.sat_low,
            high_s: range.sat_high,
            low_v: range.val_low,
            high_v: range.val_high,
        }
    }
}

impl Settings {
    /// Reads the settings file. A missing or unreadable file falls back to
    /// defaults; missing keys take their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(
                    "settings file {} not readable ({}), using defaults",
                    path.display(),
                    err
                );
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(
                    "settings file {} is malformed ({}), using defaults",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let body = serde_json::to_string_pretty(self).context("encoding settings")?;
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("opening settings file {}", path.display()))?;
        file.write_all(body.as_bytes())
            .with_context(|| format!("writing settings file {}", path.display()))?;
        file.write_all(b"\n")?;
        Ok(())
    }

    pub fn color_range(&self) -> ColorRange {
        ColorRange::new(
            (self.low_h, self.high_h),
            (self.low_s, self.high_s),
            (self.low_v, self.high_v),
        )
    }

    pub fn set_color_range(&mut self, range: ColorRange) {
        self.low_h = range.hue_low;
        self.high_h = range.hue_high;
        self.low_s = range.sat_low;
        self.high_s = range.sat_high;
        self.low_v = range.val_low;
        self.high_v = range.val_high;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(dir.path().join("absent.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.color_range(), ColorRange::new((70, 96), (56, 255), (142, 255)));
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"{ \"lowH\": ").unwrap();
        assert_eq!(Settings::load(temp.path()), Settings::default());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"{ \"camera-index\": 2, \"lowH\": 10 }").unwrap();
        let settings = Settings::load(temp.path());
        assert_eq!(settings.camera_index, 2);
        assert_eq!(settings.low_h, 10);
        assert_eq!(settings.high_h, 96);
    }

    #[test]
    fn save_round_trips_with_original_key_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut settings = Settings::default();
        settings.camera_index = 1;
        settings.set_color_range(ColorRange::new((53, 255), (0, 255), (150, 255)));
        settings.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["camera-index"], 1);
        assert_eq!(raw["lowH"], 53);
        assert_eq!(raw["lowV"], 150);
        assert_eq!(Settings::load(&path), settings);
    }
}
