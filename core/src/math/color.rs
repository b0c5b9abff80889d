/// Converts one RGB pixel to 8-bit HSV.
///
/// Hue is expressed in half-degrees (`0..=179`) so it fits a byte; saturation
/// and value span `0..=255`. Grey pixels have hue 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let sat = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let mut hue = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let hue = ((hue / 2.0).round() as u16 % 180) as u8;
    (hue, sat.round() as u8, max as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_map_to_expected_hues() {
        assert_eq!(rgb_to_hsv(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), (120, 255, 255));
    }

    #[test]
    fn grey_has_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsv(0, 0, 0), (0, 0, 0));
        assert_eq!(rgb_to_hsv(128, 128, 128), (0, 0, 128));
    }

    #[test]
    fn hue_wraps_below_180() {
        // magenta-red sits just under 360 degrees
        let (hue, _, _) = rgb_to_hsv(255, 0, 1);
        assert!(hue == 0 || hue == 179);
    }
}
