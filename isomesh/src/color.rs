//! Color maps and transfer functions
//!
//! Extracted surfaces are flat-shaded with a single color, picked by looking
//! up the isolevel in a [`ColorMap`].
use crate::Error;

/// 8-bit RGB color
pub type Rgb = [u8; 3];

/// Default number of entries in a color map
pub const DEFAULT_RESOLUTION: usize = 256;

/// Lookup table from normalized scalar values to colors
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMap {
    table: Vec<Rgb>,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            table: rainbow_table(DEFAULT_RESOLUTION),
        }
    }
}

fn check_resolution(resolution: usize) -> Result<(), Error> {
    if (2..=DEFAULT_RESOLUTION).contains(&resolution) {
        Ok(())
    } else {
        Err(Error::BadColorMapResolution(resolution))
    }
}

/// Converts a fully-saturated, full-value hue (in degrees) to RGB
fn hue_to_rgb(hue: f32) -> Rgb {
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let i = h.floor();
    let f = h - i;
    let (r, g, b) = match i as u32 {
        0 => (1.0, f, 0.0),
        1 => (1.0 - f, 1.0, 0.0),
        2 => (0.0, 1.0, f),
        3 => (0.0, 1.0 - f, 1.0),
        4 => (f, 0.0, 1.0),
        _ => (1.0, 0.0, 1.0 - f),
    };
    [r, g, b].map(|c: f32| (c * 255.0).round() as u8)
}

/// Blue-to-red rainbow, with hue running from 240° down to 0°
fn rainbow_table(resolution: usize) -> Vec<Rgb> {
    let step = 240.0 / (resolution - 1) as f32;
    (0..resolution)
        .map(|i| hue_to_rgb(240.0 - step * i as f32))
        .collect()
}

fn mix(c0: Rgb, c1: Rgb, t: f32) -> Rgb {
    std::array::from_fn(|i| {
        (c0[i] as f32 * (1.0 - t) + c1[i] as f32 * t).round() as u8
    })
}

impl ColorMap {
    /// Builds the default rainbow map with the given number of entries
    pub fn rainbow(resolution: usize) -> Result<Self, Error> {
        check_resolution(resolution)?;
        Ok(Self {
            table: rainbow_table(resolution),
        })
    }

    /// Builds a color map by linear interpolation between control points
    ///
    /// Control points are given as `(position, color)` pairs, where position
    /// is on the table's index axis (`0..=resolution - 1`).  If the points do
    /// not cover the whole axis, black is used at the start and white at the
    /// end.
    pub fn from_points(
        resolution: usize,
        points: &[(f32, Rgb)],
    ) -> Result<Self, Error> {
        check_resolution(resolution)?;
        let last = (resolution - 1) as f32;

        let mut points = points.to_vec();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if points.first().is_none_or(|p| p.0 > 0.0) {
            points.insert(0, (0.0, [0, 0, 0]));
        }
        if points.last().is_none_or(|p| p.0 < last) {
            points.push((last, [255, 255, 255]));
        }

        let table = (0..resolution)
            .map(|i| {
                let f = i as f32;
                let hi = points
                    .iter()
                    .position(|p| p.0 >= f)
                    .unwrap_or(points.len() - 1);
                let (s1, c1) = points[hi];
                if hi == 0 || s1 == f {
                    return c1;
                }
                let (s0, c0) = points[hi - 1];
                mix(c0, c1, (f - s0) / (s1 - s0))
            })
            .collect();
        Ok(Self { table })
    }

    /// Number of entries in the table
    pub fn resolution(&self) -> usize {
        self.table.len()
    }

    /// Returns the color at the given table index, clamped to the table
    pub fn at_index(&self, i: usize) -> Rgb {
        self.table[i.min(self.table.len() - 1)]
    }

    /// Looks up a value within the range `[min, max]`
    ///
    /// The value is normalized, scaled to the table, rounded to the nearest
    /// entry, and clamped.  A degenerate range maps to the first entry.
    pub fn lookup(&self, value: f64, min: f64, max: f64) -> Rgb {
        if !(max > min) {
            return self.table[0];
        }
        let scale = (self.table.len() - 1) as f64;
        let i = (scale * (value - min) / (max - min)).round();
        self.at_index(i.clamp(0.0, scale) as usize)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Mapping from scalar values to surface appearance
#[derive(Clone, Debug, Default)]
pub struct TransferFunction {
    color_map: ColorMap,
}

impl TransferFunction {
    /// Builds a transfer function around the given color map
    pub fn new(color_map: ColorMap) -> Self {
        Self { color_map }
    }

    /// Borrows the color map
    pub fn color_map(&self) -> &ColorMap {
        &self.color_map
    }

    /// Returns the color for `value`, normalized against `[min, max]`
    pub fn color(&self, value: f64, min: f64, max: f64) -> Rgb {
        self.color_map.lookup(value, min, max)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rainbow_endpoints() {
        let c = ColorMap::default();
        assert_eq!(c.resolution(), 256);
        assert_eq!(c.at_index(0), [0, 0, 255]);
        assert_eq!(c.at_index(255), [255, 0, 0]);
        assert_eq!(c.at_index(1000), [255, 0, 0]);

        let small = ColorMap::rainbow(3).unwrap();
        assert_eq!(small.at_index(1), [0, 255, 0]);
    }

    #[test]
    fn test_bad_resolution() {
        assert!(ColorMap::rainbow(1).is_err());
        assert!(ColorMap::rainbow(257).is_err());
        assert!(ColorMap::from_points(0, &[]).is_err());
    }

    #[test]
    fn test_lookup() {
        let c = ColorMap::default();
        assert_eq!(c.lookup(0.0, 0.0, 1.0), c.at_index(0));
        assert_eq!(c.lookup(1.0, 0.0, 1.0), c.at_index(255));
        assert_eq!(c.lookup(0.5, 0.0, 1.0), c.at_index(128));
        assert_eq!(c.lookup(-5.0, 0.0, 1.0), c.at_index(0));
        assert_eq!(c.lookup(5.0, 0.0, 1.0), c.at_index(255));
        assert_eq!(c.lookup(5.0, 1.0, 1.0), c.at_index(0));
    }

    #[test]
    fn test_from_points() {
        let c = ColorMap::from_points(5, &[(2.0, [100, 100, 100])]).unwrap();
        assert_eq!(c.at_index(0), [0, 0, 0]);
        assert_eq!(c.at_index(1), [50, 50, 50]);
        assert_eq!(c.at_index(2), [100, 100, 100]);
        assert_eq!(c.at_index(4), [255, 255, 255]);

        let c = ColorMap::from_points(
            3,
            &[(2.0, [0, 0, 200]), (0.0, [200, 0, 0])],
        )
        .unwrap();
        assert_eq!(c.at_index(0), [200, 0, 0]);
        assert_eq!(c.at_index(1), [100, 0, 100]);
        assert_eq!(c.at_index(2), [0, 0, 200]);
    }
}
