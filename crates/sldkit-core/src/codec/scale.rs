use crate::models::ScaleRange;

/// Scale denominator of zoom level 0 in the Web Mercator tiling scheme (256px tiles, 0.28mm
/// pixels).
pub const WEB_MERCATOR_ZOOM0_DENOMINATOR: f64 = 559_082_264.028_717_8;

pub const WEB_MERCATOR_MAX_ZOOM: usize = 21;

/// Scale denominators indexed by zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTable(Vec<f64>);

impl Default for ScaleTable {
    fn default() -> Self {
        Self::web_mercator()
    }
}

impl ScaleTable {
    pub fn new(denominators: Vec<f64>) -> Self {
        Self(denominators)
    }

    pub fn web_mercator() -> Self {
        Self(
            (0..=WEB_MERCATOR_MAX_ZOOM)
                .map(|z| WEB_MERCATOR_ZOOM0_DENOMINATOR / 2f64.powi(z as i32))
                .collect(),
        )
    }

    pub fn denominators(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Denominator for a zoom level.
    pub fn encode(&self, zoom: usize) -> Option<f64> {
        self.0.get(zoom).copied()
    }

    /// Zoom level whose denominator is closest to `denominator`; ties keep the lower zoom.
    pub fn nearest(&self, denominator: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (zoom, candidate) in self.0.iter().enumerate() {
            let distance = (candidate - denominator).abs();
            match best {
                Some((_, best_distance)) if !(distance < best_distance) => {}
                _ => best = Some((zoom, distance)),
            }
        }
        best.map(|(zoom, _)| zoom)
    }

    /// Builds a scale range from wire denominators. The minimum denominator limits how far the
    /// map may zoom in (`maxZoom`); the maximum limits zooming out (`minZoom`). Zero, negative
    /// and non-finite denominators mean "unbounded".
    pub fn decode(&self, min: Option<f64>, max: Option<f64>) -> ScaleRange {
        let min = min.filter(|v| v.is_finite() && *v > 0.0);
        let max = max.filter(|v| v.is_finite() && *v > 0.0);
        ScaleRange {
            min_scale_denominator: min,
            max_scale_denominator: max,
            min_zoom: max.and_then(|v| self.nearest(v)),
            max_zoom: min.and_then(|v| self.nearest(v)),
        }
    }

    /// Builds a scale range from zoom limits (the editor's slider).
    pub fn from_zooms(&self, min_zoom: Option<usize>, max_zoom: Option<usize>) -> ScaleRange {
        ScaleRange {
            min_scale_denominator: max_zoom.and_then(|z| self.encode(z)),
            max_scale_denominator: min_zoom.and_then(|z| self.encode(z)),
            min_zoom: min_zoom.filter(|z| *z < self.len()),
            max_zoom: max_zoom.filter(|z| *z < self.len()),
        }
    }
}
