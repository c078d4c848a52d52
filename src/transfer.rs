use crate::param::{DatasetId, TransferStyle};
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    fn mix(self, other: Rgba, t: f32) -> Rgba {
        Rgba::new(
            mix(self.r, other.r, t),
            mix(self.g, other.g, t),
            mix(self.b, other.b, t),
            mix(self.a, other.a, t),
        )
    }

    fn with_alpha(self, a: f32) -> Rgba {
        Rgba { a, ..self }
    }

    pub fn brighten(self, factor: f32) -> Rgba {
        Rgba::new(self.r * factor, self.g * factor, self.b * factor, self.a)
    }

    pub fn saturate(self) -> Rgba {
        Rgba::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }
}

const COLD: Rgba = Rgba::rgb(0.2, 0.4, 0.9);
const HOT: Rgba = Rgba::rgb(0.9, 0.2, 0.2);
const HOTSPOT_YELLOW: Rgba = Rgba::rgb(1.0, 0.9, 0.2);
const HOTSPOT_ORANGE: Rgba = Rgba::rgb(1.0, 0.5, 0.0);
const HOTSPOT_DARK_RED: Rgba = Rgba::rgb(0.5, 0.0, 0.0);
const BARE_SOIL: Rgba = Rgba::rgb(0.8, 0.7, 0.4);
const CANOPY: Rgba = Rgba::rgb(0.1, 0.6, 0.2);
const LIGHT_RAIN: Rgba = Rgba::rgb(0.7, 0.8, 0.9);
const HEAVY_RAIN: Rgba = Rgba::rgb(0.1, 0.2, 0.8);
const CLOUD: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

/// Samples fainter than this are dropped after shading.
pub const MIN_VISIBLE_ALPHA: f32 = 0.01;

pub const SLICE_BRIGHTNESS: f32 = 1.1;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Shading {
    Volumetric,
    Slice,
}

impl Shading {
    pub fn factor(self, value: f32) -> f32 {
        match self {
            Shading::Volumetric => 0.8 + 0.2 * normalize(value),
            Shading::Slice => SLICE_BRIGHTNESS,
        }
    }
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn normalize(value: f32) -> f32 {
    value * 0.5 + 0.5
}

/// Diverging data measures distance from the neutral midpoint, the hotspot
/// preset measures signed heat above it, sequential data uses the normalized
/// value directly.
pub fn visibility_metric(dataset: DatasetId, style: TransferStyle, value: f32) -> f32 {
    let t = normalize(value);
    match (dataset, style) {
        (DatasetId::Temperature, TransferStyle::Diverging) => (t - 0.5).abs() * 2.0,
        (DatasetId::Temperature, TransferStyle::Hotspot) => (t - 0.5) * 2.0,
        _ => t,
    }
}

/// Opacity and lighting are not applied here.
pub fn color_for(
    dataset: DatasetId,
    style: TransferStyle,
    value: f32,
    threshold: f32,
) -> Option<Rgba> {
    let metric = visibility_metric(dataset, style, value);
    if metric < threshold {
        return None;
    }

    let t = normalize(value);
    let color = match (dataset, style) {
        (DatasetId::Temperature, TransferStyle::Diverging) => {
            let mut alpha = smoothstep(threshold, threshold + 0.2, metric);
            if metric < 0.2 {
                alpha *= 0.5;
            }
            COLD.mix(HOT, t).with_alpha(alpha)
        }
        (DatasetId::Temperature, TransferStyle::Hotspot) => {
            let heat = metric.min(1.0);
            let color = if heat < 0.5 {
                HOTSPOT_YELLOW.mix(HOTSPOT_ORANGE, heat * 2.0)
            } else {
                HOTSPOT_ORANGE.mix(HOTSPOT_DARK_RED, (heat - 0.5) * 2.0)
            };
            color.with_alpha(smoothstep(threshold, threshold + 0.2, metric))
        }
        (DatasetId::Vegetation, _) => BARE_SOIL
            .mix(CANOPY, t)
            .with_alpha(smoothstep(threshold, threshold + 0.2, t)),
        (DatasetId::Precipitation, _) => LIGHT_RAIN
            .mix(HEAVY_RAIN, t)
            .with_alpha(smoothstep(threshold, threshold + 0.3, t)),
        (DatasetId::Clouds, _) => CLOUD.with_alpha(smoothstep(threshold, 1.0, t)),
    };

    Some(color)
}
