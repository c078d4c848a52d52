use crate::noise;
use crate::param::{DatasetId, TransferStyle, ViewMode};
use crate::state::{ViewState, DAYS_PER_YEAR, MIN_TIME_AXIS_SCALE};
use crate::transfer::{self, Rgba, Shading, MIN_VISIBLE_ALPHA};
use three_d::{vec3, Vec3};

pub const BASE_SIZE: f32 = 2.5;
pub const DEFAULT_SLICE_COUNT: usize = 80;
pub const MIN_SLICE_COUNT: usize = 2;
/// Compresses the time coordinate so events stretch into tubes across layers.
pub const TIME_COMPRESSION: f32 = 0.8;
/// Time-coordinate drift per simulated day on the sphere.
pub const SURFACE_DRIFT_RATE: f32 = 0.05;
pub const SPHERE_RADIUS: f32 = 1.5;
pub const SLICE_PLANE_SIZE: f32 = 4.0;

pub fn time_extent(time_axis_scale: f32) -> f32 {
    BASE_SIZE * time_axis_scale.max(MIN_TIME_AXIS_SCALE)
}

pub fn time_marker_depth(day: f32, extent: f32) -> f32 {
    -extent / 2.0 + (day / DAYS_PER_YEAR) * extent
}

pub fn slice_view_time_coord(day: f32, extent: f32) -> f32 {
    time_marker_depth(day, extent) * TIME_COMPRESSION
}

pub fn slice_depths(count: usize, extent: f32) -> Vec<f32> {
    let count = count.max(MIN_SLICE_COUNT);
    let last = (count - 1) as f32;
    (0..count)
        .map(|i| -extent / 2.0 + (i as f32 / last) * extent)
        .collect()
}

/// Farthest-first order along the time axis, so translucent layers composite back to front.
pub fn back_to_front(depths: &[f32], eye_z: f32) -> Vec<usize> {
    let mut order: Vec<usize> = (0..depths.len()).collect();
    order.sort_by(|&a, &b| {
        let da = (depths[a] - eye_z).abs();
        let db = (depths[b] - eye_z).abs();
        db.total_cmp(&da)
    });
    order
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum SampleGeometry {
    /// Stacked slice planes: the sample's own depth is time.
    Volume,
    /// Sphere surface: depth plus a drift proportional to the day.
    Surface,
    /// Time-slice plane: a fixed depth derived from the day alone.
    Slice,
}

impl SampleGeometry {
    pub fn shader_index(self) -> i32 {
        match self {
            SampleGeometry::Volume => 0,
            SampleGeometry::Surface => 1,
            SampleGeometry::Slice => 2,
        }
    }

    pub fn shading(self) -> Shading {
        match self {
            SampleGeometry::Volume | SampleGeometry::Surface => Shading::Volumetric,
            SampleGeometry::Slice => Shading::Slice,
        }
    }
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct SampleUniforms {
    pub geometry: SampleGeometry,
    pub day: f32,
    pub dataset: DatasetId,
    pub style: TransferStyle,
    pub opacity: f32,
    pub threshold: f32,
    pub time_extent: f32,
}

impl SampleUniforms {
    pub fn primary(state: &ViewState) -> Self {
        let geometry = match state.view_mode {
            ViewMode::Volume => SampleGeometry::Volume,
            ViewMode::Surface => SampleGeometry::Surface,
        };
        Self {
            geometry,
            day: state.simulated_day,
            dataset: state.active_dataset,
            style: state.transfer_style,
            opacity: state.opacity,
            threshold: state.threshold,
            time_extent: time_extent(state.time_axis_scale),
        }
    }

    /// Uniforms of the time-slice view. Global opacity does not apply.
    pub fn slice(state: &ViewState) -> Self {
        Self {
            geometry: SampleGeometry::Slice,
            opacity: 1.0,
            ..Self::primary(state)
        }
    }

    pub fn time_coord(&self, world: Vec3) -> f32 {
        match self.geometry {
            SampleGeometry::Volume => world.z * TIME_COMPRESSION,
            SampleGeometry::Surface => world.z + self.day * SURFACE_DRIFT_RATE,
            SampleGeometry::Slice => slice_view_time_coord(self.day, self.time_extent),
        }
    }
}

pub trait FieldSampler {
    fn sample(&self, uniforms: &SampleUniforms, world: Vec3) -> Option<Rgba>;
}

#[derive(Default, Copy, Clone, Debug)]
pub struct HostSampler;

impl FieldSampler for HostSampler {
    fn sample(&self, uniforms: &SampleUniforms, world: Vec3) -> Option<Rgba> {
        let value = noise::evaluate(world, uniforms.time_coord(world));
        let color = transfer::color_for(uniforms.dataset, uniforms.style, value, uniforms.threshold)?;

        let shaded = Rgba {
            a: color.a * uniforms.opacity,
            ..color
        }
        .brighten(uniforms.geometry.shading().factor(value));

        if shaded.a < MIN_VISIBLE_ALPHA {
            None
        } else {
            Some(shaded)
        }
    }
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct PlaneRaster {
    pub size: f32,
    pub depth: f32,
    pub width: usize,
    pub height: usize,
}

impl PlaneRaster {
    /// World position of the center of pixel `(px, py)`, row 0 at the top.
    pub fn world_position(&self, px: usize, py: usize) -> Vec3 {
        let u = (px as f32 + 0.5) / self.width.max(1) as f32;
        let v = (py as f32 + 0.5) / self.height.max(1) as f32;
        vec3(
            (u - 0.5) * self.size,
            (0.5 - v) * self.size,
            self.depth,
        )
    }

    pub fn render<S: FieldSampler>(&self, sampler: &S, uniforms: &SampleUniforms) -> Vec<Option<Rgba>> {
        let mut pixels = Vec::with_capacity(self.width * self.height);
        for py in 0..self.height {
            for px in 0..self.width {
                pixels.push(sampler.sample(uniforms, self.world_position(px, py)));
            }
        }
        pixels
    }
}

/// Composites layered samples back to front with straight-alpha "over"
/// blending. Discarded samples contribute nothing.
pub fn composite_over(layers: impl IntoIterator<Item = Option<Rgba>>) -> Rgba {
    let mut out = Rgba::new(0.0, 0.0, 0.0, 0.0);
    for sample in layers.into_iter().flatten() {
        let s = sample.saturate();
        let a = s.a + out.a * (1.0 - s.a);
        if a <= 0.0 {
            continue;
        }
        out = Rgba::new(
            (s.r * s.a + out.r * out.a * (1.0 - s.a)) / a,
            (s.g * s.a + out.g * out.a * (1.0 - s.a)) / a,
            (s.b * s.a + out.b * out.a * (1.0 - s.a)) / a,
            a,
        );
    }
    out
}
