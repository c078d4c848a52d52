use crate::clock::{Controller, FrameSchedule, FrameSnapshot};
use crate::coordinator::{Coordinator, Rect, ViewPass};
use crate::param::ViewMode;
use crate::sampler::{
    back_to_front, composite_over, slice_depths, time_extent, FieldSampler, HostSampler,
    PlaneRaster, SampleUniforms, BASE_SIZE, SLICE_PLANE_SIZE, SPHERE_RADIUS,
};
use crate::transfer::Rgba;
use three_d::vec3;

#[derive(PartialEq, Copy, Clone, Debug, Default)]
pub struct Coverage {
    /// Pixels with any visible sample.
    pub visible: usize,
    pub total: usize,
    pub mean_alpha: f32,
}

impl Coverage {
    fn of(pixels: &[Rgba]) -> Self {
        let visible = pixels.iter().filter(|p| p.a > 0.0).count();
        let alpha: f32 = pixels.iter().map(|p| p.a).sum();
        Self {
            visible,
            total: pixels.len(),
            mean_alpha: if pixels.is_empty() {
                0.0
            } else {
                alpha / pixels.len() as f32
            },
        }
    }

    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.visible as f32 / self.total as f32
        }
    }
}

/// Orthographic CPU rendering of the primary view, looking down the time
/// axis from its far end.
pub struct HostVolumeView {
    resolution: usize,
    slice_count: usize,
    pub image: Vec<Rgba>,
    pub coverage: Coverage,
}

impl HostVolumeView {
    pub fn new(resolution: usize, slice_count: usize) -> Self {
        Self {
            resolution,
            slice_count,
            image: Vec::new(),
            coverage: Coverage::default(),
        }
    }

    fn render_volume(&self, uniforms: &SampleUniforms) -> Vec<Rgba> {
        let depths = slice_depths(self.slice_count, uniforms.time_extent);
        let eye_z = uniforms.time_extent;
        let order = back_to_front(&depths, eye_z);
        let layers: Vec<Vec<Option<Rgba>>> = order
            .iter()
            .map(|&i| {
                PlaneRaster {
                    size: BASE_SIZE,
                    depth: depths[i],
                    width: self.resolution,
                    height: self.resolution,
                }
                .render(&HostSampler, uniforms)
            })
            .collect();

        (0..self.resolution * self.resolution)
            .map(|px| composite_over(layers.iter().map(|layer| layer[px])))
            .collect()
    }

    fn render_surface(&self, uniforms: &SampleUniforms) -> Vec<Rgba> {
        let n = self.resolution;
        let mut pixels = Vec::with_capacity(n * n);
        for py in 0..n {
            for px in 0..n {
                let x = ((px as f32 + 0.5) / n as f32 - 0.5) * 2.0 * SPHERE_RADIUS;
                let y = (0.5 - (py as f32 + 0.5) / n as f32) * 2.0 * SPHERE_RADIUS;
                let r2 = SPHERE_RADIUS * SPHERE_RADIUS - x * x - y * y;
                if r2 < 0.0 {
                    pixels.push(Rgba::new(0.0, 0.0, 0.0, 0.0));
                    continue;
                }
                // Back hemisphere first, then the front one over it.
                let z = r2.sqrt();
                let back = HostSampler.sample(uniforms, vec3(x, y, -z));
                let front = HostSampler.sample(uniforms, vec3(x, y, z));
                pixels.push(composite_over([back, front]));
            }
        }
        pixels
    }
}

impl ViewPass for HostVolumeView {
    fn prepare(&mut self, frame: &FrameSnapshot, _viewport: Rect) {
        let uniforms = SampleUniforms::primary(&frame.state);
        self.image = match frame.state.view_mode {
            ViewMode::Volume => self.render_volume(&uniforms),
            ViewMode::Surface => self.render_surface(&uniforms),
        };
        self.coverage = Coverage::of(&self.image);
    }
}

pub struct HostSliceView {
    resolution: usize,
    pub image: Vec<Rgba>,
    pub coverage: Coverage,
}

impl HostSliceView {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            image: Vec::new(),
            coverage: Coverage::default(),
        }
    }
}

impl ViewPass for HostSliceView {
    fn prepare(&mut self, frame: &FrameSnapshot, _viewport: Rect) {
        let uniforms = SampleUniforms::slice(&frame.state);
        let raster = PlaneRaster {
            size: SLICE_PLANE_SIZE,
            depth: 0.0,
            width: self.resolution,
            height: self.resolution,
        };
        self.image = raster
            .render(&HostSampler, &uniforms)
            .into_iter()
            .map(|p| p.map(Rgba::saturate).unwrap_or(Rgba::new(0.0, 0.0, 0.0, 0.0)))
            .collect();
        self.coverage = Coverage::of(&self.image);
    }
}

/// Runs `frames` frames at `fps` on the CPU, logging per-frame coverage.
/// Returns the final snapshot.
pub async fn run(
    controller: &mut Controller,
    resolution: usize,
    slice_count: usize,
    frames: u64,
    fps: u32,
) -> FrameSnapshot {
    let mut coordinator: Coordinator<HostVolumeView, HostSliceView> =
        Coordinator::new(HostVolumeView::new(resolution, slice_count));
    let mut schedule = FrameSchedule::new();
    let mut ticks = schedule.start(fps);
    let size = resolution as u32;

    let mut last = controller.snapshot();
    while last.frame < frames {
        if ticks.recv().await.is_none() {
            break;
        }
        let frame = controller.advance_frame();
        coordinator.prepare_frame(&frame, size * 2, size, 0, || HostSliceView::new(resolution));

        let primary = coordinator.primary().coverage;
        let slice = coordinator.secondary().map(|view| view.coverage);
        tracing::info!(
            frame = frame.frame,
            day = frame.state.simulated_day,
            extent = time_extent(frame.state.time_axis_scale),
            primary_coverage = primary.fraction(),
            primary_alpha = primary.mean_alpha,
            slice_coverage = slice.map(|c| c.fraction()),
            "headless frame"
        );
        last = frame;
    }

    schedule.cancel();
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::DatasetId;
    use crate::state::{Command, ViewState};

    #[test]
    fn volume_view_renders_something() {
        let mut controller = Controller::new(ViewState::default());
        let frame = controller.advance_frame();
        let mut view = HostVolumeView::new(12, 8);
        view.prepare(&frame, Rect { x: 0, y: 0, width: 12, height: 12 });
        assert_eq!(view.image.len(), 144);
        assert!(view.coverage.visible > 0);
    }

    #[test]
    fn surface_view_stays_inside_the_disc() {
        let mut controller = Controller::new(ViewState::default());
        controller.dispatch(Command::SetViewMode(ViewMode::Surface));
        controller.dispatch(Command::SetDataset(DatasetId::Clouds));
        controller.dispatch(Command::SetThreshold(0.0));
        let frame = controller.advance_frame();
        let mut view = HostVolumeView::new(16, 8);
        view.prepare(&frame, Rect { x: 0, y: 0, width: 16, height: 16 });
        // Corners are outside the sphere's silhouette.
        assert_eq!(view.image[0].a, 0.0);
        assert_eq!(view.image[15].a, 0.0);
        assert!(view.coverage.visible > 0);
    }

    #[test]
    fn slice_view_ignores_opacity_setting() {
        let base = ViewState {
            threshold: 0.0,
            ..Default::default()
        };
        let mut dim = HostSliceView::new(16);
        let mut bright = HostSliceView::new(16);
        let rect = Rect { x: 0, y: 0, width: 16, height: 16 };
        dim.prepare(&FrameSnapshot { frame: 1, state: base.apply(Command::SetOpacity(0.1)) }, rect);
        bright.prepare(&FrameSnapshot { frame: 1, state: base.apply(Command::SetOpacity(1.0)) }, rect);
        assert_eq!(dim.image, bright.image);
    }

    #[tokio::test]
    async fn headless_run_advances_the_clock() {
        let mut controller = Controller::new(ViewState {
            show_secondary_view: true,
            ..Default::default()
        });
        let last = run(&mut controller, 6, 4, 3, 500).await;
        assert_eq!(last.frame, 3);
        assert_eq!(last.state.simulated_day, 181.5);
    }
}
