use crate::object::{
    get_line_objects, get_plane_object, get_slice_objects, get_sphere_object,
    get_time_slice_plane_object, plane_transformation, segment_transformation, FieldObject,
    FlatObject, LINE_RADIUS,
};
use datacube_volumetric_renderer::clock::FrameSnapshot;
use datacube_volumetric_renderer::config::Settings;
use datacube_volumetric_renderer::coordinator::{Rect, ViewPass};
use datacube_volumetric_renderer::geometry::{
    bounding_box_edges, grid_lines, month_tick_marks, rectangle_outline, reference_planes,
    time_marker, MARKER_SIZE,
};
use datacube_volumetric_renderer::param::ViewMode;
use datacube_volumetric_renderer::sampler::{
    back_to_front, slice_depths, time_extent, time_marker_depth, SampleUniforms, BASE_SIZE,
    SLICE_PLANE_SIZE,
};
use datacube_volumetric_renderer::state::ViewState;
use datacube_volumetric_renderer::timeline::CUBE_YEAR;
use std::f32::consts::PI;
use three_d::{
    degrees, vec3, Camera, ClearState, Context, Event, Mat4, Object, OrbitControl, RenderTarget,
    Vec3, Viewport,
};

const WIREFRAME_RGB: [u8; 3] = [0x64, 0x74, 0x8b];
const LABEL_RGB: [u8; 3] = [0x94, 0xa3, 0xb8];
const SLICE_GRID_RGB: [u8; 3] = [0x33, 0x41, 0x55];
const SLICE_GRID_DIVISIONS: usize = 8;

/// Degrees per frame while auto-orbiting the globe.
const AUTO_ORBIT_STEP_DEG: f64 = 0.05;

pub fn to_viewport(rect: Rect) -> Viewport {
    Viewport {
        x: rect.x,
        y: rect.y,
        width: rect.width.max(1),
        height: rect.height.max(1),
    }
}

/// Text anchored to a projected world position, in physical pixels with the
/// origin at the bottom-left of the window.
#[derive(Clone, Debug)]
pub struct ScreenLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub emphasis: bool,
}

fn project(camera: &Camera, world: Vec3) -> Option<(f32, f32)> {
    let clip = (camera.projection() * camera.view()) * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let viewport = camera.viewport();
    let x = viewport.x as f32 + (clip.x / clip.w * 0.5 + 0.5) * viewport.width as f32;
    let y = viewport.y as f32 + (clip.y / clip.w * 0.5 + 0.5) * viewport.height as f32;
    Some((x, y))
}

fn clear_viewport(target: &RenderTarget<'_>, viewport: Viewport, rgb: [u8; 3]) {
    target.clear_partially(
        viewport.into(),
        ClearState::color_and_depth(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
            1.0,
            1.0,
        ),
    );
}

pub fn get_camera_and_control(viewport: Viewport) -> (Camera, OrbitControl) {
    let camera = Camera::new_perspective(
        viewport,
        vec3(6.0, 4.0, 8.0),
        vec3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        degrees(40.0),
        0.1,
        1000.0,
    );

    let control = OrbitControl::new(Vec3::new(0.0, 0.0, 0.0), 3.0, 25.0);

    (camera, control)
}

pub fn get_slice_camera(viewport: Viewport) -> Camera {
    Camera::new_perspective(
        viewport,
        vec3(0.0, 0.0, 3.5),
        vec3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        degrees(50.0),
        0.1,
        100.0,
    )
}

/// Circles the camera around the vertical axis at its current distance and
/// height, so manual zoom survives the orbit.
#[derive(Default)]
pub struct AutoOrbit {
    angle_deg: Option<f64>,
}

impl AutoOrbit {
    pub fn step(&mut self, camera: &mut Camera) {
        let position = camera.position();
        let (x, y, z) = (position.x, position.y, position.z);
        let radius = (x * x + z * z).sqrt();

        let angle_deg = self
            .angle_deg
            .get_or_insert_with(|| (z as f64).atan2(x as f64).to_degrees());
        *angle_deg += AUTO_ORBIT_STEP_DEG;
        if *angle_deg > 360.0 {
            *angle_deg -= 360.0;
        }

        let angle = *angle_deg as f32 * (PI / 180.0);
        camera.set_view(
            Vec3::new(angle.cos() * radius, y, angle.sin() * radius),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
    }

    /// Forgets the phase so the next step resumes from wherever the user left
    /// the camera.
    pub fn reset(&mut self) {
        self.angle_deg = None;
    }
}

/// The 3D datacube: volume slices or the globe, plus orientation aids.
pub struct PrimaryView {
    context: Context,
    pub camera: Camera,
    control: OrbitControl,
    orbit: AutoOrbit,
    slice_count: usize,
    extent: f32,
    depths: Vec<f32>,
    slices: Vec<FieldObject>,
    sphere: FieldObject,
    furniture: Vec<FlatObject>,
    marker: Vec<(FlatObject, Mat4)>,
    mode: ViewMode,
    labels: Vec<ScreenLabel>,
}

impl PrimaryView {
    pub fn new(context: &Context, settings: &Settings, viewport: Viewport) -> Self {
        let (camera, control) = get_camera_and_control(viewport);
        let uniforms = SampleUniforms::primary(&settings.initial);
        let mut view = Self {
            context: context.clone(),
            camera,
            control,
            orbit: AutoOrbit::default(),
            slice_count: settings.slice_count,
            extent: f32::NAN,
            depths: Vec::new(),
            slices: Vec::new(),
            sphere: get_sphere_object(context, uniforms, settings.sphere_subdivisions),
            furniture: Vec::new(),
            marker: Vec::new(),
            mode: settings.initial.view_mode,
            labels: Vec::new(),
        };
        view.rebuild(&settings.initial);
        view
    }

    /// Recreates everything whose geometry depends on the time-axis extent.
    fn rebuild(&mut self, state: &ViewState) {
        let uniforms = SampleUniforms::primary(state);
        let extent = uniforms.time_extent;
        let context = &self.context;

        self.depths = slice_depths(self.slice_count, extent);
        self.slices = get_slice_objects(context, uniforms, &self.depths);

        let mut furniture: Vec<FlatObject> = reference_planes(extent)
            .iter()
            .map(|spec| get_plane_object(context, spec))
            .collect();
        furniture.extend(get_line_objects(context, &bounding_box_edges(extent), WIREFRAME_RGB, 0.3));
        let ticks: Vec<_> = month_tick_marks(extent).into_iter().map(|(_, s)| s).collect();
        furniture.extend(get_line_objects(context, &ticks, LABEL_RGB, 1.0));
        self.furniture = furniture;

        // Built at the origin, then slid along the time axis every frame.
        let mut marker_spec = time_marker(0.0, extent);
        marker_spec.center = vec3(0.0, 0.0, 0.0);
        let mut marker = vec![(
            get_plane_object(context, &marker_spec),
            plane_transformation(&marker_spec),
        )];
        let outline = rectangle_outline(MARKER_SIZE, 0.0);
        for (line, segment) in get_line_objects(context, &outline, [0xff, 0xff, 0xff], 0.6)
            .into_iter()
            .zip(outline.iter())
        {
            marker.push((line, segment_transformation(segment, LINE_RADIUS)));
        }
        self.marker = marker;

        self.extent = extent;
        tracing::debug!(extent, slices = self.slices.len(), "volume geometry rebuilt");
    }

    fn project_labels(&self) -> Vec<ScreenLabel> {
        if self.mode != ViewMode::Volume {
            return Vec::new();
        }

        let h = BASE_SIZE / 2.0;
        let mut labels: Vec<ScreenLabel> = month_tick_marks(self.extent)
            .into_iter()
            .filter_map(|(tick, _)| {
                project(&self.camera, vec3(h + 0.2, -h, tick.depth)).map(|(x, y)| ScreenLabel {
                    text: tick.label.to_string(),
                    x,
                    y,
                    emphasis: false,
                })
            })
            .collect();
        if let Some((x, y)) = project(&self.camera, vec3(h + 0.7, -h, self.extent / 2.0)) {
            labels.push(ScreenLabel {
                text: CUBE_YEAR.to_string(),
                x,
                y,
                emphasis: true,
            });
        }
        labels
    }

    pub fn labels(&self) -> &[ScreenLabel] {
        &self.labels
    }

    pub fn handle_events(&mut self, events: &mut [Event]) {
        if self.control.handle_events(&mut self.camera, events) {
            self.orbit.reset();
        }
    }

    pub fn render(&self, target: &RenderTarget<'_>) {
        clear_viewport(target, self.camera.viewport(), [0x02, 0x06, 0x17]);

        match self.mode {
            ViewMode::Surface => {
                target.render(&self.camera, [&self.sphere], &[]);
            }
            ViewMode::Volume => {
                let mut objects: Vec<&dyn Object> =
                    self.furniture.iter().map(|o| o as &dyn Object).collect();
                for i in back_to_front(&self.depths, self.camera.position().z) {
                    objects.push(&self.slices[i]);
                }
                objects.extend(self.marker.iter().map(|(o, _)| o as &dyn Object));
                target.render(&self.camera, objects, &[]);
            }
        }
    }
}

impl ViewPass for PrimaryView {
    fn prepare(&mut self, frame: &FrameSnapshot, viewport: Rect) {
        let state = &frame.state;
        self.camera.set_viewport(to_viewport(viewport));

        if time_extent(state.time_axis_scale) != self.extent {
            self.rebuild(state);
        }
        self.mode = state.view_mode;

        let uniforms = SampleUniforms::primary(state);
        for slice in self.slices.iter_mut() {
            slice.material.uniforms = uniforms;
        }
        self.sphere.material.uniforms = uniforms;

        let offset = Mat4::from_translation(vec3(
            0.0,
            0.0,
            time_marker_depth(state.simulated_day, self.extent),
        ));
        for (object, base) in self.marker.iter_mut() {
            object.set_transformation(offset * *base);
        }

        if state.playing && state.view_mode == ViewMode::Surface {
            self.orbit.step(&mut self.camera);
        }

        self.labels = self.project_labels();
    }
}

/// The 2D time-slice view: one plane sampled at the current day.
pub struct SliceView {
    camera: Camera,
    plane: FieldObject,
    grid: Vec<FlatObject>,
    labels: Vec<ScreenLabel>,
}

impl SliceView {
    pub fn new(context: &Context, state: &ViewState, viewport: Viewport) -> Self {
        let grid = grid_lines(SLICE_PLANE_SIZE, SLICE_GRID_DIVISIONS, 0.01);
        Self {
            camera: get_slice_camera(viewport),
            plane: get_time_slice_plane_object(context, SampleUniforms::slice(state)),
            grid: get_line_objects(context, &grid, SLICE_GRID_RGB, 1.0),
            labels: Vec::new(),
        }
    }

    pub fn labels(&self) -> &[ScreenLabel] {
        &self.labels
    }

    pub fn render(&self, target: &RenderTarget<'_>) {
        clear_viewport(target, self.camera.viewport(), [0x0f, 0x17, 0x2a]);

        let mut objects: Vec<&dyn Object> = vec![&self.plane];
        objects.extend(self.grid.iter().map(|o| o as &dyn Object));
        target.render(&self.camera, objects, &[]);
    }
}

impl ViewPass for SliceView {
    fn prepare(&mut self, frame: &FrameSnapshot, viewport: Rect) {
        self.camera.set_viewport(to_viewport(viewport));
        self.plane.material.uniforms = SampleUniforms::slice(&frame.state);

        let h = SLICE_PLANE_SIZE / 2.0;
        self.labels = project(&self.camera, vec3(-h + 0.2, h - 0.2, 0.1))
            .map(|(x, y)| ScreenLabel {
                text: format!("TIME SLICE: DAY {}", frame.state.simulated_day.floor() as u32),
                x,
                y,
                emphasis: false,
            })
            .into_iter()
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            x: 0,
            y: 0,
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn origin_projects_to_viewport_center() {
        let (camera, _) = get_camera_and_control(viewport());
        let (x, y) = project(&camera, vec3(0.0, 0.0, 0.0)).unwrap();
        assert!((x - 400.0).abs() < 1e-2);
        assert!((y - 300.0).abs() < 1e-2);
    }

    #[test]
    fn points_behind_the_camera_are_not_projected() {
        let camera = get_slice_camera(viewport());
        assert!(project(&camera, vec3(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn auto_orbit_keeps_distance_and_height() {
        let (mut camera, _) = get_camera_and_control(viewport());
        let mut orbit = AutoOrbit::default();
        for _ in 0..100 {
            orbit.step(&mut camera);
        }
        let p = camera.position();
        assert!(((p.x * p.x + p.z * p.z).sqrt() - 10.0).abs() < 1e-3);
        assert!((p.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn viewport_is_never_empty() {
        let v = to_viewport(Rect {
            x: 10,
            y: 0,
            width: 0,
            height: 0,
        });
        assert_eq!((v.x, v.width, v.height), (10, 1, 1));
    }
}
