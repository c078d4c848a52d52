use crate::sampler::{time_marker_depth, BASE_SIZE};
use crate::timeline::{month_ticks, MonthTick};
use three_d::{vec3, Vec3};

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PlaneAxes {
    XY,
    XZ,
    YZ,
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct PlaneSpec {
    pub center: Vec3,
    pub axes: PlaneAxes,
    /// Extent along the first and second spanned axis.
    pub size: (f32, f32),
    pub rgb: [u8; 3],
    pub opacity: f32,
}

pub fn bounding_box_edges(extent: f32) -> Vec<Segment> {
    let h = BASE_SIZE / 2.0;
    let d = extent / 2.0;
    let corner = |x: f32, y: f32, z: f32| vec3(x * h, y * h, z * d);

    let mut edges = Vec::with_capacity(12);
    for &(y, z) in &[(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
        edges.push(Segment::new(corner(-1.0, y, z), corner(1.0, y, z)));
    }
    for &(x, z) in &[(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
        edges.push(Segment::new(corner(x, -1.0, z), corner(x, 1.0, z)));
    }
    for &(x, y) in &[(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
        edges.push(Segment::new(corner(x, y, -1.0), corner(x, y, 1.0)));
    }
    edges
}

pub fn reference_planes(extent: f32) -> Vec<PlaneSpec> {
    let h = BASE_SIZE / 2.0;
    vec![
        PlaneSpec {
            center: vec3(0.0, -h, 0.0),
            axes: PlaneAxes::XZ,
            size: (BASE_SIZE, extent),
            rgb: [0x33, 0x41, 0x55],
            opacity: 0.5,
        },
        PlaneSpec {
            center: vec3(0.0, 0.0, -extent / 2.0),
            axes: PlaneAxes::XY,
            size: (BASE_SIZE, BASE_SIZE),
            rgb: [0x1e, 0x29, 0x3b],
            opacity: 0.4,
        },
        PlaneSpec {
            center: vec3(-h, 0.0, 0.0),
            axes: PlaneAxes::YZ,
            size: (BASE_SIZE, extent),
            rgb: [0x1e, 0x29, 0x3b],
            opacity: 0.3,
        },
    ]
}

/// Side length of the current-time marker, slightly larger than the cube.
pub const MARKER_SIZE: f32 = BASE_SIZE + 0.1;

pub fn time_marker(day: f32, extent: f32) -> PlaneSpec {
    PlaneSpec {
        center: vec3(0.0, 0.0, time_marker_depth(day, extent)),
        axes: PlaneAxes::XY,
        size: (MARKER_SIZE, MARKER_SIZE),
        rgb: [0xff, 0xff, 0xff],
        opacity: 0.05,
    }
}

pub fn rectangle_outline(size: f32, z: f32) -> Vec<Segment> {
    let h = size / 2.0;
    let corners = [
        vec3(-h, -h, z),
        vec3(h, -h, z),
        vec3(h, h, z),
        vec3(-h, h, z),
    ];
    (0..4)
        .map(|i| Segment::new(corners[i], corners[(i + 1) % 4]))
        .collect()
}

pub fn grid_lines(size: f32, divisions: usize, z: f32) -> Vec<Segment> {
    let divisions = divisions.max(1);
    let h = size / 2.0;
    let step = size / divisions as f32;
    let mut lines = Vec::with_capacity(2 * (divisions + 1));
    for i in 0..=divisions {
        let offset = -h + i as f32 * step;
        lines.push(Segment::new(vec3(offset, -h, z), vec3(offset, h, z)));
        lines.push(Segment::new(vec3(-h, offset, z), vec3(h, offset, z)));
    }
    lines
}

pub fn month_tick_marks(extent: f32) -> Vec<(MonthTick, Segment)> {
    let h = BASE_SIZE / 2.0;
    month_ticks(extent)
        .into_iter()
        .map(|tick| {
            let z = tick.depth;
            let segment = Segment::new(vec3(h, -h, z), vec3(h + 0.15, -h, z));
            (tick, segment)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_twelve_edges_of_the_right_length() {
        let edges = bounding_box_edges(5.0);
        assert_eq!(edges.len(), 12);
        let mut lengths: Vec<f32> = edges
            .iter()
            .map(|e| {
                let d = e.end - e.start;
                (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
            })
            .collect();
        lengths.sort_by(f32::total_cmp);
        assert!(lengths[..8].iter().all(|l| (l - BASE_SIZE).abs() < 1e-5));
        assert!(lengths[8..].iter().all(|l| (l - 5.0).abs() < 1e-5));
    }

    #[test]
    fn marker_follows_day() {
        assert_eq!(time_marker(0.0, 5.0).center.z, -2.5);
        assert_eq!(time_marker(365.0, 5.0).center.z, 2.5);
    }

    #[test]
    fn reference_planes_hug_the_volume() {
        let planes = reference_planes(10.0);
        assert_eq!(planes.len(), 3);
        assert_eq!(planes[0].size, (BASE_SIZE, 10.0));
        assert_eq!(planes[1].center.z, -5.0);
    }

    #[test]
    fn grid_has_both_directions() {
        assert_eq!(grid_lines(4.0, 8, 0.0).len(), 18);
        assert_eq!(rectangle_outline(2.0, 1.0).len(), 4);
    }

    #[test]
    fn month_marks_sit_on_the_floor_edge() {
        let marks = month_tick_marks(5.0);
        assert_eq!(marks.len(), 12);
        assert!(marks.iter().all(|(_, s)| s.start.y == -BASE_SIZE / 2.0));
    }
}
