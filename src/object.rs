use crate::material::DatacubeMaterial;
use datacube_volumetric_renderer::geometry::{PlaneAxes, PlaneSpec, Segment};
use datacube_volumetric_renderer::sampler::{SampleUniforms, BASE_SIZE, SLICE_PLANE_SIZE, SPHERE_RADIUS};
use three_d::{
    degrees, vec3, ColorMaterial, Context, CpuMaterial, CpuMesh, Cull, Gm, InnerSpace, Mat4, Mesh,
    Quat, Srgba,
};

pub const LINE_RADIUS: f32 = 0.006;

pub type FieldObject = Gm<Mesh, DatacubeMaterial>;
pub type FlatObject = Gm<Mesh, ColorMaterial>;

pub fn slice_transformation(z: f32) -> Mat4 {
    Mat4::from_translation(vec3(0.0, 0.0, z)) * Mat4::from_scale(BASE_SIZE / 2.0)
}

pub fn get_slice_objects(
    context: &Context,
    uniforms: SampleUniforms,
    depths: &[f32],
) -> Vec<FieldObject> {
    let square = CpuMesh::square();
    depths
        .iter()
        .map(|z| {
            let mut slice = Gm::new(Mesh::new(context, &square), DatacubeMaterial::new(uniforms));
            slice.set_transformation(slice_transformation(*z));
            slice
        })
        .collect()
}

pub fn get_sphere_object(
    context: &Context,
    uniforms: SampleUniforms,
    subdivisions: u32,
) -> FieldObject {
    let mut sphere = Gm::new(
        Mesh::new(context, &CpuMesh::sphere(subdivisions)),
        DatacubeMaterial::new(uniforms),
    );
    sphere.set_transformation(Mat4::from_scale(SPHERE_RADIUS));
    sphere
}

pub fn get_time_slice_plane_object(context: &Context, uniforms: SampleUniforms) -> FieldObject {
    let mut plane = Gm::new(
        Mesh::new(context, &CpuMesh::square()),
        DatacubeMaterial::new(uniforms),
    );
    plane.set_transformation(Mat4::from_scale(SLICE_PLANE_SIZE / 2.0));
    plane
}

fn flat_material(context: &Context, rgb: [u8; 3], opacity: f32) -> ColorMaterial {
    let mut material = ColorMaterial::new_transparent(
        context,
        &CpuMaterial {
            albedo: Srgba::new(rgb[0], rgb[1], rgb[2], (opacity.clamp(0.0, 1.0) * 255.0) as u8),
            ..Default::default()
        },
    );
    material.render_states.cull = Cull::None;
    material
}

/// Transformation taking the unit square (XY, `[-1, 1]`) onto `spec`.
pub fn plane_transformation(spec: &PlaneSpec) -> Mat4 {
    let (a, b) = spec.size;
    let orient = match spec.axes {
        PlaneAxes::XY => Mat4::from_nonuniform_scale(a / 2.0, b / 2.0, 1.0),
        PlaneAxes::XZ => {
            Mat4::from_angle_x(degrees(-90.0)) * Mat4::from_nonuniform_scale(a / 2.0, b / 2.0, 1.0)
        }
        PlaneAxes::YZ => {
            Mat4::from_angle_y(degrees(90.0)) * Mat4::from_nonuniform_scale(b / 2.0, a / 2.0, 1.0)
        }
    };
    Mat4::from_translation(spec.center) * orient
}

pub fn get_plane_object(context: &Context, spec: &PlaneSpec) -> FlatObject {
    let mut plane = Gm::new(
        Mesh::new(context, &CpuMesh::square()),
        flat_material(context, spec.rgb, spec.opacity),
    );
    plane.set_transformation(plane_transformation(spec));
    plane
}

/// Transformation taking the unit cylinder (x from 0 to 1, radius 1) onto
/// a thin tube along `segment`.
pub fn segment_transformation(segment: &Segment, radius: f32) -> Mat4 {
    let d = segment.end - segment.start;
    let length = d.magnitude();
    if length <= f32::EPSILON {
        return Mat4::from_translation(segment.start) * Mat4::from_scale(0.0);
    }
    let rotation = Quat::from_arc(vec3(1.0, 0.0, 0.0), d / length, Some(vec3(0.0, 1.0, 0.0)));
    Mat4::from_translation(segment.start)
        * Mat4::from(rotation)
        * Mat4::from_nonuniform_scale(length, radius, radius)
}

pub fn get_line_objects(
    context: &Context,
    segments: &[Segment],
    rgb: [u8; 3],
    opacity: f32,
) -> Vec<FlatObject> {
    let cylinder = CpuMesh::cylinder(8);
    segments
        .iter()
        .map(|segment| {
            let mut line = Gm::new(
                Mesh::new(context, &cylinder),
                flat_material(context, rgb, opacity),
            );
            line.set_transformation(segment_transformation(segment, LINE_RADIUS));
            line
        })
        .collect()
}
