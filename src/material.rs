use datacube_volumetric_renderer::sampler::SampleUniforms;
use three_d::{
    Blend, Camera, Cull, FragmentAttributes, Light, Material, MaterialType, Program, RenderStates,
    WriteMask,
};

const DATACUBE_FRAGMENT_SHADER: &str = include_str!("shaders/datacube.frag");

/// Translucent, double-sided and never writes depth, so stacked layers
/// accumulate visual density instead of occluding each other.
#[derive(Clone)]
pub struct DatacubeMaterial {
    pub uniforms: SampleUniforms,
}

impl DatacubeMaterial {
    pub fn new(uniforms: SampleUniforms) -> Self {
        Self { uniforms }
    }
}

impl Material for DatacubeMaterial {
    fn id(&self) -> u16 {
        0x0d0c
    }

    fn fragment_shader_source(&self, _lights: &[&dyn Light]) -> String {
        DATACUBE_FRAGMENT_SHADER.to_string()
    }

    fn fragment_attributes(&self) -> FragmentAttributes {
        FragmentAttributes {
            position: true,
            ..FragmentAttributes::NONE
        }
    }

    fn use_uniforms(&self, program: &Program, _camera: &Camera, _lights: &[&dyn Light]) {
        let u = &self.uniforms;
        program.use_uniform_if_required("uDay", u.day);
        program.use_uniform_if_required("uDataset", u.dataset.shader_index());
        program.use_uniform_if_required("uStyle", u.style.shader_index());
        program.use_uniform_if_required("uGeometry", u.geometry.shader_index());
        program.use_uniform_if_required("uOpacity", u.opacity);
        program.use_uniform_if_required("uThreshold", u.threshold);
        program.use_uniform_if_required("uTimeExtent", u.time_extent);
    }

    fn render_states(&self) -> RenderStates {
        RenderStates {
            write_mask: WriteMask::COLOR,
            blend: Blend::TRANSPARENCY,
            cull: Cull::None,
            ..Default::default()
        }
    }

    fn material_type(&self) -> MaterialType {
        MaterialType::Transparent
    }
}
