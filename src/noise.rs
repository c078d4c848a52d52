// The functions here are a line-for-line host rendition of the noise in
// `shaders/datacube.frag`. Keep the two in step: tests on the host describe
// what the GPU draws.

use three_d::{vec3, InnerSpace, Vec3};

pub const NOISE_SCALE: f32 = 2.0;

/// Eastward drift per unit of time coordinate.
pub const DRIFT_RATE: f32 = 0.4;
pub const WOBBLE_FREQUENCY: f32 = 1.5;
pub const WOBBLE_AMPLITUDE: f32 = 0.1;

const OCTAVE_WEIGHTS: [f32; 3] = [1.0, 0.5, 0.25];
const OCTAVE_FREQUENCIES: [f32; 3] = [1.0, 2.0, 4.0];
const OCTAVE_OFFSETS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [5.2, 1.3, 0.8], [1.2, 5.2, 2.1]];
const OCTAVE_WEIGHT_SUM: f32 = 1.75;

fn mod289(x: f32) -> f32 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: f32) -> f32 {
    mod289(((x * 34.0) + 1.0) * x)
}

fn taylor_inv_sqrt(r: f32) -> f32 {
    1.792_842_9 - 0.853_734_7 * r
}

fn floor3(v: Vec3) -> Vec3 {
    vec3(v.x.floor(), v.y.floor(), v.z.floor())
}

fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

pub fn simplex3(v: Vec3) -> f32 {
    const C_X: f32 = 1.0 / 6.0;
    const C_Y: f32 = 1.0 / 3.0;

    // First corner
    let skew = (v.x + v.y + v.z) * C_Y;
    let i = floor3(v + vec3(skew, skew, skew));
    let unskew = (i.x + i.y + i.z) * C_X;
    let x0 = v - i + vec3(unskew, unskew, unskew);

    // Other corners
    let g = vec3(step(x0.y, x0.x), step(x0.z, x0.y), step(x0.x, x0.z));
    let l = vec3(1.0 - g.x, 1.0 - g.y, 1.0 - g.z);
    let i1 = vec3(g.x.min(l.z), g.y.min(l.x), g.z.min(l.y));
    let i2 = vec3(g.x.max(l.z), g.y.max(l.x), g.z.max(l.y));

    let x1 = x0 - i1 + vec3(C_X, C_X, C_X);
    let x2 = x0 - i2 + vec3(C_Y, C_Y, C_Y);
    let x3 = x0 - vec3(0.5, 0.5, 0.5);

    let i = vec3(mod289(i.x), mod289(i.y), mod289(i.z));
    let offsets = [vec3(0.0, 0.0, 0.0), i1, i2, vec3(1.0, 1.0, 1.0)];
    let corners = [x0, x1, x2, x3];

    // Gradients: 7x7 points over a square, mapped onto an octahedron.
    let ns = vec3(2.0 / 7.0, 0.5 / 7.0 - 1.0, 1.0 / 7.0);

    let mut total = 0.0;
    for (offset, corner) in offsets.iter().zip(corners.iter()) {
        let p = permute(permute(permute(i.z + offset.z) + i.y + offset.y) + i.x + offset.x);

        let j = p - 49.0 * (p * ns.z * ns.z).floor();
        let gx_ = (j * ns.z).floor();
        let gy_ = (j - 7.0 * gx_).floor();

        let gx = gx_ * ns.x + ns.y;
        let gy = gy_ * ns.x + ns.y;
        let h = 1.0 - gx.abs() - gy.abs();

        let sh = -step(h, 0.0);
        let gradient = vec3(
            gx + (gx.floor() * 2.0 + 1.0) * sh,
            gy + (gy.floor() * 2.0 + 1.0) * sh,
            h,
        );
        let gradient = gradient * taylor_inv_sqrt(gradient.dot(gradient));

        let m = (0.6 - corner.dot(*corner)).max(0.0);
        let m = m * m;
        total += m * m * gradient.dot(*corner);
    }

    42.0 * total
}

pub fn fractal(p: Vec3) -> f32 {
    let mut value = 0.0;
    for octave in 0..OCTAVE_WEIGHTS.len() {
        let [ox, oy, oz] = OCTAVE_OFFSETS[octave];
        value += simplex3(p * OCTAVE_FREQUENCIES[octave] + vec3(ox, oy, oz)) * OCTAVE_WEIGHTS[octave];
    }
    value / OCTAVE_WEIGHT_SUM
}

/// Horizontal components drift with time so features form slanted tubes
/// through the cube instead of decorrelating between slices.
pub fn advect(world: Vec3, time_coord: f32) -> Vec3 {
    let drift_x = time_coord * DRIFT_RATE;
    let drift_y = (time_coord * WOBBLE_FREQUENCY).sin() * WOBBLE_AMPLITUDE;
    vec3(
        world.x * NOISE_SCALE - drift_x,
        world.y * NOISE_SCALE + drift_y,
        time_coord * NOISE_SCALE,
    )
}

pub fn evaluate(world: Vec3, time_coord: f32) -> f32 {
    fractal(advect(world, time_coord))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplex_stays_bounded_on_a_grid() {
        for x in -8..8 {
            for y in -8..8 {
                for z in -8..8 {
                    let p = vec3(x as f32 * 0.43, y as f32 * 0.29, z as f32 * 0.61);
                    let n = simplex3(p);
                    assert!(n.abs() <= 1.2, "simplex3({:?}) = {}", p, n);
                }
            }
        }
    }

    #[test]
    fn simplex_is_deterministic() {
        let p = vec3(1.37, -4.2, 12.5);
        assert_eq!(simplex3(p), simplex3(p));
        assert_eq!(fractal(p), fractal(p));
    }

    #[test]
    fn simplex_is_continuous() {
        let p = vec3(0.31, 0.77, -1.9);
        let d = 1e-3;
        for axis in [vec3(d, 0.0, 0.0), vec3(0.0, d, 0.0), vec3(0.0, 0.0, d)] {
            let delta = (simplex3(p + axis) - simplex3(p)).abs();
            assert!(delta < 0.05, "jump of {delta} across a tiny step");
        }
    }

    #[test]
    fn simplex_is_not_constant() {
        let values: Vec<f32> = (0..32)
            .map(|i| simplex3(vec3(i as f32 * 0.37, i as f32 * 0.11, 0.5)))
            .collect();
        let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(max - min > 0.3);
    }

    #[test]
    fn advect_drifts_east_and_wobbles() {
        let world = vec3(0.5, 0.25, 0.0);
        let still = advect(world, 0.0);
        assert_eq!(still, vec3(1.0, 0.5, 0.0));

        let moved = advect(world, 1.0);
        assert!((moved.x - (1.0 - 0.4)).abs() < 1e-6);
        assert!((moved.y - (0.5 + 1.5f32.sin() * 0.1)).abs() < 1e-6);
        assert!((moved.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn drift_carries_features_east_over_time() {
        let t = 0.75;
        let origin = vec3(0.3, -0.2, 0.0);
        let carried = vec3(origin.x + t * DRIFT_RATE / NOISE_SCALE, origin.y, 0.0);
        assert!((advect(carried, t).x - advect(origin, 0.0).x).abs() < 1e-6);
    }
}
