use crate::param::DatasetId;
use serde::Serialize;

/// One color stop of a legend gradient, sRGB with straight alpha.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct GradientStop {
    pub position: f32,
    pub rgba: [u8; 4],
}

const fn stop(position: f32, hex: u32, alpha: u8) -> GradientStop {
    GradientStop {
        position,
        rgba: [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, alpha],
    }
}

const TRANSPARENT: u32 = 0x000000;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatasetDescriptor {
    pub id: DatasetId,
    pub name: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub min: f32,
    pub max: f32,
    pub gradient: &'static [GradientStop],
}

static TEMPERATURE: DatasetDescriptor = DatasetDescriptor {
    id: DatasetId::Temperature,
    name: "Temperature Anomaly",
    description: "Deviations from established patterns showing heatwaves and cold snaps.",
    unit: "Δ°C",
    min: -5.0,
    max: 5.0,
    gradient: &[
        stop(0.0, 0x3b82f6, 255),
        stop(0.5, 0xf3f4f6, 255),
        stop(1.0, 0xef4444, 255),
    ],
};

static VEGETATION: DatasetDescriptor = DatasetDescriptor {
    id: DatasetId::Vegetation,
    name: "Vegetation Health",
    description: "Vegetation density and health index.",
    unit: "NDVI",
    min: 0.0,
    max: 1.0,
    gradient: &[
        stop(0.0, TRANSPARENT, 0),
        stop(0.5, 0xbef264, 255),
        stop(1.0, 0x15803d, 255),
    ],
};

static PRECIPITATION: DatasetDescriptor = DatasetDescriptor {
    id: DatasetId::Precipitation,
    name: "Heavy Precipitation",
    description: "Rainfall accumulation volume.",
    unit: "mm",
    min: 0.0,
    max: 50.0,
    gradient: &[
        stop(0.0, TRANSPARENT, 0),
        stop(0.5, 0x7dd3fc, 255),
        stop(1.0, 0x1e40af, 255),
    ],
};

static CLOUDS: DatasetDescriptor = DatasetDescriptor {
    id: DatasetId::Clouds,
    name: "Cloud Volume",
    description: "3D Cloud cover simulation.",
    unit: "%",
    min: 0.0,
    max: 100.0,
    gradient: &[stop(0.0, TRANSPARENT, 0), stop(1.0, 0xffffff, 255)],
};

pub fn descriptor(id: DatasetId) -> &'static DatasetDescriptor {
    match id {
        DatasetId::Temperature => &TEMPERATURE,
        DatasetId::Vegetation => &VEGETATION,
        DatasetId::Precipitation => &PRECIPITATION,
        DatasetId::Clouds => &CLOUDS,
    }
}

pub fn all_descriptors() -> Vec<&'static DatasetDescriptor> {
    DatasetId::ALL.iter().map(|id| descriptor(*id)).collect()
}

impl DatasetDescriptor {
    /// Legend color at `t` in `[0, 1]`, linearly interpolated between stops.
    pub fn legend_color(&self, t: f32) -> [u8; 4] {
        let t = t.clamp(0.0, 1.0);
        let stops = self.gradient;

        let Some(first) = stops.first() else {
            return [0, 0, 0, 0];
        };
        if t <= first.position {
            return first.rgba;
        }

        for pair in stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.position {
                let span = (b.position - a.position).max(f32::EPSILON);
                let s = (t - a.position) / span;
                let mut out = [0u8; 4];
                for (channel, (ca, cb)) in out.iter_mut().zip(a.rgba.iter().zip(b.rgba.iter())) {
                    *channel = (*ca as f32 + (*cb as f32 - *ca as f32) * s).round() as u8;
                }
                return out;
            }
        }

        stops[stops.len() - 1].rgba
    }

    /// Legend label for the value range, e.g. `"-5 Δ°C"`.
    pub fn range_labels(&self) -> (String, String) {
        (
            format!("{} {}", self.min, self.unit),
            format!("{} {}", self.max, self.unit),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dataset_has_a_descriptor() {
        for id in DatasetId::ALL {
            let d = descriptor(id);
            assert_eq!(d.id, id);
            assert!(d.max > d.min);
            assert!(d.gradient.len() >= 2);
            assert_eq!(d.gradient.first().unwrap().position, 0.0);
            assert_eq!(d.gradient.last().unwrap().position, 1.0);
        }
    }

    #[test]
    fn gradient_stops_are_increasing() {
        for d in all_descriptors() {
            for pair in d.gradient.windows(2) {
                assert!(pair[1].position > pair[0].position, "{}", d.name);
            }
        }
    }

    #[test]
    fn legend_interpolates_between_stops() {
        let clouds = descriptor(DatasetId::Clouds);
        assert_eq!(clouds.legend_color(0.0), [0, 0, 0, 0]);
        assert_eq!(clouds.legend_color(1.0), [255, 255, 255, 255]);
        assert_eq!(clouds.legend_color(0.5), [128, 128, 128, 128]);
        assert_eq!(clouds.legend_color(7.0), [255, 255, 255, 255]);
    }

    #[test]
    fn temperature_midpoint_is_neutral() {
        let temp = descriptor(DatasetId::Temperature);
        assert_eq!(temp.legend_color(0.5), [0xf3, 0xf4, 0xf6, 255]);
    }

    #[test]
    fn range_labels_carry_the_unit() {
        let (lo, hi) = descriptor(DatasetId::Precipitation).range_labels();
        assert_eq!(lo, "0 mm");
        assert_eq!(hi, "50 mm");
    }
}
