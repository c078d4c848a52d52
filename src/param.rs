use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Volume,
    Surface,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DatasetId {
    Temperature,
    Vegetation,
    Precipitation,
    Clouds,
}

impl DatasetId {
    pub const ALL: [DatasetId; 4] = [
        DatasetId::Temperature,
        DatasetId::Vegetation,
        DatasetId::Precipitation,
        DatasetId::Clouds,
    ];

    /// Index used by the fragment shader's dataset switch.
    pub fn shader_index(self) -> i32 {
        match self {
            DatasetId::Temperature => 0,
            DatasetId::Vegetation => 1,
            DatasetId::Precipitation => 2,
            DatasetId::Clouds => 3,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TransferStyle {
    /// Cold to hot, neutral band discarded.
    Diverging,
    /// Positive anomalies only, yellow to dark red.
    Hotspot,
}

impl TransferStyle {
    pub fn shader_index(self) -> i32 {
        match self {
            TransferStyle::Diverging => 0,
            TransferStyle::Hotspot => 1,
        }
    }
}
