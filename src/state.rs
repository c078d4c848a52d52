use crate::param::{DatasetId, TransferStyle, ViewMode};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_YEAR: f32 = 365.0;
/// Largest `f32` below [`DAYS_PER_YEAR`].
pub const LAST_DAY: f32 = DAYS_PER_YEAR - 1.0 / 32768.0;
pub const MIN_PLAYBACK_SPEED: f32 = 0.01;
pub const MAX_THRESHOLD: f32 = 0.9;
pub const MIN_TIME_AXIS_SCALE: f32 = 0.5;
pub const MAX_TIME_AXIS_SCALE: f32 = 5.0;

#[derive(PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub simulated_day: f32,
    pub playing: bool,
    pub playback_speed: f32,
    pub view_mode: ViewMode,
    pub active_dataset: DatasetId,
    pub opacity: f32,
    pub threshold: f32,
    pub time_axis_scale: f32,
    pub show_secondary_view: bool,
    pub transfer_style: TransferStyle,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            simulated_day: 180.0,
            playing: true,
            playback_speed: 0.5,
            view_mode: ViewMode::Volume,
            active_dataset: DatasetId::Temperature,
            opacity: 0.8,
            threshold: 0.3,
            time_axis_scale: 2.0,
            show_secondary_view: false,
            transfer_style: TransferStyle::Diverging,
        }
    }
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Command {
    SetPlaying(bool),
    TogglePlaying,
    SetPlaybackSpeed(f32),
    /// Scrub to a day. Always pauses playback.
    SetDay(f32),
    SetViewMode(ViewMode),
    SetDataset(DatasetId),
    SetOpacity(f32),
    SetThreshold(f32),
    SetTimeAxisScale(f32),
    SetSecondaryView(bool),
    ToggleSecondaryView,
    SetTransferStyle(TransferStyle),
}

/// Clamps any day value into `[0, 365)`.
pub fn clamp_day(day: f32) -> f32 {
    if day.is_nan() || day <= 0.0 {
        0.0
    } else {
        day.min(LAST_DAY)
    }
}

fn clamp_unit(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

impl ViewState {
    pub fn apply(self, command: Command) -> ViewState {
        match command {
            Command::SetPlaying(playing) => ViewState { playing, ..self },
            Command::TogglePlaying => ViewState {
                playing: !self.playing,
                ..self
            },
            Command::SetPlaybackSpeed(speed) => ViewState {
                playback_speed: clamp_unit(speed, MIN_PLAYBACK_SPEED, f32::MAX, self.playback_speed),
                ..self
            },
            Command::SetDay(day) => ViewState {
                simulated_day: clamp_day(day),
                playing: false,
                ..self
            },
            Command::SetViewMode(view_mode) => ViewState { view_mode, ..self },
            Command::SetDataset(active_dataset) => ViewState {
                active_dataset,
                ..self
            },
            Command::SetOpacity(opacity) => ViewState {
                opacity: clamp_unit(opacity, 0.0, 1.0, self.opacity),
                ..self
            },
            Command::SetThreshold(threshold) => ViewState {
                threshold: clamp_unit(threshold, 0.0, MAX_THRESHOLD, self.threshold),
                ..self
            },
            Command::SetTimeAxisScale(scale) => ViewState {
                time_axis_scale: clamp_unit(
                    scale,
                    MIN_TIME_AXIS_SCALE,
                    MAX_TIME_AXIS_SCALE,
                    self.time_axis_scale,
                ),
                ..self
            },
            Command::SetSecondaryView(show_secondary_view) => ViewState {
                show_secondary_view,
                ..self
            },
            Command::ToggleSecondaryView => ViewState {
                show_secondary_view: !self.show_secondary_view,
                ..self
            },
            Command::SetTransferStyle(transfer_style) => ViewState {
                transfer_style,
                ..self
            },
        }
    }

    /// One display frame of playback. Wraps to day 0 at the end of the year.
    pub fn tick(self) -> ViewState {
        if !self.playing {
            return self;
        }
        let mut day = self.simulated_day + self.playback_speed;
        if day >= DAYS_PER_YEAR {
            day = 0.0;
        }
        ViewState {
            simulated_day: day,
            ..self
        }
    }

    /// Re-establishes every invariant on a state built from outside input.
    pub fn sanitized(self) -> ViewState {
        let defaults = ViewState::default();
        ViewState {
            simulated_day: clamp_day(self.simulated_day),
            playback_speed: clamp_unit(
                self.playback_speed,
                MIN_PLAYBACK_SPEED,
                f32::MAX,
                defaults.playback_speed,
            ),
            opacity: clamp_unit(self.opacity, 0.0, 1.0, defaults.opacity),
            threshold: clamp_unit(self.threshold, 0.0, MAX_THRESHOLD, defaults.threshold),
            time_axis_scale: clamp_unit(
                self.time_axis_scale,
                MIN_TIME_AXIS_SCALE,
                MAX_TIME_AXIS_SCALE,
                defaults.time_axis_scale,
            ),
            ..self
        }
    }
}
