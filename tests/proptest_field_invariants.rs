//! Property-based invariant tests for the datacube field pipeline and the
//! view-state clock.
//!
//! 1.  Field evaluation is deterministic and bounded
//! 2.  Samples below the threshold are always discarded
//! 3.  Transfer alpha stays in [0, 1] and grows with the visibility metric,
//!     for every dataset and style
//! 4.  Playback keeps the simulated day in [0, 365)
//! 5.  Scrubbing always pauses and lands in [0, 365)
//! 6.  Switching the view mode touches nothing else
//! 7.  Time-axis extent is linear in the scale
//! 8.  The time-slice view ignores global opacity
//! 9.  Slice layers are ordered strictly back to front

use datacube_volumetric_renderer::noise::evaluate;
use datacube_volumetric_renderer::param::{DatasetId, TransferStyle, ViewMode};
use datacube_volumetric_renderer::sampler::{
    back_to_front, slice_depths, time_extent, FieldSampler, HostSampler, SampleUniforms,
    BASE_SIZE,
};
use datacube_volumetric_renderer::state::{Command, ViewState, DAYS_PER_YEAR, LAST_DAY};
use datacube_volumetric_renderer::transfer::{color_for, visibility_metric};
use proptest::prelude::*;
use three_d::vec3;

// ── Helpers ──────────────────────────────────────────────────────────

fn arb_dataset() -> impl Strategy<Value = DatasetId> {
    prop_oneof![
        Just(DatasetId::Temperature),
        Just(DatasetId::Vegetation),
        Just(DatasetId::Precipitation),
        Just(DatasetId::Clouds),
    ]
}

fn arb_style() -> impl Strategy<Value = TransferStyle> {
    prop_oneof![Just(TransferStyle::Diverging), Just(TransferStyle::Hotspot)]
}

fn arb_mode() -> impl Strategy<Value = ViewMode> {
    prop_oneof![Just(ViewMode::Volume), Just(ViewMode::Surface)]
}

fn arb_state() -> impl Strategy<Value = ViewState> {
    (
        0.0f32..365.0,
        any::<bool>(),
        0.01f32..10.0,
        arb_mode(),
        arb_dataset(),
        0.0f32..=1.0,
        0.0f32..=0.9,
        0.5f32..=5.0,
        any::<bool>(),
        arb_style(),
    )
        .prop_map(
            |(
                simulated_day,
                playing,
                playback_speed,
                view_mode,
                active_dataset,
                opacity,
                threshold,
                time_axis_scale,
                show_secondary_view,
                transfer_style,
            )| ViewState {
                simulated_day,
                playing,
                playback_speed,
                view_mode,
                active_dataset,
                opacity,
                threshold,
                time_axis_scale,
                show_secondary_view,
                transfer_style,
            },
        )
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Field evaluation is deterministic and bounded
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    #[test]
    fn field_is_deterministic_and_bounded(
        x in -20.0f32..20.0,
        y in -20.0f32..20.0,
        z in -20.0f32..20.0,
        t in -10.0f32..10.0,
    ) {
        let p = vec3(x, y, z);
        let a = evaluate(p, t);
        let b = evaluate(p, t);
        prop_assert_eq!(a.to_bits(), b.to_bits());
        prop_assert!(a.is_finite());
        prop_assert!(a.abs() <= 1.2, "field({:?}, {}) = {}", p, t, a);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Samples below the threshold are always discarded
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn below_threshold_is_discarded(
        dataset in arb_dataset(),
        style in arb_style(),
        value in -1.0f32..=1.0,
        threshold in 0.0f32..=0.9,
    ) {
        let metric = visibility_metric(dataset, style, value);
        let color = color_for(dataset, style, value, threshold);
        if metric < threshold {
            prop_assert!(color.is_none());
        } else {
            prop_assert!(color.is_some());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Transfer alpha stays in [0, 1] and grows with the metric
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn alpha_is_a_unit_fraction(
        dataset in arb_dataset(),
        style in arb_style(),
        value in -1.0f32..=1.0,
        threshold in 0.0f32..=0.9,
    ) {
        if let Some(color) = color_for(dataset, style, value, threshold) {
            prop_assert!((0.0..=1.0).contains(&color.a));
            prop_assert!((0.0..=1.0).contains(&color.r));
            prop_assert!((0.0..=1.0).contains(&color.g));
            prop_assert!((0.0..=1.0).contains(&color.b));
        }
    }

    #[test]
    fn sequential_alpha_is_monotonic(
        dataset in prop_oneof![
            Just(DatasetId::Vegetation),
            Just(DatasetId::Precipitation),
            Just(DatasetId::Clouds),
        ],
        a in -1.0f32..=1.0,
        b in -1.0f32..=1.0,
        threshold in 0.0f32..=0.9,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let alpha = |v| color_for(dataset, TransferStyle::Diverging, v, threshold).map_or(0.0, |c| c.a);
        prop_assert!(alpha(lo) <= alpha(hi));
    }

    #[test]
    fn diverging_alpha_grows_with_distance_from_neutral(
        a in 0.0f32..=1.0,
        b in 0.0f32..=1.0,
        sign in prop_oneof![Just(1.0f32), Just(-1.0f32)],
        threshold in 0.0f32..=0.9,
    ) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let alpha = |v: f32| {
            color_for(DatasetId::Temperature, TransferStyle::Diverging, sign * v, threshold)
                .map_or(0.0, |c| c.a)
        };
        prop_assert!(alpha(near) <= alpha(far));
    }

    #[test]
    fn hotspot_alpha_grows_with_heat(
        a in -1.0f32..=1.0,
        b in -1.0f32..=1.0,
        threshold in 0.0f32..=0.9,
    ) {
        let (cool, hot) = if a <= b { (a, b) } else { (b, a) };
        let alpha = |v: f32| {
            color_for(DatasetId::Temperature, TransferStyle::Hotspot, v, threshold)
                .map_or(0.0, |c| c.a)
        };
        prop_assert!(alpha(cool) <= alpha(hot));
    }

    #[test]
    fn sequential_alpha_ignores_style(
        dataset in prop_oneof![
            Just(DatasetId::Vegetation),
            Just(DatasetId::Precipitation),
            Just(DatasetId::Clouds),
        ],
        value in -1.0f32..=1.0,
        threshold in 0.0f32..=0.9,
    ) {
        prop_assert_eq!(
            color_for(dataset, TransferStyle::Diverging, value, threshold),
            color_for(dataset, TransferStyle::Hotspot, value, threshold)
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Playback keeps the simulated day in [0, 365)
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tick_keeps_day_in_range(state in arb_state(), frames in 1usize..2000) {
        let mut state = state;
        for _ in 0..frames {
            state = state.tick();
            prop_assert!(state.simulated_day >= 0.0);
            prop_assert!(state.simulated_day < DAYS_PER_YEAR);
        }
    }

    #[test]
    fn paused_tick_is_identity(state in arb_state()) {
        let paused = state.apply(Command::SetPlaying(false));
        prop_assert_eq!(paused.tick(), paused);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Scrubbing always pauses and lands in [0, 365)
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scrub_pauses_and_clamps(state in arb_state(), day in any::<f32>()) {
        let next = state.apply(Command::SetDay(day));
        prop_assert!(!next.playing);
        prop_assert!(next.simulated_day >= 0.0);
        prop_assert!(next.simulated_day < DAYS_PER_YEAR);
    }

    #[test]
    fn scrub_is_monotonic_and_saturates(a in -100.0f32..1000.0, b in -100.0f32..1000.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let day = |d| ViewState::default().apply(Command::SetDay(d)).simulated_day;
        prop_assert!(day(lo) <= day(hi));
        if hi >= DAYS_PER_YEAR {
            prop_assert_eq!(day(hi), LAST_DAY);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Switching the view mode touches nothing else
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn view_mode_is_visual_only(state in arb_state(), mode in arb_mode()) {
        let next = state.apply(Command::SetViewMode(mode));
        prop_assert_eq!(next, ViewState { view_mode: mode, ..state });
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Time-axis extent is linear in the scale
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn extent_is_linear(scale in 0.5f32..=5.0) {
        prop_assert!((time_extent(scale) - BASE_SIZE * scale).abs() < 1e-4);
    }

    #[test]
    fn slice_depths_span_the_extent(count in 2usize..200, scale in 0.5f32..=5.0) {
        let extent = time_extent(scale);
        let depths = slice_depths(count, extent);
        prop_assert_eq!(depths.len(), count);
        prop_assert!((depths[0] + extent / 2.0).abs() < 1e-4);
        prop_assert!((depths[count - 1] - extent / 2.0).abs() < 1e-4);
        prop_assert!(depths.windows(2).all(|w| w[0] < w[1]));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. The time-slice view ignores global opacity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn slice_view_ignores_opacity(
        state in arb_state(),
        opacity in 0.0f32..=1.0,
        x in -2.0f32..2.0,
        y in -2.0f32..2.0,
    ) {
        let a = SampleUniforms::slice(&state);
        let b = SampleUniforms::slice(&state.apply(Command::SetOpacity(opacity)));
        let p = vec3(x, y, 0.0);
        prop_assert_eq!(HostSampler.sample(&a, p), HostSampler.sample(&b, p));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Slice layers are ordered strictly back to front
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layers_are_ordered_farthest_first(count in 2usize..120, eye_z in -30.0f32..30.0) {
        let depths = slice_depths(count, 5.0);
        let order = back_to_front(&depths, eye_z);
        prop_assert_eq!(order.len(), count);
        let distances: Vec<f32> = order.iter().map(|&i| (depths[i] - eye_z).abs()).collect();
        prop_assert!(distances.windows(2).all(|w| w[0] >= w[1]));
    }
}
