use crate::scene::ScreenLabel;
use datacube_volumetric_renderer::dataset::{all_descriptors, descriptor};
use datacube_volumetric_renderer::param::TransferStyle::{Diverging, Hotspot};
use datacube_volumetric_renderer::param::ViewMode::{Surface, Volume};
use datacube_volumetric_renderer::param::DatasetId;
use datacube_volumetric_renderer::state::{
    Command, ViewState, DAYS_PER_YEAR, MAX_THRESHOLD, MAX_TIME_AXIS_SCALE, MIN_PLAYBACK_SPEED,
    MIN_TIME_AXIS_SCALE,
};
use datacube_volumetric_renderer::timeline::day_label;
use three_d::egui::Context;

pub const CONTROL_PANEL_WIDTH: f32 = 260.0;

const LEGEND_HEIGHT: f32 = 12.0;
const LEGEND_STEPS: usize = 48;

/// Where the renderer's labels land in egui's coordinate space.
pub struct LabelSpace {
    pub pixels_per_point: f32,
    pub window_height: u32,
}

/// Draws the control panel and the projected scene labels. Returns the
/// commands the user issued this frame, in the order they were made.
pub fn render_gui(
    gui_context: &Context,
    state: &ViewState,
    labels: &[ScreenLabel],
    space: &LabelSpace,
) -> Vec<Command> {
    use three_d::egui::*;

    let mut commands = Vec::new();
    let mut next = *state;

    SidePanel::left("side_panel")
        .exact_width(CONTROL_PANEL_WIDTH)
        .resizable(false)
        .show(gui_context, |ui| {
            ui.add_space(10.0);

            ui.heading("Datacube Explorer");
            ui.label(day_label(state.simulated_day));

            ui.add_space(10.0);

            let play_label = if state.playing { "Pause" } else { "Play" };
            if ui.button(play_label).clicked() {
                commands.push(Command::TogglePlaying);
            }

            ui.label("Day");
            let day_slider = ui.add(
                Slider::new(&mut next.simulated_day, 0.0..=DAYS_PER_YEAR).step_by(0.5),
            );
            if day_slider.changed() {
                commands.push(Command::SetDay(next.simulated_day));
            }

            ui.label("Speed (days / frame)");
            if ui
                .add(Slider::new(&mut next.playback_speed, MIN_PLAYBACK_SPEED..=5.0).logarithmic(true))
                .changed()
            {
                commands.push(Command::SetPlaybackSpeed(next.playback_speed));
            }

            ui.add_space(10.0);

            ui.separator();

            ui.add_space(10.0);

            ui.label("View Mode");
            ui.radio_value(&mut next.view_mode, Volume, "Cube");
            ui.radio_value(&mut next.view_mode, Surface, "Globe");
            if next.view_mode != state.view_mode {
                commands.push(Command::SetViewMode(next.view_mode));
            }

            ui.add_space(10.0);

            ui.label("Dataset");
            for dataset in all_descriptors() {
                ui.radio_value(&mut next.active_dataset, dataset.id, dataset.name)
                    .on_hover_text(dataset.description);
            }
            if next.active_dataset != state.active_dataset {
                commands.push(Command::SetDataset(next.active_dataset));
            }

            if next.active_dataset == DatasetId::Temperature {
                ui.horizontal(|ui| {
                    ui.radio_value(&mut next.transfer_style, Diverging, "Diverging");
                    ui.radio_value(&mut next.transfer_style, Hotspot, "Hotspots");
                });
                if next.transfer_style != state.transfer_style {
                    commands.push(Command::SetTransferStyle(next.transfer_style));
                }
            }

            ui.add_space(10.0);

            ui.separator();

            ui.add_space(10.0);

            ui.label("Opacity");
            if ui
                .add(Slider::new(&mut next.opacity, 0.1..=1.0))
                .changed()
            {
                commands.push(Command::SetOpacity(next.opacity));
            }

            ui.label("Threshold");
            if ui
                .add(Slider::new(&mut next.threshold, 0.0..=MAX_THRESHOLD).step_by(0.05))
                .changed()
            {
                commands.push(Command::SetThreshold(next.threshold));
            }

            if state.view_mode == Volume {
                ui.label("Time Axis Length");
                if ui
                    .add(Slider::new(
                        &mut next.time_axis_scale,
                        MIN_TIME_AXIS_SCALE..=MAX_TIME_AXIS_SCALE,
                    ))
                    .changed()
                {
                    commands.push(Command::SetTimeAxisScale(next.time_axis_scale));
                }
            }

            if ui
                .checkbox(&mut next.show_secondary_view, "Time slice view")
                .changed()
            {
                commands.push(Command::SetSecondaryView(next.show_secondary_view));
            }

            ui.add_space(10.0);

            ui.separator();

            ui.add_space(10.0);

            let active = descriptor(state.active_dataset);
            ui.label(active.name);

            let width = ui.available_width();
            let (rect, _) = ui.allocate_exact_size(vec2(width, LEGEND_HEIGHT), Sense::hover());
            let painter = ui.painter();
            let step = rect.width() / LEGEND_STEPS as f32;
            for i in 0..LEGEND_STEPS {
                let t = (i as f32 + 0.5) / LEGEND_STEPS as f32;
                let [r, g, b, a] = active.legend_color(t);
                let x = rect.left() + i as f32 * step;
                painter.rect_filled(
                    Rect::from_min_max(pos2(x, rect.top()), pos2(x + step + 0.5, rect.bottom())),
                    0.0,
                    Color32::from_rgba_unmultiplied(r, g, b, a),
                );
            }

            let (min_label, max_label) = active.range_labels();
            ui.horizontal(|ui| {
                ui.small(min_label);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.small(max_label);
                });
            });
        });

    let painter = gui_context.layer_painter(LayerId::background());
    for label in labels {
        let position = pos2(
            label.x / space.pixels_per_point,
            (space.window_height as f32 - label.y) / space.pixels_per_point,
        );
        let (size, color) = if label.emphasis {
            (18.0, Color32::WHITE)
        } else {
            (12.0, Color32::from_rgb(0x94, 0xa3, 0xb8))
        };
        painter.text(
            position,
            Align2::CENTER_TOP,
            &label.text,
            FontId::proportional(size),
            color,
        );
    }

    commands
}
