use clap::{ArgAction, Parser};
use datacube_volumetric_renderer::clock::Controller;
use datacube_volumetric_renderer::config::Settings;
use datacube_volumetric_renderer::coordinator::{Coordinator, ViewKind};
use datacube_volumetric_renderer::dataset::all_descriptors;
use datacube_volumetric_renderer::headless;
use datacube_volumetric_renderer::param::{DatasetId, TransferStyle, ViewMode};
use datacube_volumetric_renderer::result::Result;
use datacube_volumetric_renderer::state::Command;
use std::path::PathBuf;
use three_d::{ClearState, Event, FrameOutput, Key, PhysicalPoint, Window, WindowSettings, GUI};
use tracing::Level;

use crate::gui::{render_gui, LabelSpace, CONTROL_PANEL_WIDTH};
use crate::scene::{PrimaryView, SliceView};

mod gui;
mod material;
mod object;
mod scene;

/// Procedural datacube explorer: a synthetic year of climate-like data shown
/// as a translucent volume or an animated globe, with a time-slice view.
#[derive(Parser, Debug)]
#[command(name = "datacube", version, long_about = None)]
struct Args {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset shown at startup
    #[arg(long, value_enum)]
    dataset: Option<DatasetId>,

    /// Primary view geometry at startup
    #[arg(long, value_enum)]
    mode: Option<ViewMode>,

    /// Color scheme for the temperature dataset
    #[arg(long, value_enum)]
    style: Option<TransferStyle>,

    /// Show the time-slice view at startup
    #[arg(long)]
    slice_view: bool,

    /// Run the pipeline on the CPU without opening a window
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Frame rate of the headless schedule
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Print the initial snapshot and dataset descriptors as JSON and exit
    #[arg(long)]
    describe: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let initial = &mut settings.initial;
        if let Some(dataset) = self.dataset {
            initial.active_dataset = dataset;
        }
        if let Some(mode) = self.mode {
            initial.view_mode = mode;
        }
        if let Some(style) = self.style {
            initial.transfer_style = style;
        }
        if self.slice_view {
            initial.show_secondary_view = true;
        }

        Ok(settings)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let settings = args.settings()?;
    let mut controller = Controller::new(settings.initial);

    if args.describe {
        let description = serde_json::json!({
            "snapshot": controller.snapshot(),
            "datasets": all_descriptors(),
        });
        println!("{}", serde_json::to_string_pretty(&description)?);
        return Ok(());
    }

    if args.headless {
        tracing::info!(frames = args.frames, fps = args.fps, "starting headless run");
        let last = headless::run(
            &mut controller,
            settings.headless_resolution,
            settings.slice_count,
            args.frames,
            args.fps,
        )
        .await;
        tracing::info!(frame = last.frame, day = last.state.simulated_day, "headless run finished");
        return Ok(());
    }

    run_window(settings, controller)
}

fn event_position(event: &Event) -> Option<PhysicalPoint> {
    match event {
        Event::MousePress { position, .. }
        | Event::MouseRelease { position, .. }
        | Event::MouseMotion { position, .. }
        | Event::MouseWheel { position, .. } => Some(*position),
        _ => None,
    }
}

/// Returns true when the key ends the window loop.
fn handle_key(controller: &mut Controller, key: Key) -> bool {
    match key {
        Key::Space => controller.dispatch(Command::TogglePlaying),
        Key::Escape => return true,
        _ => {}
    }
    false
}

fn run_window(settings: Settings, mut controller: Controller) -> Result<()> {
    let window = Window::new(WindowSettings {
        title: settings.window_title.clone(),
        max_size: Some(settings.window_size),
        ..Default::default()
    })?;
    let context = window.gl();

    let mut gui = GUI::new(&context);
    let mut coordinator: Coordinator<PrimaryView, SliceView> =
        Coordinator::new(PrimaryView::new(&context, &settings, window.viewport()));

    let mut exit = false;

    tracing::info!(
        title = %settings.window_title,
        slices = settings.slice_count,
        "window opened"
    );

    window.render_loop(move |mut frame_input| {
        for event in frame_input.events.iter() {
            if let Event::KeyPress {
                kind,
                handled: false,
                ..
            } = event
            {
                exit |= handle_key(&mut controller, *kind);
            }
        }

        let mut labels = coordinator.primary().labels().to_vec();
        if let Some(view) = coordinator.secondary() {
            labels.extend_from_slice(view.labels());
        }
        let space = LabelSpace {
            pixels_per_point: frame_input.device_pixel_ratio,
            window_height: frame_input.viewport.height,
        };

        let mut commands = Vec::new();
        gui.update(
            &mut frame_input.events,
            frame_input.accumulated_time,
            frame_input.viewport,
            frame_input.device_pixel_ratio,
            |gui_context| {
                commands = render_gui(gui_context, controller.state(), &labels, &space);
            },
        );
        controller.dispatch_all(commands);

        let frame = controller.advance_frame();
        let panel_width = (CONTROL_PANEL_WIDTH * frame_input.device_pixel_ratio).round() as u32;
        let state = frame.state;
        coordinator.prepare_frame(
            &frame,
            frame_input.viewport.width,
            frame_input.viewport.height,
            panel_width,
            || SliceView::new(&context, &state, frame_input.viewport),
        );

        let mut primary_events = Vec::new();
        for event in frame_input.events.iter() {
            let target = match event_position(event) {
                Some(position) => coordinator.route(position.x, position.y),
                None => Some(ViewKind::Primary),
            };
            // The time-slice view has a fixed camera.
            if target == Some(ViewKind::Primary) {
                primary_events.push(event.clone());
            }
        }
        coordinator.primary_mut().handle_events(&mut primary_events);

        let screen = frame_input.screen();
        screen.clear(ClearState::color_and_depth(0.0, 0.0, 0.0, 1.0, 1.0));
        coordinator.primary().render(&screen);
        if let (Some(view), Some(_)) = (coordinator.secondary(), coordinator.layout().secondary) {
            view.render(&screen);
        }
        if let Err(error) = screen.write(|| gui.render()) {
            tracing::error!(%error, "failed to draw control panel");
        }

        FrameOutput {
            exit,
            ..Default::default()
        }
    });

    Ok(())
}
