use crate::clock::FrameSnapshot;

/// Share of the drawable width given to the time-slice view.
pub const SECONDARY_WIDTH_FRACTION: f32 = 0.35;

/// A viewport in physical pixels, origin at the bottom-left.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x as f32
            && py >= self.y as f32
            && px < (self.x + self.width as i32) as f32
            && py < (self.y + self.height as i32) as f32
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum ViewKind {
    Primary,
    Secondary,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Layout {
    pub primary: Rect,
    pub secondary: Option<Rect>,
}

pub fn layout(width: u32, height: u32, panel_width: u32, show_secondary: bool) -> Layout {
    let panel_width = panel_width.min(width);
    let available = width - panel_width;

    if !show_secondary {
        return Layout {
            primary: Rect {
                x: panel_width as i32,
                y: 0,
                width: available,
                height,
            },
            secondary: None,
        };
    }

    let secondary_width = (available as f32 * SECONDARY_WIDTH_FRACTION).round() as u32;
    let primary_width = available - secondary_width;
    Layout {
        primary: Rect {
            x: panel_width as i32,
            y: 0,
            width: primary_width,
            height,
        },
        secondary: Some(Rect {
            x: (panel_width + primary_width) as i32,
            y: 0,
            width: secondary_width,
            height,
        }),
    }
}

pub trait ViewPass {
    /// Updates the pass for this frame. Called once per frame, before any
    /// drawing, with the frame's only snapshot.
    fn prepare(&mut self, frame: &FrameSnapshot, viewport: Rect);
}

pub struct Coordinator<P, S> {
    primary: P,
    secondary: Option<S>,
    layout: Layout,
    mounts: u64,
}

impl<P: ViewPass, S: ViewPass> Coordinator<P, S> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            secondary: None,
            layout: layout(0, 0, 0, false),
            mounts: 0,
        }
    }

    /// Lays out the viewports, mounts or unmounts the time-slice view to
    /// match the snapshot, then prepares every mounted view from the same
    /// snapshot.
    pub fn prepare_frame(
        &mut self,
        frame: &FrameSnapshot,
        width: u32,
        height: u32,
        panel_width: u32,
        mount: impl FnOnce() -> S,
    ) -> Layout {
        let show = frame.state.show_secondary_view;
        self.layout = layout(width, height, panel_width, show);

        match (show, self.secondary.is_some()) {
            (true, false) => {
                self.secondary = Some(mount());
                self.mounts += 1;
                tracing::info!(frame = frame.frame, "time-slice view mounted");
            }
            (false, true) => {
                self.secondary = None;
                tracing::info!(frame = frame.frame, "time-slice view unmounted");
            }
            _ => {}
        }

        self.primary.prepare(frame, self.layout.primary);
        if let (Some(view), Some(viewport)) = (self.secondary.as_mut(), self.layout.secondary) {
            view.prepare(frame, viewport);
        }
        self.layout
    }

    pub fn route(&self, px: f32, py: f32) -> Option<ViewKind> {
        if self.layout.primary.contains(px, py) {
            return Some(ViewKind::Primary);
        }
        match (self.secondary.as_ref(), self.layout.secondary) {
            (Some(_), Some(rect)) if rect.contains(px, py) => Some(ViewKind::Secondary),
            _ => None,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut P {
        &mut self.primary
    }

    pub fn secondary(&self) -> Option<&S> {
        self.secondary.as_ref()
    }

    pub fn mount_count(&self) -> u64 {
        self.mounts
    }
}
