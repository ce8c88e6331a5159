use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use egui::Context;
use itertools::Itertools as _;

use crate::drag_handle::{DragHandle, HandleShared};
use crate::events::{PointerEvent, PointerEventKind};
use crate::registry::PointerRegistry;

/// Options for [`PointerHub`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointerHubOptions {
    /// If true, end a drag whose button is no longer held even though no release event arrived
    /// (e.g. the button was released while the pointer was outside the window).
    pub synthesize_release_on_button_up: bool,

    /// If true, record session events in a small ring buffer (see [`PointerHub::debug_log_text`]).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,
}

impl Default for PointerHubOptions {
    fn default() -> Self {
        Self {
            synthesize_release_on_button_up: true,
            debug_event_log: false,
            debug_event_log_capacity: 200,
        }
    }
}

/// What [`PointerHub::begin_frame`] delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,

    /// Pointer events translated from this frame's input.
    pub dispatched: usize,

    /// Listener invocations across all dispatched events.
    pub notified: usize,

    /// Some listener asked to suppress the default handling of a move.
    pub default_prevented: bool,
}

/// Bridges `egui` pointer input to a [`PointerRegistry`] and ends drags of handles that
/// disappear from the UI.
///
/// Call [`Self::begin_frame`] before showing any [`DragHandle`] and [`Self::end_frame`] after:
///
/// ```no_run
/// # let ctx = egui::Context::default();
/// let mut hub = egui_drag_handle::PointerHub::default();
/// let handle = egui_drag_handle::DragHandle::new(hub.registry())
///     .with_on_drag(|delta| println!("dragged by {delta:?}"));
///
/// hub.begin_frame(&ctx);
/// egui::CentralPanel::default().show(&ctx, |ui| {
///     handle.ui(ui, &hub, |ui| ui.label("drag me"));
/// });
/// hub.end_frame(&ctx);
/// ```
#[derive(Debug, Default)]
pub struct PointerHub {
    pub options: PointerHubOptions,

    registry: PointerRegistry,
    frame: u64,
    tracked: RefCell<Vec<Weak<HandleShared>>>,
    debug_log: RefCell<VecDeque<String>>,
}

impl PointerHub {
    pub fn new(options: PointerHubOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Use an existing registry (e.g. one shared with non-egui event sources).
    pub fn with_registry(options: PointerHubOptions, registry: PointerRegistry) -> Self {
        Self {
            options,
            registry,
            ..Default::default()
        }
    }

    pub fn registry(&self) -> &PointerRegistry {
        &self.registry
    }

    /// Number of the current frame; increases by one in every [`Self::begin_frame`].
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of tracked handles with a drag in progress.
    pub fn active_drag_count(&self) -> usize {
        self.tracked
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|shared| shared.is_dragging())
            .count()
    }

    /// Deliver this frame's pointer moves and releases to the registered listeners.
    pub fn begin_frame(&mut self, ctx: &Context) -> FrameReport {
        self.frame = self.frame.wrapping_add(1);

        let events = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(PointerEvent::from_egui)
                .collect_vec()
        });

        let mut report = FrameReport {
            frame: self.frame,
            ..Default::default()
        };
        for event in &events {
            let outcome = self.registry.dispatch(event);
            report.dispatched += 1;
            report.notified += outcome.notified;
            if event.kind() == PointerEventKind::Move && outcome.default_prevented {
                report.default_prevented = true;
            }
        }
        report
    }

    /// End the drags of handles that were not shown this frame, or whose button is up.
    pub fn end_frame(&mut self, ctx: &Context) {
        let frame = self.frame;
        let tracked = std::mem::take(self.tracked.get_mut());

        let mut still_dragging = Vec::with_capacity(tracked.len());
        for weak in tracked {
            let Some(shared) = weak.upgrade() else {
                continue;
            };
            let Some(button) = shared.session_button() else {
                continue;
            };

            if shared.ends_when_hidden() && !shared.shown_in_frame(frame) {
                if let Some(summary) = shared.end("hidden") {
                    self.debug_log_event(summary);
                }
                continue;
            }

            if self.options.synthesize_release_on_button_up
                && !ctx.input(|i| i.pointer.button_down(button))
            {
                if let Some(summary) = shared.end("button up") {
                    self.debug_log_event(summary);
                }
                continue;
            }

            still_dragging.push(weak);
        }

        *self.tracked.get_mut() = still_dragging;
    }

    /// [`Self::begin_frame`], then `add_contents`, then [`Self::end_frame`].
    pub fn run<R>(&mut self, ctx: &Context, add_contents: impl FnOnce(&Self) -> R) -> R {
        self.begin_frame(ctx);
        let ret = add_contents(self);
        self.end_frame(ctx);
        ret
    }

    /// Watch a dragging handle until its drag ends.
    pub(crate) fn track(&self, handle: &DragHandle) {
        let shared = Rc::downgrade(handle.shared());
        let mut tracked = self.tracked.borrow_mut();
        if !tracked.iter().any(|other| Weak::ptr_eq(other, &shared)) {
            tracked.push(shared);
        }
    }

    pub(crate) fn debug_log_event(&self, message: impl Into<String>) {
        if !self.options.debug_event_log {
            return;
        }
        let cap = self.options.debug_event_log_capacity.max(1).min(10_000);
        let mut log = self.debug_log.borrow_mut();
        while log.len() >= cap {
            log.pop_front();
        }
        log.push_back(format!("[frame {}] {}", self.frame, message.into()));
    }

    pub fn debug_log_lines(&self) -> Vec<String> {
        self.debug_log.borrow().iter().cloned().collect()
    }

    /// The debug log as one newline-separated string, for copy-paste.
    pub fn debug_log_text(&self) -> String {
        self.debug_log.borrow().iter().join("\n")
    }

    pub fn clear_debug_log(&mut self) {
        self.debug_log.get_mut().clear();
    }
}
