use egui::{PointerButton, Pos2};

/// A pointer event delivered through a [`crate::PointerRegistry`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer moved to `pos` (in points, same space as `egui` layout).
    Moved { pos: Pos2 },

    /// `button` was released. `pos` is `None` when the release was synthesized
    /// (e.g. the button is no longer held but we never saw the event).
    Released {
        button: PointerButton,
        pos: Option<Pos2>,
    },
}

/// Which listeners an event is delivered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointerEventKind {
    Move,
    Release,
}

/// What a listener wants done with the platform's default handling of an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefaultAction {
    #[default]
    Allow,

    /// Suppress the default handling (text selection, etc.).
    Prevent,
}

impl PointerEvent {
    pub fn kind(&self) -> PointerEventKind {
        match self {
            Self::Moved { .. } => PointerEventKind::Move,
            Self::Released { .. } => PointerEventKind::Release,
        }
    }

    pub fn pos(&self) -> Option<Pos2> {
        match *self {
            Self::Moved { pos } => Some(pos),
            Self::Released { pos, .. } => pos,
        }
    }

    /// Translate an `egui` input event. Presses are not translated: those are
    /// detected by the widget that owns them.
    pub fn from_egui(event: &egui::Event) -> Option<Self> {
        match event {
            egui::Event::PointerMoved(pos) => Some(Self::Moved { pos: *pos }),
            egui::Event::PointerButton {
                pos,
                button,
                pressed: false,
                ..
            } => Some(Self::Released {
                button: *button,
                pos: Some(*pos),
            }),
            _ => None,
        }
    }
}
