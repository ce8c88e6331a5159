use egui::{PointerButton, Pos2, Vec2};

use crate::registry::Subscription;

/// One press-drag-release gesture.
///
/// The session owns the move and release [`Subscription`]s: the listeners are registered exactly
/// as long as the session exists.
#[derive(Debug)]
pub(super) struct DragSession {
    id: u64,
    button: PointerButton,
    start: Pos2,
    last_pointer: Pos2,
    moves: u64,
    _on_move: Subscription,
    _on_release: Subscription,
}

impl DragSession {
    pub(super) fn new(
        id: u64,
        button: PointerButton,
        start: Pos2,
        on_move: Subscription,
        on_release: Subscription,
    ) -> Self {
        Self {
            id,
            button,
            start,
            last_pointer: start,
            moves: 0,
            _on_move: on_move,
            _on_release: on_release,
        }
    }

    pub(super) fn id(&self) -> u64 {
        self.id
    }

    pub(super) fn button(&self) -> PointerButton {
        self.button
    }

    pub(super) fn start(&self) -> Pos2 {
        self.start
    }

    pub(super) fn last_pointer(&self) -> Pos2 {
        self.last_pointer
    }

    /// Record the new pointer position, returning the displacement since the previous one.
    pub(super) fn advance(&mut self, pos: Pos2) -> Vec2 {
        let delta = pos - self.last_pointer;
        self.last_pointer = pos;
        self.moves = self.moves.saturating_add(1);
        delta
    }

    pub(super) fn summary(&self, reason: &str) -> String {
        format!(
            "session END id={} reason={reason} moves={} start={:?} last={:?}",
            self.id, self.moves, self.start, self.last_pointer
        )
    }
}
