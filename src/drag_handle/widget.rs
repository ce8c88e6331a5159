use egui::{Frame, Id, InnerResponse, Sense, Ui};

use super::DragHandle;
use crate::hub::PointerHub;

/// Pass-through display attributes for the UI wrapped by a [`DragHandle`].
#[derive(Clone, Debug, Default)]
pub struct DisplayAttributes {
    /// Draw the wrapped UI inside this frame.
    pub frame: Option<Frame>,

    /// Shown when hovering the handle.
    pub hover_text: Option<String>,

    /// Stable id for the drag sense. By default it is derived from the wrapped UI's id.
    pub id_salt: Option<Id>,
}

impl DisplayAttributes {
    #[inline]
    pub fn frame(mut self, frame: Frame) -> Self {
        self.frame = Some(frame);
        self
    }

    #[inline]
    pub fn hover_text(mut self, text: impl Into<String>) -> Self {
        self.hover_text = Some(text.into());
        self
    }

    #[inline]
    pub fn id_salt(mut self, salt: impl std::hash::Hash) -> Self {
        self.id_salt = Some(Id::new(salt));
        self
    }
}

impl DragHandle {
    /// Show `add_contents` and make it draggable.
    ///
    /// Must be called between [`PointerHub::begin_frame`] and [`PointerHub::end_frame`].
    /// A press of the configured button inside the shown rect starts a drag; moves and the
    /// release are delivered by the hub in the following frames.
    pub fn ui<R>(
        &self,
        ui: &mut Ui,
        hub: &PointerHub,
        add_contents: impl FnOnce(&mut Ui) -> R,
    ) -> InnerResponse<R> {
        self.shared.mark_shown(hub.frame());

        let InnerResponse {
            inner,
            response: content,
        } = match self.attributes.frame {
            Some(frame) => frame.show(ui, add_contents),
            None => ui.scope(add_contents),
        };

        let id = match self.attributes.id_salt {
            Some(salt) => ui.make_persistent_id(salt),
            None => content.id.with("drag_handle"),
        };
        let mut response = ui.interact(content.rect, id, Sense::drag());
        let options = self.options();

        // Read the press from this frame's events: a press released within the same frame
        // never shows up as `press_origin`.
        let pressed_at = ui.input(|i| {
            i.events.iter().find_map(|event| match *event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed: true,
                    ..
                } if button == options.button => Some(pos),
                _ => None,
            })
        });
        // `contains_pointer` is false when another layer covers the handle.
        let accepts_press = ui.is_enabled() && response.contains_pointer();
        if let Some(pos) =
            pressed_at.filter(|pos| accepts_press && response.interact_rect.contains(*pos))
        {
            let session_id = self.press(pos);
            hub.debug_log_event(format!("session START id={session_id} pos={pos:?}"));
        }
        if self.is_dragging() {
            hub.track(self);
            if options.prevent_default_on_move {
                // Owning egui's drag keeps other widgets from reacting to the moves.
                ui.ctx().set_dragged_id(id);
            }
            if let Some(icon) = options.dragging_cursor {
                ui.ctx().set_cursor_icon(icon);
            }
        } else if let Some(icon) = options.hover_cursor {
            response = response.on_hover_cursor(icon);
        }

        if let Some(text) = &self.attributes.hover_text {
            response = response.on_hover_text(text.as_str());
        }

        InnerResponse::new(inner, response)
    }
}
