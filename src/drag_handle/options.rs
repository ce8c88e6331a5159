use egui::{CursorIcon, PointerButton};

/// Options for [`super::DragHandle`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DragHandleOptions {
    /// The pointer button that starts (and, when released, ends) a drag.
    pub button: PointerButton,

    /// If true, the move listener asks the host to suppress its default handling of pointer
    /// moves while dragging (e.g. text selection in other widgets).
    pub prevent_default_on_move: bool,

    /// If true, moves that don't change the pointer position are not reported to `on_drag`.
    pub skip_zero_deltas: bool,

    /// Cursor shown while hovering an idle handle.
    pub hover_cursor: Option<CursorIcon>,

    /// Cursor shown while a drag is in progress, wherever the pointer is.
    pub dragging_cursor: Option<CursorIcon>,

    /// If true, a handle that is not shown during a frame has its drag ended by
    /// [`crate::PointerHub::end_frame`], as if it had been removed from the UI.
    pub end_session_when_hidden: bool,
}

impl Default for DragHandleOptions {
    fn default() -> Self {
        Self {
            button: PointerButton::Primary,
            prevent_default_on_move: true,
            skip_zero_deltas: false,
            hover_cursor: Some(CursorIcon::Grab),
            dragging_cursor: Some(CursorIcon::Grabbing),
            end_session_when_hidden: true,
        }
    }
}

impl DragHandleOptions {
    pub(crate) fn reports_delta(&self, delta: egui::Vec2) -> bool {
        !(self.skip_zero_deltas && delta == egui::Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use egui::Vec2;

    use super::*;

    #[test]
    fn zero_deltas_are_reported_by_default() {
        let opt = DragHandleOptions::default();
        assert!(opt.reports_delta(Vec2::ZERO));
        assert!(opt.reports_delta(Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn skip_zero_deltas_only_filters_zero() {
        let opt = DragHandleOptions {
            skip_zero_deltas: true,
            ..Default::default()
        };
        assert!(!opt.reports_delta(Vec2::ZERO));
        assert!(opt.reports_delta(Vec2::new(0.5, 0.0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_json_fields_fall_back_to_defaults() {
        let opt: DragHandleOptions =
            serde_json::from_str(r#"{ "skip_zero_deltas": true, "button": "Secondary" }"#)
                .expect("valid options json");
        assert!(opt.skip_zero_deltas);
        assert_eq!(opt.button, PointerButton::Secondary);
        assert!(opt.prevent_default_on_move);
        assert_eq!(opt.dragging_cursor, Some(CursorIcon::Grabbing));
    }
}
