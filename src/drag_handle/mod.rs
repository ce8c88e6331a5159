use std::cell::{Cell, RefCell};
use std::rc::Rc;

use egui::{PointerButton, Pos2, Vec2};

use crate::events::{DefaultAction, PointerEvent, PointerEventKind};
use crate::registry::PointerRegistry;

mod options;
mod session;
mod widget;

#[cfg(test)]
mod model_tests;

pub use options::DragHandleOptions;
pub use widget::DisplayAttributes;

use session::DragSession;

type DragCallback = Box<dyn FnMut(Vec2)>;

/// What a [`DragHandle`] is doing right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging {
        /// Where the press happened.
        start: Pos2,

        /// The last recorded pointer position.
        last: Pos2,
    },
}

/// State shared between a [`DragHandle`] and the listeners its sessions register.
///
/// Listeners only hold a `Weak` to this, so dropping the handle drops the session.
pub(crate) struct HandleShared {
    options: RefCell<DragHandleOptions>,
    session: RefCell<Option<DragSession>>,
    on_drag: RefCell<Option<DragCallback>>,
    next_session_id: Cell<u64>,
    shown_frame: Cell<Option<u64>>,
}

impl HandleShared {
    fn new(options: DragHandleOptions) -> Self {
        Self {
            options: RefCell::new(options),
            session: RefCell::new(None),
            on_drag: RefCell::new(None),
            next_session_id: Cell::new(1),
            shown_frame: Cell::new(None),
        }
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub(crate) fn session_button(&self) -> Option<PointerButton> {
        self.session.borrow().as_ref().map(DragSession::button)
    }

    pub(crate) fn ends_when_hidden(&self) -> bool {
        self.options.borrow().end_session_when_hidden
    }

    pub(crate) fn shown_in_frame(&self, frame: u64) -> bool {
        self.shown_frame.get() == Some(frame)
    }

    fn mark_shown(&self, frame: u64) {
        self.shown_frame.set(Some(frame));
    }

    fn pointer_moved(&self, pos: Pos2) -> Option<Vec2> {
        let (delta, id) = {
            let mut session = self.session.borrow_mut();
            let session = session.as_mut()?;
            (session.advance(pos), session.id())
        };
        log::trace!("session {id} moved to {pos:?}, delta {delta:?}");

        if !self.options.borrow().reports_delta(delta) {
            return Some(delta);
        }

        // No session borrow is held here, so the callback may query the handle.
        match self.on_drag.try_borrow_mut() {
            Ok(mut on_drag) => {
                if let Some(on_drag) = on_drag.as_mut() {
                    on_drag(delta);
                }
            }
            Err(_) => {
                log::warn!("on_drag re-entered from within itself; dropping delta {delta:?}");
            }
        }
        Some(delta)
    }

    fn pointer_released(&self, button: PointerButton) -> bool {
        if self.session_button() != Some(button) {
            return false;
        }
        self.end("released").is_some()
    }

    /// End the current session (if any), unregistering its listeners.
    pub(crate) fn end(&self, reason: &str) -> Option<String> {
        let ended = self.session.borrow_mut().take()?;
        let summary = ended.summary(reason);
        log::debug!("{summary}");
        drop(ended);
        Some(summary)
    }
}

/// Wraps some UI so that it can be dragged with the pointer.
///
/// While the button is held, every pointer move is reported to the `on_drag` callback as the
/// displacement since the previous move (not since the press).
///
/// The handle can be driven directly (see [`Self::press`], [`Self::move_to`], [`Self::release`])
/// or shown with [`Self::ui`] inside a frame bracketed by a [`crate::PointerHub`].
/// Dropping the handle ends any drag in progress.
pub struct DragHandle {
    registry: PointerRegistry,
    shared: Rc<HandleShared>,
    attributes: DisplayAttributes,
}

impl std::fmt::Debug for DragHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragHandle")
            .field("phase", &self.phase())
            .field("options", &*self.shared.options.borrow())
            .field("has_on_drag", &self.shared.on_drag.borrow().is_some())
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl DragHandle {
    pub fn new(registry: &PointerRegistry) -> Self {
        Self::new_with_options(registry, DragHandleOptions::default())
    }

    pub fn new_with_options(registry: &PointerRegistry, options: DragHandleOptions) -> Self {
        Self {
            registry: registry.clone(),
            shared: Rc::new(HandleShared::new(options)),
            attributes: DisplayAttributes::default(),
        }
    }

    /// Call `on_drag(delta)` for every pointer move during a drag.
    #[inline]
    pub fn with_on_drag(mut self, on_drag: impl FnMut(Vec2) + 'static) -> Self {
        self.set_on_drag(on_drag);
        self
    }

    #[inline]
    pub fn with_attributes(mut self, attributes: DisplayAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn set_on_drag(&mut self, on_drag: impl FnMut(Vec2) + 'static) {
        *self.shared.on_drag.borrow_mut() = Some(Box::new(on_drag));
    }

    /// Keep dragging, but stop notifying anyone.
    pub fn clear_on_drag(&mut self) {
        *self.shared.on_drag.borrow_mut() = None;
    }

    pub fn options(&self) -> DragHandleOptions {
        self.shared.options.borrow().clone()
    }

    /// Takes effect immediately, including for a drag in progress.
    pub fn set_options(&mut self, options: DragHandleOptions) {
        *self.shared.options.borrow_mut() = options;
    }

    pub fn attributes(&self) -> &DisplayAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut DisplayAttributes {
        &mut self.attributes
    }

    pub fn registry(&self) -> &PointerRegistry {
        &self.registry
    }

    pub fn is_dragging(&self) -> bool {
        self.shared.is_dragging()
    }

    pub fn phase(&self) -> DragPhase {
        match self.shared.session.borrow().as_ref() {
            Some(session) => DragPhase::Dragging {
                start: session.start(),
                last: session.last_pointer(),
            },
            None => DragPhase::Idle,
        }
    }

    /// Id of the drag in progress. Ids start at 1 and increase with every press.
    pub fn session_id(&self) -> Option<u64> {
        self.shared.session.borrow().as_ref().map(DragSession::id)
    }

    /// Start a drag at `pos`, registering the move and release listeners.
    ///
    /// A drag already in progress is ended first. Returns the new session id.
    ///
    /// When called directly, the [`crate::PointerHub`] only starts watching the drag (hidden
    /// teardown, lost releases) once the handle is shown with [`Self::ui`].
    pub fn press(&self, pos: Pos2) -> u64 {
        if let Some(summary) = self.shared.end("pressed again") {
            log::warn!("press while dragging: {summary}");
        }

        let button = self.shared.options.borrow().button;
        let id = self.shared.next_session_id.get();
        self.shared.next_session_id.set(id.saturating_add(1));

        let on_move = self.registry.subscribe(PointerEventKind::Move, {
            let shared = Rc::downgrade(&self.shared);
            move |event| {
                let PointerEvent::Moved { pos } = *event else {
                    return DefaultAction::Allow;
                };
                let Some(shared) = shared.upgrade() else {
                    return DefaultAction::Allow;
                };
                match shared.pointer_moved(pos) {
                    Some(_) if shared.options.borrow().prevent_default_on_move => {
                        DefaultAction::Prevent
                    }
                    _ => DefaultAction::Allow,
                }
            }
        });
        let on_release = self.registry.subscribe(PointerEventKind::Release, {
            let shared = Rc::downgrade(&self.shared);
            move |event| {
                if let (PointerEvent::Released { button, .. }, Some(shared)) =
                    (*event, shared.upgrade())
                {
                    shared.pointer_released(button);
                }
                DefaultAction::Allow
            }
        });

        *self.shared.session.borrow_mut() =
            Some(DragSession::new(id, button, pos, on_move, on_release));
        log::debug!("session START id={id} button={button:?} pos={pos:?}");
        id
    }

    /// Report a pointer move. Returns the displacement, or `None` if no drag is in progress.
    ///
    /// Moves normally arrive through the registry; this is the same entry point.
    pub fn move_to(&self, pos: Pos2) -> Option<Vec2> {
        self.shared.pointer_moved(pos)
    }

    /// End the drag in progress. Returns `false` if there was none.
    pub fn release(&self) -> bool {
        self.shared.end("released").is_some()
    }

    /// End the drag as if the handle had been removed from the UI.
    pub fn teardown(&self) -> bool {
        self.shared.end("teardown").is_some()
    }

    pub(crate) fn shared(&self) -> &Rc<HandleShared> {
        &self.shared
    }
}

impl Drop for DragHandle {
    fn drop(&mut self) {
        self.shared.end("dropped");
    }
}
