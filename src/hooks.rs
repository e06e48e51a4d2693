use crate::browser::window_size;
use crate::effects::CursorOverlay;
use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use log::warn;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

/// Holds at most one pending `Timeout`. Replacing or cancelling the slot
/// drops the previous timer, which clears it in the browser.
#[derive(Clone, Default)]
pub struct TimerSlot(Rc<RefCell<Option<Timeout>>>);

impl TimerSlot {
    pub fn schedule<F: FnOnce() + 'static>(&self, delay_ms: u32, callback: F) {
        let handle = Timeout::new(delay_ms, callback);
        self.0.borrow_mut().replace(handle);
    }

    pub fn cancel(&self) {
        self.0.borrow_mut().take();
    }
}

/// A timer slot owned by the calling component, cancelled on unmount.
#[hook]
pub fn use_timer_slot() -> TimerSlot {
    let slot = use_memo((), |_| TimerSlot::default());
    {
        let slot = (*slot).clone();
        use_effect_with((), move |_| move || slot.cancel());
    }
    (*slot).clone()
}

/// Viewport size, kept current through a `resize` listener.
#[hook]
pub fn use_window_size() -> (u32, u32) {
    let size = use_state(window_size);
    {
        let size = size.clone();
        use_effect_with((), move |_| {
            let listener = EventListener::new(&gloo_utils::window(), "resize", move |_| {
                size.set(window_size());
            });
            move || drop(listener)
        });
    }
    *size
}

/// Mount the custom cursor for the lifetime of the calling component.
#[hook]
pub fn use_cursor_overlay() {
    use_effect_with((), |_| {
        let overlay = match CursorOverlay::mount() {
            Ok(overlay) => Some(overlay),
            Err(err) => {
                warn!("Custom cursor unavailable: {:?}", err);
                None
            }
        };
        move || drop(overlay)
    });
}
