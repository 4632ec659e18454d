//! DOM listener registration with scoped removal.
//!
//! Every closure registered through [`Listeners`] is removed from its
//! target when the guard is dropped, so detaching a canvas never leaks
//! callbacks into the page.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

type Handler = Closure<dyn FnMut(Event)>;

pub struct Listeners {
    target: EventTarget,
    entries: Vec<(&'static str, Handler)>,
}

impl Listeners {
    pub fn new(target: EventTarget) -> Self {
        Self {
            target,
            entries: Vec::new(),
        }
    }

    /// Register `handler` for `event`. `passive = false` lets the handler
    /// call `preventDefault` (needed for wheel and touchmove).
    pub fn add(
        &mut self,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Handler::new(handler);
        let opts = AddEventListenerOptions::new();
        opts.set_passive(passive);
        self.target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &opts,
            )?;
        self.entries.push((event, closure));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (event, closure) in self.entries.drain(..) {
            if let Err(e) = self
                .target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove {event} listener: {e:?}");
            }
        }
    }
}
