//! `Swish.Toast`: removes its element after `data-close-delay` milliseconds.
//! Hovering the toast pauses the countdown; leaving it restarts the full delay.

use std::{
    cell::RefCell,
    mem,
    rc::{Rc, Weak},
};

use document::{listener, Document, ListenerId, NodeId};
use shared::{
    domain::{CloseDelay, HookKind},
    error::ConfigurationError,
    protocol::CLOSE_DELAY_ATTRIBUTE,
};
use tracing::debug;

use crate::{
    attribute::required_integer,
    events::listen_all,
    timer::{self, TimerHandle},
    Hook,
};

const PAUSE_EVENT: &str = "mouseenter";
const RESUME_EVENT: &str = "mouseleave";

struct ToastState {
    document: Document,
    element: NodeId,
    close_delay: CloseDelay,
    timer: Option<TimerHandle>,
    hover_listeners: Vec<ListenerId>,
    dismissed: bool,
    destroyed: bool,
}

impl ToastState {
    fn release_listeners(&mut self) {
        for listener in mem::take(&mut self.hover_listeners) {
            self.document.remove_event_listener(self.element, listener);
        }
    }

    fn dismiss(&mut self) {
        if self.dismissed || self.destroyed {
            return;
        }
        self.dismissed = true;
        self.timer = None;
        self.release_listeners();
        self.document.remove(self.element);
        debug!(element = %self.document.describe(self.element), "toast dismissed");
    }
}

fn arm(state: &Rc<RefCell<ToastState>>) {
    let weak = Rc::downgrade(state);
    let mut guard = state.borrow_mut();
    if let Some(previous) = guard.timer.take() {
        previous.cancel();
    }
    let timer = timer::schedule(guard.close_delay.as_duration(), move || {
        if let Some(state) = weak.upgrade() {
            state.borrow_mut().dismiss();
        }
    });
    guard.timer = Some(timer);
}

fn hover_listener(state: Weak<RefCell<ToastState>>, pause: bool) -> document::Listener {
    listener(move |_, _| {
        let Some(state) = state.upgrade() else {
            return;
        };
        if state.borrow().dismissed {
            return;
        }
        if pause {
            let timer = state.borrow_mut().timer.take();
            if let Some(timer) = timer {
                timer.cancel();
                debug!("toast dismissal paused");
            }
            return;
        }
        let paused = state.borrow().timer.is_none();
        if paused {
            arm(&state);
            debug!("toast dismissal restarted");
        }
    })
}

pub struct Toast {
    state: Rc<RefCell<ToastState>>,
}

impl Toast {
    /// Reads `data-close-delay` and starts the countdown.
    ///
    /// Must be called from within a `tokio::task::LocalSet`; scheduling the
    /// dismissal panics outside one.
    pub fn mount(document: &Document, element: NodeId) -> Result<Self, ConfigurationError> {
        let close_delay = CloseDelay(required_integer(document, element, CLOSE_DELAY_ATTRIBUTE)?);

        let state = Rc::new(RefCell::new(ToastState {
            document: document.clone(),
            element,
            close_delay,
            timer: None,
            hover_listeners: Vec::new(),
            dismissed: false,
            destroyed: false,
        }));

        let hover_listeners = listen_all(
            document,
            element,
            [(PAUSE_EVENT, true), (RESUME_EVENT, false)]
                .map(|(kind, pause)| (kind, hover_listener(Rc::downgrade(&state), pause))),
        )?;
        state.borrow_mut().hover_listeners = hover_listeners;

        arm(&state);
        debug!(element = %document.describe(element), delay = %close_delay, "toast mounted");

        Ok(Self { state })
    }

    pub fn is_dismissed(&self) -> bool {
        self.state.borrow().dismissed
    }

    pub fn is_paused(&self) -> bool {
        let state = self.state.borrow();
        !state.dismissed && !state.destroyed && state.timer.is_none()
    }

    pub fn destroy(&self) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.destroyed = true;
        if let Some(timer) = state.timer.take() {
            timer.cancel();
        }
        state.release_listeners();
    }
}

impl Drop for Toast {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl Hook for Toast {
    fn kind(&self) -> HookKind {
        HookKind::Toast
    }

    fn destroyed(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
#[path = "tests/toast_tests.rs"]
mod tests;
