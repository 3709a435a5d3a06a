//! Queue of [`DialogueEvent`]s between the driver and the egui frame loop.
//!
//! Single-threaded (WASM): the queue sits behind `Rc<RefCell<_>>` and every
//! clone publishes into the same buffer. A streaming turn produces one delta
//! per SSE chunk, so back-to-back `LlmDelta`s are merged while they wait for
//! the next frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use dialogue_types::event::DialogueEvent;

#[derive(Clone, Default)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<DialogueEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: DialogueEvent) {
        let mut queue = self.queue.borrow_mut();
        if let DialogueEvent::LlmDelta { token } = &event {
            if let Some(DialogueEvent::LlmDelta { token: tail }) = queue.back_mut() {
                tail.push_str(token);
                return;
            }
        }
        queue.push_back(event);
    }

    /// Everything published since the last frame, oldest first
    pub fn drain(&self) -> Vec<DialogueEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}
