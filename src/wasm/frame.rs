use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::Window;

use crate::error::PipelineError;
use crate::schedule::{FrameScheduler, FrameTick, FrameToken};

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Book-keeping for one `requestAnimationFrame` chain.
struct AnimationLoop {
    cancelled: Rc<Cell<bool>>,
    request_id: Rc<Cell<i32>>,
    closure: FrameClosure,
}

/// `requestAnimationFrame`-driven [`FrameScheduler`].
pub struct AnimationFrameScheduler {
    window: Window,
    next_token: Cell<u64>,
    loops: RefCell<HashMap<FrameToken, AnimationLoop>>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_token: Cell::new(1),
            loops: RefCell::new(HashMap::new()),
        }
    }

    /// Drops loops that stopped themselves after a failed reschedule.
    fn reclaim_stopped(&self) {
        let stopped: Vec<AnimationLoop> = {
            let mut loops = self.loops.borrow_mut();
            let tokens: Vec<FrameToken> = loops
                .iter()
                .filter(|(_, animation)| animation.cancelled.get())
                .map(|(token, _)| *token)
                .collect();
            tokens
                .into_iter()
                .filter_map(|token| loops.remove(&token))
                .collect()
        };
        for animation in stopped {
            animation.closure.borrow_mut().take();
        }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn start(&self, mut tick: FrameTick) -> Result<FrameToken, PipelineError> {
        self.reclaim_stopped();

        let token = FrameToken::new(self.next_token.get());
        self.next_token.set(token.raw() + 1);

        let cancelled = Rc::new(Cell::new(false));
        let request_id = Rc::new(Cell::new(0));

        // `f` holds the frame closure so it can re-request itself; the cycle
        // is broken in `cancel` by taking the closure back out.
        let f: FrameClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        let window = self.window.clone();
        let frame_cancelled = cancelled.clone();
        let frame_request_id = request_id.clone();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp_ms: f64| {
            if frame_cancelled.get() {
                return;
            }
            tick(timestamp_ms);

            // schedule next
            let next = f
                .borrow()
                .as_ref()
                .ok_or_else(|| JsValue::from_str("frame closure released"))
                .and_then(|closure| {
                    window.request_animation_frame(closure.as_ref().unchecked_ref())
                });
            match next {
                Ok(id) => frame_request_id.set(id),
                Err(err) => {
                    // The closure can't release itself while running; the
                    // scheduler reclaims it on its next start or cancel.
                    frame_cancelled.set(true);
                    log::error!("failed to reschedule frame, loop stopped: {err:?}");
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let first = g
            .borrow()
            .as_ref()
            .map(|closure| self.window.request_animation_frame(closure.as_ref().unchecked_ref()));
        match first {
            Some(Ok(id)) => request_id.set(id),
            Some(Err(err)) => {
                g.borrow_mut().take();
                return Err(PipelineError::FrameScheduleFailed(format!("{err:?}")));
            }
            None => {
                return Err(PipelineError::FrameScheduleFailed(
                    "frame closure missing".to_string(),
                ))
            }
        }

        self.loops.borrow_mut().insert(
            token,
            AnimationLoop {
                cancelled,
                request_id,
                closure: g,
            },
        );
        Ok(token)
    }

    fn cancel(&self, token: FrameToken) {
        self.reclaim_stopped();
        let Some(animation) = self.loops.borrow_mut().remove(&token) else {
            return;
        };
        animation.cancelled.set(true);
        if let Err(err) = self.window.cancel_animation_frame(animation.request_id.get()) {
            log::warn!("cancelAnimationFrame failed: {err:?}");
        }
        animation.closure.borrow_mut().take();
    }

    fn is_active(&self, token: FrameToken) -> bool {
        self.loops
            .borrow()
            .get(&token)
            .is_some_and(|animation| !animation.cancelled.get())
    }
}

impl Drop for AnimationFrameScheduler {
    fn drop(&mut self) {
        let tokens: Vec<FrameToken> = self.loops.borrow().keys().copied().collect();
        for token in tokens {
            self.cancel(token);
        }
    }
}
