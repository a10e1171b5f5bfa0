use gloo_render::{request_animation_frame, AnimationFrame};
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

type FrameSlot = Rc<RefCell<Option<AnimationFrame>>>;

/// Current time on the same clock as animation frame timestamps.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Custom hook driving `on_frame` once per display refresh.
///
/// Returns a callback that starts the loop. The loop keeps going while
/// `on_frame` returns `true` and is cancelled when the component unmounts.
/// Starting an already running loop does nothing.
#[hook]
pub fn use_frame_loop(on_frame: Callback<f64, bool>) -> Callback<()> {
    let slot: FrameSlot = use_mut_ref(|| None);
    // Keep the latest callback so frames always see current state
    let latest = use_mut_ref(|| on_frame.clone());
    *latest.borrow_mut() = on_frame;

    {
        let slot = slot.clone();
        use_effect_with((), move |_| {
            move || {
                slot.borrow_mut().take();
            }
        });
    }

    Callback::from(move |_| {
        if slot.borrow().is_some() {
            return;
        }
        schedule(slot.clone(), latest.clone());
    })
}

fn schedule(slot: FrameSlot, on_frame: Rc<RefCell<Callback<f64, bool>>>) {
    let next = slot.clone();
    let handle = request_animation_frame(move |timestamp| {
        let callback = on_frame.borrow().clone();
        if callback.emit(timestamp) {
            schedule(next, on_frame);
        } else {
            next.borrow_mut().take();
        }
    });
    *slot.borrow_mut() = Some(handle);
}
