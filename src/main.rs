//! Main module for the Prize Wheel application using Yew.
//! Owns the wheel controller and wires canvas, audio and the frame loop to
//! the view components.

use gloo_events::EventListener;
use log::{debug, info};
use prize_wheel::audio::WebAudio;
use prize_wheel::config::WheelConfig;
use prize_wheel::controller::SpinEvent;
use prize_wheel::render::redraw_canvas;
use prize_wheel::{LocalStore, WheelController};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

mod components;
mod hooks;

use components::{CountdownDisplay, PrizeForm, PrizeList, ResultDisplay, SpinButton};
use hooks::{now_ms, use_frame_loop};

type Controller = Rc<RefCell<WheelController<LocalStore>>>;

/// What the view shows. Compared after every frame to skip needless renders.
#[derive(Clone, PartialEq)]
struct ViewSnapshot {
    rotation: f64,
    spin_text: String,
    lockout_text: String,
    enabled: bool,
}

fn snapshot(controller: &Controller) -> ViewSnapshot {
    let c = controller.borrow();
    ViewSnapshot {
        rotation: c.rotation_deg(),
        spin_text: c.spin_countdown_text().to_string(),
        lockout_text: c.lockout_text().to_string(),
        enabled: c.controls_enabled(),
    }
}

/// Resize the canvas to its current CSS box and draw the wheel.
fn redraw(canvas_ref: &NodeRef, controller: &Controller) {
    if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
        let mut c = controller.borrow_mut();
        redraw_canvas(&canvas, c.display_segments());
    }
}

/// Primary component: owns the controller, the audio output and the frame loop.
#[function_component(Main)]
fn main_component() -> Html {
    let controller: Controller = use_mut_ref(|| {
        WheelController::initialize(LocalStore::new(), WheelConfig::default())
    });
    let audio = use_mut_ref(WebAudio::new);
    let canvas_ref = use_node_ref();
    let force_update = use_force_update();

    // Draw on mount and on every window resize; tear the controller down on unmount
    {
        let canvas_ref = canvas_ref.clone();
        let controller = controller.clone();
        use_effect_with((), move |_| {
            redraw(&canvas_ref, &controller);
            let listener = {
                let canvas_ref = canvas_ref.clone();
                let controller = controller.clone();
                EventListener::new(&gloo_utils::window(), "resize", move |_| {
                    redraw(&canvas_ref, &controller);
                })
            };
            move || {
                drop(listener);
                controller.borrow_mut().teardown();
            }
        });
    }

    let on_frame = {
        let controller = controller.clone();
        let audio = audio.clone();
        let force_update = force_update.clone();
        Callback::from(move |now: f64| -> bool {
            let before = snapshot(&controller);
            let events = controller.borrow_mut().update(now);
            for event in &events {
                match event {
                    SpinEvent::Play(tone) => audio.borrow().play(tone),
                    SpinEvent::Landed(result) => info!("You won: {}", result.label.trim()),
                    SpinEvent::LockoutStarted { duration_ms } => {
                        debug!("Lockout for {}ms", duration_ms)
                    }
                    SpinEvent::LockoutFinished => debug!("Controls unlocked"),
                    SpinEvent::SpinCountdownFinished => debug!("Spin countdown done"),
                }
            }
            if !events.is_empty() || snapshot(&controller) != before {
                force_update.force_update();
            }
            controller.borrow().needs_frames()
        })
    };
    let start_frames = use_frame_loop(on_frame);

    let on_spin = {
        let controller = controller.clone();
        let audio = audio.clone();
        let force_update = force_update.clone();
        let start_frames = start_frames.clone();
        Callback::from(move |_: MouseEvent| {
            // Audio can only start from a user gesture
            audio.borrow_mut().arm();
            let result = controller.borrow_mut().spin(now_ms());
            match result {
                Ok(_) => {
                    start_frames.emit(());
                    force_update.force_update();
                }
                Err(e) => debug!("Spin ignored: {}", e),
            }
        })
    };

    let on_add = {
        let controller = controller.clone();
        let canvas_ref = canvas_ref.clone();
        let force_update = force_update.clone();
        Callback::from(move |(label, color): (String, String)| {
            let result = controller.borrow_mut().add_prize(&label, &color);
            match result {
                Ok(()) => {
                    redraw(&canvas_ref, &controller);
                    force_update.force_update();
                }
                Err(e) => debug!("Prize not added: {}", e),
            }
        })
    };

    let on_remove = {
        let controller = controller.clone();
        let canvas_ref = canvas_ref.clone();
        let force_update = force_update.clone();
        Callback::from(move |index: usize| {
            let result = controller.borrow_mut().remove_prize(index);
            match result {
                Ok(removed) => {
                    info!("Removed prize {:?}", removed.label);
                    redraw(&canvas_ref, &controller);
                    force_update.force_update();
                }
                Err(e) => debug!("Prize not removed: {}", e),
            }
        })
    };

    let c = controller.borrow();
    let enabled = c.controls_enabled();
    let rotation_style = format!("transform: rotate({}deg)", c.rotation_deg());

    html! {
        <div class="app">
            <div class="wheel-area">
                <div class="pointer"></div>
                <canvas id="wheel" ref={canvas_ref} style={rotation_style}></canvas>
                <div class={classes!("center-controls", c.is_locked().then_some("locked"))}>
                    <SpinButton {enabled} onclick={on_spin} />
                    <CountdownDisplay id="countdown" text={c.spin_countdown_text().to_string()} />
                    <CountdownDisplay id="postTimeout" text={c.lockout_text().to_string()} />
                </div>
            </div>
            <ResultDisplay result={c.last_result().cloned()} />

            <div class="prize-editor">
                <h3>{ "Prizes" }</h3>
                <PrizeForm {enabled} on_add={on_add} />
                <PrizeList segments={c.segments().to_vec()} {enabled} on_remove={on_remove} />
            </div>
        </div>
    }
}

/// Entry point: sets up logging and the panic hook, then mounts the app.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<Main>::new().render();
}
