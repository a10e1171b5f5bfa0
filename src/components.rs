//! Pure Yew view components for the prize wheel UI.
//!
//! These render from props only; all wheel state lives in the controller
//! owned by the main component.

use prize_wheel::config::DEFAULT_FORM_COLOR;
use prize_wheel::{Segment, SpinResult};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SpinButtonProps {
    pub enabled: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(SpinButton)]
pub fn spin_button(props: &SpinButtonProps) -> Html {
    html! {
        <button id="spinBtn" class="spin-btn" type="button"
            disabled={!props.enabled}
            onclick={props.onclick.clone()}>
            { "SPIN" }
        </button>
    }
}

/// Countdown text; gets the `running` class while it shows anything.
#[derive(Properties, PartialEq)]
pub struct CountdownProps {
    pub id: AttrValue,
    pub text: AttrValue,
}

#[function_component(CountdownDisplay)]
pub fn countdown_display(props: &CountdownProps) -> Html {
    let running = !props.text.is_empty();
    html! {
        <div id={props.id.clone()} class={classes!("countdown", running.then_some("running"))}>
            { props.text.clone() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultDisplayProps {
    pub result: Option<SpinResult>,
}

#[function_component(ResultDisplay)]
pub fn result_display(props: &ResultDisplayProps) -> Html {
    let text = props
        .result
        .as_ref()
        .map(|r| format!("You won: {}", r.label))
        .unwrap_or_default();
    html! { <div id="result" class="result">{ text }</div> }
}

/// Prize list with a remove button per entry.
#[derive(Properties, PartialEq)]
pub struct PrizeListProps {
    pub segments: Vec<Segment>,
    pub enabled: bool,
    pub on_remove: Callback<usize>,
}

#[function_component(PrizeList)]
pub fn prize_list(props: &PrizeListProps) -> Html {
    html! {
        <ul id="prizeList" class="prize-list">
            { props.segments.iter().enumerate().map(|(i, seg)| {
                let on_remove = props.on_remove.clone();
                html! {
                    <li class="prize-item" key={i}>
                        <span class="prize-color" style={format!("background: {}", seg.color)}></span>
                        <span>{ seg.label.clone() }</span>
                        <button class="prize-remove" type="button" title="Remove prize"
                            disabled={!props.enabled}
                            onclick={Callback::from(move |_| on_remove.emit(i))}>
                            { "✕" }
                        </button>
                    </li>
                }
            }).collect::<Html>() }
        </ul>
    }
}

/// Add-prize form: label text plus color picker.
///
/// Emits `(label, color)` on submit. The label field is cleared and
/// refocused afterwards; validation happens in the controller.
#[derive(Properties, PartialEq)]
pub struct PrizeFormProps {
    pub enabled: bool,
    pub on_add: Callback<(String, String)>,
}

#[function_component(PrizeForm)]
pub fn prize_form(props: &PrizeFormProps) -> Html {
    let label = use_state(String::new);
    let color = use_state(|| DEFAULT_FORM_COLOR.to_string());
    let label_ref = use_node_ref();

    let on_label_input = {
        let label = label.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            label.set(input.value());
        })
    };
    let on_color_input = {
        let color = color.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            color.set(input.value());
        })
    };

    let onsubmit = {
        let label = label.clone();
        let color = color.clone();
        let label_ref = label_ref.clone();
        let on_add = props.on_add.clone();
        let enabled = props.enabled;
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !enabled || label.trim().is_empty() {
                return;
            }
            on_add.emit(((*label).clone(), (*color).clone()));
            label.set(String::new());
            if let Some(input) = label_ref.cast::<HtmlInputElement>() {
                let _ = input.focus();
            }
        })
    };

    html! {
        <form id="prizeForm" class="prize-form" {onsubmit}>
            <input id="prizeLabel" type="text" placeholder="Prize label"
                ref={label_ref}
                value={(*label).clone()}
                oninput={on_label_input} />
            <input id="prizeColor" type="color"
                value={(*color).clone()}
                oninput={on_color_input} />
            <button type="submit" disabled={!props.enabled}>{ "Add" }</button>
        </form>
    }
}
