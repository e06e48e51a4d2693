//! Pure Yew view components for the Gaydar page.
//!
//! These render from props only; all state lives in the session controller
//! owned by the root component.

use crate::config::*;
use gaydar::Phase;
use yew::prelude::*;

/// Text and percentage shown once a level is generated.
pub fn format_level(level: u8) -> String {
    format!("{}%", level)
}

#[derive(Properties, PartialEq)]
pub struct WelcomeOverlayProps {
    pub on_dismiss: Callback<MouseEvent>,
}

#[function_component(WelcomeOverlay)]
pub fn welcome_overlay(props: &WelcomeOverlayProps) -> Html {
    html! {
        <div class="welcome-backdrop">
            <div class="welcome-card">
                <h1 class="welcome-title">{ WELCOME_HEADING }</h1>
                <p class="welcome-tagline">{ WELCOME_TAGLINE }</p>
                <button class="btn-primary" onclick={props.on_dismiss.clone()}>
                    { WELCOME_BUTTON }
                </button>
            </div>
        </div>
    }
}

/// Upload zone: preview of the selected image or the upload prompt, wrapping
/// a hidden file input.
#[derive(Properties, PartialEq)]
pub struct UploadZoneProps {
    pub image_url: Option<AttrValue>,
    pub input_ref: NodeRef,
    pub onchange: Callback<Event>,
}

#[function_component(UploadZone)]
pub fn upload_zone(props: &UploadZoneProps) -> Html {
    html! {
        <div class="upload-wrapper">
            <label class="upload-zone">
                <div class="upload-content">
                    if let Some(url) = &props.image_url {
                        <img class="upload-preview" src={url.clone()} alt="Uploaded" width="200" height="200" />
                    } else {
                        { render_upload_prompt() }
                    }
                </div>
                <input ref={props.input_ref.clone()}
                    type="file"
                    class="hidden"
                    accept={ACCEPTED_MIME}
                    onchange={props.onchange.clone()}
                />
            </label>
        </div>
    }
}

fn render_upload_prompt() -> Html {
    html! {
        <>
            <svg class="upload-icon" aria-hidden="true" xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 20 16">
                <path stroke="currentColor" stroke-linecap="round" stroke-linejoin="round" stroke-width="2"
                    d="M13 13h3a3 3 0 0 0 0-6h-.025A5.56 5.56 0 0 0 16 6.5 5.5 5.5 0 0 0 5.207 5.021C5.137 5.017 5.071 5 5 5a4 4 0 0 0 0 8h2.167M10 15V6m0 0L8 8m2-2 2 2" />
            </svg>
            <p class="upload-prompt">
                <span class="upload-prompt-strong">{ UPLOAD_PROMPT_BOLD }</span>
                { UPLOAD_PROMPT_REST }
            </p>
        </>
    }
}

/// The main action button; label and enabled state come from the phase.
#[derive(Properties, PartialEq)]
pub struct AnalyzeButtonProps {
    pub phase: Phase,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(AnalyzeButton)]
pub fn analyze_button(props: &AnalyzeButtonProps) -> Html {
    let button = props.phase.action_button();
    let class = if button.enabled {
        "btn-analyze enabled"
    } else {
        "btn-analyze disabled"
    };

    html! {
        <button {class} disabled={!button.enabled} onclick={props.onclick.clone()}>
            if props.phase == Phase::Analyzing {
                <div class="spinner-row">
                    <div class="spinner" />
                    <span>{ button.label }</span>
                </div>
            } else {
                { button.label }
            }
        </button>
    }
}

pub fn render_analyzing_notice() -> Html {
    html! {
        <div class="analyzing-notice">
            <p class="analyzing-message">{ ANALYZING_MESSAGE }</p>
            <p class="analyzing-hint">{ ANALYZING_HINT }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultPanelProps {
    pub level: u8,
    pub on_reset: Callback<MouseEvent>,
}

#[function_component(ResultPanel)]
pub fn result_panel(props: &ResultPanelProps) -> Html {
    html! {
        <div class="result-panel">
            <h2 class="result-heading">{ RESULT_HEADING }</h2>
            <p class="result-level">{ format_level(props.level) }</p>
            <button class="btn-secondary" onclick={props.on_reset.clone()}>
                { RESET_BUTTON }
            </button>
        </div>
    }
}
