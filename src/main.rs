//! Main module for the Gaydar page using Yew.
//! Wires the session controller to the view, timers, browser glue and effects.

use gaydar::{RandomSource, Session};
use rand::rngs::ThreadRng;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod browser;
mod components;
mod config;
mod effects;
mod hooks;
mod logging;

use browser::BrowserUrls;
use components::{
    render_analyzing_notice, AnalyzeButton, ResultPanel, UploadZone, WelcomeOverlay,
};
use config::{APP_TITLE, LOG_LEVEL};
use effects::ConfettiCanvas;
use hooks::{use_cursor_overlay, use_timer_slot, use_window_size, TimerSlot};

type SharedSession = Rc<RefCell<Session>>;
type SharedSource = Rc<RefCell<RandomSource<ThreadRng>>>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Arm the analysis timer; on completion arm the celebration auto-stop.
fn schedule_analysis(
    session: &SharedSession,
    source: &SharedSource,
    analysis_timer: &TimerSlot,
    celebration_timer: &TimerSlot,
    redraw: &UseForceUpdateHandle,
) {
    let Some(pending) = session
        .borrow_mut()
        .start_analysis(&mut *source.borrow_mut())
    else {
        return;
    };

    let session = session.clone();
    let source = source.clone();
    let celebration_timer = celebration_timer.clone();
    let redraw = redraw.clone();
    analysis_timer.schedule(pending.delay_ms, move || {
        let celebration = session
            .borrow_mut()
            .complete_analysis(pending.ticket, &mut *source.borrow_mut());
        if let Some(celebration) = celebration {
            let session = session.clone();
            let redraw_after = redraw.clone();
            celebration_timer.schedule(celebration.duration_ms, move || {
                if session.borrow_mut().end_celebration(celebration.ticket) {
                    redraw_after.force_update();
                }
            });
        }
        redraw.force_update();
    });
}

#[function_component(Main)]
fn main_component() -> Html {
    let session: SharedSession = use_mut_ref(Session::new);
    let source: SharedSource = use_mut_ref(RandomSource::from_entropy);
    let redraw = use_force_update();
    let analysis_timer = use_timer_slot();
    let celebration_timer = use_timer_slot();
    let file_input = use_node_ref();
    let (width, height) = use_window_size();
    use_cursor_overlay();

    // Release the object URL when the view goes away
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            move || session.borrow_mut().reset(&mut BrowserUrls)
        });
    }

    let on_dismiss = {
        let session = session.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            session.borrow_mut().dismiss_welcome();
            redraw.force_update();
        })
    };

    let on_file_change = {
        let session = session.clone();
        let analysis_timer = analysis_timer.clone();
        let celebration_timer = celebration_timer.clone();
        let redraw = redraw.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = browser::first_file(&input) else {
                return;
            };
            let outcome = session.borrow_mut().select_image(
                &file.name(),
                &file.type_(),
                &file,
                &mut BrowserUrls,
            );
            match outcome {
                Ok(()) => {
                    analysis_timer.cancel();
                    celebration_timer.cancel();
                    redraw.force_update();
                }
                Err(err) => browser::alert(&err.to_string()),
            }
        })
    };

    let on_analyze = {
        let session = session.clone();
        let source = source.clone();
        let analysis_timer = analysis_timer.clone();
        let celebration_timer = celebration_timer.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            schedule_analysis(
                &session,
                &source,
                &analysis_timer,
                &celebration_timer,
                &redraw,
            );
            redraw.force_update();
        })
    };

    let on_reset = {
        let session = session.clone();
        let file_input = file_input.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            analysis_timer.cancel();
            celebration_timer.cancel();
            session.borrow_mut().reset(&mut BrowserUrls);
            if let Some(input) = file_input.cast::<HtmlInputElement>() {
                input.set_value("");
            }
            redraw.force_update();
        })
    };

    let (phase, image_url, welcome_dismissed, celebrating, loading, result) = {
        let state = session.borrow();
        (
            state.phase(),
            state.image().map(|image| AttrValue::from(image.url.clone())),
            state.welcome_dismissed(),
            state.is_celebrating(),
            state.is_loading(),
            state.result(),
        )
    };

    html! {
        <div class="page">
            if !welcome_dismissed {
                <WelcomeOverlay {on_dismiss} />
            }

            <ConfettiCanvas active={celebrating} {width} {height} />

            <main class="card">
                <h1 class="app-title">{ APP_TITLE }</h1>

                <UploadZone {image_url} input_ref={file_input} onchange={on_file_change} />

                <AnalyzeButton {phase} onclick={on_analyze} />

                if loading {
                    { render_analyzing_notice() }
                }

                if let Some(level) = result {
                    <ResultPanel {level} {on_reset} />
                }
            </main>
        </div>
    }
}

/// Entry point: installs logging and the panic hook, then renders the page.
fn main() {
    console_error_panic_hook::set_once();
    logging::init(LOG_LEVEL);
    log::info!("Starting {}", APP_TITLE);
    yew::Renderer::<Main>::new().render();
}
