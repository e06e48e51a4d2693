//! Decorative effects: the pink cursor overlay and the confetti canvas.
//!
//! Both are scoped to the component that owns them. The cursor overlay is an
//! RAII guard that restores the page on drop, and the confetti frame loop is
//! cancelled by the effect cleanup of its component.

use crate::config::{
    CURSOR_CLASS, CURSOR_COLOR, CURSOR_PRESSED_SCALE, CURSOR_SIZE_PX, CURSOR_Z_INDEX,
};
use gaydar::confetti::{ConfettiBurst, ConfettiConfig, FRAME_MS};
use gloo_events::EventListener;
use gloo_render::{request_animation_frame, AnimationFrame};
use log::{debug, warn};
use rand::rngs::ThreadRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlElement, MouseEvent};
use yew::prelude::*;

// ──────────────────────────────────────────────────────────────────────────────
// Cursor overlay

/// CSS transform placing the cursor circle centred on the pointer.
pub fn cursor_transform(x: i32, y: i32, pressed: bool) -> String {
    let half = CURSOR_SIZE_PX / 2;
    let scale = if pressed { CURSOR_PRESSED_SCALE } else { 1.0 };
    format!("translate({}px, {}px) scale({})", x - half, y - half, scale)
}

#[derive(Clone)]
struct CursorState {
    element: HtmlElement,
    position: Rc<Cell<(i32, i32)>>,
    pressed: Rc<Cell<bool>>,
}

impl CursorState {
    fn place(&self) {
        let (x, y) = self.position.get();
        let transform = cursor_transform(x, y, self.pressed.get());
        if let Err(err) = self.element.style().set_property("transform", &transform) {
            debug!("Cursor transform update failed: {:?}", err);
        }
    }
}

/// Custom cursor following the pointer while the guard is alive.
pub struct CursorOverlay {
    element: HtmlElement,
    body: HtmlElement,
    previous_cursor: String,
    _listeners: Vec<EventListener>,
}

impl CursorOverlay {
    pub fn mount() -> Result<Self, JsValue> {
        let document = gloo_utils::document();
        let body = gloo_utils::body();

        let element: HtmlElement = document
            .create_element("div")?
            .dyn_into()
            .map_err(JsValue::from)?;
        element.set_class_name(CURSOR_CLASS);
        let size = format!("{}px", CURSOR_SIZE_PX);
        let style = element.style();
        for (name, value) in [
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", size.as_str()),
            ("height", size.as_str()),
            ("border-radius", "50%"),
            ("background", CURSOR_COLOR),
            ("pointer-events", "none"),
            ("z-index", CURSOR_Z_INDEX),
            ("transition", "transform 0.08s ease-out"),
        ] {
            style.set_property(name, value)?;
        }
        body.append_child(&element)?;

        let previous_cursor = body.style().get_property_value("cursor")?;
        body.style().set_property("cursor", "none")?;

        let state = CursorState {
            element: element.clone(),
            position: Rc::new(Cell::new((-CURSOR_SIZE_PX, -CURSOR_SIZE_PX))),
            pressed: Rc::new(Cell::new(false)),
        };
        state.place();

        let window = gloo_utils::window();
        let on_move = {
            let state = state.clone();
            EventListener::new(&window, "mousemove", move |event: &Event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    state.position.set((event.client_x(), event.client_y()));
                    state.place();
                }
            })
        };
        let on_down = {
            let state = state.clone();
            EventListener::new(&window, "mousedown", move |_| {
                state.pressed.set(true);
                state.place();
            })
        };
        let on_up = EventListener::new(&window, "mouseup", move |_| {
            state.pressed.set(false);
            state.place();
        });

        debug!("Cursor overlay mounted");
        Ok(Self {
            element,
            body,
            previous_cursor,
            _listeners: vec![on_move, on_down, on_up],
        })
    }
}

impl Drop for CursorOverlay {
    fn drop(&mut self) {
        self.element.remove();
        let restored = if self.previous_cursor.is_empty() {
            self.body.style().remove_property("cursor").map(|_| ())
        } else {
            self.body.style().set_property("cursor", &self.previous_cursor)
        };
        if let Err(err) = restored {
            warn!("Could not restore the default cursor: {:?}", err);
        }
        debug!("Cursor overlay removed");
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Confetti canvas

struct ConfettiAnimation {
    burst: ConfettiBurst<ThreadRng>,
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    last_timestamp: Option<f64>,
    frame: Option<AnimationFrame>,
}

type SharedAnimation = Rc<RefCell<ConfettiAnimation>>;

impl ConfettiAnimation {
    /// Step and draw one frame; returns false once the burst is over.
    fn advance(&mut self, timestamp: f64) -> bool {
        let dt = self
            .last_timestamp
            .map(|last| timestamp - last)
            .unwrap_or(FRAME_MS);
        self.last_timestamp = Some(timestamp);
        self.burst.step(dt);
        self.draw();
        !self.burst.is_finished()
    }

    fn draw(&self) {
        let ctx = &self.context;
        ctx.clear_rect(0.0, 0.0, self.width, self.height);
        for p in self.burst.particles() {
            ctx.save();
            let placed = ctx.translate(p.x, p.y).and_then(|_| ctx.rotate(p.angle));
            if placed.is_ok() {
                ctx.set_fill_style_str(p.color);
                ctx.fill_rect(-p.width / 2.0, -p.height / 2.0, p.width, p.height);
            }
            ctx.restore();
        }
    }
}

fn start_animation(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Option<SharedAnimation> {
    let context = match canvas.get_context("2d") {
        Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok()?,
        Ok(None) | Err(_) => {
            warn!("2d canvas context unavailable, skipping confetti");
            return None;
        }
    };
    let burst = match ConfettiBurst::new(
        ConfettiConfig::default(),
        width as f64,
        height as f64,
        rand::rng(),
    ) {
        Ok(burst) => burst,
        Err(err) => {
            warn!("Confetti not started: {}", err);
            return None;
        }
    };

    let animation = Rc::new(RefCell::new(ConfettiAnimation {
        burst,
        context,
        width: width as f64,
        height: height as f64,
        last_timestamp: None,
        frame: None,
    }));
    schedule_frame(&animation);
    Some(animation)
}

fn schedule_frame(animation: &SharedAnimation) {
    let next = animation.clone();
    let handle = request_animation_frame(move |timestamp| {
        let running = next.borrow_mut().advance(timestamp);
        if running {
            schedule_frame(&next);
        } else {
            next.borrow_mut().frame.take();
        }
    });
    animation.borrow_mut().frame = Some(handle);
}

fn stop_animation(animation: &SharedAnimation) {
    let mut anim = animation.borrow_mut();
    anim.frame.take();
    anim.context.clear_rect(0.0, 0.0, anim.width, anim.height);
}

#[derive(Properties, PartialEq)]
pub struct ConfettiCanvasProps {
    pub active: bool,
    pub width: u32,
    pub height: u32,
}

/// Full-screen confetti layer, animating while `active` is set.
#[function_component(ConfettiCanvas)]
pub fn confetti_canvas(props: &ConfettiCanvasProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        let (width, height) = (props.width, props.height);
        use_effect_with(props.active, move |&active| {
            let animation = if active {
                canvas_ref
                    .cast::<HtmlCanvasElement>()
                    .and_then(|canvas| start_animation(&canvas, width, height))
            } else {
                None
            };
            move || {
                if let Some(animation) = animation {
                    stop_animation(&animation);
                }
            }
        });
    }

    if !props.active {
        return html! {};
    }

    html! {
        <div class="confetti-layer">
            <canvas ref={canvas_ref}
                width={props.width.to_string()}
                height={props.height.to_string()}
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_centred_on_pointer() {
        assert_eq!(
            cursor_transform(100, 50, false),
            "translate(80px, 30px) scale(1)"
        );
    }

    #[test]
    fn pressed_cursor_shrinks() {
        assert_eq!(
            cursor_transform(20, 20, true),
            "translate(0px, 0px) scale(0.6)"
        );
    }
}
