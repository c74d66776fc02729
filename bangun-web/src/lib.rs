//! Bangun Web - WebAssembly viewer for the solid shapes
//!
//! `BangunViewer` builds its canvas, menus and control panel inside a
//! container element and drives a `requestAnimationFrame` loop against the
//! shared scene.
//!
//! ```js
//! import init, { BangunViewer } from './pkg/bangun_web.js';
//!
//! await init();
//! const viewer = new BangunViewer('canvas-container');
//! viewer.selectShape('prisma');
//! viewer.selectVariant('prisma-segilima');
//! ```
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bangun_core::{GeometryPool, MenuController, NetLayout, SceneController, ShapeError, ViewerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod dom;
pub mod error;
pub mod renderer;

pub use dom::{Action, Ui};
pub use error::{Result, ViewerError};
pub use renderer::WebGlRenderer;

/// Initialize WASM module with panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("bangun viewer module loaded");
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Everything the event handlers and the frame loop share.
struct ViewerState {
    scene: SceneController,
    menu: MenuController,
    renderer: WebGlRenderer,
    ui: Ui,
}

impl ViewerState {
    fn dispatch(&mut self, action: Action) {
        let result = match action {
            Action::Shape(category) => self.menu.select_shape(category.label(), &mut self.scene).map(drop),
            Action::Variant(index) => {
                let tag = self
                    .menu
                    .submenu()
                    .and_then(|submenu| submenu.entries.get(index))
                    .map(|entry| entry.tag.clone());
                match tag {
                    Some(tag) => self.menu.select_variant(&tag, &mut self.scene).map(drop),
                    None => Ok(()),
                }
            }
            Action::ToggleNet => {
                self.scene.toggle_net();
                Ok(())
            }
        };
        self.settle(result.as_ref().err());
    }

    /// Free buffers of released geometry and refresh the DOM.
    fn settle(&mut self, error: Option<&ShapeError>) {
        self.renderer.release(self.scene.pool());
        self.ui.sync(&self.menu, &self.scene, error);
    }

    fn frame(&mut self) -> Result<()> {
        self.scene.tick();
        self.renderer.release(self.scene.pool());
        self.renderer.render(self.scene.group())
    }
}

/// The browser viewer.
///
/// Dropping it (`free()` from JS) removes its elements from the container
/// and stops the animation loop.
#[wasm_bindgen]
pub struct BangunViewer {
    state: Rc<RefCell<ViewerState>>,
}

#[wasm_bindgen]
impl BangunViewer {
    /// Build the viewer inside the element with id `container_id` using the
    /// default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str) -> std::result::Result<BangunViewer, JsValue> {
        Ok(Self::create(container_id, ViewerConfig::default())?)
    }

    /// Like `new`, with a JSON `ViewerConfig` overriding the defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(container_id: &str, config_json: &str) -> std::result::Result<BangunViewer, JsValue> {
        let config = ViewerConfig::from_json(config_json).map_err(ViewerError::from)?;
        Ok(Self::create(container_id, config)?)
    }

    #[wasm_bindgen(js_name = selectShape)]
    pub fn select_shape(&self, name: &str) -> std::result::Result<(), JsValue> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let result = state.menu.select_shape(name, &mut state.scene).map(drop);
        state.settle(result.as_ref().err());
        Ok(result.map_err(ViewerError::from)?)
    }

    #[wasm_bindgen(js_name = selectVariant)]
    pub fn select_variant(&self, tag: &str) -> std::result::Result<(), JsValue> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let result = state.menu.select_variant(tag, &mut state.scene).map(drop);
        state.settle(result.as_ref().err());
        Ok(result.map_err(ViewerError::from)?)
    }

    /// Flip the cube net; returns whether it is now open.
    #[wasm_bindgen(js_name = toggleNet)]
    pub fn toggle_net(&self) -> bool {
        let mut state = self.state.borrow_mut();
        let layout = state.scene.toggle_net();
        state.settle(None);
        layout == NetLayout::Open
    }
}

impl BangunViewer {
    fn create(container_id: &str, config: ViewerConfig) -> Result<Self> {
        let window = web_sys::window().ok_or(ViewerError::NoWindow)?;
        let document = window.document().ok_or(ViewerError::NoDocument)?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| ViewerError::MissingElement(container_id.to_string()))?;

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ViewerError::Create("canvas"))?;
        let width = container.client_width().max(1) as u32;
        let height = config.canvas_height;
        canvas.set_width(width);
        canvas.set_height(height);

        let gl = canvas
            .get_context("webgl2")?
            .ok_or(ViewerError::NoWebGl2)?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| ViewerError::NoWebGl2)?;

        let ui = Ui::build(&document, &container, &canvas)?;
        let renderer = WebGlRenderer::new(gl, &config, width, height)?;
        let scene = SceneController::new(GeometryPool::new(), &config);

        let state = Rc::new(RefCell::new(ViewerState {
            scene,
            menu: MenuController::new(),
            renderer,
            ui,
        }));

        let handle = Rc::downgrade(&state);
        state.borrow_mut().ui.bind(move |action| {
            if let Some(state) = handle.upgrade() {
                state.borrow_mut().dispatch(action);
            }
        })?;
        state.borrow_mut().settle(None);

        start_loop(Rc::downgrade(&state))?;
        tracing::info!(container_id, width, height, "viewer started");

        Ok(Self { state })
    }
}

/// Run `frame` on every animation frame until the viewer is dropped.
fn start_loop(state: Weak<RefCell<ViewerState>>) -> Result<()> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = callback.clone();

    *callback.borrow_mut() = Some(Closure::new(move || {
        let Some(state) = state.upgrade() else {
            tracing::debug!("viewer dropped, animation loop stopped");
            return;
        };
        if let Err(err) = state.borrow_mut().frame() {
            tracing::error!(%err, "frame failed, animation loop stopped");
            return;
        }
        if let Err(err) = request_frame(&next) {
            tracing::error!(%err, "could not schedule next frame");
        }
    }));

    request_frame(&callback)
}

fn request_frame(callback: &FrameCallback) -> Result<()> {
    let window = web_sys::window().ok_or(ViewerError::NoWindow)?;
    if let Some(closure) = callback.borrow().as_ref() {
        window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    }
    Ok(())
}
