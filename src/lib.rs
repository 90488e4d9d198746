// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
pub use web::start;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
    use web_sys::{Document, Event, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

    use crate::config::DemoConfig;
    use crate::controller::input::wasm::{mouse_click_to_input, mouse_move_to_input, mouse_wheel_to_input};
    use crate::controller::{Demo, FrameUpdater, InputEvent, TickStatus};
    use crate::error::DemoError;
    use crate::model::{Clock, SystemClock};
    use crate::ui::{self, UiInput};
    use crate::view::{GpuContext, Renderer};
    use crate::logging;

    /// Everything the animation frame and the DOM listeners share.
    struct WebApp {
        demo: Demo,
        renderer: Renderer,
        updater: FrameUpdater<SystemClock>,
        egui_ctx: egui::Context,
        ui_input: UiInput,
        /// CSS to physical pixels.
        scale: f32,
    }

    impl WebApp {
        fn frame(&mut self) -> TickStatus {
            let (width, height) = self.demo.size();
            let time = self.updater.clock().elapsed_secs() as f64;
            let raw_input = self.ui_input.take_raw_input(width, height, time);
            let (overlay, _) = ui::run_ui(&self.egui_ctx, raw_input, &mut self.demo);
            self.renderer.set_overlay(overlay);
            self.updater.tick(&mut self.demo, &mut self.renderer)
        }

        /// The panel sees every pointer event; the orbit controls only those
        /// the panel does not claim. Releases always reach the controls so a
        /// drag cannot get stuck.
        fn pointer(&mut self, event: InputEvent) {
            self.ui_input.push(&event);
            let release = matches!(
                event,
                InputEvent::PointerButton { pressed: false, .. } | InputEvent::FocusLost
            );
            if release || self.demo.input.is_dragging() || !ui::wants_pointer(&self.egui_ctx) {
                self.demo.handle_input(&event);
            }
        }

        fn resize(&mut self, window: &Window, canvas: &HtmlCanvasElement) {
            let (width, height, scale) = viewport_size(window);
            fit_canvas(canvas, width, height, scale);
            self.scale = scale;
            self.ui_input.set_pixels_per_point(scale);
            self.demo.resize(width, height, &mut self.renderer);
        }
    }

    #[wasm_bindgen(start)]
    pub async fn start() -> Result<(), JsValue> {
        logging::init();

        let config = DemoConfig::default();
        let (window, document, canvas) = find_canvas(&config.canvas_selector)?;
        setup_app(window, document, canvas, config).await
    }

    /// Main application setup for WASM
    async fn setup_app(
        window: Window,
        document: Document,
        canvas: HtmlCanvasElement,
        config: DemoConfig,
    ) -> Result<(), JsValue> {
        let (width, height, scale) = viewport_size(&window);
        fit_canvas(&canvas, width, height, scale);
        let config = config.with_size(width, height);

        let gpu = GpuContext::new(&canvas, width, height).await.map_err(js_error)?;
        let demo = Demo::new(&config);
        let renderer = Renderer::new(gpu, &demo.scene, config.shadow_map_size, config.clear_wgpu_color());
        tracing::info!(width, height, scale, "demo started");

        let app = Rc::new(RefCell::new(WebApp {
            demo,
            renderer,
            updater: FrameUpdater::new(SystemClock::start()),
            egui_ctx: egui::Context::default(),
            ui_input: UiInput::new(scale),
            scale,
        }));

        setup_listeners(&window, &document, &canvas, app.clone())?;

        start_animation_loop(window, move || app.borrow_mut().frame())
    }

    /// Pointer, wheel and resize listeners feeding the shared app.
    fn setup_listeners(
        window: &Window,
        document: &Document,
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<WebApp>>,
    ) -> Result<(), JsValue> {
        // Mouse move, tracked on the document so drags continue off canvas
        {
            let app = app.clone();
            let mousemove = Closure::wrap(Box::new(move |e: MouseEvent| {
                let mut app = app.borrow_mut();
                let event = mouse_move_to_input(&e, app.scale);
                app.pointer(event);
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
            mousemove.forget();
        }

        // Mouse down, only on the canvas
        {
            let app = app.clone();
            let mousedown = Closure::wrap(Box::new(move |e: MouseEvent| {
                let mut app = app.borrow_mut();
                let event = mouse_click_to_input(&e, true, app.scale);
                app.pointer(event);
                e.prevent_default();
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
            mousedown.forget();
        }

        // Mouse up anywhere ends a drag
        {
            let app = app.clone();
            let mouseup = Closure::wrap(Box::new(move |e: MouseEvent| {
                let mut app = app.borrow_mut();
                let event = mouse_click_to_input(&e, false, app.scale);
                app.pointer(event);
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
            mouseup.forget();
        }

        // Wheel zoom
        {
            let app = app.clone();
            let wheel = Closure::wrap(Box::new(move |e: WheelEvent| {
                let mut app = app.borrow_mut();
                if !ui::wants_pointer(&app.egui_ctx) {
                    app.demo.handle_input(&mouse_wheel_to_input(&e));
                    e.prevent_default();
                }
            }) as Box<dyn FnMut(WheelEvent)>);
            canvas.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
            wheel.forget();
        }

        // Right drag pans, keep the context menu away
        {
            let contextmenu = Closure::wrap(Box::new(move |e: MouseEvent| {
                e.prevent_default();
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas.add_event_listener_with_callback("contextmenu", contextmenu.as_ref().unchecked_ref())?;
            contextmenu.forget();
        }

        // Focus loss drops any drag in progress
        {
            let app = app.clone();
            let blur = Closure::wrap(Box::new(move |_e: Event| {
                app.borrow_mut().pointer(InputEvent::FocusLost);
            }) as Box<dyn FnMut(Event)>);
            window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
            blur.forget();
        }

        // Viewport resize
        {
            let window_for_resize = window.clone();
            let canvas = canvas.clone();
            let resize = Closure::wrap(Box::new(move |_e: Event| {
                app.borrow_mut().resize(&window_for_resize, &canvas);
            }) as Box<dyn FnMut(Event)>);
            window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
            resize.forget();
        }

        Ok(())
    }

    /// Drive `tick` from requestAnimationFrame until it reports
    /// [`TickStatus::Stopped`].
    fn start_animation_loop(window: Window, mut tick: impl FnMut() -> TickStatus + 'static) -> Result<(), JsValue> {
        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
        let callback_clone = callback.clone();
        let window_for_loop = window.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if tick() == TickStatus::Stopped {
                tracing::info!("frame loop stopped");
                return;
            }

            // Schedule the next frame
            if let Some(cb) = callback_clone.borrow().as_ref() {
                if let Err(e) = window_for_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    tracing::error!("requestAnimationFrame failed: {e:?}");
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = callback.borrow().as_ref() {
            window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        }
        // the closure holds a clone of `callback`, which keeps it alive
        Ok(())
    }

    fn find_canvas(selector: &str) -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error(DemoError::Platform("no global `window`".into())))?;
        let document = window
            .document()
            .ok_or_else(|| js_error(DemoError::Platform("no document on window".into())))?;
        let canvas = document
            .query_selector(selector)?
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| js_error(DemoError::CanvasNotFound(selector.to_string())))?;
        Ok((window, document, canvas))
    }

    /// Window inner size in physical pixels, and the device pixel ratio.
    fn viewport_size(window: &Window) -> (u32, u32, f32) {
        let scale = window.device_pixel_ratio();
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let css = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let width = (css(window.inner_width()) * scale).round() as u32;
        let height = (css(window.inner_height()) * scale).round() as u32;
        (width, height, scale as f32)
    }

    /// Size the drawing buffer in physical pixels and the element in CSS pixels.
    fn fit_canvas(canvas: &HtmlCanvasElement, width: u32, height: u32, scale: f32) {
        if width == 0 || height == 0 {
            return;
        }
        canvas.set_width(width);
        canvas.set_height(height);
        let style = canvas.style();
        for (property, pixels) in [("width", width), ("height", height)] {
            if let Err(e) = style.set_property(property, &format!("{}px", pixels as f32 / scale)) {
                tracing::warn!("failed to set canvas {property}: {e:?}");
            }
        }
    }

    fn js_error(e: DemoError) -> JsValue {
        tracing::error!("{e}");
        JsValue::from_str(&e.to_string())
    }
}
