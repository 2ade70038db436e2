//! Scooter CV entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

    use scooter_cv::consts::*;
    use scooter_cv::renderer::{SceneFrame, SdfRenderState};
    use scooter_cv::sim::{
        Command, Key, ModelManifest, SimContext, SimEvent, VehicleRig, ZoneId, apply_command,
        pixel_to_ndc, tick,
    };
    use scooter_cv::ui::UiDispatcher;
    use scooter_cv::ui::dom::DomSink;
    use scooter_cv::{AssetError, CvData, Settings};

    const MANIFEST_URL: &str = "assets/scooter_manifest.json";

    /// App instance holding all state
    struct App {
        ctx: SimContext,
        render_state: Option<SdfRenderState>,
        ui: UiDispatcher,
        sink: DomSink,
        /// Commands queued by DOM callbacks, applied at the start of a frame
        commands: Vec<Command>,
        accumulator: f32,
        last_time: f64,
    }

    impl App {
        fn push(&mut self, command: Command) {
            self.commands.push(command);
        }

        /// Apply queued commands, then run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            self.ctx.now_ms = time;
            for command in std::mem::take(&mut self.commands) {
                apply_command(&mut self.ctx, command);
            }

            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.ctx, time);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                // Drop the backlog instead of spiralling
                self.accumulator = 0.0;
            }

            let events = self.ctx.drain_events();
            if events.contains(&SimEvent::Ready) {
                hide_loading_screen();
            }
            self.ui.dispatch(&events, &mut self.sink);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                let frame = SceneFrame::build(
                    &self.ctx,
                    &self.ctx.settings,
                    render_state.size,
                    render_state.elapsed(time),
                );
                match render_state.render(&frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn page_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn hide_loading_screen() {
        if let Some(el) = page_document().and_then(|d| d.get_element_by_id("loading-screen")) {
            let _ = el.class_list().add_1("hidden");
        }
    }

    fn set_loading_text(text: &str) {
        if let Some(el) = page_document().and_then(|d| d.get_element_by_id("loading-text")) {
            el.set_text_content(Some(text));
        }
    }

    /// Fetch the model manifest and build the part rig
    async fn load_rig(url: &str) -> Result<VehicleRig, AssetError> {
        let fetch_err = |reason: String| AssetError::Fetch {
            url: url.to_string(),
            reason,
        };
        let window = web_sys::window().ok_or_else(|| fetch_err("no window".into()))?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| fetch_err(format!("{e:?}")))?
            .dyn_into()
            .map_err(|e| fetch_err(format!("not a response: {e:?}")))?;
        if !response.ok() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }
        let text = JsFuture::from(response.text().map_err(|e| fetch_err(format!("{e:?}")))?)
            .await
            .map_err(|e| fetch_err(format!("{e:?}")))?
            .as_string()
            .ok_or_else(|| fetch_err("body is not text".into()))?;

        let manifest = ModelManifest::from_json(&text)?;
        Ok(VehicleRig::from_manifest(&manifest))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Scooter CV starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let (width, height) = fit_canvas(&window, &canvas);

        let settings = Settings::load();
        let cv = match CvData::embedded() {
            Ok(cv) => cv,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let mut ctx = SimContext::new(settings, seed);
        ctx.camera.set_viewport(width, height);

        let app = Rc::new(RefCell::new(App {
            ctx,
            render_state: None,
            ui: UiDispatcher::new(cv),
            sink: DomSink::new(document.clone()),
            commands: Vec::new(),
            accumulator: 0.0,
            last_time: 0.0,
        }));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match init_renderer(&instance, &canvas, width, height).await {
            Ok(mut render_state) => {
                // Same clock as requestAnimationFrame timestamps
                render_state.set_start_time(window.performance().map_or(0.0, |p| p.now()));
                app.borrow_mut().render_state = Some(render_state);
            }
            Err(e) => {
                log::error!("Rendering disabled: {e}");
                set_loading_text("WebGPU is not available in this browser");
            }
        }

        setup_input_handlers(&canvas, app.clone());
        setup_page_controls(&document, app.clone());
        setup_resize(canvas.clone(), app.clone());

        // The one asynchronous load; the world starts either way
        {
            let app = app.clone();
            set_loading_text("Loading scooter...");
            wasm_bindgen_futures::spawn_local(async move {
                let rig = load_rig(MANIFEST_URL).await;
                app.borrow_mut().ctx.mark_ready(rig);
            });
        }

        request_animation_frame(app);

        log::info!("Scooter CV running!");
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<SdfRenderState, scooter_cv::RenderError> {
        use scooter_cv::RenderError;

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        SdfRenderState::new(surface, &adapter, width, height).await
    }

    /// Match the canvas backing store to its CSS size
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                if key.is_movement() {
                    event.prevent_default();
                }
                if key == Key::Escape && !pressed {
                    return;
                }
                app.borrow_mut().push(Command::KeyChanged { key, pressed });
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click a zone marker
        {
            let app = app.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_ref.get_bounding_client_rect();
                let ndc = pixel_to_ndc(
                    event.client_x() as f32 - rect.left() as f32,
                    event.client_y() as f32 - rect.top() as f32,
                    rect.width() as f32,
                    rect.height() as f32,
                );
                let mut a = app.borrow_mut();
                if let Some(zone) = a.ctx.pick(ndc) {
                    a.push(Command::ZonePicked(zone));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel zoom; the panel keeps the wheel while it's open
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                let mut a = app.borrow_mut();
                if a.ctx.modal.is_open() {
                    return;
                }
                event.prevent_default();
                a.push(Command::ZoomDelta(event.delta_y().signum() as f32));
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Releasing focus releases every key
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().ctx.input.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_page_controls(document: &Document, app: Rc<RefCell<App>>) {
        // Waypoint buttons
        if let Ok(list) = document.query_selector_all(".waypoint") {
            for i in 0..list.length() {
                let Some(el) = list.get(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok())
                else {
                    continue;
                };
                let Some(zone) = el
                    .get_attribute("data-zone")
                    .and_then(|z| ZoneId::from_str(&z))
                else {
                    log::warn!("Waypoint without a known data-zone");
                    continue;
                };
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    app.borrow_mut().push(Command::NavigateTo(zone));
                });
                let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Close control
        if let Some(btn) = document.get_element_by_id("close-modal") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().push(Command::CloseModal);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Start button dismisses the instructions card
        if let Some(btn) = document.get_element_by_id("start-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Some(el) = page_document().and_then(|d| d.get_element_by_id("instructions")) {
                    let _ = el.class_list().add_1("hidden");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Optional reset button
        if let Some(btn) = document.get_element_by_id("reset-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().push(Command::Reset);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = fit_canvas(&window, &canvas);
            let mut a = app.borrow_mut();
            if let Some(render_state) = a.render_state.as_mut() {
                render_state.resize(width, height);
            }
            a.push(Command::Resize { width, height });
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Scooter CV (native) starting...");
    log::info!("Native mode runs the world headless - use `trunk serve` for the web version");

    if let Err(e) = headless_ride() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Ride a short scripted route and print what the page would show
#[cfg(not(target_arch = "wasm32"))]
fn headless_ride() -> Result<(), scooter_cv::ContentError> {
    use scooter_cv::sim::{Command, Key, ModelManifest, SimContext, VehicleRig, ZoneId, apply_command};
    use scooter_cv::ui::{RecordingSink, SinkCall, UiDispatcher};
    use scooter_cv::{AssetError, CvData, Settings};

    let ui = UiDispatcher::new(CvData::embedded()?);
    let mut sink = RecordingSink::default();
    let mut ctx = SimContext::new(Settings::load(), 42);

    let rig = std::fs::read_to_string("assets/scooter_manifest.json")
        .map_err(|e| AssetError::Fetch {
            url: "assets/scooter_manifest.json".into(),
            reason: e.to_string(),
        })
        .and_then(|json| ModelManifest::from_json(&json))
        .map(|m| VehicleRig::from_manifest(&m));
    ctx.mark_ready(rig);

    let mut now = 0.0;

    // Ride north into the contact zone
    apply_command(&mut ctx, Command::KeyChanged { key: Key::Forward, pressed: true });
    run_ticks(&mut ctx, &ui, &mut sink, &mut now, 300);
    apply_command(&mut ctx, Command::KeyChanged { key: Key::Forward, pressed: false });
    apply_command(&mut ctx, Command::CloseModal);
    run_ticks(&mut ctx, &ui, &mut sink, &mut now, 1);

    // Glide to every zone in turn
    for zone in ZoneId::ALL {
        ctx.now_ms = now;
        apply_command(&mut ctx, Command::NavigateTo(zone));
        run_ticks(&mut ctx, &ui, &mut sink, &mut now, 130);
        apply_command(&mut ctx, Command::CloseModal);
        run_ticks(&mut ctx, &ui, &mut sink, &mut now, 1);
    }

    for call in &sink.calls {
        match call {
            SinkCall::ShowPanel(zone) => println!("panel  {zone}"),
            SinkCall::HidePanel => println!("panel  closed"),
            SinkCall::ActiveWaypoint(zone) => println!("active {zone:?}"),
            SinkCall::Status(text) => println!("status {text}"),
        }
    }
    let v = &ctx.vehicle;
    println!(
        "finished at ({:.2}, {:.2}, {:.2}) after {} ticks",
        v.pos.x, v.pos.y, v.pos.z, ctx.time_ticks
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn run_ticks(
    ctx: &mut scooter_cv::sim::SimContext,
    ui: &scooter_cv::ui::UiDispatcher,
    sink: &mut scooter_cv::ui::RecordingSink,
    now: &mut f64,
    ticks: u32,
) {
    let frame_ms = scooter_cv::consts::SIM_DT as f64 * 1000.0;
    for _ in 0..ticks {
        scooter_cv::sim::tick(ctx, *now);
        *now += frame_ms;
    }
    ui.dispatch(&ctx.drain_events(), sink);
}
