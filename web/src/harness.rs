//! `WebHarness`: the class the page drives

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::{Context, anyhow};
use cartpump_core::{
    HarnessConfig, HarnessError, PixelBuffer, PlaybackDevice, PlaybackError, RefreshSource,
    Session,
};
use js_sys::{Function, Object, Reflect};
use tracing::{error, info, trace};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::audio::WebAudioDevice;
use crate::canvas::CanvasPresenter;
use crate::describe_js;
use crate::engine::JsEngine;
use crate::frame::AnimationFrame;
use crate::logging;

struct Inner {
    session: Session<JsEngine, WebAudioDevice>,
    presenter: CanvasPresenter,
    frame: AnimationFrame,
    started: bool,
}

impl Inner {
    fn on_frame(&mut self, timestamp: f64) {
        self.frame.fired();
        let Inner {
            session,
            presenter,
            frame,
            ..
        } = self;
        match session.on_refresh(timestamp, frame) {
            Ok(_) => {}
            // Expected every frame until the page gets a user gesture
            Err(HarnessError::Playback(PlaybackError::Suspended)) => {
                trace!("audio context suspended, unit dropped");
            }
            Err(e) => error!("frame failed: {}", e),
        }
        if let Err(e) = presenter.present(session.pixels()) {
            error!("present failed: {}", describe_js(&e));
        }
    }

    fn resume_audio(&self) {
        self.session.queue().with_device(|device| device.resume());
    }
}

fn build(
    engine_factory: &Function,
    canvas: &HtmlCanvasElement,
    config_toml: Option<String>,
) -> anyhow::Result<Inner> {
    let config = match config_toml {
        Some(text) => HarnessConfig::from_toml_str(&text).context("invalid harness config")?,
        None => HarnessConfig::default(),
    };
    logging::init(&config.log_filter);

    let device = WebAudioDevice::new()
        .map_err(|e| anyhow!("failed to open AudioContext: {}", describe_js(&e)))?;
    let engine = JsEngine::create(engine_factory, device.sample_rate())
        .map_err(|e| anyhow!("engine factory failed: {}", describe_js(&e)))?;
    let presenter = CanvasPresenter::new(canvas, &PixelBuffer::default())?;
    let session = Session::new(engine, device, &config)?;
    let window = web_sys::window().context("no global window")?;

    Ok(Inner {
        session,
        presenter,
        frame: AnimationFrame::new(window),
        started: false,
    })
}

/// Harness exported to JS.
///
/// ```js
/// const harness = new WebHarness((rate) => new Engine(rate), canvas);
/// harness.start();
/// window.onkeydown = (e) => harness.keyDown(e.key);
/// ```
#[wasm_bindgen]
pub struct WebHarness {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl WebHarness {
    /// `engine_factory(sampleRate)` must return the engine object.
    /// `config_toml` is an optional TOML harness config.
    #[wasm_bindgen(constructor)]
    pub fn new(
        engine_factory: &Function,
        canvas: &HtmlCanvasElement,
        config_toml: Option<String>,
    ) -> Result<WebHarness, JsError> {
        let inner = build(engine_factory, canvas, config_toml)
            .map_err(|e| JsError::new(&format!("{e:#}")))?;
        let inner = Rc::new(RefCell::new(inner));

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&inner);
        inner.borrow_mut().frame.set_callback(move |timestamp| {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().on_frame(timestamp);
            }
        });
        Ok(WebHarness { inner })
    }

    /// Start the refresh loop. Later calls do nothing.
    pub fn start(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.started {
            return;
        }
        inner.started = true;
        inner.frame.request_refresh();
        info!("frame loop started");
    }

    /// Feed a `KeyboardEvent.key` press. Returns `true` if the key is bound.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, key: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        inner.resume_audio();
        inner.session.key_down(key)
    }

    /// Feed a `KeyboardEvent.key` release. Returns `true` if the key is bound.
    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&self, key: &str) -> bool {
        self.inner.borrow_mut().session.key_up(key)
    }

    #[wasm_bindgen(js_name = releaseAll)]
    pub fn release_all(&self) {
        self.inner.borrow_mut().session.release_all();
    }

    #[wasm_bindgen(js_name = openSettings)]
    pub fn open_settings(&self) -> bool {
        self.inner.borrow_mut().session.open_settings()
    }

    #[wasm_bindgen(js_name = closeSettings)]
    pub fn close_settings(&self) -> bool {
        self.inner.borrow_mut().session.close_settings()
    }

    /// Hand a cartridge image to the engine. An empty selection is ignored.
    #[wasm_bindgen(js_name = loadCart)]
    pub fn load_cart(&self, bytes: &[u8]) -> Result<(), JsError> {
        let mut inner = self.inner.borrow_mut();
        inner.resume_audio();
        match inner.session.load_cart(bytes) {
            Ok(()) => Ok(()),
            Err(HarnessError::EmptyCart) => {
                info!("no cartridge selected");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the engine is being stepped
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.inner.borrow().session.is_running()
    }

    /// Current button mask
    #[wasm_bindgen(getter)]
    pub fn buttons(&self) -> u8 {
        self.inner.borrow().session.current_mask().bits()
    }

    /// Audio and frame counters as a plain object
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        let inner = self.inner.borrow();
        let session = &inner.session;
        let audio = session.audio_stats();

        let out = Object::new();
        let fields = [
            ("flushes", audio.flushes as f64),
            ("samplesFlushed", audio.samples_flushed as f64),
            ("largestUnit", audio.largest_unit as f64),
            ("averageUnit", audio.average_unit()),
            ("starvedCompletions", audio.starved_completions as f64),
            ("failedFlushes", audio.failed_flushes as f64),
            ("pendingSamples", session.queue().pending_len() as f64),
            ("minFlushSize", session.queue().min_flush_size() as f64),
            ("sampleRate", session.queue().sample_rate() as f64),
            ("frames", session.driver().frames() as f64),
        ];
        for (key, value) in fields {
            Reflect::set(&out, &JsValue::from_str(key), &JsValue::from_f64(value))?;
        }
        Reflect::set(
            &out,
            &JsValue::from_str("inFlight"),
            &JsValue::from_bool(session.queue().is_in_flight()),
        )?;
        Ok(out.into())
    }
}
