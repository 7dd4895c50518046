use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use mascot_motion_core::{MascotOptions, Phase, ScrollDirection};

mod host;
mod runtime;

use runtime::{Runtime, Shared};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn init_once() {
    console_error_panic_hook::set_once();
    // Errors only when a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Info);
}

/// The page mascot. The page script that creates it owns it and hands it to
/// whatever needs to trigger `wave()`/`bounce()`.
#[wasm_bindgen]
pub struct MascotMotion {
    rt: Shared,
}

#[wasm_bindgen]
impl MascotMotion {
    /// Attach to the first element matching `selector`. Pass an options object
    /// (camelCase or snake_case keys) or undefined/null for defaults.
    /// Example:
    ///   new MascotMotion(".mundo-mascot", { floatAmplitude: 12, entranceDelay: 0 })
    ///
    /// A selector that matches nothing yields an inert instance, not an error.
    #[wasm_bindgen(constructor)]
    pub fn new(selector: String, options: JsValue) -> Result<MascotMotion, JsError> {
        init_once();

        let opts: MascotOptions = if jsvalue_is_undefined_or_null(&options) {
            MascotOptions::default()
        } else {
            swb::from_value(options).map_err(|e| JsError::new(&format!("options error: {e}")))?
        };

        let rt = Runtime::create()?;
        rt.borrow_mut()
            .attach_mascot(&selector, &opts)
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(MascotMotion { rt })
    }

    /// Whether the selector matched an element.
    #[wasm_bindgen(getter, js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.rt
            .borrow()
            .mascot()
            .is_some_and(|m| m.is_attached())
    }

    /// "hidden" | "entering" | "floating"
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        let phase = self
            .rt
            .borrow()
            .mascot()
            .map(|m| m.phase())
            .unwrap_or(Phase::Hidden);
        match phase {
            Phase::Hidden => "hidden",
            Phase::Entering => "entering",
            Phase::Floating => "floating",
        }
        .to_string()
    }

    /// Resolved configuration as a plain object, or undefined when inert.
    #[wasm_bindgen(getter)]
    pub fn config(&self) -> Result<JsValue, JsError> {
        match self.rt.borrow().mascot().and_then(|m| m.config()) {
            Some(cfg) => {
                swb::to_value(cfg).map_err(|e| JsError::new(&format!("config error: {e}")))
            }
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn wave(&self) {
        self.rt.borrow_mut().with_mascot(|m, host| m.wave(host));
    }

    pub fn bounce(&self) {
        self.rt.borrow_mut().with_mascot(|m, host| m.bounce(host));
    }

    /// Stop the loop, cancel pending timers and listeners. The instance is inert afterwards.
    pub fn destroy(&self) {
        self.rt.borrow_mut().shutdown();
    }
}

/// Scroll-reveal for decorative illustrations.
#[wasm_bindgen]
pub struct DecorReveal {
    rt: Shared,
}

#[wasm_bindgen]
impl DecorReveal {
    #[wasm_bindgen(constructor)]
    pub fn new(selector: String) -> Result<DecorReveal, JsError> {
        init_once();
        let rt = Runtime::create()?;
        rt.borrow_mut().attach_decor(&selector);
        Ok(DecorReveal { rt })
    }

    #[wasm_bindgen(getter, js_name = elementCount)]
    pub fn element_count(&self) -> u32 {
        self.rt
            .borrow()
            .decor()
            .map_or(0, |d| d.elements().len() as u32)
    }

    /// "up" | "down", or undefined before the first scroll.
    #[wasm_bindgen(getter, js_name = scrollDirection)]
    pub fn scroll_direction(&self) -> Option<String> {
        self.rt
            .borrow()
            .decor()
            .and_then(|d| d.scroll_direction())
            .map(|dir| match dir {
                ScrollDirection::Up => "up".to_string(),
                ScrollDirection::Down => "down".to_string(),
            })
    }

    pub fn destroy(&self) {
        self.rt.borrow_mut().shutdown();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
