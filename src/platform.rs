use bevy::log::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("host web-app object is not available")]
    Unavailable,

    #[error("host call failed: {0}")]
    Call(String),
}

/// The page or chat client embedding the globe.
pub trait HostPlatform {
    fn name(&self) -> &'static str;

    /// Tells the host the app is ready and asks for the full viewport.
    fn handshake(&mut self) -> Result<(), PlatformError>;

    /// Stops touch gestures on the element from reaching the host page. Returns the listeners added.
    fn intercept_touches(&mut self, selector: &str) -> Result<usize, PlatformError>;

    /// True once after the host reported a viewport change.
    fn take_viewport_change(&mut self) -> bool;

    fn is_mobile(&self) -> bool;

    /// Unregisters every listener; returns how many were removed.
    fn release(&mut self) -> usize;
}

const MOBILE_AGENT_TOKENS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let user_agent = user_agent.to_lowercase();
    MOBILE_AGENT_TOKENS.iter().any(|token| user_agent.contains(token))
}

/// Desktop builds have no host page.
#[derive(Debug, Default)]
pub struct NoHostPlatform;

impl HostPlatform for NoHostPlatform {
    fn name(&self) -> &'static str {
        "none"
    }

    fn handshake(&mut self) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable)
    }

    fn intercept_touches(&mut self, _selector: &str) -> Result<usize, PlatformError> {
        Ok(0)
    }

    fn take_viewport_change(&mut self) -> bool {
        false
    }

    fn is_mobile(&self) -> bool {
        false
    }

    fn release(&mut self) -> usize {
        0
    }
}

/// Non-send resource owning the host platform; JS handles must stay on the main thread.
pub struct HostBridge {
    platform: Box<dyn HostPlatform>,
    handshake_done: bool,
}

impl HostBridge {
    pub fn new(platform: Box<dyn HostPlatform>) -> Self {
        Self {
            platform,
            handshake_done: false,
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        Self::new(Box::new(web::TelegramWebApp::default()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        Self::new(Box::new(NoHostPlatform))
    }

    pub fn is_mobile(&self) -> bool {
        self.platform.is_mobile()
    }

    pub fn handshake_done(&self) -> bool {
        self.handshake_done
    }

    /// Runs the handshake once. Failures are logged and startup carries on without the host.
    pub fn handshake(&mut self, canvas_selector: &str) {
        if self.handshake_done {
            return;
        }
        self.handshake_done = true;

        match self.platform.handshake() {
            Ok(()) => info!("Host platform '{}' ready", self.platform.name()),
            Err(err) => warn!("Host platform handshake skipped: {}", err),
        }
        match self.platform.intercept_touches(canvas_selector) {
            Ok(0) => {}
            Ok(count) => info!("Intercepting touch gestures with {} listeners", count),
            Err(err) => warn!("Touch interception unavailable: {}", err),
        }
    }

    pub fn take_viewport_change(&mut self) -> bool {
        self.platform.take_viewport_change()
    }

    pub fn release(&mut self) -> usize {
        self.platform.release()
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{HostPlatform, PlatformError, is_mobile_user_agent};
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen::closure::Closure;

    const TOUCH_EVENTS: [&str; 3] = ["touchstart", "touchmove", "touchend"];
    const VIEWPORT_EVENT: &str = "viewportChanged";

    struct TouchListener {
        target: web_sys::EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    }

    #[derive(Default)]
    pub struct TelegramWebApp {
        web_app: Option<JsValue>,
        viewport_changed: Rc<Cell<bool>>,
        viewport_callback: Option<Closure<dyn FnMut()>>,
        touch_listeners: Vec<TouchListener>,
    }

    fn js_error(err: JsValue) -> PlatformError {
        PlatformError::Call(format!("{:?}", err))
    }

    fn lookup_web_app() -> Result<JsValue, PlatformError> {
        let window = web_sys::window().ok_or(PlatformError::Unavailable)?;
        let telegram = js_sys::Reflect::get(&window, &JsValue::from_str("Telegram")).map_err(js_error)?;
        if telegram.is_undefined() || telegram.is_null() {
            return Err(PlatformError::Unavailable);
        }
        let web_app = js_sys::Reflect::get(&telegram, &JsValue::from_str("WebApp")).map_err(js_error)?;
        if web_app.is_undefined() || web_app.is_null() {
            return Err(PlatformError::Unavailable);
        }
        Ok(web_app)
    }

    fn method(target: &JsValue, name: &str) -> Result<js_sys::Function, PlatformError> {
        js_sys::Reflect::get(target, &JsValue::from_str(name))
            .map_err(js_error)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| PlatformError::Call(format!("{} is not a function", name)))
    }

    impl HostPlatform for TelegramWebApp {
        fn name(&self) -> &'static str {
            "telegram"
        }

        fn handshake(&mut self) -> Result<(), PlatformError> {
            let web_app = lookup_web_app()?;
            method(&web_app, "ready")?.call0(&web_app).map_err(js_error)?;
            method(&web_app, "expand")?.call0(&web_app).map_err(js_error)?;

            let flag = self.viewport_changed.clone();
            let callback = Closure::<dyn FnMut()>::new(move || flag.set(true));
            method(&web_app, "onEvent")?
                .call2(&web_app, &JsValue::from_str(VIEWPORT_EVENT), callback.as_ref().unchecked_ref())
                .map_err(js_error)?;

            self.viewport_callback = Some(callback);
            self.web_app = Some(web_app);
            Ok(())
        }

        fn intercept_touches(&mut self, selector: &str) -> Result<usize, PlatformError> {
            let document = web_sys::window()
                .and_then(|window| window.document())
                .ok_or(PlatformError::Unavailable)?;
            let element = document
                .query_selector(selector)
                .map_err(js_error)?
                .ok_or_else(|| PlatformError::Call(format!("no element matches {}", selector)))?;
            let target: web_sys::EventTarget = element.into();

            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);

            for event in TOUCH_EVENTS {
                let callback = Closure::<dyn FnMut(web_sys::Event)>::new(|event: web_sys::Event| {
                    event.stop_propagation();
                    event.prevent_default();
                });
                target
                    .add_event_listener_with_callback_and_add_event_listener_options(
                        event,
                        callback.as_ref().unchecked_ref(),
                        &options,
                    )
                    .map_err(js_error)?;
                self.touch_listeners.push(TouchListener {
                    target: target.clone(),
                    event,
                    callback,
                });
            }
            Ok(TOUCH_EVENTS.len())
        }

        fn take_viewport_change(&mut self) -> bool {
            self.viewport_changed.replace(false)
        }

        fn is_mobile(&self) -> bool {
            web_sys::window()
                .and_then(|window| window.navigator().user_agent().ok())
                .is_some_and(|agent| is_mobile_user_agent(&agent))
        }

        fn release(&mut self) -> usize {
            let mut released = 0;

            for listener in self.touch_listeners.drain(..) {
                let removed = listener
                    .target
                    .remove_event_listener_with_callback(listener.event, listener.callback.as_ref().unchecked_ref());
                if removed.is_ok() {
                    released += 1;
                }
            }

            if let (Some(web_app), Some(callback)) = (self.web_app.take(), self.viewport_callback.take()) {
                let removed = method(&web_app, "offEvent").and_then(|off| {
                    off.call2(&web_app, &JsValue::from_str(VIEWPORT_EVENT), callback.as_ref().unchecked_ref())
                        .map_err(js_error)
                });
                if removed.is_ok() {
                    released += 1;
                }
            }

            released
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36", true)]
    #[case("Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X)", true)]
    #[case("Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X)", true)]
    #[case("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)", true)]
    #[case("Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0", false)]
    #[case("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/126.0", false)]
    #[case("", false)]
    fn test_mobile_user_agent(#[case] agent: &str, #[case] mobile: bool) {
        assert_eq!(is_mobile_user_agent(agent), mobile);
    }

    #[test]
    fn test_handshake_runs_once_without_host() {
        let mut bridge = HostBridge::new(Box::new(NoHostPlatform));
        assert!(!bridge.handshake_done());
        bridge.handshake("#globe-canvas");
        bridge.handshake("#globe-canvas");
        assert!(bridge.handshake_done());
        assert!(!bridge.take_viewport_change());
        assert_eq!(bridge.release(), 0);
    }
}
