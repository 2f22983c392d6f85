use crate::{
    dom::{ChangeListener, FieldElement, Page},
    error::{CaptureError, Result},
};
use headless_chrome::Tab;
use serde::{Deserialize, de::DeserializeOwned};
use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
    sync::Arc,
};

/// Attribute used to find a matched element again from later scripts
const HANDLE_ATTRIBUTE: &str = "data-form-capture";

type ListenerTable = RefCell<HashMap<u64, Vec<Rc<dyn ChangeListener>>>>;

/// Run a script in the tab and decode the JSON string it returns
fn evaluate_json<T: DeserializeOwned>(tab: &Tab, script: &str) -> Result<T> {
    let remote = tab
        .evaluate(script, false)
        .map_err(|e| CaptureError::ScriptFailed(e.to_string()))?;

    let value = remote.value.ok_or_else(|| {
        CaptureError::ScriptFailed(remote.description.unwrap_or_else(|| "No value returned".to_string()))
    })?;

    // Scripts return JSON strings so nested values survive the protocol intact
    let json: String = serde_json::from_value(value)?;
    Ok(serde_json::from_str(&json)?)
}

/// A live document in a Chrome tab
///
/// Change events are queued inside the page and only reach listeners when
/// [`ChromePage::pump_events`] drains the queue, so handlers always run on
/// the caller's thread, one at a time.
pub struct ChromePage {
    tab: Arc<Tab>,
    listeners: Rc<ListenerTable>,
}

impl ChromePage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self {
            tab,
            listeners: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Deliver queued change events to their listeners.
    ///
    /// Returns the number of events delivered. Listener errors are logged
    /// and do not stop delivery of the remaining events.
    pub fn pump_events(&self) -> Result<usize> {
        let script = r#"(function() {
            var state = window.__formCapture;
            if (!state) { return "[]"; }
            var queue = state.queue;
            state.queue = [];
            return JSON.stringify(queue);
        })()"#;

        let handles: Vec<u64> = evaluate_json(&self.tab, script)?;

        for handle in &handles {
            let listeners = self.listeners.borrow().get(handle).cloned().unwrap_or_default();
            for listener in listeners {
                if let Err(e) = listener.on_change() {
                    log::warn!("Change listener for element {} failed: {}", handle, e);
                }
            }
        }

        Ok(handles.len())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }
}

impl Page for ChromePage {
    type Element = ChromeElement;

    fn query_selector_all(&self, selector: &str) -> Result<Vec<ChromeElement>> {
        let script = format!(
            r#"(function(selector) {{
                var state = window.__formCapture = window.__formCapture || {{ next: 0, queue: [] }};
                var handles = [];
                document.querySelectorAll(selector).forEach(function(el) {{
                    if (!el.hasAttribute("{attr}")) {{
                        el.setAttribute("{attr}", String(state.next++));
                    }}
                    handles.push(Number(el.getAttribute("{attr}")));
                }});
                return JSON.stringify(handles);
            }})({selector})"#,
            attr = HANDLE_ATTRIBUTE,
            selector = serde_json::to_string(selector)?,
        );

        let handles: Vec<u64> = evaluate_json(&self.tab, &script).map_err(|e| CaptureError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;

        Ok(handles
            .into_iter()
            .map(|handle| ChromeElement {
                tab: self.tab.clone(),
                handle,
                listeners: Rc::downgrade(&self.listeners),
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct ElementState {
    html: String,
    value: String,
    checked: bool,
}

/// An element in a Chrome tab, found again through its handle attribute
#[derive(Clone)]
pub struct ChromeElement {
    tab: Arc<Tab>,
    handle: u64,
    listeners: Weak<ListenerTable>,
}

impl ChromeElement {
    pub fn handle(&self) -> u64 {
        self.handle
    }

    fn lookup(&self) -> String {
        format!(r#"document.querySelector('[{}="{}"]')"#, HANDLE_ATTRIBUTE, self.handle)
    }

    fn state(&self) -> Result<ElementState> {
        let script = format!(
            r#"(function(el) {{
                if (!el) {{ return "null"; }}
                return JSON.stringify({{
                    html: el.innerHTML,
                    value: el.value === undefined || el.value === null ? "" : String(el.value),
                    checked: !!el.checked
                }});
            }})({})"#,
            self.lookup()
        );

        let state: Option<ElementState> =
            evaluate_json(&self.tab, &script).map_err(|e| CaptureError::ElementRead(e.to_string()))?;
        state.ok_or_else(|| CaptureError::ElementRead(format!("Element {} is no longer in the document", self.handle)))
    }
}

impl FieldElement for ChromeElement {
    fn inner_html(&self) -> Result<String> {
        Ok(self.state()?.html)
    }

    fn value(&self) -> Result<String> {
        Ok(self.state()?.value)
    }

    fn checked(&self) -> Result<bool> {
        Ok(self.state()?.checked)
    }

    fn add_change_listener(&self, listener: Rc<dyn ChangeListener>) -> Result<()> {
        let table = self
            .listeners
            .upgrade()
            .ok_or_else(|| CaptureError::ListenerFailed("Page has been dropped".to_string()))?;

        // One in-page listener per element; it only queues the handle
        let script = format!(
            r#"(function(el, handle) {{
                if (!el) {{ return "false"; }}
                if (!el.__formCaptureBound) {{
                    el.__formCaptureBound = true;
                    el.addEventListener("change", function() {{
                        window.__formCapture.queue.push(handle);
                    }});
                }}
                return "true";
            }})({}, {})"#,
            self.lookup(),
            self.handle
        );

        let attached: bool =
            evaluate_json(&self.tab, &script).map_err(|e| CaptureError::ListenerFailed(e.to_string()))?;
        if !attached {
            return Err(CaptureError::ListenerFailed(format!(
                "Element {} is no longer in the document",
                self.handle
            )));
        }

        table.borrow_mut().entry(self.handle).or_default().push(listener);
        Ok(())
    }
}
