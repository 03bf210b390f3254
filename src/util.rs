use js_sys::Function;
use wasm_bindgen::{JsCast, JsValue, UnwrapThrowExt};
use web_sys::{EventTarget, Node};

type Destructor = Box<dyn FnOnce(&EventTarget, &Function) -> std::result::Result<(), JsValue>>;

/// Keeps an event listener attached for as long as this value lives.
pub struct ElementEvent {
    element: EventTarget,
    function: Box<dyn AsRef<JsValue>>,

    destructor: Option<Destructor>,
}

impl ElementEvent {
    pub fn link<
        C: AsRef<JsValue> + 'static,
        F: FnOnce(&EventTarget, &Function) -> std::result::Result<(), JsValue>,
    >(
        element: EventTarget,
        function: C,
        creator: F,
        destructor: Destructor,
    ) -> std::result::Result<Self, JsValue> {
        let this = Self {
            element,
            function: Box::new(function),
            destructor: Some(destructor),
        };

        creator(&this.element, (*this.function).as_ref().unchecked_ref())?;

        Ok(this)
    }

    /// Whether the listening element is `root` or still somewhere inside it.
    pub fn is_within(&self, root: &Node) -> bool {
        self.element
            .dyn_ref::<Node>()
            .map(|node| node == root || root.contains(Some(node)))
            .unwrap_or_default()
    }
}

impl Drop for ElementEvent {
    fn drop(&mut self) {
        if let Some(dest) = self.destructor.take() {
            dest(&self.element, (*self.function).as_ref().unchecked_ref()).unwrap_throw();
        }
    }
}
