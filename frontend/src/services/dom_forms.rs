//! DOM-backed [`Form`] for validating real page forms.

use labsample_shared::{Form, FormField};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

pub struct DomForm {
    form: HtmlFormElement,
}

impl DomForm {
    pub fn new(form: HtmlFormElement) -> Self {
        Self { form }
    }
}

pub struct DomField {
    element: Element,
}

impl FormField for DomField {
    fn value(&self) -> String {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = self.element.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(textarea) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            textarea.value()
        } else {
            // Only form controls carry a value
            String::new()
        }
    }

    fn toggle_class(&self, class: &str, present: bool) {
        let class_list = self.element.class_list();
        let result = if present {
            class_list.add_1(class)
        } else {
            class_list.remove_1(class)
        };
        if let Err(e) = result {
            log::warn!("⚠️ FORM: Could not update class {}: {}", class, super::describe_js_error(&e));
        }
    }
}

impl Form for DomForm {
    type Field = DomField;

    fn required_fields(&self) -> Vec<DomField> {
        let nodes = match self.form.query_selector_all("[required]") {
            Ok(nodes) => nodes,
            Err(e) => {
                log::error!("❌ FORM: Required field lookup failed: {}", super::describe_js_error(&e));
                return Vec::new();
            }
        };

        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| DomField { element })
            .collect()
    }
}
