//! Standard A2UI components.
//!
//! Adapters from the A2UI standard catalog to [`View`] elements. They are
//! registered into the `default` namespace by
//! [`ComponentRegistry::with_standard_catalog`](crate::a2ui::ComponentRegistry::with_standard_catalog),
//! or into any namespace with [`standard_catalog`].

use std::rc::Rc;

use crate::a2ui::{A2uiComponent, ComponentPlugin, Element, PluginContext, RenderCx};

mod button;
mod container;
mod input;
mod layout;
mod text;

pub use button::button;
pub use container::{modal, tabs};
pub use input::{check_box, multiple_choice, text_field};
pub use layout::{card, column, divider, row};
pub use text::{icon, text};

/// A plugin registering every standard component, aliases included
pub fn standard_catalog() -> ComponentPlugin {
    Rc::new(|cx: &mut PluginContext<'_>| {
        register_all(cx, &["Text", "Typography"], Rc::new(text));
        register_all(cx, &["Icon"], Rc::new(icon));
        register_all(cx, &["Column"], Rc::new(column));
        register_all(cx, &["Row"], Rc::new(row));
        register_all(cx, &["Card"], Rc::new(card));
        register_all(cx, &["Divider"], Rc::new(divider));
        register_all(cx, &["Button"], Rc::new(button));
        register_all(cx, &["TextField", "Input"], Rc::new(text_field));
        register_all(cx, &["CheckBox"], Rc::new(check_box));
        register_all(cx, &["MultipleChoice", "Select"], Rc::new(multiple_choice));
        register_all(cx, &["Modal", "Dialog"], Rc::new(modal));
        register_all(cx, &["Tabs"], Rc::new(tabs));
    })
}

fn register_all(cx: &mut PluginContext<'_>, names: &[&str], component: Rc<dyn A2uiComponent>) {
    for name in names {
        cx.register(*name, component.clone());
    }
}

/// Root element of an adapter: component id, CSS-like class and flex weight
fn root_element(cx: &RenderCx<'_>, tag: &str, class: &str) -> Element {
    let node = cx.node();
    Element::new(tag)
        .attr("data-component-id", node.id.as_str())
        .attr("class", class)
        .attr_opt("flex", node.weight.map(|weight| weight.to_string()))
}


#[cfg(test)]
mod tests {
    use super::testing::Harness;
    use super::*;
    use crate::a2ui::{ComponentRegistry, DEFAULT_NAMESPACE};
    use serde_json::json;

    #[test]
    fn test_catalog_names() {
        let registry = ComponentRegistry::with_standard_catalog();
        for name in [
            "Text", "Typography", "Icon", "Column", "Row", "Card", "Divider", "Button",
            "TextField", "Input", "CheckBox", "MultipleChoice", "Select", "Modal", "Dialog",
            "Tabs",
        ] {
            assert!(registry.has(name, DEFAULT_NAMESPACE), "{} missing", name);
        }
    }

    #[test]
    fn test_aliases_share_implementation() {
        let registry = ComponentRegistry::with_standard_catalog();
        let text = registry.get("Text", DEFAULT_NAMESPACE).unwrap();
        let typography = registry.get("Typography", DEFAULT_NAMESPACE).unwrap();
        assert!(Rc::ptr_eq(&text, &typography));
    }

    #[test]
    fn test_weight_becomes_flex() {
        let mut harness = Harness::new(
            json!([
                {"id": "root", "component": {"Row": {"children": {"explicitList": ["a"]}}}},
                {"id": "a", "weight": 2, "component": {"Text": {"text": "wide"}}}
            ]),
            json!([]),
        );
        let view = harness.render();
        assert_eq!(view.find_by_component_id("a").unwrap().attrs["flex"], "2");
        assert!(!view.find_by_component_id("root").unwrap().attrs.contains_key("flex"));
    }
}
