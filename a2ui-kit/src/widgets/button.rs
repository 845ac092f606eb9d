use crate::a2ui::{ActionDefinition, RenderCx, View};

use super::root_element;

/// `Button`: renders its `child` (or a plain `label`) and emits `action` on
/// click.
pub fn button(cx: &mut RenderCx<'_>) -> View {
    let primary: bool = cx.use_value("primary", false);
    let disabled: bool = cx.use_value("disabled", false);
    let content = match cx.child_prop("child") {
        Some(child) => child,
        None => View::text(cx.use_value("label", String::new())),
    };
    let action = cx
        .node()
        .value("action")
        .and_then(ActionDefinition::from_json);

    let mut element = root_element(cx, "button", "a2ui-button")
        .attr_opt("data-primary", primary.then_some("true"))
        .attr_opt("disabled", disabled.then_some("disabled"))
        .child(content);
    if let Some(action) = action
        && !disabled
    {
        element = element
            .attr("data-action", action.name.as_str())
            .on("click", cx.action_handler(action));
    }
    element.into()
}

#[cfg(test)]
mod tests {
    use crate::a2ui::UiEvent;
    use crate::widgets::testing::Harness;
    use serde_json::json;

    fn checkout() -> Harness {
        Harness::new(
            json!([
                {"id": "root", "component": {"Button": {
                    "child": "label",
                    "primary": true,
                    "action": {"name": "checkout", "context": [
                        {"key": "total", "value": {"path": "/cart/total"}},
                        {"key": "currency", "value": {"literalString": "EUR"}}
                    ]}
                }}},
                {"id": "label", "component": {"Text": {"text": "Pay now"}}}
            ]),
            json!([{"key": "cart", "valueMap": [{"key": "total", "valueNumber": 42.5}]}]),
        )
    }

    #[test]
    fn test_click_emits_user_action() {
        let mut harness = checkout();
        let view = harness.render();
        let button = view.find_by_component_id("root").unwrap();
        assert_eq!(button.attrs["data-primary"], "true");
        assert_eq!(view.text_content(), "Pay now");

        assert!(button.dispatch(&UiEvent::Click));
        let actions = harness.actions.borrow();
        assert_eq!(actions.len(), 1);
        let action = &actions[0].user_action;
        assert_eq!(action.name, "checkout");
        assert_eq!(action.source_component_id, "root");
        let context = action.context.as_ref().unwrap();
        assert_eq!(context["total"], json!(42.5));
        assert_eq!(context["currency"], json!("EUR"));
    }

    #[test]
    fn test_context_is_resolved_at_click_time() {
        let mut harness = checkout();
        let view = harness.render();
        harness
            .processor
            .set_data(None, "/cart/total", json!(10), "main");

        view.find_by_component_id("root")
            .unwrap()
            .dispatch(&UiEvent::Click);
        let actions = harness.actions.borrow();
        assert_eq!(actions[0].user_action.context.as_ref().unwrap()["total"], json!(10));
    }

    #[test]
    fn test_disabled_button_has_no_handler() {
        let mut harness = Harness::new(
            json!([{"id": "root", "component": {"Button": {
                "label": "Nope",
                "disabled": true,
                "action": {"name": "never"}
            }}}]),
            json!([]),
        );
        let view = harness.render();
        let button = view.find_by_component_id("root").unwrap();
        assert_eq!(button.attrs["disabled"], "disabled");
        assert!(!button.dispatch(&UiEvent::Click));
        assert!(harness.actions.borrow().is_empty());
    }
}
