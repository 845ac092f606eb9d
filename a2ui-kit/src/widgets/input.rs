//! Form inputs: `TextField`, `CheckBox` and `MultipleChoice`.
//!
//! Inputs bound to a data path write user input back through `set_data`.
//! Inputs holding a literal keep the edited value as local state.

use std::rc::Rc;

use crate::a2ui::{
    ActionDefinition, BoundValue, Element, EventHandler, FromBound, RenderCx, UiEvent, View,
};

use super::root_element;

/// Current value of an input property plus the handler that updates it
fn editable<T: FromBound>(
    cx: &mut RenderCx<'_>,
    key: &str,
    default: T,
    from_event: fn(&UiEvent) -> Option<T>,
) -> (T, EventHandler) {
    let bound = cx.use_value(key, default);
    if let Some(write_back) = cx.two_way_handler(key) {
        return (bound, write_back);
    }

    let state = cx.use_state(key, || bound.clone());
    let local = state.clone();
    let handler: EventHandler = Rc::new(move |event: &UiEvent| {
        if let Some(value) = from_event(event) {
            local.set(value);
        }
    });
    (state.get(), handler)
}

fn label_element(cx: &mut RenderCx<'_>) -> Option<Element> {
    let label: String = cx.use_value("label", String::new());
    (!label.is_empty()).then(|| Element::new("label").attr("class", "a2ui-label").child(label))
}

// ============================================================================
// TextField
// ============================================================================

/// `TextField` / `Input`
pub fn text_field(cx: &mut RenderCx<'_>) -> View {
    let key = if cx.node().value("text").is_none() && cx.node().value("value").is_some() {
        "value"
    } else {
        "text"
    };
    let (value, on_input) = editable(cx, key, String::new(), |event| match event {
        UiEvent::Input(text) => Some(text.clone()),
        _ => None,
    });
    let placeholder: String = cx.use_value("placeholder", String::new());
    let disabled: bool = cx.use_value("disabled", false);
    let type_key = if cx.node().value("textFieldType").is_some() {
        "textFieldType"
    } else {
        "type"
    };
    let field_type: String = cx.use_value(type_key, String::from("shortText"));
    let label = label_element(cx);

    let input = match field_type.as_str() {
        "longText" => Element::new("textarea").child(value),
        other => Element::new("input")
            .attr("type", html_input_type(other))
            .attr("value", value),
    };
    let mut input = input
        .attr_opt("placeholder", (!placeholder.is_empty()).then_some(placeholder))
        .attr_opt("disabled", disabled.then_some("disabled"));
    if !disabled {
        input = input.on("input", on_input);
    }

    let mut root = root_element(cx, "div", "a2ui-text-field").attr("data-field-type", field_type);
    if let Some(label) = label {
        root = root.child(label);
    }
    root.child(input).into()
}

fn html_input_type(field_type: &str) -> &'static str {
    match field_type {
        "number" => "number",
        "obscured" | "password" => "password",
        "date" => "date",
        "email" => "email",
        _ => "text",
    }
}

// ============================================================================
// CheckBox
// ============================================================================

pub fn check_box(cx: &mut RenderCx<'_>) -> View {
    let (checked, on_toggle) = editable(cx, "value", false, |event| match event {
        UiEvent::Toggle(checked) => Some(*checked),
        _ => None,
    });
    let label = label_element(cx);

    let input = Element::new("input")
        .attr("type", "checkbox")
        .attr_opt("checked", checked.then_some("checked"))
        .on("toggle", on_toggle);

    let mut root = root_element(cx, "div", "a2ui-check-box").child(input);
    if let Some(label) = label {
        root = root.child(label);
    }
    root.into()
}

// ============================================================================
// MultipleChoice
// ============================================================================

/// `MultipleChoice` / `Select`: a single selection out of `options`.
///
/// Each option is `{"label": <bound value>, "value": "..."}`. A selection is
/// written back like any other input, then `action` (if any) is emitted.
pub fn multiple_choice(cx: &mut RenderCx<'_>) -> View {
    let (selected, on_select) = editable(cx, "value", String::new(), |event| match event {
        UiEvent::Select(value) => Some(value.clone()),
        _ => None,
    });
    let placeholder: String = cx.use_value("placeholder", String::new());
    let label = label_element(cx);

    let options: Vec<serde_json::Value> = cx
        .node()
        .value("options")
        .and_then(|options| options.as_array())
        .cloned()
        .unwrap_or_default();

    let mut select = Element::new("select");
    if !placeholder.is_empty() {
        select = select.child(
            Element::new("option")
                .attr("value", "")
                .attr("disabled", "disabled")
                .child(placeholder),
        );
    }
    for (index, option) in options.iter().enumerate() {
        let value = option
            .get("value")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();
        let text: String = cx.use_bound_value(
            &format!("option:{}", index),
            option.get("label").and_then(BoundValue::from_json),
            value.clone(),
        );
        select = select.child(
            Element::new("option")
                .attr_opt("selected", (value == selected).then_some("selected"))
                .attr("value", value)
                .child(text),
        );
    }

    let action = cx
        .node()
        .value("action")
        .and_then(ActionDefinition::from_json)
        .map(|action| cx.action_handler(action));
    let handler: EventHandler = match action {
        Some(emit) => Rc::new(move |event: &UiEvent| {
            on_select(event);
            emit(event);
        }),
        None => on_select,
    };

    let mut root = root_element(cx, "div", "a2ui-multiple-choice");
    if let Some(label) = label {
        root = root.child(label);
    }
    root.child(select.on("select", handler)).into()
}
