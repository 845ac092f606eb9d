//! Containers with their own open/selected state: `Modal` and `Tabs`.
//!
//! The state follows a data path when the corresponding property is
//! path-bound, and is kept locally otherwise.

use std::rc::Rc;

use serde_json::Value;

use crate::a2ui::{BoundValue, Element, EventHandler, FromBound, RenderCx, UiEvent, View};

/// Read `key` and build a setter for it: a data model write when the
/// property is path-bound, component-local state otherwise.
fn controlled<T>(
    cx: &mut RenderCx<'_>,
    key: &str,
    default: T,
    to_json: fn(&T) -> Value,
) -> (T, Rc<dyn Fn(T)>)
where
    T: FromBound,
{
    let path = cx
        .node()
        .value(key)
        .and_then(BoundValue::from_json)
        .and_then(|bound| bound.as_path().map(str::to_string));
    let current = cx.use_value(key, default);

    match path {
        Some(path) => {
            let processor = cx.processor().clone();
            let node = cx.node().clone();
            let surface_id = cx.surface_id().to_string();
            let setter = move |value: T| {
                processor.set_data(Some(&node), &path, to_json(&value), &surface_id)
            };
            (current, Rc::new(setter))
        }
        None => {
            let state = cx.use_state(key, || current.clone());
            let local = state.clone();
            (state.get(), Rc::new(move |value: T| local.set(value)))
        }
    }
}

fn on_click<T: Clone + 'static>(setter: &Rc<dyn Fn(T)>, value: T) -> EventHandler {
    let setter = setter.clone();
    Rc::new(move |_event: &UiEvent| setter(value.clone()))
}

// ============================================================================
// Modal
// ============================================================================

/// `Modal` / `Dialog`.
///
/// The `trigger` child opens the dialog. While open, the dialog shows
/// `title`, `description` and its `content` (or `children`).
pub fn modal(cx: &mut RenderCx<'_>) -> View {
    let key = if cx.node().value("visible").is_some() {
        "visible"
    } else {
        "open"
    };
    let (open, set_open) = controlled(cx, key, false, |open| Value::Bool(*open));

    let mut root = super::root_element(cx, "div", "a2ui-modal")
        .attr_opt("data-open", open.then_some("true"));
    if let Some(trigger) = cx.child_prop("trigger") {
        root = root.child(
            Element::new("div")
                .attr("class", "a2ui-modal-trigger")
                .on("click", on_click(&set_open, true))
                .child(trigger),
        );
    }
    if !open {
        return root.into();
    }

    let title: String = cx.use_value("title", String::new());
    let description: String = cx.use_value("description", String::new());
    let mut dialog = Element::new("dialog").attr("open", "open");
    if !title.is_empty() {
        dialog = dialog.child(Element::new("h2").child(title));
    }
    if !description.is_empty() {
        dialog = dialog.child(Element::new("p").child(description));
    }
    if let Some(content) = cx.child_prop("content") {
        dialog = dialog.child(content);
    }
    dialog = dialog
        .children(cx.children("children"))
        .child(
            Element::new("button")
                .attr("class", "a2ui-modal-close")
                .on("click", on_click(&set_open, false))
                .child("Close"),
        );

    root.child(dialog).into()
}

// ============================================================================
// Tabs
// ============================================================================

/// `Tabs`: one header per entry of `tabItems`, paired by position with the
/// nodes of `children`. Only the selected tab's child is rendered.
///
/// A tab item is either a bound title or an object with a `title`.
pub fn tabs(cx: &mut RenderCx<'_>) -> View {
    let (selected, select) = controlled(cx, "selected", 0i64, |index| Value::from(*index));

    let node = cx.node().clone();
    let items: Vec<Value> = node
        .value("tabItems")
        .or_else(|| node.value("titles"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let panels = node
        .property("children")
        .map(|property| property.nodes().to_vec())
        .unwrap_or_default();

    let count = items.len().max(panels.len());
    let selected = usize::try_from(selected).unwrap_or(0).min(count.saturating_sub(1));

    let mut header = Element::new("div").attr("class", "a2ui-tab-list");
    for index in 0..count {
        let title_prop = items.get(index).and_then(|item| match item {
            Value::Object(obj) if obj.contains_key("title") => obj.get("title").and_then(BoundValue::from_json),
            other => BoundValue::from_json(other),
        });
        let title: String =
            cx.use_bound_value(&format!("title:{}", index), title_prop, format!("Tab {}", index + 1));
        header = header.child(
            Element::new("button")
                .attr("class", "a2ui-tab")
                .attr_opt("data-selected", (index == selected).then_some("true"))
                .on("click", on_click(&select, index as i64))
                .child(title),
        );
    }

    let mut root = super::root_element(cx, "div", "a2ui-tabs").child(header);
    if let Some(panel) = panels.get(selected) {
        root = root.child(
            Element::new("div")
                .attr("class", "a2ui-tab-panel")
                .child(cx.child(panel)),
        );
    }
    root.into()
}
