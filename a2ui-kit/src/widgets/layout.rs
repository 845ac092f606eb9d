//! Layout containers: `Column`, `Row`, `Card` and `Divider`.

use crate::a2ui::{RenderCx, View};

use super::root_element;

// ============================================================================
// Column / Row
// ============================================================================

pub fn column(cx: &mut RenderCx<'_>) -> View {
    flex_container(cx, "a2ui-column")
}

pub fn row(cx: &mut RenderCx<'_>) -> View {
    flex_container(cx, "a2ui-row")
}

fn flex_container(cx: &mut RenderCx<'_>, class: &str) -> View {
    let distribution: String = cx.use_value("distribution", String::from("start"));
    let alignment: String = cx.use_value("alignment", String::from("stretch"));
    let wrap: bool = cx.use_value("wrap", false);
    let gap = number_attr(cx, "gap");
    let padding = number_attr(cx, "padding");
    let width = dimension_attr(cx, "width");
    let height = dimension_attr(cx, "height");

    let element = root_element(cx, "div", class)
        .attr("data-distribution", distribution)
        .attr("data-alignment", alignment)
        .attr_opt("data-gap", gap)
        .attr_opt("data-padding", padding)
        .attr_opt("data-width", width)
        .attr_opt("data-height", height)
        .attr_opt("data-wrap", wrap.then_some("true"));
    element.children(cx.children("children")).into()
}

fn number_attr(cx: &RenderCx<'_>, key: &str) -> Option<String> {
    let value: Option<f64> = cx.node().value(key).and_then(|value| value.as_f64());
    value.map(|value| value.to_string())
}

/// Numbers or CSS-like strings (`"100%"`)
fn dimension_attr(cx: &RenderCx<'_>, key: &str) -> Option<String> {
    match cx.node().value(key)? {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

// ============================================================================
// Card
// ============================================================================

/// `Card`: a framed container around `child` and/or `children`
pub fn card(cx: &mut RenderCx<'_>) -> View {
    let elevation = number_attr(cx, "elevation");
    let mut content = Vec::new();
    if let Some(child) = cx.child_prop("child") {
        content.push(child);
    }
    content.extend(cx.children("children"));

    root_element(cx, "section", "a2ui-card")
        .attr_opt("data-elevation", elevation)
        .children(content)
        .into()
}

// ============================================================================
// Divider
// ============================================================================

pub fn divider(cx: &mut RenderCx<'_>) -> View {
    // `axis` in the current catalog, `orientation` in older payloads
    let key = if cx.node().value("axis").is_some() {
        "axis"
    } else {
        "orientation"
    };
    let orientation: String = cx.use_value(key, String::from("horizontal"));

    root_element(cx, "hr", "a2ui-divider")
        .attr("data-orientation", orientation)
        .into()
}
