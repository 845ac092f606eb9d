use crate::a2ui::{RenderCx, View};

use super::root_element;

/// `Text` / `Typography`: a run of text styled by its usage hint
pub fn text(cx: &mut RenderCx<'_>) -> View {
    let content: String = cx.use_value("text", String::new());
    let hint: String = cx.use_value("usageHint", String::from("body"));

    let tag = match hint.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" => hint.as_str(),
        "caption" => "small",
        "code" => "code",
        _ => "p",
    };
    root_element(cx, tag, "a2ui-text")
        .attr("data-usage-hint", hint.as_str())
        .child(content)
        .into()
}

/// `Icon`: a named glyph. Hosts map the name to their icon set.
pub fn icon(cx: &mut RenderCx<'_>) -> View {
    let name: String = cx.use_value("name", String::new());
    let size: Option<f64> = cx.node().value("size").and_then(|size| size.as_f64());

    root_element(cx, "span", "a2ui-icon")
        .attr("data-icon", name)
        .attr_opt("data-size", size.map(|size| size.to_string()))
        .into()
}
