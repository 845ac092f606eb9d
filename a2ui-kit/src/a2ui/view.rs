//! Rendered output
//!
//! Component adapters produce a [`View`]: a small retained element tree that
//! is independent of any UI toolkit. Hosts walk it to build native widgets,
//! or print it with [`View::to_markup`].

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Input delivered to an element's event handler
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click,
    Input(String),
    Toggle(bool),
    Select(String),
}

impl UiEvent {
    /// Handler name this event is delivered to
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Click => "click",
            UiEvent::Input(_) => "input",
            UiEvent::Toggle(_) => "toggle",
            UiEvent::Select(_) => "select",
        }
    }
}

pub type EventHandler = Rc<dyn Fn(&UiEvent)>;

/// A node of rendered output
#[derive(Debug, Clone, Default)]
pub enum View {
    Element(Element),
    Text(String),
    Fragment(Vec<View>),
    #[default]
    Empty,
    /// Placeholder for a child component, filled in by the renderer
    #[doc(hidden)]
    Slot(SlotKey),
}

/// Identifies a child mount inside a parent's raw output
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey(pub(crate) String);

/// An element with attributes, children and event handlers
#[derive(Clone, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<View>,
    pub handlers: IndexMap<String, EventHandler>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Set an attribute only when a value is present
    pub fn attr_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    pub fn child(mut self, child: impl Into<View>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = View>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attach a handler for events named `event` (see [`UiEvent::name`])
    pub fn on(mut self, event: impl Into<String>, handler: EventHandler) -> Self {
        self.handlers.insert(event.into(), handler);
        self
    }

    /// Deliver an event to this element's handler. Returns whether a
    /// handler was found.
    pub fn dispatch(&self, event: &UiEvent) -> bool {
        match self.handlers.get(event.name()) {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }
}

impl From<Element> for View {
    fn from(element: Element) -> Self {
        View::Element(element)
    }
}

impl From<String> for View {
    fn from(text: String) -> Self {
        View::Text(text)
    }
}

impl From<&str> for View {
    fn from(text: &str) -> Self {
        View::Text(text.to_string())
    }
}

impl View {
    pub fn text(text: impl Into<String>) -> Self {
        View::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            View::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text of this view and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            View::Text(text) => out.push_str(text),
            View::Element(element) => element.children.iter().for_each(|c| c.collect_text(out)),
            View::Fragment(children) => children.iter().for_each(|c| c.collect_text(out)),
            View::Empty | View::Slot(_) => {}
        }
    }

    /// First element carrying `attr="value"`, depth first
    pub fn find_by_attr(&self, attr: &str, value: &str) -> Option<&Element> {
        match self {
            View::Element(element) => {
                if element.attrs.get(attr).is_some_and(|v| v == value) {
                    return Some(element);
                }
                element.children.iter().find_map(|c| c.find_by_attr(attr, value))
            }
            View::Fragment(children) => children.iter().find_map(|c| c.find_by_attr(attr, value)),
            _ => None,
        }
    }

    /// The root element of the component with the given id
    pub fn find_by_component_id(&self, id: &str) -> Option<&Element> {
        self.find_by_attr("data-component-id", id)
    }

    /// Render as HTML-like markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out, 0);
        out
    }

    fn write_markup(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            View::Text(text) => {
                out.push_str(&indent);
                out.push_str(&escape(text));
                out.push('\n');
            }
            View::Element(element) => {
                out.push_str(&indent);
                out.push('<');
                out.push_str(&element.tag);
                for (key, value) in &element.attrs {
                    out.push_str(&format!(" {}=\"{}\"", key, escape(value)));
                }
                if element.children.is_empty() {
                    out.push_str(" />\n");
                    return;
                }
                out.push_str(">\n");
                for child in &element.children {
                    child.write_markup(out, depth + 1);
                }
                out.push_str(&format!("{}</{}>\n", indent, element.tag));
            }
            View::Fragment(children) => {
                for child in children {
                    child.write_markup(out, depth);
                }
            }
            View::Empty | View::Slot(_) => {}
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_markup() {
        let view: View = Element::new("div")
            .attr("data-component-id", "root")
            .child(Element::new("span").child("a < b"))
            .child(Element::new("hr"))
            .into();

        assert_eq!(
            view.to_markup(),
            "<div data-component-id=\"root\">\n  <span>\n    a &lt; b\n  </span>\n  <hr />\n</div>\n"
        );
    }

    #[test]
    fn test_text_content_and_lookup() {
        let view = View::Fragment(vec![
            Element::new("p").attr("data-component-id", "one").child("Hello ").into(),
            Element::new("p").attr("data-component-id", "two").child("World").into(),
        ]);

        assert_eq!(view.text_content(), "Hello World");
        assert_eq!(view.find_by_component_id("two").unwrap().tag, "p");
        assert!(view.find_by_component_id("three").is_none());
    }

    #[test]
    fn test_dispatch() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let input = Element::new("input").on(
            "input",
            Rc::new(move |event: &UiEvent| s.borrow_mut().push(event.clone())),
        );

        assert!(input.dispatch(&UiEvent::Input("hi".to_string())));
        assert!(!input.dispatch(&UiEvent::Click));
        assert_eq!(*seen.borrow(), vec![UiEvent::Input("hi".to_string())]);
    }
}
