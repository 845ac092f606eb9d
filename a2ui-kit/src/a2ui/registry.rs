//! A2UI Component Registry
//!
//! Maps A2UI component type names to component implementations, grouped in
//! namespaces. A namespace may fall back to another namespace for names it
//! does not define, so applications can override a few components and inherit
//! the rest.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = ComponentRegistry::with_standard_catalog();
//!
//! // Tenant-specific override, everything else comes from "default"
//! registry.register("Button", Rc::new(tenant_button), "tenant-a");
//! assert!(registry.has("Text", "tenant-a"));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::{config::RegistryConfig, error::ConfigError, renderer::A2uiComponent};

/// Name of the reserved namespace holding the built-in components
pub const DEFAULT_NAMESPACE: &str = "default";

/// A batch registration routine applied to one namespace
pub type ComponentPlugin = Rc<dyn Fn(&mut PluginContext<'_>)>;

/// Namespace settings as supplied by callers. Unset fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceConfig {
    /// Look up missing names in the fallback namespace (default `true`)
    #[serde(default)]
    pub auto_fallback: Option<bool>,

    /// Namespace to fall back to (default `"default"`)
    #[serde(default)]
    pub fallback_namespace: Option<String>,
}

impl NamespaceConfig {
    pub fn fallback_to(namespace: impl Into<String>) -> Self {
        NamespaceConfig {
            auto_fallback: Some(true),
            fallback_namespace: Some(namespace.into()),
        }
    }

    pub fn isolated() -> Self {
        NamespaceConfig {
            auto_fallback: Some(false),
            fallback_namespace: None,
        }
    }
}

/// Effective settings of a namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceSettings {
    pub auto_fallback: bool,
    pub fallback_namespace: Option<String>,
}

impl NamespaceSettings {
    fn fallback(&self) -> Option<&str> {
        if self.auto_fallback {
            self.fallback_namespace.as_deref()
        } else {
            None
        }
    }
}

#[derive(Clone)]
struct NamespaceEntry {
    components: IndexMap<String, Rc<dyn A2uiComponent>>,
    settings: NamespaceSettings,
    plugins: Vec<ComponentPlugin>,
}

impl NamespaceEntry {
    fn new(settings: NamespaceSettings) -> Self {
        NamespaceEntry {
            components: IndexMap::new(),
            settings,
            plugins: Vec::new(),
        }
    }

    fn default_namespace() -> Self {
        Self::new(NamespaceSettings {
            auto_fallback: false,
            fallback_namespace: None,
        })
    }
}

/// Registry of component implementations by namespace.
///
/// The registry is an explicit value: hosts create one, configure it, and
/// share it with surfaces through [`super::A2uiEnvironment`].
#[derive(Clone)]
pub struct ComponentRegistry {
    namespaces: IndexMap<String, NamespaceEntry>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, entry) in &self.namespaces {
            let names: Vec<&String> = entry.components.keys().collect();
            map.entry(name, &names);
        }
        map.finish()
    }
}

impl ComponentRegistry {
    /// Create a registry with an empty `default` namespace
    pub fn new() -> Self {
        let mut namespaces = IndexMap::new();
        namespaces.insert(DEFAULT_NAMESPACE.to_string(), NamespaceEntry::default_namespace());
        ComponentRegistry { namespaces }
    }

    /// Create a registry with the standard catalog in `default`
    pub fn with_standard_catalog() -> Self {
        let mut registry = Self::new();
        registry.use_plugin(crate::widgets::standard_catalog(), DEFAULT_NAMESPACE);
        registry
    }

    /// Register (or replace) a component, creating the namespace if needed
    pub fn register(
        &mut self,
        name: impl Into<String>,
        component: Rc<dyn A2uiComponent>,
        namespace: &str,
    ) {
        self.entry_mut(namespace)
            .components
            .insert(name.into(), component);
    }

    /// Look up a component, following the namespace's fallback chain
    pub fn get(&self, name: &str, namespace: &str) -> Option<Rc<dyn A2uiComponent>> {
        let mut visited = HashSet::new();
        let mut current = namespace;
        loop {
            if !visited.insert(current) {
                ::log::warn!(
                    "[A2UI] Fallback cycle at namespace {} while looking up {}",
                    current,
                    name
                );
                return None;
            }
            let entry = self.namespaces.get(current)?;
            if let Some(component) = entry.components.get(name) {
                return Some(component.clone());
            }
            current = entry.settings.fallback()?;
        }
    }

    /// Whether `name` resolves in `namespace` (fallbacks included)
    pub fn has(&self, name: &str, namespace: &str) -> bool {
        self.get(name, namespace).is_some()
    }

    /// Create or reconfigure a namespace.
    ///
    /// Supplied fields are merged over the existing settings; a new namespace
    /// falls back to `default`.
    pub fn create_namespace(
        &mut self,
        namespace: &str,
        config: NamespaceConfig,
    ) -> Result<(), ConfigError> {
        if namespace == DEFAULT_NAMESPACE {
            return Err(ConfigError::ReservedNamespace(namespace.to_string()));
        }

        let entry = self
            .namespaces
            .entry(namespace.to_string())
            .or_insert_with(|| {
                NamespaceEntry::new(NamespaceSettings {
                    auto_fallback: true,
                    fallback_namespace: Some(DEFAULT_NAMESPACE.to_string()),
                })
            });
        if let Some(auto_fallback) = config.auto_fallback {
            entry.settings.auto_fallback = auto_fallback;
        }
        if let Some(fallback_namespace) = config.fallback_namespace {
            entry.settings.fallback_namespace = Some(fallback_namespace);
        }
        Ok(())
    }

    /// Record and run a plugin against `namespace`, creating it if needed
    pub fn use_plugin(&mut self, plugin: ComponentPlugin, namespace: &str) {
        self.entry_mut(namespace).plugins.push(plugin.clone());

        let mut cx = PluginContext {
            registry: self,
            namespace: namespace.to_string(),
        };
        plugin(&mut cx);
    }

    /// Component names visible from `namespace`: its own names in
    /// registration order, then fallback names not already listed.
    pub fn registered_components(&self, namespace: &str) -> Vec<String> {
        let mut names: IndexSet<&str> = IndexSet::new();
        let mut visited = HashSet::new();
        let mut current = Some(namespace);

        while let Some(ns) = current {
            if !visited.insert(ns) {
                break;
            }
            let Some(entry) = self.namespaces.get(ns) else {
                break;
            };
            for name in entry.components.keys() {
                names.insert(name.as_str());
            }
            current = entry.settings.fallback();
        }

        names.into_iter().map(str::to_string).collect()
    }

    /// All namespace names, in creation order
    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces.keys().cloned().collect()
    }

    /// Effective settings of a namespace
    pub fn settings(&self, namespace: &str) -> Option<&NamespaceSettings> {
        self.namespaces.get(namespace).map(|entry| &entry.settings)
    }

    /// Number of plugins applied to a namespace
    pub fn plugin_count(&self, namespace: &str) -> usize {
        self.namespaces
            .get(namespace)
            .map_or(0, |entry| entry.plugins.len())
    }

    /// Drop every namespace with its components, settings and plugin
    /// history, leaving a fresh, empty `default` namespace.
    pub fn reset(&mut self) {
        self.namespaces.clear();
        self.namespaces
            .insert(DEFAULT_NAMESPACE.to_string(), NamespaceEntry::default_namespace());
    }

    /// Discard a namespace with its components, settings and plugin history
    pub fn reset_namespace(&mut self, namespace: &str) -> Result<(), ConfigError> {
        if namespace == DEFAULT_NAMESPACE {
            return Err(ConfigError::ReservedNamespace(namespace.to_string()));
        }
        self.namespaces.shift_remove(namespace);
        Ok(())
    }

    /// Create every namespace listed in a loaded configuration
    pub fn apply_config(&mut self, config: &RegistryConfig) -> Result<(), ConfigError> {
        for (namespace, namespace_config) in &config.namespaces {
            self.create_namespace(namespace, namespace_config.clone())?;
        }
        Ok(())
    }

    fn entry_mut(&mut self, namespace: &str) -> &mut NamespaceEntry {
        if !self.namespaces.contains_key(namespace) {
            // Cannot fail: `default` always exists
            let _ = self.create_namespace(namespace, NamespaceConfig::default());
        }
        self.namespaces
            .entry(namespace.to_string())
            .or_insert_with(NamespaceEntry::default_namespace)
    }
}

/// The registry view handed to a running plugin, scoped to one namespace
pub struct PluginContext<'a> {
    registry: &'a mut ComponentRegistry,
    namespace: String,
}

impl PluginContext<'_> {
    /// Register into the plugin's namespace
    pub fn register(&mut self, name: impl Into<String>, component: Rc<dyn A2uiComponent>) {
        self.registry.register(name, component, &self.namespace);
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn A2uiComponent>> {
        self.registry.get(name, &self.namespace)
    }

    pub fn has(&self, name: &str) -> bool {
        self.registry.has(name, &self.namespace)
    }

    pub fn registered_components(&self) -> Vec<String> {
        self.registry.registered_components(&self.namespace)
    }

    /// The namespace the plugin is applied to
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// A plugin registering a single component
pub fn define_component_plugin(
    name: impl Into<String>,
    component: Rc<dyn A2uiComponent>,
) -> ComponentPlugin {
    let name = name.into();
    Rc::new(move |cx: &mut PluginContext<'_>| cx.register(name.clone(), component.clone()))
}

/// A plugin running several plugins in order
pub fn create_plugin_registry(plugins: Vec<ComponentPlugin>) -> ComponentPlugin {
    Rc::new(move |cx: &mut PluginContext<'_>| {
        for plugin in &plugins {
            plugin(cx);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2ui::renderer::RenderCx;
    use crate::a2ui::view::View;

    fn text(label: &'static str) -> Rc<dyn A2uiComponent> {
        Rc::new(move |_cx: &mut RenderCx<'_>| View::text(label))
    }

    fn same(a: &Rc<dyn A2uiComponent>, b: &Rc<dyn A2uiComponent>) -> bool {
        Rc::ptr_eq(a, b)
    }

    #[test]
    fn test_default_namespace_exists() {
        let registry = ComponentRegistry::new();
        assert_eq!(registry.namespaces(), vec![DEFAULT_NAMESPACE.to_string()]);
        assert!(!registry.settings(DEFAULT_NAMESPACE).unwrap().auto_fallback);
    }

    #[test]
    fn test_register_auto_creates_namespace() {
        let mut registry = ComponentRegistry::new();
        let base = text("base");
        registry.register("Text", base.clone(), DEFAULT_NAMESPACE);
        registry.register("Navbar", text("nav"), "tenant-a");

        let settings = registry.settings("tenant-a").unwrap();
        assert!(settings.auto_fallback);
        assert_eq!(settings.fallback_namespace.as_deref(), Some(DEFAULT_NAMESPACE));

        // Falls back to default
        assert!(same(&registry.get("Text", "tenant-a").unwrap(), &base));
        assert!(registry.get("Navbar", DEFAULT_NAMESPACE).is_none());
        assert!(registry.get("Text", "no-such-namespace").is_none());
    }

    #[test]
    fn test_two_hop_fallback_chain() {
        let mut registry = ComponentRegistry::new();
        let x = text("x");
        registry.register("X", x.clone(), DEFAULT_NAMESPACE);
        registry
            .create_namespace("mid", NamespaceConfig::default())
            .unwrap();
        registry
            .create_namespace("leaf", NamespaceConfig::fallback_to("mid"))
            .unwrap();

        assert!(same(&registry.get("X", "leaf").unwrap(), &x));
    }

    #[test]
    fn test_shadowing() {
        let mut registry = ComponentRegistry::new();
        let base = text("base");
        let custom = text("custom");
        registry.register("Text", base.clone(), DEFAULT_NAMESPACE);
        registry.register("Text", custom.clone(), "tenant");

        assert!(same(&registry.get("Text", "tenant").unwrap(), &custom));
        assert!(same(&registry.get("Text", DEFAULT_NAMESPACE).unwrap(), &base));
    }

    #[test]
    fn test_disabled_fallback() {
        let mut registry = ComponentRegistry::new();
        registry.register("Text", text("base"), DEFAULT_NAMESPACE);
        registry
            .create_namespace("island", NamespaceConfig::isolated())
            .unwrap();

        assert!(!registry.has("Text", "island"));
    }

    #[test]
    fn test_default_namespace_protection() {
        let mut registry = ComponentRegistry::new();
        assert_eq!(
            registry.create_namespace(DEFAULT_NAMESPACE, NamespaceConfig::default()),
            Err(ConfigError::ReservedNamespace(DEFAULT_NAMESPACE.to_string()))
        );
        assert_eq!(
            registry.reset_namespace(DEFAULT_NAMESPACE),
            Err(ConfigError::ReservedNamespace(DEFAULT_NAMESPACE.to_string()))
        );
    }

    #[test]
    fn test_create_namespace_merges_settings() {
        let mut registry = ComponentRegistry::new();
        registry
            .create_namespace("a", NamespaceConfig::fallback_to("b"))
            .unwrap();
        registry
            .create_namespace(
                "a",
                NamespaceConfig {
                    auto_fallback: Some(false),
                    fallback_namespace: None,
                },
            )
            .unwrap();

        let settings = registry.settings("a").unwrap();
        assert!(!settings.auto_fallback);
        assert_eq!(settings.fallback_namespace.as_deref(), Some("b"));
    }

    #[test]
    fn test_fallback_cycle_is_a_miss() {
        let mut registry = ComponentRegistry::new();
        registry
            .create_namespace("a", NamespaceConfig::fallback_to("b"))
            .unwrap();
        registry
            .create_namespace("b", NamespaceConfig::fallback_to("a"))
            .unwrap();
        registry.register("Only", text("only"), "b");

        assert!(registry.has("Only", "a"));
        assert!(!registry.has("Missing", "a"));
        assert_eq!(registry.registered_components("a"), vec!["Only".to_string()]);
    }

    #[test]
    fn test_registered_components_order_and_dedupe() {
        let mut registry = ComponentRegistry::new();
        registry.register("Text", text("t"), DEFAULT_NAMESPACE);
        registry.register("Row", text("r"), DEFAULT_NAMESPACE);
        registry.register("Navbar", text("n"), "app");
        registry.register("Text", text("t2"), "app");

        assert_eq!(
            registry.registered_components("app"),
            vec!["Navbar".to_string(), "Text".to_string(), "Row".to_string()]
        );
    }

    #[test]
    fn test_plugins() {
        let mut registry = ComponentRegistry::new();
        let seen_namespace = Rc::new(std::cell::RefCell::new(String::new()));
        let seen = seen_namespace.clone();
        let probe: ComponentPlugin = Rc::new(move |cx: &mut PluginContext<'_>| {
            *seen.borrow_mut() = cx.namespace().to_string();
            assert!(cx.has("A"));
        });

        let plugin = create_plugin_registry(vec![
            define_component_plugin("A", text("a")),
            define_component_plugin("B", text("b")),
            probe,
        ]);
        registry.use_plugin(plugin, "widgets");

        assert_eq!(*seen_namespace.borrow(), "widgets");
        assert_eq!(registry.plugin_count("widgets"), 1);
        assert!(registry.has("B", "widgets"));
    }

    #[test]
    fn test_reset() {
        let mut registry = ComponentRegistry::new();
        registry.register("Text", text("t"), DEFAULT_NAMESPACE);
        registry.register("Navbar", text("n"), "app");
        registry.use_plugin(define_component_plugin("Extra", text("e")), "app");

        registry.reset_namespace("app").unwrap();
        assert!(!registry.has("Navbar", "app"));
        assert_eq!(registry.plugin_count("app"), 0);
        assert!(!registry.namespaces().contains(&"app".to_string()));
        assert!(registry.has("Text", DEFAULT_NAMESPACE));

        registry.register("Navbar", text("n"), "tenant");
        registry.use_plugin(define_component_plugin("Extra", text("e")), "tenant");
        registry.reset();
        assert_eq!(registry.namespaces(), vec![DEFAULT_NAMESPACE.to_string()]);
        assert!(!registry.has("Text", DEFAULT_NAMESPACE));
        assert!(!registry.has("Navbar", "tenant"));
        assert_eq!(registry.plugin_count("tenant"), 0);
    }

    #[test]
    fn test_apply_config() {
        let config: RegistryConfig = serde_json::from_str(
            r#"{"namespaces": {"tenant": {"fallbackNamespace": "shared"}, "shared": {}}}"#,
        )
        .unwrap();
        let mut registry = ComponentRegistry::new();
        registry.apply_config(&config).unwrap();
        registry.register("Card", text("card"), DEFAULT_NAMESPACE);

        assert_eq!(
            registry.settings("tenant").unwrap().fallback_namespace.as_deref(),
            Some("shared")
        );
        assert!(registry.has("Card", "tenant"));
    }
}
