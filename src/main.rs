//! Command-line A2UI host.
//!
//! Loads protocol messages from a JSON file, renders one surface with the
//! standard catalog and prints the result as markup.

use std::path::PathBuf;
use std::rc::Rc;

use a2ui_kit::a2ui::{
    A2uiEnvironment, A2uiMessage, A2uiMessageProcessor, A2uiSurface, ComponentRegistry,
    DEFAULT_NAMESPACE, NotifyQueue, ObservedProcessor, RegistryConfig, SurfaceOptions,
    UserActionMessage, parse_messages,
};
use anyhow::{Context, Result, bail};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "a2ui")]
#[command(about = "Render an A2UI surface from a file of protocol messages")]
struct HostConfig {
    /// JSON file with one message or an array of messages
    messages: PathBuf,

    /// Surface to render (defaults to the first surface in the file)
    #[arg(long, env = "A2UI_SURFACE")]
    surface: Option<String>,

    /// Registry namespace to render in
    #[arg(long, env = "A2UI_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Registry configuration (namespaces and fallbacks)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl HostConfig {
    /// The surface to render: the configured one, else the first one named
    /// by a message.
    fn surface_id(&self, messages: &[A2uiMessage]) -> Option<String> {
        self.surface
            .clone()
            .or_else(|| messages.first().map(|m| m.surface_id().to_string()))
    }
}

fn load_registry(config: Option<&PathBuf>) -> Result<ComponentRegistry> {
    let mut registry = ComponentRegistry::with_standard_catalog();
    if let Some(path) = config {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading registry config {}", path.display()))?;
        let config = RegistryConfig::from_json(&json)
            .with_context(|| format!("parsing registry config {}", path.display()))?;
        registry.apply_config(&config)?;
    }
    Ok(registry)
}

fn run(config: HostConfig) -> Result<String> {
    let json = std::fs::read_to_string(&config.messages)
        .with_context(|| format!("reading {}", config.messages.display()))?;
    let messages = parse_messages(&json)
        .with_context(|| format!("parsing messages in {}", config.messages.display()))?;
    let Some(surface_id) = config.surface_id(&messages) else {
        bail!("{} contains no messages", config.messages.display());
    };
    ::log::info!(
        "[A2UI] Rendering surface {} from {} message(s)",
        surface_id,
        messages.len()
    );

    let registry = load_registry(config.config.as_ref())?;
    let queue = NotifyQueue::new();
    let processor = ObservedProcessor::new(A2uiMessageProcessor::new(), queue.spawner());
    let env = A2uiEnvironment::new(processor, registry).with_namespace(config.namespace);

    let mut surface = A2uiSurface::new(
        &env,
        surface_id,
        SurfaceOptions {
            initial_messages: messages,
            on_user_action: Some(Rc::new(|message: UserActionMessage| {
                match serde_json::to_string(&message) {
                    Ok(json) => ::log::info!("[A2UI] User action: {}", json),
                    Err(e) => ::log::error!("[A2UI] Cannot serialize user action: {}", e),
                }
            })),
            on_surface_missing: Some(Rc::new(|id: &str| {
                ::log::warn!("[A2UI] Surface {} was deleted", id)
            })),
            ..Default::default()
        },
    );
    queue.flush();

    Ok(surface.render().to_markup())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = HostConfig::parse();
    let markup = run(config)?;
    print!("{}", markup);
    Ok(())
}
