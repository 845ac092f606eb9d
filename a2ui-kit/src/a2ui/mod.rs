//! A2UI Protocol Implementation
//!
//! A2UI (Agent-to-UI) is a declarative JSON protocol for AI agents to generate
//! rich, interactive UIs. This module implements the client-side rendering
//! core: message processing, bound-value resolution, change notification and
//! the namespaced component registry.
//!
//! # Architecture
//!
//! ```text
//! A2UI JSON Messages
//!        ↓
//! A2uiMessageProcessor
//!        ↓
//! ObservedProcessor ──→ ChangeEmitter ──→ NotifyQueue
//!        ↓                    ↓
//! ComponentNode tree    ValueBinding / A2uiSurface
//!                             ↓
//!              ComponentRegistry → A2uiComponent
//!                             ↓
//!                            View
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use a2ui_kit::a2ui::*;
//!
//! let queue = NotifyQueue::new();
//! let processor = ObservedProcessor::new(A2uiMessageProcessor::new(), queue.spawner());
//! let env = A2uiEnvironment::new(processor.clone(), ComponentRegistry::with_standard_catalog());
//! let mut surface = A2uiSurface::new(&env, "main", SurfaceOptions::default());
//!
//! let json = r#"{"beginRendering": {"surfaceId": "main", "root": "root"}}"#;
//! processor.process_json(json)?;
//! queue.flush();
//! println!("{}", surface.render().to_markup());
//! ```

mod action;
mod binding;
mod config;
mod data_model;
mod emitter;
mod error;
mod message;
mod node;
mod processor;
mod registry;
mod renderer;
mod surface;
mod value;
mod view;

pub use action::*;
pub use binding::*;
pub use config::*;
pub use data_model::*;
pub use emitter::*;
pub use error::*;
pub use message::*;
pub use node::*;
pub use processor::*;
pub use registry::*;
pub use renderer::{A2uiComponent, ActionEmitter, RenderCx, State};
pub use surface::*;
pub use value::*;
pub use view::*;
