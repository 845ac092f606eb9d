//! # Description
//!
//! A2UI Kit is the client-side rendering core for the A2UI (Agent-to-UI)
//! protocol: agents describe interfaces as a declarative component tree plus a
//! data model, and this crate turns those messages into a live, reactive view
//! tree.
//!
//! # Features
//!
//! - Message processing with data binding, list templates and scoped paths.
//! - Namespaced component registry with fallback chains and plugins.
//! - Coalesced change notification with per-component bindings, so a data
//!   change only re-renders the components that read it.
//! - A standard catalog of adapters (`Text`, `Row`, `Button`, `TextField`, ...)
//!   producing a toolkit-neutral [`a2ui::View`].
//!
//! The crate is single-threaded: hosts drive it from their UI thread and call
//! [`a2ui::NotifyQueue::flush`] from their event loop.

pub mod a2ui;
pub mod widgets;
