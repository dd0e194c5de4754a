//! City Planner
//!
//! Client side of an urban infrastructure planning tool. The optimization
//! itself runs in a separate backend; this crate loads the city graph,
//! sends optimization requests and turns the responses into map overlays
//! and result panels.
//!
//! # Domain Model
//!
//! - [`Location`](domain::Location): neighborhood or facility with a coordinate
//! - [`Road`](domain::Road): existing or candidate road between two locations
//! - [`GraphSnapshot`](snapshot::GraphSnapshot): the loaded city graph
//!
//! # Views
//!
//! Five independent map views (network, route, emergency, transport,
//! signals), each created on first use. Every overlay on a view is either
//! context (drawn once) or result (replaced on every redraw).
//!
//! # Operations
//!
//! [`RequestOrchestrator`](orchestrator::RequestOrchestrator) runs the five
//! optimizations against a [`Backend`](client::Backend) and applies each
//! response to its view and panel.

pub mod api;
pub mod client;
pub mod config;
pub mod console;
#[cfg(test)]
pub(crate) mod demo_data;
pub mod domain;
pub mod dto;
pub mod error;
pub mod geometry;
pub mod orchestrator;
pub mod overlay;
pub mod presenter;
pub mod render;
pub mod snapshot;
pub mod surface;
pub mod view;
