//! # Core Application Logic
//!
//! This module contains QueryDesk's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!            ┌────────────┐            ┌────────────┐
//!            │    TUI     │            │    API     │
//!            │  Adapter   │            │  (HTTP)    │
//!            │ (ratatui)  │            │            │
//!            └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and `update()` reducer
//! - [`discussion`]: The query/response transcript
//! - [`staging`]: Files picked for upload
//! - [`config`]: Settings and their override order

pub mod action;
pub mod config;
pub mod discussion;
pub mod staging;
pub mod state;
