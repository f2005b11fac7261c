//! Schedule resolution engine for workforce shift planning.
//!
//! Pure logic for a shift-scheduling system: weekly templates of who
//! works when, ad-hoc per-date assignments, team-level defaults that
//! cascade to members, and per-employee check-in/check-out overrides.
//! Persistence and rendering are external collaborators — this crate has
//! no network, file, or CLI surface.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `TimeSlot`, `WeeklySchedule`, `Team`,
//!   `Employee`, `ShiftTemplate`, `Assignment`, `ShiftException`,
//!   `Holiday`, `ComputedSchedule`
//! - **`resolver`**: Immutable mutations of a draft day's slot list
//!   (toggle, extend, individual checkout, team removal with cascade)
//! - **`status`**: Read-only classification — check-in/out/continuation
//!   dots and missing-checkout derivation
//! - **`controller`**: The interactive state machine sequencing clicks
//!   into resolver calls, with explicit conflict resolution
//! - **`compiler`**: Merges templates, assignments, and exceptions over a
//!   date range into conflict-annotated schedule items
//! - **`planner`**: Pure planning of template-to-dates application
//!   batches
//! - **`summary`**: Per-date coverage headcounts
//! - **`validation`**: Collected integrity reports (never thrown)
//!
//! # Data Flow
//!
//! Compiled path: raw records → [`compiler::compile`] →
//! `ComputedSchedule` items → rendering. Editable path: UI click →
//! [`controller::TemplateAssignmentController`] → [`resolver`] → mutated
//! `WeeklySchedule` draft → [`status`] for display.
//!
//! All logic is synchronous, single-threaded, pure computation over
//! already-loaded in-memory collections.

pub mod compiler;
pub mod controller;
pub mod error;
pub mod models;
pub mod planner;
pub mod resolver;
pub mod status;
pub mod summary;
pub mod time;
pub mod validation;
