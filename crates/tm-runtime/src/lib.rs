//! TabMagic Runtime
//!
//! Everything between browser events and page mutations: persistence,
//! appearance reconciliation, the periodic sweep schedule and event
//! routing. Browser APIs are injected through the traits in `platform`.
//!
//! # Modules
//!
//! - `keys`: Persistence schema
//! - `store`: `Store` trait plus typed override and settings accessors
//! - `platform`: Collaborator traits (page, tabs, timer, dialog)
//! - `reconcile`: Appearance planning and application, full sweeps
//! - `schedule`: Sweep interval to timer registration
//! - `tabs`: Last known URL per tab
//! - `router`: Event dispatch
//! - `preview`: Rule preview for the settings page
//! - `memory`: In-memory store and platform
//! - `config`: Runtime configuration

pub mod config;
pub mod error;
pub mod keys;
pub mod memory;
pub mod platform;
pub mod preview;
pub mod reconcile;
pub mod router;
pub mod schedule;
pub mod store;
pub mod tabs;

pub use config::{RemovalPolicy, RuntimeConfig, INTERVAL_PRESETS};
pub use error::{Error, Result};
pub use memory::{MemoryPlatform, MemoryStore, PlatformCall};
pub use platform::{ConfigDialog, DialogOutcome, DialogRequest, PageMutator, Platform, TabControl, TabInventory, Timer};
pub use preview::{preview_tabs, preview_url, PreviewEntry};
pub use reconcile::{plan_appearance, AppearancePlan, PlanSource, Reconciler, SweepReport};
pub use router::{ConfigureOutcome, Event, EventRouter, Outcome};
pub use schedule::{ScheduleController, ScheduleState};
pub use store::{Settings, Store};
pub use tabs::TabTable;
