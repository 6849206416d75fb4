//! Sukhii: a scheduling engine for recurring maintenance activities.
//!
//! Decides, for a given day, which activities are due or overdue, whether
//! their prerequisites are satisfied, and which ledger entries a late
//! completion must write.
//!
//! # Architecture
//!
//! - **Activity**: definitions with a structured recurrence rule
//!   ([`activity`]), including decoding of legacy text-encoded rules
//! - **Ledger**: append-only completion events behind the
//!   [`CompletionLedger`] trait ([`ledger`])
//! - **Schedule**: pure matching, dependency gating, and overdue/backfill
//!   computation ([`schedule`])
//! - **Host**: the persisted activity table ([`store`]) and the
//!   [`Tracker`] that ties a snapshot to a ledger ([`tracker`])

pub mod activity;
pub mod config;
pub mod error;
pub mod ledger;
pub mod paths;
pub mod schedule;
pub mod store;
pub mod tracker;

pub use activity::{Activity, Recurrence, RecurrenceKind, ScheduleKind};
pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use ledger::{CompletionLedger, CompletionNote, JsonlLedger, LedgerEntry, MemoryLedger};
pub use store::{ActivityEdit, ActivityStore, NewActivity};
pub use tracker::{AgendaFilter, AgendaItem, Tracker};
