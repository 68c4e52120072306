//! Reconciliation of discovered resources into tool-managed state.
//!
//! The workflow here is the heart of the tool: it turns a discovered
//! topology into import directives and drives the provisioning tool through
//! init, one import per directive, plan, and apply. Individual import
//! failures are recorded and surfaced but never abort the batch; init, plan
//! and apply failures are fatal.

pub mod directive;
pub mod error;
pub mod script;
pub mod workflow;

pub use directive::{AddressMode, AddressingConfig, ImportDirective, directives_for};
pub use error::{ReconcileError, ReconcileResult, StepFailure};
pub use script::write_import_script;
pub use workflow::{
    ImportOutcome, ImportStatus, ReconcileOptions, ReconcileReport, ReconcileWorkflow,
};
