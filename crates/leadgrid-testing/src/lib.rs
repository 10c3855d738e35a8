//! Testing infrastructure for leadgrid tests.
//!
//! - `fixtures`: sample leads, departments, options and users
//! - `fakes`: in-memory gateways, relays and interaction ports
//! - `assertions`: notification and grid checks with readable failures
//! - `TestWorld`: isolated data directory for CLI integration tests

pub mod assertions;
pub mod fakes;
pub mod fixtures;
pub mod world;

pub use fakes::{
    CountingTabLoader, FakeDepartmentGateway, FakeLeadGateway, FixedConfirmer, MemoryClipboard,
    RecordingRelay, ScriptedApiClient,
};
pub use fixtures::LeadBuilder;
pub use world::TestWorld;
