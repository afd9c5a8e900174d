//! # caravel-provision
//!
//! vApp provisioning orchestration for the Caravel lifecycle manager.
//!
//! This crate takes a machine's provider configuration and drives the
//! remote cloud endpoint until the machine exists as a VM inside a vApp:
//!
//! ```text
//! ProviderConfig ──▶ caravel_net::plan ──▶ NetworkPlan
//!                                              │
//!                                              ▼
//!                  ┌──────────────────────────────────────────┐
//!                  │            Provisioner::run              │
//!                  │                                          │
//!                  │  no vapp id ──▶ compose_vapp             │
//!                  │  vapp id set ─▶ recompose_vapp           │
//!                  │        │                                 │
//!                  │        ▼                                 │
//!                  │  task::wait_checked (remote task)        │
//!                  │        │                                 │
//!                  │        ▼                                 │
//!                  │  get_vapp ──▶ reconcile VM id            │
//!                  │        │                                 │
//!                  │        ▼                                 │
//!                  │  guest customization + wait              │
//!                  └──────────────────────────────────────────┘
//!                                              │
//!                                              ▼
//!                              ProvisionOutcome (next pipeline step)
//! ```
//!
//! The remote endpoint is reached through the [`CloudDriver`] trait; the
//! machine's durable identity lives behind [`MachineHandle`]. Both are
//! injected, so the whole flow is testable against in-memory fakes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use caravel_common::ProviderConfig;
//! use caravel_provision::{LogReporter, MachineRecord, Provisioner};
//!
//! # async fn example(driver: &dyn caravel_provision::CloudDriver) -> caravel_common::Result<()> {
//! let config = ProviderConfig::from_file("caravel.toml").expect("config");
//! let reporter = LogReporter;
//! let mut machine = MachineRecord::new("web-1");
//!
//! let provisioner = Provisioner::new(driver, &reporter, &config);
//! let outcome = provisioner.run(&mut machine).await?;
//! println!("VM {} lives in vApp {}", outcome.vm_id, outcome.vapp_name);
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod machine;
pub mod models;
pub mod naming;
pub mod provisioner;
pub mod report;
pub mod task;

// Re-export main types
pub use driver::CloudDriver;
pub use machine::{MachineHandle, MachineRecord};
pub use models::{ComposeStarted, GuestCustomization, RemoteTask, TaskStatus, VApp, VmRef};
pub use provisioner::{ProvisionAction, ProvisionOutcome, Provisioner};
pub use report::{report_result, LogReporter, ProgressReporter};
