//! Remesh scheduling and the edit-facing world container.
#![forbid(unsafe_code)]

mod container;
mod distributor;
mod remesh;

pub use container::{ContainerError, EditSummary, WorldContainer};
pub use distributor::{Distributor, StandardDistributor};
pub use remesh::{
    RemeshError, RemeshFailure, RemeshHandler, RemeshOutcome, RemeshReport, RemeshStage,
};
