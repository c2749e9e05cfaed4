//! Application services for the task registry.

mod registry;

pub use registry::{
    TaskDetailsRequest, TaskRegistryError, TaskRegistryResult, TaskRegistryService,
};
pub(crate) use registry::classify_repository;
