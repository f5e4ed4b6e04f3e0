//! Service layer
//!
//! Services contain the workflow logic of the runner. They combine the
//! repository with poll sessions to move a DOE job from upload to stop.
//!
//! Services take their collaborators as trait objects to enable testing.

mod monitor;
mod summary_sink;
mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use monitor::JobMonitor;
pub use summary_sink::{InMemorySummarySink, SummarySink, TracingSummarySink};
pub use workflow::{DoeWorkflow, WorkflowReport};
