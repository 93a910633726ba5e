//! ProgressSink port - staged-progress signalling
//!
//! Each named stage reports `Processing` before it starts and `Completed`
//! (or `Failed`) before the next one begins.

use crate::domain::PipelineStep;

pub trait ProgressSink: Send + Sync {
    fn report(&self, step: &PipelineStep);
}

impl<S: ProgressSink + ?Sized> ProgressSink for std::sync::Arc<S> {
    fn report(&self, step: &PipelineStep) {
        (**self).report(step)
    }
}
