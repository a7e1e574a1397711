use crate::build::ElapsedTime;
use crate::presentation::ViewStateSnapshot;

/// Presentation sink. The coordinator is the only writer.
pub trait ViewStatePort: Send + Sync {
    fn publish(&self, view: &ViewStateSnapshot);
    fn publish_elapsed(&self, _ticks: &[ElapsedTime]) {}
}
