//! Hooks into the world's fixed step.

/// Watches each stage of [`World::step`](crate::world::World::step).
///
/// Every hook defaults to doing nothing, so an observer only implements what it
/// cares about. Hooks are called synchronously from inside the step and must not
/// block.
pub trait StepObserver {
    /// Gravity was applied and `bodies` bodies were moved by Verlet integration.
    fn on_integrate(&mut self, _bodies: usize) {}

    /// Constraint pass `iteration` (0-based) finished.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Contacts were separated and bounced. `count` touching pairs were found.
    fn on_contacts(&mut self, _count: usize) {}

    /// Step number `step` (1-based, since the last clear) is done.
    fn on_step_complete(&mut self, _step: u64) {}
}

/// Ignores every hook.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}

/// Running totals over any number of steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub steps: u64,
    pub contacts: usize,
    /// Most contacts seen in a single step.
    pub peak_contacts: usize,
    pub constraint_passes: usize,
}

impl StepObserver for StepStats {
    fn on_constraint_iteration(&mut self, _iteration: usize) {
        self.constraint_passes += 1;
    }

    fn on_contacts(&mut self, count: usize) {
        self.contacts += count;
        self.peak_contacts = self.peak_contacts.max(count);
    }

    fn on_step_complete(&mut self, _step: u64) {
        self.steps += 1;
    }
}
