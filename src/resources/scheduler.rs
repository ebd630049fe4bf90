//! Cooperative task scheduler.
//!
//! Anything that changes gradually over several frames (door swings, a
//! falling key, the webs burning away) is a [`Task`]: a stateful step
//! function called once per tick until it reports [`TaskStatus::Done`].
//! Tasks are run by [`run_scheduled_tasks`](crate::systems::tasks::run_scheduled_tasks).
//!
//! There is no per-task cancellation; [`TaskScheduler::clear`] drops every
//! pending task at once, which is what world teardown uses.

use bevy_ecs::prelude::{Resource, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    Done,
}

/// A resumable unit of work stepped once per tick.
pub trait Task: Send + Sync + 'static {
    fn step(&mut self, world: &mut World, dt: f32) -> TaskStatus;
}

impl<F> Task for F
where
    F: FnMut(&mut World, f32) -> TaskStatus + Send + Sync + 'static,
{
    fn step(&mut self, world: &mut World, dt: f32) -> TaskStatus {
        self(world, dt)
    }
}

#[derive(Resource, Default)]
pub struct TaskScheduler {
    pub(crate) tasks: Vec<Box<dyn Task>>,
    /// Bumped by [`clear`](Self::clear) so a pass in progress can tell its
    /// survivors were discarded.
    pub(crate) generation: u64,
}

impl TaskScheduler {
    /// Queue a task. Tasks queued while a pass is running first run on the
    /// next tick.
    pub fn spawn(&mut self, task: impl Task) {
        self.tasks.push(Box::new(task));
    }

    /// Drop every pending task, including the ones of a pass in progress.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of queued tasks. During a pass this only counts tasks queued
    /// by that pass.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Task running `action` once, `seconds` after it is queued.
pub fn after<F>(seconds: f32, action: F) -> impl Task
where
    F: FnOnce(&mut World) + Send + Sync + 'static,
{
    let mut remaining = seconds;
    let mut action = Some(action);
    move |world: &mut World, dt: f32| {
        remaining -= dt;
        if remaining > 0.0 {
            return TaskStatus::Continue;
        }
        if let Some(action) = action.take() {
            action(world);
        }
        TaskStatus::Done
    }
}
