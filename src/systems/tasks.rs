//! Scheduled task runner.
//!
//! Runs every pending [`Task`](crate::resources::scheduler::Task) once per
//! tick. The list is walked back to front and finished tasks are removed in
//! place; tasks queued during the pass are appended after the survivors and
//! first run on the next tick.

use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::scheduler::{TaskScheduler, TaskStatus};
use crate::resources::worldtime::WorldTime;

pub fn run_scheduled_tasks(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    let (mut tasks, generation) = {
        let mut scheduler = world.resource_mut::<TaskScheduler>();
        let generation = scheduler.generation;
        (std::mem::take(&mut scheduler.tasks), generation)
    };
    if tasks.is_empty() {
        return;
    }

    let mut i = tasks.len();
    while i > 0 {
        i -= 1;
        if tasks[i].step(world, dt) == TaskStatus::Done {
            tasks.remove(i);
        }
        if world.resource::<TaskScheduler>().generation != generation {
            debug!("Task list cleared mid-pass, dropping {} survivors", tasks.len());
            return;
        }
    }

    let mut scheduler = world.resource_mut::<TaskScheduler>();
    let queued = std::mem::take(&mut scheduler.tasks);
    tasks.extend(queued);
    scheduler.tasks = tasks;
}
