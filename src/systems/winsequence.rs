//! Getaway drive played after the player wins.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::props::{CAR_ACCELERATION, CAR_CRANK_TIME, CAR_TOP_SPEED, Car};
use crate::components::transform::Transform;
use crate::events::cue::{WorldCue, emit_cue};
use crate::resources::worldflags::WorldFlags;
use crate::resources::worldtime::WorldTime;

/// Wheel spin per meter travelled.
const WHEEL_SPIN: f32 = 3.0;

pub fn win_sequence_system(time: Res<WorldTime>, mut cars: Query<(&mut Car, &mut Transform)>) {
    for (mut car, mut transform) in cars.iter_mut() {
        step_car(&mut car, &mut transform, time.delta);
    }
}

pub fn step_car(car: &mut Car, transform: &mut Transform, dt: f32) {
    if !car.driving {
        return;
    }
    car.timer += dt;
    if car.timer <= CAR_CRANK_TIME {
        return;
    }
    car.speed = (car.speed + dt * CAR_ACCELERATION).min(CAR_TOP_SPEED);
    transform.translation += Car::HEADING * car.speed * dt;
    car.wheel_angle += car.speed * dt * WHEEL_SPIN;
}

/// Start the ending: mark the world as won and start every car.
pub fn start_win_sequence(world: &mut World) {
    if world.resource::<WorldFlags>().won {
        return;
    }
    world.resource_mut::<WorldFlags>().won = true;
    let mut cars = world.query::<&mut Car>();
    for mut car in cars.iter_mut(world) {
        car.driving = true;
        car.timer = 0.0;
    }
    info!("Win sequence started");
    emit_cue(world, WorldCue::EngineStart);
}
