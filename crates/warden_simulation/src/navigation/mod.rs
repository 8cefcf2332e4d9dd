//! Навигационный слой (headless stand-in)
//!
//! В engine-варианте MovementCommand исполнял бы NavigationAgent;
//! здесь прямолинейный кинематический драйвер: шаг к destination со
//! скоростью MovementSpeed + разворот по ходу движения. Разворот важен —
//! от forward-направления зависит конус зрения.
//!
//! Ядро путей не строит: единственное что оно читает обратно —
//! NavigationState.remaining_distance.

use bevy::prelude::*;

use crate::components::{MovementCommand, MovementSpeed, NavigationState, ARRIVAL_RADIUS};
use crate::SimulationSet;

/// Система: трансляция MovementCommand → NavigationState.destination
///
/// FollowEntity резолвится в позицию цели каждый тик (непрерывный repath).
/// Idle текущий destination НЕ сбрасывает — начатый путь довершается,
/// как это делает навигационный агент без новой команды.
pub fn refresh_destinations(
    mut movers: Query<(&MovementCommand, &mut NavigationState)>,
    positions: Query<&Transform>,
) {
    for (command, mut nav) in movers.iter_mut() {
        let destination = match command {
            MovementCommand::Idle => nav.destination,
            MovementCommand::MoveToPosition { target } => Some(*target),
            MovementCommand::FollowEntity { target } => {
                positions.get(*target).ok().map(|t| t.translation)
            }
            MovementCommand::Stop => None,
        };

        if nav.destination != destination {
            nav.destination = destination;
        }
    }
}

/// Система: кинематический шаг к destination
///
/// position += dir * min(speed · dt, dist); forward разворачивается по
/// движению (по горизонтали), но не в "зоне прибытия" — там вращением
/// владеет look-around.
pub fn drive_navigation(
    mut movers: Query<(&MovementSpeed, &mut NavigationState, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (speed, mut nav, mut transform) in movers.iter_mut() {
        let Some(destination) = nav.destination else {
            if nav.remaining_distance != 0.0 {
                nav.remaining_distance = 0.0;
            }
            continue;
        };

        let to_destination = destination - transform.translation;
        let distance = to_destination.length();

        if distance > 1e-4 {
            let direction = to_destination / distance;
            let step = (speed.speed * delta).min(distance);
            transform.translation += direction * step;

            if distance > ARRIVAL_RADIUS {
                let flat = Vec3::new(direction.x, 0.0, direction.z);
                if flat.length_squared() > 1e-6 {
                    transform.look_to(flat, Vec3::Y);
                }
            }
        }

        let remaining = transform.translation.distance(destination);
        if nav.remaining_distance != remaining {
            nav.remaining_distance = remaining;
        }
    }
}

/// Navigation Plugin
///
/// Выполняется после AI-цепочки: команды этого тика исполняются этим же
/// тиком, remaining_distance к следующему решению уже свежая.
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (refresh_destinations, drive_navigation)
                .chain()
                .in_set(SimulationSet::Navigation),
        );
    }
}
