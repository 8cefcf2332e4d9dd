//! AI movement systems.

use bevy::prelude::*;

use crate::ai::{AIConfig, AIState};
use crate::components::{MovementCommand, MovementSpeed, PatrolRoute, Quarry, Warden};

/// Система: AI movement from state
///
/// Конвертирует AIState → MovementCommand + MovementSpeed. Пишем только при
/// фактической смене значения — иначе Changed<MovementCommand> спамит, а
/// Search потерял бы семантику "destination выдаётся один раз на входе".
/// Скорость трогают только Patrol и Chase; Attack/Search едут на той,
/// что осталась от предыдущего состояния.
pub fn ai_movement_from_state(
    mut wardens: Query<
        (
            &AIState,
            &AIConfig,
            &Quarry,
            &PatrolRoute,
            &mut MovementCommand,
            &mut MovementSpeed,
        ),
        With<Warden>,
    >,
) {
    for (state, config, quarry, route, mut command, mut speed) in wardens.iter_mut() {
        match state {
            AIState::Patrol => {
                if speed.speed != config.patrol_speed {
                    speed.speed = config.patrol_speed;
                }

                match route.current_waypoint() {
                    Some(waypoint) => {
                        if !matches!(*command, MovementCommand::MoveToPosition { target } if target == waypoint)
                        {
                            *command = MovementCommand::MoveToPosition { target: waypoint };
                        }
                    }
                    None => {
                        // Пустой маршрут — патрулирование отключено
                        if !matches!(*command, MovementCommand::Idle) {
                            *command = MovementCommand::Idle;
                        }
                    }
                }
            }

            AIState::Chase => {
                if speed.speed != config.chase_speed {
                    speed.speed = config.chase_speed;
                }

                // Непрерывный repath: навигация резолвит позицию цели каждый тик
                if !matches!(*command, MovementCommand::FollowEntity { target } if target == quarry.target)
                {
                    *command = MovementCommand::FollowEntity {
                        target: quarry.target,
                    };
                }
            }

            AIState::Attack => {
                // Стоим на месте во время атаки
                if !matches!(*command, MovementCommand::Stop) {
                    *command = MovementCommand::Stop;
                }
            }

            AIState::Search {
                last_known_position,
                ..
            } => {
                // Entry-эффект Search: выдаётся один раз благодаря сравнению
                if !matches!(*command, MovementCommand::MoveToPosition { target } if target == *last_known_position)
                {
                    *command = MovementCommand::MoveToPosition {
                        target: *last_known_position,
                    };
                }
            }

            AIState::Dead => {
                // Halt немедленно и навсегда
                if !matches!(*command, MovementCommand::Stop) {
                    *command = MovementCommand::Stop;
                }
            }
        }
    }
}
