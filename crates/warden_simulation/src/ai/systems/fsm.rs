//! FSM AI systems (state transitions)

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::ai::{AIConfig, AIState, LookAround, LOOK_AROUND_PAUSE, LOOK_AROUND_TURNS};
use crate::combat::{DespawnAfter, EntityDied, DEATH_LINGER_SECS};
use crate::components::{Health, NavigationState, PatrolRoute, Quarry, Warden, ARRIVAL_RADIUS};
use crate::perception::{can_hear, can_see, Occluder, OccluderSphere};

/// Система: одноразовая проверка свежих Quarry-ссылок
///
/// Ссылка на цель резолвится при спавне; если entity за ней не существует,
/// предупреждаем один раз. Дальше страж просто патрулирует — оба канала
/// перцепции при промахе запроса молчат.
pub fn warn_unresolved_quarry(
    fresh: Query<(Entity, &Quarry), Added<Quarry>>,
    positions: Query<&Transform>,
) {
    for (entity, quarry) in fresh.iter() {
        if positions.get(quarry.target).is_err() {
            crate::log_warning(&format!(
                "{:?}: quarry {:?} не найден — Chase/Attack/Search недостижимы",
                entity, quarry.target
            ));
        }
    }
}

/// Система: AI FSM transitions
///
/// Единственное место где пишется AIState. Каждый тик:
/// 1. health ≤ 0 → Dead из любого состояния (ровно один раз, с death-эффектами)
/// 2. перцепция цели (see/hear) пересчитывается заново
/// 3. таблица переходов текущего состояния
///
/// Entry-эффекты Dead (halt делает movement система, death event и despawn
/// таймер — здесь) выполняются только на ребре перехода.
pub fn ai_fsm_transitions(
    mut commands: Commands,
    mut wardens: Query<
        (
            Entity,
            &mut AIState,
            &AIConfig,
            &Health,
            &Quarry,
            &mut Transform,
            &mut PatrolRoute,
            &NavigationState,
        ),
        With<Warden>,
    >,
    targets: Query<&Transform, Without<Warden>>,
    occluders: Query<(Entity, &Transform, &Occluder), Without<Warden>>,
    mut died_events: EventWriter<EntityDied>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    // Снимок occluder'ов один раз на тик — луч общий для всех стражей
    let spheres: Vec<OccluderSphere> = occluders
        .iter()
        .map(|(entity, transform, occluder)| (entity, transform.translation, occluder.radius))
        .collect();

    for (entity, mut state, config, health, quarry, mut transform, mut route, nav) in
        wardens.iter_mut()
    {
        if matches!(*state, AIState::Dead) {
            // Терминальное состояние — не переключаемся
            continue;
        }

        // Смерть приоритетнее любой другой логики
        if !health.is_alive() {
            crate::log(&format!("💀 {:?} → Dead", entity));
            died_events.write(EntityDied { entity });
            commands.entity(entity).insert(DespawnAfter {
                despawn_at: now + DEATH_LINGER_SECS,
            });
            *state = AIState::Dead;
            continue;
        }

        let quarry_pos = targets.get(quarry.target).ok().map(|t| t.translation);

        // Перцепция: без цели в мире оба канала молчат
        let (sees, hears) = match quarry_pos {
            Some(pos) => (
                can_see(
                    transform.translation,
                    *transform.forward(),
                    quarry.target,
                    pos,
                    config,
                    &spheres,
                ),
                can_hear(transform.translation, pos, config),
            ),
            None => (false, false),
        };

        let new_state = match &*state {
            AIState::Patrol => {
                if sees || hears {
                    crate::log(&format!("⚔️ {:?} Patrol → Chase", entity));
                    AIState::Chase
                } else {
                    // Waypoint advance по прибытию; destination выдаёт
                    // movement система только при смене waypoint'а
                    if !route.is_empty() && nav.remaining_distance < ARRIVAL_RADIUS {
                        route.advance();
                    }
                    AIState::Patrol
                }
            }

            AIState::Chase => match quarry_pos {
                Some(pos) => {
                    if transform.translation.distance(pos) <= config.attack_range {
                        crate::log(&format!("🗡️ {:?} Chase → Attack", entity));
                        AIState::Attack
                    } else if !sees && !hears {
                        // Фиксируем позицию цели в момент потери
                        crate::log(&format!("👻 {:?} Chase → Search ({:?})", entity, pos));
                        AIState::Search {
                            last_known_position: pos,
                            started_at: now,
                            look_around: None,
                        }
                    } else {
                        AIState::Chase
                    }
                }
                None => {
                    // Цель исчезла из мира — преследовать нечего
                    crate::log(&format!("🚶 {:?} Chase → Patrol (quarry исчез)", entity));
                    AIState::Patrol
                }
            },

            AIState::Attack => match quarry_pos {
                Some(pos) if transform.translation.distance(pos) > config.attack_range => {
                    AIState::Chase
                }
                Some(_) => AIState::Attack,
                None => {
                    crate::log(&format!("🚶 {:?} Attack → Patrol (quarry исчез)", entity));
                    AIState::Patrol
                }
            },

            AIState::Search {
                last_known_position,
                started_at,
                look_around,
            } => {
                let last_known = *last_known_position;
                let started = *started_at;

                if sees {
                    crate::log(&format!("👁️ {:?} Search → Chase (увидел)", entity));
                    AIState::Chase
                } else if let Some(la) = look_around {
                    // Серия оборотов в процессе: прерывается только зрением,
                    // слух и таймаут ждут её завершения
                    let mut la = *la;
                    if now >= la.turn_ends_at {
                        if la.turns_done < LOOK_AROUND_TURNS {
                            transform.rotate_y(-FRAC_PI_2);
                            la.turns_done += 1;
                            la.turn_ends_at = now + LOOK_AROUND_PAUSE;
                            AIState::Search {
                                last_known_position: last_known,
                                started_at: started,
                                look_around: Some(la),
                            }
                        } else {
                            // Серия закончена — в этом же тике обычные проверки
                            search_fallthrough(entity, last_known, started, now, hears, config)
                        }
                    } else {
                        // Пауза между оборотами ещё идёт
                        AIState::Search {
                            last_known_position: last_known,
                            started_at: started,
                            look_around: Some(la),
                        }
                    }
                } else if nav.remaining_distance < ARRIVAL_RADIUS {
                    // Дошли до последней известной точки — оглядываемся
                    transform.rotate_y(-FRAC_PI_2);
                    AIState::Search {
                        last_known_position: last_known,
                        started_at: started,
                        look_around: Some(LookAround {
                            turns_done: 1,
                            turn_ends_at: now + LOOK_AROUND_PAUSE,
                        }),
                    }
                } else {
                    search_fallthrough(entity, last_known, started, now, hears, config)
                }
            }

            // Dead отфильтрован в начале итерации
            AIState::Dead => continue,
        };

        if *state != new_state {
            *state = new_state;
        }
    }
}

/// Проверки Search вне look-around серии: слух → Chase, таймаут → Patrol
fn search_fallthrough(
    entity: Entity,
    last_known: Vec3,
    started: f32,
    now: f32,
    hears: bool,
    config: &AIConfig,
) -> AIState {
    if hears {
        crate::log(&format!("👂 {:?} Search → Chase (услышал)", entity));
        AIState::Chase
    } else if now - started > config.search_duration {
        crate::log(&format!("🚶 {:?} Search → Patrol (таймаут поиска)", entity));
        AIState::Patrol
    } else {
        AIState::Search {
            last_known_position: last_known,
            started_at: started,
            look_around: None,
        }
    }
}
