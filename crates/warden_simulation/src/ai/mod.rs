//! AI decision-making module
//!
//! FSM стража: Patrol → Chase → Attack/Search → Patrol, Dead терминально.
//! Решения принимаются раз в тик; перцепция пересчитывается заново без
//! кэширования.

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::{AIConfig, AIState, LookAround, LOOK_AROUND_PAUSE, LOOK_AROUND_TURNS};
pub use systems::{ai_fsm_transitions, ai_movement_from_state, warn_unresolved_quarry};

use crate::combat::ai_attack_execution;
use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. warn_unresolved_quarry — одноразовая проверка свежих Quarry-ссылок
/// 2. ai_fsm_transitions — обновление FSM state (единственный писатель AIState)
/// 3. ai_movement_from_state — конвертация state → MovementCommand
/// 4. ai_attack_execution — генерация AttackStarted по cooldown'у
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                warn_unresolved_quarry,
                ai_fsm_transitions,
                ai_movement_from_state,
                ai_attack_execution,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Decision),
        );
    }
}
