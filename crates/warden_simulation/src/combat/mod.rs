//! Combat module
//!
//! ECS ответственность:
//! - Game state: Health, Attacker timestamps
//! - Events: AttackStarted, DamageDealt, EntityDied
//!
//! Разрешение урона ПО цели — вне ядра: мы только эмитим AttackStarted,
//! внешние combat/animation системы решают что с ним делать. Входящий урон
//! приходит событием DamageDealt от внешних систем.

use bevy::prelude::*;

pub mod attacker;
pub mod damage;

// Re-export основных типов
pub use attacker::{ai_attack_execution, AttackStarted, Attacker};
pub use damage::{
    apply_damage, despawn_after_timeout, DamageDealt, DespawnAfter, EntityDied, DEATH_LINGER_SECS,
};

use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
/// Порядок выполнения:
/// 1. apply_damage — входящие DamageDealt → Health (смерть увидит FSM)
/// 2. despawn_after_timeout — уборка трупов по таймеру
///
/// ai_attack_execution живёт в AI-цепочке: атака — решение FSM.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackStarted>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            (apply_damage, despawn_after_timeout)
                .chain() // Последовательное выполнение
                .in_set(SimulationSet::Combat),
        );
    }
}
