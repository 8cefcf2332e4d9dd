//! Attacker component — cooldown атак по монотонным timestamp'ам

use bevy::prelude::*;

use crate::ai::AIState;
use crate::components::{Quarry, Warden};

/// Attacker — способность стража наносить удары
///
/// Cooldown считается сравнением с timestamp'ом последнего удара,
/// а не тикающим таймером: "никогда не бил" — None.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Cooldown между атаками (секунды)
    pub attack_cooldown: f32,

    /// Момент последнего удара (монотонные секунды симуляции)
    pub last_attack_at: Option<f32>,
}

impl Default for Attacker {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Attacker {
    pub fn new(attack_cooldown: f32) -> Self {
        Self {
            attack_cooldown,
            last_attack_at: None,
        }
    }

    /// Готова ли атака: прошло ≥ cooldown (граница включительно)
    pub fn ready_at(&self, now: f32) -> bool {
        match self.last_attack_at {
            None => true,
            Some(t) => now - t >= self.attack_cooldown,
        }
    }

    /// Зафиксировать удар
    pub fn mark_attack(&mut self, now: f32) {
        self.last_attack_at = Some(now);
    }
}

/// Событие: страж произвёл атаку
///
/// Потребляется внешними animation/combat системами; само ядро урон
/// цели не применяет.
#[derive(Event, Debug, Clone)]
pub struct AttackStarted {
    pub attacker: Entity,
    pub target: Entity,
}

/// Система: AI attack execution
///
/// Генерирует AttackStarted когда страж в Attack state и cooldown готов.
pub fn ai_attack_execution(
    mut wardens: Query<(Entity, &AIState, &Quarry, &mut Attacker), With<Warden>>,
    mut attack_events: EventWriter<AttackStarted>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, state, quarry, mut attacker) in wardens.iter_mut() {
        if !matches!(state, AIState::Attack) {
            continue;
        }

        if attacker.ready_at(now) {
            attack_events.write(AttackStarted {
                attacker: entity,
                target: quarry.target,
            });
            attacker.mark_attack(now);
            crate::log(&format!("🗡️ {:?} бьёт {:?}", entity, quarry.target));
        }
    }
}
