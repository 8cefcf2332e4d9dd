//! Входящий урон и death lifecycle

use bevy::prelude::*;

use crate::components::Health;

/// Сколько секунд труп остаётся в мире до удаления
pub const DEATH_LINGER_SECS: f32 = 2.0;

/// Событие: внешняя система нанесла урон entity
///
/// Может прийти в любой точке тика (коллизии, combat resolution) —
/// сериализуется через schedule, FSM увидит смерть на ближайшей оценке.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: f32,
}

/// Событие: страж умер (эмитится один раз, на ребре перехода в Dead)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
}

/// Компонент: удалить entity после указанного момента
///
/// Ставится при входе в Dead; `despawn_after_timeout` проверяет время
/// и убирает entity из симуляции.
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    /// Момент деспавна (монотонные секунды симуляции)
    pub despawn_at: f32,
}

/// Система: применение входящего урона
///
/// Урон по уже мёртвому — no-op (повторный вход в Dead невозможен:
/// FSM из Dead не выходит, despawn ставится только на ребре).
pub fn apply_damage(
    mut damage_events: EventReader<DamageDealt>,
    mut targets: Query<&mut Health>,
) {
    for event in damage_events.read() {
        let Ok(mut health) = targets.get_mut(event.target) else {
            continue;
        };

        if !health.is_alive() {
            continue;
        }

        health.take_damage(event.amount);
        crate::logger::log(&format!(
            "💥 {:?} получил {} урона ({}/{} HP)",
            event.target, event.amount, health.current, health.max
        ));
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if now >= despawn_after.despawn_at {
            crate::logger::log(&format!("⚰️ Despawn {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_to_corpse_is_noop() {
        let mut health = Health::new(40.0);
        health.take_damage(40.0);
        assert!(!health.is_alive());

        // apply_damage пропускает мёртвых; прямой вызов тоже не уводит в минус
        health.take_damage(10.0);
        assert_eq!(health.current, 0.0);
    }
}
