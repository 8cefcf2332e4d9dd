//! Базовые компоненты стража: Warden, Quarry, Health

use bevy::prelude::*;

/// Страж — управляемый NPC
///
/// Автоматически добавляет Health, MovementCommand, MovementSpeed,
/// NavigationState через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Health,
    crate::components::MovementCommand,
    crate::components::MovementSpeed,
    crate::components::NavigationState
)]
pub struct Warden;

/// Ссылка на цель наблюдения (non-owning)
///
/// Резолвится один раз при спавне (dependency injection вместо глобального
/// scene lookup). Если entity за ссылкой исчез — перцепция молчит и страж
/// продолжает патрулировать; повторного поиска цели нет.
#[derive(Component, Debug, Clone, Copy)]
pub struct Quarry {
    pub target: Entity,
}

/// Здоровье стража
///
/// Инвариант: 0.0 ≤ current ≤ max. Эта подсистема здоровье не восстанавливает.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }
}
