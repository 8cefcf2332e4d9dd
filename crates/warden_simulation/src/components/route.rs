//! Патрульный маршрут: упорядоченный список waypoint'ов с циклическим обходом

use bevy::prelude::*;

/// Маршрут патруля стража
///
/// Индекс wrap'ается по модулю длины. Пустой маршрут — валидная конфигурация:
/// патрулирование отключено (warning логируется при спавне).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    pub waypoints: Vec<Vec3>,
    pub current: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self {
            waypoints,
            current: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Текущий waypoint (None для пустого маршрута)
    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.current).copied()
    }

    /// Циклический переход к следующему waypoint'у
    pub fn advance(&mut self) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.waypoints.len();
        self.current_waypoint()
    }
}
