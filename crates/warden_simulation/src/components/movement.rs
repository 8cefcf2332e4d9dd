//! Movement компоненты: команды перемещения, скорость, состояние навигации

use bevy::prelude::*;

/// Радиус прибытия: дистанция, с которой точка назначения считается достигнутой
pub const ARRIVAL_RADIUS: f32 = 0.1;

/// Команда движения для стража (выполняется навигационным сервисом)
///
/// Архитектура:
/// - AI система пишет MovementCommand (high-level intent)
/// - Навигационный слой читает и конвертирует в destination + шаг по пути
/// - Ядро о путях не рассуждает, только "пришёл ли я (примерно)"
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum MovementCommand {
    /// Стоять на месте (не обновлять текущий navigation target)
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Следовать за entity (destination обновляется каждый тик)
    FollowEntity { target: Entity },
    /// Остановиться немедленно (сбросить destination)
    Stop,
}

impl Default for MovementCommand {
    fn default() -> Self {
        Self::Idle
    }
}

/// Скорость движения стража (метры/сек)
///
/// AI переключает её между patrol_speed и chase_speed при смене состояния.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 2.0 } // 2 m/s — базовая скорость ходьбы
    }
}

/// Состояние навигации стража
///
/// `remaining_distance` обновляется навигационным слоем каждый тик;
/// AI опрашивает её для waypoint advance и look-around (порог ARRIVAL_RADIUS).
/// Без destination дистанция равна 0.0 — "уже пришли".
#[derive(Component, Default, Clone, Copy, Debug)]
pub struct NavigationState {
    /// Текущая точка назначения (None — стоим)
    pub destination: Option<Vec3>,

    /// Оставшаяся дистанция до destination
    pub remaining_distance: f32,
}
