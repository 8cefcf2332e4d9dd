//! FSM AI components (state machine, config)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Количество четверть-оборотов в look-around серии
pub const LOOK_AROUND_TURNS: u8 = 4;

/// Пауза между четверть-оборотами (секунды)
pub const LOOK_AROUND_PAUSE: f32 = 1.0;

/// AI FSM состояния стража
///
/// Ровно одно состояние активно на каждом тике. Переходы пишет только
/// `ai_fsm_transitions` — ad-hoc записи из других систем запрещены.
/// Dead — терминальное, выходов из него нет.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Patrol — обход waypoint'ов маршрута, начальное состояние
    Patrol,

    /// Chase — преследование цели (destination обновляется каждый тик)
    Chase,

    /// Attack — цель в радиусе удара, стоим и бьём по cooldown'у
    Attack,

    /// Search — цель потеряна, идём к последней известной позиции
    Search {
        /// Позиция цели в момент выхода из Chase
        last_known_position: Vec3,
        /// Момент входа в Search (монотонные секунды симуляции)
        started_at: f32,
        /// Активная look-around серия (None — ещё не на месте / между сериями)
        look_around: Option<LookAround>,
    },

    /// Dead — страж мертв, AI отключен, despawn по таймеру
    Dead,
}

impl Default for AIState {
    fn default() -> Self {
        Self::Patrol
    }
}

/// Под-состояние осмотра на месте: серия четверть-оборотов с паузами
///
/// Продвигается тем же tick'ом что и FSM, поэтому прерывание по зрению
/// срабатывает на ближайшем тике, а не после всей серии. Слух и таймаут
/// поиска во время серии не проверяются.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct LookAround {
    /// Сколько оборотов уже сделано (1..=LOOK_AROUND_TURNS)
    pub turns_done: u8,
    /// Когда заканчивается пауза после последнего оборота
    pub turn_ends_at: f32,
}

/// Параметры стража, фиксируются при спавне
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct AIConfig {
    /// Радиус зрения (метры)
    pub sight_range: f32,
    /// Полный угол конуса зрения (градусы); проверка идёт по половине
    pub sight_angle: f32,
    /// Радиус слуха (метры), без учёта перекрытий
    pub hearing_range: f32,
    /// Дистанция атаки (метры), граница включительно в сторону Attack
    pub attack_range: f32,
    /// Скорость патрулирования (m/s)
    pub patrol_speed: f32,
    /// Скорость преследования (m/s)
    pub chase_speed: f32,
    /// Сколько секунд ищем цель прежде чем вернуться к патрулю
    pub search_duration: f32,
    /// Cooldown между атаками (секунды), граница включительно
    pub attack_cooldown: f32,
    /// Начальное (и максимальное) здоровье
    pub max_health: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            sight_range: 10.0,
            sight_angle: 90.0,
            hearing_range: 5.0,
            attack_range: 2.0,
            patrol_speed: 2.0,
            chase_speed: 4.0,
            search_duration: 10.0,
            attack_cooldown: 1.0,
            max_health: 100.0,
        }
    }
}
