//! WARDEN Simulation Core
//!
//! Поведенческий контроллер NPC-стража на Bevy 0.16 (headless ECS).
//! FSM: Patrol / Chase / Attack / Search / Dead, перцепция цели
//! (зрение: range + cone + LOS, слух: range), навигация через команды.
//!
//! Архитектура:
//! - ECS = decision layer (FSM, перцепция, cooldown'ы, health)
//! - Навигация/анимация/разрешение урона — внешние слои, общение через
//!   MovementCommand и события (AttackStarted, EntityDied, DamageDealt)

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod navigation;
pub mod perception;

// Re-export базовых типов для удобства
pub use ai::{AIConfig, AIPlugin, AIState, LookAround};
pub use combat::{
    AttackStarted, Attacker, CombatPlugin, DamageDealt, DespawnAfter, EntityDied,
    DEATH_LINGER_SECS,
};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger};
pub use navigation::NavigationPlugin;
pub use perception::{can_hear, can_see, raycast_first_hit, Occluder, OccluderSphere};

/// Частота simulation tick'ов (Hz). Степень двойки — шаг 1/64 s точен в f32,
/// сравнения timestamp'ов на границах cooldown'ов детерминированы.
pub const TICK_RATE_HZ: f64 = 64.0;

/// Фазы одного тика: урон → решения → движение
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Входящий урон и уборка трупов
    Combat,
    /// FSM transitions, команды движения, атаки
    Decision,
    /// Исполнение команд движения
    Navigation,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Combat,
                    SimulationSet::Decision,
                    SimulationSet::Navigation,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((CombatPlugin, AIPlugin, NavigationPlugin));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время продвигается вручную ровно на один tick за `app.update()` —
/// прогон не зависит от wall-clock и полностью воспроизводим.
pub fn create_headless_app() -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / TICK_RATE_HZ,
        )))
        .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ));

    app
}

/// Spawn helper: страж с инжектированной целью
///
/// Quarry резолвится здесь один раз (dependency injection) — глобального
/// scene lookup в ядре нет. Пустой маршрут валиден: патрулирование
/// отключается, о чём предупреждаем сразу.
pub fn spawn_warden(
    commands: &mut Commands,
    position: Vec3,
    config: AIConfig,
    route: PatrolRoute,
    quarry: Entity,
) -> Entity {
    if route.is_empty() {
        logger::log_warning(&format!(
            "Warden на {:?}: пустой patrol route — патрулирование отключено",
            position
        ));
    }

    commands
        .spawn((
            Transform::from_translation(position),
            Warden,
            Health::new(config.max_health),
            Quarry { target: quarry },
            AIState::default(),
            Attacker::new(config.attack_cooldown),
            config,
            route,
            MovementCommand::Idle,
            MovementSpeed::default(),
            NavigationState::default(),
        ))
        .id()
}

/// Snapshot компонентов мира для сравнения детерминизма
///
/// Строки сортируются по entity — порядок итерации archetype'ов не влияет.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> String {
    let mut query = world.query::<(Entity, &T)>();
    let mut rows: Vec<String> = query
        .iter(world)
        .map(|(entity, component)| format!("{}:{:?}", entity.index(), component))
        .collect();
    rows.sort();
    rows.join("\n")
}
