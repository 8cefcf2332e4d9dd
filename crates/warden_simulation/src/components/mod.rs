//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые компоненты стража (Warden, Health, Quarry)
//! - movement: навигация и перемещение (MovementCommand, MovementSpeed, NavigationState)
//! - route: патрульный маршрут (PatrolRoute)

pub mod actor;
pub mod movement;
pub mod route;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use route::*;
