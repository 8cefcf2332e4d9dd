//! Headless демо WARDEN
//!
//! Прогоняет один сценарий: страж патрулирует между двумя точками,
//! цель приближается, страж замечает → преследует → бьёт; затем цель
//! телепортируется прочь и страж уходит в поиск.

use bevy::prelude::*;

use warden_simulation::{
    create_headless_app, spawn_warden, AIConfig, AIState, Occluder, PatrolRoute, SimulationPlugin,
};

fn main() {
    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin);

    // Цель: стоит к юго-западу, со своим телом для LOS-лучей
    let quarry = app
        .world_mut()
        .spawn((
            Transform::from_translation(Vec3::new(30.0, 0.0, 30.0)),
            Occluder { radius: 0.5 },
        ))
        .id();

    // Страж: маршрут из двух точек вдоль оси X
    let route = PatrolRoute::new(vec![Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0)]);
    let warden = spawn_warden(
        &mut app.world_mut().commands(),
        Vec3::ZERO,
        AIConfig::default(),
        route,
        quarry,
    );

    println!("WARDEN headless demo: warden {warden:?} vs quarry {quarry:?}");

    // ~47 секунд симуляции на 64Hz
    for tick in 0..3000_u32 {
        // На 10-й секунде цель подходит к маршруту на дистанцию слуха
        if tick == 640 {
            if let Some(mut transform) = app.world_mut().get_mut::<Transform>(quarry) {
                transform.translation = Vec3::new(4.0, 0.0, -3.0);
                println!("tick {tick}: quarry подошла к маршруту");
            }
        }

        // На 25-й секунде цель телепортируется прочь — страж уйдёт в Search
        if tick == 1600 {
            if let Some(mut transform) = app.world_mut().get_mut::<Transform>(quarry) {
                transform.translation = Vec3::new(-20.0, 0.0, 15.0);
                println!("tick {tick}: quarry сбежала");
            }
        }

        // Секундой позже цель убегает ещё дальше: last-known точка устарела,
        // осмотр там ничего не найдёт и страж вернётся к патрулю
        if tick == 1664 {
            if let Some(mut transform) = app.world_mut().get_mut::<Transform>(quarry) {
                transform.translation = Vec3::new(40.0, 0.0, 40.0);
            }
        }

        app.update();

        if tick % 64 == 0 {
            if let Some(state) = app.world().get::<AIState>(warden) {
                println!("tick {tick}: {state:?}");
            } else {
                println!("tick {tick}: warden удалён из симуляции");
                break;
            }
        }
    }

    println!("Simulation complete!");
}
