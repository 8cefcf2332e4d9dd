//! Behavior integration tests
//!
//! Сценарии полного цикла FSM на headless app: патруль, обнаружение,
//! преследование, атака, поиск, смерть. Один app.update() == один tick (64Hz,
//! manual time), поэтому тайминги детерминированы.

use bevy::ecs::event::Events;
use bevy::prelude::*;

use warden_simulation::*;

/// Helper: создать полный behavior App со всеми plugins
fn create_behavior_app() -> App {
    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin);
    app
}

/// Helper: spawn цели с телом для LOS-лучей
fn spawn_quarry(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            Occluder { radius: 0.5 },
        ))
        .id()
}

/// Helper: spawn стража + один settle-tick чтобы Commands сфлашились
fn spawn_guard_with(
    app: &mut App,
    position: Vec3,
    waypoints: Vec<Vec3>,
    quarry: Entity,
    config: AIConfig,
) -> Entity {
    let entity = spawn_warden(
        &mut app.world_mut().commands(),
        position,
        config,
        PatrolRoute::new(waypoints),
        quarry,
    );
    app.update();
    entity
}

fn spawn_guard(app: &mut App, position: Vec3, waypoints: Vec<Vec3>, quarry: Entity) -> Entity {
    spawn_guard_with(app, position, waypoints, quarry, AIConfig::default())
}

fn guard_state(app: &App, guard: Entity) -> AIState {
    app.world()
        .get::<AIState>(guard)
        .expect("страж должен существовать")
        .clone()
}

fn teleport(app: &mut App, entity: Entity, position: Vec3) {
    let mut transform = app
        .world_mut()
        .get_mut::<Transform>(entity)
        .expect("entity должен существовать");
    transform.translation = position;
}

/// Helper: тикает app пока предикат не выполнится (возвращает номер тика)
fn run_until(
    app: &mut App,
    guard: Entity,
    max_ticks: usize,
    predicate: impl Fn(&AIState) -> bool,
) -> Option<usize> {
    for tick in 0..max_ticks {
        app.update();
        if predicate(&guard_state(app, guard)) {
            return Some(tick);
        }
    }
    None
}

// --- Patrol ---

#[test]
fn test_patrol_cycles_waypoints_when_quarry_far() {
    let mut app = create_behavior_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(100.0, 0.0, 100.0));

    let p0 = Vec3::ZERO;
    let p1 = Vec3::new(8.0, 0.0, 0.0);
    let guard = spawn_guard(&mut app, p0, vec![p0, p1], quarry);

    // 8m при 2 m/s — 4 секунды на плечо маршрута
    let mut index_history: Vec<usize> = Vec::new();
    for _ in 0..1200 {
        app.update();
        assert!(
            matches!(guard_state(&app, guard), AIState::Patrol),
            "цель далеко — страж обязан оставаться в Patrol"
        );

        let route = app
            .world()
            .get::<PatrolRoute>(guard)
            .expect("маршрут на месте");
        if index_history.last() != Some(&route.current) {
            index_history.push(route.current);
        }
    }

    // За ~18 секунд индекс обязан смениться минимум 4 раза и строго чередоваться
    assert!(
        index_history.len() >= 4,
        "маршрут должен циклироваться: {index_history:?}"
    );
    for pair in index_history.windows(2) {
        assert_ne!(pair[0], pair[1], "индекс не может повторяться подряд");
    }
}

#[test]
fn test_empty_route_disables_patrol_movement() {
    let mut app = create_behavior_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(100.0, 0.0, 100.0));
    let guard = spawn_guard(&mut app, Vec3::new(3.0, 0.0, 3.0), vec![], quarry);

    for _ in 0..200 {
        app.update();
        assert!(matches!(guard_state(&app, guard), AIState::Patrol));
    }

    let transform = app
        .world()
        .get::<Transform>(guard)
        .expect("страж должен существовать");
    assert_eq!(
        transform.translation,
        Vec3::new(3.0, 0.0, 3.0),
        "без маршрута страж не двигается"
    );
}

#[test]
fn test_missing_quarry_keeps_patrolling() {
    let mut app = create_behavior_app();

    // Ссылка на уже удалённый entity: перцепция молчит, паники нет
    let ghost = app.world_mut().spawn_empty().id();
    app.world_mut().despawn(ghost);

    let guard = spawn_guard(
        &mut app,
        Vec3::ZERO,
        vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)],
        ghost,
    );

    for _ in 0..400 {
        app.update();
        assert!(matches!(guard_state(&app, guard), AIState::Patrol));
    }
}

// --- Обнаружение и атака ---

#[test]
fn test_patrol_to_chase_on_sighting() {
    let mut app = create_behavior_app();
    // Прямо по курсу (-Z), в радиусе и конусе зрения
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -5.0));
    let guard = spawn_guard(&mut app, Vec3::ZERO, vec![], quarry);

    let seen = run_until(&mut app, guard, 5, |s| matches!(s, AIState::Chase));
    assert!(seen.is_some(), "видимая цель переводит Patrol → Chase");

    // Преследование сближает до attack_range → Attack
    let attacking = run_until(&mut app, guard, 200, |s| matches!(s, AIState::Attack));
    assert!(attacking.is_some(), "сближение переводит Chase → Attack");
}

#[test]
fn test_sighting_blocked_by_wall() {
    let mut app = create_behavior_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -8.0));
    // Стена между стражем и целью; цель вне радиуса слуха
    app.world_mut().spawn((
        Transform::from_translation(Vec3::new(0.0, 0.0, -4.0)),
        Occluder { radius: 1.0 },
    ));
    let guard = spawn_guard(&mut app, Vec3::ZERO, vec![], quarry);

    for _ in 0..100 {
        app.update();
        assert!(
            matches!(guard_state(&app, guard), AIState::Patrol),
            "перекрытая цель не обнаруживается"
        );
    }
}

#[test]
fn test_attack_range_boundary_inclusive() {
    let mut app = create_behavior_app();
    // Нулевые скорости: дистанции в сценарии не плывут
    let config = AIConfig {
        patrol_speed: 0.0,
        chase_speed: 0.0,
        ..AIConfig::default()
    };

    // Ровно на границе attack_range (2.0) — граница в пользу Attack
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -2.0));
    let guard = spawn_guard_with(&mut app, Vec3::ZERO, vec![], quarry, config.clone());

    let attacking = run_until(&mut app, guard, 5, |s| matches!(s, AIState::Attack));
    assert!(attacking.is_some(), "дистанция == attack_range означает Attack");

    // Чуть дальше границы — обратно в Chase (дистанция строго больше)
    teleport(&mut app, quarry, Vec3::new(0.0, 0.0, -2.125));
    let chasing = run_until(&mut app, guard, 5, |s| matches!(s, AIState::Chase));
    assert!(chasing.is_some(), "дистанция > attack_range означает Chase");

    // Мертвой зоны нет: внутри границы снова Attack
    teleport(&mut app, quarry, Vec3::new(0.0, 0.0, -1.5));
    let again = run_until(&mut app, guard, 5, |s| matches!(s, AIState::Attack));
    assert!(again.is_some());
}

#[test]
fn test_attack_fires_once_per_cooldown_window() {
    let mut app = create_behavior_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -1.5));
    let guard = spawn_guard(&mut app, Vec3::ZERO, vec![], quarry);

    let attacking = run_until(&mut app, guard, 10, |s| matches!(s, AIState::Attack));
    assert!(attacking.is_some());

    // Собираем timestamps ударов за ~6 секунд
    let mut strikes: Vec<f32> = Vec::new();
    for _ in 0..384 {
        app.update();
        let attacker = app
            .world()
            .get::<Attacker>(guard)
            .expect("страж должен существовать");
        if let Some(at) = attacker.last_attack_at {
            if strikes.last().map_or(true, |&prev| at > prev) {
                strikes.push(at);
            }
        }
    }

    assert!(
        strikes.len() >= 5 && strikes.len() <= 7,
        "за 6 секунд при cooldown 1.0 ожидаем ~6 ударов, получили {}",
        strikes.len()
    );

    // Интервалы ровно cooldown: удар разрешён прямо на границе окна
    for pair in strikes.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(
            (gap - 1.0).abs() < 1e-3,
            "интервал между ударами должен быть ровно 1.0s, получили {gap}"
        );
    }
}

// --- Search ---

#[test]
fn test_lost_quarry_enters_search_with_frozen_position() {
    let mut app = create_behavior_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(100.0, 0.0, 100.0));

    let p0 = Vec3::ZERO;
    let p1 = Vec3::new(8.0, 0.0, 0.0);
    let guard = spawn_guard(&mut app, p0, vec![p0, p1], quarry);

    // Пусть пройдёт кусок маршрута
    for _ in 0..100 {
        app.update();
    }
    let index_before = app
        .world()
        .get::<PatrolRoute>(guard)
        .expect("маршрут на месте")
        .current;

    // Цель появляется в радиусе слуха
    let guard_pos = app
        .world()
        .get::<Transform>(guard)
        .expect("страж должен существовать")
        .translation;
    teleport(&mut app, quarry, guard_pos + Vec3::new(0.0, 0.0, 3.0));

    let chasing = run_until(&mut app, guard, 5, |s| matches!(s, AIState::Chase));
    assert!(chasing.is_some(), "слух переводит Patrol → Chase");

    // Цель пропадает из обоих каналов: Search фиксирует её позицию на момент выхода
    let escape = Vec3::new(50.0, 0.0, 50.0);
    teleport(&mut app, quarry, escape);

    let searching = run_until(&mut app, guard, 5, |s| matches!(s, AIState::Search { .. }));
    assert!(searching.is_some());

    let AIState::Search {
        last_known_position,
        ..
    } = guard_state(&app, guard)
    else {
        panic!("ожидали Search");
    };
    assert_eq!(
        last_known_position, escape,
        "last known position == позиция цели в момент выхода из Chase"
    );

    // До точки 60+ метров — страж не успеет дойти, сработает таймаут поиска
    let back_to_patrol = run_until(&mut app, guard, 700, |s| matches!(s, AIState::Patrol));
    let ticks = back_to_patrol.expect("после search_duration страж возвращается в Patrol");
    // now − started > 10.0s при 64Hz — порядка 640 тиков
    assert!(
        (638..=646).contains(&ticks),
        "таймаут поиска должен сработать через ~641 тик, получили {ticks}"
    );

    // Патруль продолжается с того же индекса маршрута
    let index_after = app
        .world()
        .get::<PatrolRoute>(guard)
        .expect("маршрут на месте")
        .current;
    assert_eq!(index_before, index_after);
}

#[test]
fn test_look_around_ignores_timeout_until_series_ends() {
    let mut app = create_behavior_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -5.0));
    let guard = spawn_guard(&mut app, Vec3::ZERO, vec![], quarry);

    assert!(run_until(&mut app, guard, 5, |s| matches!(s, AIState::Chase)).is_some());

    // Цель исчезает на умеренную дистанцию: страж дойдёт до last-known
    // примерно за 6 секунд и начнёт оглядываться
    teleport(&mut app, quarry, Vec3::new(0.0, 0.0, -30.0));
    assert!(run_until(&mut app, guard, 5, |s| matches!(s, AIState::Search { .. })).is_some());
    // ...а сама цель уходит совсем далеко
    teleport(&mut app, quarry, Vec3::new(200.0, 0.0, 200.0));

    let arrived = run_until(&mut app, guard, 600, |s| {
        matches!(
            s,
            AIState::Search {
                look_around: Some(_),
                ..
            }
        )
    });
    assert!(arrived.is_some(), "по прибытию начинается look-around");

    // Серия: 4 оборота с паузой ~1s; таймаут поиска (10s) истекает посреди
    // серии, но прерывает её только зрение — дожидаемся всех оборотов
    let mut max_turns = 1_u8;
    let mut ticks_in_series = 0_usize;
    loop {
        app.update();
        ticks_in_series += 1;
        match guard_state(&app, guard) {
            AIState::Search {
                look_around: Some(la),
                ..
            } => {
                assert!(la.turns_done >= max_turns, "счётчик оборотов не убывает");
                max_turns = la.turns_done;
            }
            AIState::Search {
                look_around: None, ..
            } => {}
            AIState::Patrol => break,
            other => panic!("неожиданное состояние во время поиска: {other:?}"),
        }
        assert!(ticks_in_series < 600, "серия обязана завершиться");
    }

    assert_eq!(max_turns, 4, "look-around делает все 4 оборота без зрения");
    // Полная серия ~4s: Patrol наступает заметно позже самого таймаута
    assert!(
        ticks_in_series > 64 * 3,
        "переход в Patrol ждал завершения серии, тиков: {ticks_in_series}"
    );
}

#[test]
fn test_look_around_aborts_on_sight() {
    let mut app = create_behavior_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -5.0));
    let guard = spawn_guard(&mut app, Vec3::ZERO, vec![], quarry);

    assert!(run_until(&mut app, guard, 5, |s| matches!(s, AIState::Chase)).is_some());
    teleport(&mut app, quarry, Vec3::new(0.0, 0.0, -30.0));
    assert!(run_until(&mut app, guard, 5, |s| matches!(s, AIState::Search { .. })).is_some());
    teleport(&mut app, quarry, Vec3::new(200.0, 0.0, 200.0));

    assert!(run_until(&mut app, guard, 600, |s| {
        matches!(
            s,
            AIState::Search {
                look_around: Some(_),
                ..
            }
        )
    })
    .is_some());

    // Ставим цель прямо по текущему взгляду стража — зрение прерывает серию
    // на ближайшем тике, до следующего оборота
    let transform = app
        .world()
        .get::<Transform>(guard)
        .expect("страж должен существовать");
    let in_front = transform.translation + *transform.forward() * 4.0;
    teleport(&mut app, quarry, in_front);

    let chasing = run_until(&mut app, guard, 4, |s| matches!(s, AIState::Chase));
    assert!(
        chasing.is_some(),
        "зрение обязано прервать look-around немедленно"
    );
}

#[test]
fn test_look_around_not_interrupted_by_hearing() {
    let mut app = create_behavior_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -5.0));
    let guard = spawn_guard(&mut app, Vec3::ZERO, vec![], quarry);

    assert!(run_until(&mut app, guard, 5, |s| matches!(s, AIState::Chase)).is_some());
    teleport(&mut app, quarry, Vec3::new(0.0, 0.0, -30.0));
    assert!(run_until(&mut app, guard, 5, |s| matches!(s, AIState::Search { .. })).is_some());
    teleport(&mut app, quarry, Vec3::new(200.0, 0.0, 200.0));

    assert!(run_until(&mut app, guard, 600, |s| {
        matches!(
            s,
            AIState::Search {
                look_around: Some(_),
                ..
            }
        )
    })
    .is_some());

    // Цель в радиусе слуха, но за стеной: зрение перекрыто со всех ракурсов
    let guard_pos = app
        .world()
        .get::<Transform>(guard)
        .expect("страж должен существовать")
        .translation;
    app.world_mut().spawn((
        Transform::from_translation(guard_pos + Vec3::new(0.0, 0.0, 2.0)),
        Occluder { radius: 1.0 },
    ));
    teleport(&mut app, quarry, guard_pos + Vec3::new(0.0, 0.0, 4.0));

    // Пока серия не закончена — остаёмся в Search, слух игнорируется
    let mut saw_full_series = false;
    for _ in 0..(64 * 5) {
        app.update();
        match guard_state(&app, guard) {
            AIState::Search {
                look_around: Some(la),
                ..
            } => {
                if la.turns_done == 4 {
                    saw_full_series = true;
                }
            }
            AIState::Chase => break,
            AIState::Search {
                look_around: None, ..
            } => {}
            other => panic!("неожиданное состояние: {other:?}"),
        }
    }

    assert!(
        saw_full_series,
        "слух не должен прерывать look-around до конца серии"
    );
    assert!(
        matches!(guard_state(&app, guard), AIState::Chase),
        "после серии слух переводит Search → Chase"
    );
}

// --- Смерть ---

#[test]
fn test_death_in_attack_halts_and_despawns() {
    let mut app = create_behavior_app();
    let quarry = spawn_quarry(&mut app, Vec3::new(0.0, 0.0, -1.5));
    let guard = spawn_guard(&mut app, Vec3::ZERO, vec![], quarry);

    assert!(run_until(&mut app, guard, 10, |s| matches!(s, AIState::Attack)).is_some());

    // Смертельный урон из внешней системы
    app.world_mut().send_event(DamageDealt {
        target: guard,
        amount: 150.0,
    });
    app.update();

    assert!(
        matches!(guard_state(&app, guard), AIState::Dead),
        "health ≤ 0 переводит в Dead на ближайшей оценке"
    );
    assert_eq!(
        app.world()
            .get::<MovementCommand>(guard)
            .copied()
            .expect("страж ещё в мире"),
        MovementCommand::Stop,
        "смерть немедленно останавливает движение"
    );

    // Death event ровно один
    let events = app.world().resource::<Events<EntityDied>>();
    let mut cursor = events.get_cursor();
    assert_eq!(cursor.read(events).count(), 1);

    // Повторный урон по трупу — no-op, второго EntityDied нет
    let frozen_strike = app
        .world()
        .get::<Attacker>(guard)
        .expect("страж ещё в мире")
        .last_attack_at;
    app.world_mut().send_event(DamageDealt {
        target: guard,
        amount: 50.0,
    });
    for _ in 0..32 {
        app.update();
        assert!(matches!(guard_state(&app, guard), AIState::Dead));
    }
    let events = app.world().resource::<Events<EntityDied>>();
    let mut cursor = events.get_cursor();
    assert_eq!(
        cursor.read(events).count(),
        0,
        "повторного death event быть не должно"
    );

    // Мёртвый не атакует
    assert_eq!(
        app.world()
            .get::<Attacker>(guard)
            .expect("страж ещё в мире")
            .last_attack_at,
        frozen_strike
    );

    // Удаление из симуляции через 2 секунды после смерти
    for _ in 0..160 {
        app.update();
    }
    assert!(
        app.world().get::<Health>(guard).is_none(),
        "страж должен быть удалён после death delay"
    );
}
