//! Perception — проверки видимости и слышимости цели
//!
//! Чистые функции без кэширования и гистерезиса: каждый вызов пересчитывает
//! range + cone + line-of-sight заново. Цель на точной границе может
//! детерминированно "мерцать" — это ожидаемо.
//!
//! LOS-семантика как в engine-варианте (raycast до первого hit):
//! видимость есть только если ПЕРВОЕ попадание луча — сама цель; любой другой
//! hit означает перекрытие. Цель обязана присутствовать в occluder-наборе
//! (её собственное тело), иначе лучу не во что попасть и can_see == false.
//! Сами наблюдатели в occluder-набор не входят.

use bevy::prelude::*;

use crate::ai::AIConfig;

/// Сферический occluder для LOS-лучей (стены, пропсы, тело цели)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Occluder {
    pub radius: f32,
}

impl Default for Occluder {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Снимок occluder'а для одного тика: (entity, центр, радиус)
pub type OccluderSphere = (Entity, Vec3, f32);

/// Первое пересечение луча со сферами из `bodies`
///
/// Возвращает entity с наименьшей положительной дистанцией попадания
/// в пределах `max_distance`. Луч, стартующий внутри сферы, считается
/// немедленным попаданием в неё.
pub fn raycast_first_hit(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    bodies: &[OccluderSphere],
) -> Option<Entity> {
    let Some(direction) = direction.try_normalize() else {
        return None;
    };

    let mut nearest: Option<(Entity, f32)> = None;

    for &(entity, center, radius) in bodies {
        let to_center = center - origin;
        let along = to_center.dot(direction);

        // Сфера целиком позади луча
        if along < -radius {
            continue;
        }

        let closest_sq = to_center.length_squared() - along * along;
        if closest_sq > radius * radius {
            continue;
        }

        let half_chord = (radius * radius - closest_sq).sqrt();
        let mut t = along - half_chord;
        if t < 0.0 {
            // origin внутри сферы — попадание на месте
            t = 0.0;
        }

        if t > max_distance {
            continue;
        }

        match nearest {
            Some((_, best)) if t >= best => {}
            _ => nearest = Some((entity, t)),
        }
    }

    nearest.map(|(entity, _)| entity)
}

/// Слышит ли страж цель: чистая проверка дистанции, без перекрытий и углов
pub fn can_hear(agent_pos: Vec3, target_pos: Vec3, config: &AIConfig) -> bool {
    agent_pos.distance(target_pos) <= config.hearing_range
}

/// Видит ли страж цель: дистанция + конус + беспрепятственный луч
///
/// Все три условия обязаны выполниться:
/// (a) дистанция ≤ sight_range;
/// (b) угол между forward и направлением на цель ≤ sight_angle/2;
/// (c) первый hit луча (ограниченного sight_range) — именно цель.
pub fn can_see(
    agent_pos: Vec3,
    agent_forward: Vec3,
    target: Entity,
    target_pos: Vec3,
    config: &AIConfig,
    occluders: &[OccluderSphere],
) -> bool {
    if agent_pos.distance(target_pos) > config.sight_range {
        return false;
    }

    let Some(to_target) = (target_pos - agent_pos).try_normalize() else {
        // Цель стоит в той же точке — считаем видимой
        return true;
    };

    let angle = agent_forward.angle_between(to_target).to_degrees();
    if angle > config.sight_angle / 2.0 {
        return false;
    }

    raycast_first_hit(agent_pos, to_target, config.sight_range, occluders) == Some(target)
}
