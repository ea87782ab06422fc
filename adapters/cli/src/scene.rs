//! Copies world snapshots into the rendering scene.

use face_arena_core::{BossSnapshot, CreatureView, PlayerView, PLAYER_MAX_LIVES};
use face_arena_rendering::{
    boss_color, creature_color, effect_color, projectile_color, to_vec2, BossPresentation,
    CreaturePresentation, EffectPresentation, HudPresentation, PlayerPresentation,
    ProjectilePresentation, Scene,
};
use face_arena_world::{query, World};

/// Mouth ratio drawn as an open mouth.
const MOUTH_OPEN_DISPLAY: f32 = 0.03;

/// Refills `scene` from the current world state.
pub(crate) fn populate(world: &World, paused: bool, scene: &mut Scene) {
    scene.clear();

    let players = query::player_view(world);
    let creatures = query::creature_view(world);

    scene.players.extend(players.iter().map(|player| PlayerPresentation {
        anchor: to_vec2(player.anchor),
        aim: to_vec2(player.aim),
        lives: player.lives.min(PLAYER_MAX_LIVES),
        invulnerable: !player.invulnerability.is_zero(),
        mouth_open: player.mouth_open_ratio > MOUTH_OPEN_DISPLAY,
        eyes_closed: player.eyes_closed,
    }));
    scene
        .creatures
        .extend(creatures.iter().map(|creature| CreaturePresentation {
            position: to_vec2(creature.position),
            radius: creature.radius,
            color: creature_color(creature.kind),
        }));
    scene.projectiles.extend(
        query::projectile_view(world)
            .iter()
            .map(|projectile| ProjectilePresentation {
                position: to_vec2(projectile.position),
                radius: projectile.radius,
                color: projectile_color(projectile.kind),
            }),
    );
    scene
        .effects
        .extend(query::effects(world).iter().map(|effect| EffectPresentation {
            position: to_vec2(effect.position),
            color: effect_color(effect.kind),
            progress: effect.age.as_secs_f32() / effect.kind.lifetime().as_secs_f32(),
        }));

    scene.phase_boss =
        query::phase_boss(world).map(|boss| present_boss(&boss, &players, &creatures));
    let eternal = query::eternal_boss(world);
    scene.eternal_boss = Some(present_boss(&eternal, &players, &creatures));
    scene.saturation = eternal.abilities.saturation.clamp(0.0, 1.0);

    let wave = query::wave(world);
    scene.hud = HudPresentation {
        wave_index: wave.wave_index,
        wave_count: wave.wave_count,
        kills: wave.kills,
        threshold: wave.threshold,
        phase: wave.phase.to_string(),
        paused,
        mirror_shield: query::mirror_shield(world),
    };
}

fn present_boss(
    boss: &BossSnapshot,
    players: &PlayerView,
    creatures: &CreatureView,
) -> BossPresentation {
    BossPresentation {
        name: boss.kind.name().to_owned(),
        position: to_vec2(boss.position),
        radius: boss.radius,
        heading: boss.heading,
        color: boss_color(boss.kind),
        health: boss.health,
        max_health: boss.max_health,
        immortal: boss.immortal,
        shield: boss.abilities.shield,
        charging: boss.abilities.charging,
        teleported: boss.abilities.teleported,
        gaze_target: boss
            .abilities
            .gaze_target
            .and_then(|slot| players.get(slot))
            .map(|player| to_vec2(player.anchor)),
        chain_target: boss
            .abilities
            .chain_target
            .and_then(|id| creatures.get(id))
            .map(|creature| to_vec2(creature.position)),
    }
}
