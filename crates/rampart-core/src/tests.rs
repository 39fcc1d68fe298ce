#[cfg(test)]
mod tests {
    use crate::commands::PlayerCommand;
    use crate::config::GameConfig;
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::EffectEvent;
    use crate::types::{Position, SimTime};

    // ---- Geometry ----

    #[test]
    fn test_range_and_direction() {
        let a = Position::ground(0.0, 0.0);
        let b = Position::ground(3.0, 4.0);
        assert!((a.range_to(&b) - 5.0).abs() < 1e-12);

        let dir = a.direction_to(&b);
        assert!((dir.length() - 1.0).abs() < 1e-12);
        assert!((dir.x - 0.6).abs() < 1e-12);
        assert!((dir.y - 0.8).abs() < 1e-12);

        // Coincident points give a zero direction rather than NaN.
        assert_eq!(a.direction_to(&a).length(), 0.0);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Position::ground(0.0, 0.0);
        let b = Position::ground(10.0, 0.0);

        // Perpendicular foot inside the segment.
        let p = Position::ground(5.0, 3.0);
        assert!((p.distance_to_segment(&a, &b) - 3.0).abs() < 1e-12);

        // Beyond the end: distance to the endpoint.
        let q = Position::ground(13.0, 4.0);
        assert!((q.distance_to_segment(&a, &b) - 5.0).abs() < 1e-12);

        // Degenerate segment.
        assert!((p.distance_to_segment(&a, &a) - p.range_to(&a)).abs() < 1e-12);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Position::ground(0.0, 0.0);
        let b = Position::ground(10.0, -4.0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid, Position::ground(5.0, -2.0));
    }

    #[test]
    fn test_sim_time_ms_from_ticks() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance();
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert!((time.elapsed_ms() - 1000.0).abs() < 1e-9);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    // ---- Enums ----

    #[test]
    fn test_area_damage_kinds() {
        let area: Vec<DefenderKind> = DefenderKind::ALL
            .into_iter()
            .filter(|k| k.is_area_damage())
            .collect();
        assert_eq!(area, vec![DefenderKind::Missile, DefenderKind::AreaAttack]);
        assert!(!WeaponKind::Attacker.is_area_damage());
        assert_eq!(WeaponKind::Attacker.side(), Side::Attacker);
        assert_eq!(
            WeaponKind::Defender(DefenderKind::Laser).side(),
            Side::Defender
        );
    }

    // ---- Serde shapes ----

    #[test]
    fn test_player_command_json_shape() {
        let cmd = PlayerCommand::Place {
            kind: DefenderKind::AreaAttack,
            position: Position::ground(1.0, 2.0),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "Place");
        assert_eq!(json["kind"], "area_attack");

        let back: PlayerCommand =
            serde_json::from_str(r#"{"type":"Place","kind":"laser","position":{"x":4.0,"y":5.0}}"#)
                .unwrap();
        match back {
            PlayerCommand::Place { kind, position } => {
                assert_eq!(kind, DefenderKind::Laser);
                assert_eq!(position, Position::ground(4.0, 5.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_effect_event_json_shape() {
        let event = EffectEvent::WaveComplete { wave: 3, bonus: 55 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "WaveComplete");
        assert_eq!(json["bonus"], 55);

        let shot = EffectEvent::ShotFired {
            weapon: WeaponKind::Defender(DefenderKind::Missile),
        };
        let json = serde_json::to_string(&shot).unwrap();
        let back: EffectEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shot);
    }

    // ---- Config ----

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.economy.starting_gold, STARTING_GOLD);
        assert_eq!(config.waves.base_enemies, WAVE_BASE_ENEMIES);
        assert!(config.level.path.len() >= 2);
    }

    #[test]
    fn test_toml_partial_override() {
        let text = r#"
            seed = 7

            [waves]
            spawn_chance = 1.0
            max_enemies = 10

            [defenders.basic]
            cost = 40
            damage = 30.0
            range = 15.0
            fire_interval_ms = 800.0
            projectile_speed = 0.9
            projectile_ttl_ticks = 90
        "#;
        let config = GameConfig::from_toml_str(text).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.waves.spawn_chance, 1.0);
        assert_eq!(config.waves.max_enemies, 10);
        // Untouched fields keep their defaults.
        assert_eq!(config.waves.base_enemies, WAVE_BASE_ENEMIES);
        assert_eq!(config.defenders.stats(DefenderKind::Basic).cost, 40);
        assert_eq!(
            config.defenders.stats(DefenderKind::Laser),
            GameConfig::default().defenders.stats(DefenderKind::Laser)
        );
    }

    #[test]
    fn test_toml_level_path_without_altitude() {
        let text = r#"
            [level]
            path = [{ x = 0.0, y = 0.0 }, { x = 10.0, y = 0.0 }]
            structures = []
        "#;
        let config = GameConfig::from_toml_str(text).unwrap();
        assert_eq!(config.level.path[1], Position::ground(10.0, 0.0));
        assert!(config.level.structures.is_empty());
    }

    #[test]
    fn test_short_path_rejected() {
        let text = r#"
            [level]
            path = [{ x = 0.0, y = 0.0 }]
        "#;
        let err = GameConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
    }

    #[test]
    fn test_spawn_chance_out_of_range_rejected() {
        let text = r#"
            [waves]
            spawn_chance = 1.5
        "#;
        assert!(matches!(
            GameConfig::from_toml_str(text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_projectile_faster_than_hit_window_rejected() {
        let text = r#"
            [combat]
            hit_radius = 1.0

            [defenders.laser]
            cost = 100
            damage = 10.0
            range = 14.0
            fire_interval_ms = 300.0
            projectile_speed = 2.0
            projectile_ttl_ticks = 60
        "#;
        let err = GameConfig::from_toml_str(text).unwrap_err();
        assert!(err.to_string().contains("laser"), "got {err}");

        let mut config = GameConfig::default();
        config.combat.attacker_projectile_speed = 2.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = GameConfig::from_toml_str("seed = \"not a number\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
    }
}
