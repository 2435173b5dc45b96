use rand::SeedableRng;
use rand::rngs::StdRng;

use term_asteroids::constants::HIGH_SCORE_KEY;
use term_asteroids::entities::AsteroidSize;
use term_asteroids::input::{Command, InputState};
use term_asteroids::prefs::{MemoryPreferences, Preferences};
use term_asteroids::types::{Bounds, Vector2D};
use term_asteroids::{Arena, CollisionEvent, CollisionOutcome, GameConfig, Scene, Session};

fn bounds() -> Bounds {
    Bounds::from_viewport(12.0, 40.0, 23.0).expect("bounds")
}

fn fire(arena: &mut Arena) -> term_asteroids::entities::EntityId {
    let mut input = InputState::new();
    input.update(&[Command::Fire]);
    arena.frame_update(0.0, &input);
    arena.bullets().last().expect("bullet").id
}

#[test]
fn four_large_asteroids_wait_outside_the_field() {
    let mut config = GameConfig::default();
    config.spawner.initial_count = 4;
    config.spawner.catalog.truncate(1);
    let arena = Arena::new(&config, bounds(), 0, StdRng::seed_from_u64(2024)).expect("arena");

    assert_eq!(arena.asteroids().len(), 4);
    for asteroid in arena.asteroids() {
        assert_eq!(asteroid.size_class, AsteroidSize::Large);
        assert!(!arena.bounds().contains(asteroid.body.position));
    }
}

#[test]
fn destroying_a_large_asteroid_and_its_fragment_scores_two_hundred() {
    let mut arena = Arena::new(&GameConfig::default(), bounds(), 0, StdRng::seed_from_u64(8))
        .expect("arena");
    let large = arena.asteroids()[0].id;

    let bullet = fire(&mut arena);
    let outcome =
        arena.handle_collision(CollisionEvent::BulletHitAsteroid { bullet, asteroid: large });
    let CollisionOutcome::AsteroidDestroyed { fragment: Some(small), .. } = outcome else {
        panic!("large asteroid should split, got {outcome:?}");
    };

    let bullet = fire(&mut arena);
    let outcome =
        arena.handle_collision(CollisionEvent::BulletHitAsteroid { bullet, asteroid: small });
    assert_eq!(outcome, CollisionOutcome::AsteroidDestroyed { score: 200, fragment: None });
    assert_eq!(arena.score(), 200);
}

#[test]
fn lives_never_increase_and_stop_at_zero() {
    let mut arena = Arena::new(&GameConfig::default(), bounds(), 0, StdRng::seed_from_u64(17))
        .expect("arena");
    let input = InputState::new();
    let mut previous = arena.lives();

    for _ in 0..10 {
        if let Some(asteroid) = arena.asteroids().first().map(|a| a.id) {
            arena.handle_collision(CollisionEvent::ShipHitAsteroid { asteroid });
        }
        arena.fixed_update(0.02, &input);
        arena.frame_update(0.5, &input);
        assert!(arena.lives() <= previous);
        previous = arena.lives();
        arena.validate_invariants().expect("invariants hold");
    }
    assert_eq!(arena.lives(), 0);
    assert!(arena.is_run_over());
}

#[test]
fn asteroids_come_back_inside_after_one_tick() {
    let mut arena = Arena::new(&GameConfig::default(), bounds(), 0, StdRng::seed_from_u64(31))
        .expect("arena");
    arena.fixed_update(0.02, &InputState::new());
    for asteroid in arena.asteroids() {
        assert!(arena.bounds().contains(asteroid.body.position));
    }
}

#[test]
fn last_life_with_a_better_score_stores_the_new_record() {
    let mut config = GameConfig::default();
    config.ship.lives = 1;
    let mut prefs = MemoryPreferences::new();
    prefs.set_int(HIGH_SCORE_KEY, 100).expect("store");
    let mut session = Session::new(config, bounds(), prefs).expect("session").with_seed(5);
    session.play().expect("play");

    // Three small hits put the score at 300, past the stored 100.
    for _ in 0..3 {
        let arena = session.arena().expect("arena");
        let target = arena
            .asteroids()
            .iter()
            .find(|a| a.size_class == AsteroidSize::Small)
            .or_else(|| arena.asteroids().first())
            .map(|a| a.id)
            .expect("asteroid");
        let mut input = InputState::new();
        input.update(&[Command::Fire]);
        session.advance(0.0, &input).expect("advance");
        let bullet = session
            .arena()
            .and_then(|a| a.bullets().last())
            .map(|b| b.id)
            .expect("bullet");
        session
            .handle_collision(CollisionEvent::BulletHitAsteroid { bullet, asteroid: target })
            .expect("hit");
    }
    let score = session.arena().expect("arena").score();
    assert_eq!(score, 300);

    let asteroid = session.arena().expect("arena").asteroids()[0].id;
    session
        .handle_collision(CollisionEvent::ShipHitAsteroid { asteroid })
        .expect("ship hit");

    assert_eq!(session.scene(), Scene::Menu);
    assert_eq!(session.prefs().get_int(HIGH_SCORE_KEY), 300);
    assert_eq!(session.stored_high_score(), 300);
}

#[test]
fn wrap_is_a_teleport_on_both_axes() {
    let field = bounds();
    let corner = field.wrap(Vector2D::new(field.max_x + 0.5, field.min_y - 0.5));
    assert_eq!(corner, Vector2D::new(field.min_x, field.max_y));
}
