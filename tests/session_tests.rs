mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{Call, RecordingSurface};
use wormtype::{
    Command, FrameOutcome, Session, StepStats, Vec2, Viewport, WormConfig, WormError,
};

fn start() -> Session<RecordingSurface> {
    common::init_tracing();
    Session::start(WormConfig::default(), Viewport::new(400.0, 806.0), |size| {
        Some(RecordingSurface::sized(size))
    })
    .unwrap()
}

fn type_text(session: &mut Session<RecordingSurface>, text: &str) {
    for c in text.chars() {
        session.add_letter(c).unwrap();
    }
}

fn run(session: &mut Session<RecordingSurface>, steps: usize) {
    for _ in 0..steps {
        assert!(session.step());
    }
}

fn letter_positions(session: &Session<RecordingSurface>) -> Vec<Vec2> {
    session
        .chains()
        .chains()
        .flat_map(|c| c.bodies().iter().copied())
        .map(|id| session.world().position(id).unwrap())
        .collect()
}

#[test]
fn missing_surface_fails_to_start() {
    let result: Result<Session<RecordingSurface>, _> =
        Session::start(WormConfig::default(), Viewport::new(400.0, 806.0), |_| None);
    assert!(matches!(result, Err(WormError::SurfaceUnavailable)));
}

#[test]
fn viewport_smaller_than_reserved_area_is_rejected() {
    let result = Session::start(WormConfig::default(), Viewport::new(400.0, 100.0), |size| {
        Some(RecordingSurface::sized(size))
    });
    assert!(matches!(result, Err(WormError::InvalidViewport { .. })));
}

#[test]
fn invalid_config_is_rejected_before_acquiring() {
    let mut acquired = false;
    let result = Session::start(
        WormConfig::default().with_letter_radius(0.0),
        Viewport::new(400.0, 806.0),
        |size| {
            acquired = true;
            Some(RecordingSurface::sized(size))
        },
    );
    assert!(matches!(result, Err(WormError::InvalidConfig(_))));
    assert!(!acquired);
}

#[test]
fn surface_is_viewport_minus_reserved_height() {
    let session = start();
    let size = session.surface_size();
    assert_eq!(size.width, 400.0);
    assert_eq!(size.height, 600.0);
    assert_eq!(session.surface().unwrap().size, Some(size));
    // Anchor plus ground and two walls.
    assert_eq!(session.world().body_count(), 4);
    assert_eq!(session.world().position(session.anchor()), Some(Vec2::new(200.0, 20.0)));
}

#[test]
fn chain_hangs_below_the_anchor() {
    let mut session = start();
    type_text(&mut session, "hello");
    run(&mut session, 600);

    let anchor = session.world().position(session.anchor()).unwrap();
    let chain = session.chains().active();
    let oldest = session.world().position(*chain.bodies().last().unwrap()).unwrap();
    let newest = session.world().position(chain.head().unwrap()).unwrap();

    for p in letter_positions(&session) {
        assert!(p.is_finite());
        assert!(p.y > anchor.y, "letter at {p:?} above anchor");
        assert!((p.x - anchor.x).abs() < 40.0, "letter at {p:?} still swinging");
    }
    assert!(newest.y > oldest.y);
}

#[test]
fn severed_chain_falls_to_the_ground() {
    let mut session = start();
    type_text(&mut session, "hello");
    run(&mut session, 240);
    let before = letter_positions(&session);

    session.break_chain();
    run(&mut session, 600);
    let after = letter_positions(&session);

    let ground_top = 580.0;
    let lowest = after.iter().map(|p| p.y).fold(f32::MIN, f32::max);
    assert!(lowest > 540.0 && lowest < ground_top, "lowest letter at {lowest}");
    for (b, a) in before.iter().zip(after.iter()) {
        assert!(a.y > b.y + 100.0, "letter did not fall: {b:?} -> {a:?}");
        assert!(a.y < ground_top);
        assert!(a.x > 0.0 && a.x < 400.0);
    }
}

#[test]
fn new_chain_hangs_while_old_one_lies_on_the_ground() {
    let mut session = start();
    type_text(&mut session, "ab");
    run(&mut session, 120);
    session.break_chain();
    run(&mut session, 240);
    type_text(&mut session, "cd");
    run(&mut session, 600);

    let world = session.world();
    for id in session.chains().finished()[0].bodies() {
        assert!(world.position(*id).unwrap().y > 500.0);
    }
    for id in session.chains().active().bodies() {
        assert!(world.position(*id).unwrap().y < 200.0);
    }
}

#[test]
fn dragging_moves_a_letter_without_touching_constraints() {
    let mut session = start();
    type_text(&mut session, "drag");
    run(&mut session, 360);

    let target = session.chains().active().head().unwrap();
    let grab = session.world().position(target).unwrap();
    let constraints = session.world().constraint_count();

    assert_eq!(session.pointer_down(grab), Some(target));
    assert_eq!(session.dragged(), Some(target));
    let pointer = Vec2::new(grab.x + 80.0, grab.y - 40.0);
    session.pointer_move(pointer);
    run(&mut session, 120);

    let moved = session.world().position(target).unwrap();
    assert!(moved.distance(grab) > 40.0, "held letter stayed at {moved:?}");
    assert!(moved.distance(pointer) < grab.distance(pointer));
    assert_eq!(session.world().constraint_count(), constraints);

    session.pointer_up();
    assert_eq!(session.dragged(), None);
    assert_eq!(session.world().constraint_count(), constraints);
}

#[test]
fn pointer_on_empty_space_grabs_nothing() {
    let mut session = start();
    assert_eq!(session.pointer_down(Vec2::new(50.0, 300.0)), None);
    // Fixed bodies cannot be dragged either.
    assert_eq!(session.pointer_down(Vec2::new(200.0, 20.0)), None);
}

#[test]
fn keys_drive_the_chain() {
    let mut session = start();
    assert_eq!(session.handle_key("h").unwrap(), Some(Command::Letter('h')));
    assert_eq!(session.handle_key("i").unwrap(), Some(Command::Letter('i')));
    assert_eq!(session.handle_key("Shift").unwrap(), None);
    assert_eq!(session.chains().active().len(), 2);

    assert_eq!(session.handle_key("Enter").unwrap(), Some(Command::Break('\n')));
    assert_eq!(session.chains().finished().len(), 1);
    assert!(session.chains().active().is_empty());
}

#[test]
fn virtual_keyboard_taps() {
    let mut session = start();
    assert_eq!(session.handle_virtual_key("A").unwrap(), Some(Command::Letter('A')));
    assert_eq!(session.handle_virtual_key(" ").unwrap(), Some(Command::Break(' ')));
    assert_eq!(session.handle_virtual_key("ENTER").unwrap(), Some(Command::Break('\n')));
    assert!(session.handle_virtual_key("SHIFT").is_err());

    assert_eq!(session.chains().finished().len(), 1);
    assert!(session.chains().active().is_empty());
}

#[test]
fn frames_take_fixed_steps_and_draw() {
    let mut session = start();
    type_text(&mut session, "x");

    assert_eq!(session.frame(0.02), FrameOutcome::Rendered { steps: 2 });
    assert_eq!(session.world().step_count(), 2);
    // A stalled frame is capped.
    let cap = session.config().solver.max_steps_per_frame;
    assert_eq!(session.frame(5.0), FrameOutcome::Rendered { steps: cap });
    assert_eq!(session.frame(0.0), FrameOutcome::Rendered { steps: 0 });

    let surface = session.surface().unwrap();
    assert_eq!(surface.count(|c| *c == Call::Clear), 3);
    assert_eq!(surface.texts(), vec!["x", "x", "x"]);
}

#[test]
fn observer_sees_ground_contacts() {
    let mut session = start();
    type_text(&mut session, "o");
    session.break_chain();
    let mut stats = StepStats::default();
    for _ in 0..600 {
        session.step_with(&mut stats);
    }
    assert_eq!(stats.steps, 600);
    assert_eq!(stats.constraint_passes, 600 * 10);
    assert!(stats.contacts > 0);
    assert_eq!(stats.peak_contacts, 1);
}

#[test]
fn teardown_releases_everything() {
    let mut session = start();
    type_text(&mut session, "bye");
    session.break_chain();
    type_text(&mut session, "now");
    session.pointer_down(session.world().position(session.chains().active().head().unwrap()).unwrap());
    run(&mut session, 10);

    let surface = session.teardown().unwrap();
    assert_eq!(surface.calls.last(), Some(&Call::Detach));
    assert_eq!(surface.count(|c| *c == Call::Detach), 1);

    assert!(!session.is_running());
    assert_eq!(session.world().body_count(), 0);
    assert_eq!(session.world().constraint_count(), 0);
    assert_eq!(session.chains().letter_count(), 0);
    assert_eq!(session.dragged(), None);
    assert!(session.surface().is_none());
}

#[test]
fn teardown_is_idempotent_and_stops_the_loop() {
    let mut session = start();
    type_text(&mut session, "ok");
    assert!(session.teardown().is_some());
    assert!(session.teardown().is_none());

    assert_eq!(session.frame(0.5), FrameOutcome::Stopped);
    assert!(!session.step());
    assert!(!session.render());
    assert_eq!(session.add_letter('z'), Ok(None));
    assert_eq!(session.world().body_count(), 0);
}

#[test]
fn input_after_teardown_is_not_applied() {
    let mut session = start();
    session.teardown();

    assert_eq!(session.handle_key("q"), Ok(None));
    assert_eq!(session.handle_key("Enter"), Ok(None));
    assert_eq!(session.handle_virtual_key("Q"), Ok(None));
    assert_eq!(session.apply(Command::Letter('q')), Ok(None));
    // Bad tokens are still reported.
    assert!(session.handle_virtual_key("SHIFT").is_err());
    assert_eq!(session.chains().letter_count(), 0);
}

#[test]
fn dropping_a_running_session_detaches_once() {
    let detached = Rc::new(Cell::new(0));
    let counter = Rc::clone(&detached);
    let mut session = Session::start(WormConfig::default(), Viewport::new(400.0, 806.0), move |size| {
        Some(RecordingSurface::sized(size).counting_detach(counter))
    })
    .unwrap();
    session.add_letter('d').unwrap();
    session.frame(0.05);
    assert_eq!(detached.get(), 0);

    drop(session);
    assert_eq!(detached.get(), 1);
}

#[test]
fn dropping_after_teardown_does_not_detach_again() {
    let detached = Rc::new(Cell::new(0));
    let counter = Rc::clone(&detached);
    let mut session = Session::start(WormConfig::default(), Viewport::new(400.0, 806.0), move |size| {
        Some(RecordingSurface::sized(size).counting_detach(counter))
    })
    .unwrap();
    let surface = session.teardown();
    assert!(surface.is_some());
    drop(session);
    drop(surface);
    assert_eq!(detached.get(), 1);
}
