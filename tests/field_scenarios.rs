//! Field Scenarios - building, querying and rearranging a remembered scene

use chrest_vsf::{
    Chrest, ChrestConfig, ChrestError, FieldOptions, FieldTimings, ItemSquare, MoveViolation,
    Pattern, RandomFixations, ScanFixations, Scene, VisualSpatialField, GHOST_ID_PREFIX,
};

const OBJECT_ENCODING_TIME: i64 = 50;
const EMPTY_SQUARE_ENCODING_TIME: i64 = 10;
const ACCESS_TIME: i64 = 100;
const MOVE_TIME: i64 = 25;
const RECOGNISED_LIFESPAN: i64 = 10_000;
const UNRECOGNISED_LIFESPAN: i64 = 5_000;

fn timings() -> FieldTimings {
    FieldTimings::new(
        OBJECT_ENCODING_TIME,
        EMPTY_SQUARE_ENCODING_TIME,
        ACCESS_TIME,
        MOVE_TIME,
        RECOGNISED_LIFESPAN,
        UNRECOGNISED_LIFESPAN,
    )
}

/// Model that has fully learned the chunk "A at (1,1), B at (2,1)".
fn trained_model() -> Chrest {
    let mut model = Chrest::new(ChrestConfig::new().with_learning_times(10, 2)).unwrap();
    let chunk = Pattern::item_squares([ItemSquare::new("A", 1, 1), ItemSquare::new("B", 2, 1)]);
    for _ in 0..20 {
        let t = model.learning_clock();
        model.recognise_and_learn(&chunk, t);
    }
    let node = model.recognise(&chunk);
    assert_eq!(model.node(node).unwrap().image(), &chunk);
    model
}

/// 5x5: chunk a/b, loose c/d, blind corner and (1,0).
fn scene() -> Scene {
    Scene::from_rows(
        "five",
        &[
            ".   .   .   .   .",
            ".   .   .   c:C .",
            ".   .   .   .   .",
            ".   a:A b:B .   .",
            "*   *   .   .   d:D",
        ],
    )
    .unwrap()
}

fn build(model: &mut Chrest, scene: &Scene, options: FieldOptions) -> (VisualSpatialField, i64) {
    let start = model.max_clock();
    let field =
        VisualSpatialField::new(model, scene, timings(), options, &mut ScanFixations, start)
            .unwrap();
    (field, start)
}

#[test]
fn scenario_encoding_time() {
    let mut model = trained_model();
    let (field, start) = build(&mut model, &scene(), FieldOptions::new(4));

    // One chunk, two loose objects, 25 - 4 objects - 2 blind empty squares.
    let expected = start
        + ACCESS_TIME
        + OBJECT_ENCODING_TIME * (1 + 2)
        + EMPTY_SQUARE_ENCODING_TIME * 19;
    assert_eq!(model.attention_clock(), expected);

    let chunk_time = start + ACCESS_TIME + OBJECT_ENCODING_TIME;
    for (col, row) in [(1, 1), (2, 1)] {
        let o = &field.square_log(col, row).unwrap()[0];
        assert_eq!(o.time_created(), chunk_time);
        assert!(o.is_recognised(chunk_time));
        assert_eq!(o.terminus(), Some(chunk_time + RECOGNISED_LIFESPAN));
    }

    let c = &field.square_log(3, 3).unwrap()[0];
    let d = &field.square_log(4, 0).unwrap()[0];
    assert_eq!(c.time_created(), chunk_time + OBJECT_ENCODING_TIME);
    assert_eq!(d.time_created(), chunk_time + 2 * OBJECT_ENCODING_TIME);
    assert!(!d.is_recognised(d.time_created()));
    assert_eq!(d.terminus(), Some(d.time_created() + UNRECOGNISED_LIFESPAN));
}

#[test]
fn scenario_move_onto_blind_square() {
    let mut model = trained_model();
    let (mut field, _) = build(&mut model, &scene(), FieldOptions::new(4));
    let t = model.attention_clock();
    let blind_before = field.square_log(1, 0).unwrap().to_vec();

    field
        .move_objects(
            &mut model,
            &[vec![ItemSquare::new("a", 1, 1), ItemSquare::new("a", 1, 0)]],
            t,
        )
        .unwrap();

    let pickup = t + ACCESS_TIME;
    assert_eq!(field.square_log(1, 0).unwrap(), blind_before.as_slice());
    assert_eq!(field.square_log(1, 1).unwrap()[0].terminus(), Some(pickup));
    assert_eq!(model.attention_clock(), pickup + MOVE_TIME);
}

#[test]
fn scenario_scene_before_encoding_and_after_decay() {
    let mut model = trained_model();
    let (field, start) = build(&mut model, &scene(), FieldOptions::new(4));

    let before = field.get_as_scene(start - 1, true);
    assert!(before.squares().all(|(_, _, o)| o.is_blind()));

    let after = field.get_as_scene(start + 1_000_000, true);
    for (col, row, o) in after.squares() {
        if (col, row) == (0, 0) || (col, row) == (1, 0) {
            assert!(o.is_blind(), "({}, {})", col, row);
        } else {
            assert!(o.is_unknown(), "({}, {})", col, row);
        }
    }

    // While fresh, the field reproduces the scene exactly.
    let now = model.attention_clock();
    let fresh = field.get_as_scene(now, true);
    assert_eq!(scene().recall(&fresh).unwrap(), 1.0);
    assert_eq!(scene().errors_of_commission(&fresh).unwrap(), 0);

    // Unrecognised objects go first.
    let faded = field.get_as_scene(now + UNRECOGNISED_LIFESPAN, true);
    assert_eq!(scene().recall(&faded).unwrap(), 0.5);
    assert_eq!(scene().errors_of_omission(&faded).unwrap(), 2);
}

#[test]
fn scenario_comparison_with_wrong_size_scene() {
    let mut model = trained_model();
    let (field, _) = build(&mut model, &scene(), FieldOptions::new(4));
    let rendered = field.get_as_scene(model.attention_clock(), true);
    let other = Scene::new("small", 4, 5);
    assert!(matches!(
        rendered.precision(&other),
        Err(ChrestError::DimensionMismatch { .. })
    ));
}

#[test]
fn scenario_ghost_objects() {
    // b has gone, but the chunk still predicts it.
    let without_b = Scene::from_rows(
        "ghostly",
        &[
            ".   .   .   .   .",
            ".   .   .   c:C .",
            ".   .   .   .   .",
            ".   a:A .   .   .",
            "*   *   .   .   d:D",
        ],
    )
    .unwrap();

    let mut model = trained_model();
    let (mut field, start) = build(
        &mut model,
        &without_b,
        FieldOptions::new(4).with_ghost_objects(true),
    );
    let chunk_time = start + ACCESS_TIME + OBJECT_ENCODING_TIME;

    let ghost = &field.square_log(2, 1).unwrap()[0];
    assert!(ghost.is_ghost());
    assert!(ghost.identifier().starts_with(GHOST_ID_PREFIX));
    assert_eq!(ghost.object_class(), "B");
    assert_eq!(ghost.time_created(), chunk_time);
    assert!(ghost.is_recognised(chunk_time));
    assert_eq!(ghost.terminus(), Some(chunk_time + RECOGNISED_LIFESPAN));
    // The ghost's square is not encoded as empty, so costs match the
    // scene with b present.
    assert_eq!(
        model.attention_clock(),
        start + ACCESS_TIME + OBJECT_ENCODING_TIME * 3 + EMPTY_SQUARE_ENCODING_TIME * 19
    );

    let now = model.attention_clock();
    assert_eq!(
        field.get_as_scene(now, true).get(2, 1).unwrap().object_class(),
        "B"
    );
    assert!(field.get_as_scene(now, false).get(2, 1).unwrap().is_unknown());

    // Moving a ghost keeps it a ghost and leaves blindness behind.
    let id = ghost.identifier().to_string();
    field
        .move_objects(
            &mut model,
            &[vec![ItemSquare::new(id.clone(), 2, 1), ItemSquare::new(id.clone(), 2, 2)]],
            now,
        )
        .unwrap();
    let later = model.attention_clock();
    let moved = field.objects_on_square(2, 2, later);
    let moved = moved.iter().find(|o| o.identifier() == id).unwrap();
    assert!(moved.is_ghost());
    assert!(!moved.is_recognised(later));
    assert!(field.resolve(2, 1, later, true).is_blind());
}

#[test]
fn scenario_no_ghosts_unless_asked() {
    let without_b = Scene::from_rows("plain", &[".   a:A .", "*   .   ."]).unwrap();
    let mut model = Chrest::new(ChrestConfig::new().with_learning_times(10, 2)).unwrap();
    let chunk = Pattern::item_squares([ItemSquare::new("A", 1, 1), ItemSquare::new("B", 2, 1)]);
    for _ in 0..20 {
        let t = model.learning_clock();
        model.recognise_and_learn(&chunk, t);
    }
    let (field, _) = build(&mut model, &without_b, FieldOptions::new(2));
    assert!(field.square_log(2, 1).unwrap()[0].is_empty_square());
    assert!(field
        .square_log(2, 1)
        .unwrap()
        .iter()
        .all(|o| !o.is_ghost()));
}

#[test]
fn scenario_creator_moves_and_stays_eternal() {
    let scene = Scene::from_rows("me", &["me:SELF .", ".       x:X"]).unwrap();
    let mut model = Chrest::new(ChrestConfig::default()).unwrap();
    let (mut field, _) = build(&mut model, &scene, FieldOptions::new(1).with_creator(true));
    let t = model.attention_clock();

    field
        .move_objects(
            &mut model,
            &[vec![ItemSquare::new("me", 0, 1), ItemSquare::new("me", 1, 1)]],
            t,
        )
        .unwrap();

    let me = field.objects_on_square(1, 1, t + 1_000_000);
    assert_eq!(me.len(), 1);
    assert!(me[0].is_creator());
    assert_eq!(me[0].terminus(), None);
}

#[test]
fn scenario_busy_attention_then_retry() {
    let mut model = trained_model();
    let (mut field, _) = build(&mut model, &scene(), FieldOptions::new(4));
    let ready = model.attention_clock();
    let snapshot = field.clone();
    let moves = vec![vec![ItemSquare::new("c", 3, 3), ItemSquare::new("c", 3, 4)]];

    let err = field.move_objects(&mut model, &moves, ready - 10).unwrap_err();
    assert_eq!(
        err,
        ChrestError::IllegalMove(MoveViolation::AttentionBusy {
            requested: ready - 10,
            free_at: ready
        })
    );
    assert_eq!(field, snapshot);

    field.move_objects(&mut model, &moves, ready).unwrap();
    assert_eq!(field.locate("c", model.attention_clock()), Some((3, 4)));
}

#[test]
fn scenario_random_fixations_still_encode_everything() {
    let mut model = trained_model();
    let start = model.max_clock();
    let field = VisualSpatialField::new(
        &mut model,
        &scene(),
        timings(),
        FieldOptions::new(6),
        &mut RandomFixations::seeded(42),
        start,
    )
    .unwrap();

    let now = model.attention_clock();
    let rendered = field.get_as_scene(now, true);
    assert_eq!(scene().recall(&rendered).unwrap(), 1.0);
    assert_eq!(scene().precision(&rendered).unwrap(), 1.0);
    for id in ["a", "b", "c", "d"] {
        assert!(field.locate(id, now).is_some(), "{}", id);
    }
}
