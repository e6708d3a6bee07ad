use labyrinth_core::{GameConfig, LayoutSymbol, PaletteSymbol, PlacementRejection, Position};
use labyrinth_system_editor::{
    palette_anchor, EditorOutcome, LevelEditor, CLEAR_ALL_BUTTON, PLAY_MAP_BUTTON,
};

fn editor() -> LevelEditor {
    LevelEditor::new(&GameConfig::default())
}

fn pick(editor: &mut LevelEditor, symbol: PaletteSymbol) {
    assert_eq!(
        editor.handle_click(palette_anchor(symbol)),
        EditorOutcome::Selected(symbol),
        "palette swatch for {symbol:?} should select it"
    );
}

#[test]
fn second_start_is_rejected_and_leaves_placements_unchanged() {
    let mut editor = editor();
    pick(&mut editor, PaletteSymbol::Start);
    assert!(matches!(
        editor.handle_click(Position::new(0.0, 0.0)),
        EditorOutcome::Placed(_)
    ));
    let before = editor.placements().to_vec();

    let outcome = editor.handle_click(Position::new(48.0, 48.0));

    assert_eq!(
        outcome,
        EditorOutcome::Rejected(PlacementRejection::DuplicateStart)
    );
    assert_eq!(editor.placements(), before.as_slice());
    assert_eq!(
        PlacementRejection::DuplicateStart.message(),
        Some("Only ONE start allowed!")
    );
}

#[test]
fn second_end_is_rejected() {
    let mut editor = editor();
    pick(&mut editor, PaletteSymbol::End);
    let _ = editor.handle_click(Position::new(24.0, 0.0));
    assert_eq!(
        editor.handle_click(Position::new(-24.0, 0.0)),
        EditorOutcome::Rejected(PlacementRejection::DuplicateEnd)
    );
}

#[test]
fn treasure_then_wall_on_one_cell_is_stacking() {
    let mut editor = editor();
    pick(&mut editor, PaletteSymbol::Treasure);
    let _ = editor.handle_click(Position::new(24.0, 24.0));
    pick(&mut editor, PaletteSymbol::Wall);

    let outcome = editor.handle_click(Position::new(30.0, 20.0));

    assert_eq!(outcome, EditorOutcome::Rejected(PlacementRejection::Stacked));
    assert_eq!(editor.placements().len(), 1);
}

#[test]
fn empty_export_is_a_walled_box() {
    let layout = editor().export();
    let rows = layout.rows();
    assert_eq!(rows.len(), 20);
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), 25);
        if index == 0 || index == 19 {
            assert!(row.chars().all(|cell| cell == 'X'), "row {index}: {row}");
        } else {
            assert!(row.starts_with('X') && row.ends_with('X'), "row {index}: {row}");
            assert!(row[1..24].chars().all(|cell| cell == '.'), "row {index}: {row}");
        }
    }
}

#[test]
fn export_maps_cells_around_the_grid_centre() {
    let mut editor = editor();
    pick(&mut editor, PaletteSymbol::Start);
    let _ = editor.handle_click(Position::new(-24.0 * 11.0, 24.0 * 9.0));
    pick(&mut editor, PaletteSymbol::End);
    let _ = editor.handle_click(Position::new(0.0, 0.0));
    pick(&mut editor, PaletteSymbol::Enemy);
    let _ = editor.handle_click(Position::new(24.0, -24.0));

    let layout = editor.export();
    let rows = layout.rows();
    assert_eq!(rows[19].chars().nth(1), Some('S'));
    assert_eq!(rows[10].chars().nth(12), Some('F'));
    assert_eq!(rows[9].chars().nth(13), Some('E'));
    assert!(layout.contains(LayoutSymbol::Start) && layout.contains(LayoutSymbol::End));
    assert!(editor.has_start_and_end());
}

#[test]
fn clear_all_drops_placements_and_selection() {
    let mut editor = editor();
    pick(&mut editor, PaletteSymbol::Wall);
    let _ = editor.handle_click(Position::new(0.0, 0.0));

    let outcome = editor.handle_click(Position::new(
        CLEAR_ALL_BUTTON.x + 1.0,
        CLEAR_ALL_BUTTON.y + 1.0,
    ));

    assert_eq!(outcome, EditorOutcome::Cleared);
    assert!(editor.placements().is_empty());
    assert_eq!(editor.selected(), None);
}

#[test]
fn play_button_takes_precedence_over_the_palette_column() {
    let mut editor = editor();
    let outcome = editor.handle_click(Position::new(PLAY_MAP_BUTTON.x, PLAY_MAP_BUTTON.y + 10.0));
    assert_eq!(outcome, EditorOutcome::PlayRequested);
}

#[test]
fn far_and_non_finite_clicks_are_out_of_bounds() {
    let mut editor = editor();
    for point in [
        Position::new(-1.0e12, 0.0),
        Position::new(0.0, 1.0e12),
        Position::new(f32::NAN, 0.0),
        Position::new(0.0, f32::INFINITY),
    ] {
        assert_eq!(
            editor.place(PaletteSymbol::Start, point),
            Err(PlacementRejection::OutOfBounds),
            "{point:?} must be rejected"
        );
    }
    assert!(editor.placements().is_empty());

    let placed = editor.place(PaletteSymbol::Start, Position::new(0.0, 0.0));
    assert!(placed.is_ok(), "a real start is still accepted: {placed:?}");
}

#[test]
fn oversized_grid_settings_fall_back_to_the_default_grid() {
    let config = GameConfig {
        editor_columns: u32::MAX,
        editor_rows: u32::MAX,
        ..GameConfig::default()
    };
    let editor = LevelEditor::new(&config);
    assert_eq!(editor.dimensions(), (25, 20));
}

proptest::proptest! {
    #[test]
    fn any_click_sequence_keeps_markers_unique_and_the_grid_sized(
        clicks in proptest::collection::vec(
            (0usize..5, -14i32..=14, -11i32..=11),
            0..40,
        )
    ) {
        let mut editor = editor();
        for (symbol, cx, cy) in clicks {
            let _ = editor.place(
                PaletteSymbol::ALL[symbol],
                Position::new(cx as f32 * 24.0, cy as f32 * 24.0),
            );
        }

        let starts = editor
            .placements()
            .iter()
            .filter(|placed| placed.symbol == PaletteSymbol::Start)
            .count();
        let ends = editor
            .placements()
            .iter()
            .filter(|placed| placed.symbol == PaletteSymbol::End)
            .count();
        proptest::prop_assert!(starts <= 1 && ends <= 1);

        let layout = editor.export();
        proptest::prop_assert_eq!(layout.row_count(), 20);
        proptest::prop_assert!(layout.rows().iter().all(|row| row.len() == 25));
    }
}
