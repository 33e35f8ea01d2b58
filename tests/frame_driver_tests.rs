//! Frame driver behavior end to end, against a recording backend.

mod common;

use common::*;
use neogrid::{CursorShape, FrameState, HighlightAttribute, LineCell, RedrawEvent};
use neogrid_config::Rgb;
use neogrid_fonts::{FontError, GlyphStyle};
use neogrid_render::{GlyphKey, VertexStream};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

fn glyph_rect(driver: &TestDriver, ch: char, style: GlyphStyle) -> [f32; 4] {
    driver
        .glyphs()
        .atlas
        .get_rect(GlyphKey::new(ch, style))
        .unwrap_or_else(|| panic!("{ch:?} not in atlas"))
        .to_array()
}

fn tex1(stream: &VertexStream, row: usize, col: usize) -> [f32; 4] {
    stream.record(row, col).unwrap().tex1
}

#[test]
fn test_two_cell_line_on_fresh_grid() {
    let mut driver = driver(24, 80);
    send(
        &mut driver,
        [
            RedrawEvent::GridResize { rows: 24, cols: 80 },
            RedrawEvent::DefaultColors {
                foreground: Rgb(0xFFFFFF),
                background: Rgb(0x000000),
                special: Rgb(0xFF0000),
            },
            RedrawEvent::Line {
                row: 0,
                col_start: 0,
                cells: vec![
                    LineCell::new('H').with_attr(0).repeated(1),
                    LineCell::new('i').with_attr(0).repeated(1),
                ],
            },
        ],
    );

    let stats = driver.stats();
    assert_eq!(stats.glyph_cells, 2);
    assert!(!driver.grid().is_row_dirty(0));
    assert!(driver.grid().dirty_rows().next().is_none());

    let stream = driver.stream();
    let h = stream.record(0, 0).unwrap();
    assert_eq!(h.tex1, glyph_rect(&driver, 'H', GlyphStyle::PLAIN));
    assert_eq!((h.fg, h.bg), (WHITE, BLACK));
    let i = stream.record(0, 1).unwrap();
    assert_eq!(i.tex1, glyph_rect(&driver, 'i', GlyphStyle::PLAIN));
    assert_eq!((i.fg, i.bg), (WHITE, BLACK));

    // Every other cell is background only.
    for row in 0..24 {
        for col in 0..80 {
            if row == 0 && col < 2 {
                continue;
            }
            let record = stream.record(row, col).unwrap();
            assert_eq!(record.tex1, [0.0; 4], "({row}, {col}) drew a glyph");
            assert_eq!(record.bg, BLACK);
        }
    }
    assert_eq!(driver.glyphs().atlas.len(), 2);
    assert_eq!(driver.state(), FrameState::Presented);
    assert_eq!(driver.backend().last_frame().clear_color, BLACK);
}

#[test]
fn test_written_cells_match_atlas_after_flush() {
    let mut driver = driver(6, 20);
    send(&mut driver, []);

    let bold = HighlightAttribute {
        bold: true,
        ..Default::default()
    };
    let italic = HighlightAttribute {
        italic: true,
        underline: true,
        ..Default::default()
    };
    send(
        &mut driver,
        [
            RedrawEvent::HighlightDefine { id: 1, attr: bold },
            RedrawEvent::HighlightDefine { id: 2, attr: italic },
            RedrawEvent::line(0, 0, "plain text", 0),
            RedrawEvent::line(2, 4, "bold", 1),
            RedrawEvent::line(5, 10, "italic", 2),
        ],
    );

    assert!(driver.grid().dirty_rows().next().is_none());
    for row in 0..6 {
        for col in 0..20 {
            let cell = *driver.grid().cell(row, col).unwrap();
            let draw = driver.grid().cell_draw(row, col).unwrap();
            let expected = match draw.glyph_key() {
                Some(key) => driver.glyphs().atlas.get_rect(key).unwrap().to_array(),
                None => [0.0; 4],
            };
            assert_eq!(tex1(driver.stream(), row, col), expected, "({row}, {col}) {cell:?}");
        }
    }
    assert_ne!(
        glyph_rect(&driver, 'l', GlyphStyle::PLAIN),
        glyph_rect(
            &driver,
            'l',
            GlyphStyle {
                bold: true,
                ..Default::default()
            }
        )
    );
}

#[test]
fn test_repeated_glyph_rasterized_once() {
    let mut driver = driver(4, 10);
    send(&mut driver, [RedrawEvent::line(0, 0, "aaaa", 0)]);
    let pen = driver.glyphs().atlas.pen();

    send(&mut driver, [RedrawEvent::line(3, 0, "a", 0)]);
    assert_eq!(driver.glyphs().atlas.pen(), pen);
    assert_eq!(driver.glyphs().rasterizer.render_count('a'), 1);
}

#[test]
fn test_scroll_round_trip_duplicates_boundary_row() {
    let mut driver = driver(8, 10);
    let texts = ["row zero", "row one", "row two", "row three", "row four"];
    send(
        &mut driver,
        texts
            .iter()
            .enumerate()
            .map(|(row, text)| RedrawEvent::line(row, 0, text, 0)),
    );
    let original: Vec<String> = (0..5).map(|r| driver.grid().row_text(r)).collect();
    let original_tex: Vec<[f32; 4]> = (0..5).map(|r| tex1(driver.stream(), r, 4)).collect();

    let scroll = |rows| RedrawEvent::Scroll {
        top: 0,
        bottom: 5,
        left: 0,
        right: 10,
        rows,
    };
    send(&mut driver, [scroll(1)]);
    assert_eq!(driver.stats().rows_redrawn, 0);
    assert_eq!(driver.grid().row_text(0), original[1]);
    assert_eq!(driver.grid().row_text(4), original[4]);

    send(&mut driver, [scroll(-1)]);
    for row in 1..5 {
        assert_eq!(driver.grid().row_text(row), original[row]);
        assert_eq!(tex1(driver.stream(), row, 4), original_tex[row]);
    }
    // The boundary row keeps the copy it received.
    assert_eq!(driver.grid().row_text(0), original[1]);
    assert_eq!(tex1(driver.stream(), 0, 4), original_tex[1]);

    // Positions never move.
    assert_eq!(driver.stream().record(0, 4).unwrap().position, [32.0, 0.0, 8.0, 16.0]);
}

#[test]
fn test_scroll_past_region_height_copies_nothing() {
    let mut driver = driver(4, 6);
    send(&mut driver, [RedrawEvent::line(0, 0, "keep", 0)]);
    send(
        &mut driver,
        [RedrawEvent::Scroll {
            top: 0,
            bottom: 3,
            left: 0,
            right: 6,
            rows: 3,
        }],
    );
    assert_eq!(driver.grid().row_text(0), "keep  ");
}

#[test]
fn test_wide_glyph_spills_into_next_column() {
    let mut driver = driver(2, 6);
    let red = HighlightAttribute {
        foreground: Some(Rgb(0xFF0000)),
        ..Default::default()
    };
    send(
        &mut driver,
        [
            RedrawEvent::HighlightDefine { id: 1, attr: red },
            RedrawEvent::Line {
                row: 0,
                col_start: 1,
                cells: vec![LineCell::new('日').with_attr(1), LineCell::empty()],
            },
        ],
    );

    let rect = driver
        .glyphs()
        .atlas
        .get_rect(GlyphKey::new('日', GlyphStyle::PLAIN))
        .unwrap();
    assert_eq!(rect.width, 2 * CELL.width);
    let stream = driver.stream();
    assert_eq!(tex1(stream, 0, 1)[2], CELL.width as f32);
    let spill = stream.record(0, 2).unwrap();
    assert_eq!(
        spill.tex2,
        [(rect.x + CELL.width) as f32, rect.y as f32, CELL.width as f32, CELL.height as f32]
    );
    assert_eq!(spill.fg, [1.0, 0.0, 0.0, 1.0]);

    // A narrow glyph in its place removes the spill.
    send(&mut driver, [RedrawEvent::line(0, 1, "ab", 0)]);
    assert_eq!(driver.stream().record(0, 2).unwrap().tex2, [0.0; 4]);
    assert_eq!(tex1(driver.stream(), 0, 2), glyph_rect(&driver, 'b', GlyphStyle::PLAIN));
}

#[test]
fn test_unrenderable_glyph_uses_placeholder() {
    let mut driver = driver(1, 4);
    send(
        &mut driver,
        [RedrawEvent::Line {
            row: 0,
            col_start: 0,
            cells: vec![LineCell::new(MISSING).repeated(2)],
        }],
    );
    let placeholder = driver.glyphs().atlas.get_rect(GlyphKey::UNSUPPORTED).unwrap();
    assert_eq!(tex1(driver.stream(), 0, 0), placeholder.to_array());
    assert_eq!(tex1(driver.stream(), 0, 1), placeholder.to_array());
    assert_eq!(driver.glyphs().rasterizer.render_count(MISSING), 1);
}

#[test]
fn test_atlas_growth_repaints_full_grid() {
    let mut config = test_config(3, 8);
    // Four glyphs per shelf, one shelf at first, two at most.
    config.atlas_width = 32;
    config.atlas_initial_height = 16;
    config.atlas_max_height = 32;
    let mut driver = driver_with(&config);
    send(&mut driver, [RedrawEvent::line(1, 0, "abcdef", 0)]);

    let stats = driver.stats();
    assert_eq!(stats.atlas_generation, 1);
    assert_eq!(driver.glyphs().atlas.height(), 32);
    assert_eq!(stats.rows_redrawn, 6);
    for (col, ch) in "abcdef".chars().enumerate() {
        assert_eq!(tex1(driver.stream(), 1, col), glyph_rect(&driver, ch, GlyphStyle::PLAIN));
    }
    // The backend received the regrown texture in full.
    let frame = driver.backend().last_frame();
    assert_eq!(frame.uniforms.atlas_size, [32.0, 32.0]);
    assert_eq!(driver.backend().gpu_atlas_size, (32, 32));
    assert_eq!(driver.backend().gpu_atlas, driver.glyphs().atlas.pixels());
}

#[test]
fn test_atlas_reset_at_ceiling_repaints() {
    let mut config = test_config(2, 8);
    config.atlas_width = 32;
    config.atlas_initial_height = 16;
    config.atlas_max_height = 16;
    let mut driver = driver_with(&config);
    send(&mut driver, [RedrawEvent::line(0, 0, "abcd", 0)]);
    assert_eq!(driver.stats().atlas_generation, 0);

    // The old glyphs leave the screen, so the new ones fit after a reset.
    send(&mut driver, [RedrawEvent::line(0, 0, "efgh", 0)]);
    let atlas = &driver.glyphs().atlas;
    assert_eq!(atlas.generation(), 1);
    assert_eq!(atlas.height(), 16);
    assert!(atlas.get_rect(GlyphKey::new('a', GlyphStyle::PLAIN)).is_none());
    // Row 0 once before the reset, then both rows.
    assert_eq!(driver.stats().rows_redrawn, 3);
    for (col, ch) in "efgh".chars().enumerate() {
        assert_eq!(tex1(driver.stream(), 0, col), glyph_rect(&driver, ch, GlyphStyle::PLAIN));
    }
    assert!(matches!(
        driver.backend().last_frame().atlas,
        Some(neogrid_render::AtlasUpload::Full { .. })
    ));
}

#[test]
fn test_highlight_change_repaints_without_rerasterizing() {
    let mut driver = driver(5, 10);
    send(&mut driver, [RedrawEvent::line(2, 0, "text", 0)]);
    let generation = driver.glyphs().atlas.generation();
    let cached = driver.glyphs().atlas.len();

    send(
        &mut driver,
        [RedrawEvent::DefaultColors {
            foreground: Rgb(0x00FF00),
            background: Rgb(0x000080),
            special: Rgb(0xFF0000),
        }],
    );
    assert_eq!(driver.stats().rows_redrawn, 5);
    assert_eq!(driver.glyphs().atlas.generation(), generation);
    assert_eq!(driver.glyphs().atlas.len(), cached);
    assert_eq!(driver.glyphs().rasterizer.render_count('t'), 1);
    assert_eq!(driver.stream().record(2, 0).unwrap().fg, [0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn test_bad_updates_are_skipped() {
    let mut driver = driver(3, 5);
    send(
        &mut driver,
        [
            RedrawEvent::line(7, 0, "x", 0),
            RedrawEvent::line(0, 3, "toolong", 0),
            RedrawEvent::Scroll {
                top: 0,
                bottom: 9,
                left: 0,
                right: 5,
                rows: 1,
            },
            RedrawEvent::line(1, 0, "ok", 0),
        ],
    );
    assert_eq!(driver.grid().row_text(0), "     ");
    assert_eq!(driver.grid().row_text(1), "ok   ");
    assert_eq!(driver.state(), FrameState::Presented);
}

#[test]
fn test_partial_upload_covers_changed_row_only() {
    let mut driver = driver(4, 10);
    send(&mut driver, []);
    assert!(matches!(
        driver.backend().last_frame().vertices,
        VertexRecord::Full { .. }
    ));

    send(&mut driver, [RedrawEvent::line(2, 3, "x", 0)]);
    let record = std::mem::size_of::<neogrid_render::CellVertex>() as u64;
    // The cursor record did not change, so only the row goes up.
    assert_eq!(
        driver.backend().last_frame().vertices,
        VertexRecord::Partial(vec![(20 * record, 10 * record as usize)])
    );
    assert_eq!(driver.backend().gpu_vertices, stream_bytes(driver.stream().records()));
}

#[test]
fn test_edit_under_cursor_uploads_row_and_cursor_spans() {
    let mut driver = driver(50, 200);
    send(&mut driver, []);

    send(&mut driver, [RedrawEvent::line(0, 0, "x", 0)]);
    let record = std::mem::size_of::<neogrid_render::CellVertex>();
    // Row 0, then the cursor record after all 50 * 200 grid records.
    assert_eq!(
        driver.backend().last_frame().vertices,
        VertexRecord::Partial(vec![(0, 200 * record), ((10_000 * record) as u64, record)])
    );
    assert_eq!(driver.backend().gpu_vertices, stream_bytes(driver.stream().records()));
}

#[test]
fn test_scroll_edge_through_wide_glyph_repaints_spill() {
    let mut driver = driver(3, 8);
    send(
        &mut driver,
        [RedrawEvent::Line {
            row: 1,
            col_start: 3,
            cells: vec![LineCell::new('日'), LineCell::empty()],
        }],
    );
    assert_ne!(driver.stream().record(1, 4).unwrap().tex2, [0.0; 4]);

    // The region's right edge falls between the glyph and its spill.
    send(
        &mut driver,
        [RedrawEvent::Scroll {
            top: 0,
            bottom: 3,
            left: 0,
            right: 4,
            rows: 1,
        }],
    );

    let rect = driver
        .glyphs()
        .atlas
        .get_rect(GlyphKey::new('日', GlyphStyle::PLAIN))
        .unwrap();
    let stream = driver.stream();
    assert_eq!(
        stream.record(0, 4).unwrap().tex2,
        [(rect.x + CELL.width) as f32, rect.y as f32, CELL.width as f32, CELL.height as f32]
    );
    assert_eq!(stream.record(1, 4).unwrap().tex2, [0.0; 4]);
    assert!(!stream.is_wide(1, 3));
    assert_eq!(driver.backend().gpu_vertices, stream_bytes(driver.stream().records()));
}

#[test]
fn test_scroll_left_edge_after_wide_glyph_drops_orphan_spill() {
    let mut driver = driver(2, 8);
    send(
        &mut driver,
        [RedrawEvent::Line {
            row: 1,
            col_start: 3,
            cells: vec![LineCell::new('日'), LineCell::empty()],
        }],
    );

    // Only the spill half lies inside the region.
    send(
        &mut driver,
        [RedrawEvent::Scroll {
            top: 0,
            bottom: 2,
            left: 4,
            right: 8,
            rows: 1,
        }],
    );

    let stream = driver.stream();
    assert_eq!(stream.record(0, 4).unwrap().tex2, [0.0; 4]);
    assert!(!stream.is_wide(0, 3));
    assert_ne!(stream.record(1, 4).unwrap().tex2, [0.0; 4]);
}

#[test]
fn test_gpu_mirror_tracks_stream_across_frames() {
    let mut driver = driver(6, 12);
    send(&mut driver, [RedrawEvent::line(0, 0, "hello", 0)]);
    send(
        &mut driver,
        [
            RedrawEvent::Scroll {
                top: 0,
                bottom: 6,
                left: 0,
                right: 12,
                rows: -2,
            },
            RedrawEvent::line(0, 0, "world", 0),
            RedrawEvent::CursorGoto { row: 3, col: 4 },
        ],
    );
    send(&mut driver, [RedrawEvent::GridResize { rows: 7, cols: 9 }]);
    send(&mut driver, [RedrawEvent::line(6, 0, "end", 0)]);

    let backend = driver.backend();
    assert_eq!(backend.gpu_vertices, stream_bytes(driver.stream().records()));
    assert_eq!(backend.last_frame().instance_count, 7 * 9 + 1);
}

#[test]
fn test_idle_tick_presents_nothing() {
    let mut driver = driver(2, 2);
    send(&mut driver, []);
    let frames = driver.backend().frames.len();

    assert!(!driver.render_frame().unwrap());
    assert_eq!(driver.state(), FrameState::Idle);
    assert_eq!(driver.backend().frames.len(), frames);

    // Unflushed events are not applied.
    driver.queue().push(RedrawEvent::line(0, 0, "z", 0));
    assert!(!driver.render_frame().unwrap());
    assert_eq!(driver.grid().row_text(0), "  ");
}

#[test]
fn test_block_cursor_inverts_cell() {
    let mut driver = driver(2, 4);
    send(
        &mut driver,
        [
            RedrawEvent::line(1, 0, "ab", 0),
            RedrawEvent::CursorGoto { row: 1, col: 1 },
        ],
    );
    let range = driver.cursor().range();
    let overlay = *driver.stream().overlay_record(range, 0).unwrap();
    assert_eq!(overlay.position, [8.0, 16.0, 8.0, 16.0]);
    assert_eq!(overlay.tex1, glyph_rect(&driver, 'b', GlyphStyle::PLAIN));
    let cell = driver.stream().record(1, 1).unwrap();
    assert_eq!((overlay.fg, overlay.bg), (cell.bg, cell.fg));
}

#[test]
fn test_bar_cursor_shapes() {
    let mut driver = driver(2, 4);
    send(
        &mut driver,
        [
            RedrawEvent::CursorShape(CursorShape::Vertical { percentage: 25 }),
            RedrawEvent::CursorGoto { row: 0, col: 2 },
        ],
    );
    let range = driver.cursor().range();
    let bar = *driver.stream().overlay_record(range, 0).unwrap();
    assert_eq!(bar.position, [16.0, 0.0, 2.0, 16.0]);
    assert_eq!(bar.tex1, [0.0; 4]);

    send(
        &mut driver,
        [RedrawEvent::CursorShape(CursorShape::Horizontal { percentage: 25 })],
    );
    let bar = *driver.stream().overlay_record(range, 0).unwrap();
    assert_eq!(bar.position, [16.0, 12.0, 8.0, 4.0]);
}

#[test]
fn test_viewport_resize_reports_fitting_grid() {
    let mut driver = driver(2, 2);
    assert_eq!(driver.resize_viewport(800, 480), (30, 100));
    assert_eq!(driver.backend().resizes, vec![(800, 480)]);
    assert!(driver.render_frame().unwrap());
    assert_eq!(driver.backend().last_frame().uniforms.viewport_size, [800.0, 480.0]);
}

#[test]
fn test_font_change_resets_atlas_and_positions() {
    let mut driver = driver(3, 4);
    send(&mut driver, [RedrawEvent::line(0, 0, "ab", 0)]);
    let generation = driver.glyphs().atlas.generation();

    driver
        .reconfigure_glyphs(|r| {
            r.cell = neogrid_fonts::CellSize::new(10, 20, 15);
            Ok(())
        })
        .unwrap();
    assert_eq!(driver.cell_size().width, 10);
    assert!(driver.render_frame().unwrap());

    assert_eq!(driver.glyphs().atlas.generation(), generation + 1);
    assert_eq!(driver.stats().rows_redrawn, 3);
    assert_eq!(driver.stream().record(2, 3).unwrap().position, [30.0, 40.0, 10.0, 20.0]);
    assert_eq!(driver.glyphs().rasterizer.render_count('a'), 2);
}

#[test]
fn test_failed_font_change_keeps_current_font() {
    let mut driver = driver(3, 4);
    send(&mut driver, [RedrawEvent::line(0, 0, "ab", 0)]);
    let generation = driver.glyphs().atlas.generation();

    let err = driver
        .reconfigure_glyphs(|_| Err(FontError::NotFound("Nope Mono".into())))
        .unwrap_err();
    assert!(matches!(err, FontError::NotFound(_)));
    assert_eq!(driver.cell_size(), CELL);
    assert_eq!(driver.glyphs().atlas.generation(), generation);
    assert!(!driver.render_frame().unwrap());
}

#[test]
fn test_box_drawing_toggle_repaints_with_system_font() {
    let Ok(rasterizer) = neogrid_fonts::FontRasterizer::new("monospace", 12.0, 96.0, true) else {
        return;
    };
    let mut driver = neogrid::FrameDriver::new(
        RecordingBackend::new(),
        rasterizer,
        std::sync::Arc::new(neogrid::EventQueue::new()),
        &test_config(2, 4),
    );
    driver.queue().extend([RedrawEvent::line(0, 0, "\u{2500}", 0), RedrawEvent::Flush]);
    assert!(driver.render_frame().unwrap());
    let generation = driver.glyphs().atlas.generation();

    driver.set_box_drawing_enabled(false);
    assert!(!driver.glyphs().rasterizer.box_drawing());
    assert_eq!(driver.state(), FrameState::Dirty);
    assert!(driver.render_frame().unwrap());
    assert_eq!(driver.glyphs().atlas.generation(), generation + 1);
    assert_eq!(driver.stats().rows_redrawn, 2);
}

#[test]
fn test_backend_failure_is_returned() {
    let mut driver = driver(2, 2);
    driver.backend_mut().fail_next = true;
    assert!(driver.render_frame().is_err());
    assert!(driver.render_frame().unwrap());

    // The retry resends what the failed frame dropped.
    let backend = driver.backend();
    assert!(matches!(backend.last_frame().vertices, VertexRecord::Full { .. }));
    assert_eq!(backend.gpu_vertices, stream_bytes(driver.stream().records()));
    assert_eq!(backend.gpu_atlas, driver.glyphs().atlas.pixels());
}
