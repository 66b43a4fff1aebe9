#![no_main]

use arbitrary::Arbitrary;
use gatewalk::maze::{evaluate_move, shortest_path, CellKind, Direction, GateSet, GridPos, MazeLayout};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

/// Glyph alphabet for generated rows. The trailing entries are
/// deliberately outside the template alphabet so the error path is
/// exercised too.
const GLYPHS: [char; 8] = ['.', '.', '#', 'G', 'S', 'E', 'x', ' '];

/// Structured input for layout parsing and navigation fuzzing.
#[derive(Arbitrary, Debug)]
struct LayoutInput {
    /// Encoded glyph rows.
    rows: Vec<Vec<u8>>,
    /// Probe position for movement checks.
    probe: (u8, u8),
}

fuzz_target!(|input: LayoutInput| {
    // Cap grid size to keep parse and path search cheap
    let rows: Vec<String> = input
        .rows
        .into_iter()
        .take(12)
        .map(|row| {
            row.into_iter()
                .take(16)
                .map(|byte| GLYPHS[usize::from(byte) % GLYPHS.len()])
                .collect()
        })
        .collect();
    let borrowed: Vec<&str> = rows.iter().map(String::as_str).collect();

    // Parsing must never panic; rejected input is fine
    let Ok(layout) = MazeLayout::parse(&borrowed) else {
        return;
    };

    assert_eq!(usize::from(layout.height()), rows.len());
    assert_eq!(
        usize::from(layout.width()),
        rows[0].chars().count(),
        "width must match the first row"
    );

    let cell_count = layout.iter().count();
    assert_eq!(
        cell_count,
        usize::from(layout.width()) * usize::from(layout.height())
    );
    for (pos, kind) in layout.iter() {
        assert!(layout.in_bounds(pos));
        assert_eq!(layout.get(pos), Some(kind));
    }

    assert!(layout.in_bounds(layout.start()));
    assert!(layout.in_bounds(layout.end()));
    assert_eq!(layout.get(layout.start()), Some(CellKind::Start));
    assert_eq!(layout.get(layout.end()), Some(CellKind::End));

    let gate_positions = layout.gate_positions();
    assert_eq!(gate_positions.len(), layout.gate_count());
    for gate in &gate_positions {
        assert_eq!(layout.get(*gate), Some(CellKind::Gate));
    }

    // Movement evaluation and path search must not panic anywhere,
    // including out-of-bounds probes
    let gates = GateSet::build(&layout, 1, &HashSet::new());
    let probe = GridPos::new(u16::from(input.probe.0), u16::from(input.probe.1));
    for dir in Direction::ALL {
        let _ = evaluate_move(&layout, &gates, probe, dir);
    }
    if let Some(path) = shortest_path(&layout, layout.start(), layout.end()) {
        // A reported path must stay on the grid
        let mut pos = layout.start();
        for dir in path {
            pos = dir.apply(pos).expect("path step left the grid");
            assert!(layout.in_bounds(pos));
        }
        assert_eq!(pos, layout.end());
    }
});
