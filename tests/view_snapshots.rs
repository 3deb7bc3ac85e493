//! Snapshot tests for the dashboard layout
//!
//! Uses insta + ratatui TestBackend to verify rendering output doesn't regress.

use ratatui::backend::TestBackend;
use ratatui::Terminal;
use testdeck::model::identifier::parse_lines;
use testdeck::model::{RunEpoch, RunUpdate, TestTree};
use testdeck::state::AppState;
use testdeck::view::layout::render_layout;
use testdeck::view::tree::render_tree;
use testdeck::view::DashboardStyles;

// ===== Test Helpers =====

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Trailing spaces and empty lines are removed to keep snapshots clean.
fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

fn create_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).unwrap()
}

fn sample_state() -> AppState {
    AppState::new(TestTree::build(&parse_lines(
        "a.py::TestA::test_one\na.py::test_free\nb.py::test_b\n\n3 tests collected in 0.01s",
    )))
}

fn render_dashboard(state: &AppState) -> String {
    let mut terminal = create_terminal(51, 7);
    terminal
        .draw(|frame| render_layout(frame, state, &DashboardStyles::default()))
        .unwrap();
    buffer_to_string(terminal.backend().buffer())
}

// ===== Snapshots =====

#[test]
fn snapshot_initial_dashboard() {
    let output = render_dashboard(&sample_state());
    insta::assert_snapshot!(output, @r"
Tests            ┌Test Output─────────────────────┐
  a.py           │                                │
    TestA        │                                │
      test_one   │                                │
    test_free    │                                │
  b.py           └────────────────────────────────┘
            Ctrl+C: Exit | r: Run tests
");
}

#[test]
fn snapshot_dashboard_after_passing_run() {
    let mut state = sample_state();
    let epoch = RunEpoch::new(1);
    state.begin_run(epoch, "a.py::TestA::test_one");
    state.apply_update(RunUpdate::Launched { epoch, pid: 7 });
    state.apply_update(RunUpdate::Output {
        epoch,
        bytes: b"a.py::TestA::test_one PASSED\n1 passed\n".to_vec(),
    });
    state.apply_update(RunUpdate::Finished {
        epoch,
        passed: true,
    });

    let output = render_dashboard(&state);
    insta::assert_snapshot!(output, @r"
Tests            ┌Test Output─────────────────────┐
  a.py           │a.py::TestA::test_one PASSED    │
    TestA        │1 passed                        │
      test_one   │                                │
    test_free    │                                │
  b.py           └────────────────────────────────┘
        Test passed: a.py::TestA::test_one
");
}

#[test]
fn tree_scrolls_to_selection() {
    let mut state = sample_state();
    state.select_last();

    let mut terminal = create_terminal(20, 4);
    terminal
        .draw(|frame| {
            let area = frame.area();
            render_tree(frame, area, &state, &DashboardStyles::default())
        })
        .unwrap();

    // Every row is indented, so compare directly rather than through a
    // dedented inline snapshot
    let output = buffer_to_string(terminal.backend().buffer());
    assert_eq!(
        output.lines().collect::<Vec<_>>(),
        vec!["      test_one", "    test_free", "  b.py", "    test_b"]
    );
}
