//! Buffer splitting and position ordering

mod common;

use brick::buffer::split_at_positions;
use common::{lines, pos};

fn text() -> String {
    lines(&["1234567890", "1234567890", "", "1234567890", "1234567890"])
}

#[track_caller]
fn assert_split(positions: &[(usize, usize)], expected: &[&str]) {
    let text = text();
    let positions: Vec<_> = positions.iter().map(|(l, c)| pos(*l, *c)).collect();
    let sections = split_at_positions(&text, &positions);
    assert_eq!(sections, expected);
    assert_eq!(sections.concat(), text);
}

// ========================================================================
// Edges of the buffer
// ========================================================================

#[test]
fn test_split_at_buffer_start_and_end() {
    let text = text();
    assert_split(&[(1, 0)], &["", text.as_str()]);
    assert_split(&[(5, 10)], &[text.as_str(), ""]);
}

#[test]
fn test_split_inside_lines() {
    assert_split(
        &[(1, 5)],
        &["12345", "67890\n1234567890\n\n1234567890\n1234567890"],
    );
    assert_split(
        &[(5, 9)],
        &["1234567890\n1234567890\n\n1234567890\n123456789", "0"],
    );
}

#[test]
fn test_split_at_line_boundaries() {
    assert_split(
        &[(2, 10)],
        &["1234567890\n1234567890", "\n\n1234567890\n1234567890"],
    );
    assert_split(
        &[(3, 0)],
        &["1234567890\n1234567890\n", "\n1234567890\n1234567890"],
    );
    assert_split(
        &[(4, 0)],
        &["1234567890\n1234567890\n\n", "1234567890\n1234567890"],
    );
}

// ========================================================================
// Columns past the end of a line continue onto the next lines
// ========================================================================

#[test]
fn test_split_past_line_end() {
    assert_split(
        &[(2, 11)],
        &["1234567890\n1234567890\n", "\n1234567890\n1234567890"],
    );
    assert_split(
        &[(1, 16)],
        &["1234567890\n12345", "67890\n\n1234567890\n1234567890"],
    );
    assert_split(
        &[(2, 17)],
        &["1234567890\n1234567890\n\n12345", "67890\n1234567890"],
    );
}

#[test]
fn test_split_past_buffer_end_clamps() {
    let text = text();
    assert_split(&[(5, 11)], &[text.as_str(), ""]);
    assert_split(&[(10, 10)], &[text.as_str(), ""]);
}

#[test]
fn test_split_at_several_positions() {
    let text = text();
    assert_split(&[(1, 0), (5, 10)], &["", text.as_str(), ""]);
    assert_split(
        &[(1, 5), (2, 5), (4, 5), (5, 5)],
        &["12345", "67890\n12345", "67890\n\n12345", "67890\n12345", "67890"],
    );
}

#[test]
fn test_split_no_positions() {
    let text = text();
    assert_split(&[], &[text.as_str()]);
}

// ========================================================================
// is_between
// ========================================================================

#[test]
fn test_is_between_across_lines() {
    assert!(pos(5, 5).is_between(&pos(1, 0), &pos(9, 9)));
    assert!(pos(1, 1).is_between(&pos(1, 0), &pos(9, 9)));
    assert!(pos(9, 8).is_between(&pos(1, 0), &pos(9, 9)));
    assert!(!pos(1, 0).is_between(&pos(1, 5), &pos(9, 9)));
    assert!(!pos(9, 9).is_between(&pos(1, 0), &pos(9, 5)));
}

#[test]
fn test_is_between_excludes_both_ends() {
    assert!(!pos(1, 0).is_between(&pos(1, 0), &pos(9, 9)));
    assert!(!pos(9, 9).is_between(&pos(1, 0), &pos(9, 9)));
}

#[test]
fn test_is_between_same_line() {
    assert!(pos(5, 5).is_between(&pos(5, 0), &pos(5, 9)));
    assert!(!pos(5, 0).is_between(&pos(5, 2), &pos(5, 7)));
    assert!(!pos(5, 9).is_between(&pos(5, 2), &pos(5, 7)));
}

#[test]
fn test_is_between_on_start_or_end_line() {
    assert!(pos(5, 5).is_between(&pos(5, 0), &pos(9, 9)));
    assert!(!pos(5, 0).is_between(&pos(5, 2), &pos(9, 9)));
    assert!(pos(5, 5).is_between(&pos(1, 0), &pos(5, 9)));
    assert!(!pos(5, 9).is_between(&pos(1, 0), &pos(5, 7)));
}
