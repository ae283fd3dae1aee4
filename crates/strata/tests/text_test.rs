use strata::{DeterministicTextMeasurer, Size, TextMeasurer};

#[test]
fn width_follows_the_longest_line() {
    let m = DeterministicTextMeasurer::default();
    let s = m.measure("ab\nabcd", "Times-Roman", 10.0);
    assert!((s.width - 24.0).abs() < 1e-9);
    assert!((s.height - 24.0).abs() < 1e-9);
}

#[test]
fn empty_text_has_no_size() {
    let m = DeterministicTextMeasurer::default();
    assert_eq!(m.measure("", "Times-Roman", 14.0), Size::ZERO);
}

#[test]
fn wide_characters_take_two_columns() {
    let m = DeterministicTextMeasurer {
        char_width_factor: 1.0,
        line_height_factor: 1.0,
    };
    let narrow = m.measure("ab", "any", 10.0);
    let wide = m.measure("日本", "any", 10.0);
    assert_eq!(narrow.width, 20.0);
    assert_eq!(wide.width, 40.0);
}

#[test]
fn carriage_returns_do_not_count() {
    let lines: Vec<&str> = DeterministicTextMeasurer::lines("one\r\ntwo").collect();
    assert_eq!(lines, vec!["one", "two"]);
}
