use pretty_assertions::assert_eq;
use rstest::rstest;
use tagmark_engine::editing::{Cmd, MarkClass, Origin, Position};
use tagmark_engine::{Document, InlineClass, ListKind, Range};

fn r(a: (usize, usize), b: (usize, usize)) -> Option<Range> {
    Some(Range::new(a, b))
}

fn sample() -> Document {
    Document::from_text("Testing\nformatting")
}

#[rstest]
#[case::bold_line(
    &[(InlineClass::Bold, (0, 0), (0, 7))],
    "<strong>Testing</strong><br />formatting"
)]
#[case::bold_twice(
    &[(InlineClass::Bold, (0, 0), (0, 7)), (InlineClass::Bold, (0, 0), (0, 7))],
    "Testing<br />formatting"
)]
#[case::unbold_tail(
    &[(InlineClass::Bold, (0, 0), (0, 7)), (InlineClass::Bold, (0, 1), (0, 7))],
    "<strong>T</strong>esting<br />formatting"
)]
#[case::rebold_tail(
    &[
        (InlineClass::Bold, (0, 0), (0, 7)),
        (InlineClass::Bold, (0, 1), (0, 7)),
        (InlineClass::Bold, (0, 1), (0, 7)),
    ],
    "<strong>T</strong><strong>esting</strong><br />formatting"
)]
#[case::across_lines(
    &[(InlineClass::Bold, (0, 1), (1, 2))],
    "T<strong>esting</strong><br /><strong>fo</strong>rmatting"
)]
#[case::italic_hole(
    &[(InlineClass::Italic, (0, 0), (1, 2)), (InlineClass::Italic, (0, 1), (0, 3))],
    "<em>T</em>es<em>ting</em><br /><em>fo</em>rmatting"
)]
fn toggle_scenarios(
    #[case] toggles: &[(InlineClass, (usize, usize), (usize, usize))],
    #[case] expected: &str,
) {
    let mut doc = sample();
    for (class, from, to) in toggles {
        doc.toggle_inline(*class, r(*from, *to)).unwrap();
    }
    assert_eq!(doc.export(None), expected);
}

#[test]
fn two_separate_toggles_are_independent() {
    let mut doc = sample();
    doc.bold(r((1, 0), (1, 3))).unwrap();
    doc.bold(r((1, 5), (1, 8))).unwrap();
    let bold: Vec<Range> = doc
        .mark_spans()
        .into_iter()
        .filter(|s| s.class == MarkClass::Inline(InlineClass::Bold))
        .map(|s| s.range)
        .collect();
    assert_eq!(bold.len(), 2);
    assert!(
        doc.is_range_marked(Range::new((1, 0), (1, 3)), Some(InlineClass::Bold))
            .unwrap()
    );
    assert!(
        doc.is_range_marked(Range::new((1, 5), (1, 8)), Some(InlineClass::Bold))
            .unwrap()
    );
    assert!(
        !doc.is_range_marked(Range::new((1, 0), (1, 8)), Some(InlineClass::Bold))
            .unwrap()
    );
}

#[test]
fn toggling_twice_restores_covered_columns() {
    let mut doc = sample();
    doc.underline(r((0, 2), (1, 5))).unwrap();
    doc.underline(r((0, 4), (0, 6))).unwrap();
    let before = doc.export(None);

    doc.bold(r((0, 1), (1, 3))).unwrap();
    doc.bold(r((0, 1), (1, 3))).unwrap();
    assert_eq!(doc.export(None), before);
}

#[rstest]
#[case("<strong>Testing</strong><br />formatting")]
#[case("T<strong>esting</strong><br /><strong>fo</strong>rmatting")]
#[case("<h1>Title <em>here</em></h1><br />body <u>text</u> &amp; more")]
#[case("<ul>\n<li>one</li><br /><li><s>two</s></li>\n</ul><br />after")]
#[case("<ol>\n<li>a</li><br /><li>b</li><br /><li>c</li>\n</ol>")]
#[case("<strong><em>both</em></strong> <annotation>note</annotation>")]
#[case("<ol>\n<li><h1>a</h1></li><br /><li>b</li>\n</ol>")]
fn export_of_import_is_stable(#[case] markup: &str) {
    let doc = Document::import(markup).unwrap();
    assert_eq!(doc.export(None), markup);
    let again = Document::import(&doc.export(None)).unwrap();
    assert_eq!(again.to_state(), doc.to_state());
}

#[test]
fn heading_inside_list_keeps_the_group_whole() {
    let mut doc = Document::from_text("a\nb");
    doc.set_list(ListKind::Ordered, r((0, 0), (1, 0))).unwrap();
    doc.set_block(tagmark_engine::BlockClass::heading(1).unwrap(), r((0, 1), (0, 1)))
        .unwrap();

    let copy = Document::import(&doc.export(None)).unwrap();
    assert_eq!(copy.to_state(), doc.to_state());
    let kinds: Vec<ListKind> = copy.list_groups().iter().map(|g| g.kind()).collect();
    assert_eq!(kinds, vec![ListKind::Ordered]);
    assert_eq!(copy.list_groups()[0].items.len(), 2);
    assert_eq!(copy.block_at(0), doc.block_at(0));
}

#[test]
fn import_preserves_active_classes_per_position() {
    let mut doc = sample();
    doc.bold(r((0, 0), (0, 4))).unwrap();
    doc.italic(r((0, 2), (1, 6))).unwrap();
    doc.strikethrough(r((1, 1), (1, 9))).unwrap();

    let copy = Document::import(&doc.export(None)).unwrap();
    assert_eq!(copy.value(), doc.value());
    for (line, len) in [(0, 7), (1, 10)] {
        for ch in 0..len {
            let range = Range::new((line, ch), (line, ch + 1));
            for class in InlineClass::ALL {
                assert_eq!(
                    copy.is_range_marked(range, Some(class)).unwrap(),
                    doc.is_range_marked(range, Some(class)).unwrap(),
                    "{class} at {line}:{ch}"
                );
            }
        }
    }
}

#[test]
fn ordered_list_relabels_after_insert() {
    let mut doc = Document::from_text("a\nb\nc");
    doc.set_list(ListKind::Ordered, r((0, 0), (2, 0))).unwrap();
    let labels = |doc: &Document| -> Vec<String> {
        doc.list_labels().iter().map(|l| l.label.clone()).collect()
    };
    assert_eq!(labels(&doc), vec!["1.", "2.", "3."]);

    doc.set_cursor((0, 2)).unwrap();
    doc.apply(
        Cmd::InsertText {
            at: Position::new(0, 2),
            text: "\n".into(),
        },
        Origin::Input,
    )
    .unwrap();
    doc.apply(
        Cmd::InsertText {
            at: Position::new(1, 1),
            text: "new".into(),
        },
        Origin::Input,
    )
    .unwrap();
    assert_eq!(doc.line(1).as_deref(), Some("♂new"));
    assert_eq!(labels(&doc), vec!["1.", "2.", "3.", "4."]);
    assert_eq!(
        doc.export(Some("")),
        "<ol>\n<li>a</li><li>new</li><li>b</li><li>c</li>\n</ol>"
    );
}

#[test]
fn unlisting_strips_sentinels_and_keeps_marks() {
    let mut doc = Document::from_text("one\ntwo");
    doc.set_list(ListKind::Unordered, r((0, 0), (1, 0))).unwrap();
    doc.bold(r((1, 1), (1, 4))).unwrap();
    doc.set_list(ListKind::Unordered, r((0, 0), (1, 0))).unwrap();
    assert_eq!(doc.value(), "one\ntwo");
    assert_eq!(doc.export(None), "one<br /><strong>two</strong>");
}

#[test]
fn state_json_round_trip() {
    let doc = Document::import("<h2>Head</h2><br /><ol>\n<li><em>x</em></li>\n</ol>").unwrap();
    let json = doc.to_state().to_json().unwrap();
    let state = tagmark_engine::DocumentState::from_json(&json).unwrap();
    let copy = Document::from_state(&state).unwrap();
    assert_eq!(copy.export(None), doc.export(None));
}
