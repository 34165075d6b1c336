//! End-to-end tests: page inputs to downstream records.

use page_flow::config::{ColumnConfig, ComposerConfig};
use page_flow::elements::{ImageElement, LinkElement, PageElement};
use page_flow::geometry::Rect;
use page_flow::layout::{HeadingLevel, RawBox, RawFragment, SemanticType};
use page_flow::pipeline::{DocumentPipeline, PageInput};
use page_flow::Error;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Headline over two columns, an image in the left column and a link at the foot.
fn magazine_page(index: usize) -> PageInput {
    let mut input = PageInput::new(index, 600.0, 800.0).with_fragment(RawFragment::new(
        "Lighthouse Keepers",
        50.0,
        20.0,
        200.0,
        30.0,
        30.0,
    ));

    let column_line =
        |x: f32, top: f32, text: &str| RawFragment::new(text, x, top, 220.0, 10.0, 10.0);
    for (i, top) in [100.0, 112.0, 124.0].into_iter().enumerate() {
        let n = i + 1;
        input = input.with_fragment(column_line(50.0, top, &format!("left column line {}", n)));
        input = input.with_fragment(column_line(330.0, top, &format!("right column line {}", n)));
    }
    for (i, top) in [400.0, 412.0].into_iter().enumerate() {
        input = input.with_fragment(column_line(50.0, top, &format!("left lower line {}", i + 1)));
    }

    input
        .with_element(
            ImageElement::new(Rect::new(50.0, 200.0, 220.0, 150.0)).with_alt_text("keeper"),
        )
        .with_element(LinkElement::new(Rect::new(50.0, 760.0, 100.0, 12.0), "#page-2"))
}

fn describe(element: &PageElement) -> String {
    match element {
        PageElement::Text(c) => c.text.clone(),
        PageElement::Image(_) => "<image>".to_string(),
        PageElement::Link(l) => format!("<link {}>", l.uri),
    }
}

#[test]
fn test_magazine_page_reading_order() {
    init_logger();
    let outcome = DocumentPipeline::new().process_page(magazine_page(0));
    assert!(outcome.diagnostics.is_empty());

    let page = outcome.page;
    assert_eq!(page.title, "Lighthouse Keepers");

    let order: Vec<String> = page.ordered_elements.iter().map(describe).collect();
    assert_eq!(
        order,
        vec![
            "Lighthouse Keepers",
            "left column line 1 left column line 2 left column line 3",
            "<image>",
            "left lower line 1 left lower line 2",
            "right column line 1 right column line 2 right column line 3",
            "<link #page-2>",
        ]
    );

    let headline = page.ordered_elements[0].as_text().unwrap();
    assert_eq!(headline.semantic_type, SemanticType::Heading(HeadingLevel::H1));
    assert!(page.composites().skip(1).all(|c| c.semantic_type == SemanticType::Paragraph));
}

#[test]
fn test_malformed_fragments_are_normalized_and_reported() {
    init_logger();
    let input = PageInput::new(0, 600.0, 800.0)
        .with_fragment(RawFragment {
            text: Some("no size".to_string()),
            bounding_box: Some(RawBox {
                top: Some(100.0),
                left: Some(50.0),
                width: Some(60.0),
                height: Some(12.0),
            }),
            font_size: None,
            font_family: None,
        })
        .with_fragment(RawFragment {
            text: Some("no box".to_string()),
            font_size: Some(12.0),
            ..RawFragment::default()
        })
        .with_fragment(RawFragment::new("   ", 0.0, 0.0, 10.0, 10.0, 12.0))
        .with_fragment(RawFragment::new("bad width", 300.0, 300.0, f32::NAN, 12.0, 12.0));

    let outcome = DocumentPipeline::new().process_page(input);

    assert_eq!(outcome.diagnostics.len(), 3);
    assert!(outcome
        .diagnostics
        .iter()
        .all(|d| matches!(d, Error::MalformedFragment { page: 0, .. })));

    let texts: Vec<&str> = outcome.page.composites().map(|c| c.text.as_str()).collect();
    assert_eq!(texts.len(), 3);
    assert!(texts.contains(&"no size"));
    assert!(texts.contains(&"no box"));
    assert!(texts.contains(&"bad width"));
    let defaulted = outcome.page.composites().find(|c| c.text == "no size").unwrap();
    assert_eq!(defaulted.font_size, 12.0);
}

#[test]
fn test_composition_records_and_json() {
    init_logger();
    let filler = "The keepers kept a log of every ship that passed the point in the long winter \
                  nights and those logs are now held by the maritime museum in the harbour town";
    let body = |index: usize, first: &str, last: &str| {
        PageInput::new(index, 600.0, 800.0)
            .with_fragment(RawFragment::new(first, 50.0, 60.0, 500.0, 36.0, 10.0))
            .with_fragment(RawFragment::new(filler, 50.0, 140.0, 500.0, 36.0, 10.0))
            .with_fragment(RawFragment::new(last, 50.0, 220.0, 500.0, 36.0, 10.0))
    };

    let inputs = vec![
        PageInput::new(0, 600.0, 800.0)
            .with_fragment(RawFragment::new("KEEPERS", 100.0, 100.0, 400.0, 72.0, 72.0))
            .with_fragment(RawFragment::new(
                "a history of the point light",
                100.0,
                400.0,
                300.0,
                11.0,
                11.0,
            )),
        body(1, "It started with a single lamp.", "and the light burned through"),
        body(2, "every storm for forty years.", "The log ends here."),
    ];

    let composition = DocumentPipeline::new().compose(inputs);
    assert!(composition.diagnostics.is_empty());

    let records = composition.to_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].index, 0);
    assert_eq!(records[0].title, "KEEPERS");
    assert!(!records[0].metadata.is_composed);
    assert_eq!(records[1].metadata.composed_from_page_indexes, Some(vec![1, 2]));
    assert_eq!(records[1].height, 1600.0);

    let json: serde_json::Value = serde_json::from_str(&composition.to_json().unwrap()).unwrap();
    assert_eq!(json[0]["metadata"]["isComposed"], false);
    assert!(json[0]["metadata"].get("composedFromPageIndexes").is_none());
    assert_eq!(json[1]["metadata"]["composedFromPageIndexes"], serde_json::json!([1, 2]));
    assert_eq!(json[1]["orderedElements"][0]["kind"], "text");
    assert_eq!(json[1]["orderedElements"][3]["bbox"]["top"], 860.0);
}

#[test]
fn test_invalid_page_size_keeps_processing() {
    let input = PageInput::new(5, 600.0, f32::INFINITY)
        .with_fragment(RawFragment::new("still here", 50.0, 50.0, 100.0, 12.0, 12.0));
    let composition = DocumentPipeline::new().compose(vec![input]);

    assert_eq!(composition.pages.len(), 1);
    assert_eq!(composition.pages[0].height(), 0.0);
    assert_eq!(composition.diagnostics.len(), 1);
    assert!(matches!(composition.diagnostics[0], Error::InvalidPage { index: 5, .. }));
}

#[test]
fn test_custom_config_from_json() {
    let config = ComposerConfig::from_json_str(r#"{"columns": {"min_gap": 50.0}}"#).unwrap();
    assert_eq!(config.columns.min_gap, 50.0);
    assert_eq!(config.columns.interleave_tolerance, ColumnConfig::default().interleave_tolerance);

    // A 60-unit gutter still splits, a 40-unit one no longer does
    let pipeline = DocumentPipeline::try_with_config(config).unwrap();
    let page = |gap: f32| {
        PageInput::new(0, 600.0, 800.0)
            .with_fragment(RawFragment::new("left", 50.0, 100.0, 200.0, 10.0, 10.0))
            .with_fragment(RawFragment::new("right top", 250.0 + gap, 50.0, 200.0, 10.0, 10.0))
            .with_fragment(RawFragment::new("left below", 50.0, 300.0, 200.0, 10.0, 10.0))
    };

    let texts = |gap: f32| -> Vec<String> {
        pipeline.process_page(page(gap)).page.composites().map(|c| c.text.clone()).collect()
    };
    assert_eq!(texts(60.0), vec!["left", "left below", "right top"]);
    assert_eq!(texts(40.0), vec!["right top", "left", "left below"]);
}

#[test]
fn test_output_order_is_independent_of_input_order() {
    let forward = magazine_page(0);
    let mut reversed = magazine_page(0);
    reversed.fragments.reverse();
    reversed.non_text.reverse();

    let pipeline = DocumentPipeline::new();
    let order = |input: PageInput| -> Vec<String> {
        pipeline.process_page(input).page.ordered_elements.iter().map(describe).collect()
    };
    assert_eq!(order(forward), order(reversed));
}
