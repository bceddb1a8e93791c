//! Property tests for the public API that need no PDF engine, no tesseract,
//! and no LLM key. These run everywhere, unconditionally.

use pdf2html::pipeline::html::{append_page_class, css_block, page_fragment};
use pdf2html::pipeline::ocr::{OcrEngine, OCR_ERROR_PREFIX};
use pdf2html::{
    group_pages, write_outputs, Approach, ConversionConfig, ConversionOutput, ConversionStats,
    PAGE_DELIMITER,
};

/// Build a loader-style stream: every page followed by the delimiter,
/// including the last.
fn loader_stream(pages: &[&str]) -> String {
    let mut s = String::new();
    for (i, body) in pages.iter().enumerate() {
        s.push_str(&format!("PAGE {}\n\n{}", i + 1, body));
        s.push_str(PAGE_DELIMITER);
    }
    s
}

#[test]
fn delimiter_round_trip_is_lossless() {
    let stream = loader_stream(&["Hello", "World", "col1\tcol2"]);
    let parts: Vec<&str> = stream.split(PAGE_DELIMITER).collect();
    assert_eq!(parts.join(PAGE_DELIMITER), stream);
}

#[test]
fn two_page_stream_yields_two_groups_in_page_order() {
    // 2 pages, no images, batch size 1 → 2 requests.
    let stream = "PAGE 1\n\nHello\n\n----\n\nPAGE 2\n\nWorld\n\n----\n\n";
    let groups = group_pages(stream, 1);
    assert_eq!(groups, vec!["PAGE 1\n\nHello", "PAGE 2\n\nWorld"]);
}

#[test]
fn transformed_result_shape_for_n_groups() {
    // Joining N fragments yields exactly N−1 internal delimiters, matching
    // what the transformer emits for N non-empty page groups.
    let fragments = vec![
        "<html fragment for Hello>".to_string(),
        "<html fragment for World>".to_string(),
    ];
    let joined = fragments.join(PAGE_DELIMITER);
    assert_eq!(
        joined,
        format!(
            "<html fragment for Hello>{}<html fragment for World>",
            PAGE_DELIMITER
        )
    );
    assert_eq!(joined.matches(PAGE_DELIMITER).count(), 1);
}

#[test]
fn whitespace_page_contributes_no_group() {
    let stream = format!(
        "PAGE 1\n\nHello{}\t \n{}PAGE 3\n\nWorld{}",
        PAGE_DELIMITER, PAGE_DELIMITER, PAGE_DELIMITER
    );
    assert_eq!(group_pages(&stream, 1).len(), 2);
}

#[test]
fn header_numbers_increase_from_one() {
    let stream = loader_stream(&["a", "b", "c", "d"]);
    let headers: Vec<usize> = stream
        .lines()
        .filter_map(|l| l.strip_prefix("PAGE "))
        .map(|n| n.parse().unwrap())
        .collect();
    assert_eq!(headers, vec![1, 2, 3, 4]);
}

#[test]
fn ocr_failure_is_embedded_not_raised() {
    let config = ConversionConfig::builder()
        .tesseract_path("/no/such/binary")
        .build()
        .unwrap();
    let engine = OcrEngine::new(&config);
    let img = image::DynamicImage::new_rgb8(4, 4);

    let text = engine.recognize(&img);
    assert!(text.starts_with(OCR_ERROR_PREFIX));
}

#[test]
fn direct_fragments_carry_class_and_keep_existing_ones() {
    let out = append_page_class(&page_fragment("Hello world"), "centered-content").unwrap();
    assert!(out.contains(r#"class="centered-content""#));

    let pre_classed =
        append_page_class(r#"<div class="page"><p>x</p></div>"#, "centered-content").unwrap();
    assert!(pre_classed.contains(r#"class="page centered-content""#));
}

#[test]
fn css_block_is_a_single_style_element() {
    let css = css_block("centered-content");
    assert_eq!(css.matches("<style>").count(), 1);
    assert_eq!(css.matches("</style>").count(), 1);
}

#[test]
fn approaches_are_mutually_exclusive_config_states() {
    let ai = ConversionConfig::builder().approach(Approach::Ai).build().unwrap();
    let direct = ConversionConfig::builder()
        .approach(Approach::Direct)
        .build()
        .unwrap();
    assert_ne!(ai.approach, direct.approach);
}

#[tokio::test]
async fn write_outputs_produces_expected_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let output = ConversionOutput {
        text: Some("PAGE 1\n\nHello\n\n----\n\n".into()),
        html: Some("<p>Hello</p>".into()),
        stats: ConversionStats::default(),
    };

    let written = write_outputs(&output, dir.path()).await.unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["document.txt", "document.html"]);

    let text = std::fs::read_to_string(dir.path().join("document.txt")).unwrap();
    assert_eq!(text, "PAGE 1\n\nHello\n\n----\n\n");
    let html = std::fs::read_to_string(dir.path().join("document.html")).unwrap();
    assert_eq!(html, "<p>Hello</p>");
}

#[tokio::test]
async fn write_outputs_skips_absent_fields() {
    let dir = tempfile::tempdir().unwrap();
    let output = ConversionOutput {
        text: None,
        html: Some("<p>direct</p>".into()),
        stats: ConversionStats::default(),
    };

    let written = write_outputs(&output, dir.path()).await.unwrap();
    assert_eq!(written.len(), 1);
    assert!(!dir.path().join("document.txt").exists());
    assert!(dir.path().join("document.html").exists());
}
