use pretty_assertions::assert_eq;

use monograph_clean::{
    CellLineBreaks, ChapterSeed, ExtractOptions, ExtractWarningCode, InMemoryDocument, TableRow,
    process_document, render_json,
};

const RUNNING_HEAD: &str = "Cancer Research in India";

fn synthetic_pages(count: usize) -> Vec<String> {
    (1..=count)
        .map(|page| {
            format!(
                "{RUNNING_HEAD}\nBody of page {page} has a hyphen-\nated word.\nicma\nCancer Monograph {page}\n"
            )
        })
        .collect()
}

fn options_for(chapters: Vec<ChapterSeed>) -> ExtractOptions {
    ExtractOptions {
        input: "synthetic.pdf".into(),
        chapters,
        ..ExtractOptions::default()
    }
}

#[test]
fn cleans_running_lines_and_splits_chapters() {
    let document = InMemoryDocument::new(synthetic_pages(60));
    let options = options_for(vec![
        ChapterSeed::new(1, "Front", 1),
        ChapterSeed::new(2, "Back", 31),
    ]);

    let processed = process_document(&document, &options).expect("pipeline should run");

    assert!(processed.running_lines.headers.contains(RUNNING_HEAD));
    assert!(processed.running_lines.footers.contains("Cancer Monograph 42"));
    assert_eq!(processed.pages_processed, 60);
    assert!(processed.warnings.is_empty(), "{:?}", processed.warnings);

    let chapters = &processed.output.chapters;
    assert_eq!(chapters.len(), 2);
    assert!(
        chapters[0]
            .content
            .starts_with("Body of page 1 has a hyphenated word. Body of page 2 ")
    );
    assert!(chapters[0].content.ends_with("Body of page 30 has a hyphenated word."));
    assert!(chapters[1].content.starts_with("Body of page 31 "));
    assert!(!chapters[1].content.contains("icma"));
    assert!(!chapters[1].content.contains(RUNNING_HEAD));
}

#[test]
fn formats_tables_found_on_chapter_pages() {
    let table = vec![
        vec![Some("Age\ngroup".to_string()), None],
        vec![Some("0-14".to_string()), Some("12".to_string())],
        vec![Some(String::new()), None],
    ];
    let blank_table = vec![vec![Some("A".to_string())], vec![Some("  ".to_string())]];
    let document = InMemoryDocument::new(["intro", "tables here", "outro"])
        .with_tables(1, vec![blank_table, table]);
    let options = ExtractOptions {
        cell_line_breaks: CellLineBreaks::Newlines,
        ..options_for(vec![ChapterSeed::new(4, "Tables", 1)])
    };

    let processed = process_document(&document, &options).expect("pipeline should run");
    let tables = &processed.output.chapters[0].tables;

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].table_name, "Table on Page 2, Index 1");
    let expected: TableRow = [("Age group", "0-14"), ("column-1", "12")]
        .into_iter()
        .collect();
    assert_eq!(tables[0].data, vec![expected]);
    assert_eq!(processed.report().table_count, 1);
}

#[test]
fn chapter_beyond_document_is_clamped() {
    let document = InMemoryDocument::new(["one", "two", "three"]);
    let options = options_for(vec![
        ChapterSeed::new(1, "Known", 1),
        ChapterSeed::new(2, "Missing", 8),
    ]);

    let processed = process_document(&document, &options).expect("pipeline should run");
    let chapters = &processed.output.chapters;

    assert_eq!(chapters[0].content, "one two three");
    assert_eq!(chapters[1].content, "");
    let codes = processed
        .warnings
        .iter()
        .map(|warning| warning.code.clone())
        .collect::<Vec<_>>();
    assert!(codes.contains(&ExtractWarningCode::EmptyChapter));
    assert!(codes.contains(&ExtractWarningCode::EmptyHeaderSample));
}

#[test]
fn rendered_json_keeps_layout_and_unicode() {
    let document = InMemoryDocument::new(["Incidence in Kōhima\n1. Males\n2. Females"]);
    let processed = process_document(&document, &options_for(vec![ChapterSeed::new(1, "Nagaland", 1)]))
        .expect("pipeline should run");

    let json = render_json(&processed.output).expect("JSON should render");
    assert!(json.starts_with("{\n  \"source_file\": \"synthetic.pdf\",\n  \"chapters\": ["));
    assert!(json.contains("Kōhima"));
    assert!(json.contains(r#""content": "Incidence in Kōhima\n1. Males\n2. Females""#));
}
