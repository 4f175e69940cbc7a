#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

type FixtureResult<T> = Result<T, Box<dyn std::error::Error>>;

fn page_operations(lines: &[&str]) -> Vec<Operation> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("TL", vec![14.into()]),
        Operation::new("Td", vec![40.into(), 800.into()]),
    ];
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
    }
    operations.push(Operation::new("ET", vec![]));
    operations
}

fn add_page(doc: &mut Document, parent: ObjectId, lines: &[&str]) -> FixtureResult<ObjectId> {
    let content = Content {
        operations: page_operations(lines),
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "Contents" => content_id,
    }))
}

/// Writes a text-only PDF with one Courier line per entry of each page.
pub fn write_fixture_pdf(path: &Path, pages: &[Vec<&str>]) -> FixtureResult<()> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let page_ids = pages
        .iter()
        .map(|lines| add_page(&mut doc, pages_id, lines))
        .collect::<FixtureResult<Vec<_>>>()?;

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<Object>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(path)?;
    Ok(())
}

/// Writes chapter seeds in the format accepted by `--chapters`.
pub fn write_chapter_file(path: &Path, seeds: &[(u32, &str, usize)]) -> FixtureResult<()> {
    let entries = seeds
        .iter()
        .map(|(chapter, title, start_page)| {
            serde_json::json!({ "chapter": chapter, "title": title, "start_page": start_page })
        })
        .collect::<Vec<_>>();
    std::fs::write(path, serde_json::to_string_pretty(&entries)?)?;
    Ok(())
}
