//! Jump targets and outline injection built on top of `lopdf`.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

use crate::error::ReportError;
use crate::surface::Rect;
use crate::toc::TocEntry;

/// A clickable area on one page that jumps to another page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLink {
    /// 0-based index of the page holding the clickable area.
    pub page: usize,
    /// Clickable area, in points.
    pub area: Rect,
    /// 0-based index of the destination page.
    pub target_page: usize,
}

/// Adds `/Link` annotations for `links` and a two-level outline for `outline`.
///
/// The bytes are reopened with `lopdf`; each link becomes an annotation with a
/// `/Dest [page /Fit]` entry, and each TOC entry becomes an outline item whose
/// children are the entry's facets.
pub fn apply_links_and_outline(
    pdf_bytes: &[u8],
    links: &[PageLink],
    outline: &[TocEntry],
) -> Result<Vec<u8>, ReportError> {
    if links.is_empty() && outline.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();

    for link in links {
        let source = page_ref(&pages, link.page + 1)?;
        let target = page_ref(&pages, link.target_page + 1)?;
        add_link_annotation(&mut document, source, link.area, target)?;
    }

    if !outline.is_empty() {
        insert_outline(&mut document, &pages, outline)?;
    }

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

fn page_ref(pages: &BTreeMap<u32, ObjectId>, page_number: usize) -> Result<ObjectId, ReportError> {
    u32::try_from(page_number)
        .ok()
        .and_then(|number| pages.get(&number).copied())
        .ok_or(ReportError::MissingPage {
            page_number,
            page_count: pages.len(),
        })
}

fn fit_destination(page: ObjectId) -> Object {
    Object::Array(vec![Object::Reference(page), Object::Name(b"Fit".to_vec())])
}

/// Encodes `text` as a UTF-16BE text string so accented titles survive.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn add_link_annotation(
    document: &mut Document,
    source: ObjectId,
    area: Rect,
    target: ObjectId,
) -> Result<(), ReportError> {
    let mut annotation = Dictionary::new();
    annotation.set("Type", Object::Name(b"Annot".to_vec()));
    annotation.set("Subtype", Object::Name(b"Link".to_vec()));
    annotation.set(
        "Rect",
        Object::Array(vec![
            Object::Integer(area.x.floor() as i64),
            Object::Integer(area.y.floor() as i64),
            Object::Integer(area.right().ceil() as i64),
            Object::Integer(area.top().ceil() as i64),
        ]),
    );
    annotation.set("Border", Object::Array(vec![Object::Integer(0); 3]));
    annotation.set("Dest", fit_destination(target));
    let annotation_id = document.add_object(Object::Dictionary(annotation));

    let page = document.get_object_mut(source)?.as_dict_mut()?;
    let mut annotations = page
        .get(b"Annots")
        .ok()
        .and_then(|existing| existing.as_array().ok())
        .cloned()
        .unwrap_or_default();
    annotations.push(Object::Reference(annotation_id));
    page.set("Annots", Object::Array(annotations));
    Ok(())
}

struct OutlineItem {
    object_id: ObjectId,
    title: String,
    page_ref: ObjectId,
    children: Vec<OutlineItem>,
}

fn collect_outline_items(
    document: &mut Document,
    pages: &BTreeMap<u32, ObjectId>,
    outline: &[TocEntry],
) -> Result<Vec<OutlineItem>, ReportError> {
    let mut items = Vec::with_capacity(outline.len());
    for entry in outline {
        let mut children = Vec::with_capacity(entry.facets.len());
        for facet in &entry.facets {
            children.push(OutlineItem {
                object_id: document.new_object_id(),
                title: facet.label.clone(),
                page_ref: page_ref(pages, facet.page_index)?,
                children: Vec::new(),
            });
        }
        items.push(OutlineItem {
            object_id: document.new_object_id(),
            title: entry.label.clone(),
            page_ref: page_ref(pages, entry.page_index)?,
            children,
        });
    }
    Ok(items)
}

/// Writes `items` as siblings under `parent` and returns the number of
/// visible descendants (all items are open).
fn link_outline_items(document: &mut Document, parent: ObjectId, items: &[OutlineItem]) -> i64 {
    let mut visible = 0;
    for (index, item) in items.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", text_string(&item.title));
        dictionary.set("Dest", fit_destination(item.page_ref));
        dictionary.set("Parent", Object::Reference(parent));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(items[index - 1].object_id));
        }
        if index + 1 < items.len() {
            dictionary.set("Next", Object::Reference(items[index + 1].object_id));
        }

        if let (Some(first), Some(last)) = (item.children.first(), item.children.last()) {
            let descendants = link_outline_items(document, item.object_id, &item.children);
            dictionary.set("First", Object::Reference(first.object_id));
            dictionary.set("Last", Object::Reference(last.object_id));
            dictionary.set("Count", Object::Integer(descendants));
            visible += descendants;
        }

        document
            .objects
            .insert(item.object_id, Object::Dictionary(dictionary));
        visible += 1;
    }
    visible
}

fn insert_outline(
    document: &mut Document,
    pages: &BTreeMap<u32, ObjectId>,
    outline: &[TocEntry],
) -> Result<(), ReportError> {
    let items = collect_outline_items(document, pages, outline)?;
    let outlines_id = document.new_object_id();
    let visible = link_outline_items(document, outlines_id, &items);

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name(b"Outlines".to_vec()));
    dictionary.set("Count", Object::Integer(visible));
    if let Some(first) = items.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = items.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog_id = document.trailer.get(b"Root")?.as_reference()?;
    let catalog = document.get_object_mut(catalog_id)?.as_dict_mut()?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));
    Ok(())
}
