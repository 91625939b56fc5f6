use facet_report::forms::parse_submissions;
use facet_report::{fonts, ContentPack, ReportBuilder};
use lopdf::{Document, Object};
use sha2::{Digest, Sha256};

const SKIP_HINT: &str =
    "bundled fonts missing. Set FACET_REPORT_FONTS_DIR or copy assets/fonts next to the binary.";

fn render_demo_pdf() -> Option<Vec<u8>> {
    if !fonts::default_fonts_available() {
        return None;
    }

    let content = ContentPack::from_json_str(include_str!("../demos/content_pack.json"))
        .expect("demo pack parses");
    let forms = parse_submissions(include_str!("../demos/forms.json")).expect("demo forms parse");

    let bytes = ReportBuilder::new(content)
        .with_credits(["Relatório gerado automaticamente"])
        .build(&forms)
        .expect("render demo pdf");

    Some(bytes)
}

/// Markers around the values printpdf regenerates on every save: info
/// dictionary dates, the trailer ID and the XMP timestamps and identifiers.
const VOLATILE_SPANS: &[(&[u8], &[u8])] = &[
    (b"/CreationDate(", b")"),
    (b"/ModDate(", b")"),
    (b"/ID[", b"]"),
    (b"<xmp:CreateDate>", b"</xmp:CreateDate>"),
    (b"<xmp:ModifyDate>", b"</xmp:ModifyDate>"),
    (b"<xmp:MetadataDate>", b"</xmp:MetadataDate>"),
    (b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>"),
    (b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>"),
];

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|position| from + position)
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    let mut normalized = bytes.to_vec();
    for (start, end) in VOLATILE_SPANS {
        let mut offset = 0;
        while let Some(found) = find(&normalized, start, offset) {
            let value_start = found + start.len();
            let Some(value_end) = find(&normalized, end, value_start) else {
                break;
            };
            for byte in &mut normalized[value_start..value_end] {
                if !matches!(*byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = value_end + end.len();
        }
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_output() {
    let Some(bytes) = render_demo_pdf() else {
        eprintln!("Skipping renders_non_empty_output: {SKIP_HINT}");
        return;
    };
    assert!(bytes.starts_with(b"%PDF"), "output should be a PDF document");
}

#[test]
fn toc_links_and_outline_are_written() {
    let Some(bytes) = render_demo_pdf() else {
        eprintln!("Skipping toc_links_and_outline_are_written: {SKIP_HINT}");
        return;
    };

    let document = Document::load_mem(&bytes).expect("output reloads");
    let pages = document.get_pages();
    let toc_page = pages.get(&2).copied().expect("toc page exists");
    let annotations = document
        .get_dictionary(toc_page)
        .and_then(|page| page.get(b"Annots"))
        .and_then(Object::as_array)
        .expect("toc page has link annotations");
    // Five factor rows plus three facet rows per factor.
    assert_eq!(annotations.len(), 5 * 4);

    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .expect("catalog reference");
    let catalog = document.get_dictionary(catalog_id).expect("catalog");
    let outlines_id = catalog
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .expect("outline root");
    let outlines = document.get_dictionary(outlines_id).expect("outline dictionary");
    assert_eq!(outlines.get(b"Count").and_then(Object::as_i64).ok(), Some(5 * 4));
}

#[test]
fn rendering_is_deterministic() {
    let Some(bytes_a) = render_demo_pdf() else {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_HINT}");
        return;
    };
    let Some(bytes_b) = render_demo_pdf() else {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_HINT}");
        return;
    };

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");

    let hash_a = normalized_hash(&bytes_a);
    let hash_b = normalized_hash(&bytes_b);

    assert_eq!(
        hash_a, hash_b,
        "PDF renders must be deterministic after metadata normalization"
    );
}
