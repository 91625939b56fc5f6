use facet_report::forms::parse_submissions;
use facet_report::layout::PageGeometry;
use facet_report::sections::{CoverContent, NOT_FOUND_TITLE};
use facet_report::surface::DrawOp;
use facet_report::{
    ContentPack, FacetContent, FactorContent, FactorKey, FeedbackContent, FormSubmission, Level,
    Question, RecordingSurface, ReportBuilder, Rendering,
};

fn long_feedback(facet: &str) -> FeedbackContent {
    FeedbackContent {
        title: format!("{facet}: devolutiva"),
        definition: "Definição detalhada da faceta, escrita para ocupar algumas linhas. ".repeat(6),
        traits: (1..=6).map(|n| format!("Característica {n} de {facet}")).collect(),
        advantages: (1..=5)
            .map(|n| format!("Vantagem {n} bem descrita em uma frase razoavelmente longa"))
            .collect(),
        difficulties: (1..=5).map(|n| format!("Dificuldade {n}")).collect(),
        strategies: (1..=8)
            .map(|n| format!("Estratégia {n}: {}", "praticar com regularidade ".repeat(5)))
            .collect(),
        conclusion: "Conclusão da devolutiva. ".repeat(10),
    }
}

fn facet(name: &str, ids: &[&str]) -> FacetContent {
    let mut facet =
        FacetContent::new(name).with_description(format!("Descrição da faceta {name}."));
    for id in ids {
        facet = facet.with_question(Question::new(*id, "Pergunta").reversed(false));
    }
    for level in Level::ALL {
        facet = facet.with_feedback(level, long_feedback(name));
    }
    facet
}

/// Two factors with two facets each, verbose enough to span several pages.
fn two_by_two() -> ContentPack {
    ContentPack::new()
        .with_factor(
            FactorContent::new(FactorKey::Neuroticismo)
                .with_description("Descrição do Neuroticismo.")
                .with_facet(facet("Ansiedade", &["n1", "n2"]))
                .with_facet(facet("Vulnerabilidade", &["VU1", "VU2"])),
        )
        .with_factor(
            FactorContent::new(FactorKey::Abertura)
                .with_description("Descrição da Abertura.")
                .with_facet(facet("Abertura a ideias", &["a1"]))
                .with_facet(facet("Liberalismo", &["LI1"])),
        )
}

fn two_forms() -> Vec<FormSubmission> {
    vec![
        FormSubmission::new("neuroticismo-v1").with_answers([("n1", 2), ("n2", 3), ("n7", 4)]),
        FormSubmission::new("Abertura").with_answers([("a1", 5), ("a7", 1)]),
    ]
}

fn render(content: ContentPack, forms: &[FormSubmission]) -> Rendering<RecordingSurface> {
    ReportBuilder::new(content).render_on(RecordingSurface::new(), forms)
}

fn is_footer(text: &str) -> bool {
    let mut parts = text.split(" / ");
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(number), Some(total), None)
            if number.parse::<usize>().is_ok() && total.parse::<usize>().is_ok()
    )
}

/// Page of the first text run equal to `needle` outside the TOC pages.
fn content_page(rendering: &Rendering<RecordingSurface>, needle: &str) -> Option<usize> {
    rendering
        .surface
        .texts()
        .find(|(page, _, text)| *text == needle && !rendering.toc.pages.contains(page))
        .map(|(page, _, _)| page)
}

#[test]
fn toc_page_numbers_match_drawn_headings() {
    let rendering = render(two_by_two(), &two_forms());
    let outline = &rendering.outline;

    assert_eq!(outline.len(), 2);
    assert!(outline.iter().all(|entry| entry.facets.len() == 2));

    for entry in outline {
        assert_eq!(
            content_page(&rendering, &entry.label),
            Some(entry.page_index - 1),
            "factor {}",
            entry.label
        );
        for facet in &entry.facets {
            assert_eq!(
                content_page(&rendering, &facet.label),
                Some(facet.page_index - 1),
                "facet {}",
                facet.label
            );
        }
    }

    // The verbose feedback pushes later facets onto later pages.
    let neuro = &outline[0];
    assert!(neuro.facets[1].page_index > neuro.facets[0].page_index);
}

#[test]
fn toc_rows_link_to_the_recorded_pages() {
    let rendering = render(two_by_two(), &two_forms());

    let expected: Vec<usize> = rendering
        .outline
        .iter()
        .flat_map(|entry| {
            std::iter::once(entry.page_index - 1)
                .chain(entry.facets.iter().map(|facet| facet.page_index - 1))
        })
        .collect();
    let targets: Vec<usize> = rendering
        .surface
        .links()
        .inspect(|(page, _, _)| assert!(rendering.toc.pages.contains(page)))
        .map(|(_, _, target)| target)
        .collect();
    assert_eq!(targets, expected);

    for target in &targets {
        let number = (target + 1).to_string();
        assert!(
            rendering
                .surface
                .texts()
                .any(|(page, _, text)| rendering.toc.pages.contains(&page) && text == number),
            "page number {number} missing from the TOC"
        );
    }
}

/// Asserts that no content text or fill reaches into the footer band.
fn assert_above_footer(rendering: &Rendering<RecordingSurface>) {
    let bottom = PageGeometry::default().safe_bottom();
    for op in rendering.surface.ops() {
        match op {
            DrawOp::Text { origin, text, .. } if !is_footer(text) => {
                assert!(origin.y >= bottom, "{text:?} at {origin:?}");
            }
            DrawOp::Fill { rect, .. } => {
                assert!(rect.y >= bottom - 1e-9, "fill at {rect:?}");
            }
            _ => {}
        }
    }
}

#[test]
fn nothing_is_drawn_below_the_footer_band() {
    let rendering = render(two_by_two(), &two_forms());
    assert!(rendering.page_count > 6);
    assert_above_footer(&rendering);
}

#[test]
fn oversized_cover_introduction_flows_across_pages() {
    let cover = CoverContent {
        introduction: vec!["palavra comprida de teste ".repeat(600)],
        ..CoverContent::default()
    };
    let rendering = ReportBuilder::new(ContentPack::new())
        .with_cover(cover)
        .render_on(RecordingSurface::new(), &[]);

    assert!(rendering.page_count > 3);
    assert_above_footer(&rendering);
}

#[test]
fn oversized_facet_description_stays_above_the_footer() {
    let content = ContentPack::new().with_factor(
        FactorContent::new(FactorKey::Abertura).with_facet(
            FacetContent::new("Liberalismo")
                .with_description("descricao longa ".repeat(800))
                .with_question(Question::new("a1", "q1").reversed(false)),
        ),
    );
    let forms = vec![FormSubmission::new("abertura").with_answer("a1", 4)];
    let rendering = render(content, &forms);

    let card_page = content_page(&rendering, "Liberalismo").expect("card drawn");
    assert_eq!(rendering.outline[0].facets[0].page_index, card_page + 1);
    assert!(rendering.page_count > card_page + 1);
    assert_above_footer(&rendering);
}

#[test]
fn oversized_feedback_blocks_stay_above_the_footer() {
    let mut feedback = long_feedback("Ansiedade");
    feedback.definition = "definição extensa ".repeat(700);
    feedback.strategies = vec!["estratégia sem fim ".repeat(700), "breve".to_owned()];
    let mut facet =
        FacetContent::new("Ansiedade").with_question(Question::new("n1", "q1").reversed(false));
    for level in Level::ALL {
        facet = facet.with_feedback(level, feedback.clone());
    }
    let content = ContentPack::new()
        .with_factor(FactorContent::new(FactorKey::Neuroticismo).with_facet(facet));
    let forms = vec![FormSubmission::new("neuroticismo").with_answer("n1", 3)];
    let rendering = render(content, &forms);

    let last_toc_page = rendering.toc.pages.iter().copied().max().unwrap_or(0);
    let markers = rendering
        .surface
        .texts()
        .filter(|(page, _, text)| *page > last_toc_page && *text == "•")
        .count();
    assert_eq!(markers, 6 + 5 + 5 + 2);
    assert_above_footer(&rendering);
}

#[test]
fn footers_number_every_page_but_the_cover() {
    let rendering = render(two_by_two(), &two_forms());
    let total = rendering.page_count;

    let mut footers: Vec<(usize, String)> = rendering
        .surface
        .texts()
        .filter(|(_, _, text)| is_footer(text))
        .map(|(page, _, text)| (page, text.to_owned()))
        .collect();
    footers.sort();

    let expected: Vec<(usize, String)> = (1..total)
        .map(|page| (page, format!("{} / {}", page + 1, total)))
        .collect();
    assert_eq!(footers, expected);
}

#[test]
fn reversed_last_question_scenario_reads_low() {
    let content = ContentPack::new().with_factor(
        FactorContent::new(FactorKey::Neuroticismo).with_facet(
            FacetContent::new("Ansiedade")
                .with_question(Question::new("n1", "q1"))
                .with_question(Question::new("n2", "q2"))
                .with_question(Question::new("n3", "q3"))
                .with_question(Question::new("n4", "q4"))
                .with_question(Question::new("n5", "q5"))
                .with_question(Question::new("n6", "q6").reversed(true)),
        ),
    );
    let forms = parse_submissions(
        r#"[{"identifier": "neuroticismo-v1",
             "answers": {"n1": 5, "n2": 4, "n3": 3, "n4": 2, "n5": 1, "n6": 5}}]"#,
    )
    .expect("forms parse");

    let rendering = render(content, &forms);
    assert!(rendering
        .surface
        .find_text("Nível: Baixo • Média: 2.67")
        .is_some());
}

#[test]
fn unknown_forms_render_a_placeholder_and_the_rest_continues() {
    let forms = vec![
        FormSubmission::new("formulario-misterioso").with_answer("x1", 3),
        two_forms().remove(1),
    ];
    let rendering = render(two_by_two(), &forms);

    let placeholder = content_page(&rendering, NOT_FOUND_TITLE).expect("placeholder drawn");
    assert_eq!(rendering.outline.len(), 1);
    assert_eq!(rendering.outline[0].label, "Abertura");
    assert!(rendering.outline[0].page_index - 1 > placeholder);
}

#[test]
fn layout_is_reproducible() {
    let first = render(two_by_two(), &two_forms());
    let second = render(two_by_two(), &two_forms());
    assert_eq!(first.surface.ops(), second.surface.ops());
    assert_eq!(first.outline, second.outline);
}

#[test]
fn demo_payload_renders_every_factor() {
    let content = ContentPack::from_json_str(include_str!("../demos/content_pack.json"))
        .expect("demo pack parses");
    let forms =
        parse_submissions(include_str!("../demos/forms.json")).expect("demo forms parse");

    let rendering = render(content, &forms);
    let labels: Vec<&str> = rendering
        .outline
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["Neuroticismo", "Extroversão", "Socialização", "Realização", "Abertura"]
    );
    assert!(content_page(&rendering, NOT_FOUND_TITLE).is_some());
    assert!(rendering
        .surface
        .find_text("Nível: Baixo • Média: 2.67")
        .is_some());
}
