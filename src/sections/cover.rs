//! Cover page.

use crate::fonts::{Face, TextMeasure};
use crate::layout::LayoutContext;
use crate::primitives::{self, CalloutVariant};
use crate::scoring::FactorKey;
use crate::surface::{Point, Rect, Surface, TextStyle};
use crate::text::{line_height, truncate_to_width, wrap_text};

const BANNER_HEIGHT: f64 = 210.0;
const BANNER_PADDING: f64 = 28.0;
const TITLE_MAX_SIZE: u32 = 30;
const TITLE_MIN_SIZE: u32 = 18;
const TITLE_MAX_LINES: usize = 2;
const SUBTITLE_SIZE: f64 = 13.0;
const SUBTITLE_GAP: f64 = 10.0;
const BANNER_GAP: f64 = 24.0;
const INTRO_SIZE: f64 = 10.5;

/// Texts shown on the cover page.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverContent {
    /// Report title, shrunk to fit two lines of the banner.
    pub title: String,
    /// Line under the title.
    pub subtitle: String,
    /// Title of the warning callout.
    pub notice_title: String,
    /// Body of the warning callout.
    pub notice: String,
    /// Introductory paragraphs, justified.
    pub introduction: Vec<String>,
    /// Heading of the factor glossary.
    pub glossary_title: String,
    /// Glossary items as `(term, definition)`.
    pub glossary: Vec<(String, String)>,
}

impl Default for CoverContent {
    fn default() -> Self {
        Self {
            title: "Relatório de Personalidade".to_owned(),
            subtitle: "Bateria Fatorial de Personalidade (BFP)".to_owned(),
            notice_title: "Atenção".to_owned(),
            notice: "Este relatório tem caráter informativo e não substitui a avaliação de um \
                     profissional de psicologia. Os resultados refletem as respostas fornecidas \
                     no momento do preenchimento."
                .to_owned(),
            introduction: vec![
                "O modelo dos Cinco Grandes Fatores descreve a personalidade a partir de cinco \
                 dimensões amplas, cada uma composta por facetas mais específicas. Para cada \
                 faceta avaliada, este relatório apresenta a média das suas respostas, o nível \
                 correspondente e um conjunto de orientações associadas a esse nível."
                    .to_owned(),
                "Nenhum nível é melhor ou pior do que outro: cada perfil traz vantagens e \
                 desafios próprios. Use as estratégias sugeridas como ponto de partida para \
                 reflexão e desenvolvimento."
                    .to_owned(),
            ],
            glossary_title: "Os cinco fatores".to_owned(),
            glossary: FactorKey::ALL
                .iter()
                .map(|factor| (factor.display_name().to_owned(), glossary_entry(*factor).to_owned()))
                .collect(),
        }
    }
}

fn glossary_entry(factor: FactorKey) -> &'static str {
    match factor {
        FactorKey::Neuroticismo => {
            "tendência a vivenciar emoções negativas e instabilidade emocional."
        }
        FactorKey::Extroversao => "intensidade das interações sociais e nível de energia.",
        FactorKey::Socializacao => "qualidade das relações interpessoais, confiança e empatia.",
        FactorKey::Realizacao => "organização, persistência e foco em objetivos.",
        FactorKey::Abertura => "curiosidade, imaginação e interesse por novas experiências.",
    }
}

/// Picks the largest title size whose wrapped lines fit the banner.
///
/// The size shrinks one point at a time from 30 down to 18. If the title
/// still needs more than two lines at 18 points, the second line is
/// truncated with an ellipsis.
pub fn fit_title(title: &str, measure: &dyn TextMeasure, max_width: f64) -> (f64, Vec<String>) {
    for size in (TITLE_MIN_SIZE..=TITLE_MAX_SIZE).rev() {
        let size = f64::from(size);
        let lines = wrap_text(title, measure, Face::Bold, size, max_width);
        if lines.len() <= TITLE_MAX_LINES {
            return (size, lines);
        }
    }

    let size = f64::from(TITLE_MIN_SIZE);
    let mut lines = wrap_text(title, measure, Face::Bold, size, max_width);
    let overflow = lines.split_off(TITLE_MAX_LINES - 1).join(" ");
    lines.push(truncate_to_width(
        &overflow,
        "…",
        measure,
        Face::Bold,
        size,
        max_width,
    ));
    (size, lines)
}

/// Draws the cover on the current page and records it as the cover.
pub fn render_cover<S: Surface>(ctx: &mut LayoutContext<S>, cover: &CoverContent) {
    ctx.mark_cover();
    let geometry = *ctx.geometry();
    let theme = *ctx.theme();

    let banner = Rect::new(0.0, geometry.height - BANNER_HEIGHT, geometry.width, BANNER_HEIGHT);
    ctx.fill_rect(banner, theme.primary);
    ctx.fill_rect(Rect::new(0.0, banner.y, geometry.width, 4.0), theme.accent);

    let (size, lines) = fit_title(&cover.title, ctx.metrics(), ctx.content_width());
    let title_style = TextStyle::new(Face::Bold, size, theme.on_primary);
    let mut top = banner.top() - BANNER_PADDING - geometry.margin / 2.0;
    for line in &lines {
        ctx.draw_text(Point::new(ctx.left(), top - size), line, title_style);
        top -= line_height(size);
    }

    if !cover.subtitle.trim().is_empty() {
        let subtitle_style = TextStyle::new(Face::Regular, SUBTITLE_SIZE, theme.on_primary);
        let subtitle = truncate_to_width(
            &cover.subtitle,
            "…",
            ctx.metrics(),
            Face::Regular,
            SUBTITLE_SIZE,
            ctx.content_width(),
        );
        top -= SUBTITLE_GAP;
        ctx.draw_text(
            Point::new(ctx.left(), top - SUBTITLE_SIZE),
            &subtitle,
            subtitle_style,
        );
    }

    ctx.set_cursor_y(banner.y - BANNER_GAP);

    if !cover.notice.trim().is_empty() {
        primitives::callout(ctx, &cover.notice_title, &cover.notice, CalloutVariant::Warning);
    }
    for paragraph in &cover.introduction {
        primitives::justified_paragraph(ctx, paragraph, INTRO_SIZE);
    }

    if !cover.glossary.is_empty() {
        primitives::subheading(ctx, &cover.glossary_title);
        let items: Vec<String> = cover
            .glossary
            .iter()
            .map(|(term, definition)| format!("{term}: {definition}"))
            .collect();
        primitives::bullet_list(ctx, &items);
    }
}
