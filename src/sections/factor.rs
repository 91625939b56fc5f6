//! Factor and facet pages.

use log::{debug, warn};

use crate::content::{ContentPack, FactorContent, FeedbackContent};
use crate::forms::FormSubmission;
use crate::layout::LayoutContext;
use crate::primitives::{self, Card};
use crate::scoring::{classify, resolve_factor_key, score_facet, FacetScore};
use crate::surface::Surface;
use crate::text::line_height;
use crate::toc::TocEntry;

/// Heading of the placeholder page drawn for unresolved forms.
pub const NOT_FOUND_TITLE: &str = "Fator não encontrado";

const DEFINITION_LABEL: &str = "Definição";
const TRAITS_LABEL: &str = "Características";
const ADVANTAGES_LABEL: &str = "Vantagens";
const DIFFICULTIES_LABEL: &str = "Dificuldades";
const STRATEGIES_LABEL: &str = "Estratégias de desenvolvimento";
const CONCLUSION_LABEL: &str = "Conclusão";

fn factor_for<'a>(content: &'a ContentPack, form: &FormSubmission) -> Option<&'a FactorContent> {
    let key = resolve_factor_key(&form.identifier)?;
    let factor = content.factor(key);
    if factor.is_none() {
        warn!(
            "Form '{}' resolved to {} but the content pack has no such factor",
            form.identifier, key
        );
    }
    factor
}

/// Outline the factor pages of `forms` will produce, without page numbers.
///
/// Used to size the table of contents before any factor page exists.
pub fn plan_outline(content: &ContentPack, forms: &[FormSubmission]) -> Vec<TocEntry> {
    forms
        .iter()
        .filter_map(|form| {
            let factor = resolve_factor_key(&form.identifier).and_then(|key| content.factor(key))?;
            let mut entry = TocEntry::new(factor.title.clone(), 0);
            for facet in &factor.facets {
                entry.push_facet(facet.name.clone(), 0);
            }
            Some(entry)
        })
        .collect()
}

/// Renders one submitted form starting on a fresh page.
///
/// Forms whose identifier does not resolve to a factor of `content` get a
/// placeholder page and no outline entry. Otherwise an entry is appended to
/// `outline` and filled with each facet as its card is drawn.
pub fn render_form<S: Surface>(
    ctx: &mut LayoutContext<S>,
    content: &ContentPack,
    form: &FormSubmission,
    outline: &mut Vec<TocEntry>,
) {
    ctx.new_page();

    let Some(factor) = factor_for(content, form) else {
        render_not_found(ctx, &form.identifier);
        return;
    };

    let heading_page = primitives::heading(ctx, &factor.title);
    outline.push(TocEntry::new(factor.title.clone(), heading_page + 1));

    if !factor.description.trim().is_empty() {
        primitives::paragraph(ctx, &factor.description);
    }
    primitives::divider(ctx);

    for facet in &factor.facets {
        let average = score_facet(factor.key, &facet.questions, &form.answers);
        let score = FacetScore {
            facet: facet.name.clone(),
            average,
            level: classify(average),
        };

        let badge = score.badge_label();
        let badge_color = ctx.theme().level_color(score.level);
        let page = primitives::card(
            ctx,
            &Card {
                title: &facet.name,
                description: &facet.description,
                badge: &badge,
                badge_color,
            },
        );
        if let Some(entry) = outline.last_mut() {
            entry.push_facet(facet.name.clone(), page + 1);
        }

        match facet.feedback_for(score.level) {
            Some(feedback) => render_feedback(ctx, feedback),
            None => debug!(
                "No {} feedback for facet '{}' of {}; block omitted",
                score.level, facet.name, factor.key
            ),
        }
    }
}

/// Draws the placeholder shown for a form whose factor is unknown.
pub fn render_not_found<S: Surface>(ctx: &mut LayoutContext<S>, identifier: &str) {
    warn!("Could not resolve a factor for form '{}'", identifier);
    primitives::heading(ctx, NOT_FOUND_TITLE);
    primitives::paragraph(
        ctx,
        &format!(
            "Não foi possível identificar o fator correspondente ao formulário \"{}\". \
             As respostas deste formulário não foram incluídas no relatório.",
            identifier.trim()
        ),
    );
}

/// Reserves room for a section label and the first line of what follows, so
/// the label never ends a page on its own.
fn labelled<S: Surface>(ctx: &mut LayoutContext<S>, label: &str) {
    ctx.ensure(primitives::section_label_height() + line_height(primitives::BODY_SIZE));
    primitives::section_label(ctx, label);
}

fn render_feedback<S: Surface>(ctx: &mut LayoutContext<S>, feedback: &FeedbackContent) {
    if !feedback.title.trim().is_empty() {
        primitives::subheading(ctx, &feedback.title);
    }
    if !feedback.definition.trim().is_empty() {
        labelled(ctx, DEFINITION_LABEL);
        primitives::paragraph(ctx, &feedback.definition);
    }

    let lists = [
        (TRAITS_LABEL, &feedback.traits),
        (ADVANTAGES_LABEL, &feedback.advantages),
        (DIFFICULTIES_LABEL, &feedback.difficulties),
        (STRATEGIES_LABEL, &feedback.strategies),
    ];
    for (label, items) in lists {
        if items.iter().all(|item| item.trim().is_empty()) {
            continue;
        }
        labelled(ctx, label);
        primitives::bullet_list(ctx, items);
    }

    if !feedback.conclusion.trim().is_empty() {
        labelled(ctx, CONCLUSION_LABEL);
        primitives::paragraph(ctx, &feedback.conclusion);
    }
}
