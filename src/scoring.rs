//! Turns raw answers into facet averages and classification levels.
//!
//! Resolution happens in four steps: the form identifier is mapped to a
//! canonical [`FactorKey`], each question is resolved to a numeric answer
//! ([`resolve_answer`]), answers are averaged with reverse scoring
//! ([`score_facet`]), and the average is classified ([`classify`]).

use std::fmt;
use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::content::{ContentPack, Question};
use crate::forms::{AnswerMap, FormSubmission};

/// Upper bound of the answer scale; reversed answers become `SCALE_MAX + 1 - raw`.
pub const SCALE_MAX: f64 = 5.0;

/// Lowercases, strips diacritics and drops every non-alphanumeric character.
///
/// Applied to every externally supplied key before it is compared with a
/// canonical name.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn version_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"v?\d+$").expect("valid version suffix pattern"))
}

fn question_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]+)(\d+)$").expect("valid question id pattern"))
}

/// The five personality factors a form can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKey {
    /// Emotional instability and vulnerability.
    Neuroticismo,
    /// Sociability and energy in interactions.
    Extroversao,
    /// Agreeableness.
    Socializacao,
    /// Conscientiousness.
    Realizacao,
    /// Openness to experience.
    Abertura,
}

/// Alternate storage layout of a factor's answers: `letter + offset + n`.
struct StorageLayout {
    letter: &'static str,
    offsets: &'static [(&'static str, u32)],
}

impl FactorKey {
    /// All factors, in report order.
    pub const ALL: [FactorKey; 5] = [
        FactorKey::Neuroticismo,
        FactorKey::Extroversao,
        FactorKey::Socializacao,
        FactorKey::Realizacao,
        FactorKey::Abertura,
    ];

    /// Canonical (normalized) key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neuroticismo => "neuroticismo",
            Self::Extroversao => "extroversao",
            Self::Socializacao => "socializacao",
            Self::Realizacao => "realizacao",
            Self::Abertura => "abertura",
        }
    }

    /// Display name with diacritics.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Neuroticismo => "Neuroticismo",
            Self::Extroversao => "Extroversão",
            Self::Socializacao => "Socialização",
            Self::Realizacao => "Realização",
            Self::Abertura => "Abertura",
        }
    }

    /// Normalized name fragments that identify the factor.
    fn stems(self) -> &'static [&'static str] {
        match self {
            Self::Neuroticismo => &["neuroticismo", "neuroticism"],
            Self::Extroversao => &["extroversao", "extroversion", "extraversao", "extraversion"],
            Self::Socializacao => &["socializacao", "amabilidade", "agreeableness"],
            Self::Realizacao => &["realizacao", "conscienciosidade", "conscientiousness"],
            Self::Abertura => &["abertura", "openness"],
        }
    }

    fn storage_layout(self) -> StorageLayout {
        match self {
            Self::Neuroticismo => StorageLayout {
                letter: "n",
                offsets: &[("VU", 0), ("IE", 6), ("PA", 12), ("AC", 18)],
            },
            Self::Extroversao => StorageLayout {
                letter: "e",
                offsets: &[("CO", 0), ("AL", 6), ("DI", 12), ("IS", 18)],
            },
            Self::Socializacao => StorageLayout {
                letter: "s",
                offsets: &[("AM", 0), ("PR", 6), ("CF", 12)],
            },
            Self::Realizacao => StorageLayout {
                letter: "r",
                offsets: &[("CP", 0), ("PO", 6), ("EM", 12)],
            },
            Self::Abertura => StorageLayout {
                letter: "a",
                offsets: &[("AI", 0), ("LI", 6), ("BN", 12)],
            },
        }
    }
}

impl fmt::Display for FactorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Maps a free-form form identifier to its factor.
///
/// The identifier is normalized and stripped of a trailing version suffix
/// (`-v1`, `_2`, …), then matched by substring against each factor's names.
/// Returns `None` when nothing matches or when more than one factor matches.
pub fn resolve_factor_key(raw: &str) -> Option<FactorKey> {
    let normalized = normalize_key(raw);
    let stripped = version_suffix().replace(&normalized, "");
    if stripped.is_empty() {
        return None;
    }

    let mut matches = FactorKey::ALL
        .into_iter()
        .filter(|key| key.stems().iter().any(|stem| stripped.contains(stem)));

    match (matches.next(), matches.next()) {
        (Some(key), None) => Some(key),
        (Some(first), Some(second)) => {
            warn!(
                "Form identifier '{}' is ambiguous ({} / {})",
                raw, first, second
            );
            None
        }
        (None, _) => None,
    }
}

/// Maps a canonical question id such as `AC3` to the id the factor's answers
/// may be stored under (`n21` for neuroticism, whose `AC` block starts at 18).
pub fn alternate_question_id(factor: FactorKey, question_id: &str) -> Option<String> {
    let captures = question_id_pattern().captures(question_id.trim())?;
    let prefix = captures.get(1)?.as_str().to_ascii_uppercase();
    let number: u32 = captures.get(2)?.as_str().parse().ok()?;

    let layout = factor.storage_layout();
    layout
        .offsets
        .iter()
        .find(|(candidate, _)| *candidate == prefix)
        .map(|(_, offset)| format!("{}{}", layout.letter, offset + number))
}

/// Which lookup strategy produced an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionTier {
    /// The question id was present as-is.
    Exact,
    /// The factor's alternate storage id was present.
    Remapped,
    /// A key differing only in case from either id was present.
    CaseInsensitive,
}

/// A numeric answer together with the strategy that found it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedAnswer {
    /// The raw numeric answer.
    pub value: f64,
    /// How it was found.
    pub tier: ResolutionTier,
}

/// Resolves a question's answer, trying exact, remapped and case-insensitive
/// lookups in that order. The first lookup yielding a number wins.
pub fn resolve_answer(
    factor: FactorKey,
    question_id: &str,
    answers: &AnswerMap,
) -> Option<ResolvedAnswer> {
    let numeric = |key: &str| answers.get(key).and_then(|value| value.as_number());

    if let Some(value) = numeric(question_id) {
        return Some(ResolvedAnswer {
            value,
            tier: ResolutionTier::Exact,
        });
    }

    let alternate = alternate_question_id(factor, question_id);
    if let Some(value) = alternate.as_deref().and_then(numeric) {
        return Some(ResolvedAnswer {
            value,
            tier: ResolutionTier::Remapped,
        });
    }

    let wanted: Vec<String> = std::iter::once(question_id)
        .chain(alternate.as_deref())
        .map(str::to_lowercase)
        .collect();
    answers
        .iter()
        .filter(|(key, _)| wanted.contains(&key.to_lowercase()))
        .find_map(|(_, value)| value.as_number())
        .map(|value| ResolvedAnswer {
            value,
            tier: ResolutionTier::CaseInsensitive,
        })
}

/// Resolves a question's numeric answer; see [`resolve_answer`].
pub fn get_answer(factor: FactorKey, question_id: &str, answers: &AnswerMap) -> Option<f64> {
    resolve_answer(factor, question_id, answers).map(|resolved| resolved.value)
}

/// Whether a question is reverse-scored.
///
/// An explicit flag always wins. Untagged questions are reversed only when
/// they are the last question of their facet, which keeps older content packs
/// that never tagged their reversed item scoring the same way.
// TODO: confirm with the content owners whether the last-question fallback
// should stay once all packs carry explicit flags.
pub fn is_reversed(question: &Question, is_last: bool) -> bool {
    question.reverse.unwrap_or(is_last)
}

/// Averages a facet's answers, applying reverse scoring.
///
/// Unresolvable questions are left out of the average. Returns `None` when no
/// question resolves; otherwise the mean rounded to two decimals.
pub fn score_facet(factor: FactorKey, questions: &[Question], answers: &AnswerMap) -> Option<f64> {
    let last = questions.len().saturating_sub(1);
    let mut total = 0.0;
    let mut count = 0usize;

    for (index, question) in questions.iter().enumerate() {
        let Some(raw) = get_answer(factor, &question.id, answers) else {
            debug!(
                "No answer for question '{}' of {}; excluded from average",
                question.id, factor
            );
            continue;
        };
        total += if is_reversed(question, index == last) {
            SCALE_MAX + 1.0 - raw
        } else {
            raw
        };
        count += 1;
    }

    if count == 0 {
        None
    } else {
        Some(round2(total / count as f64))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Three-band classification of a facet average.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Average below 3.0.
    Low,
    /// Average in `[3.0, 4.0)`, or no average at all.
    Medium,
    /// Average of 4.0 or more.
    High,
}

impl Level {
    /// All levels, low to high.
    pub const ALL: [Level; 3] = [Level::Low, Level::Medium, Level::High];

    /// Label shown on badges.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Baixo",
            Self::Medium => "Médio",
            Self::High => "Alto",
        }
    }

    /// Parses a level name as found in content packs (`low`, `Baixo`, `médio`, …).
    pub fn from_key(raw: &str) -> Option<Level> {
        match normalize_key(raw).as_str() {
            "low" | "baixo" | "baixa" => Some(Self::Low),
            "medium" | "medio" | "media" | "moderado" | "moderada" => Some(Self::Medium),
            "high" | "alto" | "alta" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies an average: `[.., 3.0)` low, `[3.0, 4.0)` medium, `[4.0, ..]`
/// high. A missing average is medium.
pub fn classify(average: Option<f64>) -> Level {
    match average {
        None => Level::Medium,
        Some(value) if value < 3.0 => Level::Low,
        Some(value) if value < 4.0 => Level::Medium,
        Some(_) => Level::High,
    }
}

/// Score of one facet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FacetScore {
    /// Facet name as defined by the content pack.
    pub facet: String,
    /// Rounded average, or `None` if no question resolved.
    pub average: Option<f64>,
    /// Classification of `average`.
    pub level: Level,
}

impl FacetScore {
    /// Text shown in a facet card's badge, e.g. `Nível: Baixo • Média: 2.67`.
    pub fn badge_label(&self) -> String {
        match self.average {
            Some(average) => format!("Nível: {} • Média: {:.2}", self.level, average),
            None => format!("Nível: {} • Média: —", self.level),
        }
    }
}

/// Scores of every facet of one submitted form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FactorSummary {
    /// Identifier as submitted.
    pub identifier: String,
    /// Resolved factor.
    pub factor: FactorKey,
    /// Facet scores in content-pack order.
    pub facets: Vec<FacetScore>,
}

/// Scores one form against the content pack.
///
/// Returns `None` when the identifier does not resolve to a factor or the
/// pack has no definition for it.
pub fn score_form(content: &ContentPack, form: &FormSubmission) -> Option<FactorSummary> {
    let factor = resolve_factor_key(&form.identifier)?;
    let definition = content.factor(factor)?;

    let facets = definition
        .facets
        .iter()
        .map(|facet| {
            let average = score_facet(factor, &facet.questions, &form.answers);
            FacetScore {
                facet: facet.name.clone(),
                average,
                level: classify(average),
            }
        })
        .collect();

    Some(FactorSummary {
        identifier: form.identifier.clone(),
        factor,
        facets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::AnswerValue;

    fn answers(pairs: &[(&str, f64)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), AnswerValue::Number(*value)))
            .collect()
    }

    fn question(id: &str, reverse: Option<bool>) -> Question {
        Question {
            id: id.to_owned(),
            text: String::new(),
            reverse,
        }
    }

    #[test]
    fn normalization_strips_case_accents_and_separators() {
        assert_eq!(normalize_key("  Extroversão_Forma-B "), "extroversaoformab");
        assert_eq!(normalize_key("Características"), "caracteristicas");
    }

    #[test]
    fn resolves_factor_identifiers() {
        assert_eq!(resolve_factor_key("neuroticismo-v1"), Some(FactorKey::Neuroticismo));
        assert_eq!(resolve_factor_key(" EXTROVERSÃO "), Some(FactorKey::Extroversao));
        assert_eq!(resolve_factor_key("form_socializacao_v2"), Some(FactorKey::Socializacao));
        assert_eq!(resolve_factor_key("Realização 3"), Some(FactorKey::Realizacao));
        assert_eq!(resolve_factor_key("openness"), Some(FactorKey::Abertura));
    }

    #[test]
    fn unknown_or_ambiguous_identifiers_do_not_resolve() {
        assert_eq!(resolve_factor_key("questionario-geral"), None);
        assert_eq!(resolve_factor_key(""), None);
        assert_eq!(resolve_factor_key("v1"), None);
        assert_eq!(resolve_factor_key("abertura-e-neuroticismo"), None);
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify(Some(1.0)), Level::Low);
        assert_eq!(classify(Some(2.99)), Level::Low);
        assert_eq!(classify(Some(3.0)), Level::Medium);
        assert_eq!(classify(Some(3.99)), Level::Medium);
        assert_eq!(classify(Some(4.0)), Level::High);
        assert_eq!(classify(Some(5.0)), Level::High);
        assert_eq!(classify(None), Level::Medium);
    }

    #[test]
    fn explicitly_reversed_last_question() {
        let questions = [
            question("q1", Some(false)),
            question("q2", Some(false)),
            question("q3", Some(true)),
        ];
        let answers = answers(&[("q1", 2.0), ("q2", 4.0), ("q3", 5.0)]);
        assert_eq!(
            score_facet(FactorKey::Abertura, &questions, &answers),
            Some(2.33)
        );
    }

    #[test]
    fn untagged_last_question_is_reversed() {
        let questions = [question("q1", None), question("q2", None), question("q3", None)];
        let answers = answers(&[("q1", 2.0), ("q2", 4.0), ("q3", 5.0)]);
        assert_eq!(
            score_facet(FactorKey::Abertura, &questions, &answers),
            Some(2.33)
        );
    }

    #[test]
    fn explicit_false_on_last_question_disables_fallback() {
        let questions = [question("q1", None), question("q2", Some(false))];
        let answers = answers(&[("q1", 2.0), ("q2", 5.0)]);
        assert_eq!(
            score_facet(FactorKey::Abertura, &questions, &answers),
            Some(3.5)
        );
    }

    #[test]
    fn unresolved_questions_are_excluded_not_zeroed() {
        let questions = [question("q1", None), question("q2", None), question("q3", Some(false))];
        let answers = answers(&[("q1", 4.0), ("q3", 2.0)]);
        assert_eq!(
            score_facet(FactorKey::Abertura, &questions, &answers),
            Some(3.0)
        );
    }

    #[test]
    fn facet_without_answers_has_no_average() {
        let questions = [question("q1", None)];
        let average = score_facet(FactorKey::Abertura, &questions, &AnswerMap::new());
        assert_eq!(average, None);
        assert_eq!(classify(average), Level::Medium);
    }

    #[test]
    fn alternate_ids_follow_factor_layout() {
        assert_eq!(
            alternate_question_id(FactorKey::Neuroticismo, "AC3").as_deref(),
            Some("n21")
        );
        assert_eq!(
            alternate_question_id(FactorKey::Neuroticismo, "vu1").as_deref(),
            Some("n1")
        );
        assert_eq!(alternate_question_id(FactorKey::Abertura, "AC3"), None);
        assert_eq!(alternate_question_id(FactorKey::Neuroticismo, "free-text"), None);
    }

    #[test]
    fn exact_id_wins_over_remap() {
        let answers = answers(&[("AC3", 2.0), ("n21", 5.0)]);
        let resolved = resolve_answer(FactorKey::Neuroticismo, "AC3", &answers).unwrap();
        assert_eq!(resolved.value, 2.0);
        assert_eq!(resolved.tier, ResolutionTier::Exact);
    }

    #[test]
    fn remapped_id_is_second_tier() {
        let answers = answers(&[("n21", 5.0)]);
        let resolved = resolve_answer(FactorKey::Neuroticismo, "AC3", &answers).unwrap();
        assert_eq!(resolved.value, 5.0);
        assert_eq!(resolved.tier, ResolutionTier::Remapped);
    }

    #[test]
    fn case_insensitive_match_is_third_tier() {
        let answers = answers(&[("ac3", 4.0)]);
        let resolved = resolve_answer(FactorKey::Neuroticismo, "AC3", &answers).unwrap();
        assert_eq!(resolved.tier, ResolutionTier::CaseInsensitive);

        let answers = self::answers(&[("N21", 1.0)]);
        let resolved = resolve_answer(FactorKey::Neuroticismo, "AC3", &answers).unwrap();
        assert_eq!(resolved.value, 1.0);
        assert_eq!(resolved.tier, ResolutionTier::CaseInsensitive);
    }

    #[test]
    fn nothing_matching_resolves_to_none() {
        let answers = answers(&[("other", 3.0)]);
        assert_eq!(get_answer(FactorKey::Neuroticismo, "AC3", &answers), None);
    }

    #[test]
    fn badge_label_formats_level_and_average() {
        let score = FacetScore {
            facet: "Ansiedade".into(),
            average: Some(2.67),
            level: Level::Low,
        };
        assert_eq!(score.badge_label(), "Nível: Baixo • Média: 2.67");

        let unanswered = FacetScore {
            facet: "Ansiedade".into(),
            average: None,
            level: Level::Medium,
        };
        assert_eq!(unanswered.badge_label(), "Nível: Médio • Média: —");
    }

    #[test]
    fn level_keys_accept_portuguese_and_english() {
        assert_eq!(Level::from_key("Médio"), Some(Level::Medium));
        assert_eq!(Level::from_key("HIGH"), Some(Level::High));
        assert_eq!(Level::from_key("baixa"), Some(Level::Low));
        assert_eq!(Level::from_key("extremo"), None);
    }
}
