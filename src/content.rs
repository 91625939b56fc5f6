//! Externally authored report content: factor descriptions, facet questions
//! and the feedback shown for each classification level.
//!
//! Content packs arrive as loosely structured JSON written by hand, with
//! Portuguese or English key spellings and inconsistent accents. Every key is
//! passed through [`normalize_key`] before it is interpreted, and the result
//! is stored in the typed model below. Nothing downstream sees raw keys.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use log::warn;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::ReportError;
use crate::scoring::{normalize_key, resolve_factor_key, FactorKey, Level};

/// A questionnaire item.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Question {
    /// Canonical question id.
    pub id: String,
    /// Question wording.
    #[serde(default, alias = "texto", alias = "label")]
    pub text: String,
    /// Explicit reverse-scoring flag; `None` when the pack does not say.
    #[serde(
        default,
        alias = "reversed",
        alias = "reverseFlag",
        alias = "invertida",
        alias = "reverso"
    )]
    pub reverse: Option<bool>,
}

impl Question {
    /// Creates an untagged question.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            reverse: None,
        }
    }

    /// Sets the explicit reverse-scoring flag.
    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }
}

/// Feedback shown for one facet at one level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedbackContent {
    /// Canonical title of the feedback block.
    pub title: String,
    /// Definition paragraph.
    pub definition: String,
    /// Typical traits.
    pub traits: Vec<String>,
    /// Advantages of the profile.
    pub advantages: Vec<String>,
    /// Difficulties of the profile.
    pub difficulties: Vec<String>,
    /// Development strategies.
    pub strategies: Vec<String>,
    /// Closing paragraph.
    pub conclusion: String,
}

impl FeedbackContent {
    /// Whether every field is empty.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.definition.trim().is_empty()
            && self.traits.is_empty()
            && self.advantages.is_empty()
            && self.difficulties.is_empty()
            && self.strategies.is_empty()
            && self.conclusion.trim().is_empty()
    }
}

/// A facet of a factor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacetContent {
    /// Facet name, also used as its label in the table of contents.
    pub name: String,
    /// Short description shown on the facet card.
    pub description: String,
    /// Questions in scoring order.
    pub questions: Vec<Question>,
    /// Feedback per level; levels may be missing.
    pub feedback: BTreeMap<Level, FeedbackContent>,
}

impl FacetContent {
    /// Creates a facet with no questions or feedback.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description and returns the updated facet.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a question and returns the updated facet.
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Sets the feedback for `level` and returns the updated facet.
    pub fn with_feedback(mut self, level: Level, feedback: FeedbackContent) -> Self {
        self.feedback.insert(level, feedback);
        self
    }

    /// Feedback for `level`, if the pack provides a non-empty one.
    pub fn feedback_for(&self, level: Level) -> Option<&FeedbackContent> {
        self.feedback
            .get(&level)
            .filter(|feedback| !feedback.is_empty())
    }
}

/// A factor and its facets.
#[derive(Clone, Debug, PartialEq)]
pub struct FactorContent {
    /// Canonical key.
    pub key: FactorKey,
    /// Heading shown on the factor page.
    pub title: String,
    /// Introductory description.
    pub description: String,
    /// Facets in report order.
    pub facets: Vec<FacetContent>,
}

impl FactorContent {
    /// Creates a factor titled with its display name.
    pub fn new(key: FactorKey) -> Self {
        Self {
            key,
            title: key.display_name().to_owned(),
            description: String::new(),
            facets: Vec::new(),
        }
    }

    /// Sets the title and returns the updated factor.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description and returns the updated factor.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a facet and returns the updated factor.
    pub fn with_facet(mut self, facet: FacetContent) -> Self {
        self.facets.push(facet);
        self
    }
}

/// All report content, keyed by factor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentPack {
    factors: BTreeMap<FactorKey, FactorContent>,
}

impl ContentPack {
    /// Creates an empty pack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a factor and returns the updated pack.
    pub fn with_factor(mut self, factor: FactorContent) -> Self {
        self.factors.insert(factor.key, factor);
        self
    }

    /// Content of `key`, if present.
    pub fn factor(&self, key: FactorKey) -> Option<&FactorContent> {
        self.factors.get(&key)
    }

    /// Iterates over factors in canonical order.
    pub fn factors(&self) -> impl Iterator<Item = &FactorContent> {
        self.factors.values()
    }

    /// Parses a JSON content pack.
    ///
    /// The document is either `{"factors": {...}}` or the factor mapping
    /// itself. Factor keys that do not resolve to a known factor, and level
    /// keys that are not recognised, are skipped with a warning.
    pub fn from_json_str(json: &str) -> Result<Self, ReportError> {
        let raw: RawPack = serde_json::from_str(json)?;
        let factors = match raw {
            RawPack::Wrapped { factors } => factors,
            RawPack::Bare(factors) => factors,
        };

        let mut pack = ContentPack::new();
        for (raw_key, raw_factor) in factors {
            let Some(key) = resolve_factor_key(&raw_key) else {
                warn!("Content pack factor '{}' is not a known factor; skipped", raw_key);
                continue;
            };
            pack.factors.insert(key, raw_factor.into_factor(key));
        }
        Ok(pack)
    }

    /// Reads and parses a JSON content pack from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPack {
    Wrapped {
        #[serde(alias = "fatores")]
        factors: BTreeMap<String, RawFactor>,
    },
    Bare(BTreeMap<String, RawFactor>),
}

#[derive(Deserialize)]
struct RawFactor {
    #[serde(default, alias = "titulo")]
    title: Option<String>,
    #[serde(default, alias = "descricao")]
    description: String,
    #[serde(default, alias = "facetas", deserialize_with = "ordered_facets")]
    facets: Vec<(String, RawFacet)>,
}

impl RawFactor {
    fn into_factor(self, key: FactorKey) -> FactorContent {
        FactorContent {
            key,
            title: self
                .title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| key.display_name().to_owned()),
            description: self.description,
            facets: self
                .facets
                .into_iter()
                .map(|(name, facet)| facet.into_facet(name))
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawFacet {
    #[serde(default, alias = "nome")]
    name: Option<String>,
    #[serde(default, alias = "descricao")]
    description: String,
    #[serde(default, alias = "perguntas", alias = "itens")]
    questions: Vec<Question>,
    #[serde(
        default,
        alias = "feedbackByLevel",
        alias = "feedback_by_level",
        alias = "devolutiva"
    )]
    feedback: BTreeMap<String, BTreeMap<String, FeedbackField>>,
}

impl RawFacet {
    fn into_facet(self, fallback_name: String) -> FacetContent {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(fallback_name);

        let mut feedback = BTreeMap::new();
        for (raw_level, fields) in self.feedback {
            match Level::from_key(&raw_level) {
                Some(level) => {
                    feedback.insert(level, feedback_from_fields(fields));
                }
                None => warn!(
                    "Facet '{}' has feedback for unknown level '{}'; skipped",
                    name, raw_level
                ),
            }
        }

        FacetContent {
            name,
            description: self.description,
            questions: self.questions,
            feedback,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedbackField {
    Text(String),
    List(Vec<String>),
}

impl FeedbackField {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::List(items) => items.join(" "),
        }
    }

    fn into_list(self) -> Vec<String> {
        match self {
            Self::Text(text) if text.trim().is_empty() => Vec::new(),
            Self::Text(text) => vec![text],
            Self::List(items) => items
                .into_iter()
                .filter(|item| !item.trim().is_empty())
                .collect(),
        }
    }
}

fn feedback_from_fields(fields: BTreeMap<String, FeedbackField>) -> FeedbackContent {
    let mut feedback = FeedbackContent::default();
    for (raw_key, field) in fields {
        match normalize_key(&raw_key).as_str() {
            "title" | "titulo" | "canonicaltitle" => feedback.title = field.into_text(),
            "definition" | "definicao" => feedback.definition = field.into_text(),
            "traits" | "caracteristicas" => feedback.traits = field.into_list(),
            "advantages" | "vantagens" | "pontosfortes" => feedback.advantages = field.into_list(),
            "difficulties" | "dificuldades" | "desafios" => {
                feedback.difficulties = field.into_list()
            }
            "strategies" | "estrategias" => feedback.strategies = field.into_list(),
            "conclusion" | "conclusao" => feedback.conclusion = field.into_text(),
            other => warn!("Unknown feedback field '{}' ignored", other),
        }
    }
    feedback
}

/// Accepts facets either as a list of objects or as an ordered map from facet
/// name to facet, keeping document order in both cases.
fn ordered_facets<'de, D>(deserializer: D) -> Result<Vec<(String, RawFacet)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FacetsVisitor;

    impl<'de> Visitor<'de> for FacetsVisitor {
        type Value = Vec<(String, RawFacet)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a list of facets or a map of facet name to facet")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut facets = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(facet) = seq.next_element::<RawFacet>()? {
                let name = facet
                    .name
                    .clone()
                    .ok_or_else(|| <A::Error as de::Error>::missing_field("name"))?;
                facets.push((name, facet));
            }
            Ok(facets)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut facets = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, facet)) = map.next_entry::<String, RawFacet>()? {
                facets.push((name, facet));
            }
            Ok(facets)
        }
    }

    deserializer.deserialize_any(FacetsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = r#"{
        "factors": {
            "Neuroticismo": {
                "titulo": "Neuroticismo",
                "descricao": "Tendência a experimentar emoções negativas.",
                "facetas": {
                    "Vulnerabilidade": {
                        "perguntas": [{"id": "VU1"}, {"id": "VU2", "invertida": true}],
                        "feedbackByLevel": {
                            "Baixo": {
                                "Título": "Baixa vulnerabilidade",
                                "Características": ["Calma sob pressão", ""],
                                "Estratégias": "Manter rotinas de cuidado."
                            },
                            "extremo": {"titulo": "ignorado"}
                        }
                    },
                    "Ansiedade": {"questions": [{"id": "AC1"}]}
                }
            },
            "questionario-geral": {"title": "ignorado"}
        }
    }"#;

    #[test]
    fn parses_and_normalizes_keys() {
        let pack = ContentPack::from_json_str(PACK).expect("pack parses");
        let factor = pack.factor(FactorKey::Neuroticismo).expect("factor present");
        assert_eq!(pack.factors().count(), 1);
        assert_eq!(factor.description, "Tendência a experimentar emoções negativas.");

        let names: Vec<&str> = factor.facets.iter().map(|facet| facet.name.as_str()).collect();
        assert_eq!(names, vec!["Vulnerabilidade", "Ansiedade"]);

        let facet = &factor.facets[0];
        assert_eq!(facet.questions[1].reverse, Some(true));
        assert_eq!(facet.questions[0].reverse, None);

        let low = facet.feedback_for(Level::Low).expect("low feedback");
        assert_eq!(low.title, "Baixa vulnerabilidade");
        assert_eq!(low.traits, vec!["Calma sob pressão".to_owned()]);
        assert_eq!(low.strategies, vec!["Manter rotinas de cuidado.".to_owned()]);
        assert!(facet.feedback_for(Level::High).is_none());
    }

    #[test]
    fn facets_may_be_a_list() {
        let pack = ContentPack::from_json_str(
            r#"{"abertura": {"facets": [{"name": "Liberalismo"}, {"nome": "Busca por novidades"}]}}"#,
        )
        .expect("bare pack parses");
        let factor = pack.factor(FactorKey::Abertura).expect("factor present");
        assert_eq!(factor.title, "Abertura");
        assert_eq!(factor.facets[1].name, "Busca por novidades");
    }

    #[test]
    fn empty_feedback_counts_as_missing() {
        let facet = FacetContent::new("Ansiedade").with_feedback(Level::Medium, FeedbackContent::default());
        assert!(facet.feedback_for(Level::Medium).is_none());
    }

    #[test]
    fn demo_pack_covers_every_factor() {
        let pack = ContentPack::from_json_str(include_str!("../demos/content_pack.json"))
            .expect("demo pack parses");
        for key in FactorKey::ALL {
            let factor = pack.factor(key).expect("factor in demo pack");
            assert!(!factor.facets.is_empty(), "{key} has facets");
        }
    }
}
