//! # Avaliador de Importância (Saco de Palavras sem Redundância)
//!
//! Agrega todas as ocorrências de cada lema do documento e calcula uma
//! pontuação de importância. Cada lema aparece no máximo uma vez na saída.
//!
//! ## Filtragem
//!
//! Um token não é candidato se:
//! - sua tag é funcional (DET, ADP, PRON, CCONJ, SCONJ, PUNCT, AUX, SPACE, SYM, NUM);
//! - seu lema está na lista de stop-words do francês;
//! - seu lema tem menos de [`MIN_LEMMA_CHARS`] grafemas;
//! - seu lema não contém nenhuma letra (ex: "1987", "--").
//!
//! ## Pontuação
//!
//! Soma ponderada determinística, arredondada a 4 casas:
//!
//! ```text
//! score = peso_pos × frequência + LENGTH_WEIGHT × min(comprimento_médio / 10, 1)
//! ```
//!
//! | Tag    | Peso |
//! |--------|------|
//! | PROPN  | 1.5  |
//! | NOUN   | 1.3  |
//! | ADJ    | 1.1  |
//! | VERB   | 1.0  |
//! | ADV    | 0.8  |
//! | outras | 0.5  |
//!
//! `comprimento_médio` é medido em grafemas sobre o lema, não sobre as
//! formas de superfície.
//!
//! Empates: frequência decrescente, depois lema em ordem lexicográfica.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};
use crate::stopwords::{has_letter, is_functional_tag, is_stop_word};
use crate::token::{CoarseTag, Document};

/// Comprimento mínimo do lema, em grafemas.
pub const MIN_LEMMA_CHARS: usize = 2;
/// Peso do bônus de comprimento na soma.
pub const LENGTH_WEIGHT: f64 = 0.5;
/// Máximo de exemplos de contexto guardados por palavra.
pub const MAX_CONTEXT_EXAMPLES: usize = 3;

/// Parâmetros fornecidos pelo chamador.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Frequência mínima para um lema entrar na saída. Negativo é erro.
    #[serde(default = "default_min_frequency")]
    pub min_frequency: i64,
    /// Máximo de palavras retornadas (`None` = sem limite). Zero é erro.
    #[serde(default)]
    pub max_words: Option<usize>,
}

fn default_min_frequency() -> i64 {
    1
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            min_frequency: default_min_frequency(),
            max_words: None,
        }
    }
}

impl ScorerConfig {
    pub fn new(min_frequency: i64, max_words: Option<usize>) -> Self {
        Self {
            min_frequency,
            max_words,
        }
    }

    /// Rejeita parâmetros inválidos antes de qualquer processamento.
    pub fn validate(&self) -> Result<()> {
        if self.min_frequency < 0 {
            return Err(Error::configuration(format!(
                "min_frequency must be non-negative, got {}",
                self.min_frequency
            )));
        }
        if self.max_words == Some(0) {
            return Err(Error::configuration("max_words must be greater than zero"));
        }
        Ok(())
    }
}

/// Uma palavra importante do documento (uma por lema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportantWord {
    pub lemma: String,
    /// Forma de superfície da primeira ocorrência.
    pub representative_surface_form: String,
    pub occurrence_count: usize,
    pub importance_score: f64,
    /// Primeira sentença em que o lema aparece, com a ocorrência destacada.
    pub example_context: String,
    /// Tag da primeira ocorrência.
    pub coarse_tag: CoarseTag,
    /// Até [`MAX_CONTEXT_EXAMPLES`] sentenças destacadas.
    pub context_examples: Vec<String>,
}

/// Estatísticas acumuladas de um lema.
#[derive(Debug)]
struct LemmaStats {
    lemma: String,
    surface: String,
    tag: CoarseTag,
    frequency: usize,
    total_length: usize,
    contexts: Vec<String>,
}

/// Avaliador de importância com parâmetros já validados.
#[derive(Debug, Clone)]
pub struct ImportanceScorer {
    min_frequency: usize,
    max_words: Option<usize>,
}

impl ImportanceScorer {
    /// Cria o avaliador. Falha com [`Error::Configuration`] para parâmetros inválidos.
    pub fn new(config: ScorerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            min_frequency: config.min_frequency as usize,
            max_words: config.max_words,
        })
    }

    pub fn config(&self) -> ScorerConfig {
        ScorerConfig {
            min_frequency: self.min_frequency as i64,
            max_words: self.max_words,
        }
    }

    /// Extrai as palavras importantes do documento, ordenadas por pontuação.
    pub fn score(&self, document: &Document) -> Vec<ImportantWord> {
        let mut stats: BTreeMap<String, LemmaStats> = BTreeMap::new();

        for sentence in &document.sentences {
            for (position, token) in sentence.tokens.iter().enumerate() {
                let Some(tag) = token.coarse_tag else { continue };
                let key = token.lemma_key();
                if !is_candidate(tag, &key) {
                    continue;
                }
                let lemma_length = key.graphemes(true).count();

                let entry = stats.entry(key).or_insert_with(|| LemmaStats {
                    lemma: token.lemma.clone(),
                    surface: token.text.clone(),
                    tag,
                    frequency: 0,
                    total_length: 0,
                    contexts: Vec::new(),
                });
                entry.frequency += 1;
                entry.total_length += lemma_length;
                if entry.contexts.len() < MAX_CONTEXT_EXAMPLES {
                    entry.contexts.push(sentence.highlighted(position));
                }
            }
        }

        let mut words: Vec<(String, ImportantWord)> = stats
            .into_iter()
            .filter(|(_, s)| s.frequency >= self.min_frequency)
            .map(|(key, s)| {
                let importance_score = importance_score(s.tag, s.frequency, s.total_length);
                let word = ImportantWord {
                    lemma: s.lemma,
                    representative_surface_form: s.surface,
                    occurrence_count: s.frequency,
                    importance_score,
                    example_context: s.contexts.first().cloned().unwrap_or_default(),
                    coarse_tag: s.tag,
                    context_examples: s.contexts,
                };
                (key, word)
            })
            .collect();

        words.sort_by(|(ka, a), (kb, b)| {
            b.importance_score
                .total_cmp(&a.importance_score)
                .then(b.occurrence_count.cmp(&a.occurrence_count))
                .then_with(|| ka.cmp(kb))
        });

        if let Some(max) = self.max_words {
            words.truncate(max);
        }

        tracing::debug!(count = words.len(), "palavras importantes extraídas");
        words.into_iter().map(|(_, w)| w).collect()
    }
}

impl Default for ImportanceScorer {
    fn default() -> Self {
        Self {
            min_frequency: 1,
            max_words: None,
        }
    }
}

fn is_candidate(tag: CoarseTag, lemma_key: &str) -> bool {
    !is_functional_tag(tag)
        && !is_stop_word(lemma_key)
        && lemma_key.graphemes(true).count() >= MIN_LEMMA_CHARS
        && has_letter(lemma_key)
}

/// Multiplicador por categoria gramatical.
pub fn pos_weight(tag: CoarseTag) -> f64 {
    match tag {
        CoarseTag::Propn => 1.5,
        CoarseTag::Noun => 1.3,
        CoarseTag::Adj => 1.1,
        CoarseTag::Verb => 1.0,
        CoarseTag::Adv => 0.8,
        _ => 0.5,
    }
}

/// `peso_pos × frequência + LENGTH_WEIGHT × min(comprimento_médio / 10, 1)`
pub fn importance_score(tag: CoarseTag, frequency: usize, total_length: usize) -> f64 {
    if frequency == 0 {
        return 0.0;
    }
    let mean_length = total_length as f64 / frequency as f64;
    let length_bonus = (mean_length / 10.0).min(1.0);
    let raw = pos_weight(tag) * frequency as f64 + LENGTH_WEIGHT * length_bonus;
    (raw * 10_000.0).round() / 10_000.0
}
