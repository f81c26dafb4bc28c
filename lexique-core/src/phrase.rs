//! # Extrator de Sintagmas Nominais
//!
//! Procura, em cada sentença, sequências fixas de tags gramaticais e decompõe
//! cada trecho encontrado em componentes com papel sintático.
//!
//! ## Padrões (em ordem de prioridade)
//!
//! | #  | Sequência                  | Exemplo                          |
//! |----|----------------------------|----------------------------------|
//! | 1  | DET NOUN ADP DET NOUN      | le livre de la bibliothèque      |
//! | 2  | DET ADJ NOUN ADJ           | la petite maison blanche         |
//! | 3  | DET ADJ NOUN               | un grand projet                  |
//! | 4  | DET NOUN ADJ               | une voiture rouge                |
//! | 5  | DET NOUN                   | le chat                          |
//!
//! A tabela [`PATTERNS`] é a única fonte de verdade: um único algoritmo
//! genérico a percorre. Para adicionar um padrão basta incluir uma linha.
//!
//! ## Política de Casamento
//!
//! Varredura da esquerda para a direita. Em cada posição os padrões são
//! tentados na ordem da tabela; o primeiro que casar é aceito e a varredura
//! pula o trecho inteiro (sem sobreposição). Posições que não iniciam
//! nenhum padrão avançam um token.
//!
//! `PROPN` nunca ocupa uma posição NOUN.

use serde::{Deserialize, Serialize};

use crate::token::{CoarseTag, Sentence};

/// Identificador dos padrões fixos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternId {
    /// DET NOUN ADP DET NOUN
    Compound,
    /// DET ADJ NOUN ADJ
    EpithetAttribute,
    /// DET ADJ NOUN
    Epithet,
    /// DET NOUN ADJ
    Attribute,
    /// DET NOUN
    Simple,
}

impl PatternId {
    /// Posição do padrão na tabela de prioridade (1 = mais específico).
    pub fn priority(&self) -> usize {
        match self {
            PatternId::Compound => 1,
            PatternId::EpithetAttribute => 2,
            PatternId::Epithet => 3,
            PatternId::Attribute => 4,
            PatternId::Simple => 5,
        }
    }
}

/// Papel de um componente dentro do sintagma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Determiner,
    /// Adjetivo antes do núcleo.
    EpithetAdjective,
    Head,
    /// Adjetivo depois do núcleo.
    AttributeAdjective,
    Preposition,
}

/// Descritor declarativo: sequência de (tag exigida, papel).
#[derive(Debug, Clone, Copy)]
pub struct PatternDescriptor {
    pub id: PatternId,
    pub slots: &'static [(CoarseTag, Role)],
}

impl PatternDescriptor {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sequência de tags (ex: "DET ADJ NOUN").
    pub fn signature(&self) -> String {
        self.slots
            .iter()
            .map(|(tag, _)| tag.label())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// O padrão casa a partir de `start`?
    fn matches_at(&self, sentence: &Sentence, start: usize) -> bool {
        let Some(window) = sentence.tokens.get(start..start + self.slots.len()) else {
            return false;
        };
        window
            .iter()
            .zip(self.slots)
            .all(|(token, (tag, _))| token.has_tag(*tag))
    }
}

/// Tabela de padrões em ordem de prioridade.
pub const PATTERNS: &[PatternDescriptor] = &[
    PatternDescriptor {
        id: PatternId::Compound,
        slots: &[
            (CoarseTag::Det, Role::Determiner),
            (CoarseTag::Noun, Role::Head),
            (CoarseTag::Adp, Role::Preposition),
            (CoarseTag::Det, Role::Determiner),
            (CoarseTag::Noun, Role::Head),
        ],
    },
    PatternDescriptor {
        id: PatternId::EpithetAttribute,
        slots: &[
            (CoarseTag::Det, Role::Determiner),
            (CoarseTag::Adj, Role::EpithetAdjective),
            (CoarseTag::Noun, Role::Head),
            (CoarseTag::Adj, Role::AttributeAdjective),
        ],
    },
    PatternDescriptor {
        id: PatternId::Epithet,
        slots: &[
            (CoarseTag::Det, Role::Determiner),
            (CoarseTag::Adj, Role::EpithetAdjective),
            (CoarseTag::Noun, Role::Head),
        ],
    },
    PatternDescriptor {
        id: PatternId::Attribute,
        slots: &[
            (CoarseTag::Det, Role::Determiner),
            (CoarseTag::Noun, Role::Head),
            (CoarseTag::Adj, Role::AttributeAdjective),
        ],
    },
    PatternDescriptor {
        id: PatternId::Simple,
        slots: &[
            (CoarseTag::Det, Role::Determiner),
            (CoarseTag::Noun, Role::Head),
        ],
    },
];

/// Um componente do sintagma encontrado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseComponent {
    pub role: Role,
    pub text: String,
    pub lemma: String,
}

/// Um sintagma nominal encontrado em uma sentença.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NounPhraseMatch {
    pub pattern_id: PatternId,
    /// Textos dos tokens unidos por espaço.
    pub matched_span_text: String,
    pub components: Vec<PhraseComponent>,
    /// Texto bruto da sentença.
    pub sentence_context: String,
    /// `char_offset` do primeiro token.
    pub start_offset: usize,
    pub sentence_index: usize,
    /// Índice do primeiro token na sentença.
    pub start_token: usize,
    /// Índice após o último token (exclusivo).
    pub end_token: usize,
}

/// Extrator genérico guiado pela tabela de padrões.
#[derive(Debug, Clone)]
pub struct NounPhraseMatcher {
    patterns: &'static [PatternDescriptor],
}

impl NounPhraseMatcher {
    pub fn new() -> Self {
        Self { patterns: PATTERNS }
    }

    pub fn patterns(&self) -> &'static [PatternDescriptor] {
        self.patterns
    }

    /// Extrai os sintagmas da sentença, sem sobreposição, em ordem de início.
    pub fn match_sentence(&self, sentence_index: usize, sentence: &Sentence) -> Vec<NounPhraseMatch> {
        let mut matches = Vec::new();
        let mut i = 0;

        while i < sentence.tokens.len() {
            match self.patterns.iter().find(|p| p.matches_at(sentence, i)) {
                Some(pattern) => {
                    matches.push(build_match(pattern, sentence_index, sentence, i));
                    i += pattern.len().max(1);
                }
                None => i += 1,
            }
        }

        matches
    }
}

impl Default for NounPhraseMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn build_match(
    pattern: &PatternDescriptor,
    sentence_index: usize,
    sentence: &Sentence,
    start: usize,
) -> NounPhraseMatch {
    let end = start + pattern.len();
    let span = &sentence.tokens[start..end];

    let components = span
        .iter()
        .zip(pattern.slots)
        .map(|(token, (_, role))| PhraseComponent {
            role: *role,
            text: token.text.clone(),
            lemma: token.lemma.clone(),
        })
        .collect();

    NounPhraseMatch {
        pattern_id: pattern.id,
        matched_span_text: span
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        components,
        sentence_context: sentence.text.clone(),
        start_offset: span[0].char_offset,
        sentence_index,
        start_token: start,
        end_token: end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::AnnotatedToken;

    fn sentence(words: &[(&str, CoarseTag)]) -> Sentence {
        let mut offset = 0;
        let tokens = words
            .iter()
            .map(|(w, tag)| {
                let token = AnnotatedToken::new(*w, w.to_lowercase(), *tag).with_offset(offset);
                offset += w.chars().count() + 1;
                token
            })
            .collect::<Vec<_>>();
        let text = words.iter().map(|(w, _)| *w).collect::<Vec<_>>().join(" ");
        Sentence::new(0, text, tokens)
    }

    fn roles(m: &NounPhraseMatch) -> Vec<Role> {
        m.components.iter().map(|c| c.role).collect()
    }

    #[test]
    fn test_compound_pattern() {
        let s = sentence(&[
            ("le", CoarseTag::Det),
            ("chat", CoarseTag::Noun),
            ("de", CoarseTag::Adp),
            ("la", CoarseTag::Det),
            ("maison", CoarseTag::Noun),
        ]);
        let matches = NounPhraseMatcher::new().match_sentence(0, &s);

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.pattern_id, PatternId::Compound);
        assert_eq!(m.matched_span_text, "le chat de la maison");
        assert_eq!(
            roles(m),
            vec![Role::Determiner, Role::Head, Role::Preposition, Role::Determiner, Role::Head]
        );
        let texts: Vec<_> = m.components.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["le", "chat", "de", "la", "maison"]);
    }

    #[test]
    fn test_longest_pattern_wins() {
        let s = sentence(&[
            ("la", CoarseTag::Det),
            ("petite", CoarseTag::Adj),
            ("maison", CoarseTag::Noun),
            ("blanche", CoarseTag::Adj),
        ]);
        let matches = NounPhraseMatcher::new().match_sentence(0, &s);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pattern_id, PatternId::EpithetAttribute);
        assert_eq!(
            roles(&matches[0]),
            vec![Role::Determiner, Role::EpithetAdjective, Role::Head, Role::AttributeAdjective]
        );
    }

    #[test]
    fn test_epithet_and_attribute() {
        let s = sentence(&[
            ("un", CoarseTag::Det),
            ("grand", CoarseTag::Adj),
            ("projet", CoarseTag::Noun),
            ("voit", CoarseTag::Verb),
            ("une", CoarseTag::Det),
            ("voiture", CoarseTag::Noun),
            ("rouge", CoarseTag::Adj),
        ]);
        let matches = NounPhraseMatcher::new().match_sentence(0, &s);
        let ids: Vec<_> = matches.iter().map(|m| m.pattern_id).collect();
        assert_eq!(ids, vec![PatternId::Epithet, PatternId::Attribute]);
        assert_eq!(matches[1].start_token, 4);
        assert_eq!(matches[1].start_offset, "un grand projet voit ".chars().count());
    }

    #[test]
    fn test_adjacent_simple_matches_are_both_reported() {
        let s = sentence(&[
            ("le", CoarseTag::Det),
            ("chat", CoarseTag::Noun),
            ("le", CoarseTag::Det),
            ("chien", CoarseTag::Noun),
        ]);
        let matches = NounPhraseMatcher::new().match_sentence(0, &s);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.pattern_id == PatternId::Simple));
        assert_eq!(matches[0].end_token, matches[1].start_token);
    }

    #[test]
    fn test_proper_noun_is_not_a_head() {
        let s = sentence(&[("la", CoarseTag::Det), ("France", CoarseTag::Propn)]);
        assert!(NounPhraseMatcher::new().match_sentence(0, &s).is_empty());
    }

    #[test]
    fn test_short_and_empty_sentences() {
        let matcher = NounPhraseMatcher::new();
        assert!(matcher.match_sentence(0, &Sentence::default()).is_empty());
        assert!(matcher.match_sentence(0, &sentence(&[("le", CoarseTag::Det)])).is_empty());
    }

    #[test]
    fn test_consumed_span_is_not_reentered() {
        // "le livre de la table" consome "la table"; não há um segundo DET NOUN
        let s = sentence(&[
            ("le", CoarseTag::Det),
            ("livre", CoarseTag::Noun),
            ("de", CoarseTag::Adp),
            ("la", CoarseTag::Det),
            ("table", CoarseTag::Noun),
            ("rouge", CoarseTag::Adj),
        ]);
        let matches = NounPhraseMatcher::new().match_sentence(0, &s);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].end_token, 5);
    }

    #[test]
    fn test_table_is_consistent() {
        for (i, p) in PATTERNS.iter().enumerate() {
            assert_eq!(p.id.priority(), i + 1);
            assert!(p.len() >= 2);
            assert_eq!(p.slots[0].0, CoarseTag::Det);
        }
        assert_eq!(PATTERNS[0].signature(), "DET NOUN ADP DET NOUN");
    }
}
