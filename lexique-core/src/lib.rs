//! # lexique-core — Extração Morfológica e Lexical para o Francês
//!
//! Este crate transforma a saída de um anotador linguístico externo (tokens
//! com lema, tag gramatical e traços morfológicos, agrupados em sentenças)
//! em três resultados estruturados:
//!
//! 1.  **Verbos** ([`tense`]): tempo, modo, pessoa, número e voz de cada verbo/auxiliar.
//! 2.  **Palavras importantes** ([`scorer`]): saco de palavras sem redundância, com pontuação.
//! 3.  **Sintagmas nominais** ([`phrase`]): padrões fixos de tags (ex: DET ADJ NOUN).
//!
//! Tokenização, lematização e etiquetagem **não** são feitas aqui: o sistema
//! confia nas anotações recebidas e é um conjunto fixo de regras determinísticas.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use lexique_core::{AnnotatedToken, CoarseTag, Document, ExtractionPipeline, Sentence, TenseLabel};
//!
//! let sentence = Sentence::new(0, "Le chat dort.", vec![
//!     AnnotatedToken::new("Le", "le", CoarseTag::Det),
//!     AnnotatedToken::new("chat", "chat", CoarseTag::Noun),
//!     AnnotatedToken::new("dort", "dormir", CoarseTag::Verb)
//!         .with_features("Mood=Ind|Number=Sing|Person=3|Tense=Pres|VerbForm=Fin"),
//! ]);
//!
//! let analysis = ExtractionPipeline::new().analyze(&Document::new(vec![sentence]));
//!
//! assert_eq!(analysis.verbs[0].tense_label, TenseLabel::IndicatifPresent);
//! assert_eq!(analysis.noun_phrases[0].matched_span_text, "Le chat");
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Orquestrador que conecta os três motores.
//! - [`token`]: Modelo de dados de entrada.
//! - [`stopwords`]: Listas estáticas de exclusão.
//! - [`corpus`]: Documentos anotados de demonstração.

pub mod corpus;
pub mod error;
pub mod phrase;
pub mod pipeline;
pub mod scorer;
pub mod stopwords;
pub mod tense;
pub mod token;

pub use error::{Error, Result};
pub use phrase::{NounPhraseMatch, NounPhraseMatcher, PatternId, PhraseComponent, Role};
pub use pipeline::{DocumentAnalysis, ExtractionPipeline, InputWarning, PipelineEvent};
pub use scorer::{ImportanceScorer, ImportantWord, ScorerConfig};
pub use tense::{Mood, Number, TenseLabel, VerbClassification, Voice};
pub use token::{AnnotatedToken, CoarseTag, Document, MorphFeatures, Sentence};
