//! # Pipeline de Extração — Orquestrador com Eventos Observáveis
//!
//! O pipeline passa um documento anotado pelos três motores (tempos verbais,
//! palavras importantes, sintagmas nominais) e emite eventos em cada passo
//! via um canal Rust (`mpsc`), permitindo que o servidor WebSocket transmita
//! o progresso em tempo real para o cliente.
//!
//! ## Entrada Malformada
//!
//! Sentenças sem tokens e tokens sem tag gramatical são ignorados com um
//! aviso registrado ([`InputWarning`]); o processamento do restante do
//! documento continua. Uma execução que começou sempre termina.

use std::collections::BTreeMap;
use std::sync::mpsc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::phrase::{NounPhraseMatch, NounPhraseMatcher};
use crate::scorer::{ImportanceScorer, ImportantWord, ScorerConfig};
use crate::tense::{classify, TenseLabel, VerbClassification};
use crate::token::{Document, Sentence};

/// Motivo pelo qual uma unidade da entrada foi ignorada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Sentença sem nenhum token.
    EmptySentence,
    /// Token sem `coarse_tag`.
    MissingCoarseTag,
}

/// Aviso registrado para entrada malformada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputWarning {
    pub kind: WarningKind,
    pub sentence_index: usize,
    /// Posição do token na sentença, quando o aviso é sobre um token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_index: Option<usize>,
    pub message: String,
}

/// Contadores de um documento processado.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub sentences: usize,
    pub tokens: usize,
    pub skipped_sentences: usize,
    pub skipped_tokens: usize,
}

/// Resultado completo de um documento.
///
/// Não contém tempos de execução: processar o mesmo documento duas vezes
/// produz exatamente a mesma serialização.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Em ordem de documento.
    pub verbs: Vec<VerbClassification>,
    /// Em ordem de pontuação.
    pub important_words: Vec<ImportantWord>,
    /// Em ordem de documento.
    pub noun_phrases: Vec<NounPhraseMatch>,
    /// Quantidade de verbos por rótulo de tempo.
    pub tense_counts: BTreeMap<TenseLabel, usize>,
    pub warnings: Vec<InputWarning>,
    pub stats: AnalysisStats,
}

impl DocumentAnalysis {
    fn empty(document_id: Option<String>) -> Self {
        Self {
            document_id,
            verbs: vec![],
            important_words: vec![],
            noun_phrases: vec![],
            tense_counts: BTreeMap::new(),
            warnings: vec![],
            stats: AnalysisStats::default(),
        }
    }
}

/// Conta as classificações por rótulo de tempo.
pub fn tally_tenses(verbs: &[VerbClassification]) -> BTreeMap<TenseLabel, usize> {
    let mut counts = BTreeMap::new();
    for verb in verbs {
        *counts.entry(verb.tense_label).or_insert(0) += 1;
    }
    counts
}

/// Eventos emitidos pelo pipeline durante o processamento.
///
/// Permitem que a UI acompanhe o trabalho sentença por sentença.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: documento recebido.
    InputValidated {
        sentences: usize,
        tokens: usize,
    },
    /// Sentença ignorada (entrada malformada).
    SentenceSkipped {
        warning: InputWarning,
    },
    /// Token ignorado (entrada malformada).
    TokenSkipped {
        warning: InputWarning,
    },
    /// **Passo 2**: um verbo ou auxiliar foi classificado.
    VerbClassified {
        verb: VerbClassification,
    },
    /// **Passo 3**: um sintagma nominal foi encontrado.
    NounPhraseMatched {
        phrase: NounPhraseMatch,
    },
    /// **Passo 4**: palavras importantes ordenadas.
    ImportantWordsRanked {
        words: Vec<ImportantWord>,
    },
    /// **Conclusão**: resultado consolidado.
    Done {
        analysis: DocumentAnalysis,
        processing_ms: u64,
    },
}

/// O orquestrador de extração.
///
/// Não guarda estado mutável: a mesma instância pode processar vários
/// documentos em paralelo.
///
/// # Modos de Uso
/// - **Sync**: [`ExtractionPipeline::analyze`] para chamadas diretas.
/// - **Streaming**: [`ExtractionPipeline::analyze_streaming`] para UIs reativas (via WebSocket).
/// - **Lote**: [`ExtractionPipeline::analyze_batch`] processa documentos independentes com rayon.
#[derive(Debug, Clone, Default)]
pub struct ExtractionPipeline {
    pub scorer: ImportanceScorer,
    pub matcher: NounPhraseMatcher,
}

impl ExtractionPipeline {
    /// Pipeline com os parâmetros padrão do avaliador.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline com parâmetros do avaliador. Falha antes de qualquer processamento
    /// se forem inválidos.
    pub fn with_config(config: ScorerConfig) -> Result<Self> {
        Ok(Self {
            scorer: ImportanceScorer::new(config)?,
            matcher: NounPhraseMatcher::new(),
        })
    }

    /// Processa o documento de forma síncrona e retorna o resultado final.
    pub fn analyze(&self, document: &Document) -> DocumentAnalysis {
        let (tx, rx) = mpsc::channel();
        self.analyze_streaming(document, tx);

        let mut result = DocumentAnalysis::empty(document.id.clone());
        // Consome todos os eventos até o fim
        while let Ok(event) = rx.recv() {
            if let PipelineEvent::Done { analysis, .. } = event {
                result = analysis;
            }
        }
        result
    }

    /// Processa vários documentos independentes em paralelo.
    ///
    /// A ordem da saída é a ordem da entrada.
    pub fn analyze_batch(&self, documents: &[Document]) -> Vec<DocumentAnalysis> {
        documents.par_iter().map(|doc| self.analyze(doc)).collect()
    }

    /// Executa o pipeline enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `InputValidated`
    /// 2. `SentenceSkipped` / `TokenSkipped` (entrada malformada)
    /// 3. `VerbClassified` e `NounPhraseMatched` (sentença por sentença)
    /// 4. `ImportantWordsRanked`
    /// 5. `Done`
    ///
    /// Se o receptor for descartado, o processamento continua normalmente.
    pub fn analyze_streaming(&self, document: &Document, tx: mpsc::Sender<PipelineEvent>) {
        let start = std::time::Instant::now();
        let mut analysis = DocumentAnalysis::empty(document.id.clone());
        analysis.stats.sentences = document.sentences.len();
        analysis.stats.tokens = document.token_count();

        let _ = tx.send(PipelineEvent::InputValidated {
            sentences: analysis.stats.sentences,
            tokens: analysis.stats.tokens,
        });

        // === Passo 1: Validação, verbos e sintagmas, sentença por sentença ===
        for (sentence_index, sentence) in document.sentences.iter().enumerate() {
            if sentence.is_empty() {
                let warning = InputWarning {
                    kind: WarningKind::EmptySentence,
                    sentence_index,
                    token_index: None,
                    message: format!("sentence {} has no tokens", sentence_index),
                };
                tracing::warn!(sentence_index, "sentença sem tokens ignorada");
                analysis.stats.skipped_sentences += 1;
                analysis.warnings.push(warning.clone());
                let _ = tx.send(PipelineEvent::SentenceSkipped { warning });
                continue;
            }

            self.process_sentence(sentence_index, sentence, &mut analysis, &tx);
        }

        // === Passo 2: Saco de palavras sobre o documento inteiro ===
        analysis.important_words = self.scorer.score(document);
        let _ = tx.send(PipelineEvent::ImportantWordsRanked {
            words: analysis.important_words.clone(),
        });

        // === Passo 3: Resumo ===
        analysis.tense_counts = tally_tenses(&analysis.verbs);

        tracing::info!(
            document_id = ?document.id,
            verbs = analysis.verbs.len(),
            important_words = analysis.important_words.len(),
            noun_phrases = analysis.noun_phrases.len(),
            warnings = analysis.warnings.len(),
            "documento processado"
        );

        let _ = tx.send(PipelineEvent::Done {
            analysis,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }

    fn process_sentence(
        &self,
        sentence_index: usize,
        sentence: &Sentence,
        analysis: &mut DocumentAnalysis,
        tx: &mpsc::Sender<PipelineEvent>,
    ) {
        for (position, token) in sentence.tokens.iter().enumerate() {
            let Some(tag) = token.coarse_tag else {
                let warning = InputWarning {
                    kind: WarningKind::MissingCoarseTag,
                    sentence_index,
                    token_index: Some(position),
                    message: format!("token {:?} has no coarse tag", token.text),
                };
                tracing::warn!(sentence_index, position, token = %token.text, "token sem tag ignorado");
                analysis.stats.skipped_tokens += 1;
                analysis.warnings.push(warning.clone());
                let _ = tx.send(PipelineEvent::TokenSkipped { warning });
                continue;
            };

            if !tag.is_verbal() {
                continue;
            }
            if let Some(verb) = classify(sentence, sentence_index, position) {
                let _ = tx.send(PipelineEvent::VerbClassified { verb: verb.clone() });
                analysis.verbs.push(verb);
            }
        }

        for phrase in self.matcher.match_sentence(sentence_index, sentence) {
            let _ = tx.send(PipelineEvent::NounPhraseMatched {
                phrase: phrase.clone(),
            });
            analysis.noun_phrases.push(phrase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{AnnotatedToken, CoarseTag};

    fn scenario_document() -> Document {
        Document::new(vec![
            Sentence::new(
                0,
                "L'intelligence est aujourd'hui partout.",
                vec![
                    AnnotatedToken::new("L'", "le", CoarseTag::Det),
                    AnnotatedToken::new("intelligence", "intelligence", CoarseTag::Noun),
                    AnnotatedToken::new("est", "être", CoarseTag::Aux)
                        .with_features("Mood=Ind|Number=Sing|Person=3|Tense=Pres|VerbForm=Fin"),
                    AnnotatedToken::new("aujourd'hui", "aujourd'hui", CoarseTag::Adv),
                ],
            ),
            Sentence::new(1, "", vec![]),
            Sentence::new(
                2,
                "Le chat de la maison aurait mangé.",
                vec![
                    AnnotatedToken::new("Le", "le", CoarseTag::Det),
                    AnnotatedToken::new("chat", "chat", CoarseTag::Noun),
                    AnnotatedToken::new("de", "de", CoarseTag::Adp),
                    AnnotatedToken::new("la", "le", CoarseTag::Det),
                    AnnotatedToken::new("maison", "maison", CoarseTag::Noun),
                    AnnotatedToken::new("aurait", "avoir", CoarseTag::Aux).with_features("Mood=Cnd"),
                    AnnotatedToken::new("mangé", "manger", CoarseTag::Verb)
                        .with_features("Gender=Masc|Number=Sing|Tense=Past|VerbForm=Part"),
                ],
            ),
        ])
    }

    #[test]
    fn test_pipeline_basic() {
        let analysis = ExtractionPipeline::new().analyze(&scenario_document());

        let labels: Vec<_> = analysis.verbs.iter().map(|v| v.tense_label).collect();
        assert_eq!(
            labels,
            vec![
                TenseLabel::IndicatifPresent,
                TenseLabel::Conditionnel,
                TenseLabel::ParticipePasse
            ]
        );
        assert_eq!(analysis.noun_phrases.len(), 2);
        assert_eq!(analysis.tense_counts.get(&TenseLabel::Conditionnel), Some(&1));
        assert_eq!(analysis.tense_counts.values().sum::<usize>(), analysis.verbs.len());
        assert!(analysis.important_words.iter().any(|w| w.lemma == "intelligence"));
        assert_eq!(analysis.stats.skipped_sentences, 1);
        assert_eq!(analysis.warnings[0].kind, WarningKind::EmptySentence);
    }

    #[test]
    fn test_pipeline_empty() {
        let analysis = ExtractionPipeline::new().analyze(&Document::default());
        assert!(analysis.verbs.is_empty());
        assert!(analysis.important_words.is_empty());
        assert!(analysis.noun_phrases.is_empty());
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_token_without_tag_is_skipped() {
        let mut broken = AnnotatedToken::new("???", "???", CoarseTag::X);
        broken.coarse_tag = None;
        let doc = Document::new(vec![Sentence::new(
            0,
            "le ??? chat dort",
            vec![
                AnnotatedToken::new("le", "le", CoarseTag::Det),
                broken,
                AnnotatedToken::new("chat", "chat", CoarseTag::Noun),
                AnnotatedToken::new("dort", "dormir", CoarseTag::Verb)
                    .with_features("Mood=Ind|Tense=Pres"),
            ],
        )]);
        let analysis = ExtractionPipeline::new().analyze(&doc);

        assert_eq!(analysis.stats.skipped_tokens, 1);
        assert_eq!(analysis.warnings[0].token_index, Some(1));
        assert_eq!(analysis.verbs.len(), 1);
        // O token quebrado interrompe "le chat"
        assert!(analysis.noun_phrases.is_empty());
    }

    #[test]
    fn test_positions_come_from_document_order() {
        // JSON sem sentence_index / token_index nos tokens
        let json = r#"{
            "sentences": [
                { "text": "Il dort.", "tokens": [
                    { "text": "Il", "lemma": "il", "coarse_tag": "PRON" },
                    { "text": "dort", "lemma": "dormir", "coarse_tag": "VERB",
                      "morph_features": "Mood=Ind|Tense=Pres|VerbForm=Fin" }
                ]},
                { "text": "Le chien mange.", "tokens": [
                    { "text": "Le", "lemma": "le", "coarse_tag": "DET" },
                    { "text": "chien", "lemma": "chien", "coarse_tag": "NOUN" },
                    { "text": "mange", "lemma": "manger", "coarse_tag": "VERB",
                      "morph_features": "Mood=Ind|Tense=Pres|VerbForm=Fin" },
                    { "text": "???", "lemma": "???" }
                ]}
            ]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        let analysis = ExtractionPipeline::new().analyze(&doc);

        let mange = &analysis.verbs[1];
        assert_eq!(mange.surface_text, "mange");
        assert_eq!((mange.sentence_index, mange.token_index), (1, 2));
        assert_eq!((analysis.verbs[0].sentence_index, analysis.verbs[0].token_index), (0, 1));

        let phrase = &analysis.noun_phrases[0];
        assert_eq!(phrase.matched_span_text, "Le chien");
        assert_eq!(phrase.sentence_index, 1);

        // Avisos e classificações usam as mesmas coordenadas
        assert_eq!(analysis.warnings[0].sentence_index, 1);
        assert_eq!(analysis.warnings[0].token_index, Some(3));
    }

    #[test]
    fn test_invalid_config_fails_before_processing() {
        assert!(ExtractionPipeline::with_config(ScorerConfig::new(-3, None)).is_err());
        assert!(ExtractionPipeline::with_config(ScorerConfig::new(1, Some(0))).is_err());
    }

    #[test]
    fn test_idempotent_serialization() {
        let pipeline = ExtractionPipeline::new();
        let doc = scenario_document();
        let first = serde_json::to_string(&pipeline.analyze(&doc)).unwrap();
        let second = serde_json::to_string(&pipeline.analyze(&doc)).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"Indicatif Présent\":1"));
    }

    #[test]
    fn test_batch_preserves_order() {
        let pipeline = ExtractionPipeline::new();
        let docs = vec![
            scenario_document().with_id("a"),
            Document::default().with_id("b"),
            scenario_document().with_id("c"),
        ];
        let results = pipeline.analyze_batch(&docs);
        let ids: Vec<_> = results.iter().map(|r| r.document_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("a"), Some("b"), Some("c")]);
        assert_eq!(results[0].verbs, results[2].verbs);
        assert_eq!(results[0].important_words, results[2].important_words);
    }

    #[test]
    fn test_pipeline_events_streaming() {
        let pipeline = ExtractionPipeline::new();
        let (tx, rx) = mpsc::channel();
        pipeline.analyze_streaming(&scenario_document(), tx);

        let events: Vec<PipelineEvent> = rx.try_iter().collect();
        assert!(
            matches!(&events[0], PipelineEvent::InputValidated { sentences: 3, .. }),
            "Primeiro evento deve ser InputValidated"
        );
        assert!(
            matches!(events.last().unwrap(), PipelineEvent::Done { .. }),
            "Último evento deve ser Done"
        );
        let verbs = events
            .iter()
            .filter(|e| matches!(e, PipelineEvent::VerbClassified { .. }))
            .count();
        assert_eq!(verbs, 3);
        assert!(events.iter().any(|e| matches!(e, PipelineEvent::SentenceSkipped { .. })));
    }
}
