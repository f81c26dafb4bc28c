//! # Corpus de Demonstração em Francês
//!
//! Sentenças anotadas manualmente no formato que o anotador externo produz
//! (forma, lema, tag UPOS, traços morfológicos UD). Usadas pela interface
//! web e pelos testes de ponta a ponta.
//!
//! ## Domínios Cobertos
//! - Ciência
//! - História

use crate::token::{AnnotatedToken, CoarseTag, Document, Sentence};

/// Uma sentença anotada.
pub struct AnnotatedSentence {
    /// Texto bruto da sentença.
    pub text: &'static str,
    /// Domínio temático; sentenças do mesmo domínio formam um documento.
    pub domain: &'static str,
    /// Quádruplas (forma, lema, tag UPOS, traços).
    /// Exemplo: `("est", "être", "AUX", "Mood=Ind|Tense=Pres")`
    pub annotations: &'static [(&'static str, &'static str, &'static str, &'static str)],
}

/// Retorna o corpus completo.
pub fn get_corpus() -> Vec<AnnotatedSentence> {
    vec![
        // ===== SCIENCE =====
        AnnotatedSentence {
            text: "L'intelligence artificielle transforme la recherche scientifique.",
            domain: "Science",
            annotations: &[
                ("L'", "le", "DET", "Definite=Def|Number=Sing|PronType=Art"),
                ("intelligence", "intelligence", "NOUN", "Gender=Fem|Number=Sing"),
                ("artificielle", "artificiel", "ADJ", "Gender=Fem|Number=Sing"),
                ("transforme", "transformer", "VERB", "Mood=Ind|Number=Sing|Person=3|Tense=Pres|VerbForm=Fin"),
                ("la", "le", "DET", "Definite=Def|Gender=Fem|Number=Sing|PronType=Art"),
                ("recherche", "recherche", "NOUN", "Gender=Fem|Number=Sing"),
                ("scientifique", "scientifique", "ADJ", "Number=Sing"),
                (".", ".", "PUNCT", ""),
            ],
        },
        AnnotatedSentence {
            text: "Les chercheurs du laboratoire ont publié une nouvelle étude importante.",
            domain: "Science",
            annotations: &[
                ("Les", "le", "DET", "Definite=Def|Number=Plur|PronType=Art"),
                ("chercheurs", "chercheur", "NOUN", "Gender=Masc|Number=Plur"),
                ("du", "de", "ADP", ""),
                ("laboratoire", "laboratoire", "NOUN", "Gender=Masc|Number=Sing"),
                ("ont", "avoir", "AUX", "Mood=Ind|Number=Plur|Person=3|Tense=Pres|VerbForm=Fin"),
                ("publié", "publier", "VERB", "Gender=Masc|Number=Sing|Tense=Past|VerbForm=Part"),
                ("une", "un", "DET", "Definite=Ind|Gender=Fem|Number=Sing|PronType=Art"),
                ("nouvelle", "nouveau", "ADJ", "Gender=Fem|Number=Sing"),
                ("étude", "étude", "NOUN", "Gender=Fem|Number=Sing"),
                ("importante", "important", "ADJ", "Gender=Fem|Number=Sing"),
                (".", ".", "PUNCT", ""),
            ],
        },
        AnnotatedSentence {
            text: "Demain, l'équipe présentera ses résultats aux étudiants.",
            domain: "Science",
            annotations: &[
                ("Demain", "demain", "ADV", ""),
                (",", ",", "PUNCT", ""),
                ("l'", "le", "DET", "Definite=Def|Number=Sing|PronType=Art"),
                ("équipe", "équipe", "NOUN", "Gender=Fem|Number=Sing"),
                ("présentera", "présenter", "VERB", "Mood=Ind|Number=Sing|Person=3|Tense=Fut|VerbForm=Fin"),
                ("ses", "son", "DET", "Number=Plur|Poss=Yes|PronType=Prs"),
                ("résultats", "résultat", "NOUN", "Gender=Masc|Number=Plur"),
                ("aux", "à", "ADP", ""),
                ("étudiants", "étudiant", "NOUN", "Gender=Masc|Number=Plur"),
                (".", ".", "PUNCT", ""),
            ],
        },
        AnnotatedSentence {
            text: "Il faudrait que la recherche soit ouverte à tous.",
            domain: "Science",
            annotations: &[
                ("Il", "il", "PRON", "Gender=Masc|Number=Sing|Person=3|PronType=Prs"),
                ("faudrait", "falloir", "VERB", "Mood=Cnd|Number=Sing|Person=3|Tense=Pres|VerbForm=Fin"),
                ("que", "que", "SCONJ", ""),
                ("la", "le", "DET", "Definite=Def|Gender=Fem|Number=Sing|PronType=Art"),
                ("recherche", "recherche", "NOUN", "Gender=Fem|Number=Sing"),
                ("soit", "être", "AUX", "Mood=Sub|Number=Sing|Person=3|Tense=Pres|VerbForm=Fin"),
                ("ouverte", "ouvrir", "VERB", "Gender=Fem|Number=Sing|Tense=Past|VerbForm=Part|Voice=Pass"),
                ("à", "à", "ADP", ""),
                ("tous", "tout", "PRON", "Gender=Masc|Number=Plur"),
                (".", ".", "PUNCT", ""),
            ],
        },
        // ===== HISTOIRE =====
        AnnotatedSentence {
            text: "Napoléon quitta l'île d'Elbe en 1815.",
            domain: "Histoire",
            annotations: &[
                ("Napoléon", "Napoléon", "PROPN", ""),
                ("quitta", "quitter", "VERB", "Mood=Ind|Number=Sing|Person=3|Tense=Past|VerbForm=Fin"),
                ("l'", "le", "DET", "Definite=Def|Number=Sing|PronType=Art"),
                ("île", "île", "NOUN", "Gender=Fem|Number=Sing"),
                ("d'", "de", "ADP", ""),
                ("Elbe", "Elbe", "PROPN", ""),
                ("en", "en", "ADP", ""),
                ("1815", "1815", "NUM", ""),
                (".", ".", "PUNCT", ""),
            ],
        },
        AnnotatedSentence {
            text: "Les soldats marchaient vers la capitale française.",
            domain: "Histoire",
            annotations: &[
                ("Les", "le", "DET", "Definite=Def|Number=Plur|PronType=Art"),
                ("soldats", "soldat", "NOUN", "Gender=Masc|Number=Plur"),
                ("marchaient", "marcher", "VERB", "Mood=Ind|Number=Plur|Person=3|Tense=Imp|VerbForm=Fin"),
                ("vers", "vers", "ADP", ""),
                ("la", "le", "DET", "Definite=Def|Gender=Fem|Number=Sing|PronType=Art"),
                ("capitale", "capitale", "NOUN", "Gender=Fem|Number=Sing"),
                ("française", "français", "ADJ", "Gender=Fem|Number=Sing"),
                (".", ".", "PUNCT", ""),
            ],
        },
        AnnotatedSentence {
            text: "Le palais de la ville fut construit rapidement.",
            domain: "Histoire",
            annotations: &[
                ("Le", "le", "DET", "Definite=Def|Gender=Masc|Number=Sing|PronType=Art"),
                ("palais", "palais", "NOUN", "Gender=Masc|Number=Sing"),
                ("de", "de", "ADP", ""),
                ("la", "le", "DET", "Definite=Def|Gender=Fem|Number=Sing|PronType=Art"),
                ("ville", "ville", "NOUN", "Gender=Fem|Number=Sing"),
                ("fut", "être", "AUX", "Mood=Ind|Number=Sing|Person=3|Tense=Past|VerbForm=Fin"),
                ("construit", "construire", "VERB", "Gender=Masc|Number=Sing|Tense=Past|VerbForm=Part|Voice=Pass"),
                ("rapidement", "rapidement", "ADV", ""),
                (".", ".", "PUNCT", ""),
            ],
        },
        AnnotatedSentence {
            text: "Écoutez la voix du peuple !",
            domain: "Histoire",
            annotations: &[
                ("Écoutez", "écouter", "VERB", "Mood=Imp|Number=Plur|Person=2|VerbForm=Fin"),
                ("la", "le", "DET", "Definite=Def|Gender=Fem|Number=Sing|PronType=Art"),
                ("voix", "voix", "NOUN", "Gender=Fem|Number=Sing"),
                ("du", "de", "ADP", ""),
                ("peuple", "peuple", "NOUN", "Gender=Masc|Number=Sing"),
                ("!", "!", "PUNCT", ""),
            ],
        },
    ]
}

/// Converte uma sentença anotada em [`Sentence`], calculando os `char_offset`
/// a partir de `base_offset` (posição da sentença no documento).
pub fn to_sentence(annotated: &AnnotatedSentence, index: usize, base_offset: usize) -> Sentence {
    let mut cursor = 0;
    let tokens = annotated
        .annotations
        .iter()
        .map(|(form, lemma, tag, feats)| {
            // Procura a forma a partir do cursor; se não achar, mantém o cursor
            let byte_pos = annotated.text[cursor..]
                .find(*form)
                .map(|p| cursor + p)
                .unwrap_or(cursor);
            let char_offset = base_offset + annotated.text[..byte_pos].chars().count();
            cursor = (byte_pos + form.len()).min(annotated.text.len());

            let coarse = CoarseTag::from_label(tag).unwrap_or(CoarseTag::X);
            AnnotatedToken::new(*form, *lemma, coarse)
                .with_features(feats)
                .with_offset(char_offset)
        })
        .collect();
    Sentence::new(index, annotated.text, tokens)
}

/// Documentos de demonstração: um por domínio, na ordem do corpus.
pub fn demo_documents() -> Vec<Document> {
    let mut documents: Vec<Document> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();

    for annotated in get_corpus() {
        let position = documents
            .iter()
            .position(|d| d.id.as_deref() == Some(annotated.domain));
        let doc_idx = match position {
            Some(i) => i,
            None => {
                documents.push(Document::default().with_id(annotated.domain));
                offsets.push(0);
                documents.len() - 1
            }
        };

        let index = documents[doc_idx].sentences.len();
        let sentence = to_sentence(&annotated, index, offsets[doc_idx]);
        offsets[doc_idx] += annotated.text.chars().count() + 1;
        documents[doc_idx].sentences.push(sentence);
    }

    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrase::PatternId;
    use crate::pipeline::ExtractionPipeline;
    use crate::tense::TenseLabel;

    #[test]
    fn test_corpus_tags_are_valid() {
        for sentence in get_corpus() {
            for (form, _, tag, _) in sentence.annotations {
                assert!(
                    CoarseTag::from_label(tag).is_some(),
                    "tag inválida {} para {:?}",
                    tag,
                    form
                );
                assert!(sentence.text.contains(*form), "{:?} fora de {:?}", form, sentence.text);
            }
        }
    }

    #[test]
    fn test_offsets_point_at_tokens() {
        let docs = demo_documents();
        assert_eq!(docs.len(), 2);
        let second = &docs[0].sentences[1];
        assert_eq!(second.tokens[0].char_offset, docs[0].sentences[0].text.chars().count() + 1);

        let first = &docs[0].sentences[0];
        let idx = first.tokens.iter().position(|t| t.text == "transforme").unwrap();
        assert_eq!(first.tokens[idx].char_offset, "L'intelligence artificielle ".chars().count());
    }

    #[test]
    fn test_demo_documents_are_fully_classified() {
        let pipeline = ExtractionPipeline::new();
        for doc in demo_documents() {
            let analysis = pipeline.analyze(&doc);
            assert!(!analysis.verbs.is_empty());
            assert!(analysis.warnings.is_empty());
            assert!(analysis
                .verbs
                .iter()
                .all(|v| v.tense_label != TenseLabel::Unclassified));
        }
    }

    #[test]
    fn test_history_document_labels() {
        let docs = demo_documents();
        let analysis = ExtractionPipeline::new().analyze(&docs[1]);

        let labels: Vec<_> = analysis.verbs.iter().map(|v| v.tense_label).collect();
        assert_eq!(
            labels,
            vec![
                TenseLabel::IndicatifPasseSimple,
                TenseLabel::IndicatifImparfait,
                TenseLabel::IndicatifPasseSimple,
                TenseLabel::ParticipePasse,
                TenseLabel::Imperatif,
            ]
        );
        assert!(analysis
            .noun_phrases
            .iter()
            .any(|p| p.pattern_id == PatternId::Compound && p.matched_span_text == "Le palais de la ville"));
    }
}
