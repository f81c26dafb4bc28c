//! # Modelo de Tokens Anotados
//!
//! Representação normalizada da saída do anotador linguístico externo
//! (tokenização, lematização, POS tagging e morfologia já foram feitos
//! fora deste crate). Os três motores consomem apenas estes tipos.
//!
//! ## Formato de Entrada (JSON)
//!
//! ```json
//! {
//!   "id": "doc-1",
//!   "sentences": [{
//!     "text": "L'intelligence est là.",
//!     "tokens": [
//!       { "text": "est", "lemma": "être", "coarse_tag": "AUX",
//!         "morph_features": "Mood=Ind|Number=Sing|Person=3|Tense=Pres|VerbForm=Fin" }
//!     ]
//!   }]
//! }
//! ```
//!
//! `morph_features` aceita tanto um objeto `{"Mood": "Ind"}` quanto a forma
//! textual do Universal Dependencies (`Mood=Ind|Tense=Pres`).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Categoria gramatical grossa (conjunto UPOS do Universal Dependencies).
///
/// Strings desconhecidas vindas do anotador viram [`CoarseTag::X`]; a ausência
/// da tag é tratada como entrada malformada pelo orquestrador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum CoarseTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Space,
    Sym,
    Verb,
    X,
}

impl CoarseTag {
    /// Nome UPOS da tag (ex: `"NOUN"`).
    pub fn label(&self) -> &'static str {
        match self {
            CoarseTag::Adj => "ADJ",
            CoarseTag::Adp => "ADP",
            CoarseTag::Adv => "ADV",
            CoarseTag::Aux => "AUX",
            CoarseTag::Cconj => "CCONJ",
            CoarseTag::Det => "DET",
            CoarseTag::Intj => "INTJ",
            CoarseTag::Noun => "NOUN",
            CoarseTag::Num => "NUM",
            CoarseTag::Part => "PART",
            CoarseTag::Pron => "PRON",
            CoarseTag::Propn => "PROPN",
            CoarseTag::Punct => "PUNCT",
            CoarseTag::Sconj => "SCONJ",
            CoarseTag::Space => "SPACE",
            CoarseTag::Sym => "SYM",
            CoarseTag::Verb => "VERB",
            CoarseTag::X => "X",
        }
    }

    /// Tenta parsear a partir do nome UPOS (sem diferenciar maiúsculas).
    pub fn from_label(s: &str) -> Option<Self> {
        let tag = match s.trim().to_ascii_uppercase().as_str() {
            "ADJ" => CoarseTag::Adj,
            "ADP" => CoarseTag::Adp,
            "ADV" => CoarseTag::Adv,
            "AUX" => CoarseTag::Aux,
            "CCONJ" => CoarseTag::Cconj,
            "DET" => CoarseTag::Det,
            "INTJ" => CoarseTag::Intj,
            "NOUN" => CoarseTag::Noun,
            "NUM" => CoarseTag::Num,
            "PART" => CoarseTag::Part,
            "PRON" => CoarseTag::Pron,
            "PROPN" => CoarseTag::Propn,
            "PUNCT" => CoarseTag::Punct,
            "SCONJ" => CoarseTag::Sconj,
            "SPACE" => CoarseTag::Space,
            "SYM" => CoarseTag::Sym,
            "VERB" => CoarseTag::Verb,
            "X" => CoarseTag::X,
            _ => return None,
        };
        Some(tag)
    }

    /// Verbos e auxiliares passam pelo resolvedor de tempos.
    pub fn is_verbal(&self) -> bool {
        matches!(self, CoarseTag::Verb | CoarseTag::Aux)
    }
}

impl From<String> for CoarseTag {
    fn from(s: String) -> Self {
        CoarseTag::from_label(&s).unwrap_or(CoarseTag::X)
    }
}

impl fmt::Display for CoarseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Conjunto de traços morfológicos de um token (ex: `Mood=Ind`, `Person=3`).
///
/// Usa `BTreeMap` para que a serialização seja sempre na mesma ordem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFeatures")]
pub struct MorphFeatures(BTreeMap<String, String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFeatures {
    Map(BTreeMap<String, String>),
    Ud(String),
}

impl From<RawFeatures> for MorphFeatures {
    fn from(raw: RawFeatures) -> Self {
        match raw {
            RawFeatures::Map(map) => MorphFeatures(map),
            RawFeatures::Ud(s) => MorphFeatures::parse(&s),
        }
    }
}

impl MorphFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parseia a forma textual `Chave=Valor|Chave=Valor`.
    ///
    /// Pares sem `=` ou com chave vazia são ignorados.
    pub fn parse(s: &str) -> Self {
        let map = s
            .split('|')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, _)| !k.is_empty())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MorphFeatures(map)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromStr for MorphFeatures {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MorphFeatures::parse(s))
    }
}

impl fmt::Display for MorphFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("|");
        f.write_str(&joined)
    }
}

/// Um token já anotado pelo serviço linguístico externo.
///
/// Imutável depois de produzido; o orquestrador apenas o lê.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    /// Forma original (ex: "est", "L'").
    pub text: String,
    /// Forma de dicionário (ex: "être").
    #[serde(default)]
    pub lemma: String,
    /// Tag UPOS. `None` significa token malformado.
    #[serde(default)]
    pub coarse_tag: Option<CoarseTag>,
    /// Tag específica do anotador (ex: "VINF", "VPP").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine_tag: Option<String>,
    #[serde(default)]
    pub morph_features: MorphFeatures,
    /// Relação de dependência (ex: "nsubj", "aux:pass").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dep: Option<String>,
    #[serde(default)]
    pub sentence_index: usize,
    #[serde(default)]
    pub token_index_in_sentence: usize,
    /// Posição de caractere do token no documento original.
    #[serde(default)]
    pub char_offset: usize,
}

impl AnnotatedToken {
    pub fn new(text: impl Into<String>, lemma: impl Into<String>, tag: CoarseTag) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            coarse_tag: Some(tag),
            fine_tag: None,
            morph_features: MorphFeatures::new(),
            dep: None,
            sentence_index: 0,
            token_index_in_sentence: 0,
            char_offset: 0,
        }
    }

    /// Define os traços a partir da forma `Mood=Ind|Tense=Pres`.
    pub fn with_features(mut self, features: &str) -> Self {
        self.morph_features = MorphFeatures::parse(features);
        self
    }

    pub fn with_fine_tag(mut self, fine_tag: impl Into<String>) -> Self {
        self.fine_tag = Some(fine_tag.into());
        self
    }

    pub fn with_dep(mut self, dep: impl Into<String>) -> Self {
        self.dep = Some(dep.into());
        self
    }

    pub fn with_offset(mut self, char_offset: usize) -> Self {
        self.char_offset = char_offset;
        self
    }

    /// Lema em minúsculas, chave de agregação do saco de palavras.
    pub fn lemma_key(&self) -> String {
        self.lemma.to_lowercase()
    }

    pub fn has_tag(&self, tag: CoarseTag) -> bool {
        self.coarse_tag == Some(tag)
    }
}

/// Uma sentença: tokens em ordem + texto bruto (usado nos contextos).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<AnnotatedToken>,
}

impl Sentence {
    /// Monta uma sentença e re-indexa os tokens (`sentence_index`,
    /// `token_index_in_sentence`). Útil para testes e para o corpus de demonstração.
    pub fn new(index: usize, text: impl Into<String>, mut tokens: Vec<AnnotatedToken>) -> Self {
        for (i, token) in tokens.iter_mut().enumerate() {
            token.sentence_index = index;
            token.token_index_in_sentence = i;
        }
        Self {
            text: text.into(),
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Janela de até `window` tokens de cada lado da posição, com o token
    /// central destacado como `**texto**`.
    pub fn context_window(&self, position: usize, window: usize) -> String {
        if position >= self.tokens.len() {
            return String::new();
        }
        let start = position.saturating_sub(window);
        let end = (position + window + 1).min(self.tokens.len());
        highlight(&self.tokens[start..end], position - start)
    }

    /// A sentença inteira com o token da posição destacado.
    pub fn highlighted(&self, position: usize) -> String {
        if position >= self.tokens.len() {
            return String::new();
        }
        highlight(&self.tokens, position)
    }
}

fn highlight(tokens: &[AnnotatedToken], target: usize) -> String {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| {
            if i == target {
                format!("**{}**", t.text)
            } else {
                t.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Documento anotado: a unidade de processamento do pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

impl Document {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { id: None, sentences }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Todos os tokens do documento em ordem.
    pub fn tokens(&self) -> impl Iterator<Item = &AnnotatedToken> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }

    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }
}
