//! # Resolvedor de Tempos Verbais
//!
//! Mapeia os traços morfológicos de um verbo (ou auxiliar) para uma entrada
//! fechada da taxonomia de tempos e modos do francês.
//!
//! ## Tabela de Decisão (primeira regra que casar vence)
//!
//! | Prioridade | Traços                          | Rótulo                   |
//! |------------|---------------------------------|--------------------------|
//! | 1          | `VerbForm=Inf`                  | Infinitif                |
//! | 2          | `VerbForm=Part` + `Tense=Pres`  | Participe Présent        |
//! | 2          | `VerbForm=Part` + `Tense=Past`  | Participe Passé          |
//! | 3          | `Mood=Ind` + `Tense=Pres/Imp/Past/Fut` | Indicatif …       |
//! | 4          | `Mood=Sub` + `Tense=Pres/Imp`   | Subjonctif …             |
//! | 5          | `Mood=Cnd`                      | Conditionnel             |
//! | 6          | `Mood=Imp`                      | Impératif                |
//! | 7          | tag fina `VINF`/`VPP`/`VPR`     | Infinitif / Participe …  |
//! | —          | nada casou                      | Unclassified             |
//!
//! As regras de `VerbForm` vêm antes das de modo: alguns auxiliares chegam do
//! anotador com um `Mood` espúrio junto de `VerbForm=Inf`.
//!
//! ## Tempos Compostos
//!
//! "a mangé" gera **duas** classificações independentes: o auxiliar
//! ("Indicatif Présent") e o particípio ("Participe Passé"). Elas nunca são
//! fundidas em um rótulo composto.

use serde::{Deserialize, Serialize};

use crate::token::{AnnotatedToken, CoarseTag, MorphFeatures, Sentence};

/// Quantos tokens de cada lado entram no contexto de um verbo.
pub const CONTEXT_WINDOW: usize = 10;

/// Taxonomia fechada de tempos/modos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TenseLabel {
    #[serde(rename = "Infinitif")]
    Infinitif,
    #[serde(rename = "Participe Présent")]
    ParticipePresent,
    #[serde(rename = "Participe Passé")]
    ParticipePasse,
    #[serde(rename = "Indicatif Présent")]
    IndicatifPresent,
    #[serde(rename = "Indicatif Imparfait")]
    IndicatifImparfait,
    #[serde(rename = "Indicatif Passé Simple")]
    IndicatifPasseSimple,
    #[serde(rename = "Indicatif Futur")]
    IndicatifFutur,
    #[serde(rename = "Subjonctif Présent")]
    SubjonctifPresent,
    #[serde(rename = "Subjonctif Imparfait")]
    SubjonctifImparfait,
    #[serde(rename = "Conditionnel")]
    Conditionnel,
    #[serde(rename = "Impératif")]
    Imperatif,
    /// Nenhuma regra casou. Resultado normal, não é erro.
    #[serde(rename = "Unclassified")]
    Unclassified,
}

impl TenseLabel {
    /// Rótulo legível, idêntico à forma serializada.
    pub fn label(&self) -> &'static str {
        match self {
            TenseLabel::Infinitif => "Infinitif",
            TenseLabel::ParticipePresent => "Participe Présent",
            TenseLabel::ParticipePasse => "Participe Passé",
            TenseLabel::IndicatifPresent => "Indicatif Présent",
            TenseLabel::IndicatifImparfait => "Indicatif Imparfait",
            TenseLabel::IndicatifPasseSimple => "Indicatif Passé Simple",
            TenseLabel::IndicatifFutur => "Indicatif Futur",
            TenseLabel::SubjonctifPresent => "Subjonctif Présent",
            TenseLabel::SubjonctifImparfait => "Subjonctif Imparfait",
            TenseLabel::Conditionnel => "Conditionnel",
            TenseLabel::Imperatif => "Impératif",
            TenseLabel::Unclassified => "Unclassified",
        }
    }

    /// Todos os rótulos, na ordem da taxonomia.
    pub fn all() -> [TenseLabel; 12] {
        [
            TenseLabel::Infinitif,
            TenseLabel::ParticipePresent,
            TenseLabel::ParticipePasse,
            TenseLabel::IndicatifPresent,
            TenseLabel::IndicatifImparfait,
            TenseLabel::IndicatifPasseSimple,
            TenseLabel::IndicatifFutur,
            TenseLabel::SubjonctifPresent,
            TenseLabel::SubjonctifImparfait,
            TenseLabel::Conditionnel,
            TenseLabel::Imperatif,
            TenseLabel::Unclassified,
        ]
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|l| l.label() == s)
    }
}

impl std::fmt::Display for TenseLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Modo verbal (`Mood`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    #[serde(rename = "Ind")]
    Indicative,
    #[serde(rename = "Sub")]
    Subjunctive,
    #[serde(rename = "Cnd")]
    Conditional,
    #[serde(rename = "Imp")]
    Imperative,
}

impl Mood {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Ind" => Some(Mood::Indicative),
            "Sub" => Some(Mood::Subjunctive),
            "Cnd" => Some(Mood::Conditional),
            "Imp" => Some(Mood::Imperative),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tense {
    Pres,
    Imp,
    Past,
    Fut,
}

impl Tense {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "Pres" => Some(Tense::Pres),
            "Imp" => Some(Tense::Imp),
            "Past" => Some(Tense::Past),
            "Fut" => Some(Tense::Fut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerbForm {
    Fin,
    Inf,
    Part,
}

impl VerbForm {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "Fin" => Some(VerbForm::Fin),
            "Inf" => Some(VerbForm::Inf),
            "Part" => Some(VerbForm::Part),
            _ => None,
        }
    }
}

/// Número gramatical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    #[serde(rename = "Sing")]
    Singular,
    #[serde(rename = "Plur")]
    Plural,
}

impl Number {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Sing" => Some(Number::Singular),
            "Plur" => Some(Number::Plural),
            _ => None,
        }
    }
}

/// Voz verbal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Voice {
    #[default]
    Active,
    Passive,
    /// `Voice` presente com valor não reconhecido.
    Unknown,
}

/// Classificação de um token verbal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbClassification {
    pub surface_text: String,
    pub lemma: String,
    pub tense_label: TenseLabel,
    pub mood: Option<Mood>,
    pub person: Option<u8>,
    pub number: Option<Number>,
    pub voice: Voice,
    /// Janela de contexto com o verbo destacado (`**est**`).
    pub context_snippet: String,
    pub coarse_tag: CoarseTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine_tag: Option<String>,
    pub sentence_index: usize,
    pub token_index: usize,
}

/// Aplica a tabela de decisão aos traços (e à tag fina, como último recurso).
pub fn resolve_tense(features: &MorphFeatures, fine_tag: Option<&str>) -> TenseLabel {
    let verb_form = features.get("VerbForm").and_then(VerbForm::from_code);
    let mood = features.get("Mood").and_then(Mood::from_code);
    let tense = features.get("Tense").and_then(Tense::from_code);

    let by_features = match (verb_form, mood, tense) {
        (Some(VerbForm::Inf), _, _) => Some(TenseLabel::Infinitif),
        (Some(VerbForm::Part), _, Some(Tense::Pres)) => Some(TenseLabel::ParticipePresent),
        (Some(VerbForm::Part), _, Some(Tense::Past)) => Some(TenseLabel::ParticipePasse),
        // Particípio sem Pres/Past nunca cai num modo finito
        (Some(VerbForm::Part), _, _) => None,
        (_, Some(Mood::Indicative), Some(Tense::Pres)) => Some(TenseLabel::IndicatifPresent),
        (_, Some(Mood::Indicative), Some(Tense::Imp)) => Some(TenseLabel::IndicatifImparfait),
        (_, Some(Mood::Indicative), Some(Tense::Past)) => Some(TenseLabel::IndicatifPasseSimple),
        (_, Some(Mood::Indicative), Some(Tense::Fut)) => Some(TenseLabel::IndicatifFutur),
        (_, Some(Mood::Subjunctive), Some(Tense::Pres)) => Some(TenseLabel::SubjonctifPresent),
        (_, Some(Mood::Subjunctive), Some(Tense::Imp)) => Some(TenseLabel::SubjonctifImparfait),
        (_, Some(Mood::Conditional), _) => Some(TenseLabel::Conditionnel),
        (_, Some(Mood::Imperative), _) => Some(TenseLabel::Imperatif),
        _ => None,
    };

    by_features
        .or_else(|| fine_tag.and_then(resolve_fine_tag))
        .unwrap_or(TenseLabel::Unclassified)
}

/// Tags finas do tagset francês (ex: "VINF", "VPP", "VPR").
fn resolve_fine_tag(fine_tag: &str) -> Option<TenseLabel> {
    let upper = fine_tag.to_ascii_uppercase();
    if upper.starts_with("VINF") {
        Some(TenseLabel::Infinitif)
    } else if upper.starts_with("VPP") {
        Some(TenseLabel::ParticipePasse)
    } else if upper.starts_with("VPR") {
        Some(TenseLabel::ParticipePresent)
    } else {
        None
    }
}

/// Voz: `Voice=Pass` ou relação de dependência passiva (`aux:pass`, `nsubj:pass`).
fn resolve_voice(token: &AnnotatedToken) -> Voice {
    match token.morph_features.get("Voice") {
        Some("Pass") => return Voice::Passive,
        Some("Act") | None => {}
        Some(_) => return Voice::Unknown,
    }
    match token.dep.as_deref() {
        Some(dep) if dep.ends_with(":pass") => Voice::Passive,
        _ => Voice::Active,
    }
}

/// Classifica o token na `position` da sentença de índice `sentence_index`.
///
/// O chamador garante que o token é VERB ou AUX; qualquer token recebe,
/// ainda assim, exatamente uma classificação.
pub fn classify(
    sentence: &Sentence,
    sentence_index: usize,
    position: usize,
) -> Option<VerbClassification> {
    let token = sentence.tokens.get(position)?;
    let features = &token.morph_features;

    let tense_label = resolve_tense(features, token.fine_tag.as_deref());
    if tense_label == TenseLabel::Unclassified {
        tracing::debug!(
            verb = %token.text,
            features = %features,
            "verbo sem regra de tempo correspondente"
        );
    }

    let mood = match tense_label {
        TenseLabel::Infinitif => None,
        _ => features.get("Mood").and_then(Mood::from_code),
    };
    let person = features
        .get("Person")
        .and_then(|p| p.parse::<u8>().ok())
        .filter(|p| (1..=3).contains(p));

    Some(VerbClassification {
        surface_text: token.text.clone(),
        lemma: token.lemma.clone(),
        tense_label,
        mood,
        person,
        number: features.get("Number").and_then(Number::from_code),
        voice: resolve_voice(token),
        context_snippet: sentence.context_window(position, CONTEXT_WINDOW),
        coarse_tag: token.coarse_tag.unwrap_or(CoarseTag::Verb),
        fine_tag: token.fine_tag.clone(),
        sentence_index,
        token_index: position,
    })
}
