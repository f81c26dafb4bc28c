//! # Listas de Exclusão do Saco de Palavras
//!
//! Tabelas estáticas e imutáveis, carregadas uma única vez no primeiro uso:
//! - categorias funcionais que nunca são candidatas a palavra importante;
//! - stop-words do francês (comparadas com o lema em minúsculas).

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::CoarseTag;

/// Categorias gramaticais funcionais (nunca candidatas).
pub const FUNCTIONAL_TAGS: &[CoarseTag] = &[
    CoarseTag::Det,
    CoarseTag::Adp,
    CoarseTag::Pron,
    CoarseTag::Cconj,
    CoarseTag::Sconj,
    CoarseTag::Punct,
    CoarseTag::Aux,
    CoarseTag::Space,
    CoarseTag::Sym,
    CoarseTag::Num,
];

/// Lemas funcionais ou vazios de conteúdo.
const FRENCH_STOP_WORDS: &[&str] = &[
    // artigos e contrações
    "le", "la", "les", "l'", "un", "une", "des", "du", "au", "aux", "de", "d'",
    // auxiliares
    "être", "avoir",
    // preposições
    "à", "en", "dans", "sur", "sous", "avec", "sans", "par", "pour", "vers", "chez",
    "entre", "parmi", "contre", "malgré", "grâce", "selon", "pendant", "durant",
    "après", "avant", "depuis", "jusqu", "jusque", "sauf", "except",
    // conjunções
    "et", "ou", "mais", "donc", "or", "ni", "car", "que", "qu'", "si", "comme",
    "quand", "lorsque", "puisque",
    // pronomes
    "je", "j'", "tu", "il", "elle", "on", "nous", "vous", "ils", "elles", "se", "s'",
    "me", "m'", "te", "t'", "lui", "leur", "y", "ce", "c'", "ceci", "cela", "ça",
    "qui", "quoi", "dont", "où", "celui", "celle", "ceux", "celles",
    // determinantes possessivos e demonstrativos
    "cette", "cet", "ces", "son", "sa", "ses", "leurs", "mon", "ma", "mes", "ton",
    "ta", "tes", "notre", "nos", "votre", "vos",
    // advérbios e palavras de ligação
    "ne", "pas", "plus", "tout", "tous", "toute", "toutes", "très", "bien", "aussi",
    "encore", "déjà", "toujours", "jamais", "souvent", "parfois", "puis", "alors",
    "ainsi", "cependant", "néanmoins", "toutefois", "pourtant", "comment", "pourquoi",
    // adjetivo genérico demais
    "grand",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| FRENCH_STOP_WORDS.iter().copied().collect());

static HAS_LETTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-ZàâäéèêëîïôöùûüÿçœæÀÂÄÉÈÊËÎÏÔÖÙÛÜŸÇŒÆ]").unwrap()
});

/// A tag é funcional (DET, ADP, PRON, ...)?
pub fn is_functional_tag(tag: CoarseTag) -> bool {
    FUNCTIONAL_TAGS.contains(&tag)
}

/// O lema (já em minúsculas) está na lista de stop-words?
pub fn is_stop_word(lemma: &str) -> bool {
    STOP_WORDS.contains(lemma)
}

/// Contém pelo menos uma letra (inclusive acentuada)?
pub fn has_letter(s: &str) -> bool {
    HAS_LETTER.is_match(s)
}
