//! # Erros do lexique-core
//!
//! Somente erros de configuração interrompem o processamento. Tokens
//! malformados e verbos não classificáveis são recuperados localmente
//! (ver [`crate::pipeline::InputWarning`] e [`crate::tense::TenseLabel::Unclassified`]).

use thiserror::Error;

/// Tipo `Result` do crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Erros que chegam ao chamador.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Parâmetro inválido do avaliador de importância (limiar negativo, máximo zero).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Cria um erro de configuração.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
