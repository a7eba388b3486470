use thiserror::Error;

use br_eval::EvalError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search configuration error: {0}")]
    Config(String),

    #[error("candidate evaluation failed: {0}")]
    Eval(#[from] EvalError),
}

pub type SearchResult<T> = Result<T, SearchError>;
