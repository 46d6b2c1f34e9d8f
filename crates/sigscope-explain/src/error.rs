use thiserror::Error;

use crate::select::SelectError;

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Client(#[from] sigscope_client::ClientError),

    #[error(transparent)]
    Record(#[from] sigscope_record::RecordError),
}

pub type ExplainResult<T> = Result<T, ExplainError>;
