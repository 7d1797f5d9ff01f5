use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("amount `{0}` is not a finite number")]
    InvalidAmount(String),
    #[error("date `{0}` is not a valid YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("month `{0}` is not a valid YYYY-MM month")]
    InvalidMonth(String),
    #[error("amounts add up to more than can be represented")]
    AmountOverflow,
}

pub type Result<T> = std::result::Result<T, Error>;
