use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Calculation error: '{0}' is not a finite amount")]
    NonFinite(&'static str),

    #[error("Calculation error: '{0}' is too large to represent")]
    OutOfRange(&'static str),
}
