use std::fmt;

use tenbit_dsa::{Codeword, Disparity, Symbol, TableError};

#[derive(Debug)]
pub enum LineCodeError {
    /// The (value, control) pair has no entry in the code table.
    UnsupportedSymbol(Symbol),
    /// The word is not a member of the code for the asserted entering disparity.
    /// `disparity_error` reports whether the prefix detector also fired.
    InvalidCodeword {
        codeword: Codeword,
        disparity: Disparity,
        disparity_error: bool,
    },
    Parse(String),
    Config(String),
    Table(TableError),
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, LineCodeError>;

impl fmt::Display for LineCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineCodeError::UnsupportedSymbol(symbol) => {
                write!(f, "unsupported symbol {} ({:#x})", symbol, symbol.value)
            }
            LineCodeError::InvalidCodeword { codeword, disparity, disparity_error } => {
                write!(f, "invalid codeword {} at rd={}", codeword, disparity)?;
                if *disparity_error {
                    f.write_str(" (disparity error)")?;
                }
                Ok(())
            }
            LineCodeError::Parse(msg) => write!(f, "parse error: {}", msg),
            LineCodeError::Config(msg) => write!(f, "config error: {}", msg),
            LineCodeError::Table(e) => write!(f, "table error: {}", e),
            LineCodeError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for LineCodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LineCodeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LineCodeError {
    fn from(e: std::io::Error) -> Self {
        LineCodeError::Io(e)
    }
}

impl From<TableError> for LineCodeError {
    fn from(e: TableError) -> Self {
        LineCodeError::Table(e)
    }
}
