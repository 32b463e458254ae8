pub mod config;
pub mod error;
pub mod notation;

pub use config::{CodecConfig, FailPolicy};
pub use error::{LineCodeError, Result};
pub use notation::{parse_codeword, parse_disparity, parse_symbol};
pub use tenbit_dsa::{Codeword, Detector, Disparity, Symbol};
