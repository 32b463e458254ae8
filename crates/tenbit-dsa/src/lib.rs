#![no_std]
extern crate alloc;

pub mod disparity;
pub mod masked;
pub mod standard;
pub mod symbol;
pub mod table;

pub use disparity::{evolve, loose_disparity_error, strict_disparity_error, Detector, Disparity, PrefixBounds};
pub use masked::Masked;
pub use symbol::{Codeword, Symbol, COMMA_NEGATIVE, COMMA_POSITIVE, CONTROL_SYMBOLS};
pub use table::{CanonicalTable, Encoding, Entry, Production, Row, TableError};
