//! 8b/10b encoder and decoder derived from the canonical table, plus the
//! consistency checks and lookup-table export built on top of it.

pub mod codec;
pub mod dump;
pub mod export;
pub mod stream;
pub mod trace;
pub mod validator;

pub use codec::{Codec, Decoded, Encoded};
pub use export::{BitPlane, Cell, DecodeTable, EncodeTable, JsonSink, MintermSink, PlaneSink, TableMismatch, TextSink};
pub use stream::{find_comma, StreamDecoder, StreamEncoder, StreamEvent, StreamStats};
pub use validator::{Anomaly, AnomalyKind, Producer, Validator};
