use std::collections::BTreeSet;
use std::fmt;

use tenbit_core::FailPolicy;
use tenbit_dsa::{CanonicalTable, Codeword, Disparity, Symbol};

use crate::codec::Codec;

/// One way a codeword can be produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Producer {
    pub rd_in: Disparity,
    pub symbol: Symbol,
    pub rd_out: Disparity,
}

impl fmt::Display for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(rd={} {} ({:#x}) -> rd={})", self.rd_in, self.symbol, self.symbol.value, self.rd_out)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnomalyKind {
    /// The same bit pattern decodes to two different symbols.
    DifferentDecode,
    /// Both entering states produce the word but leave in the same state.
    NotAlwaysSwap,
    /// The two productions share an entering state, or both change disparity.
    AlwaysChanges,
    /// More than two productions claim the word.
    TooManyProducers,
}

impl AnomalyKind {
    /// Findings that are correctness bugs rather than disparity bookkeeping.
    pub fn is_correctness_failure(self) -> bool {
        matches!(self, AnomalyKind::DifferentDecode | AnomalyKind::TooManyProducers)
    }

    pub fn fails(self, policy: FailPolicy) -> bool {
        match policy {
            FailPolicy::DifferentDecode => self.is_correctness_failure(),
            FailPolicy::Any => true,
        }
    }

    fn label(self) -> &'static str {
        match self {
            AnomalyKind::DifferentDecode => "different decode",
            AnomalyKind::NotAlwaysSwap => "not always swap",
            AnomalyKind::AlwaysChanges => "rd always changes",
            AnomalyKind::TooManyProducers => "too many producers",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anomaly {
    pub codeword: Codeword,
    pub kind: AnomalyKind,
    pub producers: Vec<Producer>,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.codeword)?;
        for p in &self.producers {
            write!(f, " {}", p)?;
        }
        Ok(())
    }
}

/// Global consistency checks over every production of a table.
///
/// Works on a bare [`CanonicalTable`] so tables the codec would refuse can
/// still be diagnosed.
pub struct Validator<'a> {
    table: &'a CanonicalTable,
}

impl<'a> Validator<'a> {
    pub fn new(table: &'a CanonicalTable) -> Self {
        Self { table }
    }

    pub fn for_codec(codec: &'a Codec) -> Self {
        Self::new(codec.table())
    }

    /// Distinct producers of each of the 1024 words.
    pub fn producers(&self) -> Vec<BTreeSet<Producer>> {
        let mut buckets = vec![BTreeSet::new(); Codeword::SPACE];
        for p in self.table.productions() {
            buckets[p.word.bits() as usize].insert(Producer {
                rd_in: p.rd_in,
                symbol: p.symbol,
                rd_out: p.rd_out,
            });
        }
        buckets
    }

    pub fn check(&self) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        for (word, producers) in self.producers().into_iter().enumerate() {
            let producers: Vec<Producer> = producers.into_iter().collect();
            let kind = match producers.as_slice() {
                [] | [_] => None,
                [a, b] => classify(a, b),
                _ => Some(AnomalyKind::TooManyProducers),
            };
            if let Some(kind) = kind {
                let anomaly = Anomaly {
                    codeword: Codeword::from_bits_truncate(word as u16),
                    kind,
                    producers,
                };
                tracing::warn!(%anomaly, "codeword anomaly");
                anomalies.push(anomaly);
            }
        }

        tracing::debug!(anomalies = anomalies.len(), "validator finished");
        anomalies
    }
}

fn classify(a: &Producer, b: &Producer) -> Option<AnomalyKind> {
    if a.symbol != b.symbol {
        return Some(AnomalyKind::DifferentDecode);
    }
    let a_keeps = a.rd_in == a.rd_out;
    let b_keeps = b.rd_in == b.rd_out;
    if a_keeps && b_keeps {
        // Balanced word, legal from either state.
        return None;
    }
    if a.rd_in != b.rd_in && a.rd_out == b.rd_out {
        return Some(AnomalyKind::NotAlwaysSwap);
    }
    Some(AnomalyKind::AlwaysChanges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producer(rd_in: u8, value: u8, rd_out: u8) -> Producer {
        Producer {
            rd_in: Disparity::from_bit(rd_in == 1),
            symbol: Symbol::data(value),
            rd_out: Disparity::from_bit(rd_out == 1),
        }
    }

    #[test]
    fn balanced_pair_is_benign() {
        assert_eq!(classify(&producer(0, 3, 0), &producer(1, 3, 1)), None);
    }

    #[test]
    fn classifies_pairs() {
        assert_eq!(classify(&producer(0, 3, 0), &producer(1, 4, 1)), Some(AnomalyKind::DifferentDecode));
        assert_eq!(classify(&producer(0, 3, 1), &producer(1, 3, 1)), Some(AnomalyKind::NotAlwaysSwap));
        assert_eq!(classify(&producer(0, 3, 1), &producer(1, 3, 0)), Some(AnomalyKind::AlwaysChanges));
    }
}
