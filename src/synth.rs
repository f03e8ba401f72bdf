//! Random sequence synthesis.
//!
//! Every position is drawn independently and uniformly from the alphabet,
//! with replacement. The random source is passed in by the caller so that a
//! seeded generator gives reproducible output.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Sequence;

/// The four nucleotide symbols.
pub const DNA_SYMBOLS: &str = "ACGT";

/// Errors that can occur during synthesis or alphabet construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    #[error("Invalid sequence length: {0} (must not be negative)")]
    InvalidLength(i64),

    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,

    #[error("Alphabet symbol '{0}' is not ASCII")]
    NonAsciiSymbol(char),

    #[error("Alphabet symbol '{0}' appears more than once")]
    DuplicateSymbol(char),
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// A validated set of distinct ASCII symbols to draw from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    /// Creates an alphabet from a string of symbols.
    pub fn new(symbols: &str) -> SynthResult<Self> {
        if symbols.is_empty() {
            return Err(SynthError::EmptyAlphabet);
        }

        let mut seen = Vec::with_capacity(symbols.len());
        for c in symbols.chars() {
            if !c.is_ascii() {
                return Err(SynthError::NonAsciiSymbol(c));
            }
            let b = c as u8;
            if seen.contains(&b) {
                return Err(SynthError::DuplicateSymbol(c));
            }
            seen.push(b);
        }

        Ok(Self { symbols: seen })
    }

    /// The nucleotide alphabet `ACGT`.
    pub fn dna() -> Self {
        Self {
            symbols: DNA_SYMBOLS.as_bytes().to_vec(),
        }
    }

    /// Returns the symbols in declaration order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Returns the number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a validated alphabet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Checks if a byte is one of the alphabet's symbols.
    pub fn contains(&self, symbol: u8) -> bool {
        self.symbols.contains(&symbol)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::dna()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.symbols {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Alphabet {
    type Error = SynthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.to_string()
    }
}

/// Generates a random sequence of `length` symbols drawn from `alphabet`.
///
/// A length of zero yields an empty sequence; a negative length fails with
/// [`SynthError::InvalidLength`].
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use seqsynth::synth::{synthesize, Alphabet};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let seq = synthesize(12, &Alphabet::dna(), &mut rng).unwrap();
/// assert_eq!(seq.len(), 12);
/// ```
pub fn synthesize<R: Rng + ?Sized>(
    length: i64,
    alphabet: &Alphabet,
    rng: &mut R,
) -> SynthResult<Sequence> {
    let length = usize::try_from(length).map_err(|_| SynthError::InvalidLength(length))?;
    if length == 0 {
        return Ok(Sequence::default());
    }

    let symbols = alphabet.symbols();
    let data: Vec<u8> = (0..length)
        .map(|_| symbols[rng.random_range(0..symbols.len())])
        .collect();

    Ok(Sequence::from_bytes(data))
}
