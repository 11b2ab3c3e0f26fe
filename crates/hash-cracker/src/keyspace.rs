use crate::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Longest brute force candidate. Past this, any alphabet of two symbols or
/// more overflows a `u64` index anyway.
pub const MAX_CANDIDATE_LENGTH: usize = 64;

/// Ordered, finite set of candidates addressable by index.
pub trait Keyspace: Send + Sync {
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the content of `buf` with the candidate at `index`.
    fn write_candidate(&self, index: u64, buf: &mut String) -> Result<()>;

    fn describe(&self) -> String;
}

// region:        --- Brute force

/// Every string of `length` symbols over `alphabet`, leftmost position
/// varying slowest.
#[derive(Debug, Clone)]
pub struct BruteForce {
    alphabet: Vec<char>,
    length: usize,
    size: u64,
    // weight of each position, most significant first
    place_values: Vec<u64>,
}

impl BruteForce {
    pub fn new(alphabet: &str, length: usize) -> Result<Self> {
        let alphabet: Vec<char> = alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        if length == 0 {
            return Err(Error::ZeroLength);
        }
        if length > MAX_CANDIDATE_LENGTH {
            return Err(Error::CandidateTooLong {
                length,
                max: MAX_CANDIDATE_LENGTH,
            });
        }

        let mut seen = HashSet::with_capacity(alphabet.len());
        if let Some(symbol) = alphabet.iter().find(|symbol| !seen.insert(**symbol)) {
            return Err(Error::DuplicateSymbol(*symbol));
        }

        let overflow = Error::KeyspaceOverflow {
            alphabet: alphabet.len(),
            length,
        };
        let size = u32::try_from(length)
            .ok()
            .and_then(|exp| (alphabet.len() as u64).checked_pow(exp))
            .ok_or(overflow)?;

        let radix = alphabet.len() as u64;
        let mut place_values = vec![1u64; length];
        for i in (0..length.saturating_sub(1)).rev() {
            place_values[i] = place_values[i + 1] * radix;
        }

        debug!(
            "keyspace {} symbols ^ {} = {}",
            alphabet.len(),
            length,
            size
        );
        Ok(Self {
            alphabet,
            length,
            size,
            place_values,
        })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Lazy walk over the whole keyspace in index order.
    pub fn candidates(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.size).map(move |index| {
            let mut candidate = String::with_capacity(self.length);
            self.decode(index, &mut candidate);
            candidate
        })
    }

    // mixed-radix decoding, most significant digit first
    fn decode(&self, index: u64, buf: &mut String) {
        let radix = self.alphabet.len() as u64;
        buf.clear();
        for place in &self.place_values {
            let digit = (index / place) % radix;
            buf.push(self.alphabet[digit as usize]);
        }
    }
}

impl Keyspace for BruteForce {
    fn len(&self) -> u64 {
        self.size
    }

    fn write_candidate(&self, index: u64, buf: &mut String) -> Result<()> {
        if index >= self.size {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.size,
            });
        }
        self.decode(index, buf);
        Ok(())
    }

    fn describe(&self) -> String {
        let alphabet: String = self.alphabet.iter().collect();
        format!("brute force [{}]^{}", alphabet, self.length)
    }
}

// endregion:     --- Brute force

// region:        --- Wordlist

/// Candidates read from a dictionary, in file order.
#[derive(Debug, Clone)]
pub struct Wordlist {
    words: Vec<String>,
}

impl Wordlist {
    pub fn new(words: Vec<String>) -> Result<Self> {
        let words: Vec<String> = words
            .into_iter()
            .map(|word| word.trim().to_string())
            .filter(|word| !word.is_empty())
            .collect();

        if words.is_empty() {
            return Err(Error::EmptyWordlist);
        }
        Ok(Self { words })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let words = BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?;

        debug!("{} lines read from {:?}", words.len(), path);
        Self::new(words)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Keyspace for Wordlist {
    fn len(&self) -> u64 {
        self.words.len() as u64
    }

    fn write_candidate(&self, index: u64, buf: &mut String) -> Result<()> {
        let word = usize::try_from(index)
            .ok()
            .and_then(|i| self.words.get(i))
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.len(),
            })?;

        buf.clear();
        buf.push_str(word);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("wordlist ({} words)", self.words.len())
    }
}

// endregion:     --- Wordlist
