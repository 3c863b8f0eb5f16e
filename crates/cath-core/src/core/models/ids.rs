use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const NULL_CHAIN_LABEL: char = '\0';

/// Identifies a residue within a structure: chain label, residue number and
/// optional insertion code, as they appear in PDB/DSSP records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueId {
    pub chain_label: char,
    pub number: isize,
    pub insert_code: Option<char>,
}

impl ResidueId {
    pub fn new(chain_label: char, number: isize, insert_code: Option<char>) -> Self {
        Self {
            chain_label,
            number,
            insert_code,
        }
    }

    /// The identifier carried by the null residue DSSP uses for positions it has no record for.
    pub fn null() -> Self {
        Self::new(NULL_CHAIN_LABEL, 0, None)
    }

    pub fn is_null(&self) -> bool {
        self.chain_label == NULL_CHAIN_LABEL
    }
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "<null>");
        }
        write!(f, "{}:{}", self.chain_label, self.number)?;
        if let Some(insert) = self.insert_code {
            write!(f, "{insert}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid residue identifier '{0}'; expected CHAIN:NUMBER[INSERT], e.g. A:12 or A:12B")]
pub struct ParseResidueIdError(pub String);

impl FromStr for ResidueId {
    type Err = ParseResidueIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseResidueIdError(s.to_string());
        let (chain, rest) = s.split_once(':').ok_or_else(err)?;

        let mut chain_chars = chain.chars();
        let chain_label = match (chain_chars.next(), chain_chars.next()) {
            (Some(c), None) if c != NULL_CHAIN_LABEL => c,
            _ => return Err(err()),
        };

        let (digits, insert_code) = match rest.chars().last() {
            Some(last) if last.is_ascii_alphabetic() => (&rest[..rest.len() - 1], Some(last)),
            _ => (rest, None),
        };
        let number = digits.parse::<isize>().map_err(|_| err())?;

        Ok(Self::new(chain_label, number, insert_code))
    }
}
