use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardAminoAcid {
    Alanine,
    Arginine,
    Asparagine,
    AsparticAcid,
    Cysteine,
    GlutamicAcid,
    Glutamine,
    Glycine,
    Histidine,
    Isoleucine,
    Leucine,
    Lysine,
    Methionine,
    Phenylalanine,
    Proline,
    Serine,
    Threonine,
    Tryptophan,
    Tyrosine,
    Valine,
}

/// Codes outside the standard twenty that still describe proper amino acids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NonStandardAminoAcid {
    /// Asparagine or aspartic acid (ASX, B).
    Asx,
    /// Glutamine or glutamic acid (GLX, Z).
    Glx,
    /// Pyrrolysine (PYL, O).
    Pyl,
    /// Selenocysteine (SEC, U).
    Sec,
}

/// The amino acid of a residue.
///
/// `Het` holds the three-letter code of a residue that came from a HETATM
/// record (e.g. selenomethionine, `MSE`); such residues are not proper amino
/// acids even when they have a well-known parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Standard(StandardAminoAcid),
    NonStandard(NonStandardAminoAcid),
    Unknown,
    Het(String),
}

static STANDARD_BY_CODE: Map<&'static str, StandardAminoAcid> = phf_map! {
    "ALA" => StandardAminoAcid::Alanine,
    "ARG" => StandardAminoAcid::Arginine,
    "ASN" => StandardAminoAcid::Asparagine,
    "ASP" => StandardAminoAcid::AsparticAcid,
    "CYS" => StandardAminoAcid::Cysteine,
    "GLU" => StandardAminoAcid::GlutamicAcid,
    "GLN" => StandardAminoAcid::Glutamine,
    "GLY" => StandardAminoAcid::Glycine,
    "HIS" => StandardAminoAcid::Histidine,
    "ILE" => StandardAminoAcid::Isoleucine,
    "LEU" => StandardAminoAcid::Leucine,
    "LYS" => StandardAminoAcid::Lysine,
    "MET" => StandardAminoAcid::Methionine,
    "PHE" => StandardAminoAcid::Phenylalanine,
    "PRO" => StandardAminoAcid::Proline,
    "SER" => StandardAminoAcid::Serine,
    "THR" => StandardAminoAcid::Threonine,
    "TRP" => StandardAminoAcid::Tryptophan,
    "TYR" => StandardAminoAcid::Tyrosine,
    "VAL" => StandardAminoAcid::Valine,
};

static NON_STANDARD_BY_CODE: Map<&'static str, NonStandardAminoAcid> = phf_map! {
    "ASX" => NonStandardAminoAcid::Asx,
    "GLX" => NonStandardAminoAcid::Glx,
    "PYL" => NonStandardAminoAcid::Pyl,
    "SEC" => NonStandardAminoAcid::Sec,
};

// Parent of common modified residues found in HETATM records.
static HET_PARENTS: Map<&'static str, StandardAminoAcid> = phf_map! {
    "MSE" => StandardAminoAcid::Methionine,
    "SEP" => StandardAminoAcid::Serine,
    "TPO" => StandardAminoAcid::Threonine,
    "PTR" => StandardAminoAcid::Tyrosine,
    "CSO" => StandardAminoAcid::Cysteine,
    "CSD" => StandardAminoAcid::Cysteine,
    "CME" => StandardAminoAcid::Cysteine,
    "HYP" => StandardAminoAcid::Proline,
    "MLY" => StandardAminoAcid::Lysine,
    "KCX" => StandardAminoAcid::Lysine,
    "LLP" => StandardAminoAcid::Lysine,
    "PCA" => StandardAminoAcid::GlutamicAcid,
};

const UNKNOWN_CODE: &str = "UNK";
const UNKNOWN_LETTER: char = 'X';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AminoAcidError {
    #[error("Unrecognised amino acid letter '{0}'")]
    UnknownLetter(char),
    #[error("Unrecognised amino acid code '{0}'")]
    UnknownCode(String),
    #[error("HETATM residue code '{0}' must be one to three alphanumeric characters")]
    InvalidHetCode(String),
}

impl StandardAminoAcid {
    pub fn letter(self) -> char {
        match self {
            StandardAminoAcid::Alanine => 'A',
            StandardAminoAcid::Arginine => 'R',
            StandardAminoAcid::Asparagine => 'N',
            StandardAminoAcid::AsparticAcid => 'D',
            StandardAminoAcid::Cysteine => 'C',
            StandardAminoAcid::GlutamicAcid => 'E',
            StandardAminoAcid::Glutamine => 'Q',
            StandardAminoAcid::Glycine => 'G',
            StandardAminoAcid::Histidine => 'H',
            StandardAminoAcid::Isoleucine => 'I',
            StandardAminoAcid::Leucine => 'L',
            StandardAminoAcid::Lysine => 'K',
            StandardAminoAcid::Methionine => 'M',
            StandardAminoAcid::Phenylalanine => 'F',
            StandardAminoAcid::Proline => 'P',
            StandardAminoAcid::Serine => 'S',
            StandardAminoAcid::Threonine => 'T',
            StandardAminoAcid::Tryptophan => 'W',
            StandardAminoAcid::Tyrosine => 'Y',
            StandardAminoAcid::Valine => 'V',
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            StandardAminoAcid::Alanine => "ALA",
            StandardAminoAcid::Arginine => "ARG",
            StandardAminoAcid::Asparagine => "ASN",
            StandardAminoAcid::AsparticAcid => "ASP",
            StandardAminoAcid::Cysteine => "CYS",
            StandardAminoAcid::GlutamicAcid => "GLU",
            StandardAminoAcid::Glutamine => "GLN",
            StandardAminoAcid::Glycine => "GLY",
            StandardAminoAcid::Histidine => "HIS",
            StandardAminoAcid::Isoleucine => "ILE",
            StandardAminoAcid::Leucine => "LEU",
            StandardAminoAcid::Lysine => "LYS",
            StandardAminoAcid::Methionine => "MET",
            StandardAminoAcid::Phenylalanine => "PHE",
            StandardAminoAcid::Proline => "PRO",
            StandardAminoAcid::Serine => "SER",
            StandardAminoAcid::Threonine => "THR",
            StandardAminoAcid::Tryptophan => "TRP",
            StandardAminoAcid::Tyrosine => "TYR",
            StandardAminoAcid::Valine => "VAL",
        }
    }
}

impl NonStandardAminoAcid {
    pub fn letter(self) -> char {
        match self {
            NonStandardAminoAcid::Asx => 'B',
            NonStandardAminoAcid::Glx => 'Z',
            NonStandardAminoAcid::Pyl => 'O',
            NonStandardAminoAcid::Sec => 'U',
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            NonStandardAminoAcid::Asx => "ASX",
            NonStandardAminoAcid::Glx => "GLX",
            NonStandardAminoAcid::Pyl => "PYL",
            NonStandardAminoAcid::Sec => "SEC",
        }
    }
}

impl AminoAcid {
    pub fn from_letter(letter: char) -> Result<Self, AminoAcidError> {
        let upper = letter.to_ascii_uppercase();
        if upper == UNKNOWN_LETTER {
            return Ok(AminoAcid::Unknown);
        }
        STANDARD_BY_CODE
            .values()
            .find(|aa| aa.letter() == upper)
            .map(|&aa| AminoAcid::Standard(aa))
            .or_else(|| {
                NON_STANDARD_BY_CODE
                    .values()
                    .find(|aa| aa.letter() == upper)
                    .map(|&aa| AminoAcid::NonStandard(aa))
            })
            .ok_or(AminoAcidError::UnknownLetter(letter))
    }

    /// Parses a three-letter code from an ATOM record (case-insensitive, surrounding whitespace ignored).
    pub fn from_code(code: &str) -> Result<Self, AminoAcidError> {
        let upper = code.trim().to_ascii_uppercase();
        if upper == UNKNOWN_CODE {
            return Ok(AminoAcid::Unknown);
        }
        if let Some(&aa) = STANDARD_BY_CODE.get(upper.as_str()) {
            return Ok(AminoAcid::Standard(aa));
        }
        if let Some(&aa) = NON_STANDARD_BY_CODE.get(upper.as_str()) {
            return Ok(AminoAcid::NonStandard(aa));
        }
        Err(AminoAcidError::UnknownCode(code.to_string()))
    }

    /// Records the residue name of a HETATM record.
    pub fn from_het_code(code: &str) -> Result<Self, AminoAcidError> {
        let trimmed = code.trim();
        let valid = (1..=3).contains(&trimmed.len())
            && trimmed.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(AminoAcidError::InvalidHetCode(code.to_string()));
        }
        Ok(AminoAcid::Het(trimmed.to_ascii_uppercase()))
    }

    /// The one-letter code; HETATM residues report their parent's letter if it is known and `X` otherwise.
    pub fn letter(&self) -> char {
        match self {
            AminoAcid::Standard(aa) => aa.letter(),
            AminoAcid::NonStandard(aa) => aa.letter(),
            AminoAcid::Unknown => UNKNOWN_LETTER,
            AminoAcid::Het(code) => HET_PARENTS
                .get(code.as_str())
                .map_or(UNKNOWN_LETTER, |aa| aa.letter()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            AminoAcid::Standard(aa) => aa.code(),
            AminoAcid::NonStandard(aa) => aa.code(),
            AminoAcid::Unknown => UNKNOWN_CODE,
            AminoAcid::Het(code) => code,
        }
    }

    /// Whether this residue came from an ATOM record rather than a HETATM one.
    pub fn is_proper(&self) -> bool {
        !matches!(self, AminoAcid::Het(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, AminoAcid::Unknown)
    }

    pub fn is_non_standard_variant(&self) -> bool {
        matches!(self, AminoAcid::NonStandard(_))
    }
}

impl FromStr for AminoAcid {
    type Err = AminoAcidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Self::from_letter(letter),
            _ => Self::from_code(s),
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_codes_agree_for_all_standard_residues() {
        assert_eq!(STANDARD_BY_CODE.len(), 20);
        for (code, aa) in STANDARD_BY_CODE.entries() {
            assert_eq!(aa.code(), *code);
            assert_eq!(
                AminoAcid::from_letter(aa.letter()),
                Ok(AminoAcid::Standard(*aa))
            );
        }
    }

    #[test]
    fn from_code_is_case_insensitive_and_trims() {
        assert_eq!(
            AminoAcid::from_code(" gly "),
            Ok(AminoAcid::Standard(StandardAminoAcid::Glycine))
        );
        assert_eq!(
            AminoAcid::from_code("Sec"),
            Ok(AminoAcid::NonStandard(NonStandardAminoAcid::Sec))
        );
        assert_eq!(AminoAcid::from_code("UNK"), Ok(AminoAcid::Unknown));
    }

    #[test]
    fn from_code_rejects_unrecognised_codes() {
        assert_eq!(
            AminoAcid::from_code("MSE"),
            Err(AminoAcidError::UnknownCode("MSE".to_string()))
        );
        assert!(AminoAcid::from_code("").is_err());
    }

    #[test]
    fn from_letter_handles_non_standard_and_unknown() {
        assert_eq!(
            AminoAcid::from_letter('b'),
            Ok(AminoAcid::NonStandard(NonStandardAminoAcid::Asx))
        );
        assert_eq!(AminoAcid::from_letter('X'), Ok(AminoAcid::Unknown));
        assert_eq!(
            AminoAcid::from_letter('J'),
            Err(AminoAcidError::UnknownLetter('J'))
        );
    }

    #[test]
    fn het_residues_report_parent_letter_and_are_not_proper() {
        let mse = AminoAcid::from_het_code("mse").unwrap();
        assert_eq!(mse, AminoAcid::Het("MSE".to_string()));
        assert_eq!(mse.letter(), 'M');
        assert_eq!(mse.code(), "MSE");
        assert!(!mse.is_proper());

        let ligand = AminoAcid::from_het_code("HOH").unwrap();
        assert_eq!(ligand.letter(), 'X');
        assert!(AminoAcid::from_het_code("TOOLONG").is_err());
        assert!(AminoAcid::from_het_code("A-B").is_err());
    }

    #[test]
    fn classification_predicates() {
        assert!(AminoAcid::Unknown.is_unknown());
        assert!(AminoAcid::Unknown.is_proper());
        assert!(AminoAcid::NonStandard(NonStandardAminoAcid::Glx).is_non_standard_variant());
        assert!(!AminoAcid::Standard(StandardAminoAcid::Lysine).is_non_standard_variant());
    }

    #[test]
    fn from_str_accepts_letters_and_codes() {
        assert_eq!(
            "W".parse::<AminoAcid>(),
            Ok(AminoAcid::Standard(StandardAminoAcid::Tryptophan))
        );
        assert_eq!(
            "trp".parse::<AminoAcid>(),
            Ok(AminoAcid::Standard(StandardAminoAcid::Tryptophan))
        );
        assert!("??".parse::<AminoAcid>().is_err());
    }
}
