//! Symbol universe source for the stockpile equity data cacher.
//!
//! The universe is an ordered, de-duplicated sequence of ticker symbols.
//! Its order defines the iteration order of every retrieval pass.
//!
//! # Example
//!
//! ```
//! use stockpile_universe::Universe;
//!
//! let universe = Universe::builtin();
//! assert!(universe.contains("AAPL"));
//! assert!(!universe.is_empty());
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockpile-rs/stockpile/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

/// The default universe (S&P 100 constituents) embedded at compile time.
const DEFAULT_UNIVERSE: &str = include_str!("../data/default_universe.txt");

/// Global built-in universe instance.
static BUILTIN: OnceLock<Universe> = OnceLock::new();

/// Errors that can occur while loading a symbol universe.
#[derive(Error, Debug)]
pub enum UniverseError {
    /// Failed to read the universe file.
    #[error("Failed to read universe file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The universe file contained no symbols.
    #[error("Universe file '{path}' contains no symbols")]
    Empty {
        /// The path of the empty file.
        path: PathBuf,
    },
}

/// An ordered, de-duplicated sequence of ticker symbols.
#[derive(Debug, Clone)]
pub struct Universe {
    symbols: Vec<String>,
}

impl Universe {
    /// Returns the built-in default universe.
    ///
    /// The list is embedded at compile time and parsed lazily on first
    /// access.
    #[must_use]
    pub fn builtin() -> &'static Self {
        BUILTIN.get_or_init(|| Self::from_lines(DEFAULT_UNIVERSE.lines()))
    }

    /// Loads a universe from a plain-text file.
    ///
    /// One symbol per line; blank lines and lines starting with `#` are
    /// ignored. Symbols are uppercased and de-duplicated, preserving the
    /// first occurrence's position.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains no symbols.
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path).map_err(|e| UniverseError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let universe = Self::from_lines(content.lines());
        if universe.is_empty() {
            return Err(UniverseError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(universe)
    }

    /// Builds a universe from an explicit symbol sequence.
    #[must_use]
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for symbol in symbols {
            let symbol = symbol.as_ref().trim().to_uppercase();
            if symbol.is_empty() {
                continue;
            }
            if seen.insert(symbol.clone()) {
                ordered.push(symbol);
            }
        }
        Self { symbols: ordered }
    }

    fn from_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        Self::from_symbols(
            lines
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Returns the symbols in iteration order.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns true if the universe contains the given symbol.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = symbol.to_uppercase();
        self.symbols.iter().any(|s| *s == symbol)
    }

    /// Returns the number of symbols in the universe.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the universe is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_universe() {
        let universe = Universe::builtin();
        assert!(universe.len() >= 100);
        assert!(universe.contains("AAPL"));
        assert!(universe.contains("aapl"));
        assert!(!universe.contains("NOTREAL"));
    }

    #[test]
    fn test_from_file_skips_comments_and_blanks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# header").unwrap();
        writeln!(file, "AAPL").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  msft  ").unwrap();
        writeln!(file, "AAPL").unwrap();

        let universe = Universe::from_file(file.path()).unwrap();
        assert_eq!(universe.symbols(), ["AAPL", "MSFT"]);
    }

    #[test]
    fn test_from_file_empty_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# only a comment").unwrap();

        assert!(matches!(
            Universe::from_file(file.path()),
            Err(UniverseError::Empty { .. })
        ));
    }

    #[test]
    fn test_from_file_missing_is_error() {
        assert!(matches!(
            Universe::from_file(Path::new("/nonexistent/universe.txt")),
            Err(UniverseError::ReadFile { .. })
        ));
    }

    #[test]
    fn test_from_symbols_preserves_first_occurrence_order() {
        let universe = Universe::from_symbols(["IBM", "GE", "ibm", "T"]);
        assert_eq!(universe.symbols(), ["IBM", "GE", "T"]);
    }
}
