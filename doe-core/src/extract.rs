//! Solver log value extraction
//!
//! Post-processing step of a DOE run: scan a solver log for `label : value`
//! lines and keep the last value reported for each requested label.

use regex::Regex;
use std::fmt;
use std::io::BufRead;

/// Placeholder reported for labels never seen in the log
pub const NOT_FOUND: &str = "*** not found ***";

const LABEL: &str = r"\w+(?::\w+)*";
const EXPONENTIAL: &str = r"-?(?:\d+\.?\d*|\.\d+)[eEdD](?:\+|-)?\d+";
const FLOAT: &str = r"-?\d+\.\d*|-?\.\d+";
const INTEGER: &str = r"-?\d+";

/// Matches `label : value` lines in solver output
#[derive(Debug, Clone)]
pub struct ValueExtractor {
    pattern: Regex,
    labels: Vec<String>,
}

/// Last value seen per label, in the order the labels were requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    values: Vec<(String, Option<String>)>,
}

impl ValueExtractor {
    /// Creates an extractor for the given labels
    ///
    /// Duplicate labels are collapsed onto their first occurrence.
    pub fn new<I, S>(labels: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pattern = Regex::new(&format!(
            r"^\s*({LABEL})\s+:\s({EXPONENTIAL}|{FLOAT}|{INTEGER})"
        ))?;

        let mut unique: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !unique.contains(&label) {
                unique.push(label);
            }
        }

        Ok(Self {
            pattern,
            labels: unique,
        })
    }

    /// Returns the labels this extractor reports on
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Parses a single line into its label and raw numeric value
    pub fn match_line<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let captures = self.pattern.captures(line)?;
        Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
    }

    /// Scans `reader` to the end, later matches overwriting earlier ones
    ///
    /// Bytes that are not valid UTF-8 are replaced, so one stray character
    /// only affects its own line.
    pub fn extract<R: BufRead>(&self, mut reader: R) -> std::io::Result<Extraction> {
        let mut values: Vec<(String, Option<String>)> =
            self.labels.iter().map(|label| (label.clone(), None)).collect();

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            let Some((label, value)) = self.match_line(line) else {
                continue;
            };
            if let Some(slot) = values.iter_mut().find(|(wanted, _)| wanted == label) {
                slot.1 = Some(value.to_string());
            }
        }

        Ok(Extraction { values })
    }
}

impl Extraction {
    /// Value recorded for `label`, `None` when absent or not requested
    pub fn get(&self, label: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(wanted, _)| wanted == label)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_deref()))
    }

    /// Whether every requested label was found
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|(_, value)| value.is_some())
    }
}

impl fmt::Display for Extraction {
    /// One `label<TAB>value` line per requested label
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.iter() {
            writeln!(f, "{}\t{}", label, value.unwrap_or(NOT_FOUND))?;
        }
        Ok(())
    }
}
