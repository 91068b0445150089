use std::fmt;
use std::fmt::Write as _;

use tracing::debug;

use super::codec;
use super::dataset::TokenSet;
use super::hue::{self, DEFAULT_TOLERANCE};
use super::ranker;
use crate::error::ServerError;

/// Prefix that turns a token key into its CSS custom property name.
pub const VARIABLE_PREFIX: &str = "--spectrum-";

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Hue,
    Name,
    Color,
    Unknown(String),
}

impl From<&str> for QueryKind {
    fn from(s: &str) -> Self {
        match s {
            "hue" => Self::Hue,
            "name" => Self::Name,
            "color" => Self::Color,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hue => f.write_str("hue"),
            Self::Name => f.write_str("name"),
            Self::Color => f.write_str("color"),
            Self::Unknown(kind) => f.write_str(kind),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Query<'q> {
    pub kind: QueryKind,
    pub value: &'q str,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub name: String,
    pub value: String,
    /// Only set for color queries.
    pub similarity: Option<u8>,
}

impl Query<'_> {
    /// Run the query against the dataset. Only a malformed color input is an
    /// error; an unknown kind simply matches nothing.
    pub fn run(&self, tokens: &TokenSet) -> Result<Vec<Match>, ServerError> {
        let matches = match &self.kind {
            QueryKind::Hue => self.by_hue(tokens),
            QueryKind::Name => self.by_name(tokens),
            QueryKind::Color => self.by_color(tokens)?,
            QueryKind::Unknown(kind) => {
                debug!(kind = %kind, "unknown query kind");
                Vec::new()
            }
        };
        debug!(kind = %self.kind, value = %self.value, matches = matches.len(), "query");
        Ok(matches)
    }

    fn by_hue(&self, tokens: &TokenSet) -> Vec<Match> {
        let target = hue::classify(self.value);
        tokens
            .iter()
            .filter(|(_, token)| hue::matches_hue(token, target, DEFAULT_TOLERANCE))
            .take(self.limit)
            .map(|(name, token)| Match {
                name: format!("{VARIABLE_PREFIX}{name}"),
                value: token.light_value().unwrap_or("unknown").to_string(),
                similarity: None,
            })
            .collect()
    }

    fn by_name(&self, tokens: &TokenSet) -> Vec<Match> {
        let pattern = self.value.to_lowercase();
        tokens
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&pattern))
            .take(self.limit)
            .map(|(name, token)| Match {
                name: name.to_string(),
                value: token.light_value().unwrap_or("unknown").to_string(),
                similarity: None,
            })
            .collect()
    }

    fn by_color(&self, tokens: &TokenSet) -> Result<Vec<Match>, ServerError> {
        let input = codec::parse_input_hex(self.value)?;
        let hsl = input.to_hsl();
        debug!(input = %input, h = hsl.h, s = hsl.s, l = hsl.l, "color query");
        Ok(ranker::rank(input, tokens, self.limit)
            .into_iter()
            .map(|r| Match {
                name: format!("{VARIABLE_PREFIX}{}", r.name),
                value: r.value.to_string(),
                similarity: Some(ranker::similarity(r.distance)),
            })
            .collect())
    }

    /// Numbered listing of the matches, or a single "no matches" line.
    pub fn render(&self, matches: &[Match]) -> String {
        if matches.is_empty() {
            return format!("No tokens found matching {} = {}", self.kind, self.value);
        }

        let mut out = format!("Found {} matching tokens:\n\n", matches.len());
        for (i, m) in matches.iter().enumerate() {
            let _ = write!(out, "{}. {}: {}", i + 1, m.name, m.value);
            if let Some(similarity) = m.similarity {
                let _ = write!(out, " (Match: {similarity}%)");
            }
            out.push('\n');
        }
        out
    }
}
