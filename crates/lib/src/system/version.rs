//! System version values.
//!
//! Versions are stored structurally; no ordering is defined between them.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrereleaseKind {
  Dev,
  A,
  B,
  Rc,
}

impl PrereleaseKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      PrereleaseKind::Dev => "dev",
      PrereleaseKind::A => "a",
      PrereleaseKind::B => "b",
      PrereleaseKind::Rc => "rc",
    }
  }

  fn parse(s: &str) -> Option<Self> {
    match s {
      "dev" => Some(PrereleaseKind::Dev),
      "a" => Some(PrereleaseKind::A),
      "b" => Some(PrereleaseKind::B),
      "rc" => Some(PrereleaseKind::Rc),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prerelease {
  pub kind: PrereleaseKind,
  pub number: NonZeroU32,
}

/// A system's declared version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Version {
  /// `MAJOR.MINOR.PATCH[-<kind><number>]`
  Semantic {
    major: u64,
    minor: u64,
    patch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prerelease: Option<Prerelease>,
  },
  /// The output of `command` is the version. Stored, never executed.
  Dynamic { command: String },
  /// Any other version string, kept verbatim.
  Custom { value: String },
}

impl Version {
  pub fn semantic(major: u64, minor: u64, patch: u64) -> Self {
    Version::Semantic {
      major,
      minor,
      patch,
      prerelease: None,
    }
  }

  pub fn dynamic(command: impl Into<String>) -> Self {
    Version::Dynamic { command: command.into() }
  }

  /// Parses a version string; anything that is not semantic becomes [`Version::Custom`].
  ///
  /// Accepted prerelease spellings: `-rc2` and `-rc.2` (likewise `dev`, `a`, `b`).
  pub fn parse(input: &str) -> Self {
    parse_semantic(input.trim()).unwrap_or_else(|| Version::Custom {
      value: input.to_string(),
    })
  }
}

fn parse_semantic(input: &str) -> Option<Version> {
  let (core, prerelease) = match input.split_once('-') {
    Some((core, pre)) => (core, Some(parse_prerelease(pre)?)),
    None => (input, None),
  };

  let mut parts = core.split('.');
  let major = parse_number(parts.next()?)?;
  let minor = parse_number(parts.next()?)?;
  let patch = parse_number(parts.next()?)?;
  if parts.next().is_some() {
    return None;
  }

  Some(Version::Semantic {
    major,
    minor,
    patch,
    prerelease,
  })
}

fn parse_prerelease(input: &str) -> Option<Prerelease> {
  let split = input.find(|c: char| !c.is_ascii_alphabetic())?;
  let (kind, rest) = input.split_at(split);
  let number = rest.strip_prefix('.').unwrap_or(rest);
  if !number.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }

  Some(Prerelease {
    kind: PrereleaseKind::parse(kind)?,
    number: number.parse().ok()?,
  })
}

fn parse_number(part: &str) -> Option<u64> {
  if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  part.parse().ok()
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Version::Semantic {
        major,
        minor,
        patch,
        prerelease,
      } => {
        write!(f, "{}.{}.{}", major, minor, patch)?;
        if let Some(pre) = prerelease {
          write!(f, "-{}{}", pre.kind.as_str(), pre.number)?;
        }
        Ok(())
      }
      Version::Dynamic { command } => write!(f, "$({})", command),
      Version::Custom { value } => write!(f, "{}", value),
    }
  }
}
