//! Structural checks run on the enumerated path set before any analysis.

use crate::error::TimingError;
use crate::path::Path;
use std::fmt;

/// A structural rule every completed path must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRule {
    /// No hop goes through a flip-flop.
    Combinational,
    /// Each hop starts on the net the previous hop ended on.
    Contiguity,
    /// The first hop starts on the launch net and the last ends on the
    /// capture net; an empty path has a single net for both.
    Anchoring,
}

impl fmt::Display for PathRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathRule::Combinational => f.write_str("combinational"),
            PathRule::Contiguity => f.write_str("contiguity"),
            PathRule::Anchoring => f.write_str("anchoring"),
        }
    }
}

/// Checks one path, returning the first broken rule and a description.
pub fn check_path(path: &Path<'_>) -> Result<(), (PathRule, String)> {
    if let Some((i, hop)) = path
        .hops()
        .iter()
        .enumerate()
        .find(|(_, hop)| hop.cell().is_sequential())
    {
        return Err((
            PathRule::Combinational,
            format!("hop {i} passes through flip-flop {}", hop.cell().id()),
        ));
    }

    for (i, pair) in path.hops().windows(2).enumerate() {
        if pair[0].output_net() != pair[1].input_net() {
            return Err((
                PathRule::Contiguity,
                format!(
                    "hop {i} ends on net {} but hop {} starts on net {}",
                    pair[0].output_net(),
                    i + 1,
                    pair[1].input_net()
                ),
            ));
        }
    }

    let launch = path.launch().net();
    let capture = path.capture().net();
    let (first, last) = match (path.hops().first(), path.hops().last()) {
        (Some(first), Some(last)) => (first.input_net(), last.output_net()),
        _ => (capture, launch),
    };
    if first != launch || last != capture {
        return Err((
            PathRule::Anchoring,
            format!(
                "path runs from net {first} to net {last} but is bounded by nets {launch} and {capture}"
            ),
        ));
    }
    Ok(())
}

/// Checks every path, failing with [`TimingError::InvalidPath`] on the first
/// violation.
pub fn validate_paths(paths: &[Path<'_>]) -> Result<(), TimingError> {
    for (index, path) in paths.iter().enumerate() {
        check_path(path).map_err(|(rule, detail)| TimingError::InvalidPath {
            index,
            rule,
            detail,
        })?;
    }
    Ok(())
}
