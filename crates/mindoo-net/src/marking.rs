//! Markings and bad-marking specifications.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::errors::MarkingError;
use crate::net::Net;

/// A set of marked place names.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marking(BTreeSet<String>);

impl Marking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, place: &str) -> bool {
        self.0.contains(place)
    }

    pub fn insert(&mut self, place: impl Into<String>) -> bool {
        self.0.insert(place.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for Marking {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Marking(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Marking {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Marking(iter.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(","))
    }
}

/// Where a bad marking came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Origin(String);

/// The designated bad markings of a run. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadMarkings {
    markings: Vec<(Marking, Origin)>,
}

impl BadMarkings {
    /// One comma-separated marking, e.g. `p1,p3`.
    pub fn from_spec(spec: &str) -> Result<Self, MarkingError> {
        let origin = format!("'{spec}'");
        let marking = parse_marking_line(spec, &origin)?;
        Ok(Self {
            markings: vec![(marking, Origin(origin))],
        })
    }

    /// One comma-separated marking per non-empty line.
    pub fn from_file(path: &Path) -> Result<Self, MarkingError> {
        let text = std::fs::read_to_string(path).map_err(|source| MarkingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut markings = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let origin = format!("{}:{}", path.display(), index + 1);
            let marking = parse_marking_line(line, &origin)?;
            markings.push((marking, Origin(origin)));
        }
        if markings.is_empty() {
            return Err(MarkingError::Empty {
                origin: path.display().to_string(),
            });
        }
        Ok(Self { markings })
    }

    /// Check every named place against the net.
    pub fn validate(&self, net: &Net) -> Result<(), MarkingError> {
        for (marking, origin) in &self.markings {
            if let Some(place) = marking.iter().find(|p| !net.has_place(p)) {
                return Err(MarkingError::UnknownPlace {
                    place: place.to_string(),
                    origin: origin.0.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn markings(&self) -> impl Iterator<Item = &Marking> {
        self.markings.iter().map(|(m, _)| m)
    }

    /// The only bad marking; an error when several were given.
    pub fn single(&self) -> Result<&Marking, MarkingError> {
        match self.markings.as_slice() {
            [(marking, _)] => Ok(marking),
            [] => Err(MarkingError::Empty {
                origin: "bad marking list".to_string(),
            }),
            [_, (_, second), ..] => Err(MarkingError::Several {
                count: self.markings.len(),
                origin: second.0.clone(),
            }),
        }
    }

    /// Union of the places of all bad markings.
    pub fn places(&self) -> BTreeSet<&str> {
        self.markings().flat_map(Marking::iter).collect()
    }

    pub fn len(&self) -> usize {
        self.markings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markings.is_empty()
    }
}

fn parse_marking_line(line: &str, origin: &str) -> Result<Marking, MarkingError> {
    let mut marking = Marking::new();
    for name in line.trim().split(',') {
        let name = name.trim();
        if name.is_empty() {
            return Err(MarkingError::EmptyPlace {
                origin: origin.to_string(),
            });
        }
        marking.insert(name);
    }
    Ok(marking)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net() -> Net {
        Net::parse("PL\n1\"p0\"M1\n\"p1\"\n\"p2\"\nTR\n1\"t0\"\n", "net.ll").unwrap()
    }

    #[test]
    fn spec_parses_comma_separated_places() {
        let bad = BadMarkings::from_spec(" p1 , p2").unwrap();
        assert_eq!(bad.len(), 1);
        let first = bad.markings().next().unwrap();
        assert_eq!(first.to_string(), "p1,p2");
        bad.validate(&net()).unwrap();
    }

    #[test]
    fn empty_place_name_is_rejected() {
        let err = BadMarkings::from_spec("p1,,p2").unwrap_err();
        assert!(matches!(err, MarkingError::EmptyPlace { .. }));
    }

    #[test]
    fn unknown_place_names_origin() {
        let bad = BadMarkings::from_spec("p1,nowhere").unwrap();
        let err = bad.validate(&net()).unwrap_err();
        match err {
            MarkingError::UnknownPlace { place, origin } => {
                assert_eq!(place, "nowhere");
                assert_eq!(origin, "'p1,nowhere'");
            }
            other => panic!("expected UnknownPlace, got {other:?}"),
        }
    }

    #[test]
    fn file_holds_one_marking_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "p1\n\np0,p2\nzz\n").unwrap();
        let bad = BadMarkings::from_file(&path).unwrap();
        assert_eq!(bad.len(), 3);
        assert_eq!(
            bad.places().into_iter().collect::<Vec<_>>(),
            vec!["p0", "p1", "p2", "zz"]
        );
        let err = bad.validate(&net()).unwrap_err();
        assert!(err.to_string().ends_with("bad.txt:4"));
    }

    #[test]
    fn single_refuses_several_markings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "p1\np0,p2\n").unwrap();
        let bad = BadMarkings::from_file(&path).unwrap();
        match bad.single().unwrap_err() {
            MarkingError::Several { count, origin } => {
                assert_eq!(count, 2);
                assert!(origin.ends_with("bad.txt:2"));
            }
            other => panic!("expected Several, got {other:?}"),
        }

        std::fs::write(&path, "\np0,p2\n").unwrap();
        let one = BadMarkings::from_file(&path).unwrap();
        assert_eq!(one.single().unwrap().to_string(), "p0,p2");
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "\n\n").unwrap();
        assert!(matches!(
            BadMarkings::from_file(&path),
            Err(MarkingError::Empty { .. })
        ));
    }
}
