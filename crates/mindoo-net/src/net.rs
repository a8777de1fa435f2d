//! Low-level net text format.
//!
//! A net file is free header text followed by sections introduced by a
//! marker line. Place and transition records look like
//! `<optional-id>"<name>"<trailer>`; the remaining sections hold arc
//! records whose meaning belongs to the unfolder, so they are kept as raw
//! text.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::errors::NetError;
use crate::marking::Marking;

/// The fixed sections of a low-level net, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Places,
    Transitions,
    ReadArcs,
    ResetArcs,
    PostArcs,
    PreArcs,
    ReadSets,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Places,
        Section::Transitions,
        Section::ReadArcs,
        Section::ResetArcs,
        Section::PostArcs,
        Section::PreArcs,
        Section::ReadSets,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Section::Places => "PL",
            Section::Transitions => "TR",
            Section::ReadArcs => "RT",
            Section::ResetArcs => "RD",
            Section::PostArcs => "TP",
            Section::PreArcs => "PT",
            Section::ReadSets => "RS",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|s| s.marker() == marker)
    }

    fn is_arc_section(self) -> bool {
        !matches!(self, Section::Places | Section::Transitions)
    }
}

/// A place record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub id: u32,
    pub name: String,
    /// Whether the place belongs to the initial marking.
    pub initial: bool,
    /// Trailer text before the marking token.
    trailer_head: String,
    /// Trailer text after the marking token.
    trailer_tail: String,
}

impl Place {
    fn render(&self) -> String {
        format!(
            "{}\"{}\"{}M{}{}",
            self.id,
            self.name,
            self.trailer_head,
            u8::from(self.initial),
            self.trailer_tail
        )
    }
}

/// A transition record. Only the id and name are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub id: u32,
    pub name: String,
    pub record: String,
}

/// A section whose marker this crate does not know, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraSection {
    pub marker: String,
    /// Raw lines, blank ones included, without their line terminator.
    pub records: Vec<String>,
    /// Known section it followed in the source; it is written back there.
    pub after: Section,
}

/// In-memory low-level net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    header: String,
    places: IndexMap<String, Place>,
    transitions: Vec<Transition>,
    arcs: BTreeMap<Section, Vec<String>>,
    extra: Vec<ExtraSection>,
}

#[derive(Clone, Copy)]
enum ParseState {
    Header,
    Known(Section),
    Extra(usize),
}

impl Net {
    /// Resolve a net path, trying `<path>.ll_net` and `<path>.ll` when the
    /// path itself does not exist.
    pub fn resolve_path(path: &Path) -> Result<PathBuf, NetError> {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        for ext in ["ll_net", "ll"] {
            let mut candidate = path.as_os_str().to_owned();
            candidate.push(".");
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(NetError::NotFound {
            path: path.display().to_string(),
        })
    }

    /// Read and parse a net file.
    pub fn read(path: &Path) -> Result<Self, NetError> {
        let source = std::fs::read_to_string(path).map_err(|source| NetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source, &path.display().to_string())
    }

    /// Parse net text. `filename` is only used in diagnostics.
    pub fn parse(source: &str, filename: &str) -> Result<Self, NetError> {
        let mut net = Net {
            header: String::new(),
            places: IndexMap::new(),
            transitions: Vec::new(),
            arcs: BTreeMap::new(),
            extra: Vec::new(),
        };
        let mut seen = HashSet::new();
        let mut state = ParseState::Header;
        let mut last_known = Section::Places;
        let mut place_id = 0u32;
        let mut transition_id = 0u32;
        let mut offset = 0usize;

        for (index, raw) in source.split_inclusive('\n').enumerate() {
            let line_no = index + 1;
            let line_start = offset;
            offset += raw.len();
            let record = raw.trim();

            if let Some(section) = Section::from_marker(record) {
                seen.insert(section);
                last_known = section;
                state = ParseState::Known(section);
                continue;
            }

            match state {
                ParseState::Header => {
                    net.header.push_str(raw);
                    continue;
                }
                _ if is_extra_marker(record) => {
                    net.extra.push(ExtraSection {
                        marker: record.to_string(),
                        records: Vec::new(),
                        after: last_known,
                    });
                    state = ParseState::Extra(net.extra.len() - 1);
                    continue;
                }
                ParseState::Known(_) if record.is_empty() => continue,
                _ => {}
            }

            let located = |message: String| {
                NetError::malformed(
                    state_marker(state),
                    message,
                    line_no,
                    line_start,
                    raw.trim_end().len(),
                    source,
                    filename,
                )
            };

            match state {
                ParseState::Header => unreachable!("header lines are consumed above"),
                ParseState::Known(Section::Places) => {
                    let (id, name, trailer) = split_record(record).map_err(located)?;
                    place_id = next_id(id, place_id).map_err(located)?;
                    if net.places.contains_key(name) {
                        return Err(NetError::DuplicatePlace {
                            name: name.to_string(),
                            file: filename.to_string(),
                            line: line_no,
                            span: (line_start, raw.trim_end().len()).into(),
                            src: miette::NamedSource::new(filename, source.to_owned()),
                        });
                    }
                    let (initial, trailer_head, trailer_tail) = split_marking_token(trailer);
                    net.places.insert(
                        name.to_string(),
                        Place {
                            id: place_id,
                            name: name.to_string(),
                            initial,
                            trailer_head,
                            trailer_tail,
                        },
                    );
                }
                ParseState::Known(Section::Transitions) => {
                    let (id, name, _) = split_record(record).map_err(located)?;
                    transition_id = next_id(id, transition_id).map_err(located)?;
                    net.transitions.push(Transition {
                        id: transition_id,
                        name: name.to_string(),
                        record: record.to_string(),
                    });
                }
                ParseState::Known(section) => {
                    net.arcs
                        .entry(section)
                        .or_default()
                        .push(record.to_string());
                }
                ParseState::Extra(slot) => {
                    let line = raw.strip_suffix('\n').unwrap_or(raw);
                    net.extra[slot].records.push(line.to_string());
                }
            }
        }

        for required in [Section::Places, Section::Transitions] {
            if !seen.contains(&required) {
                return Err(NetError::MissingSection {
                    section: required.marker().to_string(),
                    file: filename.to_string(),
                });
            }
        }
        Ok(net)
    }

    /// Serialize the net: header verbatim, then every section under its
    /// marker in fixed order. Unknown sections follow the known section
    /// they followed in the source, with their lines untouched.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(self.to_text().as_bytes())
    }

    pub fn to_text(&self) -> String {
        let mut out = self.header.clone();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        for section in Section::ALL {
            let _ = writeln!(out, "{}", section.marker());
            match section {
                Section::Places => {
                    for place in self.places.values() {
                        let _ = writeln!(out, "{}", place.render());
                    }
                }
                Section::Transitions => {
                    for transition in &self.transitions {
                        let _ = writeln!(out, "{}", transition.record);
                    }
                }
                _ => {
                    for record in self.records(section) {
                        let _ = writeln!(out, "{record}");
                    }
                }
            }
            for extra in self.extra.iter().filter(|x| x.after == section) {
                let _ = writeln!(out, "{}", extra.marker);
                for record in &extra.records {
                    let _ = writeln!(out, "{record}");
                }
            }
        }
        out
    }

    /// Overwrite every place's initial-marking flag with membership in
    /// `names`. Ids, names and arcs are untouched.
    pub fn set_marking<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let marked: HashSet<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        for (name, place) in self.places.iter_mut() {
            place.initial = marked.contains(name);
        }
    }

    pub fn initial_marking(&self) -> Marking {
        self.places
            .values()
            .filter(|p| p.initial)
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn place(&self, name: &str) -> Option<&Place> {
        self.places.get(name)
    }

    pub fn has_place(&self, name: &str) -> bool {
        self.places.contains_key(name)
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.places.values()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Raw records of an arc section. Place and transition sections have
    /// no raw records and yield an empty slice.
    pub fn records(&self, section: Section) -> &[String] {
        if !section.is_arc_section() {
            return &[];
        }
        self.arcs.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn extra_sections(&self) -> &[ExtraSection] {
        &self.extra
    }
}

fn state_marker(state: ParseState) -> &'static str {
    match state {
        ParseState::Header => "header",
        ParseState::Known(section) => section.marker(),
        ParseState::Extra(_) => "unknown",
    }
}

/// Two uppercase ASCII letters on their own line open an unknown section.
fn is_extra_marker(record: &str) -> bool {
    record.len() == 2 && record.bytes().all(|b| b.is_ascii_uppercase())
}

/// Split `<id>"<name>"<trailer>` into its three parts.
fn split_record(record: &str) -> Result<(&str, &str, &str), String> {
    let open = record
        .find('"')
        .ok_or_else(|| "missing quoted name".to_string())?;
    let rest = &record[open + 1..];
    let close = rest
        .find('"')
        .ok_or_else(|| "unterminated quoted name".to_string())?;
    Ok((record[..open].trim(), &rest[..close], &rest[close + 1..]))
}

/// Unlabeled records continue from the previous record's id.
fn next_id(label: &str, previous: u32) -> Result<u32, String> {
    if label.is_empty() {
        return previous
            .checked_add(1)
            .ok_or_else(|| format!("record id overflows after {previous}"));
    }
    label
        .parse::<u32>()
        .map_err(|_| format!("invalid record id '{label}'"))
}

/// Find the `M<n>` token of a place trailer. Returns the marking flag and
/// the trailer text around the token.
fn split_marking_token(trailer: &str) -> (bool, String, String) {
    let bytes = trailer.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'M' {
            continue;
        }
        let digits = bytes[i + 1..]
            .iter()
            .take_while(|d| d.is_ascii_digit())
            .count();
        if digits == 0 {
            continue;
        }
        let end = i + 1 + digits;
        let count: u64 = trailer[i + 1..end].parse().unwrap_or(u64::MAX);
        return (
            count >= 1,
            trailer[..i].to_string(),
            trailer[end..].to_string(),
        );
    }
    (false, trailer.to_string(), String::new())
}
