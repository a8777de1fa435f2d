use std::fmt::Write as _;

use serde::Serialize;

use crate::search::MinimalDoomed;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindooRecord {
    pub index: usize,
    pub events: Vec<String>,
    pub transitions: Vec<String>,
    /// Seconds since the search started, oracle grounding included.
    pub elapsed_secs: f64,
    pub doom_checks: usize,
}

impl MindooRecord {
    pub fn new(index: usize, found: &MinimalDoomed) -> Self {
        Self {
            index,
            events: found.events.iter().map(|e| e.to_string()).collect(),
            transitions: found.transitions.clone(),
            elapsed_secs: found.elapsed.as_secs_f64(),
            doom_checks: found.queries,
        }
    }
}

/// Summary of one doom search, written as `report.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoomReport {
    pub net: String,
    pub bad_places: Vec<String>,
    pub output_dir: String,
    /// Events of the main prefix, cut-offs included.
    pub prefix_events: i32,
    pub unchallenged: usize,
    pub maximal_configurations: usize,
    pub continuations: usize,
    pub seeds: usize,
    pub grounding_secs: f64,
    pub doom_checks: usize,
    pub mindoos: Vec<MindooRecord>,
}

impl DoomReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_empty(&self) -> bool {
        self.mindoos.is_empty()
    }
}

/// Result file: one line per configuration, events then the `0` terminator.
pub fn results_file(found: &[MinimalDoomed]) -> String {
    let mut out = String::new();
    for m in found {
        for e in &m.events {
            let _ = write!(out, "{e} ");
        }
        out.push_str("0\n");
    }
    out
}

/// Progress line printed when a configuration is found.
pub fn found_line(index: usize, found: &MinimalDoomed) -> String {
    let events: Vec<String> = found.events.iter().map(|e| e.to_string()).collect();
    format!(
        "{:.1} [MINDOO {index}]\t{{{}}}\t[{}]",
        found.elapsed.as_secs_f64(),
        found.transitions.join(", "),
        events.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventId;
    use std::time::Duration;

    fn found(events: &[&str], transitions: &[&str]) -> MinimalDoomed {
        MinimalDoomed {
            events: events.iter().map(|e| EventId::parse(e).unwrap()).collect(),
            transitions: transitions.iter().map(|t| t.to_string()).collect(),
            elapsed: Duration::from_millis(1300),
            queries: 7,
        }
    }

    #[test]
    fn results_file_terminates_lines_with_zero() {
        let text = results_file(&[
            found(&["(h1,t0)", "(h2,t1)"], &["t0", "t1"]),
            found(&["(h3,t2)"], &["t2"]),
        ]);
        assert_eq!(text, "(h1,t0) (h2,t1) 0\n(h3,t2) 0\n");
        assert_eq!(results_file(&[]), "");
    }

    #[test]
    fn found_line_shows_time_transitions_and_events() {
        let line = found_line(2, &found(&["e1", "e2"], &["a", "b"]));
        assert_eq!(line, "1.3 [MINDOO 2]\t{a, b}\t[e1, e2]");
    }

    #[test]
    fn report_serializes_records() {
        let report = DoomReport {
            net: "n.ll".into(),
            bad_places: vec!["p1".into()],
            output_dir: "gen/n".into(),
            prefix_events: 3,
            unchallenged: 1,
            maximal_configurations: 1,
            continuations: 0,
            seeds: 1,
            grounding_secs: 0.5,
            doom_checks: 7,
            mindoos: vec![MindooRecord::new(1, &found(&["e1"], &["t0"]))],
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["mindoos"][0]["events"][0], "e1");
        assert_eq!(json["mindoos"][0]["doom_checks"], 7);
        assert_eq!(json["prefix_events"], 3);
        assert!(!report.is_empty());
    }
}
