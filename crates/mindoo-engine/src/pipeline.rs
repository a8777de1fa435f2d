use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, Level};

use mindoo_asp::facts::render_facts;
use mindoo_asp::solver::AspSolver;
use mindoo_asp::symbol::Symbol;
use mindoo_net::marking::{BadMarkings, Marking};
use mindoo_net::mci::PrefixHeader;
use mindoo_net::net::Net;

use crate::errors::EngineError;
use crate::oracle::DoomOracle;
use crate::pi1;
use crate::poset::EventPoset;
use crate::report::{results_file, DoomReport, MindooRecord};
use crate::rules::RuleSet;
use crate::search::{self, MinimalDoomed, PopOrder, SearchState};
use crate::workspace::{Toolchain, Workspace};

/// Where the bad markings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadSource {
    /// One comma-separated marking.
    Spec(String),
    /// One marking per line.
    File(PathBuf),
}

impl BadSource {
    pub fn load(&self) -> Result<BadMarkings, EngineError> {
        Ok(match self {
            BadSource::Spec(spec) => BadMarkings::from_spec(spec)?,
            BadSource::File(path) => BadMarkings::from_file(path)?,
        })
    }
}

/// Options for the doom search.
#[derive(Debug, Clone)]
pub struct DoomOptions {
    /// Parent of the run-keyed output directory.
    pub out_root: PathBuf,
    pub rules_dir: PathBuf,
    pub toolchain: Toolchain,
    pub pop_order: PopOrder,
}

impl Default for DoomOptions {
    fn default() -> Self {
        Self {
            out_root: PathBuf::from("gen"),
            rules_dir: PathBuf::from("rules"),
            toolchain: Toolchain::default(),
            pop_order: PopOrder::Fifo,
        }
    }
}

impl DoomOptions {
    pub fn rules(&self) -> RuleSet {
        RuleSet::new(&self.rules_dir)
    }
}

/// Resolve and parse a net.
pub fn load_net(path: &Path) -> Result<(PathBuf, Net), EngineError> {
    let resolved = Net::resolve_path(path)?;
    let net = Net::read(&resolved)?;
    info!(
        net = %resolved.display(),
        places = net.places().count(),
        transitions = net.transitions().len(),
        "net loaded"
    );
    Ok((resolved, net))
}

/// Main prefix of a net, unfolded and translated in a fresh workspace.
#[derive(Debug, Clone)]
pub struct MainPrefix {
    pub workspace: Workspace,
    pub facts: String,
    pub header: PrefixHeader,
}

impl MainPrefix {
    pub fn build(net_path: &Path, net: &Net, options: &DoomOptions) -> Result<Self, EngineError> {
        let workspace = Workspace::create(&options.out_root, net_path, options.toolchain.clone())?;
        let mci = workspace.build_prefix(net, "main.mci", Level::INFO)?;
        let header = PrefixHeader::read(&mci)?;
        info!("Prefix has {} events, including cut-offs", header.events);
        let facts = workspace.translate(&mci, None)?;
        workspace.write_artifact("prefix.asp", &facts)?;
        Ok(Self {
            workspace,
            facts,
            header,
        })
    }
}

/// `bad("p").` for every place of the bad marking.
pub fn bad_facts(bad: &Marking) -> String {
    let facts: Vec<Symbol> = bad
        .iter()
        .map(|p| Symbol::function("bad", vec![Symbol::string(p)]))
        .collect();
    render_facts(&facts)
}

/// Run the whole doom search on `net_path`.
///
/// Input and rule files are checked before any tool runs. `on_found` is
/// called with a 1-based index as soon as each minimal doomed
/// configuration is found.
pub fn run_doom_search<S, F>(
    net_path: &Path,
    bad: &BadSource,
    options: &DoomOptions,
    solver: &mut S,
    mut on_found: F,
) -> Result<DoomReport, EngineError>
where
    S: AspSolver,
    F: FnMut(usize, &MinimalDoomed),
{
    let (net_path, mut net) = load_net(net_path)?;
    let bad_markings = bad.load()?;
    bad_markings.validate(&net)?;
    let bad = bad_markings.single()?;
    let rules = options.rules();
    rules.check()?;

    let MainPrefix {
        mut workspace,
        facts: prefix,
        header,
    } = MainPrefix::build(&net_path, &net, options)?;
    let bad_path = workspace.write_artifact("bad.asp", &bad_facts(bad))?;

    let poset = EventPoset::extract(solver, &rules, &prefix)?;
    info!(
        "Unchallenged events: {}",
        poset
            .unchallenged()
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let pi1 = pi1::extend(solver, &mut workspace, &rules, &mut net, &prefix)?;
    let pi1_path = workspace.write_artifact("pi1.asp", &pi1.facts)?;

    let seeds = search::minimal_bad_configurations(solver, &rules, &prefix, &bad_path)?;
    info!(seeds = seeds.len(), "minimal bad configurations");
    let mut state = SearchState::new(options.pop_order);
    search::seed(&mut state, &poset, &seeds);

    let started = Instant::now();
    let mut oracle = DoomOracle::ground(solver, &rules, &bad_path, &pi1_path)?;
    let grounding_secs = started.elapsed().as_secs_f64();

    let mut index = 0;
    let found = search::run(&poset, &mut oracle, &mut state, started, |m| {
        index += 1;
        on_found(index, m);
    })?;
    info!(found = found.len(), doom_checks = oracle.queries(), "search finished");

    workspace.write_artifact("mindoo.txt", &results_file(&found))?;
    let report = DoomReport {
        net: net_path.display().to_string(),
        bad_places: bad.iter().map(str::to_string).collect(),
        output_dir: workspace.dir().display().to_string(),
        prefix_events: header.events,
        unchallenged: poset.unchallenged().len(),
        maximal_configurations: pi1.configurations,
        continuations: pi1.continuations,
        seeds: seeds.len(),
        grounding_secs,
        doom_checks: oracle.queries(),
        mindoos: found
            .iter()
            .enumerate()
            .map(|(i, m)| MindooRecord::new(i + 1, m))
            .collect(),
    };
    let json = report
        .to_json()
        .map_err(|e| EngineError::Contract(format!("cannot serialize report: {e}")))?;
    workspace.write_artifact("report.json", &json)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_facts_list_the_marking() {
        let bad: Marking = ["p2", "p1"].into_iter().collect();
        assert_eq!(bad_facts(&bad), "bad(\"p1\").\nbad(\"p2\").\n");
    }

    #[test]
    fn default_options_match_conventional_layout() {
        let options = DoomOptions::default();
        assert_eq!(options.out_root, PathBuf::from("gen"));
        assert_eq!(options.toolchain.unfolder, "ecofolder");
        assert_eq!(options.toolchain.translator, "mci2asp");
        assert_eq!(options.pop_order, PopOrder::Fifo);
        assert_eq!(options.rules().dir(), Path::new("rules"));
    }

    #[test]
    fn bad_source_spec_and_file_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "p1,p2\n").unwrap();
        let from_file = BadSource::File(path).load().unwrap();
        let from_spec = BadSource::Spec("p1,p2".into()).load().unwrap();
        assert_eq!(from_file.places(), from_spec.places());
    }
}
