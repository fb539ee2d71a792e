//! The driver: walks an input directory, decodes every trace file,
//! processes each tree with the selected checker, and merges results
//! (§4.8, §5).

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::checkers::{
    args::ArgChecker, causality::CausalityChecker, condition::CondChecker, fsb::FsbChecker,
    intovfl::IntOvflChecker, process_tree, retval::RetValChecker, CheckerImpl, CheckerKind,
};
use crate::config::model::Config;
use crate::core::trace_reader::read_trace_file;
use crate::model::BugReport;

/// Recursively collects every `.as` file under `root`, matching §6's
/// "only files with suffix `.as` are consumed".
fn scan_trace_files(root: &Path) -> Vec<std::path::PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "as"))
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Runs `kind` over every `.as` file under `root`, sequentially or across
/// a worker pool sized to the CPU count depending on `config.parallel`.
/// Parallelism boundary is file-level; trees within one file are always
/// processed sequentially by whichever worker owns that file.
pub fn explore(root: &Path, kind: CheckerKind, config: &Config) -> Vec<BugReport> {
    let files = scan_trace_files(root);
    info!(count = files.len(), dir = %root.display(), "scanning trace files");

    macro_rules! run {
        ($checker:ty) => {{
            let per_file = |path: std::path::PathBuf| -> Vec<<$checker as CheckerImpl>::Ctx> {
                let trees = read_trace_file(&path, config.max_frame_bytes);
                debug!(file = %path.display(), trees = trees.len(), "decoded file");
                trees.iter().map(|t| process_tree::<$checker>(t)).collect()
            };
            let ctxs: Vec<<$checker as CheckerImpl>::Ctx> = if config.parallel {
                files.into_par_iter().flat_map(per_file).collect()
            } else {
                files.into_iter().flat_map(per_file).collect()
            };
            let n = ctxs.len();
            let bugs = <$checker>::merge(ctxs, config);
            info!(trees = n, bugs = bugs.len(), checker = kind.name(), "run complete");
            bugs
        }};
    }

    match kind {
        CheckerKind::RetVal => run!(RetValChecker),
        CheckerKind::Causality => run!(CausalityChecker),
        CheckerKind::Condition => run!(CondChecker),
        CheckerKind::Fsb => run!(FsbChecker),
        CheckerKind::Args => run!(ArgChecker),
        CheckerKind::IntOvfl => run!(IntOvflChecker),
    }
}
