//! Framed trace file reader (§4.1).
//!
//! Scans a file for `@SYM_EXEC_EXTRACTOR_BEGIN`/`_END` sentinel lines and
//! hands each framed body to the tree decoder. A parse error on one block
//! discards that block only; a file-level I/O error discards the whole
//! file. Neither propagates past this module — the driver never aborts a
//! run over one bad file.

use std::fs;
use std::path::Path;

use tracing::warn;

use super::decoder::decode_forest;
use super::tree::ExecTree;

const SIG_BEGIN: &str = "@SYM_EXEC_EXTRACTOR_BEGIN";
const SIG_END: &str = "@SYM_EXEC_EXTRACTOR_END";

/// Reads `path` and decodes every framed block into its constituent
/// execution trees. Returns an empty forest (with a logged warning) on
/// any I/O failure.
pub fn read_trace_file(path: &Path, max_frame_bytes: u64) -> Vec<ExecTree> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read trace file");
            return Vec::new();
        }
    };

    let mut forest = Vec::new();
    let mut in_block = false;
    let mut body = String::new();

    for line in contents.lines() {
        if line.starts_with(SIG_BEGIN) {
            in_block = true;
            body.clear();
        } else if in_block {
            if line.starts_with(SIG_END) {
                in_block = false;
                if body.len() as u64 > max_frame_bytes {
                    warn!(
                        path = %path.display(),
                        bytes = body.len(),
                        limit = max_frame_bytes,
                        "frame body too large, skipped"
                    );
                    continue;
                }
                forest.extend(decode_forest(&body, path));
            } else {
                body.push_str(line);
                body.push('\n');
            }
        }
    }

    forest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_empty_forest() {
        let trees = read_trace_file(Path::new("/nonexistent/path.as"), 1024);
        assert!(trees.is_empty());
    }

    #[test]
    fn oversized_block_is_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{SIG_BEGIN}").unwrap();
        writeln!(file, "{}", "x".repeat(200)).unwrap();
        writeln!(file, "{SIG_END}").unwrap();
        let trees = read_trace_file(file.path(), 100);
        assert!(trees.is_empty());
    }
}
