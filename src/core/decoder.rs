//! Iterative decoder for one framed trace block's hierarchical document.
//!
//! The document's `NODE`/`EVENT`/`KIND` shape is pulled with `quick-xml`'s
//! event-based reader rather than a DOM, and the resulting `ExecTree`s are
//! built with an explicit stack (never recursion) because the upstream
//! extractor is known to emit documents nested far past any reasonable
//! default stack limit (§4.2/§9).

use quick_xml::events::Event as XmlEvent;
use quick_xml::reader::Reader;
use tracing::warn;

use crate::errors::TraceError;
use crate::expr;
use crate::model::{Event, EventKind, Symbol};

use super::tree::{ExecNode, ExecTree};

/// One open `NODE` frame while the arena is being built.
struct NodeFrame {
    event: Option<Event>,
    children: Vec<usize>,
}

/// Payload accumulated for the single `EVENT` a `NODE` frame owns.
#[derive(Default)]
struct EventFields {
    kind: Option<String>,
    call: Option<String>,
    code: Option<String>,
    loc: Option<String>,
    typ: Option<String>,
    cond: Option<String>,
}

impl EventFields {
    fn finalize(self, path: &std::path::Path) -> Result<Event, TraceError> {
        let kind = self.kind.ok_or_else(|| TraceError::Event {
            path: path.to_path_buf(),
            tag: "EVENT (missing KIND)".into(),
        })?;
        match kind.as_str() {
            "@LOG_CALL" => {
                let call_text = self.call.unwrap_or_default();
                let code = self.code.unwrap_or_default();
                let symbol = expr::parse(&call_text);
                Ok(Event::new(EventKind::Call { code }, symbol))
            }
            "@LOG_LOCATION" => {
                let loc_text = self.loc.unwrap_or_default();
                let typ = self.typ.unwrap_or_default();
                let code = self.code.unwrap_or_default();
                let symbol = expr::parse(&loc_text);
                Ok(Event::new(EventKind::Location { typ, code }, symbol))
            }
            "@LOG_EOP" => Ok(Event::new(EventKind::EndOfPath, Symbol::Unknown)),
            "@LOG_ASSUME" => {
                let cond_text = self.cond.unwrap_or_default();
                let symbol = expr::parse(&cond_text);
                Ok(Event::new(EventKind::Assume, symbol))
            }
            other => Err(TraceError::Event { path: path.to_path_buf(), tag: other.to_string() }),
        }
    }
}

/// Decodes every top-level `NODE` in `body` into an `ExecTree`, running
/// constraint propagation on each before returning it. A `NODE` subtree
/// that fails to decode (unknown tag, malformed payload) is dropped —
/// only that tree is lost, not the rest of the forest in this block.
pub fn decode_forest(body: &str, path: &std::path::Path) -> Vec<ExecTree> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut forest = Vec::new();
    // Stack of open NODE frames (arena index -> frame), plus the flat
    // arena of finished nodes being assembled for the tree currently open.
    let mut open_nodes: Vec<NodeFrame> = Vec::new();
    let mut arena: Vec<ExecNode> = Vec::new();
    let mut event_fields: Vec<EventFields> = Vec::new();
    let mut current_tag: Vec<String> = Vec::new();
    let mut tree_failed = false;

    loop {
        match reader.read_event() {
            Ok(XmlEvent::Eof) => break,
            Ok(XmlEvent::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "NODE" => {
                        open_nodes.push(NodeFrame { event: None, children: Vec::new() });
                    }
                    "EVENT" => {
                        event_fields.push(EventFields::default());
                    }
                    "KIND" | "CALL" | "CODE" | "LOC" | "TYPE" | "COND" => {
                        current_tag.push(name);
                    }
                    other => {
                        // A tag opening while no NODE is open isn't inside
                        // any tree yet — it's the document's own wrapping
                        // root element (or another top-level structural
                        // tag around the NODE forest), not an unknown tag
                        // within a tree, so it must not poison the next
                        // tree that closes.
                        if !open_nodes.is_empty() {
                            warn!(path = %path.display(), tag = other, "unknown tag, dropping tree");
                            tree_failed = true;
                        }
                    }
                }
            }
            Ok(XmlEvent::Text(t)) => {
                if let Some(tag) = current_tag.last() {
                    if let Some(fields) = event_fields.last_mut() {
                        let text = t.unescape().unwrap_or_default().to_string();
                        match tag.as_str() {
                            "KIND" => fields.kind = Some(text),
                            "CALL" => fields.call = Some(text),
                            "CODE" => fields.code = Some(text),
                            "LOC" => fields.loc = Some(text),
                            "TYPE" => fields.typ = Some(text),
                            "COND" => fields.cond = Some(text),
                            _ => {}
                        }
                    }
                }
            }
            Ok(XmlEvent::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "KIND" | "CALL" | "CODE" | "LOC" | "TYPE" | "COND" => {
                        current_tag.pop();
                    }
                    "EVENT" => {
                        let fields = event_fields.pop().unwrap_or_default();
                        match fields.finalize(path) {
                            Ok(event) => {
                                if let Some(frame) = open_nodes.last_mut() {
                                    frame.event = Some(event);
                                }
                            }
                            Err(err) => {
                                warn!(path = %path.display(), error = %err, "dropping tree");
                                tree_failed = true;
                            }
                        }
                    }
                    "NODE" => {
                        let frame = match open_nodes.pop() {
                            Some(f) => f,
                            None => continue,
                        };
                        let event = match frame.event {
                            Some(ev) => ev,
                            None => {
                                warn!(path = %path.display(), "NODE with no EVENT, dropping tree");
                                tree_failed = true;
                                Event::new(EventKind::EndOfPath, Symbol::Unknown)
                            }
                        };
                        let mut node = ExecNode::new(event);
                        node.children = frame.children;
                        let id = arena.len();
                        arena.push(node);

                        if let Some(parent) = open_nodes.last_mut() {
                            parent.children.push(id);
                        } else {
                            // Top-level NODE closed: finalize or discard this tree.
                            if !tree_failed && !arena.is_empty() {
                                let mut tree = ExecTree::new(
                                    std::mem::take(&mut arena),
                                    id,
                                );
                                tree.propagate_constraints();
                                forest.push(tree);
                            } else {
                                arena.clear();
                            }
                            tree_failed = false;
                        }
                    }
                    _ => {}
                }
            }
            Ok(_) => {}
            Err(err) => {
                warn!(path = %path.display(), error = %err, "malformed document body");
                break;
            }
        }
    }

    forest
}
