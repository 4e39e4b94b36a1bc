//! Materialised commit history: nodes, edges, and renderings for `log`.

use std::collections::HashMap;
use std::fmt::Write as _;

use pvc_store::ObjectStore;
use pvc_types::ObjectId;
use serde::Serialize;

use crate::error::DagResult;
use crate::walk::{Ancestors, Edge};

/// What `log` shows for one commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub id: ObjectId,
    pub short: String,
    /// First line of the message.
    pub summary: String,
    pub author: Option<String>,
    pub parents: Vec<ObjectId>,
}

/// The history reachable from one commit.
///
/// Commits are kept in first-seen (depth-first, first-parent-first) order.
#[derive(Clone, Debug, Default)]
pub struct HistoryGraph {
    order: Vec<ObjectId>,
    commits: HashMap<ObjectId, CommitSummary>,
    edges: Vec<Edge>,
}

impl HistoryGraph {
    /// Walk everything reachable from `head`.
    pub fn build<S: ObjectStore + ?Sized>(store: &S, head: ObjectId) -> DagResult<Self> {
        let mut graph = Self::default();
        for visit in Ancestors::new(store, head) {
            let visit = visit?;
            graph.edges.extend(visit.edges());
            let summary = CommitSummary {
                id: visit.id,
                short: visit.id.short_hex(),
                summary: visit.commit.summary(),
                author: visit.commit.author().map(|a| a.into_owned()),
                parents: visit.parents,
            };
            graph.order.push(visit.id);
            graph.commits.insert(visit.id, summary);
        }
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn get(&self, id: &ObjectId) -> Option<&CommitSummary> {
        self.commits.get(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.commits.contains_key(id)
    }

    /// Commits in first-seen order, at most `limit` of them.
    pub fn linear_history(&self, limit: Option<usize>) -> Vec<&CommitSummary> {
        self.order
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .filter_map(|id| self.commits.get(id))
            .collect()
    }

    /// Render as a Graphviz digraph, one labelled node per commit and one
    /// arrow per parent link.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pvclog{\n  node[shape=rect]\n");
        for id in &self.order {
            let Some(commit) = self.commits.get(id) else {
                continue;
            };
            let _ = writeln!(
                out,
                "  c_{id} [label=\"{}: {}\"]",
                commit.short,
                escape_label(&commit.summary)
            );
            for parent in &commit.parents {
                let _ = writeln!(out, "  c_{id} -> c_{parent};");
            }
        }
        out.push_str("}\n");
        out
    }
}

fn escape_label(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
