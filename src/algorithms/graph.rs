//! Graph traversal: breadth-first, depth-first and Dijkstra
//!
//! Graphs are undirected and weighted. Neighbours are visited in ascending
//! node order so that every traversal is deterministic. Nodes are shown as
//! letters, so at most 26 are supported.

use crate::recorder::errors::{check_len, check_range, InputError};
use crate::recorder::Params;
use crate::snapshot::{Edge, Payload, Recorder, Role, Snapshot, Status, StepBudgetExceeded};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

pub const MAX_NODES: usize = 26;
/// Heaviest edge accepted; a path over every node still fits in a `u64`
pub const MAX_WEIGHT: u64 = 1_000_000;

pub const BFS_CODE: &[&str] = &[
    "queue = [start]; seen = {start}",
    "while queue not empty:",
    "  u = queue.pop_front()",
    "  if u == target: stop",
    "  for v in neighbours(u):",
    "    if v not in seen:",
    "      seen.add(v); parent[v] = u; queue.push(v)",
    "done",
];

pub const DFS_CODE: &[&str] = &[
    "stack = [start]",
    "while stack not empty:",
    "  u = stack.pop()",
    "  if u visited: continue",
    "  mark u visited",
    "  if u == target: stop",
    "  for v in neighbours(u), last first:",
    "    if v not visited: stack.push(v)",
    "done",
];

pub const DIJKSTRA_CODE: &[&str] = &[
    "dist[start] = 0; pq = [(0, start)]",
    "while pq not empty:",
    "  (d, u) = pq.pop_min()",
    "  if d > dist[u]: skip stale entry",
    "  if u == target: stop",
    "  for (v, w) in neighbours(u):",
    "    if dist[u] + w < dist[v]:",
    "      dist[v] = dist[u] + w; pq.push((dist[v], v))",
    "done",
];

/// Display name of a node
pub fn label(node: usize) -> char {
    char::from(b'A' + (node % MAX_NODES) as u8)
}

fn labels(nodes: impl IntoIterator<Item = usize>) -> String {
    nodes
        .into_iter()
        .map(|n| label(n).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validated graph with sorted adjacency lists
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: usize,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(usize, u64)>>,
    start: usize,
    target: Option<usize>,
}

impl Graph {
    pub fn build(
        nodes: usize,
        edges: &[Edge],
        start: usize,
        target: Option<usize>,
    ) -> Result<Self, InputError> {
        check_len("graph", nodes, MAX_NODES)?;
        let in_range = |node: usize| {
            if node < nodes {
                Ok(())
            } else {
                Err(InputError::NodeOutOfRange { node, nodes })
            }
        };
        in_range(start)?;
        if let Some(t) = target {
            in_range(t)?;
        }

        let mut adjacency = vec![Vec::new(); nodes];
        for edge in edges {
            in_range(edge.from)?;
            in_range(edge.to)?;
            check_range(
                "edge weight",
                i64::try_from(edge.weight).unwrap_or(i64::MAX),
                0,
                MAX_WEIGHT as i64,
            )?;
            adjacency[edge.from].push((edge.to, edge.weight));
            if edge.from != edge.to {
                adjacency[edge.to].push((edge.from, edge.weight));
            }
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup_by_key(|(v, _)| *v);
        }

        Ok(Graph {
            nodes,
            edges: edges.to_vec(),
            adjacency,
            start,
            target,
        })
    }

    fn payload(&self, distances: &[Option<u64>], order: &[usize]) -> Payload {
        Payload::Graph {
            nodes: self.nodes,
            edges: self.edges.clone(),
            distances: distances.to_vec(),
            order: order.to_vec(),
        }
    }

    fn describe_goal(&self) -> String {
        match self.target {
            Some(t) => format!("from {} to {}", label(self.start), label(t)),
            None => format!("from {}", label(self.start)),
        }
    }
}

/// Follow parent links back from `target` to the start
fn path_to(parent: &[Option<usize>], start: usize, target: usize) -> Vec<usize> {
    let mut path = vec![target];
    let mut node = target;
    while node != start {
        match parent[node] {
            Some(p) => {
                path.push(p);
                node = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Terminal snapshot shared by all three traversals
fn conclude(
    g: &Graph,
    payload: Payload,
    order: &[usize],
    parent: &[Option<usize>],
    reached: Option<usize>,
    line: usize,
) -> Snapshot {
    match (g.target, reached) {
        (Some(_), Some(t)) => {
            let path = path_to(parent, g.start, t);
            Snapshot::new(
                payload,
                format!("Reached {}; path {}", label(t), labels(path.iter().copied())),
            )
            .highlight(Role::Visited, order.iter().copied())
            .highlight(Role::Path, path.iter().copied())
            .highlight(Role::Found, [t])
            .var("path", labels(path))
            .line(line)
            .status(Status::Found)
        }
        (Some(t), None) => Snapshot::new(
            payload,
            format!("{} is unreachable from {}", label(t), label(g.start)),
        )
        .highlight(Role::Visited, order.iter().copied())
        .line(line)
        .status(Status::NotFound),
        (None, _) => Snapshot::new(
            payload,
            format!("Traversal finished: {} nodes visited", order.len()),
        )
        .highlight(Role::Visited, order.iter().copied())
        .var("order", labels(order.iter().copied()))
        .line(line)
        .status(Status::Done),
    }
}

pub fn breadth_first(g: &Graph, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut depth: Vec<Option<u64>> = vec![None; g.nodes];
    let mut parent: Vec<Option<usize>> = vec![None; g.nodes];
    let mut order = Vec::new();
    let mut queue = VecDeque::from([g.start]);
    depth[g.start] = Some(0);

    rec.push(
        Snapshot::new(
            g.payload(&depth, &order),
            format!("Breadth-first search {}", g.describe_goal()),
        )
        .highlight(Role::Frontier, [g.start])
        .line(0)
        .var("queue", labels(queue.iter().copied())),
    )?;

    let mut reached = None;
    while let Some(u) = queue.pop_front() {
        order.push(u);
        rec.push(
            Snapshot::new(g.payload(&depth, &order), format!("Dequeue {}", label(u)))
                .highlight(Role::Active, [u])
                .highlight(Role::Visited, order.iter().copied())
                .highlight(Role::Frontier, queue.iter().copied())
                .line(2)
                .var("u", label(u).to_string())
                .var("queue", labels(queue.iter().copied())),
        )?;
        if g.target == Some(u) {
            reached = Some(u);
            break;
        }
        for &(v, _) in &g.adjacency[u] {
            let seen = depth[v].is_some();
            rec.push(
                Snapshot::new(
                    g.payload(&depth, &order),
                    if seen {
                        format!("{} already seen", label(v))
                    } else {
                        format!("Discover {} through {}", label(v), label(u))
                    },
                )
                .highlight(Role::Active, [u])
                .highlight(Role::Comparing, [v])
                .highlight(Role::Visited, order.iter().copied())
                .highlight(Role::Frontier, queue.iter().copied())
                .line(5)
                .var("u", label(u).to_string())
                .var("v", label(v).to_string())
                .var("queue", labels(queue.iter().copied())),
            )?;
            if !seen {
                depth[v] = depth[u].map(|d| d + 1);
                parent[v] = Some(u);
                queue.push_back(v);
                rec.push(
                    Snapshot::new(
                        g.payload(&depth, &order),
                        format!("Enqueue {} at depth {}", label(v), depth[v].unwrap_or(0)),
                    )
                    .highlight(Role::Active, [u])
                    .highlight(Role::Visited, order.iter().copied())
                    .highlight(Role::Frontier, queue.iter().copied())
                    .line(6)
                    .var("u", label(u).to_string())
                    .var("v", label(v).to_string())
                    .var("queue", labels(queue.iter().copied())),
                )?;
            }
        }
    }

    rec.push(conclude(g, g.payload(&depth, &order), &order, &parent, reached, 7))
}

pub fn depth_first(g: &Graph, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut discovered: Vec<Option<u64>> = vec![None; g.nodes];
    let mut parent: Vec<Option<usize>> = vec![None; g.nodes];
    let mut order: Vec<usize> = Vec::new();
    let mut stack: Vec<(usize, Option<usize>)> = vec![(g.start, None)];

    rec.push(
        Snapshot::new(
            g.payload(&discovered, &order),
            format!("Depth-first search {}", g.describe_goal()),
        )
        .highlight(Role::Frontier, [g.start])
        .line(0)
        .var("stack", label(g.start).to_string()),
    )?;

    let mut reached = None;
    while let Some((u, from)) = stack.pop() {
        let pending = labels(stack.iter().map(|(n, _)| *n));
        if discovered[u].is_some() {
            rec.push(
                Snapshot::new(
                    g.payload(&discovered, &order),
                    format!("{} was already visited, skip it", label(u)),
                )
                .highlight(Role::Comparing, [u])
                .highlight(Role::Visited, order.iter().copied())
                .highlight(Role::Frontier, stack.iter().map(|(n, _)| *n))
                .line(3)
                .var("u", label(u).to_string())
                .var("stack", pending),
            )?;
            continue;
        }
        discovered[u] = Some(order.len() as u64);
        parent[u] = from;
        order.push(u);
        rec.push(
            Snapshot::new(
                g.payload(&discovered, &order),
                match from {
                    Some(p) => format!("Visit {} (reached from {})", label(u), label(p)),
                    None => format!("Visit {}", label(u)),
                },
            )
            .highlight(Role::Active, [u])
            .highlight(Role::Visited, order.iter().copied())
            .highlight(Role::Frontier, stack.iter().map(|(n, _)| *n))
            .line(4)
            .var("u", label(u).to_string())
            .var("stack", pending),
        )?;
        if g.target == Some(u) {
            reached = Some(u);
            break;
        }
        for &(v, _) in g.adjacency[u].iter().rev() {
            if discovered[v].is_none() {
                stack.push((v, Some(u)));
            }
        }
        rec.push(
            Snapshot::new(
                g.payload(&discovered, &order),
                format!("Push the unvisited neighbours of {}", label(u)),
            )
            .highlight(Role::Active, [u])
            .highlight(Role::Visited, order.iter().copied())
            .highlight(Role::Frontier, stack.iter().map(|(n, _)| *n))
            .line(7)
            .var("u", label(u).to_string())
            .var("stack", labels(stack.iter().map(|(n, _)| *n))),
        )?;
    }

    rec.push(conclude(g, g.payload(&discovered, &order), &order, &parent, reached, 8))
}

pub fn dijkstra(g: &Graph, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut dist: Vec<Option<u64>> = vec![None; g.nodes];
    let mut parent: Vec<Option<usize>> = vec![None; g.nodes];
    let mut order: Vec<usize> = Vec::new();
    let mut pq = BinaryHeap::from([Reverse((0u64, g.start))]);
    dist[g.start] = Some(0);

    rec.push(
        Snapshot::new(g.payload(&dist, &order), format!("Dijkstra {}", g.describe_goal()))
            .highlight(Role::Frontier, [g.start])
            .line(0)
            .var("start", label(g.start).to_string()),
    )?;

    let mut reached = None;
    while let Some(Reverse((d, u))) = pq.pop() {
        if dist[u].is_some_and(|best| d > best) || order.contains(&u) {
            rec.push(
                Snapshot::new(
                    g.payload(&dist, &order),
                    format!("Skip stale entry ({}, {})", d, label(u)),
                )
                .highlight(Role::Comparing, [u])
                .highlight(Role::Visited, order.iter().copied())
                .line(3)
                .var("d", d),
            )?;
            continue;
        }
        order.push(u);
        rec.push(
            Snapshot::new(
                g.payload(&dist, &order),
                format!("Settle {} at distance {}", label(u), d),
            )
            .highlight(Role::Active, [u])
            .highlight(Role::Visited, order.iter().copied())
            .highlight(Role::Frontier, pq.iter().map(|Reverse((_, n))| *n))
            .line(2)
            .var("u", label(u).to_string())
            .var("d", d),
        )?;
        if g.target == Some(u) {
            reached = Some(u);
            break;
        }
        for &(v, w) in &g.adjacency[u] {
            if order.contains(&v) {
                continue;
            }
            let Some(candidate) = d.checked_add(w) else {
                continue;
            };
            let improves = dist[v].map_or(true, |current| candidate < current);
            rec.push(
                Snapshot::new(
                    g.payload(&dist, &order),
                    match dist[v] {
                        Some(current) => format!(
                            "Edge {}-{} (w={}): {} + {} = {} vs {}",
                            label(u), label(v), w, d, w, candidate, current
                        ),
                        None => format!(
                            "Edge {}-{} (w={}): {} + {} = {} vs infinity",
                            label(u), label(v), w, d, w, candidate
                        ),
                    },
                )
                .highlight(Role::Active, [u])
                .highlight(Role::Comparing, [v])
                .highlight(Role::Visited, order.iter().copied())
                .line(6)
                .var("u", label(u).to_string())
                .var("v", label(v).to_string())
                .var("d", d)
                .var("w", w),
            )?;
            if improves {
                dist[v] = Some(candidate);
                parent[v] = Some(u);
                pq.push(Reverse((candidate, v)));
                rec.push(
                    Snapshot::new(
                        g.payload(&dist, &order),
                        format!("Relax: dist[{}] = {}", label(v), candidate),
                    )
                    .highlight(Role::Active, [u])
                    .highlight(Role::Swapped, [v])
                    .highlight(Role::Visited, order.iter().copied())
                    .highlight(Role::Frontier, pq.iter().map(|Reverse((_, n))| *n))
                    .line(7)
                    .var("u", label(u).to_string())
                    .var("v", label(v).to_string())
                    .var("d", d)
                    .var("w", w),
                )?;
            }
        }
    }

    let terminal = conclude(g, g.payload(&dist, &order), &order, &parent, reached, 8);
    let terminal = match reached {
        Some(t) => terminal.var("distance", dist[t]),
        None => terminal,
    };
    rec.push(terminal)
}

/// Eight-node weighted graph used when no graph is supplied
pub fn sample_graph() -> Params {
    let edge = |from, to, weight| Edge { from, to, weight };
    Params::Graph {
        nodes: 8,
        edges: vec![
            edge(0, 1, 4),
            edge(0, 2, 2),
            edge(1, 2, 5),
            edge(1, 3, 10),
            edge(2, 4, 3),
            edge(4, 3, 4),
            edge(3, 5, 11),
            edge(4, 6, 6),
            edge(6, 5, 2),
            edge(5, 7, 3),
            edge(6, 7, 9),
        ],
        start: 0,
        target: Some(7),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_follows_parents_back_to_start() {
        let parent = vec![None, Some(0), Some(1), Some(1)];
        assert_eq!(path_to(&parent, 0, 2), vec![0, 1, 2]);
        assert_eq!(path_to(&parent, 0, 0), vec![0]);
    }

    #[test]
    fn build_rejects_dangling_edges() {
        let edges = [Edge {
            from: 0,
            to: 5,
            weight: 1,
        }];
        assert_eq!(
            Graph::build(3, &edges, 0, None).unwrap_err(),
            InputError::NodeOutOfRange { node: 5, nodes: 3 }
        );
    }

    #[test]
    fn build_rejects_oversized_weights() {
        let edges = [Edge {
            from: 0,
            to: 1,
            weight: MAX_WEIGHT + 1,
        }];
        assert!(matches!(
            Graph::build(2, &edges, 0, None),
            Err(InputError::OutOfRange {
                what: "edge weight",
                ..
            })
        ));
    }
}
