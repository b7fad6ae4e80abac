use serde::Serialize;

use crate::prefab::Prefab;

/// One drivable path through a prefab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefabRoute {
    /// Curve indices in driving order
    pub curves: Vec<usize>,
    /// Prefab node the route enters through
    pub entry: usize,
    /// Prefab node closest to the end of the last curve
    pub exit: usize,
}

impl PrefabRoute {
    pub fn last_curve(&self) -> Option<usize> {
        self.curves.last().copied()
    }
}

enum Step {
    /// Chain whose last curve still has to be expanded
    Walk(Vec<usize>),
    /// Chain cut short because the next curve is already on it
    Emit(Vec<usize>),
}

impl Prefab {
    /// All routes entering through `entry`, one per terminal chain reachable
    /// from each of the node's input curves.
    ///
    /// An entry index outside the node list yields no routes.
    pub fn route_options(&self, entry: usize) -> Vec<PrefabRoute> {
        let Some(entry_node) = self.nodes.get(entry) else {
            return Vec::new();
        };

        entry_node
            .input_curves
            .iter()
            .flat_map(|&first| self.walk_curves(first))
            .filter_map(|curves| {
                let exit = self.find_exit_node(*curves.last()?)?;
                Some(PrefabRoute {
                    curves,
                    entry,
                    exit,
                })
            })
            .collect()
    }

    /// Routes from `entry` that leave through `exit`
    pub fn route(&self, entry: usize, exit: usize) -> Vec<PrefabRoute> {
        self.route_options(entry)
            .into_iter()
            .filter(|r| r.exit == exit)
            .collect()
    }

    /// Routes from every node of the prefab
    pub fn all_routes(&self) -> Vec<PrefabRoute> {
        (0..self.nodes.len())
            .flat_map(|entry| self.route_options(entry))
            .collect()
    }

    /// Depth-first walk along successor links starting at `first`.
    ///
    /// A chain ends at a curve without successors, or just before a
    /// successor that is already part of the chain. Chains come out in the
    /// order a recursive walk over the successor lists would produce them.
    fn walk_curves(&self, first: usize) -> Vec<Vec<usize>> {
        let mut chains = Vec::new();
        let mut stack = vec![Step::Walk(vec![first])];

        while let Some(step) = stack.pop() {
            let chain = match step {
                Step::Emit(chain) => {
                    chains.push(chain);
                    continue;
                }
                Step::Walk(chain) => chain,
            };

            let next = chain
                .last()
                .and_then(|&last| self.curves.get(last))
                .map(|curve| curve.next.as_slice())
                .unwrap_or_default();

            if next.is_empty() {
                chains.push(chain);
                continue;
            }

            for &successor in next.iter().rev() {
                if chain.contains(&successor) {
                    stack.push(Step::Emit(chain.clone()));
                } else {
                    let mut extended = chain.clone();
                    extended.push(successor);
                    stack.push(Step::Walk(extended));
                }
            }
        }

        chains
    }

    /// Node nearest (planar X/Z) to the end of `curve`
    fn find_exit_node(&self, curve: usize) -> Option<usize> {
        let end = self.curves.get(curve)?.end;
        self.nodes
            .iter()
            .map(|node| {
                let dx = end.x - node.position.x;
                let dz = end.z - node.position.z;
                (node.index, dx * dx + dz * dz)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
