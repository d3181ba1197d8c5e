use crate::layout::index_steps;
use crate::model::{Graph, Step};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Longest-path distance of every step from a step without dependencies.
///
/// Dependencies that name no known step count as depth 0 and show up in the
/// result under their own id. Cycles do not fail: a step reached again while
/// it is still being resolved counts as 0, so depths inside a cycle are
/// under-counted but the walk always terminates.
pub fn compute_depths(graph: &Graph) -> BTreeMap<String, usize> {
    let mut walk = DepthWalk {
        index: index_steps(graph),
        depths: HashMap::new(),
        visiting: HashSet::new(),
    };
    for step in &graph.steps {
        walk.depth(&step.id);
    }

    walk.depths
        .into_iter()
        .map(|(id, depth)| (id.to_string(), depth))
        .collect()
}

struct DepthWalk<'g> {
    index: HashMap<&'g str, &'g Step>,
    depths: HashMap<&'g str, usize>,
    visiting: HashSet<&'g str>,
}

impl<'g> DepthWalk<'g> {
    fn depth(&mut self, id: &'g str) -> usize {
        if let Some(&depth) = self.depths.get(id) {
            return depth;
        }
        if !self.visiting.insert(id) {
            return 0;
        }

        let step: Option<&'g Step> = self.index.get(id).copied();
        let deps = step.map_or(&[][..], Step::deps);
        let depth = if deps.is_empty() {
            0
        } else {
            let mut deepest = 0;
            for dep in deps {
                deepest = deepest.max(self.depth(dep));
            }
            deepest + 1
        };

        self.depths.insert(id, depth);
        depth
    }
}
