// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Incremental force-directed layout.
//!
//! The host drives the simulation one [`ForceLayout::tick`] at a time (or in
//! batches with [`ForceLayout::run`]) and reads positions back from the
//! [`Graph`] between ticks. Each tick applies pairwise repulsion, spring
//! attraction along visible edges and a weak pull toward the center, then
//! integrates velocities scaled by the cooling temperature `alpha`.
//!
//! Only visible nodes take part. Hidden nodes keep their last position so
//! they reappear where they were when a filter reveals them again, but
//! they come back at rest.

mod config;

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::common::fnv1a;
use crate::graph::{Graph, Position};

pub use self::config::{LayoutConfig, RestLengths};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutState {
    /// No positions assigned yet; the first tick initializes.
    Initializing,
    Running,
    /// `alpha` fell below `alpha_min`. Ticks are no-ops until a reheat.
    Converged,
}

/// Unit vector used to separate two coincident nodes. Derived from the ids
/// alone so it does not depend on node order, and flipped so that the two
/// nodes get opposite directions.
fn separation_direction(a: &str, b: &str) -> Position {
    let (lo, hi, sign) = if a <= b { (a, b, 1.0) } else { (b, a, -1.0) };
    let angle = (fnv1a(&[lo, hi]) as f64 / u64::MAX as f64) * TAU;
    Position::new(angle.cos(), angle.sin()) * sign
}

pub struct ForceLayout {
    config: LayoutConfig,
    state: LayoutState,
    alpha: f64,
    rng: StdRng,
    forces: Vec<Position>,
}

impl ForceLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            alpha: config.alpha,
            state: LayoutState::Initializing,
            forces: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_converged(&self) -> bool {
        self.state == LayoutState::Converged
    }

    /// Give every free node without a position a seeded random spot within
    /// `initial_radius` of the center, and start the simulation.
    pub fn initialize(&mut self, graph: &mut Graph) {
        self.rng = StdRng::seed_from_u64(self.config.seed);
        let center = self.config.center();
        let mut placed = 0;
        for i in 0..graph.node_count() {
            let node = &graph.nodes()[i];
            if node.is_pinned() || node.has_position() {
                continue;
            }
            let angle = self.rng.random::<f64>() * TAU;
            let distance = self.config.initial_radius * self.rng.random::<f64>().sqrt();
            let offset = Position::new(angle.cos(), angle.sin()) * distance;
            graph.set_position(i, center + offset);
            graph.set_velocity(i, Position::ZERO);
            placed += 1;
        }
        self.alpha = self.config.alpha;
        self.state = if self.alpha < self.config.alpha_min {
            LayoutState::Converged
        } else {
            LayoutState::Running
        };
        debug!(placed, seed = self.config.seed, "initialized layout");
    }

    /// Advance the simulation by one step.
    pub fn tick(&mut self, graph: &mut Graph) {
        match self.state {
            LayoutState::Initializing => self.initialize(graph),
            LayoutState::Converged => return,
            LayoutState::Running => {}
        }
        if self.state == LayoutState::Converged {
            return;
        }

        self.reset_non_finite(graph);
        self.accumulate_forces(graph);
        self.integrate(graph);

        self.alpha *= 1.0 - self.config.alpha_decay;
        trace!(alpha = self.alpha, "tick");
        if self.alpha < self.config.alpha_min {
            self.state = LayoutState::Converged;
            debug!(alpha = self.alpha, "layout converged");
        }
    }

    /// Tick up to `ticks` times, stopping early on convergence. Returns the
    /// number of ticks that actually moved the simulation.
    pub fn run(&mut self, graph: &mut Graph, ticks: usize) -> usize {
        let mut performed = 0;
        for _ in 0..ticks {
            if self.is_converged() {
                break;
            }
            self.tick(graph);
            performed += 1;
        }
        performed
    }

    /// Restore the starting temperature, e.g. after filters change what is
    /// visible.
    pub fn reheat(&mut self) {
        self.alpha = self.config.alpha;
        if self.state == LayoutState::Converged {
            self.state = LayoutState::Running;
        }
    }

    /// Fix a node at `position`. Returns false if there is no such node.
    pub fn pin(&mut self, graph: &mut Graph, id: &str, position: Position) -> bool {
        let Some(i) = graph.index_of(id) else {
            return false;
        };
        graph.set_position(i, position);
        graph.set_pinned(i, true);
        true
    }

    pub fn unpin(&mut self, graph: &mut Graph, id: &str) -> bool {
        let Some(i) = graph.index_of(id) else {
            return false;
        };
        graph.set_pinned(i, false);
        true
    }

    /// Move a node without pinning it; initialization leaves it in place.
    pub fn place(&mut self, graph: &mut Graph, id: &str, position: Position) -> bool {
        let Some(i) = graph.index_of(id) else {
            return false;
        };
        graph.set_position(i, position);
        graph.set_velocity(i, Position::ZERO);
        true
    }

    /// Move visible nodes with a non-finite position back to the center
    /// before any forces are computed from them.
    fn reset_non_finite(&self, graph: &mut Graph) {
        let center = self.config.center();
        for i in 0..graph.node_count() {
            let node = &graph.nodes()[i];
            if !node.is_visible() || node.position().is_finite() {
                continue;
            }
            warn!(node = %node.id, "non-finite position, resetting to center");
            graph.set_velocity(i, Position::ZERO);
            graph.set_position(i, center);
        }
    }

    fn accumulate_forces(&mut self, graph: &Graph) {
        let config = &self.config;
        let nodes = graph.nodes();
        self.forces.clear();
        self.forces.resize(nodes.len(), Position::ZERO);

        let free: Vec<usize> = (0..nodes.len())
            .filter(|&i| nodes[i].is_visible() && !nodes[i].is_pinned())
            .collect();

        // O(n^2) repulsion between all free visible pairs
        for (k, &a) in free.iter().enumerate() {
            for &b in &free[(k + 1)..] {
                let delta = nodes[b].position() - nodes[a].position();
                let d2 = delta.length_squared();
                let direction = if d2 > 0.0 {
                    delta * (1.0 / d2.sqrt())
                } else {
                    separation_direction(&nodes[a].id, &nodes[b].id)
                };
                let force = direction * (config.charge_strength / d2.max(config.epsilon));
                self.forces[a] += force;
                self.forces[b] += force * -1.0;
            }
        }

        // springs along visible edges
        for (edge, &(s, t)) in graph.edges().iter().zip(graph.endpoints()) {
            if !edge.is_visible() || s == t {
                continue;
            }
            let delta = nodes[t].position() - nodes[s].position();
            let d = delta.length();
            if d == 0.0 {
                continue;
            }
            let rest = config.rest_lengths.get(edge.edge_type);
            let force = delta * (config.link_strength * (d - rest) / d);
            self.forces[s] += force;
            self.forces[t] += force * -1.0;
        }

        let center = config.center();
        for &i in &free {
            self.forces[i] += (center - nodes[i].position()) * config.center_strength;
        }
    }

    fn integrate(&mut self, graph: &mut Graph) {
        let center = self.config.center();
        for i in 0..graph.node_count() {
            let node = &graph.nodes()[i];
            if !node.is_visible() || node.is_pinned() {
                graph.set_velocity(i, Position::ZERO);
                continue;
            }

            let velocity =
                (node.velocity() + self.forces[i] * (1.0 / node.mass())) * self.config.velocity_decay;
            let position = node.position() + velocity * self.alpha;
            if position.is_finite() && velocity.is_finite() {
                graph.set_velocity(i, velocity);
                graph.set_position(i, position);
            } else {
                warn!(node = %node.id, "non-finite position, resetting to center");
                graph.set_velocity(i, Position::ZERO);
                graph.set_position(i, center);
            }
        }
    }
}
