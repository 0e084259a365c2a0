// Copyright 2026 The Vowl Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeType, Position};

/// Spring rest length per edge type. Types without an entry use
/// [`EdgeType::default_rest_length`], so a config file only needs to list
/// the types it changes.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestLengths(BTreeMap<EdgeType, f64>);

impl RestLengths {
    pub fn get(&self, edge_type: EdgeType) -> f64 {
        self.0
            .get(&edge_type)
            .copied()
            .unwrap_or_else(|| edge_type.default_rest_length())
    }
}

/// Force simulation parameters.
///
/// Distances are in layout units; the renderer decides how they map to
/// pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pairwise charge; negative values repel.
    pub charge_strength: f64,
    /// Spring stiffness along edges.
    pub link_strength: f64,
    /// Pull of every free node toward `center`.
    pub center_strength: f64,
    /// Fraction of velocity kept after each tick.
    pub velocity_decay: f64,
    /// Multiplicative cooling: `alpha *= 1 - alpha_decay` per tick.
    pub alpha_decay: f64,
    /// The simulation is converged once alpha drops below this.
    pub alpha_min: f64,
    /// Starting (and reheat) temperature.
    pub alpha: f64,
    /// Lower bound on squared distance in the repulsion term.
    pub epsilon: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// Seed for initial placement.
    pub seed: u64,
    /// Initial positions are drawn within this distance of the center.
    pub initial_radius: f64,
    pub rest_lengths: RestLengths,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            charge_strength: -500.0,
            link_strength: 1.0,
            center_strength: 0.025,
            velocity_decay: 0.6,
            alpha_decay: 0.0228,
            alpha_min: 0.001,
            alpha: 1.0,
            epsilon: 1.0,
            center_x: 0.0,
            center_y: 0.0,
            seed: 42,
            initial_radius: 500.0,
            rest_lengths: RestLengths::default(),
        }
    }
}

impl LayoutConfig {
    pub fn center(&self) -> Position {
        Position::new(self.center_x, self.center_y)
    }
}
