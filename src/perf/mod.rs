//! Performance predictors for partitions, resources and the whole DAG.
//!
//! Dispatch is a tagged variant rather than a runtime registry: every
//! compatible `(component, partition, resource)` cell carries one of the
//! models below, and the capability surface is `predict` /
//! `allows_colocation` / `features`.

pub mod evaluator;
pub mod queueing;
mod regressor;

pub use regressor::Regressor;

use crate::error::{Error, Result};
use crate::model::System;
use crate::placement::Placement;

#[derive(Debug, Clone)]
pub enum PerformanceModel {
    /// M/G/1 queue on an edge node.
    EdgeQueue,
    /// M/G/1 queue on a cloud server farm.
    CloudQueue,
    /// Serverless function: the response is the measured warm demand.
    Faas { warm: f64, cold: f64 },
    /// Opaque predictor backed by a coefficient file.
    Regressor(Regressor),
}

impl PerformanceModel {
    /// Build a model from its manifest keyword.
    pub fn from_keyword(
        keyword: &str,
        demand_warm: Option<f64>,
        demand_cold: Option<f64>,
        regressor_file: Option<&str>,
    ) -> Result<Self> {
        match keyword {
            "QTedge" => Ok(Self::EdgeQueue),
            "QTcloud" => Ok(Self::CloudQueue),
            "FAAS" | "PACSLTK" => {
                let warm = demand_warm.ok_or_else(|| {
                    Error::Validation(format!("model {keyword} requires demandWarm"))
                })?;
                Ok(Self::Faas {
                    warm,
                    cold: demand_cold.unwrap_or(warm),
                })
            }
            "MLLIBfaas" => {
                let path = regressor_file.ok_or_else(|| {
                    Error::Validation("model MLLIBfaas requires a regressor_file".into())
                })?;
                Ok(Self::Regressor(Regressor::open(path)?))
            }
            other => Err(Error::Config(format!("invalid performance model: {other}"))),
        }
    }

    /// Whether several partitions may share a device running this model.
    pub fn allows_colocation(&self) -> bool {
        matches!(self, Self::EdgeQueue | Self::CloudQueue)
    }

    /// Features handed to an opaque predictor for one placement cell.
    pub fn features(sys: &System, i: usize, h: usize, j: usize) -> Vec<(&'static str, f64)> {
        vec![
            ("lambda", sys.part_lambda(i, h)),
            ("demand", sys.demand(i, h, j)),
            ("cores", sys.resource(j).n_cores.unwrap_or(1.0)),
            ("memory", sys.memory_req(i, h, j)),
        ]
    }

    /// Response time of partition `(i, h)` on resource `j` under the
    /// given placement.
    pub fn predict(&self, sys: &System, placement: &Placement, i: usize, h: usize, j: usize) -> f64 {
        match self {
            Self::EdgeQueue | Self::CloudQueue => {
                queueing::response_time(sys, placement, i, h, j)
            }
            Self::Faas { warm, .. } => *warm,
            Self::Regressor(r) => r.predict(&Self::features(sys, i, h, j)),
        }
    }
}
