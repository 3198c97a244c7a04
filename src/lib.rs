//! tour-planner optimization core
//!
//! Multi-objective single-day itinerary planning: NSGA-II and MOVNS engines
//! over an attraction catalog and transport matrices, with hypervolume and
//! coverage indicators for assessing the resulting Pareto approximations.

pub mod archive;
pub mod error;
pub mod evaluator;
pub mod haversine;
pub mod hypervolume;
pub mod io;
pub mod metrics;
pub mod model;
pub mod movns;
pub mod nsga2;
pub mod ranking;
pub mod transport;
