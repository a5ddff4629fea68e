//! Electrostatics: closed-form field and potential of the configured sources

pub mod superposition;

pub use superposition::{
    evaluate_point_charge_field, evaluate_segment_field, point_charge_potential,
    segment_potential, FieldEvaluator, SINGULARITY_EPSILON,
};
