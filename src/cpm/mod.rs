pub mod engine;
pub mod float;

pub use engine::{compute, CpmOptions, CpmReport};
pub use float::{
    annotate_floats, critical_chain, find_critical_path, free_float_of, total_float_of,
    ChainDirection,
};
