pub mod environment;
pub mod teams;

pub use environment::{
    Environment, EnvironmentMap, EnvironmentPolicy, EnvironmentRecord, JuicedTotals, PolicyKind,
    ThresholdOverrides, TotalsLean,
};
