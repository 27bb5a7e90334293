pub mod ai;
pub mod animations;
pub mod calculators;
pub mod catch;
pub mod conditions;
pub mod engine;
pub mod flow;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
