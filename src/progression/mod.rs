pub mod evolution;
pub mod experience;
pub mod moves;

pub use evolution::evolve;
pub use experience::{exp_for_level, gain_exp, ExpOutcome, RewardCalculator};
pub use moves::{replace_move, try_learn_move, LearnOutcome};
