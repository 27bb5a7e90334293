use crate::battle::state::{Side, TurnResult};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Shake,
    Flash,
    HpDrain,
    Faint,
    BallThrow,
    ExpFill,
}

/// A timed visual cue. Input is blocked until every animation reaches
/// progress 1.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleAnimation {
    pub kind: AnimationKind,
    pub target: Side,
    pub progress: f64,
    pub duration_ms: u32,
}

impl BattleAnimation {
    pub fn new(kind: AnimationKind, target: Side, duration_ms: u32) -> Self {
        Self {
            kind,
            target,
            progress: 0.0,
            duration_ms,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn advance(&mut self, dt_ms: u32) {
        if self.duration_ms == 0 {
            self.progress = 1.0;
            return;
        }
        self.progress = (self.progress + dt_ms as f64 / self.duration_ms as f64).min(1.0);
    }
}

/// Advance every animation by `dt_ms` and drop the finished ones.
pub fn tick_animations(animations: &mut Vec<BattleAnimation>, dt_ms: u32) {
    for animation in animations.iter_mut() {
        animation.advance(dt_ms);
    }
    animations.retain(|animation| !animation.is_finished());
}

/// Visual cues for a resolved turn, in play order.
pub fn build_turn_animations(result: &TurnResult) -> Vec<BattleAnimation> {
    let mut animations = Vec::new();

    if result.caught.is_some() {
        animations.push(BattleAnimation::new(
            AnimationKind::BallThrow,
            Side::Enemy,
            800,
        ));
    }

    for (side, damage) in [
        (Side::Enemy, result.enemy_damage),
        (Side::Player, result.player_damage),
    ] {
        if damage > 0 {
            animations.push(BattleAnimation::new(AnimationKind::Flash, side, 300));
            animations.push(BattleAnimation::new(AnimationKind::HpDrain, side, 500));
        }
    }

    if result.effectiveness.is_some_and(|multiplier| multiplier > 1.0) {
        animations.push(BattleAnimation::new(AnimationKind::Shake, Side::Enemy, 500));
    }

    if result.enemy_fainted {
        animations.push(BattleAnimation::new(AnimationKind::Faint, Side::Enemy, 600));
    }
    if result.player_fainted {
        animations.push(BattleAnimation::new(AnimationKind::Faint, Side::Player, 600));
    }

    animations
}

pub fn exp_fill_animation() -> BattleAnimation {
    BattleAnimation::new(AnimationKind::ExpFill, Side::Player, 500)
}
