use crate::{MoveCategory, MoveEffect, PokemonType};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Move {
    // Normal Type
    Tackle,
    Scratch,
    Pound,
    QuickAttack,
    Bite,
    HyperFang,
    Slash,
    BodySlam,
    Headbutt,
    HyperBeam,
    Cut,
    Struggle,
    Growl,
    TailWhip,
    Leer,
    SwordsDance,
    Harden,
    Agility,
    Recover,
    Growth,
    // Fire Type
    Ember,
    FlameWheel,
    Flamethrower,
    FireBlast,
    // Water Type
    WaterGun,
    BubbleBeam,
    Surf,
    HydroPump,
    Withdraw,
    // Grass Type
    VineWhip,
    RazorLeaf,
    MegaDrain,
    PetalDance,
    SleepPowder,
    StunSpore,
    // Poison Type
    PoisonSting,
    Sludge,
    PoisonPowder,
    // Electric Type
    ThunderShock,
    Thunderbolt,
    ThunderWave,
    Thunder,
    // Ice Type
    PowderSnow,
    IceBeam,
    Blizzard,
    // Fighting Type
    KarateChop,
    LowKick,
    Submission,
    // Ground Type
    MudSlap,
    Dig,
    Earthquake,
    // Flying Type
    Gust,
    Peck,
    WingAttack,
    DrillPeck,
    // Psychic Type
    Confusion,
    Psybeam,
    Psychic,
    Hypnosis,
    // Bug Type
    StringShot,
    LeechLife,
    BugBite,
    // Rock Type
    RockThrow,
    RockSlide,
    // Ghost Type
    Lick,
    ShadowBall,
    // Dragon Type
    DragonBreath,
    DragonClaw,
    Outrage,
}

/// Static record for a move, loaded from `data/moves.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveData {
    pub id: Move,
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u8,
    /// 0 means the move never misses.
    pub accuracy: u8,
    pub pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub high_crit: bool,
    #[serde(default)]
    pub effect: Option<MoveEffect>,
    #[serde(default)]
    pub description: String,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.power > 0 && self.category != MoveCategory::Status
    }
}
