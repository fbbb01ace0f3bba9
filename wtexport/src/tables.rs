//! Tables that vanilla Doom compiled in rather than reading from a lump.
//! Sources without their own `ANIMATED` or `SWITCHES` still animate and
//! switch these, so they have to be followed too.

pub struct AnimationDef {
    pub is_texture: bool,
    pub end_name: &'static str,
    pub start_name: &'static str,
}

impl AnimationDef {
    const fn new(is_texture: bool, end_name: &'static str, start_name: &'static str) -> Self {
        Self {
            is_texture,
            end_name,
            start_name,
        }
    }
}

/// Doom function name `P_InitPicAnims`, the `animdefs` table
pub const ANIM_DEFS: [AnimationDef; 22] = [
    AnimationDef::new(false, "NUKAGE3", "NUKAGE1"),
    AnimationDef::new(false, "FWATER4", "FWATER1"),
    AnimationDef::new(false, "SWATER4", "SWATER1"),
    AnimationDef::new(false, "LAVA4", "LAVA1"),
    AnimationDef::new(false, "BLOOD3", "BLOOD1"),
    // DOOM II flat animations.
    AnimationDef::new(false, "RROCK08", "RROCK05"),
    AnimationDef::new(false, "SLIME04", "SLIME01"),
    AnimationDef::new(false, "SLIME08", "SLIME05"),
    AnimationDef::new(false, "SLIME12", "SLIME09"),
    AnimationDef::new(true, "BLODGR4", "BLODGR1"),
    AnimationDef::new(true, "SLADRIP3", "SLADRIP1"),
    AnimationDef::new(true, "BLODRIP4", "BLODRIP1"),
    AnimationDef::new(true, "FIREWALL", "FIREWALA"),
    AnimationDef::new(true, "GSTFONT3", "GSTFONT1"),
    AnimationDef::new(true, "FIRELAVA", "FIRELAV3"),
    AnimationDef::new(true, "FIREMAG3", "FIREMAG1"),
    AnimationDef::new(true, "FIREBLU2", "FIREBLU1"),
    AnimationDef::new(true, "ROCKRED3", "ROCKRED1"),
    AnimationDef::new(true, "BFALL4", "BFALL1"),
    AnimationDef::new(true, "SFALL4", "SFALL1"),
    AnimationDef::new(true, "WFALL4", "WFALL1"),
    AnimationDef::new(true, "DBRAIN4", "DBRAIN1"),
];

pub struct ButtonDef {
    pub name1: &'static str,
    pub name2: &'static str,
}

impl ButtonDef {
    const fn new(name1: &'static str, name2: &'static str) -> Self {
        ButtonDef { name1, name2 }
    }
}

// CHANGE THE TEXTURE OF A WALL SWITCH TO ITS OPPOSITE
pub const BUTTON_DEFS: [ButtonDef; 40] = [
    // Doom shareware episode 1 switches
    ButtonDef::new("SW1BRCOM", "SW2BRCOM"),
    ButtonDef::new("SW1BRN1", "SW2BRN1"),
    ButtonDef::new("SW1BRN2", "SW2BRN2"),
    ButtonDef::new("SW1BRNGN", "SW2BRNGN"),
    ButtonDef::new("SW1BROWN", "SW2BROWN"),
    ButtonDef::new("SW1COMM", "SW2COMM"),
    ButtonDef::new("SW1COMP", "SW2COMP"),
    ButtonDef::new("SW1DIRT", "SW2DIRT"),
    ButtonDef::new("SW1EXIT", "SW2EXIT"),
    ButtonDef::new("SW1GRAY", "SW2GRAY"),
    ButtonDef::new("SW1GRAY1", "SW2GRAY1"),
    ButtonDef::new("SW1METAL", "SW2METAL"),
    ButtonDef::new("SW1PIPE", "SW2PIPE"),
    ButtonDef::new("SW1SLAD", "SW2SLAD"),
    ButtonDef::new("SW1STARG", "SW2STARG"),
    ButtonDef::new("SW1STON1", "SW2STON1"),
    ButtonDef::new("SW1STON2", "SW2STON2"),
    ButtonDef::new("SW1STONE", "SW2STONE"),
    ButtonDef::new("SW1STRTN", "SW2STRTN"),
    // Doom registered episodes 2&3 switches
    ButtonDef::new("SW1BLUE", "SW2BLUE"),
    ButtonDef::new("SW1CMT", "SW2CMT"),
    ButtonDef::new("SW1GARG", "SW2GARG"),
    ButtonDef::new("SW1GSTON", "SW2GSTON"),
    ButtonDef::new("SW1HOT", "SW2HOT"),
    ButtonDef::new("SW1LION", "SW2LION"),
    ButtonDef::new("SW1SATYR", "SW2SATYR"),
    ButtonDef::new("SW1SKIN", "SW2SKIN"),
    ButtonDef::new("SW1VINE", "SW2VINE"),
    ButtonDef::new("SW1WOOD", "SW2WOOD"),
    // Doom II switches
    ButtonDef::new("SW1PANEL", "SW2PANEL"),
    ButtonDef::new("SW1ROCK", "SW2ROCK"),
    ButtonDef::new("SW1MET2", "SW2MET2"),
    ButtonDef::new("SW1WDMET", "SW2WDMET"),
    ButtonDef::new("SW1BRIK", "SW2BRIK"),
    ButtonDef::new("SW1MOD1", "SW2MOD1"),
    ButtonDef::new("SW1ZIM", "SW2ZIM"),
    ButtonDef::new("SW1STON6", "SW2STON6"),
    ButtonDef::new("SW1TEK", "SW2TEK"),
    ButtonDef::new("SW1MARB", "SW2MARB"),
    ButtonDef::new("SW1SKULL", "SW2SKULL"),
];

/// The partner of a switch texture from the built-in table, in either
/// direction
pub fn builtin_switch_partner(name: &str) -> Option<&'static str> {
    BUTTON_DEFS.iter().find_map(|def| {
        if def.name1.eq_ignore_ascii_case(name) {
            Some(def.name2)
        } else if def.name2.eq_ignore_ascii_case(name) {
            Some(def.name1)
        } else {
            None
        }
    })
}

/// Textures conventionally put first in `TEXTURE1`. Texture 0 is never drawn
/// by the engine so it has to be a throwaway.
pub const NULL_TEXTURE_NAMES: [&str; 4] = ["AASTINKY", "AASHITTY", "BADPATCH", "ABADONE"];
