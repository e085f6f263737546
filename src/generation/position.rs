//! Position-code dictionary.

/// Playing positions known to the prompt builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Goalkeeper,
    CentreBack,
    LeftBack,
    RightBack,
    LeftWingBack,
    RightWingBack,
    DefensiveMidfield,
    CentralMidfield,
    AttackingMidfield,
    LeftMidfield,
    RightMidfield,
    LeftWinger,
    RightWinger,
    SecondStriker,
    CentreForward,
}

impl Position {
    /// Look up a position code such as `CB` or `cdm`.
    pub fn from_code(code: &str) -> Option<Position> {
        let position = match code.trim().to_ascii_uppercase().as_str() {
            "GK" | "TW" => Position::Goalkeeper,
            "CB" | "IV" => Position::CentreBack,
            "LB" | "LV" => Position::LeftBack,
            "RB" | "RV" => Position::RightBack,
            "LWB" => Position::LeftWingBack,
            "RWB" => Position::RightWingBack,
            "DM" | "CDM" | "DMF" => Position::DefensiveMidfield,
            "CM" | "ZM" => Position::CentralMidfield,
            "AM" | "CAM" | "OM" => Position::AttackingMidfield,
            "LM" => Position::LeftMidfield,
            "RM" => Position::RightMidfield,
            "LW" | "LA" => Position::LeftWinger,
            "RW" | "RA" => Position::RightWinger,
            "SS" | "HS" => Position::SecondStriker,
            "CF" | "ST" | "MS" => Position::CentreForward,
            _ => return None,
        };
        Some(position)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::CentreBack => "Centre-Back",
            Position::LeftBack => "Left-Back",
            Position::RightBack => "Right-Back",
            Position::LeftWingBack => "Left Wing-Back",
            Position::RightWingBack => "Right Wing-Back",
            Position::DefensiveMidfield => "Defensive Midfielder",
            Position::CentralMidfield => "Central Midfielder",
            Position::AttackingMidfield => "Attacking Midfielder",
            Position::LeftMidfield => "Left Midfielder",
            Position::RightMidfield => "Right Midfielder",
            Position::LeftWinger => "Left Winger",
            Position::RightWinger => "Right Winger",
            Position::SecondStriker => "Second Striker",
            Position::CentreForward => "Centre-Forward",
        }
    }
}

/// Human-readable position; unknown codes are shown verbatim.
pub fn describe_position(code: Option<&str>) -> String {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => match Position::from_code(code) {
            Some(position) => format!("{} ({})", position.label(), code.to_ascii_uppercase()),
            None => code.to_string(),
        },
        None => "unknown".to_string(),
    }
}
