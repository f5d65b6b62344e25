use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Commodity {
    Gold,
    Silver,
    Copper,
    Platinum,
    Uranium,
    IronOre,
    Nickel,
    Zinc,
    Lead,
    Lithium,
    Oil,
    NaturalGas,
    Molybdenum,
    Diamond,
    RareEarths,
    Potash,
    Coal,
    Tungsten,
}

impl Commodity {
    pub const ALL: [Commodity; 18] = [
        Commodity::Gold,
        Commodity::Silver,
        Commodity::Copper,
        Commodity::Platinum,
        Commodity::Uranium,
        Commodity::IronOre,
        Commodity::Nickel,
        Commodity::Zinc,
        Commodity::Lead,
        Commodity::Lithium,
        Commodity::Oil,
        Commodity::NaturalGas,
        Commodity::Molybdenum,
        Commodity::Diamond,
        Commodity::RareEarths,
        Commodity::Potash,
        Commodity::Coal,
        Commodity::Tungsten,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Commodity::Gold => "gold",
            Commodity::Silver => "silver",
            Commodity::Copper => "copper",
            Commodity::Platinum => "platinum",
            Commodity::Uranium => "uranium",
            Commodity::IronOre => "iron_ore",
            Commodity::Nickel => "nickel",
            Commodity::Zinc => "zinc",
            Commodity::Lead => "lead",
            Commodity::Lithium => "lithium",
            Commodity::Oil => "oil",
            Commodity::NaturalGas => "natural_gas",
            Commodity::Molybdenum => "molybdenum",
            Commodity::Diamond => "diamond",
            Commodity::RareEarths => "rare_earths",
            Commodity::Potash => "potash",
            Commodity::Coal => "coal",
            Commodity::Tungsten => "tungsten",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Commodity::Gold => "Gold",
            Commodity::Silver => "Silver",
            Commodity::Copper => "Copper",
            Commodity::Platinum => "Platinum",
            Commodity::Uranium => "Uranium",
            Commodity::IronOre => "Iron Ore",
            Commodity::Nickel => "Nickel",
            Commodity::Zinc => "Zinc",
            Commodity::Lead => "Lead",
            Commodity::Lithium => "Lithium",
            Commodity::Oil => "Oil",
            Commodity::NaturalGas => "Natural Gas",
            Commodity::Molybdenum => "Molybdenum",
            Commodity::Diamond => "Diamond",
            Commodity::RareEarths => "Rare Earths",
            Commodity::Potash => "Potash",
            Commodity::Coal => "Coal",
            Commodity::Tungsten => "Tungsten",
        }
    }

    /// Maps the exposure column labels used in the TSX/TSXV company sheets.
    pub fn from_label(label: &str) -> Option<Commodity> {
        let normalized = label.trim().to_lowercase();
        let commodity = match normalized.as_str() {
            "gold" => Commodity::Gold,
            "silver" => Commodity::Silver,
            "copper" => Commodity::Copper,
            "platinum" | "platinum/pgm" | "pgm" => Commodity::Platinum,
            "uranium" => Commodity::Uranium,
            "iron" | "iron ore" | "iron_ore" => Commodity::IronOre,
            "nickel" => Commodity::Nickel,
            "zinc" => Commodity::Zinc,
            "lead" => Commodity::Lead,
            "lithium" => Commodity::Lithium,
            "oil" | "oil and gas" => Commodity::Oil,
            "natural gas" | "natural_gas" => Commodity::NaturalGas,
            "molybdenum" => Commodity::Molybdenum,
            "diamond" | "diamonds" => Commodity::Diamond,
            "rare earths" | "rare_earths" => Commodity::RareEarths,
            "potash" => Commodity::Potash,
            "coal" => Commodity::Coal,
            "tungsten" => Commodity::Tungsten,
            _ => return None,
        };
        Some(commodity)
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
