use serde::{
    Deserialize,
    Serialize,
};

/// A Mon's stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTable {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

fn default_level() -> u8 {
    50
}

/// Data for a Mon on a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonData {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u8,
    pub stats: StatTable,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    pub moves: Vec<String>,
}

/// A team of Mons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamData {
    pub members: Vec<MonData>,
}

#[cfg(test)]
mod team_data_test {
    use crate::teams::{
        StatTable,
        TeamData,
    };

    #[test]
    fn deserializes_team() {
        let team: TeamData = serde_json::from_str(
            r#"{
                "members": [
                    {
                        "name": "Pikachu",
                        "stats": { "hp": 95, "atk": 75, "def": 50, "spa": 70, "spd": 60, "spe": 110 },
                        "ability": "Static",
                        "moves": ["Thunderbolt", "Thunder Wave"]
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(team.members.len(), 1);
        let mon = &team.members[0];
        assert_eq!(mon.level, 50);
        assert_eq!(mon.item, None);
        assert_eq!(
            mon.stats,
            StatTable {
                hp: 95,
                atk: 75,
                def: 50,
                spa: 70,
                spd: 60,
                spe: 110,
            }
        );
    }
}
