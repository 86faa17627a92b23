use serde::{Deserialize, Serialize};

/// Where to find one target field in a source row: a column name for named
/// rows, a zero-based cell index for positional rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef {
    Index(usize),
    Name(String),
}

impl From<&str> for FieldRef {
    fn from(name: &str) -> Self {
        FieldRef::Name(name.to_owned())
    }
}

impl From<usize> for FieldRef {
    fn from(index: usize) -> Self {
        FieldRef::Index(index)
    }
}

/// Declarative mapping from canonical metric fields to source cells.
///
/// This replaces the hard-coded column indexing the dashboard variants each
/// carried; "how to find this act's fields in this source" travels with the
/// source, not the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub name: FieldRef,
    pub cost: FieldRef,
    pub primary_followers: FieldRef,
    pub associated_followers: FieldRef,
    pub streaming_listeners: FieldRef,
}

impl FieldMapping {
    /// Column names used by the production booking sheet.
    pub fn sheet_default() -> Self {
        Self {
            name: "Band Name".into(),
            cost: "Average Cost".into(),
            primary_followers: "IG Followers".into(),
            associated_followers: "Associated IG Followers".into(),
            streaming_listeners: "Spotify Monthlies".into(),
        }
    }

    /// True if the mapping addresses cells by column name (named rows),
    /// false if by position.
    pub fn is_named(&self) -> bool {
        matches!(self.name, FieldRef::Name(_))
    }

    /// Cell positions used by the headerless CSV export of the same sheet.
    pub fn positional_default() -> Self {
        Self {
            name: 0.into(),
            cost: 1.into(),
            primary_followers: 2.into(),
            associated_followers: 3.into(),
            streaming_listeners: 7.into(),
        }
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::sheet_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_mixed_refs() {
        let s = r#"
        {
            "name": "Artist",
            "cost": "Cost",
            "primary_followers": 2,
            "associated_followers": 3,
            "streaming_listeners": "Spotify Listeners"
        }
        "#;
        let mapping: FieldMapping = serde_json::from_str(s).unwrap();
        assert_eq!(mapping.name, FieldRef::Name("Artist".to_owned()));
        assert_eq!(mapping.primary_followers, FieldRef::Index(2));
    }

    #[test]
    fn deserializes_from_toml() {
        let s = r#"
            name = "Band Name"
            cost = "Average Cost"
            primary_followers = "IG Followers"
            associated_followers = "Associated IG Followers"
            streaming_listeners = "Spotify Monthlies"
        "#;
        let mapping: FieldMapping = toml::from_str(s).unwrap();
        assert_eq!(mapping, FieldMapping::sheet_default());
    }
}
