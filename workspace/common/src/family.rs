use serde::{Deserialize, Deserializer, Serialize};

/// MySQL `BOOLEAN` columns come back as `0`/`1`; accept either form.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|flag| match flag {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    }))
}

/// One row of `GET /user/{user_id}/families`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FamilySummary {
    pub family_id: String,
    pub family_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_primary_today: Option<bool>,
}

/// One row of `GET /family/{family_id}/members`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FamilyMember {
    pub user_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Identity of a family as shared between pages.
///
/// Missing fields deserialize to empty strings, so a partially filled
/// `selectedFamily` entry still parses and is simply not complete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FamilyRef {
    #[serde(default)]
    pub family_id: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub family_code: String,
}

impl FamilyRef {
    pub const ID_PARAM: &'static str = "family_id";
    pub const NAME_PARAM: &'static str = "family_name";
    pub const CODE_PARAM: &'static str = "family_code";

    pub fn new(
        family_id: impl Into<String>,
        family_name: impl Into<String>,
        family_code: impl Into<String>,
    ) -> Self {
        Self {
            family_id: family_id.into(),
            family_name: family_name.into(),
            family_code: family_code.into(),
        }
    }

    /// All three fields are present and non-blank.
    pub fn is_complete(&self) -> bool {
        [&self.family_id, &self.family_name, &self.family_code]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Query parameters of a share link, in link order.
    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            (Self::ID_PARAM, self.family_id.as_str()),
            (Self::NAME_PARAM, self.family_name.as_str()),
            (Self::CODE_PARAM, self.family_code.as_str()),
        ]
    }
}
