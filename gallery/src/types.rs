use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use std::borrow::Cow;

/// Workflow label attached to an item. Stored as a plain string; labels
/// this build does not know about read back as `Unset`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ItemState {
    #[default]
    Unset,
    Todo,
    Doing,
    Done,
}

impl ItemState {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemState::Unset => "",
            ItemState::Todo => "todo",
            ItemState::Doing => "doing",
            ItemState::Done => "done",
        }
    }
}

impl std::str::FromStr for ItemState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "" | "none" => Ok(ItemState::Unset),
            "todo" => Ok(ItemState::Todo),
            "doing" => Ok(ItemState::Doing),
            "done" => Ok(ItemState::Done),
            other => anyhow::bail!("unknown state: {other}"),
        }
    }
}

impl From<String> for ItemState {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<ItemState> for String {
    fn from(s: ItemState) -> Self {
        s.as_str().to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Creation time in epoch milliseconds; unique across the collection.
    pub id: i64,
    /// Opaque image payload, usually a `data:` URL.
    #[serde(default)]
    pub image: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<String>,
    #[serde(default)]
    pub state: ItemState,
    #[serde(default, deserialize_with = "distinct_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>, // RFC3339
}

impl Item {
    /// Timestamp used for ordering: `created_at` when present, otherwise
    /// the timestamp encoded in the id.
    pub fn used_at(&self) -> Cow<'_, str> {
        match self.created_at.as_deref() {
            Some(ts) if !ts.is_empty() => Cow::Borrowed(ts),
            _ => Cow::Owned(id_timestamp(self.id)),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Append `tag` unless it is blank or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }
}

/// Millisecond id rendered the way browsers print `Date#toISOString`.
pub fn id_timestamp(id: i64) -> String {
    chrono::DateTime::from_timestamp_millis(id)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Split comma separated tag input, dropping blanks and repeats.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for t in input.split(',') {
        let t = t.trim();
        if !t.is_empty() && !out.iter().any(|x| x == t) {
            out.push(t.to_string());
        }
    }
    out
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagCategoryAssignment {
    pub tag: String,
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        serialize_with = "compact_number"
    )]
    pub priority: f64,
}

/// The record kinds held by a store.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Items,
    Categories,
    TagAssignments,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Items,
        RecordKind::Categories,
        RecordKind::TagAssignments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Items => "items",
            RecordKind::Categories => "categories",
            RecordKind::TagAssignments => "tagAssignments",
        }
    }
}

/// One line of an export stream.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "record", rename_all = "camelCase")]
pub enum Record {
    Items(Item),
    Categories(Category),
    TagAssignments(TagCategoryAssignment),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Items(_) => RecordKind::Items,
            Record::Categories(_) => RecordKind::Categories,
            Record::TagAssignments(_) => RecordKind::TagAssignments,
        }
    }
}

fn empty_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<String> = Option::deserialize(de)?;
    Ok(v.filter(|s| !s.is_empty()))
}

fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn optional_string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// Stored lists may repeat a tag; keep the first occurrence.
fn distinct_tags<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(de)?;
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    Ok(out)
}

// Anything that is not a finite JSON number counts as priority 0, numeric
// strings included.
fn lenient_priority<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(de)? {
        serde_json::Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    })
}

// Whole priorities are written as integers, matching what browsers store.
pub(crate) fn compact_number<S>(value: &f64, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        ser.serialize_i64(*value as i64)
    } else {
        ser.serialize_f64(*value)
    }
}
