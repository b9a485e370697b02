use serde::{Deserialize, Deserializer};

/// A conversation returned by the threads listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_draft_or_message: LatestActivity,
}

impl Thread {
    /// Build a thread whose latest message or draft is dated `date`.
    #[must_use]
    pub fn new(id: impl Into<String>, date: i64) -> Self {
        Self {
            id: id.into(),
            latest_draft_or_message: LatestActivity { date },
        }
    }

    /// Epoch timestamp of the most recent message or draft.
    #[must_use]
    pub fn date(&self) -> i64 {
        self.latest_draft_or_message.date
    }
}

/// The most recent message or draft of a thread. Only the date is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LatestActivity {
    pub date: i64,
}

/// One page of the threads listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadsPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Thread>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl ThreadsPage {
    /// Cursor for the following page, if the server returned a non-empty one.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Decode an explicit JSON `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
