use crate::resource::{
    Loadable, Options, SafeLoadable,
    clean::{cast, clean},
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Last-modified timestamp for resources that are cached downstream.
///
/// Embed it in an entity (usually with `#[serde(flatten)]`), load it before
/// the entity's own fields and pass the validation result through
/// [`settle`](Self::settle) so a valid resource is stamped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracking {
    /// Epoch milliseconds of the last successful validation.
    #[serde(rename = "mAt", default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<i64>,
}

impl Tracking {
    /// Key of the timestamp in raw and persisted payloads.
    pub const FIELD: &'static str = "mAt";

    /// Stamps the current time.
    pub fn touch(&mut self) {
        self.modified_at = Some(Utc::now().timestamp_millis());
    }

    /// Stamps the current time when `violations` is empty and hands them back.
    pub fn settle(&mut self, violations: Vec<String>) -> Vec<String> {
        if violations.is_empty() {
            self.touch();
        }
        violations
    }
}

impl Loadable for Tracking {
    fn load(&mut self, raw: &Value, _options: &Options) {
        self.modified_at = clean(raw.get(Self::FIELD), cast::integer, None);
    }
}

impl SafeLoadable for Tracking {
    fn protect(&mut self, safe: &Self) {
        self.modified_at = safe.modified_at;
    }
}
