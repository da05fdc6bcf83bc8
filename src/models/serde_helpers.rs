//! Serde helpers for keeping the persisted JSON shape stable

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use super::signature::{PartialSignature, Signature, SignatureTimeline};

/// Serialize Option<T> as null when None (don't skip the field)
pub fn serialize_option_as_null<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_some(v),
        None => serializer.serialize_none(),
    }
}

/// The signature timeline is persisted as a sparse array: one slot per bar boundary
/// up to the last anchored entry, `null` in the holes.
impl Serialize for SignatureTimeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.last_index() + 1;
        let mut seq = serializer.serialize_seq(Some(len))?;
        for idx in 0..len {
            seq.serialize_element(&self.get(idx))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SignatureTimeline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slots: Vec<Option<PartialSignature>> = Vec::deserialize(deserializer)?;
        let entries = slots
            .into_iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|entry| (idx, entry)));
        Ok(SignatureTimeline::from_entries(entries, &Signature::default()))
    }
}
