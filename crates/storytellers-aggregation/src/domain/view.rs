//! The aggregated view: one request's merged sub-results, keyed by slot.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use storytellers_core::error::GatewayError;
use storytellers_core::outcome::Service;

/// Whether a sub-request's failure aborts the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Failure fails the whole aggregate.
    Required,
    /// Failure leaves an absence marker; the aggregate still succeeds.
    Optional,
}

/// Why an optional slot is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum DegradationCause {
    /// The collaborator did not answer.
    Unavailable {
        /// The collaborator.
        service: Service,
    },
    /// The collaborator refused the sub-request.
    Rejected {
        /// HTTP status of the refusal.
        status: u16,
        /// The collaborator's description.
        description: String,
    },
}

/// A partial degradation: an optional slot that could not be filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Degradation {
    /// The slot left empty.
    pub slot: &'static str,
    /// What went wrong.
    #[serde(flatten)]
    pub cause: DegradationCause,
}

impl Degradation {
    /// The error this degradation would have been had the slot been
    /// required.
    #[must_use]
    pub fn to_error(&self) -> GatewayError {
        match &self.cause {
            DegradationCause::Unavailable { service } => GatewayError::ServiceUnavailable(*service),
            DegradationCause::Rejected {
                status,
                description,
            } => GatewayError::from_application_error(*status, description.clone()),
        }
    }
}

/// Content of one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    /// The collaborator answered with a payload.
    Present(Value),
    /// The collaborator answered with nothing (empty but present).
    Empty,
    /// An optional sub-request failed.
    Absent(Degradation),
}

/// Merged result of one aggregate, in declared slot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedView {
    slots: Vec<(&'static str, SlotValue)>,
}

impl AggregatedView {
    /// Stores a slot, replacing any previous value under the same name.
    pub fn insert(&mut self, slot: &'static str, value: SlotValue) {
        match self.slots.iter_mut().find(|(name, _)| *name == slot) {
            Some(entry) => entry.1 = value,
            None => self.slots.push((slot, value)),
        }
    }

    /// Appends every slot of a later aggregation stage.
    pub fn extend(&mut self, other: AggregatedView) {
        for (slot, value) in other.slots {
            self.insert(slot, value);
        }
    }

    /// Looks up a slot.
    #[must_use]
    pub fn get(&self, slot: &str) -> Option<&SlotValue> {
        self.slots
            .iter()
            .find(|(name, _)| *name == slot)
            .map(|(_, value)| value)
    }

    /// Slot names in declared order.
    pub fn slot_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|(name, _)| *name)
    }

    /// Returns `true` if the slot holds an absence marker.
    #[must_use]
    pub fn is_absent(&self, slot: &str) -> bool {
        matches!(self.get(slot), Some(SlotValue::Absent(_)))
    }

    /// Every partial degradation, in declared slot order.
    #[must_use]
    pub fn degradations(&self) -> Vec<Degradation> {
        self.slots
            .iter()
            .filter_map(|(_, value)| match value {
                SlotValue::Absent(degradation) => Some(degradation.clone()),
                _ => None,
            })
            .collect()
    }

    /// Decodes a present slot. Empty, absent and unknown slots are `None`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::ApplicationRejected` if the payload does not
    /// decode as `T`.
    pub fn payload<T: DeserializeOwned>(&self, slot: &str) -> Result<Option<T>, GatewayError> {
        match self.get(slot) {
            Some(SlotValue::Present(value)) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| {
                    GatewayError::ApplicationRejected(format!(
                        "the {slot} payload could not be read: {e}"
                    ))
                }),
            _ => Ok(None),
        }
    }

    /// Decodes a slot, substituting `T::default()` (a zero-value block) when
    /// it is empty or absent.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::ApplicationRejected` if the payload does not
    /// decode as `T`.
    pub fn payload_or_default<T: DeserializeOwned + Default>(
        &self,
        slot: &str,
    ) -> Result<T, GatewayError> {
        Ok(self.payload(slot)?.unwrap_or_default())
    }
}
