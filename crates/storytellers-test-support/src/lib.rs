//! Shared stub backends, clocks and fixtures for the Storytellers gateway.

mod backends;
mod clock;
mod fixtures;

pub use backends::{Latency, StubBackends, StubIdentity, StubNarrative, StubPromptSets, StubReactions};
pub use clock::{FixedClock, ManualClock};
pub use fixtures::{draft, prompt_set, story, user};
