//! Mark assignment between the two participants.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ParticipantId;
use crate::domain::game::Mark;

/// Which participant plays X and which plays O.
///
/// `o` is empty until the second participant joins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleAssignment {
    x: ParticipantId,
    o: Option<ParticipantId>,
}

impl RoleAssignment {
    pub fn new(x: ParticipantId, o: Option<ParticipantId>) -> Self {
        Self { x, o }
    }

    pub fn x(&self) -> &ParticipantId {
        &self.x
    }

    pub fn o(&self) -> Option<&ParticipantId> {
        self.o.as_ref()
    }

    pub fn holder_of(&self, mark: Mark) -> Option<&ParticipantId> {
        match mark {
            Mark::X => Some(&self.x),
            Mark::O => self.o.as_ref(),
        }
    }

    /// Mark played by `participant`, if they hold one.
    pub fn mark_of(&self, participant: &ParticipantId) -> Option<Mark> {
        if &self.x == participant {
            Some(Mark::X)
        } else if self.o.as_ref() == Some(participant) {
            Some(Mark::O)
        } else {
            None
        }
    }

    pub(crate) fn fill_o(&mut self, participant: ParticipantId) {
        self.o = Some(participant);
    }

    /// Assignment with the two roles exchanged; unchanged while `o` is empty.
    pub fn swapped(&self) -> RoleAssignment {
        match &self.o {
            Some(o) => RoleAssignment::new(o.clone(), Some(self.x.clone())),
            None => self.clone(),
        }
    }
}

/// How marks are re-assigned when a new round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkPolicy {
    /// Same participant keeps X.
    Keep,
    /// X changes hands every round.
    Alternate,
    /// Coin flip every round.
    #[default]
    Random,
}

impl MarkPolicy {
    /// Assignment for the next round.
    pub fn next_round(&self, current: &RoleAssignment) -> RoleAssignment {
        match self {
            MarkPolicy::Keep => current.clone(),
            MarkPolicy::Alternate => current.swapped(),
            MarkPolicy::Random => {
                if rand::random::<bool>() {
                    current.swapped()
                } else {
                    current.clone()
                }
            }
        }
    }
}
