use tracing::debug;

use crate::form::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Success,
    Failure,
}

/// Identifies one outstanding submission. Only the ticket issued by the
/// current generation of the form may settle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    generation: u64,
    sequence: u64,
}

impl SubmissionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Tracks the `Idle → Submitting → {Success, Failure} → Idle` cycle.
///
/// A second `begin` while a request is outstanding is rejected with
/// [`FormError::SubmissionInFlight`].
#[derive(Debug, Clone)]
pub struct SubmissionCoordinator {
    phase: SubmitPhase,
    generation: u64,
    sequence: u64,
    in_flight: Option<u64>,
    last_outcome: Option<SubmitPhase>,
}

impl Default for SubmissionCoordinator {
    fn default() -> Self {
        Self {
            phase: SubmitPhase::Idle,
            generation: 0,
            sequence: 0,
            in_flight: None,
            last_outcome: None,
        }
    }
}

impl SubmissionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    /// `Success` or `Failure` of the most recently settled submission.
    pub fn last_outcome(&self) -> Option<SubmitPhase> {
        self.last_outcome
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn begin(&mut self) -> Result<SubmissionTicket, FormError> {
        if self.in_flight.is_some() {
            return Err(FormError::SubmissionInFlight);
        }
        self.sequence += 1;
        self.in_flight = Some(self.sequence);
        self.phase = SubmitPhase::Submitting;
        debug!(
            generation = self.generation,
            sequence = self.sequence,
            "submission started"
        );
        Ok(SubmissionTicket {
            generation: self.generation,
            sequence: self.sequence,
        })
    }

    /// Whether a response carrying `ticket` may still be applied.
    pub fn accepts(&self, ticket: SubmissionTicket) -> bool {
        ticket.generation == self.generation && self.in_flight == Some(ticket.sequence)
    }

    /// Closes the cycle for `ticket`, passing through `Success` or `Failure`
    /// back to `Idle`.
    pub fn settle(&mut self, ticket: SubmissionTicket, succeeded: bool) -> Result<(), FormError> {
        if !self.accepts(ticket) {
            return Err(FormError::NoSubmissionPending);
        }
        let outcome = if succeeded {
            SubmitPhase::Success
        } else {
            SubmitPhase::Failure
        };
        self.phase = outcome;
        debug!(?outcome, sequence = ticket.sequence, "submission settled");
        self.last_outcome = Some(outcome);
        self.in_flight = None;
        self.phase = SubmitPhase::Idle;
        Ok(())
    }

    /// Starts a new generation. Tickets from earlier generations are refused.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.phase = SubmitPhase::Idle;
        self.last_outcome = None;
    }
}
