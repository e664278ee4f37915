//! Session aggregate entity.
//!
//! A session is one game between two participants. All mutations validate
//! first and only then touch state, so a rejected call leaves the session
//! exactly as it was.
//!
//! # Ownership
//!
//! Sessions are owned by the session registry and are only reachable
//! through its per-session guard.

use std::collections::BTreeSet;

use crate::domain::foundation::{ParticipantId, SessionId, Timestamp};
use crate::domain::game::{Board, Position, Terminal};
use crate::ports::RulesEngine;

use super::{
    LifecycleStatus, MarkPolicy, Outcome, RoleAssignment, RoleSnapshot, SessionError,
    SessionSnapshot,
};

/// Progress of the restart vote after a ballot was cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartProgress {
    /// Waiting for the other participant; `votes` ballots recorded.
    Pending { votes: usize },
    /// Both voted; a fresh round started.
    Reset,
}

/// Session aggregate - one two-party game.
///
/// # Invariants
///
/// - at most two participants, the first fixed at creation
/// - `turn` is a participant whenever the status is Active
/// - `outcome` is decided only while Finished
/// - `restart_votes` is a subset of the participants and never reaches 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// Participant who created the session.
    first: ParticipantId,

    /// Participant who joined, if any.
    second: Option<ParticipantId>,

    /// Current lifecycle status.
    status: LifecycleStatus,

    /// Participant allowed to act next.
    turn: ParticipantId,

    /// Who plays which mark this round.
    roles: RoleAssignment,

    /// Rules-engine owned board.
    board: Board,

    /// Result of the current round.
    outcome: Outcome,

    /// Participants asking for a fresh round.
    restart_votes: BTreeSet<ParticipantId>,

    /// Committed mutation count.
    version: u64,

    /// When the session was created.
    created_at: Timestamp,

    /// When the last mutation committed.
    updated_at: Timestamp,
}

impl Session {
    /// Create a session waiting for its second participant.
    ///
    /// The creator plays X and holds the first turn.
    pub fn new(id: SessionId, first: ParticipantId, board: Board) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            roles: RoleAssignment::new(first.clone(), None),
            turn: first.clone(),
            first,
            second: None,
            status: LifecycleStatus::Waiting,
            board,
            outcome: Outcome::Undecided,
            restart_votes: BTreeSet::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn participants(&self) -> (&ParticipantId, Option<&ParticipantId>) {
        (&self.first, self.second.as_ref())
    }

    pub fn status(&self) -> LifecycleStatus {
        self.status
    }

    pub fn turn(&self) -> &ParticipantId {
        &self.turn
    }

    pub fn roles(&self) -> &RoleAssignment {
        &self.roles
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn restart_votes(&self) -> &BTreeSet<ParticipantId> {
        &self.restart_votes
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Checks if `participant` is one of the two parties.
    pub fn is_participant(&self, participant: &ParticipantId) -> bool {
        &self.first == participant || self.second.as_ref() == Some(participant)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Seat the second participant and start the game.
    ///
    /// # Errors
    ///
    /// - `NotJoinable` if not waiting, already full, or `participant` is the creator
    pub fn join(&mut self, participant: ParticipantId) -> Result<(), SessionError> {
        if self.status != LifecycleStatus::Waiting {
            return Err(SessionError::not_joinable("session is not waiting for players"));
        }
        if self.second.is_some() {
            return Err(SessionError::not_joinable("session already has two participants"));
        }
        if participant == self.first {
            return Err(SessionError::not_joinable("participant already in session"));
        }

        self.ensure_transition(LifecycleStatus::Active)?;

        self.roles.fill_o(participant.clone());
        self.second = Some(participant);
        self.status = LifecycleStatus::Active;
        self.turn = self.roles.x().clone();
        self.commit();
        Ok(())
    }

    /// Play `actor`'s mark at `position`.
    ///
    /// Checks run in a fixed order: active, participant, turn, legality.
    ///
    /// # Errors
    ///
    /// - `GameNotActive` if waiting or finished
    /// - `NotParticipant` if `actor` is not seated
    /// - `NotYourTurn` if `actor` does not hold the turn
    /// - `IllegalPosition` if the rules engine rejects the cell
    pub fn apply_move(
        &mut self,
        actor: &ParticipantId,
        position: Position,
        rules: &dyn RulesEngine,
    ) -> Result<Terminal, SessionError> {
        if !self.status.accepts_moves() {
            return Err(SessionError::GameNotActive);
        }
        if !self.is_participant(actor) {
            return Err(SessionError::NotParticipant(actor.clone()));
        }
        if &self.turn != actor {
            return Err(SessionError::NotYourTurn);
        }
        if !rules.legal_position(&self.board, position) {
            return Err(SessionError::IllegalPosition(position));
        }
        let mark = self
            .roles
            .mark_of(actor)
            .ok_or_else(|| SessionError::NotParticipant(actor.clone()))?;

        let result = rules.apply_move(&self.board, mark, position);
        let next_status = match result.terminal {
            Terminal::Continue => LifecycleStatus::Active,
            Terminal::Win | Terminal::Draw => LifecycleStatus::Finished,
        };
        self.ensure_transition(next_status)?;

        self.board = result.board;
        self.status = next_status;
        match result.terminal {
            Terminal::Win => self.outcome = Outcome::Winner(actor.clone()),
            Terminal::Draw => self.outcome = Outcome::Draw,
            Terminal::Continue => {
                if let Some(next) = self.roles.holder_of(mark.other()).cloned() {
                    self.turn = next;
                }
            }
        }
        self.commit();
        Ok(result.terminal)
    }

    /// Record `voter`'s request for a fresh round.
    ///
    /// Voting twice counts once. When both participants have voted the
    /// board and outcome reset, marks are re-assigned per `policy`, and the
    /// new X holder takes the first turn.
    ///
    /// # Errors
    ///
    /// - `NotParticipant` if `voter` is not seated
    pub fn vote_restart(
        &mut self,
        voter: ParticipantId,
        fresh_board: Board,
        policy: MarkPolicy,
    ) -> Result<RestartProgress, SessionError> {
        if !self.is_participant(&voter) {
            return Err(SessionError::NotParticipant(voter));
        }
        let completes_vote =
            !self.restart_votes.contains(&voter) && self.restart_votes.len() == 1;
        if completes_vote {
            self.ensure_transition(LifecycleStatus::Active)?;
        }

        self.restart_votes.insert(voter);
        let progress = if self.restart_votes.len() == 2 {
            self.board = fresh_board;
            self.outcome = Outcome::Undecided;
            self.status = LifecycleStatus::Active;
            self.restart_votes.clear();
            self.roles = policy.next_round(&self.roles);
            self.turn = self.roles.x().clone();
            RestartProgress::Reset
        } else {
            RestartProgress::Pending {
                votes: self.restart_votes.len(),
            }
        };
        self.commit();
        Ok(progress)
    }

    /// Full wire view of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: self.version,
            id: self.id.clone(),
            board: self.board.clone(),
            turn: self.turn.to_string(),
            winner: self
                .outcome
                .winner()
                .map(ToString::to_string)
                .unwrap_or_default(),
            over: self.outcome.is_decided(),
            players: [
                self.first.to_string(),
                self.second.as_ref().map(ToString::to_string).unwrap_or_default(),
            ],
            current_role_assignment: RoleSnapshot {
                x: self.roles.x().to_string(),
                o: self.roles.o().map(ToString::to_string).unwrap_or_default(),
            },
            status: self.status,
            restart_votes: self.restart_votes.iter().cloned().collect(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_transition(&self, target: LifecycleStatus) -> Result<(), SessionError> {
        if self.status.can_transition_to(&target) {
            Ok(())
        } else {
            Err(SessionError::infrastructure(format!(
                "invalid status transition {:?} -> {:?}",
                self.status, target
            )))
        }
    }

    fn commit(&mut self) {
        self.version += 1;
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rules::TicTacToe;
    use crate::domain::game::Mark;

    fn pid(s: &str) -> ParticipantId {
        ParticipantId::new(s).unwrap()
    }

    fn waiting_session() -> Session {
        Session::new(SessionId::new("g1").unwrap(), pid("A"), TicTacToe.initial_board())
    }

    fn active_session() -> Session {
        let mut session = waiting_session();
        session.join(pid("B")).unwrap();
        session
    }

    #[test]
    fn new_session_is_waiting_with_one_participant() {
        let session = waiting_session();
        let snap = session.snapshot();
        assert_eq!(snap.status, LifecycleStatus::Waiting);
        assert_eq!(snap.players, ["A".to_string(), String::new()]);
        assert_eq!(snap.version, 0);
        assert!(!snap.over);
    }

    #[test]
    fn join_activates_and_gives_turn_to_creator() {
        let session = active_session();
        assert_eq!(session.status(), LifecycleStatus::Active);
        assert_eq!(session.turn(), &pid("A"));
        assert_eq!(session.roles().mark_of(&pid("B")), Some(Mark::O));
        assert_eq!(session.version(), 1);
    }

    #[test]
    fn join_rejects_creator_rejoining() {
        let mut session = waiting_session();
        let before = session.clone();
        let result = session.join(pid("A"));
        assert!(matches!(result, Err(SessionError::NotJoinable(_))));
        assert_eq!(session, before);
    }

    #[test]
    fn join_rejects_third_participant() {
        let mut session = active_session();
        assert!(matches!(session.join(pid("C")), Err(SessionError::NotJoinable(_))));
    }

    #[test]
    fn move_before_join_is_not_active() {
        let mut session = waiting_session();
        let result = session.apply_move(&pid("A"), Position::new(0, 0), &TicTacToe);
        assert_eq!(result, Err(SessionError::GameNotActive));
    }

    #[test]
    fn move_by_stranger_is_rejected() {
        let mut session = active_session();
        let result = session.apply_move(&pid("Z"), Position::new(0, 0), &TicTacToe);
        assert!(matches!(result, Err(SessionError::NotParticipant(_))));
    }

    #[test]
    fn out_of_turn_is_checked_before_legality() {
        let mut session = active_session();
        let before = session.clone();
        let result = session.apply_move(&pid("B"), Position::new(9, 9), &TicTacToe);
        assert_eq!(result, Err(SessionError::NotYourTurn));
        assert_eq!(session, before);
    }

    #[test]
    fn occupied_cell_is_illegal() {
        let mut session = active_session();
        session.apply_move(&pid("A"), Position::new(0, 0), &TicTacToe).unwrap();
        let result = session.apply_move(&pid("B"), Position::new(0, 0), &TicTacToe);
        assert_eq!(result, Err(SessionError::IllegalPosition(Position::new(0, 0))));
    }

    #[test]
    fn winning_line_finishes_with_winner() {
        let mut session = active_session();
        for (who, x, y) in [("A", 0, 0), ("B", 1, 1), ("A", 0, 1), ("B", 2, 2)] {
            session.apply_move(&pid(who), Position::new(x, y), &TicTacToe).unwrap();
        }
        let terminal = session
            .apply_move(&pid("A"), Position::new(0, 2), &TicTacToe)
            .unwrap();
        assert_eq!(terminal, Terminal::Win);
        assert_eq!(session.status(), LifecycleStatus::Finished);
        assert_eq!(session.outcome().winner(), Some(&pid("A")));
        assert_eq!(session.turn(), &pid("A"));

        let after = session.apply_move(&pid("B"), Position::new(2, 0), &TicTacToe);
        assert_eq!(after, Err(SessionError::GameNotActive));
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let mut session = active_session();
        // X O X / X O O / O X X
        let moves = [
            ("A", 0, 0),
            ("B", 0, 1),
            ("A", 0, 2),
            ("B", 1, 1),
            ("A", 1, 0),
            ("B", 1, 2),
            ("A", 2, 1),
            ("B", 2, 0),
            ("A", 2, 2),
        ];
        let mut last = Terminal::Continue;
        for (who, x, y) in moves {
            last = session.apply_move(&pid(who), Position::new(x, y), &TicTacToe).unwrap();
        }
        assert_eq!(last, Terminal::Draw);
        let snap = session.snapshot();
        assert!(snap.over);
        assert_eq!(snap.winner, "");
        assert_eq!(snap.status, LifecycleStatus::Finished);
    }

    #[test]
    fn restart_vote_is_idempotent_per_voter() {
        let mut session = active_session();
        let board = TicTacToe.initial_board();
        let first = session.vote_restart(pid("A"), board.clone(), MarkPolicy::Keep).unwrap();
        let second = session.vote_restart(pid("A"), board, MarkPolicy::Keep).unwrap();
        assert_eq!(first, RestartProgress::Pending { votes: 1 });
        assert_eq!(second, RestartProgress::Pending { votes: 1 });
        assert_eq!(session.restart_votes().len(), 1);
    }

    #[test]
    fn two_votes_reset_the_round() {
        let mut session = active_session();
        session.apply_move(&pid("A"), Position::new(0, 0), &TicTacToe).unwrap();
        let board = TicTacToe.initial_board();
        session.vote_restart(pid("B"), board.clone(), MarkPolicy::Alternate).unwrap();
        let progress = session.vote_restart(pid("A"), board, MarkPolicy::Alternate).unwrap();

        assert_eq!(progress, RestartProgress::Reset);
        assert_eq!(session.board().occupied(), 0);
        assert!(session.restart_votes().is_empty());
        assert_eq!(session.roles().x(), &pid("B"));
        assert_eq!(session.turn(), &pid("B"));
        assert_eq!(session.status(), LifecycleStatus::Active);
    }

    #[test]
    fn turn_follows_the_o_holder_after_roles_swap() {
        let mut session = active_session();
        let board = TicTacToe.initial_board();
        session.vote_restart(pid("A"), board.clone(), MarkPolicy::Alternate).unwrap();
        session.vote_restart(pid("B"), board, MarkPolicy::Alternate).unwrap();
        assert_eq!(session.turn(), &pid("B"));

        session.apply_move(&pid("B"), Position::new(0, 0), &TicTacToe).unwrap();

        assert_eq!(session.turn(), &pid("A"));
        assert_eq!(session.roles().holder_of(Mark::O), Some(&pid("A")));
    }

    #[test]
    fn status_changes_are_checked_against_lifecycle() {
        let session = waiting_session();
        assert!(session.ensure_transition(LifecycleStatus::Active).is_ok());
        assert!(matches!(
            session.ensure_transition(LifecycleStatus::Finished),
            Err(SessionError::Infrastructure(_))
        ));

        let mut finished = active_session();
        for (who, x, y) in [("A", 0, 0), ("B", 1, 0), ("A", 0, 1), ("B", 1, 1), ("A", 0, 2)] {
            finished.apply_move(&pid(who), Position::new(x, y), &TicTacToe).unwrap();
        }
        assert!(finished.ensure_transition(LifecycleStatus::Active).is_ok());
        assert!(finished.ensure_transition(LifecycleStatus::Waiting).is_err());
    }

    #[test]
    fn restart_vote_from_stranger_is_rejected() {
        let mut session = active_session();
        let result = session.vote_restart(pid("Z"), TicTacToe.initial_board(), MarkPolicy::Keep);
        assert!(matches!(result, Err(SessionError::NotParticipant(_))));
        assert!(session.restart_votes().is_empty());
    }

    #[test]
    fn every_commit_bumps_version() {
        let mut session = active_session();
        session.apply_move(&pid("A"), Position::new(0, 0), &TicTacToe).unwrap();
        session
            .vote_restart(pid("A"), TicTacToe.initial_board(), MarkPolicy::Keep)
            .unwrap();
        assert_eq!(session.version(), 3);
    }
}
