//! Score and challenge bookkeeping.
//!
//! The [`Ledger`] is a service object shared by reference between whoever reports scores and whoever reads
//! rankings. All state lives behind one mutex, so submissions from several threads serialize cleanly.
//! Notifications are queued, never awaited, so no ledger call blocks on delivery.

pub mod notify;

use std::collections::HashMap;
use std::num::NonZeroU32;

use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::constants::LEADERBOARD_SIZE;

pub use self::notify::{Notification, NotificationSender};
use self::notify::NotifyError;

/// One submitted score. Never changes once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameScore {
    pub player_id: String,
    pub player_name: Option<String>,
    pub score: u32,
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengeStatus {
    Pending,
    Completed,
    /// Expired before the target player beat it.
    Failed,
}

/// A target score one player set for another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameChallenge {
    pub challenger_id: String,
    pub challenger_name: Option<String>,
    pub target_score: NonZeroU32,
    pub timestamp: OffsetDateTime,
    pub status: ChallengeStatus,
}

/// The player ledger operations act on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Sorted by score, highest first. Equal scores keep submission order.
    leaderboard: Vec<GameScore>,
    /// Challenges keyed by the id of the player they are addressed to.
    challenges: HashMap<String, Vec<GameChallenge>>,
    current: Option<Player>,
}

pub struct Ledger {
    state: Mutex<LedgerState>,
    notifications: Option<NotificationSender>,
    high_score_subscribers: Vec<u64>,
}

impl Ledger {
    /// Creates a ledger that queues notifications on `notifications`.
    ///
    /// `high_score_subscribers` are the channels told about every new personal best.
    pub fn new(notifications: NotificationSender, high_score_subscribers: Vec<u64>) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            notifications: Some(notifications),
            high_score_subscribers,
        }
    }

    /// Creates a ledger that drops every notification.
    pub fn without_notifications() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            notifications: None,
            high_score_subscribers: Vec::new(),
        }
    }

    pub fn set_current_player(&self, id: impl Into<String>, name: Option<String>) {
        let player = Player { id: id.into(), name };
        debug!(player = %player.id, "Current player set");
        self.state.lock().current = Some(player);
    }

    pub fn clear_current_player(&self) {
        self.state.lock().current = None;
    }

    pub fn current_player(&self) -> Option<Player> {
        self.state.lock().current.clone()
    }

    /// Records a score for the current player.
    ///
    /// Returns false only when no player is set. Completes any pending challenges the score meets, and tells
    /// the high score subscribers when it is the player's best so far.
    pub fn submit_score(&self, score: u32) -> bool {
        let mut state = self.state.lock();
        let Some(player) = state.current.clone() else {
            warn!(score, "Score submitted without a current player");
            return false;
        };

        let entry = GameScore {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            score,
            timestamp: OffsetDateTime::now_utc(),
        };
        state.leaderboard.push(entry);
        state.leaderboard.sort_by(|a, b| b.score.cmp(&a.score));
        info!(player = %player.id, score, "Score recorded");

        let completed = complete_challenges(&mut state, &player.id, score);
        for challenge in &completed {
            self.notify_challenge_completed(&player, challenge, score);
        }

        if is_personal_best(&state.leaderboard, &player.id, score) {
            self.notify_high_score(&player, score);
        }

        true
    }

    /// Issues a challenge from the current player to `target_player_id`.
    ///
    /// Returns false only when no player is set.
    pub fn create_challenge(&self, target_player_id: &str, target_score: NonZeroU32) -> bool {
        let mut state = self.state.lock();
        let Some(player) = state.current.clone() else {
            warn!(target_player = target_player_id, "Challenge created without a current player");
            return false;
        };

        state
            .challenges
            .entry(target_player_id.to_string())
            .or_default()
            .push(GameChallenge {
                challenger_id: player.id.clone(),
                challenger_name: player.name.clone(),
                target_score,
                timestamp: OffsetDateTime::now_utc(),
                status: ChallengeStatus::Pending,
            });
        drop(state);

        info!(challenger = %player.id, target_player = target_player_id, target_score = target_score.get(), "Challenge created");
        self.notify_challenge_issued(&player, target_player_id, target_score);
        true
    }

    /// The top scores overall, highest first.
    pub fn leaderboard(&self) -> Vec<GameScore> {
        self.state.lock().leaderboard.iter().take(LEADERBOARD_SIZE).cloned().collect()
    }

    /// The top scores among `friend_ids` and the current player, highest first.
    pub fn friend_leaderboard(&self, friend_ids: &[&str]) -> Vec<GameScore> {
        let state = self.state.lock();
        let current = state.current.as_ref().map(|player| player.id.as_str());

        state
            .leaderboard
            .iter()
            .filter(|entry| {
                friend_ids.contains(&entry.player_id.as_str()) || current == Some(entry.player_id.as_str())
            })
            .take(LEADERBOARD_SIZE)
            .cloned()
            .collect()
    }

    /// Challenges addressed to the current player, oldest first.
    pub fn user_challenges(&self) -> Vec<GameChallenge> {
        let state = self.state.lock();
        state
            .current
            .as_ref()
            .and_then(|player| state.challenges.get(&player.id))
            .cloned()
            .unwrap_or_default()
    }

    /// Fails every pending challenge issued more than `max_age` before `now`. Returns how many failed.
    pub fn expire_stale_challenges(&self, now: OffsetDateTime, max_age: Duration) -> usize {
        let mut state = self.state.lock();
        let mut expired = 0;

        for challenge in state.challenges.values_mut().flatten() {
            if challenge.status == ChallengeStatus::Pending && now - challenge.timestamp > max_age {
                challenge.status = ChallengeStatus::Failed;
                expired += 1;
            }
        }

        if expired > 0 {
            info!(expired, "Expired stale challenges");
        }
        expired
    }

    fn notify_high_score(&self, player: &Player, score: u32) {
        let Some(name) = &player.name else {
            debug!(player = %player.id, "No display name, skipping high score notification");
            return;
        };

        for recipient in &self.high_score_subscribers {
            self.send(Notification {
                recipient: *recipient,
                title: "New High Score!".to_string(),
                body: format!("{name} just scored {score} in DinoRun! Can you beat it?"),
            });
        }
    }

    fn notify_challenge_issued(&self, player: &Player, target_player_id: &str, target_score: NonZeroU32) {
        let Some(name) = &player.name else {
            debug!(player = %player.id, "No display name, skipping challenge notification");
            return;
        };
        let Some(recipient) = numeric_channel(target_player_id) else {
            return;
        };

        self.send(Notification {
            recipient,
            title: "New DinoRun Challenge!".to_string(),
            body: format!("{name} has challenged you to beat a score of {target_score} in DinoRun!"),
        });
    }

    fn notify_challenge_completed(&self, player: &Player, challenge: &GameChallenge, score: u32) {
        let Some(name) = &player.name else {
            debug!(player = %player.id, "No display name, skipping completion notification");
            return;
        };
        let Some(recipient) = numeric_channel(&challenge.challenger_id) else {
            return;
        };

        self.send(Notification {
            recipient,
            title: "Challenge Completed!".to_string(),
            body: format!(
                "{name} completed your challenge by scoring {score} (target: {})!",
                challenge.target_score
            ),
        });
    }

    fn send(&self, notification: Notification) {
        let Some(sender) = &self.notifications else {
            debug!(recipient = notification.recipient, "Notifications disabled, dropping");
            return;
        };

        if sender.send(notification).is_err() {
            warn!(error = %NotifyError::Closed, "Notification dropped");
        }
    }
}

/// Marks every pending challenge for `player_id` that `score` meets as completed, returning the ones that changed.
fn complete_challenges(state: &mut LedgerState, player_id: &str, score: u32) -> Vec<GameChallenge> {
    let Some(challenges) = state.challenges.get_mut(player_id) else {
        return Vec::new();
    };

    challenges
        .iter_mut()
        .filter(|challenge| challenge.status == ChallengeStatus::Pending && score >= challenge.target_score.get())
        .map(|challenge| {
            challenge.status = ChallengeStatus::Completed;
            info!(
                challenger = %challenge.challenger_id,
                target_score = challenge.target_score.get(),
                score,
                "Challenge completed"
            );
            challenge.clone()
        })
        .collect()
}

/// Whether `score`, already recorded, is the player's first or at least as good as every other one.
fn is_personal_best(leaderboard: &[GameScore], player_id: &str, score: u32) -> bool {
    let mut scores = leaderboard.iter().filter(|entry| entry.player_id == player_id).map(|entry| entry.score);
    let best = scores.next();
    let count = 1 + scores.count();
    count == 1 || best.is_some_and(|best| score >= best)
}

/// Notification channels are numeric; anything else (a wallet address, say) cannot be notified.
fn numeric_channel(player_id: &str) -> Option<u64> {
    match player_id.parse() {
        Ok(channel) => Some(channel),
        Err(_) => {
            info!(player = player_id, "No numeric notification channel, skipping");
            None
        }
    }
}
