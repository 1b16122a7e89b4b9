//! The interactive recommend / feedback loop.
//!
//! Each iteration asks for two context choices, ranks the whole catalog,
//! shows the top pick, and reports the user's verdict back as a reward.

use crate::keys::KeySource;
use crate::menu::{wants_exit, Choice, Feedback, Menu, CAR_FEATURES, CAR_TYPES};
use anyhow::{Context, Result};
use autorank_core::{
    ActionCatalog, ContextFeature, RankRequest, RankResponse, RankingService, RewardRequest,
};
use std::io::Write;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Action ids held at their current rank position.
    pub exclusions: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exclusions: vec!["juice".to_string()],
        }
    }
}

/// Tally of the verdicts given during one session.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionStats {
    /// Recommendations shown (liked + not liked).
    pub total: usize,
    pub liked: usize,
    pub not_liked: usize,
    pub total_reward: f32,
}

impl SessionStats {
    fn record(&mut self, feedback: Feedback) {
        self.total += 1;
        match feedback {
            Feedback::Liked => self.liked += 1,
            Feedback::NotLiked | Feedback::Invalid => self.not_liked += 1,
        }
        self.total_reward += feedback.reward();
    }

    /// Share of liked recommendations (0.0 to 1.0).
    #[must_use]
    pub fn like_rate(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.liked as f32 / self.total as f32
        }
    }
}

enum State {
    AwaitingContext,
    AwaitingRanking(Vec<ContextFeature>),
    AwaitingFeedback(RankResponse),
    Done,
}

pub struct Session<'a, S, K, W> {
    catalog: &'a ActionCatalog,
    service: S,
    keys: K,
    out: W,
    config: SessionConfig,
    stats: SessionStats,
}

impl<'a, S, K, W> Session<'a, S, K, W>
where
    S: RankingService,
    K: KeySource,
    W: Write,
{
    pub fn new(
        catalog: &'a ActionCatalog,
        service: S,
        keys: K,
        out: W,
        config: SessionConfig,
    ) -> Self {
        Self {
            catalog,
            service,
            keys,
            out,
            config,
            stats: SessionStats::default(),
        }
    }

    /// Runs until the user quits. Service errors end the session.
    pub fn run(mut self) -> Result<SessionStats> {
        let mut iteration = 0usize;
        let mut state = State::AwaitingContext;

        loop {
            state = match state {
                State::AwaitingContext => {
                    iteration += 1;
                    writeln!(self.out, "\nIteration: {iteration}")?;
                    State::AwaitingRanking(self.gather_context()?)
                }
                State::AwaitingRanking(context) => {
                    let request = RankRequest::new(
                        self.catalog.actions().to_vec(),
                        context,
                        self.config.exclusions.clone(),
                    );
                    tracing::debug!(
                        request_id = %request.request_id,
                        actions = request.actions.len(),
                        "ranking"
                    );
                    let response = self
                        .service
                        .rank(&request)
                        .context("Ranking request failed")?;
                    State::AwaitingFeedback(response)
                }
                State::AwaitingFeedback(response) => {
                    self.collect_feedback(&response)?;
                    writeln!(self.out, "\nPress q to break, any other key to continue:")?;
                    self.out.flush()?;
                    if wants_exit(self.keys.next_key()?) {
                        State::Done
                    } else {
                        State::AwaitingContext
                    }
                }
                State::Done => break,
            };
        }

        writeln!(
            self.out,
            "\nShown {} recommendation(s): {} liked, {} not liked, total reward {:.1} ({:.1}% liked).",
            self.stats.total,
            self.stats.liked,
            self.stats.not_liked,
            self.stats.total_reward,
            self.stats.like_rate() * 100.0
        )?;
        Ok(self.stats)
    }

    fn ask(&mut self, menu: &Menu) -> Result<&'static str> {
        writeln!(self.out, "\n{}", menu.prompt())?;
        self.out.flush()?;
        let choice = menu.choose(self.keys.next_key()?);
        if let Choice::Defaulted(value) = choice {
            writeln!(
                self.out,
                "\nEntered value is invalid. Setting feature value to {value}."
            )?;
        }
        Ok(choice.value())
    }

    fn gather_context(&mut self) -> Result<Vec<ContextFeature>> {
        let car_type = self.ask(&CAR_TYPES)?;
        let car_features = self.ask(&CAR_FEATURES)?;

        let first = self.catalog.feature_label(1).unwrap_or("feat1");
        let second = self.catalog.feature_label(2).unwrap_or("feat2");
        writeln!(
            self.out,
            "\nContext: {first} = {car_type}, {second} = {car_features}"
        )?;

        Ok(vec![
            ContextFeature::new("feat1", car_type),
            ContextFeature::new("feat2", car_features),
        ])
    }

    fn collect_feedback(&mut self, response: &RankResponse) -> Result<()> {
        writeln!(
            self.out,
            "\nPersonalizer service thinks you would like to have: {}. Is this correct? (y/n)",
            response.reward_action_id
        )?;
        self.out.flush()?;

        let feedback = Feedback::from_key(self.keys.next_key()?);
        let message = match feedback {
            Feedback::Liked => "Great! Enjoy your car.",
            Feedback::NotLiked => "You didn't like the recommended car.",
            Feedback::Invalid => {
                "Entered choice is invalid. Service assumes that you didn't like the recommended car."
            }
        };
        writeln!(self.out, "\n{message}")?;

        writeln!(
            self.out,
            "\nPersonalizer service ranked the actions with the probabilities as below:"
        )?;
        for ranked in &response.ranking {
            writeln!(self.out, "{} {}", ranked.id, ranked.probability)?;
        }

        let reward = RewardRequest {
            value: feedback.reward(),
        };
        self.service
            .reward(&response.event_id, reward)
            .with_context(|| format!("Reward for event {} failed", response.event_id))?;
        self.stats.record(feedback);
        Ok(())
    }
}
