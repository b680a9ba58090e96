//! Affiliate unlock gate shown before chapter text.
//!
//! The machine is pure: callers feed it events and carry out the returned
//! effects (open a tab, arm a one-second timer, toggle elements). Unlock
//! state is not remembered between page views, so every chapter view starts
//! `Locked`.

use rand::Rng;
use rand::seq::IndexedRandom as _;

use crate::formats::AffiliateLink;

pub const COUNTDOWN_TICKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocking { remaining: u32 },
    Unlocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEffect {
    DisableControl,
    EnableControl,
    OpenLink(String),
    ShowCountdown(u32),
    StartTimer,
    StopTimer,
    HideGate,
    RevealContent,
    Diagnostic(String),
}

#[derive(Debug, Clone)]
pub struct GateMachine {
    state: GateState,
    countdown: u32,
}

impl GateMachine {
    /// A page without gate markup shows its content straight away.
    pub fn for_page(has_gate: bool) -> (Self, Vec<GateEffect>) {
        Self::with_countdown(has_gate, COUNTDOWN_TICKS)
    }

    pub fn with_countdown(has_gate: bool, countdown: u32) -> (Self, Vec<GateEffect>) {
        let countdown = countdown.max(1);
        if has_gate {
            (
                Self {
                    state: GateState::Locked,
                    countdown,
                },
                Vec::new(),
            )
        } else {
            (
                Self {
                    state: GateState::Unlocked,
                    countdown,
                },
                vec![GateEffect::RevealContent],
            )
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// User pressed the unlock control. `affiliates` is the outcome of
    /// loading the affiliate set; an error unlocks immediately.
    ///
    /// Ignored unless the gate is `Locked`, so repeated presses during the
    /// countdown start nothing new.
    pub fn activate<R: Rng + ?Sized>(
        &mut self,
        affiliates: Result<&[AffiliateLink], String>,
        rng: &mut R,
    ) -> Vec<GateEffect> {
        if self.state != GateState::Locked {
            return Vec::new();
        }

        let links = match affiliates {
            Ok(links) => links,
            Err(reason) => {
                let mut effects = vec![GateEffect::Diagnostic(format!(
                    "affiliate links unavailable, unlocking: {reason}"
                ))];
                effects.extend(self.finish());
                return effects;
            }
        };

        let mut effects = vec![GateEffect::DisableControl];
        if let Some(link) = links.choose(rng) {
            effects.push(GateEffect::OpenLink(link.link_url.clone()));
        }
        self.state = GateState::Unlocking {
            remaining: self.countdown,
        };
        effects.push(GateEffect::ShowCountdown(self.countdown));
        effects.push(GateEffect::StartTimer);
        effects
    }

    /// One second elapsed.
    pub fn tick(&mut self) -> Vec<GateEffect> {
        let GateState::Unlocking { remaining } = self.state else {
            return Vec::new();
        };
        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            return self.finish();
        }
        self.state = GateState::Unlocking { remaining };
        vec![GateEffect::ShowCountdown(remaining)]
    }

    /// The page is going away; a running countdown must not outlive it.
    pub fn cancel(&mut self) -> Vec<GateEffect> {
        match self.state {
            GateState::Unlocking { .. } => {
                self.state = GateState::Locked;
                vec![GateEffect::StopTimer, GateEffect::EnableControl]
            }
            GateState::Locked | GateState::Unlocked => Vec::new(),
        }
    }

    fn finish(&mut self) -> Vec<GateEffect> {
        self.state = GateState::Unlocked;
        vec![
            GateEffect::StopTimer,
            GateEffect::HideGate,
            GateEffect::RevealContent,
            GateEffect::EnableControl,
        ]
    }
}
