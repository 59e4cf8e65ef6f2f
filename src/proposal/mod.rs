//! Proposal interaction state.
//!
//! A single rejection counter drives everything the card shows: which phrase
//! each button carries, how large the acceptance button grows, the mascot's
//! mood and whether the rejection control floats. Acceptance is the one
//! irreversible transition.
//!
//! All derived values are pure functions of the counter (plus the transient
//! hover flag for the mood) so the web layer can recompute them on every
//! render.

use rand::Rng;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::{NAG_FRANTIC, NAG_HURT, NO_PHRASES, REJECT_EMOJI_RUNNING, REJECT_EMOJI_SAD, YES_PHRASES};

pub mod evasion;

pub use evasion::{Footprint, Position, Viewport, evade};

/// Which phrase table to read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhraseKind {
    Rejection,
    Acceptance,
}

impl PhraseKind {
    pub fn table(self) -> &'static [&'static str] {
        match self {
            PhraseKind::Rejection => NO_PHRASES,
            PhraseKind::Acceptance => YES_PHRASES,
        }
    }
}

/// Saturating lookup: counts past the end keep showing the last entry.
pub fn phrase_for(kind: PhraseKind, count: u32) -> &'static str {
    let table = kind.table();
    match table.len() {
        0 => "",
        len => table[(count as usize).min(len - 1)],
    }
}

/// Acceptance button scale: `min(1 + step * count, cap)`.
pub fn accept_scale(count: u32, step: f64, cap: f64) -> f64 {
    (1.0 + step * count as f64).min(cap)
}

/// Mascot display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mood {
    Initial,
    Encouraged,
    Distressed,
}

impl Mood {
    /// Any rejection outranks hovering over "yes".
    pub fn derive(count: u32, accept_hovered: bool) -> Self {
        if count > 0 {
            Mood::Distressed
        } else if accept_hovered {
            Mood::Encouraged
        } else {
            Mood::Initial
        }
    }

    pub fn asset(self) -> &'static str {
        match self {
            Mood::Initial => "mascot_shy.png",
            Mood::Encouraged => "mascot_happy.png",
            Mood::Distressed => "mascot_pleading.png",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Mood::Initial => "mood-initial",
            Mood::Encouraged => "mood-encouraged",
            Mood::Distressed => "mood-distressed",
        }
    }
}

/// Where the interaction is. `Accepted` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initial,
    Escalating(u32),
    Accepted,
}

/// Snapshot handed back after a rejection so the caller can patch the view.
#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    pub count: u32,
    pub rejection_phrase: &'static str,
    pub acceptance_phrase: &'static str,
    pub mood: Mood,
    pub position: Position,
}

/// Escalation thresholds and geometry pulled out of [`AppConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub footprint: Footprint,
    pub scale_step: f64,
    pub scale_cap: f64,
    pub nag_after: u32,
    pub frantic_after: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for Tuning {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            footprint: Footprint {
                width: cfg.control_width,
                height: cfg.control_height,
                padding: cfg.padding,
            },
            scale_step: cfg.scale_step,
            scale_cap: cfg.scale_cap,
            nag_after: cfg.nag_after,
            frantic_after: cfg.frantic_after,
        }
    }
}

/// Rejection counter, control position and the accepted flag.
#[derive(Clone, Debug)]
pub struct ProposalState {
    tuning: Tuning,
    count: u32,
    position: Position,
    accepted: bool,
}

impl Default for ProposalState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl ProposalState {
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning, count: 0, position: Position::default(), accepted: false }
    }

    pub fn phase(&self) -> Phase {
        if self.accepted {
            Phase::Accepted
        } else if self.count == 0 {
            Phase::Initial
        } else {
            Phase::Escalating(self.count)
        }
    }

    pub fn rejection_count(&self) -> u32 {
        self.count
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Count one rejection and move the control somewhere else on screen.
    /// Ignored once accepted.
    pub fn reject<R: Rng>(&mut self, viewport: Viewport, rng: &mut R) -> Reaction {
        if self.accepted {
            return self.reaction(false);
        }
        self.count = self.count.saturating_add(1);
        self.position = evade(viewport, self.tuning.footprint, rng);
        debug!(
            count = self.count,
            x = self.position.x,
            y = self.position.y,
            "rejection control evaded"
        );
        self.reaction(false)
    }

    /// Flip to the accepted phase. Returns `true` only for the transition
    /// itself; repeated calls are no-ops.
    pub fn accept(&mut self) -> bool {
        if self.accepted {
            return false;
        }
        self.accepted = true;
        info!(rejections = self.count, "proposal accepted");
        true
    }

    pub fn reaction(&self, accept_hovered: bool) -> Reaction {
        Reaction {
            count: self.count,
            rejection_phrase: self.rejection_phrase(),
            acceptance_phrase: self.acceptance_phrase(),
            mood: self.mood(accept_hovered),
            position: self.position,
        }
    }

    pub fn rejection_phrase(&self) -> &'static str {
        phrase_for(PhraseKind::Rejection, self.count)
    }

    pub fn acceptance_phrase(&self) -> &'static str {
        phrase_for(PhraseKind::Acceptance, self.count)
    }

    pub fn accept_scale(&self) -> f64 {
        accept_scale(self.count, self.tuning.scale_step, self.tuning.scale_cap)
    }

    pub fn mood(&self, accept_hovered: bool) -> Mood {
        Mood::derive(self.count, accept_hovered)
    }

    pub fn nag_message(&self) -> Option<&'static str> {
        if self.count > self.tuning.frantic_after {
            Some(NAG_FRANTIC)
        } else if self.count > self.tuning.nag_after {
            Some(NAG_HURT)
        } else {
            None
        }
    }

    pub fn reject_emoji(&self) -> &'static str {
        if self.count > self.tuning.frantic_after {
            REJECT_EMOJI_RUNNING
        } else {
            REJECT_EMOJI_SAD
        }
    }

    /// After the first rejection the control leaves the card and floats.
    pub fn is_floating(&self) -> bool {
        self.count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rejected(n: u32) -> ProposalState {
        let mut rng = StdRng::seed_from_u64(42);
        let mut st = ProposalState::default();
        for _ in 0..n {
            st.reject(Viewport::new(1024.0, 768.0), &mut rng);
        }
        st
    }

    #[test]
    fn phrases_saturate_at_last_entry() {
        let len = NO_PHRASES.len() as u32;
        for n in [0, len - 1, len, len + 100] {
            let idx = (n as usize).min(NO_PHRASES.len() - 1);
            assert_eq!(phrase_for(PhraseKind::Rejection, n), NO_PHRASES[idx]);
        }
        assert_eq!(phrase_for(PhraseKind::Rejection, u32::MAX), *NO_PHRASES.last().unwrap());
        assert_eq!(phrase_for(PhraseKind::Acceptance, u32::MAX), *YES_PHRASES.last().unwrap());
    }

    #[test]
    fn scale_grows_then_caps() {
        assert_eq!(accept_scale(0, 0.05, 1.15), 1.0);
        assert!((accept_scale(3, 0.05, 1.15) - 1.15).abs() < 1e-9);
        assert_eq!(accept_scale(100, 0.05, 1.15), 1.15);
        assert!((accept_scale(1, 0.05, 1.15) - 1.05).abs() < 1e-9);
    }

    #[test]
    fn mood_table() {
        assert_eq!(Mood::derive(0, false), Mood::Initial);
        assert_eq!(Mood::derive(0, true), Mood::Encouraged);
        assert_eq!(Mood::derive(1, false), Mood::Distressed);
        assert_eq!(Mood::derive(4, true), Mood::Distressed);
    }

    #[test]
    fn phases_progress_and_accept_is_terminal() {
        let mut st = ProposalState::default();
        assert_eq!(st.phase(), Phase::Initial);
        let mut rng = StdRng::seed_from_u64(1);
        st.reject(Viewport::new(800.0, 600.0), &mut rng);
        st.reject(Viewport::new(800.0, 600.0), &mut rng);
        assert_eq!(st.phase(), Phase::Escalating(2));
        assert!(st.accept());
        assert!(!st.accept());
        assert_eq!(st.phase(), Phase::Accepted);
        let before = st.position();
        let r = st.reject(Viewport::new(800.0, 600.0), &mut rng);
        assert_eq!(r.count, 2);
        assert_eq!(st.position(), before);
        assert_eq!(st.phase(), Phase::Accepted);
    }

    #[test]
    fn nag_and_emoji_thresholds() {
        assert_eq!(rejected(0).nag_message(), None);
        assert_eq!(rejected(2).nag_message(), None);
        assert_eq!(rejected(3).nag_message(), Some(NAG_HURT));
        assert_eq!(rejected(5).nag_message(), Some(NAG_HURT));
        assert_eq!(rejected(6).nag_message(), Some(NAG_FRANTIC));
        assert_eq!(rejected(5).reject_emoji(), REJECT_EMOJI_SAD);
        assert_eq!(rejected(6).reject_emoji(), REJECT_EMOJI_RUNNING);
    }

    #[test]
    fn control_floats_after_first_rejection() {
        assert!(!rejected(0).is_floating());
        assert!(rejected(1).is_floating());
    }

    #[test]
    fn reaction_reflects_new_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut st = ProposalState::default();
        let r = st.reject(Viewport::new(640.0, 480.0), &mut rng);
        assert_eq!(r.count, 1);
        assert_eq!(r.rejection_phrase, NO_PHRASES[1]);
        assert_eq!(r.acceptance_phrase, YES_PHRASES[1]);
        assert_eq!(r.mood, Mood::Distressed);
        assert_eq!(r.position, st.position());
    }
}
