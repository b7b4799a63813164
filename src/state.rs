//! Application state and the view state machine.
//!
//! `AppState` is the single source of truth for the UI. Every change goes
//! through [`AppState::apply`], a pure transition from one state to the
//! next; the Yew reducer is a thin wrapper around it. Views are a projection
//! of this state and carry no logic of their own.
//!
//! ```text
//! Settings --draw--> Selection --pick--> Confirmation --confirm--> Final
//!    ^                  |   ^                 |                      |
//!    +-----cancel-------+   +------back-------+                      |
//!    +-------------------------redraw (unlocked only)----------------+
//! ```

use crate::defaults::DEFAULT_DRAW_COUNT;
use crate::draw::{draw, parse_draw_count};
use crate::error::DrawError;
use crate::model::{Card, PackConfig, Pool};
use crate::pool::BuildOutcome;
use log::{debug, error, warn};
use rand::Rng;
use std::rc::Rc;
use yew::Reducible;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Settings,
    Selection,
    Confirmation,
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    #[default]
    Loading,
    Loaded(Rc<Vec<PackConfig>>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PoolStatus {
    #[default]
    LoadingCatalog,
    CatalogFailed,
    Building,
    EmptySelection,
    /// Built with at least one card.
    Ready,
    /// Built, but no pack produced a card.
    NoCards,
    Cancelled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CatalogLoaded(Rc<Vec<PackConfig>>),
    CatalogFailed(String),
    TogglePack { id: String, checked: bool },
    /// A build with this id has started and supersedes all earlier ones.
    BuildStarted(u64),
    BuildFinished { build: u64, outcome: BuildOutcome },
    SetDrawInput(String),
    Draw,
    Pick(usize),
    CancelSelection,
    Back,
    Confirm,
    Redraw,
    ToggleLock,
    DismissNotice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub catalog: CatalogStatus,
    /// Selected pack ids, in catalog order.
    pub selected_packs: Vec<String>,
    pub pool: Rc<Pool>,
    pub pool_status: PoolStatus,
    /// Id of the most recent build; results of any other build are stale.
    pub build: u64,
    pub draw_input: String,
    pub view: View,
    pub drawn: Vec<Card>,
    pub pending: Option<Card>,
    pub confirmed: Option<Card>,
    pub locked: bool,
    pub notice: Option<DrawError>,
    /// Bumped on every refused redraw; restarts the shake animation. Zero
    /// whenever a card is freshly confirmed.
    pub shake: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog: CatalogStatus::Loading,
            selected_packs: Vec::new(),
            pool: Rc::new(Pool::default()),
            pool_status: PoolStatus::LoadingCatalog,
            build: 0,
            draw_input: DEFAULT_DRAW_COUNT.to_string(),
            view: View::Settings,
            drawn: Vec::new(),
            pending: None,
            confirmed: None,
            locked: false,
            notice: None,
            shake: 0,
        }
    }
}

impl AppState {
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Drawing needs a finished, non-empty pool.
    pub fn can_draw(&self) -> bool {
        self.pool_status == PoolStatus::Ready && !self.pool.is_empty()
    }

    pub fn packs(&self) -> &[PackConfig] {
        match &self.catalog {
            CatalogStatus::Loaded(packs) => packs,
            _ => &[],
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_packs.iter().any(|p| p == id)
    }

    /// The card the detail panel should show for the current view.
    pub fn visible_card(&self) -> Option<&Card> {
        match self.view {
            View::Confirmation => self.pending.as_ref(),
            View::Final => self.confirmed.as_ref(),
            View::Settings | View::Selection => None,
        }
    }

    /// Compute the state that follows `action`.
    pub fn apply<R: Rng>(&self, action: Action, rng: &mut R) -> Self {
        let mut next = self.clone();
        match action {
            Action::CatalogLoaded(packs) => {
                next.selected_packs = packs.iter().map(|p| p.id.clone()).collect();
                next.catalog = CatalogStatus::Loaded(packs);
            }
            Action::CatalogFailed(message) => {
                next.catalog = CatalogStatus::Failed(message);
                next.pool = Rc::new(Pool::default());
                next.pool_status = PoolStatus::CatalogFailed;
            }
            Action::TogglePack { id, checked } => {
                let packs = next.packs().to_vec();
                next.selected_packs = packs
                    .iter()
                    .map(|p| &p.id)
                    .filter(|pid| {
                        if **pid == id {
                            checked
                        } else {
                            self.is_selected(pid)
                        }
                    })
                    .cloned()
                    .collect();
            }
            Action::BuildStarted(build) => {
                next.build = build;
                next.pool = Rc::new(Pool::default());
                next.pool_status = PoolStatus::Building;
            }
            Action::BuildFinished { build, outcome } => {
                if build != self.build {
                    debug!("Ignoring result of stale build {}", build);
                    return next;
                }
                next.finish_build(outcome);
            }
            Action::SetDrawInput(text) => {
                next.draw_input = text;
                next.notice = None;
            }
            Action::Draw => next.draw(rng),
            Action::Pick(index) => {
                if self.view != View::Selection {
                    warn!("Pick ignored outside the selection view");
                    return next;
                }
                match self.drawn.get(index) {
                    Some(card) => {
                        next.pending = Some(card.clone());
                        next.locked = false;
                        next.view = View::Confirmation;
                    }
                    None => error!("Picked card index {} is out of range", index),
                }
            }
            Action::CancelSelection => {
                if self.view == View::Selection {
                    next.drawn.clear();
                    next.pending = None;
                    next.view = View::Settings;
                }
            }
            Action::Back => {
                if self.view == View::Confirmation {
                    next.pending = None;
                    next.view = View::Selection;
                }
            }
            Action::Confirm => {
                if self.view == View::Confirmation {
                    match self.pending.clone() {
                        Some(card) => {
                            next.confirmed = Some(card);
                            next.locked = false;
                            next.shake = 0;
                            next.view = View::Final;
                        }
                        None => {
                            error!("Nothing pending to confirm");
                            next.view = View::Selection;
                        }
                    }
                }
            }
            Action::Redraw => {
                if self.view == View::Final {
                    if self.locked {
                        next.shake = self.shake.wrapping_add(1);
                    } else {
                        next.drawn.clear();
                        next.pending = None;
                        next.confirmed = None;
                        next.shake = 0;
                        next.view = View::Settings;
                    }
                }
            }
            Action::ToggleLock => next.locked = !self.locked,
            Action::DismissNotice => next.notice = None,
        }
        if next.view != self.view {
            debug!("View {:?} -> {:?}", self.view, next.view);
        }
        next
    }

    fn finish_build(&mut self, outcome: BuildOutcome) {
        match outcome {
            BuildOutcome::Built(pool) => {
                self.pool_status = if pool.is_empty() {
                    PoolStatus::NoCards
                } else {
                    PoolStatus::Ready
                };
                self.clamp_draw_input(pool.len());
                self.pool = Rc::new(pool);
            }
            BuildOutcome::EmptySelection => {
                self.pool = Rc::new(Pool::default());
                self.pool_status = PoolStatus::EmptySelection;
            }
            BuildOutcome::Cancelled => {
                self.pool = Rc::new(Pool::default());
                self.pool_status = PoolStatus::Cancelled;
            }
            BuildOutcome::Failed(message) => {
                self.pool = Rc::new(Pool::default());
                self.pool_status = PoolStatus::Failed(message);
            }
        }
    }

    /// Keep the draw-count input inside `[1, pool_size]` after a rebuild.
    fn clamp_draw_input(&mut self, pool_size: usize) {
        if pool_size == 0 {
            self.draw_input = "1".into();
            return;
        }
        if let Ok(n) = self.draw_input.trim().parse::<i64>() {
            if n > pool_size as i64 {
                self.draw_input = pool_size.to_string();
            } else if n < 1 {
                self.draw_input = "1".into();
            }
        }
    }

    fn draw<R: Rng>(&mut self, rng: &mut R) {
        if self.view != View::Settings {
            warn!("Draw ignored outside the settings view");
            return;
        }
        let result = parse_draw_count(&self.draw_input).and_then(|n| draw(&self.pool.cards, n, rng));
        match result {
            Ok(batch) => {
                debug!("Drew {} of {} cards", batch.len(), self.pool.len());
                self.drawn = batch;
                self.pending = None;
                self.notice = None;
                self.view = View::Selection;
            }
            Err(e) => {
                if let DrawError::ExceedsPool { max } = e {
                    self.draw_input = max.to_string();
                }
                self.notice = Some(e);
            }
        }
    }
}

impl Reducible for AppState {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action, &mut rand::rng()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(name: &str) -> Card {
        Card {
            name: Some(name.into()),
            ..Card::default()
        }
        .tagged("标准包", "")
    }

    fn pack(id: &str) -> PackConfig {
        PackConfig {
            id: id.into(),
            folder: Some(id.into()),
            name_for_checkbox: None,
            description: None,
        }
    }

    struct Harness {
        state: AppState,
        rng: StdRng,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                state: AppState::default(),
                rng: StdRng::seed_from_u64(11),
            }
        }

        fn with_pool(names: &[&str]) -> Self {
            let mut h = Self::new();
            h.send(Action::CatalogLoaded(Rc::new(vec![pack("std")])));
            h.send(Action::BuildStarted(1));
            h.send(Action::BuildFinished {
                build: 1,
                outcome: BuildOutcome::Built(Pool {
                    cards: names.iter().map(|n| card(n)).collect(),
                    packs: vec!["标准包".into()],
                }),
            });
            h
        }

        fn send(&mut self, action: Action) -> &AppState {
            self.state = self.state.apply(action, &mut self.rng);
            &self.state
        }

        /// Settings -> Selection -> Confirmation -> Final with the first card.
        fn to_final(&mut self) {
            self.send(Action::SetDrawInput("2".into()));
            self.send(Action::Draw);
            self.send(Action::Pick(0));
            self.send(Action::Confirm);
            assert_eq!(self.state.view, View::Final);
        }
    }

    #[test]
    fn starts_in_settings_without_a_pool() {
        let state = AppState::default();
        assert_eq!(state.view, View::Settings);
        assert_eq!(state.pool_status, PoolStatus::LoadingCatalog);
        assert!(!state.can_draw());
        assert_eq!(state.draw_input, DEFAULT_DRAW_COUNT.to_string());
    }

    #[test]
    fn catalog_load_selects_every_pack() {
        let mut h = Harness::new();
        h.send(Action::CatalogLoaded(Rc::new(vec![pack("a"), pack("b")])));
        assert_eq!(h.state.selected_packs, vec!["a", "b"]);
        assert_eq!(h.state.packs().len(), 2);
    }

    #[test]
    fn toggling_keeps_catalog_order() {
        let mut h = Harness::new();
        h.send(Action::CatalogLoaded(Rc::new(vec![pack("a"), pack("b"), pack("c")])));
        h.send(Action::TogglePack { id: "a".into(), checked: false });
        h.send(Action::TogglePack { id: "c".into(), checked: false });
        h.send(Action::TogglePack { id: "a".into(), checked: true });
        assert_eq!(h.state.selected_packs, vec!["a", "b"]);
    }

    #[test]
    fn catalog_failure_disables_drawing() {
        let mut h = Harness::new();
        h.send(Action::CatalogFailed("HTTP 404: Not Found".into()));
        assert_eq!(h.state.pool_status, PoolStatus::CatalogFailed);
        assert!(!h.state.can_draw());
        assert!(h.state.packs().is_empty());
    }

    #[test]
    fn stale_build_results_never_reach_the_pool() {
        let mut h = Harness::new();
        h.send(Action::CatalogLoaded(Rc::new(vec![pack("std")])));
        h.send(Action::BuildStarted(1));
        h.send(Action::BuildStarted(2));
        h.send(Action::BuildFinished {
            build: 2,
            outcome: BuildOutcome::Built(Pool {
                cards: vec![card("刘备")],
                packs: vec!["标准包".into()],
            }),
        });
        h.send(Action::BuildFinished {
            build: 1,
            outcome: BuildOutcome::Cancelled,
        });
        assert_eq!(h.state.pool_size(), 1);
        assert_eq!(h.state.pool_status, PoolStatus::Ready);
    }

    #[test]
    fn current_build_outcomes_set_status() {
        let mut h = Harness::with_pool(&["甲"]);
        h.send(Action::BuildStarted(2));
        assert_eq!(h.state.pool_status, PoolStatus::Building);
        assert!(!h.state.can_draw());
        h.send(Action::BuildFinished { build: 2, outcome: BuildOutcome::Cancelled });
        assert_eq!(h.state.pool_status, PoolStatus::Cancelled);
        assert_eq!(h.state.pool_size(), 0);

        h.send(Action::BuildStarted(3));
        h.send(Action::BuildFinished { build: 3, outcome: BuildOutcome::EmptySelection });
        assert_eq!(h.state.pool_status, PoolStatus::EmptySelection);

        h.send(Action::BuildStarted(4));
        h.send(Action::BuildFinished {
            build: 4,
            outcome: BuildOutcome::Failed("boom".into()),
        });
        assert_eq!(h.state.pool_status, PoolStatus::Failed("boom".into()));

        h.send(Action::BuildStarted(5));
        h.send(Action::BuildFinished {
            build: 5,
            outcome: BuildOutcome::Built(Pool::default()),
        });
        assert_eq!(h.state.pool_status, PoolStatus::NoCards);
        assert_eq!(h.state.draw_input, "1");
    }

    #[test]
    fn rebuild_clamps_draw_input_to_pool_size() {
        let mut h = Harness::new();
        h.send(Action::SetDrawInput("10".into()));
        h.send(Action::BuildStarted(1));
        h.send(Action::BuildFinished {
            build: 1,
            outcome: BuildOutcome::Built(Pool {
                cards: vec![card("甲"), card("乙"), card("丙")],
                packs: vec![],
            }),
        });
        assert_eq!(h.state.draw_input, "3");
    }

    #[test]
    fn invalid_draws_leave_state_alone_except_notice() {
        let mut h = Harness::with_pool(&["甲", "乙"]);
        h.send(Action::SetDrawInput("0".into()));
        let before = h.state.clone();
        h.send(Action::Draw);
        assert_eq!(h.state.notice, Some(DrawError::InvalidCount));
        assert_eq!(h.state.view, View::Settings);
        assert_eq!(h.state.drawn, before.drawn);
        assert_eq!(h.state.pool, before.pool);

        h.send(Action::SetDrawInput("5".into()));
        h.send(Action::Draw);
        assert_eq!(h.state.notice, Some(DrawError::ExceedsPool { max: 2 }));
        assert_eq!(h.state.draw_input, "2");
        assert!(h.state.drawn.is_empty());
        assert_eq!(h.state.view, View::Settings);
    }

    #[test]
    fn empty_pool_draw_is_rejected() {
        let mut h = Harness::new();
        h.send(Action::Draw);
        assert_eq!(h.state.notice, Some(DrawError::EmptyPool));
        assert_eq!(h.state.view, View::Settings);
    }

    #[test]
    fn full_cycle_through_all_views() {
        let mut h = Harness::with_pool(&["甲", "乙", "丙"]);
        h.send(Action::SetDrawInput("2".into()));
        h.send(Action::Draw);
        assert_eq!(h.state.view, View::Selection);
        assert_eq!(h.state.drawn.len(), 2);
        assert!(h.state.visible_card().is_none());

        h.send(Action::Pick(1));
        assert_eq!(h.state.view, View::Confirmation);
        assert_eq!(h.state.pending.as_ref(), Some(&h.state.drawn[1]));
        assert_eq!(h.state.visible_card(), h.state.pending.as_ref());

        h.send(Action::Back);
        assert_eq!(h.state.view, View::Selection);
        assert!(h.state.pending.is_none());

        h.send(Action::Pick(0));
        h.send(Action::Confirm);
        assert_eq!(h.state.view, View::Final);
        assert_eq!(h.state.confirmed.as_ref(), Some(&h.state.drawn[0]));
        assert!(!h.state.locked);
        assert_eq!(h.state.visible_card(), h.state.confirmed.as_ref());
    }

    #[test]
    fn out_of_range_pick_is_ignored() {
        let mut h = Harness::with_pool(&["甲"]);
        h.send(Action::Draw);
        let before = h.state.clone();
        h.send(Action::Pick(5));
        assert_eq!(h.state, before);
    }

    #[test]
    fn cancel_selection_clears_the_batch() {
        let mut h = Harness::with_pool(&["甲", "乙"]);
        h.send(Action::Draw);
        h.send(Action::CancelSelection);
        assert_eq!(h.state.view, View::Settings);
        assert!(h.state.drawn.is_empty());
        assert!(h.state.pending.is_none());
    }

    #[test]
    fn locked_redraw_is_refused_with_a_shake() {
        let mut h = Harness::with_pool(&["甲", "乙"]);
        h.to_final();
        h.send(Action::ToggleLock);
        assert!(h.state.locked);
        assert_eq!(h.state.view, View::Final);

        let before = h.state.clone();
        h.send(Action::Redraw);
        assert_eq!(h.state.view, View::Final);
        assert_eq!(h.state.drawn, before.drawn);
        assert_eq!(h.state.confirmed, before.confirmed);
        assert_eq!(h.state.shake, before.shake + 1);
    }

    #[test]
    fn unlocked_redraw_returns_to_settings_and_clears_selection() {
        let mut h = Harness::with_pool(&["甲", "乙"]);
        h.to_final();
        h.send(Action::ToggleLock);
        h.send(Action::ToggleLock);
        h.send(Action::Redraw);
        assert_eq!(h.state.view, View::Settings);
        assert!(h.state.drawn.is_empty());
        assert!(h.state.pending.is_none());
        assert!(h.state.confirmed.is_none());
        assert_eq!(h.state.shake, 0);
    }

    #[test]
    fn picking_a_new_card_resets_the_lock() {
        let mut h = Harness::with_pool(&["甲", "乙"]);
        h.send(Action::Draw);
        h.send(Action::ToggleLock);
        assert!(h.state.locked);
        assert_eq!(h.state.view, View::Selection);
        h.send(Action::Pick(0));
        assert_eq!(h.state.view, View::Confirmation);
        assert!(!h.state.locked);
    }

    #[test]
    fn confirming_resets_the_lock() {
        let mut h = Harness::with_pool(&["甲", "乙"]);
        h.send(Action::Draw);
        h.send(Action::Pick(1));
        h.send(Action::ToggleLock);
        assert!(h.state.locked);
        h.send(Action::Confirm);
        assert_eq!(h.state.view, View::Final);
        assert!(!h.state.locked);
    }

    #[test]
    fn shake_does_not_carry_into_the_next_final_view() {
        let mut h = Harness::with_pool(&["甲", "乙"]);
        h.to_final();
        h.send(Action::ToggleLock);
        h.send(Action::Redraw);
        assert_eq!(h.state.shake, 1);
        h.send(Action::ToggleLock);
        h.send(Action::Redraw);
        assert_eq!(h.state.shake, 0);
        h.to_final();
        assert_eq!(h.state.shake, 0);
    }

    #[test]
    fn actions_outside_their_view_do_nothing() {
        let mut h = Harness::with_pool(&["甲"]);
        let before = h.state.clone();
        for action in [Action::Back, Action::Confirm, Action::Redraw, Action::CancelSelection] {
            h.send(action);
            assert_eq!(h.state, before);
        }
    }
}
