use card_draw::defaults::CATALOG_PATH;
use card_draw::{
    load_catalog, Action, AppState, BuildOutcome, MemoryFetcher, PoolBuilder, PoolStatus, View,
};
use futures::executor::block_on;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::rc::Rc;

fn fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with(
            CATALOG_PATH,
            r#"[{"id":"A","folder":"a","nameForCheckbox":"包A"}]"#,
        )
        .with(
            "packs/a/_packinfo.json",
            r#"{"displayName":"A包","files":[{"file":"cards.json"}]}"#,
        )
        .with(
            "packs/a/cards.json",
            r#"[
                {"name":"甲","faction":"魏","health":4,"skills":[{"skillName":"奸雄","skillDescription":"..."}]},
                {"name":"乙","faction":"蜀","health":3,"startingHealth":2}
            ]"#,
        )
}

/// Load the catalog and run the first build the way the app does on startup.
fn boot(rng: &mut StdRng) -> AppState {
    let builder = PoolBuilder::new(fetcher());
    let packs = Rc::new(block_on(load_catalog(builder.fetcher())).unwrap());

    let mut state = AppState::default().apply(Action::CatalogLoaded(packs.clone()), rng);
    assert_eq!(state.selected_packs, vec!["A".to_string()]);

    state = state.apply(Action::BuildStarted(1), rng);
    let outcome = block_on(builder.build(&packs, &state.selected_packs));
    assert!(matches!(outcome, BuildOutcome::Built(_)));
    state.apply(Action::BuildFinished { build: 1, outcome }, rng)
}

#[test]
fn draw_pick_confirm_lands_on_final_unlocked() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = boot(&mut rng);
    assert_eq!(state.pool_status, PoolStatus::Ready);
    assert_eq!(state.pool_size(), 2);
    assert_eq!(state.pool.packs, vec!["A包".to_string()]);
    assert_eq!(state.draw_input, "2");

    state = state.apply(Action::Draw, &mut rng);
    assert_eq!(state.view, View::Selection);
    let mut names: Vec<_> = state
        .drawn
        .iter()
        .map(|c| c.name.clone().unwrap_or_default())
        .collect();
    names.sort();
    assert_eq!(names, vec!["乙", "甲"]);
    assert!(state.drawn.iter().all(|c| c.display_pack == "A包"));

    let chosen = state.drawn[0].clone();
    state = state.apply(Action::Pick(0), &mut rng);
    state = state.apply(Action::Confirm, &mut rng);
    assert_eq!(state.view, View::Final);
    assert_eq!(state.confirmed, Some(chosen));
    assert!(!state.locked);
}

#[test]
fn lock_blocks_redraw_until_released() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut state = boot(&mut rng);
    for action in [Action::Draw, Action::Pick(1), Action::Confirm, Action::ToggleLock] {
        state = state.apply(action, &mut rng);
    }
    assert!(state.locked);

    let locked = state.apply(Action::Redraw, &mut rng);
    assert_eq!(locked.view, View::Final);
    assert_eq!(locked.confirmed, state.confirmed);
    assert_eq!(locked.shake, state.shake + 1);

    let released = locked
        .apply(Action::ToggleLock, &mut rng)
        .apply(Action::Redraw, &mut rng);
    assert_eq!(released.view, View::Settings);
    assert!(released.drawn.is_empty());
    assert!(released.confirmed.is_none());
}

#[test]
fn deselecting_everything_empties_the_pool() {
    let mut rng = StdRng::seed_from_u64(5);
    let builder = PoolBuilder::new(fetcher());
    let state = boot(&mut rng).apply(
        Action::TogglePack {
            id: "A".into(),
            checked: false,
        },
        &mut rng,
    );
    assert!(state.selected_packs.is_empty());

    let state = state.apply(Action::BuildStarted(2), &mut rng);
    let outcome = block_on(builder.build(state.packs(), &state.selected_packs));
    assert_eq!(outcome, BuildOutcome::EmptySelection);
    let state = state.apply(Action::BuildFinished { build: 2, outcome }, &mut rng);
    assert_eq!(state.pool_status, PoolStatus::EmptySelection);
    assert!(!state.can_draw());
    assert!(builder.fetcher().requests().is_empty());
}
