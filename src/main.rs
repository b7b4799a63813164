//! Main module for the card-draw application using Yew.
//! Wires UI components, state reducer, and the async pool builds.

use card_draw::display::pool_status_text;
use card_draw::{
    load_catalog, Action, AppState, CatalogStatus, HttpFetcher, PackConfig, PoolBuilder,
};
use log::{error, info};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

mod components;
mod config;
mod hooks;
mod logging;

use components::{ConfirmationView, FinalView, Notice, SelectionView, SettingsView};
use config::*;
use hooks::use_debounce;

/// Catalog snapshot plus the pack ids a build should cover.
type BuildRequest = (Rc<Vec<PackConfig>>, Vec<String>);

/// Primary application component wiring state, effects, and views.
#[function_component]
fn App() -> Html {
    let state = use_reducer(AppState::default);
    let builder = use_memo((), |_| PoolBuilder::new(HttpFetcher::new(PACKS_BASE_URL)));
    let build_counter = use_mut_ref(|| 0u64);
    // The first build after the catalog loads runs at once; later ones are debounced.
    let first_build_done = use_mut_ref(|| false);

    let start_build = {
        let dispatcher = state.dispatcher();
        let builder = builder.clone();
        Callback::from(move |(catalog, selected): BuildRequest| {
            let id = {
                let mut counter = build_counter.borrow_mut();
                *counter += 1;
                *counter
            };
            dispatcher.dispatch(Action::BuildStarted(id));

            let dispatcher = dispatcher.clone();
            let builder = builder.clone();
            spawn_local(async move {
                let outcome = builder.build(&catalog, &selected).await;
                dispatcher.dispatch(Action::BuildFinished { build: id, outcome });
            });
        })
    };
    let debounced_build = use_debounce(DEBOUNCE_MS, start_build.clone());

    // Load the catalog on mount; cancel any build in flight on unmount
    {
        let dispatcher = state.dispatcher();
        let builder = builder.clone();
        use_effect_with((), move |_| {
            let loader = builder.clone();
            spawn_local(async move {
                match load_catalog(loader.fetcher()).await {
                    Ok(packs) => dispatcher.dispatch(Action::CatalogLoaded(Rc::new(packs))),
                    Err(e) => {
                        error!("Failed to load pack catalog: {}", e);
                        dispatcher.dispatch(Action::CatalogFailed(e.to_string()));
                    }
                }
            });
            move || {
                builder.cancel();
            }
        });
    }

    // Rebuild the pool whenever the selection changes
    {
        let catalog = match &state.catalog {
            CatalogStatus::Loaded(packs) => Some(packs.clone()),
            _ => None,
        };
        let selected = state.selected_packs.clone();
        use_effect_with((catalog.is_some(), selected), move |(_, selected)| {
            if let Some(catalog) = catalog {
                let request = (catalog, selected.clone());
                let mut first = first_build_done.borrow_mut();
                if *first {
                    debounced_build.emit(request);
                } else {
                    info!("Building initial pool from {} pack(s)", request.1.len());
                    *first = true;
                    start_build.emit(request);
                }
            }
        });
    }

    let on_toggle = {
        let dispatcher = state.dispatcher();
        Callback::from(move |(id, checked): (String, bool)| {
            dispatcher.dispatch(Action::TogglePack { id, checked })
        })
    };
    let on_input = {
        let dispatcher = state.dispatcher();
        Callback::from(move |text: String| dispatcher.dispatch(Action::SetDrawInput(text)))
    };
    let send = |action: Action| {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(action.clone()))
    };
    let on_pick = {
        let dispatcher = state.dispatcher();
        Callback::from(move |index: usize| dispatcher.dispatch(Action::Pick(index)))
    };

    let status_text = pool_status_text(&state.pool_status, &state.pool);
    let drawn = Rc::new(state.drawn.clone());
    let selected = Rc::new(state.selected_packs.clone());

    html! {
        <div class="app-container">
            <h1>{ "武将抽取" }</h1>
            if let Some(notice) = state.notice {
                <Notice message={notice.to_string()} on_dismiss={send(Action::DismissNotice)} />
            }
            <SettingsView
                current={state.view}
                catalog={state.catalog.clone()}
                selected={selected}
                status_text={status_text}
                draw_input={state.draw_input.clone()}
                pool_size={state.pool_size()}
                can_draw={state.can_draw()}
                on_toggle={on_toggle}
                on_input={on_input}
                on_draw={send(Action::Draw)}
            />
            <SelectionView
                current={state.view}
                cards={drawn}
                on_pick={on_pick}
                on_cancel={send(Action::CancelSelection)}
            />
            <ConfirmationView
                current={state.view}
                card={state.pending.clone()}
                on_back={send(Action::Back)}
                on_confirm={send(Action::Confirm)}
            />
            <FinalView
                current={state.view}
                card={state.confirmed.clone()}
                locked={state.locked}
                shake={state.shake}
                on_toggle_lock={send(Action::ToggleLock)}
                on_redraw={send(Action::Redraw)}
            />
        </div>
    }
}

/// Entry point: installs logging and mounts the App component.
fn main() {
    logging::init(LOG_LEVEL);
    yew::Renderer::<App>::new().render();
}
