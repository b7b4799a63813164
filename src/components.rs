//! Pure Yew view components for the card-draw UI.
//!
//! Components render from props only; every change goes back to the app
//! through callbacks that dispatch state actions.

use crate::config::{CAROUSEL_SCROLL_PX, MIN_DRAW_COUNT};
use card_draw::display::{
    catalog_error_text, lock_labels, CardDisplay, CarouselItem, EMPTY_CATALOG,
};
use card_draw::{Card, CatalogStatus, View};
use std::rc::Rc;
use web_sys::{HtmlElement, HtmlInputElement};
use yew::prelude::*;

/// `hidden` / `aria-hidden` pair for a view section.
fn visibility(current: View, this: View) -> (bool, &'static str) {
    if current == this {
        (false, "false")
    } else {
        (true, "true")
    }
}

#[derive(Properties, PartialEq)]
pub struct PackSelectorProps {
    pub catalog: CatalogStatus,
    pub selected: Rc<Vec<String>>,
    pub on_toggle: Callback<(String, bool)>,
}

/// Checkbox list of the available packs.
#[function_component(PackSelector)]
pub fn pack_selector(props: &PackSelectorProps) -> Html {
    let packs = match &props.catalog {
        CatalogStatus::Loading => {
            return html! { <div class="pack-list loading">{ "..." }</div> };
        }
        CatalogStatus::Failed(message) => {
            return html! {
                <div class="pack-list error">{ catalog_error_text(message) }</div>
            };
        }
        CatalogStatus::Loaded(packs) => packs.clone(),
    };

    if packs.is_empty() {
        return html! { <div class="pack-list empty">{ EMPTY_CATALOG }</div> };
    }

    html! {
        <div class="pack-list">
            { packs.iter().map(|pack| {
                let id = pack.id.clone();
                let checked = props.selected.iter().any(|s| *s == id);
                let onchange = {
                    let on_toggle = props.on_toggle.clone();
                    let id = id.clone();
                    Callback::from(move |e: Event| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        on_toggle.emit((id.clone(), input.checked()));
                    })
                };
                let input_id = format!("pack-{}", id);
                html! {
                    <div class="pack-option" key={id.clone()}>
                        <input type="checkbox"
                            id={input_id.clone()}
                            value={id.clone()}
                            checked={checked}
                            onchange={onchange}
                        />
                        <label for={input_id}>{ pack.label() }</label>
                        if let Some(description) = pack.description() {
                            <p class="pack-description">{ description }</p>
                        }
                    </div>
                }
            }).collect::<Html>() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SettingsViewProps {
    pub current: View,
    pub catalog: CatalogStatus,
    pub selected: Rc<Vec<String>>,
    pub status_text: String,
    pub draw_input: String,
    pub pool_size: usize,
    pub can_draw: bool,
    pub on_toggle: Callback<(String, bool)>,
    pub on_input: Callback<String>,
    pub on_draw: Callback<()>,
}

#[function_component(SettingsView)]
pub fn settings_view(props: &SettingsViewProps) -> Html {
    let (hidden, aria_hidden) = visibility(props.current, View::Settings);
    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_input.emit(input.value());
        })
    };
    let onclick = {
        let on_draw = props.on_draw.clone();
        Callback::from(move |_: MouseEvent| on_draw.emit(()))
    };
    let max = props.pool_size.max(MIN_DRAW_COUNT).to_string();

    html! {
        <section class="view settings-view" hidden={hidden} aria-hidden={aria_hidden}>
            <h2>{ "选择扩展包" }</h2>
            <PackSelector
                catalog={props.catalog.clone()}
                selected={props.selected.clone()}
                on_toggle={props.on_toggle.clone()}
            />
            <p class="pool-status">{ &props.status_text }</p>
            <div class="form-group">
                <label for="draw-count">{ "抽取数量:" }</label>
                <input type="number"
                    id="draw-count"
                    min={MIN_DRAW_COUNT.to_string()}
                    max={max}
                    value={props.draw_input.clone()}
                    oninput={oninput}
                />
                <button class="draw-button" disabled={!props.can_draw} onclick={onclick}>
                    { "抽卡" }
                </button>
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct CardCarouselProps {
    pub cards: Rc<Vec<Card>>,
    pub on_pick: Callback<usize>,
}

/// Horizontal strip of drawn cards; clicking a tile picks it.
#[function_component(CardCarousel)]
pub fn card_carousel(props: &CardCarouselProps) -> Html {
    let strip = use_node_ref();

    let scroll = |dx: f64| {
        let strip = strip.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(el) = strip.cast::<HtmlElement>() {
                el.scroll_by_with_x_and_y(dx, 0.0);
            }
        })
    };

    html! {
        <div class="carousel">
            <button class="carousel-nav prev" onclick={scroll(-CAROUSEL_SCROLL_PX)}>{ "‹" }</button>
            <div class="carousel-strip" ref={strip.clone()}>
                { props.cards.iter().enumerate().map(|(index, card)| {
                    let item = CarouselItem::render(card);
                    let onclick = {
                        let on_pick = props.on_pick.clone();
                        Callback::from(move |_: MouseEvent| on_pick.emit(index))
                    };
                    html! {
                        <div class="carousel-item" key={index} onclick={onclick}>
                            if let Some(src) = item.image {
                                <img src={src} alt={item.image_alt} loading="lazy" />
                            }
                            <div class="carousel-name">{ item.name }</div>
                            <div class="carousel-caption">{ item.caption }</div>
                        </div>
                    }
                }).collect::<Html>() }
            </div>
            <button class="carousel-nav next" onclick={scroll(CAROUSEL_SCROLL_PX)}>{ "›" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectionViewProps {
    pub current: View,
    pub cards: Rc<Vec<Card>>,
    pub on_pick: Callback<usize>,
    pub on_cancel: Callback<()>,
}

#[function_component(SelectionView)]
pub fn selection_view(props: &SelectionViewProps) -> Html {
    let (hidden, aria_hidden) = visibility(props.current, View::Selection);
    let on_cancel = props.on_cancel.reform(|_: MouseEvent| ());

    html! {
        <section class="view selection-view" hidden={hidden} aria-hidden={aria_hidden}>
            <h2>{ "选择一名武将" }</h2>
            <CardCarousel cards={props.cards.clone()} on_pick={props.on_pick.clone()} />
            <button class="cancel-button" onclick={on_cancel}>{ "取消" }</button>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct CardDetailsProps {
    pub card: Option<Card>,
}

/// Full detail panel for one card, or a neutral placeholder.
#[function_component(CardDetails)]
pub fn card_details(props: &CardDetailsProps) -> Html {
    let view = CardDisplay::render(props.card.as_ref());

    html! {
        <div class="card-details" data-faction={view.faction_key}>
            <div class="card-portrait">
                if let Some(src) = view.image {
                    <img src={src} alt={view.image_alt} />
                }
            </div>
            <div class="card-info">
                <h3 class="card-name">{ view.name }</h3>
                <div class="card-pack">{ view.pack }</div>
                <div class="card-faction">{ view.faction }</div>
                <div class="card-gender">{ view.gender }</div>
                <div class="card-health">{ view.health }</div>
                if let Some(armor) = view.armor {
                    <div class="card-armor">{ format!("护甲: {}", armor) }</div>
                }
                <ul class="card-skills">
                    { view.skills.into_iter().map(|skill| html! {
                        <li>
                            <strong>{ format!("{}: ", skill.name) }</strong>
                            { skill.description }
                        </li>
                    }).collect::<Html>() }
                </ul>
                if let Some(note) = view.skills_note {
                    <p class="card-skills-note">{ note }</p>
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfirmationViewProps {
    pub current: View,
    pub card: Option<Card>,
    pub on_back: Callback<()>,
    pub on_confirm: Callback<()>,
}

#[function_component(ConfirmationView)]
pub fn confirmation_view(props: &ConfirmationViewProps) -> Html {
    let (hidden, aria_hidden) = visibility(props.current, View::Confirmation);

    html! {
        <section class="view confirmation-view" hidden={hidden} aria-hidden={aria_hidden}>
            <CardDetails card={props.card.clone()} />
            <div class="button-row">
                <button onclick={props.on_back.reform(|_: MouseEvent| ())}>{ "返回" }</button>
                <button class="primary" onclick={props.on_confirm.reform(|_: MouseEvent| ())}>
                    { "确认" }
                </button>
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct LockButtonProps {
    pub locked: bool,
    pub shake: u32,
    pub on_toggle: Callback<()>,
}

/// Lock toggle. A changed `shake` count remounts it so the animation replays.
#[function_component(LockButton)]
pub fn lock_button(props: &LockButtonProps) -> Html {
    let (label, title) = lock_labels(props.locked);
    let class = classes!(
        "lock-button",
        props.locked.then_some("locked"),
        (props.shake > 0).then_some("shake")
    );

    html! {
        <button
            key={props.shake.to_string()}
            class={class}
            title={title}
            aria-pressed={props.locked.to_string()}
            onclick={props.on_toggle.reform(|_: MouseEvent| ())}
        >
            { label }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct FinalViewProps {
    pub current: View,
    pub card: Option<Card>,
    pub locked: bool,
    pub shake: u32,
    pub on_toggle_lock: Callback<()>,
    pub on_redraw: Callback<()>,
}

#[function_component(FinalView)]
pub fn final_view(props: &FinalViewProps) -> Html {
    let (hidden, aria_hidden) = visibility(props.current, View::Final);

    html! {
        <section class="view final-view" hidden={hidden} aria-hidden={aria_hidden}>
            <CardDetails card={props.card.clone()} />
            <div class="button-row">
                <LockButton
                    locked={props.locked}
                    shake={props.shake}
                    on_toggle={props.on_toggle_lock.clone()}
                />
                <button class="redraw-button" onclick={props.on_redraw.reform(|_: MouseEvent| ())}>
                    { "重新抽取" }
                </button>
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
    pub message: String,
    pub on_dismiss: Callback<()>,
}

/// Blocking in-page message for rejected draws.
#[function_component(Notice)]
pub fn notice(props: &NoticeProps) -> Html {
    html! {
        <div class="notice" role="alert">
            <span>{ &props.message }</span>
            <button onclick={props.on_dismiss.reform(|_: MouseEvent| ())}>{ "确定" }</button>
        </div>
    }
}
