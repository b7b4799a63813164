use card_draw::DebounceSlot;
use gloo_timers::callback::Timeout;
use yew::prelude::*;

/// Returns a callback that forwards its argument to `on_fire` once no new
/// call has arrived for `delay_ms`. Each call replaces the pending value and
/// restarts the timer, so a burst delivers only its last value.
#[hook]
pub fn use_debounce<T: 'static>(delay_ms: u32, on_fire: Callback<T>) -> Callback<T> {
    let slot = use_mut_ref(DebounceSlot::<T>::new);
    // Dropping a `Timeout` cancels it.
    let timer = use_mut_ref(|| None::<Timeout>);

    {
        let slot = slot.clone();
        let timer = timer.clone();
        use_effect_with((), move |_| {
            move || {
                slot.borrow_mut().cancel();
                timer.borrow_mut().take();
            }
        });
    }

    Callback::from(move |value: T| {
        let generation = slot.borrow_mut().arm(value);
        let slot = slot.clone();
        let on_fire = on_fire.clone();
        let handle = Timeout::new(delay_ms, move || {
            let ready = slot.borrow_mut().fire(generation);
            if let Some(value) = ready {
                on_fire.emit(value);
            }
        });
        *timer.borrow_mut() = Some(handle);
    })
}
